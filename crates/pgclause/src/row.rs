//! Row mapping traits and utilities

use crate::error::{ClauseError, ClauseResult};
use tokio_postgres::Row;
use tokio_postgres::types::FromSql;

/// Trait for converting a database row into a Rust value.
///
/// # Example
///
/// ```ignore
/// use pgclause::{FromRow, RowExt, ClauseResult};
///
/// struct User {
///     id: i64,
///     username: String,
///     email: Option<String>,
/// }
///
/// impl FromRow for User {
///     fn from_row(row: &tokio_postgres::Row) -> ClauseResult<Self> {
///         Ok(Self {
///             id: row.try_get_column("id")?,
///             username: row.try_get_column("username")?,
///             email: row.try_get_column("email")?,
///         })
///     }
/// }
/// ```
pub trait FromRow: Sized {
    /// Convert a database row into Self
    fn from_row(row: &Row) -> ClauseResult<Self>;
}

/// Extension trait for Row to provide typed access
pub trait RowExt {
    /// Try to get a column value, returning ClauseError::Decode on failure
    fn try_get_column<T>(&self, column: &str) -> ClauseResult<T>
    where
        T: for<'a> FromSql<'a>;

    /// Try to get a column value by position
    fn try_get_index<T>(&self, index: usize) -> ClauseResult<T>
    where
        T: for<'a> FromSql<'a>;
}

impl RowExt for Row {
    fn try_get_column<T>(&self, column: &str) -> ClauseResult<T>
    where
        T: for<'a> FromSql<'a>,
    {
        self.try_get(column)
            .map_err(|e| ClauseError::decode(column, e.to_string()))
    }

    fn try_get_index<T>(&self, index: usize) -> ClauseResult<T>
    where
        T: for<'a> FromSql<'a>,
    {
        self.try_get(index)
            .map_err(|e| ClauseError::decode(index.to_string(), e.to_string()))
    }
}

// Positional tuples: `fetch_all_as::<(i64, String)>`.
macro_rules! impl_from_row_for_tuple {
    ($($name:ident => $idx:tt),+) => {
        impl<$($name),+> FromRow for ($($name,)+)
        where
            $($name: for<'a> FromSql<'a>),+
        {
            fn from_row(row: &Row) -> ClauseResult<Self> {
                Ok(($(row.try_get_index::<$name>($idx)?,)+))
            }
        }
    };
}

impl_from_row_for_tuple!(A => 0);
impl_from_row_for_tuple!(A => 0, B => 1);
impl_from_row_for_tuple!(A => 0, B => 1, C => 2);
impl_from_row_for_tuple!(A => 0, B => 1, C => 2, D => 3);
impl_from_row_for_tuple!(A => 0, B => 1, C => 2, D => 3, E => 4);
impl_from_row_for_tuple!(A => 0, B => 1, C => 2, D => 3, E => 4, F => 5);
