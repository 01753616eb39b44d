//! Bound parameter storage.
//!
//! Values are kept behind an `Arc` so a finished builder can hand out
//! `&(dyn ToSql + Sync)` references to `tokio-postgres` without copying them.

use std::sync::Arc;
use tokio_postgres::types::ToSql;

/// A single bound value.
#[derive(Clone)]
pub struct Param(pub(crate) Arc<dyn ToSql + Send + Sync>);

impl Param {
    /// Wrap any `ToSql` value.
    pub fn new<T: ToSql + Send + Sync + 'static>(value: T) -> Self {
        Param(Arc::new(value))
    }

    /// Borrow the inner value as a `tokio-postgres` parameter.
    pub fn as_sql(&self) -> &(dyn ToSql + Sync) {
        &*self.0 as &(dyn ToSql + Sync)
    }
}

// `ToSql: Debug`, so the inner value prints as itself (`7`, `"alice"`, ...).
impl std::fmt::Debug for Param {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&*self.0, f)
    }
}

/// Anything that can be flattened into an ordered list of bound values.
///
/// Implemented for `()`, tuples of up to eight `ToSql` values, `Vec<Param>`
/// and `[Param; N]`. The [`params!`](crate::params) macro builds a
/// `Vec<Param>` from heterogeneous values.
pub trait IntoParams {
    /// Flatten into bound values, in binding order.
    fn into_params(self) -> Vec<Param>;
}

impl IntoParams for () {
    fn into_params(self) -> Vec<Param> {
        Vec::new()
    }
}

impl IntoParams for Vec<Param> {
    fn into_params(self) -> Vec<Param> {
        self
    }
}

impl<const N: usize> IntoParams for [Param; N] {
    fn into_params(self) -> Vec<Param> {
        self.into()
    }
}

macro_rules! impl_into_params_for_tuple {
    ($($name:ident),+) => {
        impl<$($name),+> IntoParams for ($($name,)+)
        where
            $($name: ToSql + Send + Sync + 'static),+
        {
            #[allow(non_snake_case)]
            fn into_params(self) -> Vec<Param> {
                let ($($name,)+) = self;
                vec![$(Param::new($name)),+]
            }
        }
    };
}

impl_into_params_for_tuple!(A);
impl_into_params_for_tuple!(A, B);
impl_into_params_for_tuple!(A, B, C);
impl_into_params_for_tuple!(A, B, C, D);
impl_into_params_for_tuple!(A, B, C, D, E);
impl_into_params_for_tuple!(A, B, C, D, E, F);
impl_into_params_for_tuple!(A, B, C, D, E, F, G);
impl_into_params_for_tuple!(A, B, C, D, E, F, G, H);

/// Build a `Vec<Param>` from a list of values of any `ToSql` types.
///
/// ```ignore
/// qb.and_where("created_at BETWEEN ? AND ?", params![from, to]);
/// qb.where_("status = ?", params!["active"]);
/// ```
#[macro_export]
macro_rules! params {
    () => {
        ::std::vec::Vec::<$crate::Param>::new()
    };
    ($($value:expr),+ $(,)?) => {
        ::std::vec![$($crate::Param::new($value)),+]
    };
}
