//! Clause-oriented dynamic SQL builder.
//!
//! A [`QueryBuilder`] keeps one text slot per clause (base, WHERE, GROUP BY,
//! ORDER BY, LIMIT, OFFSET, tail) plus the ordered list of bound values.
//! Clauses may be added in any order; [`QueryBuilder::build`] always renders
//! them in SQL order.
//!
//! Fragments use `?` as an unnumbered marker. When a fragment is added, its
//! markers are renumbered starting at `values().len() + 1`, so placeholder
//! indices follow the order in which values were bound.
//!
//! # Example
//!
//! ```ignore
//! use pgclause::{QueryBuilder, SortOrder, params};
//!
//! let mut qb = QueryBuilder::new("SELECT id, name FROM users", ());
//! qb.where_("status = ?", params!["active"])
//!     .and_where_in("role", ["admin", "owner"])
//!     .order_by("created_at", SortOrder::Desc, ())
//!     .limit(20);
//!
//! assert_eq!(
//!     qb.build(),
//!     "SELECT id, name FROM users WHERE status = $1 AND role IN ($2, $3) \
//!      ORDER BY created_at DESC LIMIT $4"
//! );
//! ```
//!
//! `limit` and `offset` take their index from the values bound *so far*; call
//! them after every other parameterized clause.

mod exec;
mod pagination;
mod secondary;
mod where_clause;


pub use secondary::SortOrder;

use crate::error::{ClauseError, ClauseResult};
use crate::logging::SqlLogger;
use crate::param::{IntoParams, Param};
use crate::placeholder::{self, Dialect};
use tokio_postgres::types::ToSql;

/// A mutable, append-only SQL statement under construction.
#[derive(Clone)]
#[must_use]
pub struct QueryBuilder {
    base_query: String,
    where_query: String,
    group_by_query: String,
    order_by_query: String,
    limit_query: String,
    offset_query: String,
    tail_query: String,
    values: Vec<Param>,
    dialect: Dialect,
    tag: Option<String>,
    logger: SqlLogger,
}

/// Start a builder from a base statement with no initial values.
pub fn builder(query: impl Into<String>) -> QueryBuilder {
    QueryBuilder::new(query, ())
}

impl QueryBuilder {
    /// Create a builder from a base statement and its values.
    ///
    /// Markers in `query` are numbered from 1.
    pub fn new(query: impl Into<String>, values: impl IntoParams) -> Self {
        Self::with_dialect(Dialect::default(), query, values)
    }

    /// Create a builder that renders placeholders in `dialect`.
    pub fn with_dialect(
        dialect: Dialect,
        query: impl Into<String>,
        values: impl IntoParams,
    ) -> Self {
        let query = query.into();
        let values = values.into_params();
        let base_query = placeholder::renumber(&query, 1, values.len(), dialect);
        Self {
            base_query,
            where_query: String::new(),
            group_by_query: String::new(),
            order_by_query: String::new(),
            limit_query: String::new(),
            offset_query: String::new(),
            tail_query: String::new(),
            values,
            dialect,
            tag: None,
            logger: SqlLogger::default(),
        }
    }

    /// Replace the statement logger used by the execution helpers.
    pub fn with_logger(mut self, logger: SqlLogger) -> Self {
        self.logger = logger;
        self
    }

    /// Associate a tag for logging.
    pub fn tag(&mut self, tag: impl Into<String>) -> &mut Self {
        self.tag = Some(tag.into());
        self
    }

    /// The placeholder dialect fixed at construction.
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Index the next bound value will receive.
    ///
    /// Always derived from the live value count.
    pub fn next_index(&self) -> usize {
        self.values.len() + 1
    }

    /// Renumber `query` from [`next_index`](Self::next_index) and bind `values`.
    pub(crate) fn bind_fragment(&mut self, query: &str, values: Vec<Param>) -> String {
        let query = placeholder::renumber(query, self.next_index(), values.len(), self.dialect);
        self.values.extend(values);
        query
    }

    /// Extend the base statement with another fragment.
    pub fn append_base_query(&mut self, query: &str, values: impl IntoParams) -> &mut Self {
        let query = self.bind_fragment(query, values.into_params());
        append_clause(&mut self.base_query, &query);
        self
    }

    /// Bind values without adding any text.
    ///
    /// The caller is responsible for matching placeholders already present in
    /// the text.
    pub fn append_values(&mut self, values: impl IntoParams) -> &mut Self {
        self.values.extend(values.into_params());
        self
    }

    /// Bind one value without adding any text.
    pub fn append_value<T>(&mut self, value: T) -> &mut Self
    where
        T: ToSql + Send + Sync + 'static,
    {
        self.values.push(Param::new(value));
        self
    }

    /// Append trailing SQL (`FOR UPDATE`, `RETURNING id`, ...).
    ///
    /// Rendered after every other clause regardless of call order.
    pub fn ends_with(&mut self, query: &str) -> &mut Self {
        append_clause(&mut self.tail_query, query);
        self
    }

    /// Render the statement: base, WHERE, GROUP BY, ORDER BY, LIMIT, OFFSET, tail.
    ///
    /// Empty clauses are skipped and clauses are joined by a single space.
    pub fn build(&self) -> String {
        let parts = [
            &self.base_query,
            &self.where_query,
            &self.group_by_query,
            &self.order_by_query,
            &self.limit_query,
            &self.offset_query,
            &self.tail_query,
        ];

        let cap = parts.iter().map(|p| p.len() + 1).sum();
        let mut out = String::with_capacity(cap);
        for part in parts {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(part);
        }
        out
    }

    /// Bound values, in placeholder order.
    pub fn values(&self) -> &[Param] {
        &self.values
    }

    /// Parameter refs compatible with `tokio-postgres`.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.values.iter().map(Param::as_sql).collect()
    }

    /// Consume the builder into its statement text and values.
    pub fn into_parts(self) -> (String, Vec<Param>) {
        let sql = self.build();
        (sql, self.values)
    }

    /// The accumulated WHERE text (empty until the first predicate).
    pub fn where_query(&self) -> &str {
        &self.where_query
    }

    /// Indices referenced by [`build`](Self::build), in textual order.
    ///
    /// `None` for [`Dialect::Question`].
    pub fn placeholder_indices(&self) -> Option<Vec<usize>> {
        placeholder::placeholder_indices(&self.build(), self.dialect)
    }

    /// Whether placeholders read left to right are exactly `1..=values().len()`.
    ///
    /// This is false after `limit`/`offset` were called before a later
    /// parameterized clause, even though `$N` drivers still bind correctly.
    pub fn is_sequential(&self) -> bool {
        match self.placeholder_indices() {
            Some(indices) => indices.iter().copied().eq(1..=self.values.len()),
            None => true,
        }
    }

    /// Verify that every bound value is referenced and no reference is out of range.
    pub fn check_placeholders(&self) -> ClauseResult<()> {
        self.check_sql(&self.build())
    }

    pub(crate) fn check_sql(&self, sql: &str) -> ClauseResult<()> {
        let Some(indices) = placeholder::placeholder_indices(sql, self.dialect) else {
            return Ok(());
        };

        let n = self.values.len();
        let mut seen = vec![false; n];
        for idx in indices {
            if idx == 0 || idx > n {
                return Err(ClauseError::validation(format!(
                    "QueryBuilder: placeholder {} references no value ({n} bound)",
                    self.dialect.placeholder(idx)
                )));
            }
            seen[idx - 1] = true;
        }

        if let Some(missing) = seen.iter().position(|s| !s) {
            return Err(ClauseError::validation(format!(
                "QueryBuilder: value {} is bound but {} does not appear in the statement",
                missing + 1,
                self.dialect.placeholder(missing + 1)
            )));
        }
        Ok(())
    }
}

impl std::fmt::Debug for QueryBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryBuilder")
            .field("sql", &self.build())
            .field("values", &self.values)
            .field("dialect", &self.dialect)
            .field("tag", &self.tag)
            .finish()
    }
}

/// Append `text` to a clause slot, separated by one space from prior content.
fn append_clause(slot: &mut String, text: &str) {
    if text.is_empty() {
        return;
    }
    if !slot.is_empty() {
        slot.push(' ');
    }
    slot.push_str(text);
}
