use super::{QueryBuilder, append_clause};
use crate::param::IntoParams;

/// Sort direction for [`QueryBuilder::order_by`].
///
/// Any `AsRef<str>` token is accepted too (`"DESC NULLS LAST"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl AsRef<str> for SortOrder {
    fn as_ref(&self) -> &str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

fn order_term(expr: &str, direction: &str) -> String {
    let direction = direction.trim();
    if direction.is_empty() {
        expr.to_string()
    } else {
        format!("{expr} {direction}")
    }
}

impl QueryBuilder {
    /// `GROUP BY <expr>`.
    pub fn group_by(&mut self, expr: &str) -> &mut Self {
        append_clause(&mut self.group_by_query, &format!("GROUP BY {expr}"));
        self
    }

    /// `, <expr>` onto an existing GROUP BY, or [`group_by`](Self::group_by) when there is none.
    pub fn add_group_by(&mut self, expr: &str) -> &mut Self {
        if !self.has_group_by_query() {
            return self.group_by(expr);
        }
        self.group_by_query.push_str(", ");
        self.group_by_query.push_str(expr);
        self
    }

    /// Whether a GROUP BY has been written.
    pub fn has_group_by_query(&self) -> bool {
        !self.group_by_query.is_empty()
    }

    /// `ORDER BY <expr> <direction>`.
    ///
    /// `expr` may carry `?` markers (e.g. a ranking expression); `values`
    /// bind to them.
    ///
    /// ```ignore
    /// qb.order_by("similarity(name, ?)", SortOrder::Desc, params![term]);
    /// ```
    pub fn order_by(
        &mut self,
        expr: &str,
        direction: impl AsRef<str>,
        values: impl IntoParams,
    ) -> &mut Self {
        let expr = self.bind_fragment(expr, values.into_params());
        let term = order_term(&expr, direction.as_ref());
        append_clause(&mut self.order_by_query, &format!("ORDER BY {term}"));
        self
    }

    /// `, <expr> <direction>` onto an existing ORDER BY, or
    /// [`order_by`](Self::order_by) when there is none.
    pub fn add_order_by(
        &mut self,
        expr: &str,
        direction: impl AsRef<str>,
        values: impl IntoParams,
    ) -> &mut Self {
        if !self.has_order_by_query() {
            return self.order_by(expr, direction, values);
        }
        let expr = self.bind_fragment(expr, values.into_params());
        self.order_by_query.push_str(", ");
        self.order_by_query
            .push_str(&order_term(&expr, direction.as_ref()));
        self
    }

    /// Whether an ORDER BY has been written.
    pub fn has_order_by_query(&self) -> bool {
        !self.order_by_query.is_empty()
    }
}
