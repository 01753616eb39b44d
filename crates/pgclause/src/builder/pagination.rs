use super::{QueryBuilder, append_clause};
use crate::error::{ClauseError, ClauseResult};
use crate::param::Param;

impl QueryBuilder {
    /// `LIMIT $n`, bound as the next value.
    ///
    /// The index comes from the values bound at call time, so call this after
    /// every other parameterized clause.
    pub fn limit(&mut self, n: i64) -> &mut Self {
        let clause = self.bound_keyword("LIMIT", n);
        append_clause(&mut self.limit_query, &clause);
        self
    }

    /// `OFFSET $n`, bound as the next value. Same ordering rule as [`limit`](Self::limit).
    pub fn offset(&mut self, n: i64) -> &mut Self {
        let clause = self.bound_keyword("OFFSET", n);
        append_clause(&mut self.offset_query, &clause);
        self
    }

    /// `LIMIT $n OFFSET $m`.
    pub fn limit_offset(&mut self, limit: i64, offset: i64) -> &mut Self {
        self.limit(limit).offset(offset)
    }

    /// Page-based pagination. Pages start at 1.
    ///
    /// Returns an error (and leaves the builder untouched) if `page < 1` or
    /// `per_page < 1`.
    ///
    /// ```ignore
    /// // rows 51..=75
    /// qb.page(3, 25)?;
    /// ```
    pub fn page(&mut self, page: i64, per_page: i64) -> ClauseResult<&mut Self> {
        if page < 1 {
            return Err(ClauseError::Validation(format!(
                "page must be >= 1, got {page}"
            )));
        }
        if per_page < 1 {
            return Err(ClauseError::Validation(format!(
                "per_page must be >= 1, got {per_page}"
            )));
        }
        let offset = (page - 1).checked_mul(per_page).ok_or_else(|| {
            ClauseError::Validation(format!("page {page} x {per_page} overflows i64"))
        })?;
        Ok(self.limit_offset(per_page, offset))
    }

    fn bound_keyword(&mut self, keyword: &str, n: i64) -> String {
        let mut clause = String::with_capacity(keyword.len() + 4);
        clause.push_str(keyword);
        clause.push(' ');
        self.dialect.write_placeholder(&mut clause, self.next_index());
        self.values.push(Param::new(n));
        clause
    }
}
