use super::QueryBuilder;
use crate::param::{IntoParams, Param};
use crate::placeholder;
use tokio_postgres::types::ToSql;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Connective {
    Where,
    And,
    Or,
}

impl Connective {
    fn keyword(self) -> &'static str {
        match self {
            Connective::Where => "WHERE",
            Connective::And => "AND",
            Connective::Or => "OR",
        }
    }
}

impl QueryBuilder {
    /// Write a predicate into the WHERE slot.
    ///
    /// An empty slot always gets `WHERE <predicate>`; a populated one gets the
    /// connective's keyword. `Where` on a populated slot appends a second
    /// `WHERE`, which is the caller's mistake to avoid.
    fn push_predicate(&mut self, connective: Connective, predicate: &str) {
        if self.where_query.is_empty() {
            self.where_query.push_str("WHERE ");
        } else {
            self.where_query.push(' ');
            self.where_query.push_str(connective.keyword());
            self.where_query.push(' ');
        }
        self.where_query.push_str(predicate);
    }

    fn push_where(&mut self, connective: Connective, query: &str, values: Vec<Param>) -> &mut Self {
        let predicate = self.bind_fragment(query, values);
        self.push_predicate(connective, &predicate);
        self
    }

    /// Bind `elements` and write a membership predicate.
    ///
    /// Zero elements leave both the WHERE text and the values untouched.
    fn push_membership<T, I>(
        &mut self,
        connective: Option<Connective>,
        column: &str,
        negated: bool,
        elements: I,
    ) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: ToSql + Send + Sync + 'static,
    {
        let params: Vec<Param> = elements.into_iter().map(Param::new).collect();
        if params.is_empty() {
            return self;
        }

        let predicate = placeholder::membership(
            column,
            negated,
            self.next_index(),
            params.len(),
            self.dialect,
        );
        self.values.extend(params);

        match connective {
            Some(connective) => self.push_predicate(connective, &predicate),
            None => self.where_query.push_str(&predicate),
        }
        self
    }

    /// Splice raw connective or grouping text into the WHERE slot.
    ///
    /// The leading space of `text` is dropped when the slot is empty or
    /// already ends in whitespace or `(`.
    fn splice_where(&mut self, text: &str) -> &mut Self {
        let text = if self.where_query.is_empty()
            || self.where_query.ends_with(char::is_whitespace)
            || self.where_query.ends_with('(')
        {
            text.trim_start()
        } else {
            text
        };
        self.where_query.push_str(text);
        self
    }

    /// `WHERE <query>`.
    ///
    /// ```ignore
    /// qb.where_("email = ? AND deleted_at IS NULL", params![email]);
    /// ```
    pub fn where_(&mut self, query: &str, values: impl IntoParams) -> &mut Self {
        self.push_where(Connective::Where, query, values.into_params())
    }

    /// `AND <query>`, or `WHERE <query>` when no predicate exists yet.
    pub fn and_where(&mut self, query: &str, values: impl IntoParams) -> &mut Self {
        self.push_where(Connective::And, query, values.into_params())
    }

    /// `OR <query>`, or `WHERE <query>` when no predicate exists yet.
    pub fn or_where(&mut self, query: &str, values: impl IntoParams) -> &mut Self {
        self.push_where(Connective::Or, query, values.into_params())
    }

    /// Bare `column IN (...)` with no connective, for use after [`and`](Self::and)/[`or`](Self::or).
    pub fn in_list<T, I>(&mut self, column: &str, elements: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: ToSql + Send + Sync + 'static,
    {
        self.push_membership(None, column, false, elements)
    }

    /// Bare `column NOT IN (...)` with no connective.
    pub fn not_in<T, I>(&mut self, column: &str, elements: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: ToSql + Send + Sync + 'static,
    {
        self.push_membership(None, column, true, elements)
    }

    /// `WHERE column IN (...)`.
    pub fn where_in<T, I>(&mut self, column: &str, elements: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: ToSql + Send + Sync + 'static,
    {
        self.push_membership(Some(Connective::Where), column, false, elements)
    }

    /// `WHERE column NOT IN (...)`.
    pub fn where_not_in<T, I>(&mut self, column: &str, elements: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: ToSql + Send + Sync + 'static,
    {
        self.push_membership(Some(Connective::Where), column, true, elements)
    }

    /// `AND column IN (...)`.
    pub fn and_where_in<T, I>(&mut self, column: &str, elements: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: ToSql + Send + Sync + 'static,
    {
        self.push_membership(Some(Connective::And), column, false, elements)
    }

    /// `OR column IN (...)`.
    pub fn or_where_in<T, I>(&mut self, column: &str, elements: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: ToSql + Send + Sync + 'static,
    {
        self.push_membership(Some(Connective::Or), column, false, elements)
    }

    /// `AND column NOT IN (...)`.
    pub fn and_where_not_in<T, I>(&mut self, column: &str, elements: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: ToSql + Send + Sync + 'static,
    {
        self.push_membership(Some(Connective::And), column, true, elements)
    }

    /// `OR column NOT IN (...)`.
    pub fn or_where_not_in<T, I>(&mut self, column: &str, elements: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: ToSql + Send + Sync + 'static,
    {
        self.push_membership(Some(Connective::Or), column, true, elements)
    }

    /// Raw predicate text with renumbered markers and no connective.
    ///
    /// Pair with [`and`](Self::and), [`or`](Self::or) and the wrap helpers to
    /// build nested groups by hand.
    pub fn condition(&mut self, query: &str, values: impl IntoParams) -> &mut Self {
        let query = self.bind_fragment(query, values.into_params());
        self.where_query.push_str(&query);
        self
    }

    /// Whether any WHERE text has been written.
    pub fn has_where_query(&self) -> bool {
        !self.where_query.is_empty()
    }

    /// Splice ` AND `.
    pub fn and(&mut self) -> &mut Self {
        self.splice_where(" AND ")
    }

    /// Splice ` OR `.
    pub fn or(&mut self) -> &mut Self {
        self.splice_where(" OR ")
    }

    /// Splice ` (`.
    pub fn open_wrap(&mut self) -> &mut Self {
        self.splice_where(" (")
    }

    /// Splice `)`.
    pub fn close_wrap(&mut self) -> &mut Self {
        self.where_query.push(')');
        self
    }
}
