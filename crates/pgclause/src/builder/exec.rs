use super::QueryBuilder;
use crate::client::GenericClient;
use crate::error::{ClauseError, ClauseResult};
use crate::placeholder::Dialect;
use crate::row::FromRow;
use tokio_postgres::Row;
use tokio_postgres::types::{FromSql, ToSql};

impl QueryBuilder {
    /// Render, verify and log the statement before it is sent.
    fn prepare(&self) -> ClauseResult<(String, Vec<&(dyn ToSql + Sync)>)> {
        if self.dialect != Dialect::Dollar {
            return Err(ClauseError::Validation(format!(
                "QueryBuilder: {} placeholders cannot be executed against PostgreSQL",
                self.dialect
            )));
        }

        let sql = self.build();
        self.check_sql(&sql)?;
        self.logger
            .log_statement(self.tag.as_deref(), &sql, self.values.len());
        Ok((sql, self.params_ref()))
    }

    /// Execute the built SQL and return all rows.
    pub async fn fetch_all(&self, conn: &impl GenericClient) -> ClauseResult<Vec<Row>> {
        let (sql, params) = self.prepare()?;
        conn.query(&sql, &params).await
    }

    /// Execute the built SQL and return all rows mapped to `T`.
    pub async fn fetch_all_as<T: FromRow>(&self, conn: &impl GenericClient) -> ClauseResult<Vec<T>> {
        let rows = self.fetch_all(conn).await?;
        rows.iter().map(T::from_row).collect()
    }

    /// Execute the built SQL and return the **first** row.
    pub async fn fetch_one(&self, conn: &impl GenericClient) -> ClauseResult<Row> {
        let (sql, params) = self.prepare()?;
        conn.query_one(&sql, &params).await
    }

    /// Execute the built SQL and return the **first** row mapped to `T`.
    pub async fn fetch_one_as<T: FromRow>(&self, conn: &impl GenericClient) -> ClauseResult<T> {
        let row = self.fetch_one(conn).await?;
        T::from_row(&row)
    }

    /// Execute and require **exactly one** row.
    pub async fn fetch_one_strict(&self, conn: &impl GenericClient) -> ClauseResult<Row> {
        let (sql, params) = self.prepare()?;
        conn.query_one_strict(&sql, &params).await
    }

    /// Execute the built SQL and return the first row, if any.
    pub async fn fetch_opt(&self, conn: &impl GenericClient) -> ClauseResult<Option<Row>> {
        let (sql, params) = self.prepare()?;
        conn.query_opt(&sql, &params).await
    }

    /// Execute the built SQL and return at most one row mapped to `T`.
    pub async fn fetch_opt_as<T: FromRow>(
        &self,
        conn: &impl GenericClient,
    ) -> ClauseResult<Option<T>> {
        let row = self.fetch_opt(conn).await?;
        row.as_ref().map(T::from_row).transpose()
    }

    /// Execute and return exactly one scalar value from column 0.
    pub async fn fetch_scalar_one<T>(&self, conn: &impl GenericClient) -> ClauseResult<T>
    where
        T: for<'a> FromSql<'a> + Send + Sync,
    {
        let row = self.fetch_one(conn).await?;
        row.try_get(0)
            .map_err(|e| ClauseError::decode("0", e.to_string()))
    }

    /// Execute the built SQL and return affected row count.
    pub async fn execute(&self, conn: &impl GenericClient) -> ClauseResult<u64> {
        let (sql, params) = self.prepare()?;
        conn.execute(&sql, &params).await
    }
}
