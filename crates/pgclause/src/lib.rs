//! # pgclause
//!
//! Clause-by-clause dynamic SQL composition for PostgreSQL.
//!
//! ## Features
//!
//! - **Out-of-order composition**: add WHERE, GROUP BY, ORDER BY, LIMIT, OFFSET
//!   and trailing clauses in any order; `build()` renders them in SQL order
//! - **Placeholder renumbering**: write fragments with `?` and get `$1, $2, ...`
//!   numbered by the order values were bound
//! - **Membership lists**: `where_in("id", ids)` expands to `id IN ($1, $2, ...)`;
//!   an empty list adds nothing
//! - **Execution**: run the result on any [`GenericClient`] (client, pooled client, transaction)
//! - **Config & logging**: TOML/env configuration and `tracing` events for executed SQL
//!
//! ## Example
//!
//! ```ignore
//! use pgclause::{QueryBuilder, SortOrder, params};
//!
//! let mut qb = QueryBuilder::new("SELECT id, name FROM users", ());
//! if let Some(name) = filter.name {
//!     qb.and_where("name ILIKE ?", params![format!("%{name}%")]);
//! }
//! qb.and_where_in("team_id", filter.team_ids)
//!     .order_by("created_at", SortOrder::Desc, ())
//!     .limit(filter.limit);
//!
//! let users: Vec<(i64, String)> = qb.fetch_all_as(&client).await?;
//! ```

pub mod builder;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod param;
pub mod placeholder;
pub mod row;

#[cfg(feature = "pool")]
pub mod pool;

pub use builder::{QueryBuilder, SortOrder, builder};
pub use client::GenericClient;
pub use config::{BuilderConfig, Config, DatabaseConfig, PoolConfig, Recycling};
pub use error::{ClauseError, ClauseResult};
pub use logging::{LogLevel, SqlLogger};
pub use param::{IntoParams, Param};
pub use placeholder::{Dialect, MARKER};
pub use row::{FromRow, RowExt};

#[cfg(feature = "pool")]
pub use pool::{create_pool, create_pool_with_tls};
