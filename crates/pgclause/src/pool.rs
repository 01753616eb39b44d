//! Connection pool utilities

use crate::config::{DatabaseConfig, PoolConfig, Recycling};
use crate::error::{ClauseError, ClauseResult};
use deadpool_postgres::{Manager, ManagerConfig, Pool, PoolBuilder, RecyclingMethod, Runtime};
use tokio_postgres::NoTls;
use tokio_postgres::Socket;
use tokio_postgres::tls::{MakeTlsConnect, TlsConnect};

/// Create a connection pool from [`DatabaseConfig`] without TLS.
///
/// # Example
///
/// ```ignore
/// let config = pgclause::Config::from_env()?;
/// let pool = pgclause::create_pool(&config.database)?;
/// let client = pool.get().await?;
/// ```
pub fn create_pool(config: &DatabaseConfig) -> ClauseResult<Pool> {
    create_pool_with_tls(config, NoTls)
}

/// Create a connection pool using a custom TLS connector.
pub fn create_pool_with_tls<T>(config: &DatabaseConfig, tls: T) -> ClauseResult<Pool>
where
    T: MakeTlsConnect<Socket> + Clone + Sync + Send + 'static,
    T::Stream: Sync + Send,
    T::TlsConnect: Sync + Send,
    <T::TlsConnect as TlsConnect<Socket>>::Future: Send,
{
    let pg_config: tokio_postgres::Config = config
        .url
        .parse()
        .map_err(|e: tokio_postgres::Error| ClauseError::Connection(e.to_string()))?;

    let mgr = Manager::from_config(pg_config, tls, manager_config(&config.pool));
    configure_pool(Pool::builder(mgr), &config.pool)
        .build()
        .map_err(|e| ClauseError::Pool(e.to_string()))
}

fn manager_config(pool: &PoolConfig) -> ManagerConfig {
    let recycling_method = match pool.recycling {
        Recycling::Fast => RecyclingMethod::Fast,
        Recycling::Verified => RecyclingMethod::Verified,
    };
    ManagerConfig { recycling_method }
}

fn configure_pool(builder: PoolBuilder, pool: &PoolConfig) -> PoolBuilder {
    builder
        .max_size(pool.max_size)
        .wait_timeout(pool.wait_timeout())
        .create_timeout(pool.create_timeout())
        .recycle_timeout(pool.recycle_timeout())
        .runtime(Runtime::Tokio1)
}
