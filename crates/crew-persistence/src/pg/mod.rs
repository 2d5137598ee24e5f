//! Postgres: pool r2d2, proveedor de conexiones y `PgJobStore`.
//!
//! Diesel es bloqueante; `PgJobStore` mueve cada operación a
//! `spawn_blocking` para no frenar el runtime de tokio.

mod job_store;

pub use job_store::{fetch_report, insert_report, update_report, PgJobStore, ReportRow};

use diesel::pg::PgConnection;
use diesel::r2d2::{self, ConnectionManager};
use log::{info, warn};

use crate::config::DbConfig;
use crate::error::PersistenceError;
use crate::migrations::run_pending_migrations;

pub type PgPool = r2d2::Pool<ConnectionManager<PgConnection>>;
pub type PgPooledConnection = r2d2::PooledConnection<ConnectionManager<PgConnection>>;

/// Fuente de conexiones; permite inyectar algo distinto a un pool en tests.
pub trait ConnectionProvider: Send + Sync + 'static {
    fn connection(&self) -> Result<PgPooledConnection, PersistenceError>;
}

#[derive(Clone)]
pub struct PoolProvider {
    pub pool: PgPool,
}

impl ConnectionProvider for PoolProvider {
    fn connection(&self) -> Result<PgPooledConnection, PersistenceError> {
        Ok(self.pool.get()?)
    }
}

/// Construye el pool y aplica las migraciones pendientes en el primer
/// checkout.
pub fn build_pool(database_url: &str, min_size: u32, max_size: u32) -> Result<PgPool, PersistenceError> {
    let validated_min = min_size.max(1);
    let validated_max = max_size.max(1);
    if validated_min > validated_max {
        warn!("pool:min_gt_max min={validated_min} max={validated_max}, ajustando min=max");
    }
    let final_min = validated_min.min(validated_max);
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = r2d2::Pool::builder().min_idle(Some(final_min))
                                    .max_size(validated_max)
                                    .build(manager)
                                    .map_err(|e| PersistenceError::TransientIo(format!("pool build: {e}")))?;
    {
        let mut conn = pool.get()?;
        run_pending_migrations(&mut conn)?;
    }
    Ok(pool)
}

pub fn build_pool_from_config(cfg: &DbConfig) -> Result<PgPool, PersistenceError> {
    info!("pool:build url={} min={} max={}",
          cfg.redacted_url(),
          cfg.min_connections,
          cfg.max_connections);
    build_pool(&cfg.url, cfg.min_connections, cfg.max_connections)
}
