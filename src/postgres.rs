//! Shared `PostgreSQL` plumbing for the Diesel adapters.
//!
//! Diesel connections are synchronous, so every adapter funnels its work
//! through [`run_blocking`], which checks a connection out of the r2d2 pool
//! on tokio's blocking thread pool.

use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};

/// `PostgreSQL` connection pool shared by all adapters.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Repository errors that can wrap an arbitrary persistence failure.
pub(crate) trait PersistenceFailure: Sized + Send + 'static {
    /// Wraps a persistence error.
    fn from_persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self;
}

/// Runs a blocking database operation on a pooled connection.
pub(crate) async fn run_blocking<F, T, E>(pool: &PgPool, f: F) -> Result<T, E>
where
    F: FnOnce(&mut PgConnection) -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: PersistenceFailure,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut connection = pool.get().map_err(E::from_persistence)?;
        f(&mut connection)
    })
    .await
    .map_err(E::from_persistence)?
}
