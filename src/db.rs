use std::time::Duration;

use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel::RunQueryDsl;

pub type DbPool = Pool<ConnectionManager<PgConnection>>;

pub fn create_pool(database_url: &str) -> DbPool {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder()
        .connection_timeout(Duration::from_secs(10))
        .build(manager)
        .expect("Failed to create database connection pool")
}

/// Spawn a detached task that probes the database every `interval_secs`
/// seconds and logs the outcome together with the pool state. The probe only
/// logs; request handling is unaffected by its result.
pub fn spawn_pool_healthcheck(pool: DbPool, interval_secs: u64) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
        loop {
            ticker.tick().await;
            let pool = pool.clone();
            let outcome = tokio::task::spawn_blocking(move || {
                let mut conn = pool.get()?;
                sql_query("SELECT 1").execute(&mut conn)?;
                Ok::<_, Box<dyn std::error::Error + Send + Sync>>(pool.state())
            })
            .await;

            match outcome {
                Ok(Ok(state)) => log::debug!(
                    "db healthcheck ok (connections: {}, idle: {})",
                    state.connections,
                    state.idle_connections
                ),
                Ok(Err(e)) => log::warn!("db healthcheck failed: {}", e),
                Err(e) => log::warn!("db healthcheck task panicked: {}", e),
            }
        }
    });
}
