//! Backend entry-point: loads configuration, runs migrations, and serves the API.

mod server;
mod settings;

use std::net::SocketAddr;

use actix_web::web;
#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetricsBuilder;
use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use url::Url;

use backend::domain::ports::DepartmentRepository;
use backend::inbound::http::health::HealthState;
use backend::inbound::http::session_config::fingerprint::key_fingerprint;
use backend::inbound::http::session_config::{BuildMode, session_settings_from_env};
use backend::outbound::persistence::{DbPool, DieselDepartmentRepository, PoolConfig};
use server::{ServerConfig, create_server};
use settings::AppSettings;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(std::io::Error::other)?;
    let bind_addr: SocketAddr = settings
        .bind_addr()
        .parse()
        .map_err(std::io::Error::other)?;
    let public_base_url: Url = settings
        .public_base_url()
        .parse()
        .map_err(std::io::Error::other)?;

    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;
    info!(
        fingerprint = %key_fingerprint(&session.key),
        "session key loaded"
    );

    let mut config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        bind_addr,
        public_base_url,
    );

    match settings.database_url {
        Some(database_url) => {
            run_migrations(&database_url)?;
            let pool = DbPool::new(PoolConfig::new(&database_url))
                .await
                .map_err(std::io::Error::other)?;
            seed_departments(&pool).await?;
            config = config.with_db_pool(pool);
        }
        None => warn!("TRIPTRACK_DATABASE_URL not set; serving fixture data"),
    }

    #[cfg(feature = "metrics")]
    {
        config = config.with_metrics(Some(make_metrics()));
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await
}

/// Apply pending embedded migrations over a synchronous connection.
///
/// Runs once before the async pool is built, so blocking here is fine.
fn run_migrations(database_url: &str) -> std::io::Result<()> {
    let mut conn = PgConnection::establish(database_url).map_err(std::io::Error::other)?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    info!(count = applied.len(), "database migrations applied");
    Ok(())
}

/// Insert the default departments, skipping any that already exist.
async fn seed_departments(pool: &DbPool) -> std::io::Result<()> {
    let repository = DieselDepartmentRepository::new(pool.clone());
    let inserted = repository
        .seed_defaults()
        .await
        .map_err(std::io::Error::other)?;
    if inserted > 0 {
        info!(count = inserted, "seeded default departments");
    }
    Ok(())
}

#[cfg(feature = "metrics")]
fn make_metrics() -> actix_web_prom::PrometheusMetrics {
    PrometheusMetricsBuilder::new("triptrack")
        .endpoint("/metrics")
        .build()
        .expect("configure Prometheus metrics")
}
