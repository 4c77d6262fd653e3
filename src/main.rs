use actix_web::HttpServer;
use anyhow::Context;
use revtrack::config::Config;
use revtrack::{build_app, AppState, Repositories};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;

    init_tracing(&config);

    config.validate().context("Configuration validation failed")?;

    tracing::info!("Starting revtrack");
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!("Server binding to: {}", config.server.bind_address());

    let repositories = match &config.database {
        Some(database) => {
            let pool = database
                .create_pool()
                .await
                .context("Failed to create database pool")?;

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run database migrations")?;

            tracing::info!(
                "Database pool initialized ({} connections)",
                database.pool_size
            );
            Repositories::mysql(pool)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory storage");
            Repositories::in_memory()
        }
    };

    let state = AppState::new(&config, repositories)?;
    state
        .bootstrap_admin(&config)
        .await
        .context("Failed to create bootstrap admin")?;

    let bind_address = config.server.bind_address();
    let server = HttpServer::new(move || build_app(state.clone()))
        .workers(config.server.workers)
        .bind(&bind_address)?
        .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await?;
    Ok(())
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("revtrack={},actix_web=info", config.app.log_level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);

    if config.app.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
