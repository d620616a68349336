//! termtrack server binary.

use termtrack_db::DbManager;
use termtrack_server::{AppState, ServerConfig, build_router};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("termtrack_server=info".parse()?)
                .add_directive("termtrack_db=info".parse()?)
                .add_directive("termtrack_auth=info".parse()?),
        )
        .json()
        .init();

    let config = ServerConfig::from_env();

    let manager = DbManager::connect(&config.db).await?;
    termtrack_db::run_migrations(manager.client()).await?;

    let state = AppState::new(manager.client().clone(), config.auth.clone());
    let app = build_router(state);

    tracing::info!(address = %config.listen_addr, "termtrack server listening");
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
