pub mod app;
pub mod error;
pub mod handlers;
pub mod identity;

use anyhow::Result;
use tracing::info;

use crate::config::AppConfig;
use crate::database::connection::*;

pub async fn start_server(config: AppConfig) -> Result<()> {
    let location = get_store_location(Some(&config.store.path));
    let db = establish_connection(&location).await?;
    match &location {
        StoreLocation::Memory => info!("Using in-memory store; data is lost on shutdown"),
        StoreLocation::File(path) => info!("Using store file {}", path.display()),
    }

    let state = app::AppState::new(db, config.limits);
    let app = app::create_app(state, config.server.cors_origin.as_deref())?;

    log_routes();

    let port = config.server.port;
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    info!("Server running on http://0.0.0.0:{}", port);

    axum::serve(listener, app).await?;

    Ok(())
}

fn log_routes() {
    info!("API Endpoints:");
    info!("  /health                              - Health check");
    info!("  /api/v1/journey-plans[/:id]          - Journey plans (admin)");
    info!("  /api/v1/journey-plans/my[/active]    - Own plans (supervisor)");
    info!("  /api/v1/sales[/summary/*|/highlights] - Sales queries (admin)");
    info!("  /api/v1/sales/my[/summary]           - Record and review own sales (employee)");
    info!("  /api/v1/admin/*                      - Users and dashboard stats (admin)");
}
