//! Fiscus API Server
//!
//! Main entry point for the Fiscus home dashboard backend.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fiscus_api::{AppState, create_router};
use fiscus_core::home::{HomeService, HomeServiceProps};
use fiscus_db::{
    DepartmentRepository, IncomeByDepartmentRepository, ProjectedIncomeByDepartmentRepository,
    ProjectedSpendByDepartmentRepository, ProjectedTotalSumRepository, SpendByDepartmentRepository,
    TotalSumRepository, connect,
};
use fiscus_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fiscus=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Connect to database
    let db = connect(&config.database.url).await?;
    info!("Connected to database");

    // Wire the home service to its snapshot stores
    let home = HomeService::new(HomeServiceProps {
        real_totals: Arc::new(TotalSumRepository::new(db.clone())),
        projected_totals: Arc::new(ProjectedTotalSumRepository::new(db.clone())),
        real_incomes: Arc::new(IncomeByDepartmentRepository::new(db.clone())),
        projected_incomes: Arc::new(ProjectedIncomeByDepartmentRepository::new(db.clone())),
        real_spends: Arc::new(SpendByDepartmentRepository::new(db.clone())),
        projected_spends: Arc::new(ProjectedSpendByDepartmentRepository::new(db.clone())),
        departments: Arc::new(DepartmentRepository::new(db)),
    });

    // Create application state
    let state = AppState {
        home: Arc::new(home),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
