use credit_risk_dashboard::config::Config;
use credit_risk_dashboard::handlers::{self, AppState};
use credit_risk_dashboard::reference::ReferenceTable;
use credit_risk_dashboard::scoring_client::ScoringClient;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the application.
///
/// This function initializes the application, including:
/// - Logging and tracing.
/// - Configuration loading.
/// - The reference identifier table.
/// - The scoring API client.
///
/// It then starts the Axum server on a single-threaded runtime.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "credit_risk_dashboard=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!("Configuration loaded successfully");

    let reference = ReferenceTable::from_csv_path(&config.reference_dataset_path)?;
    if reference.is_empty() {
        tracing::warn!("Reference dataset is empty: every identifier will be rejected");
    }

    let scoring_client = ScoringClient::new(config.scoring_api_base_url.clone())?;
    tracing::info!("✓ Scoring client initialized: {}", scoring_client.base_url());

    let app_state = Arc::new(AppState {
        reference: Arc::new(reference),
        scoring_client,
    });

    let app = handlers::router(app_state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Dashboard listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
