use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use vehiclix_api::app;
use vehiclix_api::config::ApiConfig;
use vehiclix_api::state::AppState;
use vehiclix_auth::jwt::TokenValidator;
use vehiclix_reports::dispatcher::ReportDispatcher;
use vehiclix_storage::memory::MemoryStore;
use vehiclix_storage::s3::S3Store;
use vehiclix_storage::store::{FleetStore, ReportStore};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Structured JSON logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    let config = ApiConfig::from_env()?;

    let (reports, fleet) = match &config.bucket {
        Some(bucket) => {
            let s3 = vehiclix_storage::client::build_client().await;
            tracing::info!(bucket = %bucket, "using S3 store");
            stores(S3Store::new(s3, bucket.clone()))
        }
        None => {
            tracing::warn!("VEHICLIX_BUCKET not set, records are kept in memory only");
            stores(MemoryStore::new())
        }
    };

    let dispatcher = Arc::new(ReportDispatcher::start(
        reports,
        fleet.clone(),
        config.dispatcher,
    ));
    dispatcher.recover().await?;

    let state = AppState {
        reports: dispatcher.clone(),
        fleet,
        tokens: Arc::new(TokenValidator::new(
            config.jwt_secret.as_bytes(),
            &config.jwt_issuer,
            &config.jwt_audience,
        )),
    };

    let listener = TcpListener::bind(config.bind).await?;
    tracing::info!(bind = %config.bind, "vehiclix api listening");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    dispatcher.shutdown().await;
    Ok(())
}

fn stores<S>(store: S) -> (Arc<dyn ReportStore>, Arc<dyn FleetStore>)
where
    S: ReportStore + FleetStore + 'static,
{
    let store = Arc::new(store);
    let reports: Arc<dyn ReportStore> = store.clone();
    let fleet: Arc<dyn FleetStore> = store;
    (reports, fleet)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}
