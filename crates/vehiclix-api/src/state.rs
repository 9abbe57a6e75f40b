use std::sync::Arc;

use vehiclix_auth::jwt::TokenValidator;
use vehiclix_reports::dispatcher::ReportDispatcher;
use vehiclix_storage::store::FleetStore;

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub reports: Arc<ReportDispatcher>,
    pub fleet: Arc<dyn FleetStore>,
    pub tokens: Arc<TokenValidator>,
}
