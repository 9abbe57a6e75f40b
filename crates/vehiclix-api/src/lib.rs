//! vehiclix-api
//!
//! HTTP surface for report generation and the fleet records the reports
//! summarize.

pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::Router;
use axum::middleware as axum_mw;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};

use state::AppState;

/// Build the application router. Everything under `/api` requires a bearer
/// token; `/health` does not.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        // Reports
        .route(
            "/api/report",
            get(routes::reports::list_reports).post(routes::reports::create_report),
        )
        .route("/api/report/{id}", get(routes::reports::get_report))
        .route(
            "/api/report/{id}/export",
            post(routes::reports::export_report),
        )
        // Vehicles
        .route(
            "/api/vehicle",
            get(routes::vehicles::list_vehicles).post(routes::vehicles::create_vehicle),
        )
        .route(
            "/api/vehicle/{id}",
            get(routes::vehicles::get_vehicle)
                .put(routes::vehicles::update_vehicle)
                .delete(routes::vehicles::delete_vehicle),
        )
        // Claims
        .route(
            "/api/claim",
            get(routes::claims::list_claims).post(routes::claims::create_claim),
        )
        .route(
            "/api/claim/{id}",
            get(routes::claims::get_claim)
                .put(routes::claims::update_claim)
                .delete(routes::claims::delete_claim),
        )
        .route(
            "/api/claim/vehicle/{vehicle_id}",
            get(routes::claims::list_vehicle_claims),
        )
        // Fines
        .route(
            "/api/fine",
            get(routes::fines::list_fines).post(routes::fines::create_fine),
        )
        .route(
            "/api/fine/{id}",
            get(routes::fines::get_fine)
                .put(routes::fines::update_fine)
                .delete(routes::fines::delete_fine),
        )
        .route(
            "/api/fine/vehicle/{vehicle_id}",
            get(routes::fines::list_vehicle_fines),
        )
        .route_layer(axum_mw::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        .route("/health", get(routes::health::health_check))
        .merge(api)
        .layer(axum_mw::from_fn(middleware::audit::audit_log))
        .layer(cors)
        .with_state(state)
}
