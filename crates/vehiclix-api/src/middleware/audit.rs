use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

use vehiclix_auth::role::Principal;

/// Audit logging middleware.
///
/// Logs every API request as a structured event using `tracing`, with the
/// caller's identity when the request was authenticated.
pub async fn audit_log(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().path().to_string();

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let user = response
        .extensions()
        .get::<Principal>()
        .map(|p| p.name.clone())
        .unwrap_or_default();
    tracing::info!(
        method = %method,
        path = %uri,
        status = status,
        user = %user,
        "api_request"
    );

    response
}
