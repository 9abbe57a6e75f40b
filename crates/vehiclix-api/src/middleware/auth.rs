use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;

use vehiclix_auth::error::AuthError;
use vehiclix_auth::jwt::bearer_token;

use crate::error::ApiError;
use crate::state::AppState;

/// JWT validation middleware.
///
/// Extracts the `Authorization: Bearer <token>` header and validates the JWT.
/// On success, inserts the `Principal` into request extensions for handlers
/// to use, and copies it onto the response for the audit log.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let principal = {
        let header = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AuthError::MissingToken)?;

        state.tokens.validate(bearer_token(header)?)?
    };

    req.extensions_mut().insert(principal.clone());

    let mut response = next.run(req).await;
    response.extensions_mut().insert(principal);
    Ok(response)
}
