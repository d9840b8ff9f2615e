use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::warn;
use uuid::Uuid;

use crate::{auth::jwt::JwtKeys, employees::repo::User, state::AppState};

/// Identity resolved from a verified token, attached to request extensions.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub username: String,
    pub roles: Vec<String>,
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "Unauthorized" })),
    )
        .into_response()
}

/// Authentication gate: bearer token -> verified claims -> store lookup.
///
/// Every request re-resolves the user; a token whose subject no longer exists
/// is rejected the same way as an invalid one.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = bearer_token(&req).ok_or_else(unauthorized)?;

    let keys = JwtKeys::from(&state.config.jwt);
    let claims = keys.verify(token).map_err(|e| {
        warn!(error = %e, "token verification failed");
        unauthorized()
    })?;

    let user = User::find_by_id(&state.db, claims.sub)
        .await
        .map_err(|e| {
            warn!(error = %e, "user lookup failed during authentication");
            unauthorized()
        })?
        .ok_or_else(|| {
            warn!(user_id = %claims.sub, "token subject no longer exists");
            unauthorized()
        })?;

    req.extensions_mut().insert(CurrentUser {
        id: user.id,
        username: user.username,
        roles: user.roles,
    });
    Ok(next.run(req).await)
}

fn bearer_token(req: &Request) -> Option<&str> {
    req.headers()
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Authorization gate: admits iff the identity holds ANY of the required roles.
///
/// Assumes `authenticate` already ran; a request with no attached identity is
/// treated as unauthenticated rather than forbidden.
pub async fn require_roles(
    required: &'static [&'static str],
    req: Request,
    next: Next,
) -> Response {
    let Some(user) = req.extensions().get::<CurrentUser>() else {
        return unauthorized();
    };
    if !intersects(&user.roles, required) {
        warn!(username = %user.username, ?required, "access denied");
        return (
            StatusCode::FORBIDDEN,
            Json(json!({ "message": "Access Denied" })),
        )
            .into_response();
    }
    next.run(req).await
}

/// Pure role-set check used by the authorization gate.
pub fn intersects(user_roles: &[String], required: &[&str]) -> bool {
    required.iter().any(|r| user_roles.iter().any(|u| u == r))
}
