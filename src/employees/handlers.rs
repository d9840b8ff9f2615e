use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{
        jwt::JwtKeys,
        password::{hash_password, verify_password},
    },
    employees::{
        dto::{LoginRequest, MessageResponse, RegisterRequest, TokenResponse, UpdateRequest},
        repo::User,
    },
    error::ApiError,
    state::AppState,
};

const DEFAULT_ROLES: &[&str] = &["Employee"];

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let Some(password) = payload.password.as_deref().filter(|p| !p.is_empty()) else {
        warn!("registration rejected: missing password");
        return Err(ApiError::Validation("Password is required".into()));
    };
    let Some(username) = payload.username.as_deref().filter(|u| !u.is_empty()) else {
        warn!("registration rejected: missing username");
        return Err(ApiError::Validation("Username is required".into()));
    };

    let hash = hash_password(password).map_err(ApiError::Internal)?;
    let roles = payload
        .roles
        .unwrap_or_else(|| DEFAULT_ROLES.iter().map(|r| r.to_string()).collect());

    let user = User::create(&state.db, username, &hash, payload.email.as_deref(), &roles).await?;

    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Registration successful")),
    ))
}

/// Unknown usernames and wrong passwords answer identically, so the endpoint
/// cannot be used to probe which accounts exist.
#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let username = payload.username.as_deref().filter(|u| !u.is_empty());
    let password = payload.password.as_deref().filter(|p| !p.is_empty());
    let (Some(username), Some(password)) = (username, password) else {
        warn!("login rejected: missing credentials");
        return Err(ApiError::Validation("Password & username is required".into()));
    };

    let user = User::find_by_username(&state.db, username)
        .await?
        .ok_or(ApiError::CredentialsInvalid)?;

    if !verify_password(password, &user.password_hash) {
        warn!(username = %user.username, "login rejected: password mismatch");
        return Err(ApiError::CredentialsInvalid);
    }

    let keys = JwtKeys::from(&state.config.jwt);
    let token = keys
        .sign(user.id, &user.username, &user.roles)
        .map_err(ApiError::Internal)?;

    info!(user_id = %user.id, username = %user.username, "user logged in");
    Ok(Json(TokenResponse { token }))
}

#[instrument(skip(state))]
pub async fn list_employees(
    State(state): State<AppState>,
) -> Result<Json<Vec<User>>, ApiError> {
    let employees = User::list_all(&state.db).await?;
    Ok(Json(employees))
}

/// An absent record answers 200 with a `null` body; only a malformed id is 404.
#[instrument(skip(state))]
pub async fn view_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Option<User>>, ApiError> {
    let Ok(id) = Uuid::parse_str(&id) else {
        return Err(ApiError::MalformedId(id));
    };
    let employee = User::find_by_id(&state.db, id).await?;
    Ok(Json(employee))
}

#[instrument(skip(state, payload))]
pub async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateRequest>,
) -> Result<Json<Option<User>>, ApiError> {
    let Ok(id) = Uuid::parse_str(&id) else {
        return Err(ApiError::MalformedId(id));
    };

    // password is persisted as submitted; register is the only hashing path
    let updated = User::update(
        &state.db,
        id,
        payload.username.as_deref(),
        payload.password.as_deref(),
        payload.email.as_deref(),
        payload.roles,
    )
    .await?;

    if let Some(user) = &updated {
        info!(user_id = %user.id, "employee updated");
    }
    Ok(Json(updated))
}

#[instrument(skip(state))]
pub async fn delete_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let parsed = Uuid::parse_str(&id)
        .map_err(|_| ApiError::Validation(format!("invalid employee id: {id}")))?;

    let removed = User::delete(&state.db, parsed).await?;
    if removed == 0 {
        return Err(ApiError::NotFound(format!("No employee with id: {id}")));
    }

    info!(user_id = %parsed, "employee deleted");
    Ok(Json(MessageResponse::new("Employee deleted successfully")))
}
