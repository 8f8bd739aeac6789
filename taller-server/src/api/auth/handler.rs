//! Auth API Handlers

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use shared::UserResponse;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{usuario, UserRepository};
use crate::utils::{AppError, AppResult};

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Verify credentials and issue a JWT
///
/// Failures are always the same message so usernames cannot be enumerated.
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let repo = UserRepository::new(state.db.clone());
    let user = repo
        .find_by_username(&payload.username)
        .await?
        .ok_or_else(AppError::invalid_credentials)?;

    if !user.is_active {
        return Err(AppError::invalid_credentials());
    }

    let valid = usuario::verify_password(&user.hash_pass, &payload.password)
        .map_err(|e| AppError::Internal(format!("Password verification failed: {e}")))?;
    if !valid {
        tracing::warn!(target: "security", username = %payload.username, "Failed login attempt");
        return Err(AppError::invalid_credentials());
    }

    let id = user.id.clone().unwrap_or_default();
    let token = state
        .get_jwt_service()
        .generate_token(&id, &user.username, &user.role)
        .map_err(|e| AppError::Internal(format!("Token generation failed: {e}")))?;

    tracing::info!(username = %user.username, "User logged in");
    Ok(Json(LoginResponse {
        token,
        user: user.into(),
    }))
}

/// Current token's user
pub async fn me(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<UserResponse>> {
    let repo = UserRepository::new(state.db.clone());
    let record = repo
        .find_by_id(&user.id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {} not found", user.id)))?;
    Ok(Json(record.into()))
}
