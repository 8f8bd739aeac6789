//! User API Handlers

use axum::{
    extract::{Path, State},
    Json,
};
use shared::{SyncAction, UserCreate, UserResponse, UserUpdate};

use crate::core::ServerState;
use crate::db::repository::UserRepository;
use crate::utils::validation::{validate_required_text, MAX_NAME_LEN, MAX_PASSWORD_LEN};
use crate::utils::{AppError, AppResult};

const RESOURCE: &str = "usuario";

/// List all users
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<UserResponse>>> {
    let repo = UserRepository::new(state.db.clone());
    let users = repo.find_all().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Get user by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<UserResponse>> {
    let repo = UserRepository::new(state.db.clone());
    let user = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {} not found", id)))?;
    Ok(Json(user.into()))
}

/// Create a new user
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<UserCreate>,
) -> AppResult<Json<UserResponse>> {
    validate_required_text(&payload.username, "username", MAX_NAME_LEN)?;
    validate_required_text(&payload.password, "password", MAX_PASSWORD_LEN)?;

    let repo = UserRepository::new(state.db.clone());
    let user = repo.create(payload).await?;
    let response = UserResponse::from(user);

    state.broadcast_sync(RESOURCE, SyncAction::Created, &response.id, Some(&response));
    Ok(Json(response))
}

/// Update a user
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<UserUpdate>,
) -> AppResult<Json<UserResponse>> {
    if let Some(ref username) = payload.username {
        validate_required_text(username, "username", MAX_NAME_LEN)?;
    }
    if let Some(ref password) = payload.password {
        validate_required_text(password, "password", MAX_PASSWORD_LEN)?;
    }

    let repo = UserRepository::new(state.db.clone());
    let user = repo.update(&id, payload).await?;
    let response = UserResponse::from(user);

    state.broadcast_sync(RESOURCE, SyncAction::Updated, &id, Some(&response));
    Ok(Json(response))
}

/// Delete a user
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = UserRepository::new(state.db.clone());
    let deleted = repo.delete(&id).await?;

    state.broadcast_sync::<UserResponse>(RESOURCE, SyncAction::Deleted, &id, None);
    Ok(Json(deleted))
}
