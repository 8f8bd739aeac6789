//! Mechanic API Handlers

use axum::{
    extract::{Path, State},
    Json,
};
use shared::{Mechanic, MechanicCreate, MechanicUpdate, SyncAction};

use crate::core::ServerState;
use crate::db::repository::MechanicRepository;
use crate::utils::validation::{validate_required_text, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN};
use crate::utils::{AppError, AppResult};

const RESOURCE: &str = "mecanico";

/// List all mechanics
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Mechanic>>> {
    let repo = MechanicRepository::new(state.db.clone());
    Ok(Json(repo.find_all().await?))
}

/// Get mechanic by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Mechanic>> {
    let repo = MechanicRepository::new(state.db.clone());
    let mechanic = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Mechanic {} not found", id)))?;
    Ok(Json(mechanic))
}

/// Create a new mechanic
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<MechanicCreate>,
) -> AppResult<Json<Mechanic>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.code, "code", MAX_SHORT_TEXT_LEN)?;

    let repo = MechanicRepository::new(state.db.clone());
    let mechanic = repo.create(payload).await?;

    let id = mechanic.id.clone().unwrap_or_default();
    state.broadcast_sync(RESOURCE, SyncAction::Created, &id, Some(&mechanic));

    Ok(Json(mechanic))
}

/// Update a mechanic
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<MechanicUpdate>,
) -> AppResult<Json<Mechanic>> {
    if let Some(ref name) = payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(ref code) = payload.code {
        validate_required_text(code, "code", MAX_SHORT_TEXT_LEN)?;
    }

    let repo = MechanicRepository::new(state.db.clone());
    let mechanic = repo.update(&id, payload).await?;

    state.broadcast_sync(RESOURCE, SyncAction::Updated, &id, Some(&mechanic));
    Ok(Json(mechanic))
}

/// Delete a mechanic. Orders referencing it keep the dangling id; their
/// screens must tolerate the missing lookup.
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = MechanicRepository::new(state.db.clone());
    let deleted = repo.delete(&id).await?;

    state.broadcast_sync::<Mechanic>(RESOURCE, SyncAction::Deleted, &id, None);
    Ok(Json(deleted))
}
