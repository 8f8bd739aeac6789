//! Order API Handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use shared::{Order, OrderCreate, OrderUpdate, SyncAction};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::OrderRepository;
use crate::orders::{self, lifecycle, DiagnosisSubmit, MaintenanceDue, PaymentInput};
use crate::utils::validation::{
    validate_optional_text, validate_required_text, MAX_EMAIL_LEN, MAX_NAME_LEN,
    MAX_SHORT_TEXT_LEN, MAX_TEXT_LEN, MAX_URL_LEN,
};
use crate::utils::{AppError, AppResult};

const RESOURCE: &str = "orden";

/// Query params for listing/searching orders
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Free-text term; empty or absent returns the whole set
    #[serde(default)]
    pub q: Option<String>,
}

fn validate_client_vehicle(order: &OrderCreate) -> AppResult<()> {
    validate_required_text(&order.client.name, "client name", MAX_NAME_LEN)?;
    validate_optional_text(&order.client.phone, "client phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&order.client.email, "client email", MAX_EMAIL_LEN)?;
    validate_required_text(&order.vehicle.brand, "vehicle brand", MAX_NAME_LEN)?;
    validate_optional_text(&order.vehicle.model, "vehicle model", MAX_NAME_LEN)?;
    validate_optional_text(&order.vehicle.plate, "vehicle plate", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&order.issue, "issue", MAX_TEXT_LEN)?;
    Ok(())
}

async fn load(repo: &OrderRepository, id: &str) -> AppResult<Order> {
    repo.find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {} not found", id)))
}

/// Persist a lifecycle result and notify subscribers
async fn store_and_notify(
    state: &ServerState,
    repo: &OrderRepository,
    order: &Order,
) -> AppResult<Order> {
    let saved = repo.replace(order).await?;
    let id = saved.id.clone().unwrap_or_default();
    state.broadcast_sync(RESOURCE, SyncAction::Updated, &id, Some(&saved));
    Ok(saved)
}

/// List orders, optionally filtered by a free-text term.
/// Always reverse chronological.
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let repo = OrderRepository::new(state.db.clone());
    let all = repo.find_all().await?;
    Ok(Json(orders::search(&all, query.q.as_deref().unwrap_or(""))))
}

/// Create a new order in Recepción
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<Order>> {
    validate_client_vehicle(&payload)?;

    let repo = OrderRepository::new(state.db.clone());
    let order = repo.create(payload).await?;

    let id = order.id.clone().unwrap_or_default();
    state.broadcast_sync(RESOURCE, SyncAction::Created, &id, Some(&order));
    tracing::info!(order_id = %id, client = %order.client.name, "Order created");

    Ok(Json(order))
}

/// Get order by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.db.clone());
    Ok(Json(load(&repo, &id).await?))
}

/// Merge-patch reception fields, attachments and promised date
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<OrderUpdate>,
) -> AppResult<Json<Order>> {
    if let Some(ref client) = payload.client {
        validate_required_text(&client.name, "client name", MAX_NAME_LEN)?;
    }
    if let Some(ref vehicle) = payload.vehicle {
        validate_required_text(&vehicle.brand, "vehicle brand", MAX_NAME_LEN)?;
    }
    if let Some(ref issue) = payload.issue {
        validate_required_text(issue, "issue", MAX_TEXT_LEN)?;
    }
    if let Some(ref documents) = payload.documents {
        for doc in documents {
            validate_required_text(&doc.name, "document name", MAX_NAME_LEN)?;
            validate_required_text(&doc.url, "document url", MAX_URL_LEN)?;
        }
    }

    let repo = OrderRepository::new(state.db.clone());
    let order = repo.update(&id, payload).await?;

    state.broadcast_sync(RESOURCE, SyncAction::Updated, &id, Some(&order));
    Ok(Json(order))
}

/// Hard delete an order (admin route)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = OrderRepository::new(state.db.clone());
    let deleted = repo.delete(&id).await?;

    state.broadcast_sync::<Order>(RESOURCE, SyncAction::Deleted, &id, None);
    Ok(Json(deleted))
}

/// Submit diagnosis: Recepción -> Pendiente Aprobación
pub async fn submit_diagnosis(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<DiagnosisSubmit>,
) -> AppResult<Json<Order>> {
    validate_optional_text(&payload.diagnosis, "diagnosis", MAX_TEXT_LEN)?;

    let repo = OrderRepository::new(state.db.clone());
    let mut order = load(&repo, &id).await?;
    lifecycle::submit_diagnosis(&mut order, payload)?;

    let saved = store_and_notify(&state, &repo, &order).await?;
    tracing::info!(order_id = %id, total = saved.totals.total, "Diagnosis submitted");
    Ok(Json(saved))
}

/// Approve quote: Pendiente Aprobación -> En Reparación
pub async fn approve(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.db.clone());
    let mut order = load(&repo, &id).await?;
    lifecycle::approve(&mut order)?;

    Ok(Json(store_and_notify(&state, &repo, &order).await?))
}

/// Discard order: Pendiente Aprobación -> Cancelado. The role check happens
/// in the lifecycle module, not just at the route layer.
pub async fn cancel(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.db.clone());
    let mut order = load(&repo, &id).await?;
    lifecycle::cancel(&mut order, user.is_admin())?;

    let saved = store_and_notify(&state, &repo, &order).await?;
    tracing::info!(order_id = %id, by = %user.username, "Order cancelled");
    Ok(Json(saved))
}

/// Items replacement payload
#[derive(Debug, Deserialize)]
pub struct ItemsUpdate {
    pub items: Vec<shared::LineItem>,
}

/// Replace the quote while En Reparación; totals are recomputed in the same
/// write, status stays put.
pub async fn update_items(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ItemsUpdate>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.db.clone());
    let mut order = load(&repo, &id).await?;
    lifecycle::update_items(&mut order, payload.items)?;

    Ok(Json(store_and_notify(&state, &repo, &order).await?))
}

/// Finish repair: En Reparación -> Listo
pub async fn finish(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.db.clone());
    let mut order = load(&repo, &id).await?;
    lifecycle::finish(&mut order)?;

    Ok(Json(store_and_notify(&state, &repo, &order).await?))
}

/// Record payment: Listo -> Pagado
pub async fn pay(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<PaymentInput>,
) -> AppResult<Json<Order>> {
    validate_optional_text(&payload.warranty, "warranty", MAX_TEXT_LEN)?;

    let repo = OrderRepository::new(state.db.clone());
    let mut order = load(&repo, &id).await?;
    lifecycle::record_payment(&mut order, payload, Utc::now())?;

    let saved = store_and_notify(&state, &repo, &order).await?;
    tracing::info!(order_id = %id, method = ?saved.payment_method, "Payment recorded");
    Ok(Json(saved))
}

/// Vehicles overdue for a preventive-maintenance contact
pub async fn maintenance_due(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<MaintenanceDue>>> {
    let repo = OrderRepository::new(state.db.clone());
    let all = repo.find_all().await?;
    Ok(Json(orders::due_reminders(&all, Utc::now())))
}
