//! Order API Module
//!
//! All order mutations go through the lifecycle module; handlers only load,
//! apply and persist.

mod handler;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::auth::require_admin;
use crate::core::ServerState;

/// Order router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/ordenes", routes())
}

fn routes() -> Router<ServerState> {
    // Workflow routes: any logged-in user
    let workflow_routes = Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/mantenimiento/vencidos", get(handler::maintenance_due))
        .route("/{id}", get(handler::get_by_id).put(handler::update))
        .route("/{id}/diagnostico", post(handler::submit_diagnosis))
        .route("/{id}/aprobar", post(handler::approve))
        .route("/{id}/cancelar", post(handler::cancel))
        .route("/{id}/articulos", post(handler::update_items))
        .route("/{id}/finalizar", post(handler::finish))
        .route("/{id}/pagar", post(handler::pay));

    // Destructive routes: admin only
    let admin_routes = Router::new()
        .route("/{id}", axum::routing::delete(handler::delete))
        .layer(middleware::from_fn(require_admin));

    workflow_routes.merge(admin_routes)
}
