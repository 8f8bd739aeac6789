//! Mechanic API Module

mod handler;

use axum::{middleware, routing::get, Router};

use crate::auth::require_admin;
use crate::core::ServerState;

/// Mechanic router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/mecanicos", routes())
}

fn routes() -> Router<ServerState> {
    // Reads: any logged-in user (assignment dropdowns need the list)
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id));

    // Management: admin only
    let manage_routes = Router::new()
        .route("/", axum::routing::post(handler::create))
        .route(
            "/{id}",
            axum::routing::put(handler::update).delete(handler::delete),
        )
        .layer(middleware::from_fn(require_admin));

    read_routes.merge(manage_routes)
}
