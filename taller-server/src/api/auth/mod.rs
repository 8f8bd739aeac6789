//! Auth API Module

mod handler;

use axum::{routing::get, routing::post, Router};

use crate::core::ServerState;

/// Auth router. `/login` is on the public allowlist in the auth middleware.
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/auth", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/login", post(handler::login))
        .route("/me", get(handler::me))
}
