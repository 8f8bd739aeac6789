//! Taller Edge Server: workshop management backend
//!
//! # Module structure
//!
//! ```text
//! taller-server/src/
//! ├── core/     # configuration, state, HTTP server
//! ├── auth/     # JWT authentication, role middleware
//! ├── db/       # embedded SurrealDB and repositories
//! ├── orders/   # lifecycle state machine, totals, search, reminders
//! ├── api/      # HTTP routes and handlers
//! └── utils/    # errors, logging, validation
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod orders;
pub mod utils;

// Re-export public types
pub use crate::auth::{CurrentUser, JwtService};
pub use crate::core::{setup_environment, Config, Server, ServerState};
pub use crate::utils::logger::{init_logger, init_logger_with_file};
pub use crate::utils::{AppError, AppResponse, AppResult};
