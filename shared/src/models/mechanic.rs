//! Mechanic Model
//!
//! Independent lifecycle from orders. Deleting a mechanic never cascades:
//! orders keep the dangling id and lookups must tolerate a miss.

use serde::{Deserialize, Serialize};

/// Mechanic entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mechanic {
    pub id: Option<String>,
    pub name: String,
    /// Short workshop code shown on the board, e.g. "M-03"
    pub code: String,
}

/// Create mechanic payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MechanicCreate {
    pub name: String,
    pub code: String,
}

/// Update mechanic payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MechanicUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}
