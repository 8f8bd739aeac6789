//! Sync notification payloads
//!
//! Every successful store mutation is announced to subscribed screens so they
//! can refresh without polling. Versions are per-resource and monotonically
//! increasing; a client that sees a version it already has can drop the
//! message.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What happened to the resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncAction {
    Created,
    Updated,
    Deleted,
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::Updated => write!(f, "updated"),
            Self::Deleted => write!(f, "deleted"),
        }
    }
}

/// Resource change notification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncPayload {
    /// Resource type, e.g. "orden", "mecanico"
    pub resource: String,
    /// Per-resource monotonic version
    pub version: u64,
    pub action: SyncAction,
    /// Resource ID
    pub id: String,
    /// Resource data (None for deletions)
    pub data: Option<serde_json::Value>,
}
