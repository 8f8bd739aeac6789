//! Shared domain types for the Taller edge server.
//!
//! Everything that crosses a process or wire boundary lives here: the order
//! and mechanic models, request/response payloads, and the sync notification
//! payload pushed to subscribed clients.

pub mod message;
pub mod models;

pub use message::{SyncAction, SyncPayload};
pub use models::{
    ClientInfo, DocumentRef, ItemKind, LineItem, Mechanic, MechanicCreate, MechanicUpdate, Order,
    OrderCreate, OrderStatus, OrderUpdate, Totals, User, UserCreate, UserResponse, UserUpdate,
    VehicleInfo,
};
