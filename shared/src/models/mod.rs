//! Domain Models

pub mod mechanic;
pub mod order;
pub mod user;

pub use mechanic::{Mechanic, MechanicCreate, MechanicUpdate};
pub use order::{
    ClientInfo, DocumentRef, ItemKind, LineItem, Order, OrderCreate, OrderStatus, OrderUpdate,
    Totals, VehicleInfo,
};
pub use user::{User, UserCreate, UserResponse, UserUpdate};
