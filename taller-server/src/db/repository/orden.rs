//! Order Repository
//!
//! Persistence only. Status guards, totals recomputation and validation live
//! in the lifecycle module; the store accepts whatever it is handed.

use chrono::Utc;
use shared::{Order, OrderCreate, OrderStatus, OrderUpdate, Totals};
use surrealdb::engine::local::Db;
use surrealdb::Surreal;

use super::{BaseRepository, RepoError, RepoResult};

const TABLE: &str = "orden";

/// Serialize a record for storage, dropping the `id` field so SurrealDB
/// keeps ownership of record identity.
fn content_without_id<T: serde::Serialize>(record: &T) -> RepoResult<serde_json::Value> {
    let mut value = serde_json::to_value(record)
        .map_err(|e| RepoError::Database(format!("Serialization failed: {e}")))?;
    if let Some(map) = value.as_object_mut() {
        map.remove("id");
    }
    Ok(value)
}

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create a new order in `Recepción`
    pub async fn create(&self, data: OrderCreate) -> RepoResult<Order> {
        let order = Order {
            id: None,
            status: OrderStatus::Recepcion,
            client: data.client,
            vehicle: data.vehicle,
            issue: data.issue,
            diagnosis: None,
            mechanic_id: None,
            items: Vec::new(),
            totals: Totals::default(),
            is_maintenance: data.is_maintenance,
            payment_method: None,
            paid_at: None,
            warranty: None,
            documents: Vec::new(),
            created_at: Utc::now(),
            commitment_date: data.commitment_date,
        };

        let content = content_without_id(&order)?;
        let mut result = self
            .base
            .db()
            .query("SELECT *, <string>id AS id FROM (CREATE type::table($table) CONTENT $data)")
            .bind(("table", TABLE))
            .bind(("data", content))
            .await?;

        let created: Vec<Order> = result.take(0)?;
        created
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Find order by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let thing = self.base.parse_id(id)?;
        let mut result = self
            .base
            .db()
            .query("SELECT *, <string>id AS id FROM orden WHERE id = $id")
            .bind(("id", thing))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// All orders, reverse chronological
    pub async fn find_all(&self) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT *, <string>id AS id FROM orden ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Merge-patch reception-screen fields. `created_at`, `status`, `items`
    /// and `totals` are not reachable from this payload.
    pub async fn update(&self, id: &str, data: OrderUpdate) -> RepoResult<Order> {
        let thing = self.base.parse_id(id)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))?;

        let content = content_without_id(&data)?;
        let mut result = self
            .base
            .db()
            .query("SELECT *, <string>id AS id FROM (UPDATE $thing MERGE $data)")
            .bind(("thing", thing))
            .bind(("data", content))
            .await?;

        result
            .take::<Vec<Order>>(0)?
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    /// Write a full order document back. Used by lifecycle transitions which
    /// mutate a loaded copy in memory first.
    pub async fn replace(&self, order: &Order) -> RepoResult<Order> {
        let id = order
            .id
            .as_deref()
            .ok_or_else(|| RepoError::Validation("Order has no id".to_string()))?;
        let thing = self.base.parse_id(id)?;

        let content = content_without_id(order)?;
        let mut result = self
            .base
            .db()
            .query("SELECT *, <string>id AS id FROM (UPDATE $thing CONTENT $data)")
            .bind(("thing", thing))
            .bind(("data", content))
            .await?;

        result
            .take::<Vec<Order>>(0)?
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    /// Hard delete an order
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = self.base.parse_id(id)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))?;

        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", thing))
            .await?;
        Ok(true)
    }
}
