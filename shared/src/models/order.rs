//! Order Model
//!
//! The central entity: one vehicle-service job tracked from intake to payment.
//! Client and vehicle details are denormalized copies taken at reception time,
//! not foreign keys. Past invoices must not change when a client record does.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Order status. The serialized values are the literal stored labels, not
/// just display strings; they round-trip through the store and the API.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum OrderStatus {
    #[default]
    #[serde(rename = "Recepción")]
    Recepcion,
    #[serde(rename = "Diagnóstico")]
    Diagnostico,
    #[serde(rename = "Pendiente Aprobación")]
    PendienteAprobacion,
    #[serde(rename = "En Reparación")]
    EnReparacion,
    #[serde(rename = "Listo")]
    Listo,
    #[serde(rename = "Pagado")]
    Pagado,
    #[serde(rename = "Cancelado")]
    Cancelado,
}

impl OrderStatus {
    /// Stored/display label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Recepcion => "Recepción",
            Self::Diagnostico => "Diagnóstico",
            Self::PendienteAprobacion => "Pendiente Aprobación",
            Self::EnReparacion => "En Reparación",
            Self::Listo => "Listo",
            Self::Pagado => "Pagado",
            Self::Cancelado => "Cancelado",
        }
    }

    /// Terminal states accept no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Pagado | Self::Cancelado)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Client contact details, copied onto the order at reception
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ClientInfo {
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Vehicle details, copied onto the order at reception
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VehicleInfo {
    pub brand: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub plate: Option<String>,
}

/// Line item kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Labor,
    Part,
}

/// One billable component of an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub kind: ItemKind,
    /// Unit price in currency units, non-negative
    pub price: f64,
    /// Positive integer quantity
    pub quantity: i32,
}

/// Persisted totals snapshot. Recomputed whenever `items` changes, never
/// lazily at read time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
pub struct Totals {
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
}

/// Document attachment reference (URL only, blob storage is external)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRef {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub kind: Option<String>,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Option<String>,
    pub status: OrderStatus,
    pub client: ClientInfo,
    pub vehicle: VehicleInfo,
    /// Customer complaint, required at reception
    pub issue: String,
    /// Technician findings, empty until the diagnosis step
    #[serde(default)]
    pub diagnosis: Option<String>,
    /// Mechanic reference (String ID). May dangle after a mechanic is
    /// deleted; no referential integrity is enforced.
    #[serde(default)]
    pub mechanic_id: Option<String>,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub totals: Totals,
    #[serde(default)]
    pub is_maintenance: bool,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub warranty: Option<String>,
    #[serde(default)]
    pub documents: Vec<DocumentRef>,
    /// Immutable after creation
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub commitment_date: Option<DateTime<Utc>>,
}

/// Create order payload (reception screen)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub client: ClientInfo,
    pub vehicle: VehicleInfo,
    pub issue: String,
    #[serde(default)]
    pub is_maintenance: bool,
    #[serde(default)]
    pub commitment_date: Option<DateTime<Utc>>,
}

/// Partial update payload (reception edits, attachments, promised date).
/// Status, items, and totals only move through lifecycle actions.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OrderUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<ClientInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle: Option<VehicleInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_maintenance: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commitment_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documents: Option<Vec<DocumentRef>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_labels_round_trip_through_serde() {
        for status in [
            OrderStatus::Recepcion,
            OrderStatus::Diagnostico,
            OrderStatus::PendienteAprobacion,
            OrderStatus::EnReparacion,
            OrderStatus::Listo,
            OrderStatus::Pagado,
            OrderStatus::Cancelado,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.label()));
            let back: OrderStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(back, status);
        }
    }

    #[test]
    fn only_pagado_and_cancelado_are_terminal() {
        assert!(OrderStatus::Pagado.is_terminal());
        assert!(OrderStatus::Cancelado.is_terminal());
        assert!(!OrderStatus::Recepcion.is_terminal());
        assert!(!OrderStatus::Listo.is_terminal());
    }

    #[test]
    fn order_field_nesting_round_trips() {
        let order = Order {
            id: Some("orden:abc".to_string()),
            status: OrderStatus::Recepcion,
            client: ClientInfo {
                name: "Ana Pérez".to_string(),
                phone: Some("555-0100".to_string()),
                email: None,
            },
            vehicle: VehicleInfo {
                brand: "Toyota".to_string(),
                model: Some("Corolla".to_string()),
                year: Some(2019),
                plate: Some("ABC123".to_string()),
            },
            issue: "brake noise".to_string(),
            diagnosis: None,
            mechanic_id: None,
            items: vec![LineItem {
                description: "Brake pad".to_string(),
                kind: ItemKind::Part,
                price: 40.0,
                quantity: 2,
            }],
            totals: Totals {
                subtotal: 80.0,
                tax: 14.4,
                total: 94.4,
            },
            is_maintenance: false,
            payment_method: None,
            paid_at: None,
            warranty: None,
            documents: vec![],
            created_at: Utc::now(),
            commitment_date: None,
        };

        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["client"]["name"], "Ana Pérez");
        assert_eq!(json["vehicle"]["plate"], "ABC123");
        assert_eq!(json["totals"]["subtotal"], 80.0);
        assert_eq!(json["items"][0]["kind"], "part");

        let back: Order = serde_json::from_value(json).unwrap();
        assert_eq!(back.client.name, order.client.name);
        assert_eq!(back.totals, order.totals);
    }
}
