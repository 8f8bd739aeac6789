//! Order lifecycle
//!
//! The state machine over `Order.status`. The store accepts any status value,
//! so these functions are the only guard:
//!
//! ```text
//! Recepción            -> Pendiente Aprobación   submit_diagnosis
//! Pendiente Aprobación -> En Reparación          approve
//! Pendiente Aprobación -> Cancelado              cancel (admin only)
//! En Reparación        -> Listo                  finish
//! En Reparación        -> En Reparación          update_items (totals recomputed)
//! Listo                -> Pagado                 record_payment
//! ```
//!
//! `Pagado` and `Cancelado` are terminal. Every transition mutates the single
//! order record in place; there is no event log, so history is only the
//! current status plus milestone timestamps like `paid_at`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{LineItem, Order, OrderStatus};
use thiserror::Error;

use super::money;

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Cannot {action} an order in status '{from}'")]
    InvalidTransition {
        from: OrderStatus,
        action: &'static str,
    },

    #[error("Diagnosis requires at least one line item")]
    EmptyItems,

    #[error("Diagnosis requires an assigned mechanic")]
    MissingMechanic,

    #[error("Payment requires a payment method")]
    MissingPaymentMethod,

    #[error("Only an admin may discard an order")]
    AdminRequired,

    #[error("Invalid line item: {0}")]
    InvalidItem(String),
}

/// Diagnosis submission payload: findings, the assembled quote and the
/// responsible mechanic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosisSubmit {
    #[serde(default)]
    pub diagnosis: Option<String>,
    pub mechanic_id: String,
    pub items: Vec<LineItem>,
}

/// Payment payload (cashier screen)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentInput {
    pub method: String,
    #[serde(default)]
    pub warranty: Option<String>,
}

fn require_status(
    order: &Order,
    expected: OrderStatus,
    action: &'static str,
) -> Result<(), LifecycleError> {
    if order.status == expected {
        Ok(())
    } else {
        Err(LifecycleError::InvalidTransition {
            from: order.status,
            action,
        })
    }
}

fn validate_items(items: &[LineItem]) -> Result<(), LifecycleError> {
    if items.is_empty() {
        return Err(LifecycleError::EmptyItems);
    }
    for item in items {
        money::validate_line_item(item)?;
    }
    Ok(())
}

/// Recepción -> Pendiente Aprobación
///
/// Records the technician findings, assigns the mechanic, installs the quote
/// items and recomputes the persisted totals in the same step.
pub fn submit_diagnosis(order: &mut Order, payload: DiagnosisSubmit) -> Result<(), LifecycleError> {
    require_status(order, OrderStatus::Recepcion, "submit a diagnosis for")?;
    if payload.mechanic_id.trim().is_empty() {
        return Err(LifecycleError::MissingMechanic);
    }
    validate_items(&payload.items)?;

    order.diagnosis = payload.diagnosis;
    order.mechanic_id = Some(payload.mechanic_id);
    order.totals = money::compute_totals(&payload.items);
    order.items = payload.items;
    order.status = OrderStatus::PendienteAprobacion;
    Ok(())
}

/// Pendiente Aprobación -> En Reparación
pub fn approve(order: &mut Order) -> Result<(), LifecycleError> {
    require_status(order, OrderStatus::PendienteAprobacion, "approve")?;
    order.status = OrderStatus::EnReparacion;
    Ok(())
}

/// Pendiente Aprobación -> Cancelado (admin only, terminal)
pub fn cancel(order: &mut Order, is_admin: bool) -> Result<(), LifecycleError> {
    require_status(order, OrderStatus::PendienteAprobacion, "cancel")?;
    if !is_admin {
        return Err(LifecycleError::AdminRequired);
    }
    order.status = OrderStatus::Cancelado;
    Ok(())
}

/// En Reparación -> En Reparación: replace the quote items and recompute
/// totals in the same step. Status is unchanged.
pub fn update_items(order: &mut Order, items: Vec<LineItem>) -> Result<(), LifecycleError> {
    require_status(order, OrderStatus::EnReparacion, "edit items of")?;
    validate_items(&items)?;

    order.totals = money::compute_totals(&items);
    order.items = items;
    Ok(())
}

/// En Reparación -> Listo
pub fn finish(order: &mut Order) -> Result<(), LifecycleError> {
    require_status(order, OrderStatus::EnReparacion, "finish")?;
    order.status = OrderStatus::Listo;
    Ok(())
}

/// Listo -> Pagado (terminal). Sets the payment milestone fields.
pub fn record_payment(
    order: &mut Order,
    payment: PaymentInput,
    now: DateTime<Utc>,
) -> Result<(), LifecycleError> {
    require_status(order, OrderStatus::Listo, "record a payment for")?;
    if payment.method.trim().is_empty() {
        return Err(LifecycleError::MissingPaymentMethod);
    }

    order.payment_method = Some(payment.method);
    order.warranty = payment.warranty;
    order.paid_at = Some(now);
    order.status = OrderStatus::Pagado;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{ClientInfo, ItemKind, Totals, VehicleInfo};

    fn reception_order() -> Order {
        Order {
            id: Some("orden:test".to_string()),
            status: OrderStatus::Recepcion,
            client: ClientInfo {
                name: "Ana Pérez".to_string(),
                phone: None,
                email: None,
            },
            vehicle: VehicleInfo {
                brand: "Toyota".to_string(),
                model: None,
                year: None,
                plate: Some("ABC123".to_string()),
            },
            issue: "brake noise".to_string(),
            diagnosis: None,
            mechanic_id: None,
            items: vec![],
            totals: Totals::default(),
            is_maintenance: false,
            payment_method: None,
            paid_at: None,
            warranty: None,
            documents: vec![],
            created_at: Utc::now(),
            commitment_date: None,
        }
    }

    fn quote_items() -> Vec<LineItem> {
        vec![
            LineItem {
                description: "Brake pad".to_string(),
                kind: ItemKind::Part,
                price: 40.0,
                quantity: 2,
            },
            LineItem {
                description: "Labor".to_string(),
                kind: ItemKind::Labor,
                price: 30.0,
                quantity: 1,
            },
        ]
    }

    fn diagnosis() -> DiagnosisSubmit {
        DiagnosisSubmit {
            diagnosis: Some("worn pads".to_string()),
            mechanic_id: "mecanico:m1".to_string(),
            items: quote_items(),
        }
    }

    #[test]
    fn full_flow_reception_to_paid() {
        let mut order = reception_order();

        submit_diagnosis(&mut order, diagnosis()).unwrap();
        assert_eq!(order.status, OrderStatus::PendienteAprobacion);
        assert_eq!(order.totals.subtotal, 110.0);
        assert_eq!(order.totals.tax, 19.8);
        assert_eq!(order.totals.total, 129.8);

        approve(&mut order).unwrap();
        assert_eq!(order.status, OrderStatus::EnReparacion);

        finish(&mut order).unwrap();
        assert_eq!(order.status, OrderStatus::Listo);

        let now = Utc::now();
        record_payment(
            &mut order,
            PaymentInput {
                method: "Efectivo".to_string(),
                warranty: Some("30 días".to_string()),
            },
            now,
        )
        .unwrap();
        assert_eq!(order.status, OrderStatus::Pagado);
        assert_eq!(order.payment_method.as_deref(), Some("Efectivo"));
        assert_eq!(order.paid_at, Some(now));
    }

    #[test]
    fn diagnosis_with_zero_items_is_rejected() {
        let mut order = reception_order();
        let mut payload = diagnosis();
        payload.items.clear();
        assert!(matches!(
            submit_diagnosis(&mut order, payload),
            Err(LifecycleError::EmptyItems)
        ));
        assert_eq!(order.status, OrderStatus::Recepcion);
    }

    #[test]
    fn diagnosis_without_mechanic_is_rejected() {
        let mut order = reception_order();
        let mut payload = diagnosis();
        payload.mechanic_id = "  ".to_string();
        assert!(matches!(
            submit_diagnosis(&mut order, payload),
            Err(LifecycleError::MissingMechanic)
        ));
    }

    #[test]
    fn cancel_requires_admin() {
        let mut order = reception_order();
        submit_diagnosis(&mut order, diagnosis()).unwrap();

        assert!(matches!(
            cancel(&mut order, false),
            Err(LifecycleError::AdminRequired)
        ));
        assert_eq!(order.status, OrderStatus::PendienteAprobacion);

        cancel(&mut order, true).unwrap();
        assert_eq!(order.status, OrderStatus::Cancelado);
    }

    #[test]
    fn editing_items_recomputes_totals_and_keeps_status() {
        let mut order = reception_order();
        submit_diagnosis(&mut order, diagnosis()).unwrap();
        approve(&mut order).unwrap();

        update_items(
            &mut order,
            vec![LineItem {
                description: "Brake disc".to_string(),
                kind: ItemKind::Part,
                price: 55.0,
                quantity: 2,
            }],
        )
        .unwrap();

        assert_eq!(order.status, OrderStatus::EnReparacion);
        assert_eq!(order.totals.subtotal, 110.0);
        assert_eq!(order.totals.tax, 19.8);
        assert_eq!(order.totals.total, 129.8);
        assert_eq!(order.items.len(), 1);
    }

    #[test]
    fn payment_requires_method() {
        let mut order = reception_order();
        submit_diagnosis(&mut order, diagnosis()).unwrap();
        approve(&mut order).unwrap();
        finish(&mut order).unwrap();

        assert!(matches!(
            record_payment(
                &mut order,
                PaymentInput {
                    method: "".to_string(),
                    warranty: None
                },
                Utc::now()
            ),
            Err(LifecycleError::MissingPaymentMethod)
        ));
        assert_eq!(order.status, OrderStatus::Listo);
    }

    #[test]
    fn terminal_states_accept_no_transitions() {
        let mut paid = reception_order();
        submit_diagnosis(&mut paid, diagnosis()).unwrap();
        approve(&mut paid).unwrap();
        finish(&mut paid).unwrap();
        record_payment(
            &mut paid,
            PaymentInput {
                method: "Tarjeta".to_string(),
                warranty: None,
            },
            Utc::now(),
        )
        .unwrap();

        assert!(submit_diagnosis(&mut paid.clone(), diagnosis()).is_err());
        assert!(approve(&mut paid.clone()).is_err());
        assert!(cancel(&mut paid.clone(), true).is_err());
        assert!(finish(&mut paid.clone()).is_err());
        assert!(update_items(&mut paid.clone(), quote_items()).is_err());
        assert!(record_payment(
            &mut paid.clone(),
            PaymentInput {
                method: "Efectivo".to_string(),
                warranty: None
            },
            Utc::now()
        )
        .is_err());
    }

    #[test]
    fn edges_not_listed_are_rejected() {
        // approve straight from reception
        let mut order = reception_order();
        assert!(matches!(
            approve(&mut order),
            Err(LifecycleError::InvalidTransition { .. })
        ));

        // finish before approval
        let mut order = reception_order();
        submit_diagnosis(&mut order, diagnosis()).unwrap();
        assert!(finish(&mut order).is_err());

        // pay before finishing
        let mut order = reception_order();
        submit_diagnosis(&mut order, diagnosis()).unwrap();
        approve(&mut order).unwrap();
        assert!(record_payment(
            &mut order,
            PaymentInput {
                method: "Efectivo".to_string(),
                warranty: None
            },
            Utc::now()
        )
        .is_err());

        // cancel after approval
        assert!(cancel(&mut order, true).is_err());
    }
}
