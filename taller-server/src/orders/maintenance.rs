//! Maintenance reminder evaluator
//!
//! Pure derivation over the order set: which vehicles are overdue for a
//! preventive-maintenance contact. No state of its own; recomputed per read.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use shared::Order;
use std::collections::HashMap;

/// Fixed 5-month threshold, approximated as 150 days (not calendar-aware)
pub const MAINTENANCE_THRESHOLD_DAYS: i64 = 150;

/// One overdue vehicle, carrying the originating order for contact details
#[derive(Debug, Clone, Serialize)]
pub struct MaintenanceDue {
    pub plate: String,
    pub last_service: DateTime<Utc>,
    /// Most recent maintenance order for this plate
    pub order: Order,
}

/// Evaluate which plates are due for a maintenance contact
///
/// Only orders flagged `is_maintenance` participate; plates are grouped and
/// the MOST RECENT `created_at` per plate governs, so one fresh visit clears
/// any number of old ones. Output is sorted oldest-first.
pub fn due_reminders(orders: &[Order], now: DateTime<Utc>) -> Vec<MaintenanceDue> {
    let threshold = Duration::days(MAINTENANCE_THRESHOLD_DAYS);

    // Latest maintenance order per plate
    let mut latest: HashMap<String, &Order> = HashMap::new();
    for order in orders.iter().filter(|o| o.is_maintenance) {
        let Some(plate) = order.vehicle.plate.as_deref().map(str::trim) else {
            continue;
        };
        if plate.is_empty() {
            continue;
        }

        latest
            .entry(plate.to_string())
            .and_modify(|current| {
                if order.created_at > current.created_at {
                    *current = order;
                }
            })
            .or_insert(order);
    }

    let mut due: Vec<MaintenanceDue> = latest
        .into_iter()
        .filter(|(_, order)| now - order.created_at > threshold)
        .map(|(plate, order)| MaintenanceDue {
            plate,
            last_service: order.created_at,
            order: order.clone(),
        })
        .collect();

    due.sort_by(|a, b| a.last_service.cmp(&b.last_service));
    due
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{ClientInfo, OrderStatus, Totals, VehicleInfo};

    fn maintenance_order(plate: &str, age_days: i64) -> Order {
        Order {
            id: None,
            status: OrderStatus::Pagado,
            client: ClientInfo {
                name: "Cliente".to_string(),
                phone: Some("555-0100".to_string()),
                email: None,
            },
            vehicle: VehicleInfo {
                brand: "Toyota".to_string(),
                model: None,
                year: None,
                plate: Some(plate.to_string()),
            },
            issue: "mantenimiento preventivo".to_string(),
            diagnosis: None,
            mechanic_id: None,
            items: vec![],
            totals: Totals::default(),
            is_maintenance: true,
            payment_method: None,
            paid_at: None,
            warranty: None,
            documents: vec![],
            created_at: Utc::now() - Duration::days(age_days),
            commitment_date: None,
        }
    }

    #[test]
    fn most_recent_order_per_plate_governs() {
        // 200 and 10 days ago on the same plate: NOT due, the 10-day visit wins
        let orders = vec![
            maintenance_order("ABC123", 200),
            maintenance_order("ABC123", 10),
        ];
        assert!(due_reminders(&orders, Utc::now()).is_empty());
    }

    #[test]
    fn six_months_plus_one_month_is_not_due() {
        let orders = vec![
            maintenance_order("ABC123", 180),
            maintenance_order("ABC123", 30),
        ];
        assert!(due_reminders(&orders, Utc::now()).is_empty());
    }

    #[test]
    fn stale_plate_is_due_and_carries_the_order() {
        let orders = vec![maintenance_order("OLD001", 200)];
        let due = due_reminders(&orders, Utc::now());
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].plate, "OLD001");
        assert_eq!(due[0].order.client.phone.as_deref(), Some("555-0100"));
    }

    #[test]
    fn exactly_at_threshold_is_not_due() {
        let now = Utc::now();
        let mut order = maintenance_order("EDGE01", 0);
        order.created_at = now - Duration::days(MAINTENANCE_THRESHOLD_DAYS);
        assert!(due_reminders(&[order], now).is_empty());
    }

    #[test]
    fn non_maintenance_orders_are_ignored() {
        let mut order = maintenance_order("ABC123", 400);
        order.is_maintenance = false;
        assert!(due_reminders(&[order], Utc::now()).is_empty());
    }

    #[test]
    fn blank_plates_are_skipped() {
        let mut no_plate = maintenance_order("X", 400);
        no_plate.vehicle.plate = None;
        let mut blank_plate = maintenance_order("Y", 400);
        blank_plate.vehicle.plate = Some("  ".to_string());
        assert!(due_reminders(&[no_plate, blank_plate], Utc::now()).is_empty());
    }

    #[test]
    fn due_list_is_sorted_oldest_first() {
        let orders = vec![
            maintenance_order("AAA111", 200),
            maintenance_order("BBB222", 300),
            maintenance_order("CCC333", 160),
        ];
        let due = due_reminders(&orders, Utc::now());
        let plates: Vec<&str> = due.iter().map(|d| d.plate.as_str()).collect();
        assert_eq!(plates, vec!["BBB222", "AAA111", "CCC333"]);
    }
}
