//! Free-text order search
//!
//! Case-insensitive substring match against client name, vehicle plate,
//! vehicle brand and status label. A record matches when ANY field matches;
//! multi-word terms are matched as one substring, not decomposed into tokens.
//! An empty term returns the whole set. Results are always reverse
//! chronological by `created_at`.

use shared::Order;

fn matches_term(order: &Order, term: &str) -> bool {
    let haystacks = [
        Some(order.client.name.as_str()),
        order.vehicle.plate.as_deref(),
        Some(order.vehicle.brand.as_str()),
        Some(order.status.label()),
    ];

    haystacks
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(term))
}

/// Filter and sort orders by a free-text term
pub fn search(orders: &[Order], term: &str) -> Vec<Order> {
    let term = term.trim().to_lowercase();

    let mut result: Vec<Order> = if term.is_empty() {
        orders.to_vec()
    } else {
        orders
            .iter()
            .filter(|order| matches_term(order, &term))
            .cloned()
            .collect()
    };

    result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use shared::{ClientInfo, Order, OrderStatus, Totals, VehicleInfo};

    fn order(name: &str, brand: &str, plate: &str, status: OrderStatus, age_days: i64) -> Order {
        Order {
            id: None,
            status,
            client: ClientInfo {
                name: name.to_string(),
                phone: None,
                email: None,
            },
            vehicle: VehicleInfo {
                brand: brand.to_string(),
                model: None,
                year: None,
                plate: Some(plate.to_string()),
            },
            issue: "issue".to_string(),
            diagnosis: None,
            mechanic_id: None,
            items: vec![],
            totals: Totals::default(),
            is_maintenance: false,
            payment_method: None,
            paid_at: None,
            warranty: None,
            documents: vec![],
            created_at: Utc::now() - Duration::days(age_days),
            commitment_date: None,
        }
    }

    fn sample() -> Vec<Order> {
        vec![
            order("Ana Pérez", "Toyota", "ABC123", OrderStatus::Recepcion, 3),
            order("Luis Gómez", "Nissan", "XYZ789", OrderStatus::Listo, 1),
            order("María Cruz", "Toyota", "TOY555", OrderStatus::Pagado, 2),
        ]
    }

    #[test]
    fn empty_term_returns_everything_reverse_chronological() {
        let result = search(&sample(), "");
        assert_eq!(result.len(), 3);
        assert_eq!(result[0].client.name, "Luis Gómez");
        assert_eq!(result[1].client.name, "María Cruz");
        assert_eq!(result[2].client.name, "Ana Pérez");
    }

    #[test]
    fn matches_any_field_case_insensitive() {
        let orders = sample();
        assert_eq!(search(&orders, "ana").len(), 1);
        assert_eq!(search(&orders, "xyz789").len(), 1);
        assert_eq!(search(&orders, "TOYOTA").len(), 2);
        assert_eq!(search(&orders, "listo").len(), 1);
    }

    #[test]
    fn status_label_matches_with_accents() {
        let orders = vec![order(
            "Ana",
            "Ford",
            "F1",
            OrderStatus::PendienteAprobacion,
            0,
        )];
        assert_eq!(search(&orders, "pendiente aprobación").len(), 1);
    }

    #[test]
    fn multi_word_term_is_a_single_substring() {
        let orders = sample();
        // "Ana" and "Toyota" both exist, but never adjacent in one field
        assert!(search(&orders, "ana toyota").is_empty());
        assert_eq!(search(&orders, "ana pérez").len(), 1);
    }

    #[test]
    fn no_match_returns_empty() {
        assert!(search(&sample(), "zzzz").is_empty());
    }

    #[test]
    fn search_is_idempotent() {
        let orders = sample();
        let once = search(&orders, "toyota");
        let twice = search(&once, "toyota");
        assert_eq!(once.len(), twice.len());
        for (a, b) in once.iter().zip(twice.iter()) {
            assert_eq!(a.client.name, b.client.name);
            assert_eq!(a.created_at, b.created_at);
        }
    }
}
