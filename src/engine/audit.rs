use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use uuid::Uuid;

use crate::models::courier::Courier;
use crate::models::order::{Order, OrderStatus};

/// A broken consistency rule between orders and couriers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    InTransitWithoutCourier { order_id: Uuid },
    HeldCourierAvailable { courier_id: Uuid, order_id: Uuid },
    CourierHeldTwice { courier_id: Uuid, order_ids: Vec<Uuid> },
    IdleCourierUnavailable { courier_id: Uuid },
    UnknownCourier { order_id: Uuid, courier_id: Uuid },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::InTransitWithoutCourier { order_id } => {
                write!(f, "order {order_id} is in transit without a courier")
            }
            Violation::HeldCourierAvailable {
                courier_id,
                order_id,
            } => write!(
                f,
                "courier {courier_id} is marked available while held by order {order_id}"
            ),
            Violation::CourierHeldTwice {
                courier_id,
                order_ids,
            } => write!(
                f,
                "courier {courier_id} is held by {} active orders",
                order_ids.len()
            ),
            Violation::IdleCourierUnavailable { courier_id } => {
                write!(f, "courier {courier_id} is unavailable but holds no order")
            }
            Violation::UnknownCourier {
                order_id,
                courier_id,
            } => write!(f, "order {order_id} holds unknown courier {courier_id}"),
        }
    }
}

/// Checks every order/courier consistency rule and returns what is broken,
/// sorted for stable output.
pub fn audit(orders: &[Order], couriers: &[Courier]) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut holders: HashMap<Uuid, Vec<Uuid>> = HashMap::new();

    for order in orders {
        if order.status == OrderStatus::InTransit && order.courier_id.is_none() {
            violations.push(Violation::InTransitWithoutCourier { order_id: order.id });
        }
        if let Some(courier_id) = order.held_courier() {
            holders.entry(courier_id).or_default().push(order.id);
        }
    }

    let known: HashMap<Uuid, &Courier> = couriers.iter().map(|c| (c.id, c)).collect();

    for (courier_id, order_ids) in &holders {
        let Some(courier) = known.get(courier_id) else {
            for order_id in order_ids {
                violations.push(Violation::UnknownCourier {
                    order_id: *order_id,
                    courier_id: *courier_id,
                });
            }
            continue;
        };

        if order_ids.len() > 1 {
            let mut order_ids = order_ids.clone();
            order_ids.sort();
            violations.push(Violation::CourierHeldTwice {
                courier_id: *courier_id,
                order_ids,
            });
        }
        if courier.available {
            violations.push(Violation::HeldCourierAvailable {
                courier_id: *courier_id,
                order_id: order_ids[0],
            });
        }
    }

    for courier in couriers {
        if !courier.available && !holders.contains_key(&courier.id) {
            violations.push(Violation::IdleCourierUnavailable {
                courier_id: courier.id,
            });
        }
    }

    violations.sort_by_key(|violation| violation.to_string());
    violations
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::{audit, Violation};
    use crate::models::courier::Courier;
    use crate::models::order::{Order, OrderStatus};

    fn order(seed: u128, status: OrderStatus, courier: Option<u128>) -> Order {
        let now = Utc::now();
        Order {
            id: Uuid::from_u128(seed),
            client_name: "client".to_string(),
            address: "address".to_string(),
            description: String::new(),
            status,
            courier_id: courier.map(Uuid::from_u128),
            delivery_date: None,
            created_at: now,
            updated_at: now,
            version: 1,
        }
    }

    fn courier(seed: u128, available: bool) -> Courier {
        let now = Utc::now();
        Courier {
            id: Uuid::from_u128(seed),
            name: "courier".to_string(),
            phone: String::new(),
            email: String::new(),
            available,
            created_at: now,
            updated_at: now,
            version: 1,
        }
    }

    #[test]
    fn consistent_snapshot_has_no_violations() {
        let orders = vec![
            order(1, OrderStatus::InTransit, Some(10)),
            order(2, OrderStatus::Pending, None),
            order(3, OrderStatus::Delivered, Some(11)),
        ];
        let couriers = vec![courier(10, false), courier(11, true)];

        assert!(audit(&orders, &couriers).is_empty());
    }

    #[test]
    fn terminal_orders_do_not_hold_their_courier() {
        let orders = vec![order(1, OrderStatus::Cancelled, Some(10))];
        let couriers = vec![courier(10, false)];

        assert_eq!(
            audit(&orders, &couriers),
            vec![Violation::IdleCourierUnavailable {
                courier_id: Uuid::from_u128(10)
            }]
        );
    }

    #[test]
    fn reports_each_broken_rule() {
        let orders = vec![
            order(1, OrderStatus::InTransit, None),
            order(2, OrderStatus::Pending, Some(10)),
            order(3, OrderStatus::InTransit, Some(10)),
            order(4, OrderStatus::InTransit, Some(99)),
        ];
        let couriers = vec![courier(10, true)];

        let violations = audit(&orders, &couriers);
        assert_eq!(violations.len(), 4);
        assert!(violations.contains(&Violation::InTransitWithoutCourier {
            order_id: Uuid::from_u128(1)
        }));
        assert!(violations.contains(&Violation::CourierHeldTwice {
            courier_id: Uuid::from_u128(10),
            order_ids: vec![Uuid::from_u128(2), Uuid::from_u128(3)],
        }));
        assert!(violations.iter().any(|v| matches!(
            v,
            Violation::HeldCourierAvailable { courier_id, .. } if *courier_id == Uuid::from_u128(10)
        )));
        assert!(violations.contains(&Violation::UnknownCourier {
            order_id: Uuid::from_u128(4),
            courier_id: Uuid::from_u128(99),
        }));
    }
}
