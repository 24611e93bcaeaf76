//! Order status transition table and courier bookkeeping rules.
//!
//! Everything here is pure: the dispatcher asks these functions whether a
//! change is legal and which courier flags it implies, then performs the
//! writes itself.

use uuid::Uuid;

use crate::error::DispatchError;
use crate::models::order::{Order, OrderStatus};

use crate::models::order::OrderStatus::{Cancelled, Delivered, InTransit, Pending};

/// Legal status changes during normal operation.
const FORWARD: [(OrderStatus, OrderStatus); 4] = [
    (Pending, InTransit),
    (Pending, Cancelled),
    (InTransit, Delivered),
    (InTransit, Cancelled),
];

pub fn is_forward(from: OrderStatus, to: OrderStatus) -> bool {
    FORWARD.contains(&(from, to))
}

/// Checks a status change requested through the normal status control.
pub fn check_forward(order: &Order, to: OrderStatus) -> Result<(), DispatchError> {
    if !is_forward(order.status, to) {
        return Err(DispatchError::InvalidTransition {
            from: order.status,
            to,
        });
    }

    if to == InTransit && order.courier_id.is_none() {
        return Err(DispatchError::MissingCourier(order.id));
    }

    Ok(())
}

/// Administrative edits may set any status, as long as the order is still
/// open.
pub fn check_edit(order: &Order, to: OrderStatus) -> Result<(), DispatchError> {
    if order.status.is_terminal() {
        return Err(DispatchError::InvalidTransition {
            from: order.status,
            to,
        });
    }
    Ok(())
}

/// Assignment moves the order to `InTransit`, so it needs an open order.
pub fn check_assign(order: &Order) -> Result<(), DispatchError> {
    if order.status.is_terminal() {
        return Err(DispatchError::InvalidTransition {
            from: order.status,
            to: InTransit,
        });
    }
    Ok(())
}

/// An order in transit must name its courier.
pub fn check_courier_present(order: &Order) -> Result<(), DispatchError> {
    if order.status == InTransit && order.courier_id.is_none() {
        return Err(DispatchError::MissingCourier(order.id));
    }
    Ok(())
}

/// Courier availability writes implied by moving an order from `before` to
/// `after`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CourierMoves {
    /// Courier that becomes held and must be marked unavailable.
    pub reserve: Option<Uuid>,
    /// Courier that is no longer held and must be marked available.
    pub release: Option<Uuid>,
}

impl CourierMoves {
    pub fn is_empty(&self) -> bool {
        self.reserve.is_none() && self.release.is_none()
    }
}

pub fn courier_moves(before: Option<&Order>, after: Option<&Order>) -> CourierMoves {
    let held_before = before.and_then(Order::held_courier);
    let held_after = after.and_then(Order::held_courier);

    if held_before == held_after {
        return CourierMoves::default();
    }

    CourierMoves {
        reserve: held_after,
        release: held_before,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;

    fn order(status: OrderStatus, courier: Option<u128>) -> Order {
        let now = Utc::now();
        Order {
            id: Uuid::from_u128(100),
            client_name: "Jan Kowalski".to_string(),
            address: "Marszalkowska 1".to_string(),
            description: String::new(),
            status,
            courier_id: courier.map(Uuid::from_u128),
            delivery_date: None,
            created_at: now,
            updated_at: now,
            version: 1,
        }
    }

    #[test]
    fn forward_table_matches_lifecycle() {
        for from in OrderStatus::ALL {
            for to in OrderStatus::ALL {
                let expected = matches!(
                    (from, to),
                    (Pending, InTransit)
                        | (Pending, Cancelled)
                        | (InTransit, Delivered)
                        | (InTransit, Cancelled)
                );
                assert_eq!(is_forward(from, to), expected, "{from} -> {to}");
            }
        }
    }

    #[test]
    fn terminal_orders_reject_every_status_change() {
        for status in [Delivered, Cancelled] {
            let done = order(status, Some(1));
            for to in OrderStatus::ALL {
                assert!(matches!(
                    check_forward(&done, to),
                    Err(DispatchError::InvalidTransition { .. })
                ));
                assert!(check_edit(&done, to).is_err());
            }
            assert!(check_assign(&done).is_err());
        }
    }

    #[test]
    fn pending_cannot_jump_to_delivered() {
        let err = check_forward(&order(Pending, Some(1)), Delivered).unwrap_err();
        assert!(matches!(
            err,
            DispatchError::InvalidTransition {
                from: Pending,
                to: Delivered
            }
        ));
    }

    #[test]
    fn in_transit_requires_a_courier() {
        let err = check_forward(&order(Pending, None), InTransit).unwrap_err();
        assert!(matches!(err, DispatchError::MissingCourier(_)));
        assert!(check_forward(&order(Pending, Some(1)), InTransit).is_ok());
    }

    #[test]
    fn edits_allow_any_status_on_open_orders() {
        let open = order(InTransit, Some(1));
        for to in OrderStatus::ALL {
            assert!(check_edit(&open, to).is_ok());
        }
    }

    #[test]
    fn swapping_couriers_reserves_new_and_releases_old() {
        let before = order(InTransit, Some(1));
        let after = order(InTransit, Some(2));

        let moves = courier_moves(Some(&before), Some(&after));
        assert_eq!(moves.reserve, Some(Uuid::from_u128(2)));
        assert_eq!(moves.release, Some(Uuid::from_u128(1)));
    }

    #[test]
    fn finishing_an_order_releases_but_keeps_history() {
        let before = order(InTransit, Some(1));
        let after = order(Delivered, Some(1));

        let moves = courier_moves(Some(&before), Some(&after));
        assert_eq!(moves.reserve, None);
        assert_eq!(moves.release, Some(Uuid::from_u128(1)));
        assert_eq!(after.courier_id, Some(Uuid::from_u128(1)));
    }

    #[test]
    fn status_only_changes_between_active_states_touch_no_courier() {
        let before = order(Pending, Some(1));
        let after = order(InTransit, Some(1));
        assert!(courier_moves(Some(&before), Some(&after)).is_empty());
    }

    #[test]
    fn new_and_deleted_orders() {
        let created = order(InTransit, Some(3));
        assert_eq!(
            courier_moves(None, Some(&created)).reserve,
            Some(Uuid::from_u128(3))
        );
        assert_eq!(
            courier_moves(Some(&created), None).release,
            Some(Uuid::from_u128(3))
        );
        assert!(courier_moves(None, Some(&order(Pending, None))).is_empty());
    }
}
