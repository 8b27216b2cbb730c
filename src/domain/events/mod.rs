//! Domain events
use crate::domain::value_objects::{OrderId, PharmacyId, ReturnId, Won};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DomainEvent {
    Order(OrderEvent),
    Return(ReturnEvent),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OrderEvent {
    Rejected { pharmacy_id: PharmacyId, reason: RejectionReason },
    Submitted { pharmacy_id: PharmacyId, cart_total: Won },
    Created { order_id: OrderId, total: Won },
    Failed { pharmacy_id: PharmacyId, message: Option<String> },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReturnEvent {
    Rejected { pharmacy_id: PharmacyId, reason: RejectionReason },
    Submitted { pharmacy_id: PharmacyId, item_count: usize },
    Created { return_id: ReturnId },
    Failed { pharmacy_id: PharmacyId, message: Option<String> },
}

/// Why a submission never left the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectionReason {
    EmptyCart,
    CreditLimitExceeded,
    MissingReason,
}
