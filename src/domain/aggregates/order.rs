//! Order Aggregate

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::aggregates::cart::{CartLine, CartLineItem};
use crate::domain::value_objects::{OrderId, PharmacyId, ProductId, Won};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Requested,
    Approved,
    Processing,
    Shipping,
    Completed,
    Rejected,
}

impl OrderStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Requested => "대기",
            Self::Approved => "승인",
            Self::Processing => "처리중",
            Self::Shipping => "배송중",
            Self::Completed => "완료",
            Self::Rejected => "반려",
        }
    }

    /// Whether HQ may still approve or reject the order.
    pub fn is_pending(self) -> bool { self == Self::Requested }
}

/// Body of `POST /orders`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreateRequest {
    pub pharmacy_id: PharmacyId,
    pub items: Vec<OrderItemRequest>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: Won,
    pub subtotal_price: Won,
}

impl From<&CartLineItem> for OrderItemRequest {
    fn from(line: &CartLineItem) -> Self {
        Self { product_id: line.product_id, quantity: line.quantity, unit_price: line.unit_price, subtotal_price: line.subtotal() }
    }
}

impl OrderCreateRequest {
    pub fn from_lines<'a>(pharmacy_id: PharmacyId, lines: impl IntoIterator<Item = &'a CartLineItem>) -> Self {
        Self { pharmacy_id, items: lines.into_iter().map(OrderItemRequest::from).collect() }
    }

    pub fn total_price(&self) -> Won { self.items.iter().map(|i| i.subtotal_price).sum() }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreated {
    pub order_id: OrderId,
    /// Older backends omit the total; callers fall back to the submitted one.
    #[serde(default)]
    pub total_price: Option<Won>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub order_id: OrderId,
    pub pharmacy_id: PharmacyId,
    pub pharmacy_name: String,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
    pub total_price: Won,
    pub status: OrderStatus,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItemSummary>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemSummary {
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Won,
    pub subtotal_price: Won,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    pub order_id: OrderId,
    pub pharmacy_id: PharmacyId,
    pub pharmacy_name: String,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
    pub total_price: Won,
    pub status: OrderStatus,
    pub items: Vec<OrderItemDetail>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemDetail {
    pub product_id: ProductId,
    pub product_name: String,
    pub manufacturer: String,
    pub quantity: u32,
    pub unit_price: Won,
    pub subtotal_price: Won,
    #[serde(default)]
    pub main_category: Option<String>,
    #[serde(default)]
    pub sub_category: Option<String>,
}

/// Body of `PATCH /orders/{id}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
}

/// Query string of the order list endpoints. `page` is zero-based.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pharmacy_id: Option<PharmacyId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_wire_shape() {
        let lines = [
            CartLineItem::new(ProductId(1), "Tylenol", "Janssen", Won(100), 5),
            CartLineItem::new(ProductId(2), "Bandage", "3M", Won(40), 2),
        ];
        let request = OrderCreateRequest::from_lines(PharmacyId(7), &lines);
        assert_eq!(request.total_price(), Won(580));
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({
            "pharmacyId": 7,
            "items": [
                {"productId": 1, "quantity": 5, "unitPrice": 100, "subtotalPrice": 500},
                {"productId": 2, "quantity": 2, "unitPrice": 40, "subtotalPrice": 80}
            ]
        }));
    }

    #[test]
    fn test_summary_decodes_backend_payload() {
        let summary: OrderSummary = serde_json::from_value(serde_json::json!({
            "orderId": 42, "pharmacyId": 7, "pharmacyName": "Central",
            "createdAt": "2025-03-01T09:30:00", "totalPrice": 500, "status": "SHIPPING",
            "summary": "Tylenol 외 1건"
        })).unwrap();
        assert_eq!(summary.order_id, OrderId(42));
        assert_eq!(summary.status, OrderStatus::Shipping);
        assert_eq!(summary.status.label(), "배송중");
        assert!(!summary.status.is_pending());
        assert!(OrderStatus::Requested.is_pending());
        assert!(summary.items.is_empty());
    }
}
