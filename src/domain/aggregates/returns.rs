//! Return (반품) requests.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::aggregates::cart::ReturnLineItem;
use crate::domain::value_objects::{OrderId, PharmacyId, ProductId, ReturnId, Won};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReturnStatus {
    #[default]
    Requested,
    Approved,
    Processing,
    Completed,
    Rejected,
}

impl ReturnStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Requested => "대기",
            Self::Approved => "승인",
            Self::Processing => "처리중",
            Self::Completed => "완료",
            Self::Rejected => "반려",
        }
    }
}

/// Reasons offered by the return form; free text is also accepted.
pub const RETURN_REASONS: [&str; 4] = ["제품 불량", "오배송", "고객 단순 변심", "주문 실수"];

/// Body of `POST /returns`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnCreateRequest {
    pub pharmacy_id: PharmacyId,
    pub order_id: OrderId,
    pub reason: String,
    pub items: Vec<ReturnItemRequest>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnItemRequest {
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: Won,
}

impl From<&ReturnLineItem> for ReturnItemRequest {
    fn from(line: &ReturnLineItem) -> Self {
        Self { product_id: line.product_id, quantity: line.quantity, unit_price: line.unit_price }
    }
}

impl ReturnCreateRequest {
    pub fn from_lines<'a>(
        pharmacy_id: PharmacyId,
        order_id: OrderId,
        reason: impl Into<String>,
        lines: impl IntoIterator<Item = &'a ReturnLineItem>,
    ) -> Self {
        Self { pharmacy_id, order_id, reason: reason.into(), items: lines.into_iter().map(ReturnItemRequest::from).collect() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnCreated {
    pub return_id: ReturnId,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnSummary {
    pub return_id: ReturnId,
    #[serde(default)]
    pub order_id: Option<OrderId>,
    pub pharmacy_id: PharmacyId,
    #[serde(default)]
    pub pharmacy_name: Option<String>,
    pub total_price: Won,
    pub status: ReturnStatus,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub items: Vec<ReturnItemDetail>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnItemDetail {
    pub product_id: ProductId,
    pub product_name: String,
    pub manufacturer: String,
    pub quantity: u32,
    pub unit_price: Won,
    pub subtotal_price: Won,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnStatusUpdate {
    pub status: ReturnStatus,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pharmacy_id: Option<PharmacyId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ReturnStatus>,
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
        let line = ReturnLineItem { product_id: ProductId(9), product_name: "Gauze".into(), manufacturer: "M".into(), unit_price: Won(1_200), quantity: 3 };
        let request = ReturnCreateRequest::from_lines(PharmacyId(7), OrderId(42), RETURN_REASONS[1], [&line]);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({
            "pharmacyId": 7, "orderId": 42, "reason": "오배송",
            "items": [{"productId": 9, "quantity": 3, "unitPrice": 1200}]
        }));
    }
}
