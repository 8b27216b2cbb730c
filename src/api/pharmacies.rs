//! HQ view of branch accounts, their balance ledger and registration requests.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{BalanceTxId, PharmacyId, PharmacyRequestId, UserId, Won};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PharmacyListParams {
    /// Only branches with an outstanding balance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unsettled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

/// A registered branch with its balance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PharmacyAccount {
    pub pharmacy_id: PharmacyId,
    pub pharmacy_name: String,
    pub biz_reg_no: String,
    pub representative_name: String,
    pub postcode: String,
    pub address: String,
    #[serde(default)]
    pub detail_address: Option<String>,
    pub region: String,
    pub contact: String,
    pub outstanding_balance: Won,
    #[serde(default)]
    pub latest_settlement_at: Option<NaiveDateTime>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSettlement {
    pub balance_tx_id: BalanceTxId,
    pub pharmacy_id: PharmacyId,
    pub amount: Won,
    pub balance_before: Won,
    pub balance_after: Won,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BalanceTxType {
    Order,
    Return,
    OrderCancel,
    Settlement,
}

impl BalanceTxType {
    pub fn label(self) -> &'static str {
        match self {
            Self::Order => "발주",
            Self::Return => "반품",
            Self::OrderCancel => "발주 취소",
            Self::Settlement => "정산",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Self::Order => "magenta",
            Self::Return => "green",
            Self::OrderCancel => "gold",
            Self::Settlement => "blue",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceTxParams {
    pub pharmacy_id: PharmacyId,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<BalanceTxType>,
    /// Inclusive `YYYY-MM-DD` bounds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

impl BalanceTxParams {
    pub fn for_pharmacy(pharmacy_id: PharmacyId) -> Self {
        Self { pharmacy_id, kind: None, start: None, end: None, page: None, size: None }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceTx {
    pub balance_tx_id: BalanceTxId,
    pub pharmacy_id: PharmacyId,
    #[serde(rename = "type")]
    pub kind: BalanceTxType,
    pub amount: Won,
    pub balance_after: Won,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PharmacyRequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl PharmacyRequestStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "대기",
            Self::Approved => "활성",
            Self::Rejected => "반려",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PharmacyRequestParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PharmacyRequestStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PharmacyRequestSummary {
    pub pharmacy_request_id: PharmacyRequestId,
    pub user_id: UserId,
    pub email: String,
    pub pharmacy_name: String,
    pub biz_reg_no: String,
    pub region: String,
    pub contact: String,
    pub status: PharmacyRequestStatus,
    pub requested_at: NaiveDateTime,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PharmacyRequestDetail {
    pub pharmacy_request_id: PharmacyRequestId,
    pub user_id: UserId,
    pub email: String,
    pub pharmacy_name: String,
    pub biz_reg_no: String,
    pub representative_name: String,
    pub postcode: String,
    pub address: String,
    #[serde(default)]
    pub detail_address: Option<String>,
    pub region: String,
    pub contact: String,
    pub status: PharmacyRequestStatus,
    pub requested_at: NaiveDateTime,
    #[serde(default)]
    pub processed_at: Option<NaiveDateTime>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_balance_tx_labels() {
        let tx: BalanceTx = serde_json::from_value(json!({
            "balanceTxId": 9, "pharmacyId": 7, "type": "SETTLEMENT", "amount": 150000, "balanceAfter": 0,
            "createdAt": "2025-09-30T18:00:00"
        })).unwrap();
        assert_eq!(tx.kind.label(), "정산");
        assert_eq!(tx.kind.color(), "blue");
        assert_eq!(BalanceTxType::OrderCancel.label(), "발주 취소");
    }

    #[test]
    fn test_balance_tx_params_skip_unset_filters() {
        let mut params = BalanceTxParams::for_pharmacy(PharmacyId(7));
        params.kind = Some(BalanceTxType::Order);
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value, json!({"pharmacyId": 7, "type": "ORDER"}));
    }

    #[test]
    fn test_pending_request_without_processed_at() {
        let detail: PharmacyRequestDetail = serde_json::from_value(json!({
            "pharmacyRequestId": 3, "userId": 11, "email": "new@example.com", "pharmacyName": "East",
            "bizRegNo": "123-45-67890", "representativeName": "Lee", "postcode": "04524", "address": "Seoul",
            "region": "서울", "contact": "02-1234-5678", "status": "PENDING", "requestedAt": "2025-09-01T09:00:00"
        })).unwrap();
        assert_eq!(detail.status, PharmacyRequestStatus::Pending);
        assert_eq!(detail.processed_at, None);
    }
}
