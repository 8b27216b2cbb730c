//! HQ-side branch approval and settlement payloads.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::aggregates::profile::{CreditStatus, Pharmacy, PharmacyStatus};
use crate::domain::value_objects::{PharmacyId, UserId, Won};

/// Zero-based page query.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchRequest {
    pub request: BranchRequestRecord,
    pub pharmacy: Pharmacy,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchRequestRecord {
    pub id: i64,
    pub pharmacy_id: PharmacyId,
    pub requested_at: NaiveDateTime,
    pub status: PharmacyStatus,
    #[serde(default)]
    pub reviewed_at: Option<NaiveDateTime>,
}

/// A branch with an unsettled balance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingCredit {
    pub user_id: UserId,
    pub email: String,
    #[serde(default)]
    pub pharmacy_id: Option<PharmacyId>,
    pub pharmacy_name: String,
    pub point: i64,
    #[serde(default)]
    pub recent_settled_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub recent_settled_amount: Option<Won>,
    #[serde(default)]
    pub total_settled_amount: Option<Won>,
}

impl PendingCredit {
    pub fn outstanding_balance(&self) -> Won { Won(self.point.min(0).saturating_neg()) }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementResult {
    pub user_id: UserId,
    pub before_point: i64,
    pub settled_amount: Won,
    pub after_point: i64,
    pub credit_status: CreditStatus,
}
