//! Credit guard.
//!
//! Branches buy on credit up to a fixed ceiling. The backend is authoritative;
//! these checks only keep obviously doomed orders from being sent.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::Won;

pub const CREDIT_LIMIT: Won = Won(10_000_000);

/// A branch's outstanding balance against its ceiling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditPosition {
    pub outstanding_balance: Won,
    pub credit_limit: Won,
}

impl CreditPosition {
    pub fn new(outstanding_balance: Won, credit_limit: Won) -> Self { Self { outstanding_balance, credit_limit } }

    /// The backend reports credit as a non-positive `point`; debt is its magnitude.
    pub fn from_point(point: i64, credit_limit: Won) -> Self {
        Self::new(Won(point.min(0).saturating_neg()), credit_limit)
    }

    pub fn can_submit(&self, cart_total: Won) -> bool { can_submit(self.outstanding_balance, cart_total, self.credit_limit) }
    pub fn info(&self) -> CreditInfo { credit_tier(self.outstanding_balance, self.credit_limit) }
}

/// True iff `outstanding_balance + cart_total <= credit_limit`.
pub fn can_submit(outstanding_balance: Won, cart_total: Won, credit_limit: Won) -> bool {
    outstanding_balance.checked_add(cart_total).is_some_and(|next| next <= credit_limit)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreditTier {
    Low,
    Medium,
    High,
}

impl CreditTier {
    pub fn color(self) -> &'static str {
        match self { Self::Low => "#52c41a", Self::Medium => "#faad14", Self::High => "#f5222d" }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditInfo {
    pub used_amount: Won,
    pub remaining_amount: Won,
    pub usage_percent: Decimal,
    pub remaining_percent: Decimal,
    pub total_limit: Won,
    pub tier: CreditTier,
}

fn round_percent(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub fn credit_tier(outstanding_balance: Won, credit_limit: Won) -> CreditInfo {
    let hundred = Decimal::ONE_HUNDRED;
    let limit = credit_limit.max(Won::ZERO);
    let used_amount = outstanding_balance.clamp(Won::ZERO, limit);
    let usage_percent = if limit == Won::ZERO {
        hundred
    } else {
        round_percent(Decimal::from(used_amount.amount()) * hundred / Decimal::from(limit.amount()))
    };
    let remaining_percent = (hundred - usage_percent).max(Decimal::ZERO);

    let tier = if usage_percent <= Decimal::from(50) {
        CreditTier::Low
    } else if usage_percent <= Decimal::from(80) {
        CreditTier::Medium
    } else {
        CreditTier::High
    };

    CreditInfo {
        used_amount,
        remaining_amount: limit - used_amount,
        usage_percent,
        remaining_percent,
        total_limit: limit,
        tier,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_boundary_is_inclusive() {
        assert!(can_submit(Won(9_999_500), Won(500), CREDIT_LIMIT));
        assert!(!can_submit(Won(9_999_500), Won(501), CREDIT_LIMIT));
        assert!(can_submit(Won::ZERO, Won::ZERO, CREDIT_LIMIT));
    }

    #[test]
    fn test_guard_denies_scenario() {
        assert!(!can_submit(Won(9_999_900), Won(200), CREDIT_LIMIT));
    }

    #[test]
    fn test_guard_denies_on_overflow() {
        assert!(!can_submit(Won(i64::MAX), Won(1), Won(i64::MAX)));
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(credit_tier(Won(5_000_000), CREDIT_LIMIT).tier, CreditTier::Low);
        assert_eq!(credit_tier(Won(5_001_000), CREDIT_LIMIT).tier, CreditTier::Medium);
        assert_eq!(credit_tier(Won(8_000_000), CREDIT_LIMIT).tier, CreditTier::Medium);
        let high = credit_tier(Won(8_001_000), CREDIT_LIMIT);
        assert_eq!(high.usage_percent, Decimal::new(8001, 2));
        assert_eq!(high.tier, CreditTier::High);
    }

    #[test]
    fn test_tier_amounts_are_clamped() {
        let over = credit_tier(Won(12_000_000), CREDIT_LIMIT);
        assert_eq!(over.used_amount, CREDIT_LIMIT);
        assert_eq!(over.remaining_amount, Won::ZERO);
        assert_eq!(over.usage_percent, Decimal::ONE_HUNDRED);
        assert_eq!(over.remaining_percent, Decimal::ZERO);

        let credit = credit_tier(Won(-300), CREDIT_LIMIT);
        assert_eq!(credit.used_amount, Won::ZERO);
        assert_eq!(credit.tier, CreditTier::Low);
        assert_eq!(credit.tier.color(), "#52c41a");
    }

    #[test]
    fn test_usage_percent_rounds_half_up() {
        // 1_234_567 / 10_000_000 = 12.34567 %
        let info = credit_tier(Won(1_234_567), CREDIT_LIMIT);
        assert_eq!(info.usage_percent, Decimal::new(1235, 2));
        assert_eq!(info.remaining_percent, Decimal::new(8765, 2));
    }

    #[test]
    fn test_zero_limit_reports_full_usage() {
        let info = credit_tier(Won(10), Won::ZERO);
        assert_eq!(info.tier, CreditTier::High);
    }

    #[test]
    fn test_position_from_point() {
        let position = CreditPosition::from_point(-9_999_900, CREDIT_LIMIT);
        assert_eq!(position.outstanding_balance, Won(9_999_900));
        assert!(!position.can_submit(Won(200)));
        assert_eq!(CreditPosition::from_point(1_000, CREDIT_LIMIT).outstanding_balance, Won::ZERO);
    }
}
