//! Value Objects for the ordering portal

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub};

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            pub fn value(self) -> i64 { self.0 }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self { Self(value) }
        }
    };
}

id_type!(
    /// Catalogue product identifier; unique key of a cart line.
    ProductId
);
id_type!(
    /// Branch (pharmacy) identifier.
    PharmacyId
);
id_type!(OrderId);
id_type!(ReturnId);
id_type!(UserId);
id_type!(AdminId);
id_type!(StockTxId);
id_type!(BalanceTxId);
id_type!(NoticeId);
id_type!(AnnouncementId);
id_type!(PharmacyRequestId);

/// Whole-currency amount (KRW has no minor unit).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Won(pub i64);

impl Won {
    pub const ZERO: Won = Won(0);

    pub fn new(amount: i64) -> Self { Self(amount) }
    pub fn amount(self) -> i64 { self.0 }

    /// Line total for `quantity` units at this price.
    pub fn times(self, quantity: u32) -> Won { Won(self.0.saturating_mul(i64::from(quantity))) }

    pub fn checked_add(self, other: Won) -> Option<Won> { self.0.checked_add(other.0).map(Won) }
}

impl Add for Won {
    type Output = Won;
    fn add(self, rhs: Won) -> Won { Won(self.0.saturating_add(rhs.0)) }
}

impl AddAssign for Won {
    fn add_assign(&mut self, rhs: Won) { *self = *self + rhs; }
}

impl Sub for Won {
    type Output = Won;
    fn sub(self, rhs: Won) -> Won { Won(self.0.saturating_sub(rhs.0)) }
}

impl Neg for Won {
    type Output = Won;
    fn neg(self) -> Won { Won(self.0.saturating_neg()) }
}

impl Sum for Won {
    fn sum<I: Iterator<Item = Won>>(iter: I) -> Won { iter.fold(Won::ZERO, Add::add) }
}

impl<'a> Sum<&'a Won> for Won {
    fn sum<I: Iterator<Item = &'a Won>>(iter: I) -> Won { iter.copied().sum() }
}

impl fmt::Display for Won {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 { grouped.push(','); }
            grouped.push(c);
        }
        if self.0 < 0 { write!(f, "-{}원", grouped) } else { write!(f, "{}원", grouped) }
    }
}

fn digits_only(raw: &str) -> String { raw.chars().filter(char::is_ascii_digit).collect() }

/// Formats a phone number as it is typed.
///
/// Seoul numbers (`02` prefix) become `02-XXX-XXXX` or `02-XXXX-XXXX`,
/// everything else `XXX-XXX-XXXX` or `XXX-XXXX-XXXX`.
pub fn format_contact(raw: &str) -> String {
    let num = digits_only(raw);
    let len = num.len();
    if num.starts_with("02") {
        return match len {
            0..=2 => num,
            3..=6 => format!("{}-{}", &num[..2], &num[2..]),
            10 => format!("{}-{}-{}", &num[..2], &num[2..6], &num[6..]),
            _ => format!("{}-{}-{}", &num[..2], &num[2..5], &num[5..]),
        };
    }
    match len {
        0..=3 => num,
        4..=6 => format!("{}-{}", &num[..3], &num[3..]),
        11 => format!("{}-{}-{}", &num[..3], &num[3..7], &num[7..]),
        _ => format!("{}-{}-{}", &num[..3], &num[3..6], &num[6..]),
    }
}

/// Formats a business registration number as `XXX-XX-XXXXX`.
pub fn format_biz_reg_no(raw: &str) -> String {
    let num = digits_only(raw);
    match num.len() {
        0..=3 => num,
        4..=5 => format!("{}-{}", &num[..3], &num[3..]),
        _ => format!("{}-{}-{}", &num[..3], &num[3..5], &num[5..]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_won_sum_and_times() {
        let total: Won = [Won(100).times(2), Won(250)].iter().sum();
        assert_eq!(total, Won(450));
        assert_eq!(Won::ZERO.times(7), Won::ZERO);
    }

    #[test]
    fn test_won_display_groups_thousands() {
        assert_eq!(Won(10_000_000).to_string(), "10,000,000원");
        assert_eq!(Won(-1_500).to_string(), "-1,500원");
        assert_eq!(Won(999).to_string(), "999원");
    }

    #[test]
    fn test_format_contact() {
        assert_eq!(format_contact("0212345678"), "02-1234-5678");
        assert_eq!(format_contact("021234567"), "02-123-4567");
        assert_eq!(format_contact("01012345678"), "010-1234-5678");
        assert_eq!(format_contact("0311234567"), "031-123-4567");
        assert_eq!(format_contact("010-12"), "010-12");
        assert_eq!(format_contact("02"), "02");
        assert_eq!(format_contact(""), "");
    }

    #[test]
    fn test_format_biz_reg_no() {
        assert_eq!(format_biz_reg_no("1234567890"), "123-45-67890");
        assert_eq!(format_biz_reg_no("1234"), "123-4");
        assert_eq!(format_biz_reg_no("12"), "12");
    }
}
