//! Reservation policy projection

use serde::{Deserialize, Serialize};

/// How much deposit a store requires for a booking.
///
/// Amounts are integer minor currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DepositRule {
    /// No deposit required
    #[default]
    None,
    /// Fixed amount per reservation
    Flat { amount: i64 },
    /// Amount multiplied by headcount
    PerPerson { amount: i64 },
    /// Per-person amount, only for parties larger than `threshold`
    PerPersonAbove { threshold: u32, amount: i64 },
}

impl DepositRule {
    /// Deposit owed for a party of `headcount`
    ///
    /// `None` when the rule carries a negative amount or the total overflows.
    pub fn required_deposit(&self, headcount: u32) -> Option<i64> {
        match *self {
            Self::None => Some(0),
            Self::Flat { amount } => non_negative(amount),
            Self::PerPerson { amount } => per_person(amount, headcount),
            Self::PerPersonAbove { threshold, amount } => {
                let amount = non_negative(amount)?;
                if headcount > threshold {
                    per_person(amount, headcount)
                } else {
                    Some(0)
                }
            }
        }
    }
}

fn non_negative(amount: i64) -> Option<i64> {
    (amount >= 0).then_some(amount)
}

fn per_person(amount: i64, headcount: u32) -> Option<i64> {
    non_negative(amount)?.checked_mul(i64::from(headcount))
}

/// Reservation policy for a store, fetched per check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationPolicy {
    pub store_id: String,
    #[serde(default)]
    pub deposit_rule: DepositRule,
}

impl ReservationPolicy {
    /// Policy used when the store has none on record
    pub fn no_deposit(store_id: impl Into<String>) -> Self {
        Self {
            store_id: store_id.into(),
            deposit_rule: DepositRule::None,
        }
    }

    pub fn required_deposit(&self, headcount: u32) -> Option<i64> {
        self.deposit_rule.required_deposit(headcount)
    }
}
