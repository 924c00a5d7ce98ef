//! Store ownership projection owned by the store-directory service

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Daily opening window in store-local time.
///
/// A window whose `closes_at` is earlier than `opens_at` runs past midnight.
/// Equal bounds mean the store never closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatingHours {
    pub opens_at: NaiveTime,
    pub closes_at: NaiveTime,
}

impl OperatingHours {
    pub fn new(opens_at: NaiveTime, closes_at: NaiveTime) -> Self {
        Self { opens_at, closes_at }
    }

    /// Open around the clock
    pub fn always_open() -> Self {
        Self::new(NaiveTime::MIN, NaiveTime::MIN)
    }

    /// Check whether a local time falls inside the window (close is exclusive)
    pub fn contains(&self, time: NaiveTime) -> bool {
        if self.opens_at == self.closes_at {
            return true;
        }
        if self.opens_at < self.closes_at {
            time >= self.opens_at && time < self.closes_at
        } else {
            time >= self.opens_at || time < self.closes_at
        }
    }
}

/// Authoritative ownership fact for a store.
///
/// Read-only. Always fetched fresh from the directory, never cached here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreOwnershipFact {
    pub store_id: String,
    pub owner_id: String,
    pub store_name: String,
    pub operating_hours: OperatingHours,
}

impl StoreOwnershipFact {
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner_id == user_id
    }
}
