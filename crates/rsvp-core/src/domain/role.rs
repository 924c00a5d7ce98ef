//! Requester roles

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ReservationError;

/// Role a requester acts under when touching a reservation.
///
/// Roles arrive as plain identifiers from the authentication context and are
/// parsed case-insensitively. Anything outside this set is unsupported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// The user who booked the reservation
    Customer,
    /// The registered owner of the reservation's store
    Owner,
    /// Platform operator
    Admin,
}

impl Role {
    /// Every known role, in registry check order
    pub const ALL: [Role; 3] = [Role::Customer, Role::Owner, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "CUSTOMER",
            Self::Owner => "OWNER",
            Self::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ReservationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CUSTOMER" => Ok(Self::Customer),
            "OWNER" => Ok(Self::Owner),
            "ADMIN" => Ok(Self::Admin),
            _ => Err(ReservationError::UnsupportedRole(s.to_string())),
        }
    }
}
