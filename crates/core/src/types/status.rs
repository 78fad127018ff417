//! Status enums for orders, users and admins.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle of a placed order.
///
/// Every order starts as `Pending`. Back-office staff move it to one of the
/// three terminal states; nothing leaves a terminal state.
///
/// ```text
/// pending ──► accepted
///    │   ├──► declined
///    │   └──► cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "cafe.order_status", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Accepted,
    Declined,
    Cancelled,
}

/// Rejected order status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot move order from {from} to {to}")]
pub struct StatusTransitionError {
    /// Status the order currently has.
    pub from: OrderStatus,
    /// Status that was requested.
    pub to: OrderStatus,
}

/// Unknown status literal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid status: {0}")]
pub struct ParseStatusError(pub String);

impl OrderStatus {
    /// All statuses in display order.
    pub const ALL: [Self; 4] = [
        Self::Pending,
        Self::Accepted,
        Self::Declined,
        Self::Cancelled,
    ];

    /// The literal used on the wire and in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether no further transition is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Whether staff may set `next` on an order that is currently `self`.
    ///
    /// Re-applying the current status is allowed so notes can be edited
    /// without changing the status.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self == next || !self.is_terminal()
    }

    /// Validate a transition, returning the new status.
    ///
    /// # Errors
    ///
    /// Returns [`StatusTransitionError`] when `self` is terminal and `next`
    /// differs from it.
    pub fn transition(self, next: Self) -> Result<Self, StatusTransitionError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(StatusTransitionError {
                from: self,
                to: next,
            })
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseStatusError(s.to_owned()))
    }
}

/// Account state shown on the back-office user screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Inactive,
    Suspended,
}

/// Admin role with different permission levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "admin.admin_role", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    /// Everything, including creating other admins.
    SuperAdmin,
    /// Order and catalog management.
    Admin,
    /// Read-only access.
    Viewer,
}

impl AdminRole {
    /// Whether this role may change order status.
    #[must_use]
    pub const fn can_manage_orders(self) -> bool {
        matches!(self, Self::SuperAdmin | Self::Admin)
    }
}

impl fmt::Display for AdminRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SuperAdmin => write!(f, "super_admin"),
            Self::Admin => write!(f, "admin"),
            Self::Viewer => write!(f, "viewer"),
        }
    }
}

impl FromStr for AdminRole {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super_admin" => Ok(Self::SuperAdmin),
            "admin" => Ok(Self::Admin),
            "viewer" => Ok(Self::Viewer),
            _ => Err(ParseStatusError(s.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_reaches_every_terminal_state() {
        for next in [
            OrderStatus::Accepted,
            OrderStatus::Declined,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(OrderStatus::Pending.transition(next), Ok(next));
        }
    }

    #[test]
    fn test_terminal_states_are_final() {
        let err = OrderStatus::Accepted
            .transition(OrderStatus::Pending)
            .unwrap_err();
        assert_eq!(err.from, OrderStatus::Accepted);
        assert_eq!(err.to, OrderStatus::Pending);
        assert!(
            !OrderStatus::Declined.can_transition_to(OrderStatus::Accepted),
            "declined orders stay declined"
        );
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Declined));
    }

    #[test]
    fn test_same_status_is_allowed_for_note_edits() {
        assert!(OrderStatus::Accepted.can_transition_to(OrderStatus::Accepted));
    }

    #[test]
    fn test_wire_literals() {
        for status in OrderStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{status}\""));
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
        assert!("shipped".parse::<OrderStatus>().is_err());
        assert!(serde_json::from_str::<OrderStatus>("\"Pending\"").is_err());
    }

    #[test]
    fn test_admin_role_roundtrip() {
        assert_eq!("viewer".parse::<AdminRole>().unwrap(), AdminRole::Viewer);
        assert_eq!(AdminRole::SuperAdmin.to_string(), "super_admin");
        assert!(!AdminRole::Viewer.can_manage_orders());
    }
}
