//! Customer directory for the back-office users screen.
//!
//! Customers do not have accounts yet, so the directory is a fixed demo
//! data set compiled into the binary from `data/demo_users.yaml`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use cafe_rencontre_core::{Email, UserId, UserStatus};

const DEMO_USERS: &str = include_str!("../../data/demo_users.yaml");

/// One customer row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryUser {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub status: UserStatus,
    pub email_verified_at: Option<DateTime<Utc>>,
    pub two_factor_enabled: bool,
    pub created_at: DateTime<Utc>,
    pub last_order_date: Option<DateTime<Utc>>,
    pub total_orders: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_spent: Decimal,
    pub newsletter_subscribed: bool,
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Headline numbers shown above the table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UserSummary {
    pub total: usize,
    pub active: usize,
    /// Share of active users, one decimal place.
    pub active_percentage: f64,
    pub newsletter_subscribers: usize,
    pub total_orders: u64,
    /// Orders per user, one decimal place.
    pub average_orders: f64,
}

/// The full directory.
#[derive(Debug, Clone)]
pub struct UserDirectory {
    users: Vec<DirectoryUser>,
}

impl UserDirectory {
    /// Parse the bundled demo data set.
    ///
    /// # Errors
    ///
    /// Returns `serde_yaml::Error` if the bundled file is malformed.
    pub fn demo() -> Result<Self, serde_yaml::Error> {
        Ok(Self::new(serde_yaml::from_str(DEMO_USERS)?))
    }

    #[must_use]
    pub const fn new(users: Vec<DirectoryUser>) -> Self {
        Self { users }
    }

    #[must_use]
    pub fn users(&self) -> &[DirectoryUser] {
        &self.users
    }

    /// Users whose name or email contains `query`, ignoring case.
    /// A blank query matches everyone.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&DirectoryUser> {
        let needle = query.trim().to_lowercase();
        self.users
            .iter()
            .filter(|u| {
                needle.is_empty()
                    || u.name.to_lowercase().contains(&needle)
                    || u.email.as_str().contains(&needle)
            })
            .collect()
    }

    /// Summary over every user, regardless of any search.
    #[must_use]
    pub fn summary(&self) -> UserSummary {
        let total = self.users.len();
        let active = self
            .users
            .iter()
            .filter(|u| u.status == UserStatus::Active)
            .count();
        let newsletter_subscribers = self
            .users
            .iter()
            .filter(|u| u.newsletter_subscribed)
            .count();
        let total_orders: u64 = self.users.iter().map(|u| u64::from(u.total_orders)).sum();

        #[allow(clippy::cast_precision_loss)] // directory sizes are tiny
        let (active_percentage, average_orders) = if total == 0 {
            (0.0, 0.0)
        } else {
            (
                one_decimal(active as f64 / total as f64 * 100.0),
                one_decimal(total_orders as f64 / total as f64),
            )
        };

        UserSummary {
            total,
            active,
            active_percentage,
            newsletter_subscribers,
            total_orders,
            average_orders,
        }
    }
}

fn one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_data_parses() {
        let directory = UserDirectory::demo().unwrap();
        assert_eq!(directory.users().len(), 15);
        assert_eq!(directory.users()[0].name, "John Doe");
        assert!(directory.users()[4].email_verified_at.is_none());
    }

    #[test]
    fn test_summary() {
        let summary = UserDirectory::demo().unwrap().summary();
        assert_eq!(summary.total, 15);
        assert_eq!(summary.active, 9);
        assert!((summary.active_percentage - 60.0).abs() < f64::EPSILON);
        assert_eq!(summary.newsletter_subscribers, 9);
        assert_eq!(summary.total_orders, 266);
        assert!((summary.average_orders - 17.7).abs() < 1e-9);
    }

    #[test]
    fn test_search_matches_name_or_email() {
        let directory = UserDirectory::demo().unwrap();
        let names: Vec<_> = directory.search("CHEN").iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, ["Michael Chen"]);
        assert_eq!(directory.search("james.w@").len(), 1);
        assert_eq!(directory.search("  ").len(), 15);
        assert!(directory.search("nobody").is_empty());
    }

    #[test]
    fn test_empty_directory_summary() {
        let summary = UserDirectory::new(Vec::new()).summary();
        assert_eq!(summary.total, 0);
        assert!(summary.average_orders.abs() < f64::EPSILON);
    }
}
