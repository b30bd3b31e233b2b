//! Account and subscription records.
//!
//! Both tables are owned by external services (the auth provider and the
//! billing webhook); this service reads them and writes back only the cached
//! tier label and the credit counters.

use serde::{Deserialize, Serialize};

/// User account row from `users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Account {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    /// External subscription id (`subscriptions.polar_id`), if any.
    pub subscription: Option<String>,
    /// Cached tier label: `"free"`, `"premium"` or `"pro"`.
    pub subscription_tier: Option<String>,
    pub credits_used: i32,
    /// Month marker (`YYYY-MM`) of the last credit reset.
    pub credits_reset_date: Option<String>,
}

/// Subscription row from `subscriptions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SubscriptionRecord {
    pub polar_id: String,
    pub user_id: String,
    pub status: String,
    pub polar_price_id: Option<String>,
}

impl SubscriptionRecord {
    pub fn is_active(&self) -> bool {
        self.status.eq_ignore_ascii_case("active")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subscription(status: &str) -> SubscriptionRecord {
        SubscriptionRecord {
            polar_id: "sub_1".into(),
            user_id: "u1".into(),
            status: status.into(),
            polar_price_id: None,
        }
    }

    #[test]
    fn active_status_is_case_insensitive() {
        assert!(subscription("active").is_active());
        assert!(subscription("ACTIVE").is_active());
        assert!(!subscription("canceled").is_active());
    }
}
