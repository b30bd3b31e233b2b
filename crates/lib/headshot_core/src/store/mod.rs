//! Storage seams for accounts, subscriptions, and saved headshots.
//!
//! [`postgres::PgStore`] is the production backend; [`memory::MemoryStore`]
//! is an offline backend used by tests and by the server's in-memory mode.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::account::{Account, SubscriptionRecord};
use crate::models::headshot::{NewHeadshot, SavedHeadshot};

/// Errors raised by any store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Read/write access to user accounts.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn get_account(&self, user_id: &str) -> Result<Option<Account>, StoreError>;

    /// Cache a derived tier label on the account.
    async fn set_tier(&self, user_id: &str, tier: &str) -> Result<(), StoreError>;

    /// Start a new credit month: sets the counter to `used` and the marker to
    /// `month`, but only when the stored marker differs from `month`.
    ///
    /// Returns `true` when this call performed the reset.
    async fn start_credit_month(
        &self,
        user_id: &str,
        month: &str,
        used: i32,
    ) -> Result<bool, StoreError>;

    /// Increment the counter when the marker equals `month` and the counter is
    /// below `limit`, as one conditional update.
    ///
    /// Returns the new counter, or `None` when the limit was already reached.
    async fn consume_credit(
        &self,
        user_id: &str,
        month: &str,
        limit: i32,
    ) -> Result<Option<i32>, StoreError>;
}

/// Read-only access to billing subscriptions.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    async fn subscription_by_id(
        &self,
        polar_id: &str,
    ) -> Result<Option<SubscriptionRecord>, StoreError>;

    /// Most recent active subscription owned by the user.
    async fn active_subscription(
        &self,
        user_id: &str,
    ) -> Result<Option<SubscriptionRecord>, StoreError>;
}

/// Saved headshot records.
#[async_trait]
pub trait HeadshotStore: Send + Sync {
    async fn insert_headshot(&self, headshot: NewHeadshot) -> Result<SavedHeadshot, StoreError>;

    /// Owner's headshots, newest first.
    async fn list_headshots(&self, user_id: &str) -> Result<Vec<SavedHeadshot>, StoreError>;

    /// Delete when owned by `user_id`; returns whether a row was removed.
    async fn delete_headshot(&self, user_id: &str, id: Uuid) -> Result<bool, StoreError>;
}
