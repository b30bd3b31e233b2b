//! In-memory store backend.
//!
//! Mirrors the conditional-update semantics of the Postgres backend so the
//! ledger behaves identically in tests and offline runs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AccountStore, HeadshotStore, StoreError, SubscriptionStore};
use crate::models::account::{Account, SubscriptionRecord};
use crate::models::headshot::{NewHeadshot, SavedHeadshot};
use crate::uuid::uuidv7;

#[derive(Debug, Default)]
pub struct MemoryStore {
    accounts: RwLock<HashMap<String, Account>>,
    subscriptions: RwLock<Vec<SubscriptionRecord>>,
    headshots: RwLock<Vec<SavedHeadshot>>,
    failing: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_account(&self, account: Account) {
        self.accounts
            .write()
            .await
            .insert(account.id.clone(), account);
    }

    pub async fn insert_subscription(&self, subscription: SubscriptionRecord) {
        self.subscriptions.write().await.push(subscription);
    }

    /// Snapshot of an account, bypassing failure injection.
    pub async fn account(&self, user_id: &str) -> Option<Account> {
        self.accounts.read().await.get(user_id).cloned()
    }

    /// Make every subsequent store call fail with [`StoreError::Unavailable`].
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store set to fail".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn get_account(&self, user_id: &str) -> Result<Option<Account>, StoreError> {
        self.check()?;
        Ok(self.accounts.read().await.get(user_id).cloned())
    }

    async fn set_tier(&self, user_id: &str, tier: &str) -> Result<(), StoreError> {
        self.check()?;
        if let Some(account) = self.accounts.write().await.get_mut(user_id) {
            account.subscription_tier = Some(tier.to_string());
        }
        Ok(())
    }

    async fn start_credit_month(
        &self,
        user_id: &str,
        month: &str,
        used: i32,
    ) -> Result<bool, StoreError> {
        self.check()?;
        let mut accounts = self.accounts.write().await;
        match accounts.get_mut(user_id) {
            Some(account) if account.credits_reset_date.as_deref() != Some(month) => {
                account.credits_used = used;
                account.credits_reset_date = Some(month.to_string());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn consume_credit(
        &self,
        user_id: &str,
        month: &str,
        limit: i32,
    ) -> Result<Option<i32>, StoreError> {
        self.check()?;
        let mut accounts = self.accounts.write().await;
        match accounts.get_mut(user_id) {
            Some(account)
                if account.credits_reset_date.as_deref() == Some(month)
                    && account.credits_used < limit =>
            {
                account.credits_used += 1;
                Ok(Some(account.credits_used))
            }
            _ => Ok(None),
        }
    }
}

#[async_trait]
impl SubscriptionStore for MemoryStore {
    async fn subscription_by_id(
        &self,
        polar_id: &str,
    ) -> Result<Option<SubscriptionRecord>, StoreError> {
        self.check()?;
        Ok(self
            .subscriptions
            .read()
            .await
            .iter()
            .find(|s| s.polar_id == polar_id)
            .cloned())
    }

    async fn active_subscription(
        &self,
        user_id: &str,
    ) -> Result<Option<SubscriptionRecord>, StoreError> {
        self.check()?;
        Ok(self
            .subscriptions
            .read()
            .await
            .iter()
            .rev()
            .find(|s| s.user_id == user_id && s.is_active())
            .cloned())
    }
}

#[async_trait]
impl HeadshotStore for MemoryStore {
    async fn insert_headshot(&self, headshot: NewHeadshot) -> Result<SavedHeadshot, StoreError> {
        self.check()?;
        let saved = SavedHeadshot {
            id: uuidv7(),
            user_id: headshot.user_id,
            image_url: headshot.image_url,
            style: headshot.style,
            description: headshot.description,
            created_at: Utc::now(),
        };
        self.headshots.write().await.push(saved.clone());
        Ok(saved)
    }

    async fn list_headshots(&self, user_id: &str) -> Result<Vec<SavedHeadshot>, StoreError> {
        self.check()?;
        let mut rows: Vec<SavedHeadshot> = self
            .headshots
            .read()
            .await
            .iter()
            .filter(|h| h.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn delete_headshot(&self, user_id: &str, id: Uuid) -> Result<bool, StoreError> {
        self.check()?;
        let mut headshots = self.headshots.write().await;
        let before = headshots.len();
        headshots.retain(|h| !(h.id == id && h.user_id == user_id));
        Ok(headshots.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(id: &str) -> Account {
        Account {
            id: id.into(),
            email: format!("{id}@example.com"),
            name: None,
            subscription: None,
            subscription_tier: None,
            credits_used: 3,
            credits_reset_date: Some("2026-09".into()),
        }
    }

    #[tokio::test]
    async fn start_credit_month_resets_only_once() {
        let store = MemoryStore::new();
        store.insert_account(account("u1")).await;

        assert!(store.start_credit_month("u1", "2026-10", 1).await.unwrap());
        assert!(!store.start_credit_month("u1", "2026-10", 1).await.unwrap());

        let stored = store.account("u1").await.unwrap();
        assert_eq!(stored.credits_used, 1);
        assert_eq!(stored.credits_reset_date.as_deref(), Some("2026-10"));
    }

    #[tokio::test]
    async fn consume_credit_stops_at_limit() {
        let store = MemoryStore::new();
        store.insert_account(account("u1")).await;

        assert_eq!(store.consume_credit("u1", "2026-09", 5).await.unwrap(), Some(4));
        assert_eq!(store.consume_credit("u1", "2026-09", 5).await.unwrap(), Some(5));
        assert_eq!(store.consume_credit("u1", "2026-09", 5).await.unwrap(), None);
    }

    #[tokio::test]
    async fn consume_credit_requires_current_month_marker() {
        let store = MemoryStore::new();
        store.insert_account(account("u1")).await;
        assert_eq!(store.consume_credit("u1", "2026-10", 5).await.unwrap(), None);
    }

    #[tokio::test]
    async fn failing_store_reports_unavailable() {
        let store = MemoryStore::new();
        store.set_failing(true);
        assert!(matches!(
            store.get_account("u1").await,
            Err(StoreError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn delete_is_scoped_to_owner() {
        let store = MemoryStore::new();
        let saved = store
            .insert_headshot(NewHeadshot {
                user_id: "owner".into(),
                image_url: "https://img/1".into(),
                style: "professional".into(),
                description: String::new(),
            })
            .await
            .unwrap();

        assert!(!store.delete_headshot("intruder", saved.id).await.unwrap());
        assert!(store.delete_headshot("owner", saved.id).await.unwrap());
        assert!(store.list_headshots("owner").await.unwrap().is_empty());
    }
}
