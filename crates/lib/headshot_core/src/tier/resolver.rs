//! Tier resolution for a request.

use std::sync::Arc;

use tracing::{debug, warn};

use super::price_map::PriceTierMap;
use super::{ResolvedTier, Tier};
use crate::models::auth::Identity;
use crate::store::{AccountStore, StoreError, SubscriptionStore};

/// Resolves a caller's plan from the account's cached tier label, falling back
/// to the subscription record.
#[derive(Clone)]
pub struct TierResolver {
    accounts: Arc<dyn AccountStore>,
    subscriptions: Arc<dyn SubscriptionStore>,
    prices: PriceTierMap,
}

impl TierResolver {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        subscriptions: Arc<dyn SubscriptionStore>,
        prices: PriceTierMap,
    ) -> Self {
        Self {
            accounts,
            subscriptions,
            prices,
        }
    }

    /// Resolve the caller's tier. Never fails: lookup errors degrade to
    /// `free`.
    pub async fn resolve(&self, identity: Option<&Identity>) -> ResolvedTier {
        let Some(identity) = identity else {
            return ResolvedTier::guest();
        };
        match self.account_tier(&identity.user_id).await {
            Ok(tier) => ResolvedTier::for_account(tier),
            Err(e) => {
                warn!(user_id = %identity.user_id, error = %e, "tier lookup failed, using free tier");
                ResolvedTier::for_account(Tier::Free)
            }
        }
    }

    async fn account_tier(&self, user_id: &str) -> Result<Tier, StoreError> {
        let Some(account) = self.accounts.get_account(user_id).await? else {
            debug!(user_id, "no account record, using free tier");
            return Ok(Tier::Free);
        };

        if let Some(label) = account.subscription_tier.as_deref() {
            match label.parse::<Tier>() {
                Ok(tier) if tier.is_account_tier() => return Ok(tier),
                _ => warn!(user_id, label, "ignoring invalid cached tier label"),
            }
        }

        let subscription = match account.subscription.as_deref() {
            Some(polar_id) => self.subscriptions.subscription_by_id(polar_id).await?,
            None => self.subscriptions.active_subscription(user_id).await?,
        };

        let Some(subscription) = subscription.filter(|s| s.is_active()) else {
            return Ok(Tier::Free);
        };

        let tier = self.prices.classify(subscription.polar_price_id.as_deref());
        debug!(user_id, tier = %tier, price = ?subscription.polar_price_id, "derived tier from subscription");

        if let Err(e) = self.accounts.set_tier(user_id, tier.as_str()).await {
            warn!(user_id, error = %e, "failed to cache derived tier");
        }
        Ok(tier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::account::{Account, SubscriptionRecord};
    use crate::store::memory::MemoryStore;

    fn account(id: &str, tier: Option<&str>, subscription: Option<&str>) -> Account {
        Account {
            id: id.into(),
            email: format!("{id}@example.com"),
            name: None,
            subscription: subscription.map(String::from),
            subscription_tier: tier.map(String::from),
            credits_used: 0,
            credits_reset_date: None,
        }
    }

    fn subscription(id: &str, user: &str, status: &str, price: &str) -> SubscriptionRecord {
        SubscriptionRecord {
            polar_id: id.into(),
            user_id: user.into(),
            status: status.into(),
            polar_price_id: Some(price.into()),
        }
    }

    fn identity(id: &str) -> Identity {
        Identity {
            user_id: id.into(),
            email: format!("{id}@example.com"),
        }
    }

    fn resolver(store: &Arc<MemoryStore>) -> TierResolver {
        TierResolver::new(store.clone(), store.clone(), PriceTierMap::default())
    }

    #[tokio::test]
    async fn no_identity_is_guest() {
        let store = Arc::new(MemoryStore::new());
        assert_eq!(resolver(&store).resolve(None).await, ResolvedTier::guest());
    }

    #[tokio::test]
    async fn cached_label_is_used_without_subscription_lookup() {
        let store = Arc::new(MemoryStore::new());
        store.insert_account(account("u1", Some("premium"), None)).await;
        let resolved = resolver(&store).resolve(Some(&identity("u1"))).await;
        assert_eq!(resolved.tier, Tier::Premium);
        assert_eq!(resolved.quota, 6);
        assert!(!resolved.is_guest);
    }

    #[tokio::test]
    async fn subscription_reference_is_classified_and_cached() {
        let store = Arc::new(MemoryStore::new());
        store.insert_account(account("u1", None, Some("sub_1"))).await;
        store
            .insert_subscription(subscription("sub_1", "u1", "active", "price_pro_monthly"))
            .await;

        let resolved = resolver(&store).resolve(Some(&identity("u1"))).await;
        assert_eq!(resolved.tier, Tier::Pro);
        let cached = store.account("u1").await.unwrap();
        assert_eq!(cached.subscription_tier.as_deref(), Some("pro"));
    }

    #[tokio::test]
    async fn active_subscription_by_owner_is_found_without_reference() {
        let store = Arc::new(MemoryStore::new());
        store.insert_account(account("u1", None, None)).await;
        store
            .insert_subscription(subscription("sub_9", "u1", "active", "price_premium"))
            .await;
        let resolved = resolver(&store).resolve(Some(&identity("u1"))).await;
        assert_eq!(resolved.tier, Tier::Premium);
    }

    #[tokio::test]
    async fn inactive_subscription_is_free_and_not_cached() {
        let store = Arc::new(MemoryStore::new());
        store.insert_account(account("u1", None, Some("sub_1"))).await;
        store
            .insert_subscription(subscription("sub_1", "u1", "canceled", "price_pro"))
            .await;

        let resolved = resolver(&store).resolve(Some(&identity("u1"))).await;
        assert_eq!(resolved.tier, Tier::Free);
        assert_eq!(store.account("u1").await.unwrap().subscription_tier, None);
    }

    #[tokio::test]
    async fn lookup_failure_degrades_to_free() {
        let store = Arc::new(MemoryStore::new());
        store.insert_account(account("u1", Some("pro"), None)).await;
        store.set_failing(true);
        let resolved = resolver(&store).resolve(Some(&identity("u1"))).await;
        assert_eq!(resolved, ResolvedTier::for_account(Tier::Free));
    }

    #[tokio::test]
    async fn explicit_price_table_is_honoured() {
        let store = Arc::new(MemoryStore::new());
        store.insert_account(account("u1", None, None)).await;
        store
            .insert_subscription(subscription("sub_1", "u1", "active", "price_8f2"))
            .await;
        let prices = PriceTierMap::parse("price_8f2=pro").unwrap();
        let resolver = TierResolver::new(store.clone(), store.clone(), prices);
        assert_eq!(resolver.resolve(Some(&identity("u1"))).await.tier, Tier::Pro);
    }
}
