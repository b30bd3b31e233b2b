//! Monthly credit ledger.
//!
//! One credit is consumed per generation request. Authenticated counters live
//! on the account row and are updated with conditional writes; guest counters
//! are client-held (see [`guest::GuestCredits`]).

pub mod guest;

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use self::guest::GuestCredits;
use crate::models::auth::Identity;
use crate::store::{AccountStore, StoreError};
use crate::tier::{ResolvedTier, Tier};

/// Current billing month marker, `YYYY-MM` (UTC).
pub fn current_month() -> String {
    Utc::now().format("%Y-%m").to_string()
}

/// Snapshot of a caller's monthly allowance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreditStatus {
    pub tier: Tier,
    pub is_guest: bool,
    pub used: u32,
    pub limit: u32,
    pub remaining: u32,
}

impl CreditStatus {
    fn new(resolved: &ResolvedTier, used: u32) -> Self {
        let limit = resolved.monthly_credits();
        Self {
            tier: resolved.tier,
            is_guest: resolved.is_guest,
            used,
            limit,
            remaining: limit.saturating_sub(used),
        }
    }
}

#[derive(Clone)]
pub struct CreditLedger {
    accounts: Arc<dyn AccountStore>,
}

impl CreditLedger {
    pub fn new(accounts: Arc<dyn AccountStore>) -> Self {
        Self { accounts }
    }

    /// Gate a generation request, consuming one credit when permitted.
    ///
    /// Guests are charged against `guest` in memory; the caller writes it
    /// back to the client.
    pub async fn check_and_consume(
        &self,
        identity: Option<&Identity>,
        resolved: &ResolvedTier,
        guest: &mut GuestCredits,
    ) -> bool {
        let month = current_month();
        let limit = resolved.monthly_credits();
        match identity {
            None => {
                let permitted = guest.consume(&month, limit);
                debug!(used = guest.used, limit, permitted, "guest credit check");
                permitted
            }
            Some(identity) => match self.consume_user(&identity.user_id, limit, &month).await {
                Ok(permitted) => permitted,
                Err(e) => {
                    warn!(user_id = %identity.user_id, error = %e, "credit check failed, denying");
                    false
                }
            },
        }
    }

    /// Authenticated path: rollover, then conditional increment.
    pub async fn consume_user(
        &self,
        user_id: &str,
        limit: u32,
        month: &str,
    ) -> Result<bool, StoreError> {
        let Some(account) = self.accounts.get_account(user_id).await? else {
            warn!(user_id, "no account record, denying credit");
            return Ok(false);
        };

        if account.credits_reset_date.as_deref() != Some(month)
            && self.accounts.start_credit_month(user_id, month, 1).await?
        {
            info!(user_id, month, "credit month started");
            return Ok(true);
        }

        let limit = i32::try_from(limit).unwrap_or(i32::MAX);
        match self.accounts.consume_credit(user_id, month, limit).await? {
            Some(used) => {
                debug!(user_id, used, limit, "credit consumed");
                Ok(true)
            }
            None => {
                info!(user_id, limit, "monthly credit limit reached");
                Ok(false)
            }
        }
    }

    /// Read-only status. A stale month marker reports zero usage; the reset
    /// itself happens on the next consumption.
    pub async fn credit_status(
        &self,
        identity: Option<&Identity>,
        resolved: &ResolvedTier,
        guest: &GuestCredits,
    ) -> Result<CreditStatus, StoreError> {
        let month = current_month();
        let Some(identity) = identity else {
            return Ok(CreditStatus::new(resolved, guest.used_in(&month)));
        };
        let used = self
            .accounts
            .get_account(&identity.user_id)
            .await?
            .filter(|a| a.credits_reset_date.as_deref() == Some(month.as_str()))
            .map(|a| u32::try_from(a.credits_used).unwrap_or(0))
            .unwrap_or(0);
        Ok(CreditStatus::new(resolved, used))
    }
}
