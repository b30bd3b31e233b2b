//! Per-request context: who is calling and what their plan allows.

use headshot_core::models::auth::Identity;
use headshot_core::tier::ResolvedTier;

use crate::AppState;

/// Resolved once per request and passed to every step that needs it.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub identity: Option<Identity>,
    pub tier: ResolvedTier,
}

impl RequestContext {
    pub async fn resolve(state: &AppState, identity: Option<Identity>) -> Self {
        let tier = state.resolver.resolve(identity.as_ref()).await;
        Self { identity, tier }
    }

    pub fn user_id(&self) -> Option<&str> {
        self.identity.as_ref().map(|i| i.user_id.as_str())
    }
}
