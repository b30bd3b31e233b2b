//! Subscription tiers and their entitlements.
//!
//! - [`Tier`]: the fixed plan enumeration
//! - [`TierFeatures`]: quota, monthly credits and style allowlist per plan
//! - [`price_map::PriceTierMap`]: price identifier → tier classification
//! - [`resolver::TierResolver`]: resolves a caller's plan from the stores

pub mod price_map;
pub mod resolver;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::styles::StyleId;

/// Subscription plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Guest,
    Free,
    Premium,
    Pro,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown tier: {0}")]
pub struct UnknownTier(pub String);

/// Entitlements attached to a tier.
#[derive(Debug, Clone, Copy)]
pub struct TierFeatures {
    pub name: &'static str,
    /// Images returned per generation request.
    pub quota: usize,
    /// Generation requests allowed per calendar month.
    pub monthly_credits: u32,
    pub styles: &'static [StyleId],
    /// Whether the caller's free-text prompt is forwarded to the model.
    pub custom_prompting: bool,
    pub history_access: bool,
}

const GUEST_STYLES: &[StyleId] = &[StyleId::Professional];

const FREE_STYLES: &[StyleId] = &[StyleId::Professional, StyleId::Casual, StyleId::Creative];

const PREMIUM_STYLES: &[StyleId] = &[
    StyleId::Professional,
    StyleId::Casual,
    StyleId::Creative,
    StyleId::Modern,
    StyleId::Executive,
    StyleId::Dynamic,
    StyleId::Monochrome,
    StyleId::Fashion,
];

const GUEST: TierFeatures = TierFeatures {
    name: "Guest",
    quota: 2,
    monthly_credits: 5,
    styles: GUEST_STYLES,
    custom_prompting: false,
    history_access: false,
};

const FREE: TierFeatures = TierFeatures {
    name: "Free",
    quota: 4,
    monthly_credits: 5,
    styles: FREE_STYLES,
    custom_prompting: false,
    history_access: false,
};

const PREMIUM: TierFeatures = TierFeatures {
    name: "Premium",
    quota: 6,
    monthly_credits: 20,
    styles: PREMIUM_STYLES,
    custom_prompting: true,
    history_access: true,
};

const PRO: TierFeatures = TierFeatures {
    name: "Pro",
    quota: 10,
    monthly_credits: 999_999,
    styles: &StyleId::ALL,
    custom_prompting: true,
    history_access: true,
};

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Guest => "guest",
            Tier::Free => "free",
            Tier::Premium => "premium",
            Tier::Pro => "pro",
        }
    }

    pub fn features(&self) -> &'static TierFeatures {
        match self {
            Tier::Guest => &GUEST,
            Tier::Free => &FREE,
            Tier::Premium => &PREMIUM,
            Tier::Pro => &PRO,
        }
    }

    /// Tiers that may be stored on an account (everything but guest).
    pub fn is_account_tier(&self) -> bool {
        !matches!(self, Tier::Guest)
    }

    pub fn is_paid(&self) -> bool {
        matches!(self, Tier::Premium | Tier::Pro)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = UnknownTier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "guest" => Ok(Tier::Guest),
            "free" => Ok(Tier::Free),
            "premium" => Ok(Tier::Premium),
            "pro" => Ok(Tier::Pro),
            _ => Err(UnknownTier(s.to_string())),
        }
    }
}

/// Outcome of tier resolution for one request.
///
/// Guests report the `free` tier label with `is_guest` set, and receive the
/// guest entitlements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTier {
    pub tier: Tier,
    pub quota: usize,
    pub style_allowlist: Vec<StyleId>,
    pub is_guest: bool,
}

impl ResolvedTier {
    pub fn guest() -> Self {
        Self {
            tier: Tier::Free,
            quota: GUEST.quota,
            style_allowlist: GUEST.styles.to_vec(),
            is_guest: true,
        }
    }

    pub fn for_account(tier: Tier) -> Self {
        let features = tier.features();
        Self {
            tier,
            quota: features.quota,
            style_allowlist: features.styles.to_vec(),
            is_guest: false,
        }
    }

    pub fn features(&self) -> &'static TierFeatures {
        if self.is_guest {
            Tier::Guest.features()
        } else {
            self.tier.features()
        }
    }

    pub fn allows_style(&self, style: StyleId) -> bool {
        self.style_allowlist.contains(&style)
    }

    pub fn monthly_credits(&self) -> u32 {
        self.features().monthly_credits
    }
}
