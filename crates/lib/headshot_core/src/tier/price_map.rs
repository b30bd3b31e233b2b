//! Price identifier → tier classification.
//!
//! Mappings are declared as `PRICE_TIER_MAP="price_a=pro,price_b=premium"`
//! and validated when the configuration is loaded. Prices missing from the
//! table fall back to the legacy marker rule (`pro` / `premium` substrings)
//! unless it is disabled.

use std::collections::HashMap;

use thiserror::Error;

use super::Tier;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PriceMapError {
    #[error("Malformed price mapping entry: {0:?} (expected price=tier)")]
    Malformed(String),

    #[error("Price {price:?} maps to unknown tier {tier:?}")]
    UnknownTier { price: String, tier: String },

    #[error("Price {0:?} cannot map to the guest tier")]
    GuestTier(String),

    #[error("Price {0:?} is mapped more than once")]
    Duplicate(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceTierMap {
    entries: HashMap<String, Tier>,
    legacy_markers: bool,
}

impl Default for PriceTierMap {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            legacy_markers: true,
        }
    }
}

impl PriceTierMap {
    /// Parse a comma-separated `price=tier` list. Blank input yields the
    /// default (empty) table.
    pub fn parse(spec: &str) -> Result<Self, PriceMapError> {
        let mut entries = HashMap::new();
        for raw in spec.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (price, tier) = raw
                .split_once('=')
                .map(|(p, t)| (p.trim(), t.trim()))
                .filter(|(p, t)| !p.is_empty() && !t.is_empty())
                .ok_or_else(|| PriceMapError::Malformed(raw.to_string()))?;
            let parsed: Tier = tier.parse().map_err(|_| PriceMapError::UnknownTier {
                price: price.to_string(),
                tier: tier.to_string(),
            })?;
            if !parsed.is_account_tier() {
                return Err(PriceMapError::GuestTier(price.to_string()));
            }
            if entries.insert(price.to_string(), parsed).is_some() {
                return Err(PriceMapError::Duplicate(price.to_string()));
            }
        }
        Ok(Self {
            entries,
            legacy_markers: true,
        })
    }

    /// Disable the substring fallback so only explicit entries classify.
    pub fn without_legacy_markers(mut self) -> Self {
        self.legacy_markers = false;
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Tier for an *active* subscription with the given price. Any active
    /// subscription is at least premium.
    pub fn classify(&self, price_id: Option<&str>) -> Tier {
        let Some(price_id) = price_id.map(str::trim).filter(|p| !p.is_empty()) else {
            return Tier::Premium;
        };
        if let Some(tier) = self.entries.get(price_id) {
            return *tier;
        }
        if self.legacy_markers {
            let lowered = price_id.to_ascii_lowercase();
            if lowered.contains("pro") {
                return Tier::Pro;
            }
            if lowered.contains("premium") {
                return Tier::Premium;
            }
        }
        Tier::Premium
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_entries_win_over_markers() {
        let map = PriceTierMap::parse("price_pro_legacy=premium, price_123=pro").unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.classify(Some("price_pro_legacy")), Tier::Premium);
        assert_eq!(map.classify(Some("price_123")), Tier::Pro);
    }

    #[test]
    fn legacy_markers_classify_unmapped_prices() {
        let map = PriceTierMap::default();
        assert_eq!(map.classify(Some("PRICE_PRO_MONTHLY")), Tier::Pro);
        assert_eq!(map.classify(Some("price_premium_yearly")), Tier::Premium);
        assert_eq!(map.classify(Some("price_basic")), Tier::Premium);
        assert_eq!(map.classify(None), Tier::Premium);
    }

    #[test]
    fn markers_can_be_disabled() {
        let map = PriceTierMap::parse("").unwrap().without_legacy_markers();
        assert!(map.is_empty());
        assert_eq!(map.classify(Some("price_pro")), Tier::Premium);
    }

    #[test]
    fn rejects_malformed_entries() {
        assert_eq!(
            PriceTierMap::parse("price_a"),
            Err(PriceMapError::Malformed("price_a".into()))
        );
        assert_eq!(
            PriceTierMap::parse("=pro"),
            Err(PriceMapError::Malformed("=pro".into()))
        );
    }

    #[test]
    fn rejects_unknown_guest_and_duplicate_tiers() {
        assert!(matches!(
            PriceTierMap::parse("price_a=gold"),
            Err(PriceMapError::UnknownTier { .. })
        ));
        assert_eq!(
            PriceTierMap::parse("price_a=guest"),
            Err(PriceMapError::GuestTier("price_a".into()))
        );
        assert_eq!(
            PriceTierMap::parse("price_a=pro,price_a=premium"),
            Err(PriceMapError::Duplicate("price_a".into()))
        );
    }
}
