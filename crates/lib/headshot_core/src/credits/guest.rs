//! Client-held credit counter for guests.
//!
//! The counter travels in a cookie as `<YYYY-MM>:<used>`. Anything that does
//! not parse is treated as a fresh month so a damaged cookie never blocks a
//! guest.

use std::fmt;

/// Guest usage for one month.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuestCredits {
    pub month: Option<String>,
    pub used: u32,
}

impl GuestCredits {
    pub fn parse(value: &str) -> Self {
        let Some((month, used)) = value.trim().split_once(':') else {
            return Self::default();
        };
        match (is_month_marker(month), used.parse::<u32>()) {
            (true, Ok(used)) => Self {
                month: Some(month.to_string()),
                used,
            },
            _ => Self::default(),
        }
    }

    /// Usage within `month`; a stale marker counts as zero.
    pub fn used_in(&self, month: &str) -> u32 {
        if self.month.as_deref() == Some(month) {
            self.used
        } else {
            0
        }
    }

    pub fn remaining(&self, month: &str, limit: u32) -> u32 {
        limit.saturating_sub(self.used_in(month))
    }

    /// Consume one credit in `month`, rolling over when the marker is stale.
    pub fn consume(&mut self, month: &str, limit: u32) -> bool {
        if self.month.as_deref() != Some(month) {
            self.month = Some(month.to_string());
            self.used = 1;
            return true;
        }
        if self.used >= limit {
            return false;
        }
        self.used += 1;
        true
    }

    pub fn to_cookie_value(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for GuestCredits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.month.as_deref().unwrap_or(""), self.used)
    }
}

fn is_month_marker(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 7
        && bytes[4] == b'-'
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[5..].iter().all(u8::is_ascii_digit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_value() {
        let credits = GuestCredits::parse("2026-10:3");
        assert_eq!(credits.month.as_deref(), Some("2026-10"));
        assert_eq!(credits.used, 3);
        assert_eq!(credits.to_cookie_value(), "2026-10:3");
    }

    #[test]
    fn malformed_values_are_a_fresh_month() {
        for raw in ["", "garbage", "2026-10:", "2026-10:-1", "26-10:2", "2026/10:1"] {
            assert_eq!(GuestCredits::parse(raw), GuestCredits::default(), "{raw}");
        }
    }

    #[test]
    fn rollover_resets_to_one() {
        let mut credits = GuestCredits::parse("2026-09:5");
        assert!(credits.consume("2026-10", 5));
        assert_eq!(credits.used, 1);
        assert_eq!(credits.month.as_deref(), Some("2026-10"));
    }

    #[test]
    fn limit_is_enforced_within_a_month() {
        let mut credits = GuestCredits::parse("2026-10:4");
        assert!(credits.consume("2026-10", 5));
        assert_eq!(credits.used, 5);
        assert!(!credits.consume("2026-10", 5));
        assert_eq!(credits.used, 5);
        assert_eq!(credits.remaining("2026-10", 5), 0);
    }

    #[test]
    fn stale_month_reports_full_allowance() {
        let credits = GuestCredits::parse("2026-09:5");
        assert_eq!(credits.remaining("2026-10", 5), 5);
    }
}
