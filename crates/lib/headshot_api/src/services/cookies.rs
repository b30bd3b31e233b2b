//! Guest credit cookie.
//!
//! Guests have no account row, so their monthly counter is held client-side
//! in `headshot_guest_credits=<YYYY-MM>:<used>`.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use headshot_core::credits::guest::GuestCredits;
use time::Duration;

pub const GUEST_CREDITS_COOKIE: &str = "headshot_guest_credits";

/// Guest counter from the request; absent or malformed means a fresh month.
pub fn guest_credits(jar: &CookieJar) -> GuestCredits {
    jar.get(GUEST_CREDITS_COOKIE)
        .map(|c| GuestCredits::parse(c.value()))
        .unwrap_or_default()
}

/// Build the cookie carrying the updated guest counter (kept ~2 months).
pub fn guest_credits_cookie(credits: &GuestCredits) -> Cookie<'static> {
    Cookie::build((GUEST_CREDITS_COOKIE.to_string(), credits.to_cookie_value()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/".to_string())
        .max_age(Duration::days(62))
        .build()
}
