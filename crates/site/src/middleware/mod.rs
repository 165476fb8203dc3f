//! HTTP middleware components.
//!
//! Provides the session access guard and locale negotiation layers.

pub mod access_guard;
pub mod locale;

pub use access_guard::{AccessPolicy, GuardDecision, PrefixMatch, guard_access};
pub use locale::{ResolvedLocale, negotiate_locale};
