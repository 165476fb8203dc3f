//! Theme engine and page rendering.
//!
//! Provides Tera-based template rendering, the localized page catalogue, and
//! the per-request color scheme preference.

mod engine;
pub mod page;
pub mod preference;

pub use engine::ThemeEngine;
pub use page::{Page, PageContext};
pub use preference::ColorScheme;
