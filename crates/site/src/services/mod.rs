//! Domain services: locale resolution and translation dictionaries.

pub mod dictionary;
pub mod locale;
