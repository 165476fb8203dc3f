//! Medassist test utilities.
//!
//! Request payload builders for the public submission endpoints, cookie
//! header helpers, and assertion utilities for rendered pages and JSON.

use serde_json::{Value as JsonValue, json};

/// A valid appointment request.
pub fn appointment_request() -> TestAppointment {
    TestAppointment {
        fields: json!({
            "full_name": "Amina El Idrissi",
            "email": "amina@example.com",
            "phone": "+212 6 00 00 00 00",
            "service": "Home nursing",
            "preferred_date": "2026-11-03",
            "message": "Daily injections for two weeks.",
            "locale": "fr"
        }),
    }
}

/// Appointment payload builder.
#[derive(Debug, Clone)]
pub struct TestAppointment {
    fields: JsonValue,
}

impl TestAppointment {
    /// Set any field, including unknown ones.
    pub fn with(mut self, name: &str, value: JsonValue) -> Self {
        if let Some(obj) = self.fields.as_object_mut() {
            obj.insert(name.to_string(), value);
        }
        self
    }

    /// Drop a field from the payload.
    pub fn without(mut self, name: &str) -> Self {
        if let Some(obj) = self.fields.as_object_mut() {
            obj.remove(name);
        }
        self
    }

    pub fn with_locale(self, locale: &str) -> Self {
        self.with("locale", json!(locale))
    }

    pub fn json(&self) -> JsonValue {
        self.fields.clone()
    }

    pub fn body(&self) -> String {
        self.fields.to_string()
    }
}

/// A valid contact message.
pub fn contact_message() -> TestContactMessage {
    TestContactMessage {
        fields: json!({
            "name": "Claire Martin",
            "email": "claire@example.fr",
            "subject": "Tarifs",
            "message": "Bonjour, quels sont vos tarifs pour un suivi mensuel ?",
            "locale": "fr"
        }),
    }
}

/// Contact message payload builder.
#[derive(Debug, Clone)]
pub struct TestContactMessage {
    fields: JsonValue,
}

impl TestContactMessage {
    pub fn with(mut self, name: &str, value: JsonValue) -> Self {
        if let Some(obj) = self.fields.as_object_mut() {
            obj.insert(name.to_string(), value);
        }
        self
    }

    pub fn without(mut self, name: &str) -> Self {
        if let Some(obj) = self.fields.as_object_mut() {
            obj.remove(name);
        }
        self
    }

    pub fn json(&self) -> JsonValue {
        self.fields.clone()
    }

    pub fn body(&self) -> String {
        self.fields.to_string()
    }
}

/// Build a `Cookie` request header value from name/value pairs.
pub fn cookie_header(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// A `Cookie` header carrying a session credential.
pub fn session_cookie(value: &str) -> String {
    cookie_header(&[("user-session", value)])
}

/// Assertion helpers for JSON and rendered HTML.
pub mod assert {
    use serde_json::Value;

    /// Assert that a JSON value has a specific key.
    pub fn has_key(value: &Value, key: &str) {
        assert!(
            value.get(key).is_some(),
            "Expected JSON to have key '{key}', got: {value}"
        );
    }

    /// Assert that a string contains a substring.
    pub fn contains(haystack: &str, needle: &str) {
        assert!(
            haystack.contains(needle),
            "Expected string to contain '{needle}'\nActual: {haystack}"
        );
    }

    /// Assert that a string does not contain a substring.
    pub fn not_contains(haystack: &str, needle: &str) {
        assert!(
            !haystack.contains(needle),
            "Expected string to NOT contain '{needle}'\nActual: {haystack}"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appointment_builder() {
        let payload = appointment_request()
            .with_locale("ar")
            .without("preferred_date")
            .json();

        assert_eq!(payload["locale"], "ar");
        assert!(payload.get("preferred_date").is_none());
        assert_eq!(payload["service"], "Home nursing");
    }

    #[test]
    fn contact_builder() {
        let payload = contact_message().with("phone", json!("0600000000")).json();
        assert_eq!(payload["phone"], "0600000000");
        assert::has_key(&payload, "message");
    }

    #[test]
    fn cookie_headers() {
        assert_eq!(session_cookie("abc"), "user-session=abc");
        assert_eq!(
            cookie_header(&[("theme", "dark"), ("user-session", "x")]),
            "theme=dark; user-session=x"
        );
    }
}
