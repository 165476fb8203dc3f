//! Theme engine with Tera templates and suggestion resolution.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate};
use tera::Tera;
use tracing::debug;

/// Theme engine for rendering templates.
pub struct ThemeEngine {
    /// Tera template engine instance.
    tera: Tera,
}

impl ThemeEngine {
    /// Create a new theme engine loading templates from the given directory.
    pub fn new(template_dir: &Path) -> Result<Self> {
        let pattern = template_dir.join("**/*.html");
        let pattern_str = pattern
            .to_str()
            .context("invalid template directory path")?;

        let mut tera = Tera::new(pattern_str).context("failed to initialize Tera templates")?;

        Self::register_filters(&mut tera);

        let template_names: Vec<_> = tera.get_template_names().collect();
        debug!(count = template_names.len(), "loaded templates");

        Ok(Self { tera })
    }

    /// Create a theme engine from in-memory templates (for testing).
    pub fn from_templates(templates: &[(&str, &str)]) -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(templates.iter().copied())
            .context("failed to parse templates")?;
        Self::register_filters(&mut tera);
        Ok(Self { tera })
    }

    /// Register custom Tera filters.
    fn register_filters(tera: &mut Tera) {
        // Timestamps (RFC 3339) and dates (YYYY-MM-DD) as day/month/year,
        // which reads naturally in all three site languages.
        tera.register_filter(
            "format_date",
            |value: &tera::Value, _args: &HashMap<String, tera::Value>| {
                let Some(raw) = value.as_str() else {
                    return Ok(tera::Value::String(String::new()));
                };

                let formatted = if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
                    dt.format("%d/%m/%Y %H:%M").to_string()
                } else if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                    date.format("%d/%m/%Y").to_string()
                } else {
                    raw.to_string()
                };

                Ok(tera::Value::String(formatted))
            },
        );
    }

    /// Get the underlying Tera instance for custom operations.
    pub fn tera(&self) -> &Tera {
        &self.tera
    }

    /// Resolve the best template from a list of suggestions.
    ///
    /// Templates are tried in order; the first one that exists is returned.
    ///
    /// Example suggestions: `["pages/home--ar", "pages/home"]`
    pub fn resolve_template(&self, suggestions: &[&str]) -> Option<String> {
        suggestions.iter().find_map(|suggestion| {
            let template_name = format!("{suggestion}.html");
            if self.tera.get_template(&template_name).is_ok() {
                return Some(template_name);
            }
            // Also try the suggestion as-is, in case it already has an extension.
            self.tera
                .get_template(suggestion)
                .is_ok()
                .then(|| (*suggestion).to_string())
        })
    }

    /// Render a template by name.
    pub fn render(&self, template: &str, context: &tera::Context) -> Result<String> {
        self.tera
            .render(template, context)
            .with_context(|| format!("failed to render template {template}"))
    }
}

impl std::fmt::Debug for ThemeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeEngine")
            .field("templates", &self.tera.get_template_names().count())
            .finish()
    }
}

#[cfg(test)]
// Tests are allowed to use unwrap/expect freely.
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn engine() -> ThemeEngine {
        ThemeEngine::from_templates(&[
            ("pages/home.html", "home {{ lang }}"),
            ("pages/home--ar.html", "accueil arabe"),
            ("date.txt", "{{ value | format_date }}"),
        ])
        .unwrap()
    }

    #[test]
    fn resolve_prefers_most_specific() {
        let engine = engine();
        assert_eq!(
            engine.resolve_template(&["pages/home--ar", "pages/home"]),
            Some("pages/home--ar.html".to_string())
        );
        assert_eq!(
            engine.resolve_template(&["pages/home--en", "pages/home"]),
            Some("pages/home.html".to_string())
        );
        assert_eq!(engine.resolve_template(&["pages/missing"]), None);
        assert_eq!(engine.resolve_template(&[]), None);
    }

    #[test]
    fn resolve_accepts_full_names() {
        assert_eq!(
            engine().resolve_template(&["pages/home.html"]),
            Some("pages/home.html".to_string())
        );
    }

    #[test]
    fn format_date_filter() {
        let engine = engine();
        let mut context = tera::Context::new();

        context.insert("value", "2026-10-19T08:30:00Z");
        assert_eq!(engine.render("date.txt", &context).unwrap(), "19/10/2026 08:30");

        context.insert("value", "2026-11-03");
        assert_eq!(engine.render("date.txt", &context).unwrap(), "03/11/2026");

        context.insert("value", "soon");
        assert_eq!(engine.render("date.txt", &context).unwrap(), "soon");
    }

    #[test]
    fn render_error_names_template() {
        let err = engine()
            .render("pages/home.html", &tera::Context::new())
            .unwrap_err();
        assert!(err.to_string().contains("pages/home.html"));
    }
}
