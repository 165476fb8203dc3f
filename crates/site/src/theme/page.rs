//! The localized public pages and how they are rendered.

use anyhow::{Context, Result};
use serde::Serialize;

use super::{ColorScheme, ThemeEngine};
use crate::services::dictionary::Dictionary;
use crate::services::locale::Locale;

/// A public, localized page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    About,
    Services,
    Contact,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::Home, Page::About, Page::Services, Page::Contact];

    /// Path segment after the locale (empty for the home page).
    pub const fn slug(self) -> &'static str {
        match self {
            Page::Home => "",
            Page::About => "about",
            Page::Services => "services",
            Page::Contact => "contact",
        }
    }

    const fn template_base(self) -> &'static str {
        match self {
            Page::Home => "pages/home",
            Page::About => "pages/about",
            Page::Services => "pages/services",
            Page::Contact => "pages/contact",
        }
    }

    /// Dictionary key of the page title.
    pub const fn title_key(self) -> &'static str {
        match self {
            Page::Home => "home.meta.title",
            Page::About => "aboutPage.meta.title",
            Page::Services => "servicesPage.meta.title",
            Page::Contact => "contactPage.meta.title",
        }
    }

    /// Public URL of this page in a locale (`/ar`, `/en/about`).
    pub fn path(self, locale: Locale) -> String {
        match self.slug() {
            "" => format!("/{locale}"),
            slug => format!("/{locale}/{slug}"),
        }
    }

    /// Relative file path used when exporting a static tree.
    pub fn export_path(self, locale: Locale) -> String {
        match self.slug() {
            "" => format!("{locale}/index.html"),
            slug => format!("{locale}/{slug}/index.html"),
        }
    }

    /// Render this page with a locale's dictionary.
    ///
    /// A template referencing a key the dictionary lacks fails here, at
    /// render time, and the caller answers with an error page.
    pub fn render(self, theme: &ThemeEngine, ctx: &PageContext<'_>) -> Result<String> {
        let specific = format!("{}--{}", self.template_base(), ctx.locale);
        let template = theme
            .resolve_template(&[specific.as_str(), self.template_base()])
            .with_context(|| format!("no template for page '{}'", self.template_base()))?;

        let mut context = tera::Context::new();
        context.insert("lang", ctx.locale.as_str());
        context.insert("dir", ctx.locale.direction().as_str());
        context.insert("t", ctx.dictionary.tree());
        context.insert("page", self.slug());
        context.insert("title", ctx.dictionary.text(self.title_key()).unwrap_or_default());
        context.insert("color_scheme", ctx.color_scheme.as_str());
        context.insert("authenticated", &ctx.authenticated);
        context.insert("locales", &language_links(self, ctx.locale));
        context.insert("nav", &nav_links(ctx.locale));

        theme.render(&template, &context)
    }
}

/// Per-render inputs for a localized page.
#[derive(Debug, Clone, Copy)]
pub struct PageContext<'a> {
    pub locale: Locale,
    pub dictionary: &'a Dictionary,
    pub color_scheme: ColorScheme,
    /// Session cookie present; shows the dashboard link.
    pub authenticated: bool,
}

/// Entry in the language switcher.
#[derive(Debug, Serialize)]
struct LanguageLink {
    code: &'static str,
    name: &'static str,
    href: String,
    dir: &'static str,
    active: bool,
}

fn language_links(page: Page, current: Locale) -> Vec<LanguageLink> {
    Locale::ALL
        .into_iter()
        .map(|locale| LanguageLink {
            code: locale.as_str(),
            name: locale.native_name(),
            href: page.path(locale),
            dir: locale.direction().as_str(),
            active: locale == current,
        })
        .collect()
}

/// Entry in the main navigation; `key` names the `navigation` label.
#[derive(Debug, Serialize)]
struct NavLink {
    key: &'static str,
    href: String,
}

fn nav_links(locale: Locale) -> Vec<NavLink> {
    [
        (Page::Home, "home"),
        (Page::About, "about"),
        (Page::Services, "services"),
        (Page::Contact, "contact"),
    ]
    .into_iter()
    .map(|(page, key)| NavLink {
        key,
        href: page.path(locale),
    })
    .collect()
}
