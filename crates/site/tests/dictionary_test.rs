#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Dictionary loading against the shipped dictionaries, and the static export.

mod common;

use std::collections::HashSet;

use medassist_site::cli;
use medassist_site::services::dictionary::{
    DictionaryError, DictionaryStore, FileDictionarySource, REQUIRED_NAMESPACES, check_parity,
    load_dictionary,
};
use medassist_site::services::locale::{Direction, Locale, LocaleResolver};

use common::{project_root, test_config};

fn shipped_source() -> FileDictionarySource {
    FileDictionarySource::new(project_root().join("dictionaries"))
}

#[test]
fn list_locales_is_non_empty_and_unique() {
    let resolver = LocaleResolver::new(Locale::Fr);
    let locales = resolver.list_locales();
    assert!(!locales.is_empty());

    let unique: HashSet<_> = locales.iter().collect();
    assert_eq!(unique.len(), locales.len());
}

#[tokio::test]
async fn every_listed_locale_loads_with_parity() {
    let source = shipped_source();
    let resolver = LocaleResolver::new(Locale::Fr);

    let reference = load_dictionary(&source, Locale::En).await.unwrap();
    for &locale in resolver.list_locales() {
        let dictionary = load_dictionary(&source, locale).await.unwrap();
        assert_eq!(dictionary.locale(), locale);
        check_parity(&reference, &dictionary).unwrap();
    }
}

#[tokio::test]
async fn shipped_dictionaries_carry_required_namespaces() {
    let store = DictionaryStore::load(&shipped_source()).await.unwrap();
    for locale in Locale::ALL {
        let dictionary = store.get(locale);
        for namespace in REQUIRED_NAMESPACES {
            let value = dictionary.lookup(namespace).unwrap();
            assert!(
                value.as_object().is_some_and(|m| !m.is_empty()),
                "{locale}: {namespace} is empty"
            );
        }
        assert!(dictionary.lookup("reviewsPage.stats.patients.value").is_some());
        assert!(dictionary.text("aboutPage.title").is_some_and(|t| !t.is_empty()));
    }
}

#[tokio::test]
async fn store_hands_out_shared_trees() {
    let store = DictionaryStore::load(&shipped_source()).await.unwrap();
    let first = store.get(Locale::Ar);
    let second = store.get(Locale::Ar);
    assert!(std::sync::Arc::ptr_eq(&first, &second));
}

#[tokio::test]
async fn missing_locale_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let shipped = project_root().join("dictionaries");
    for code in ["en", "fr"] {
        std::fs::copy(
            shipped.join(format!("{code}.json")),
            dir.path().join(format!("{code}.json")),
        )
        .unwrap();
    }

    let err = DictionaryStore::load(&FileDictionarySource::new(dir.path()))
        .await
        .unwrap_err();
    assert!(matches!(err, DictionaryError::Missing { locale: Locale::Ar, .. }));
}

#[test]
fn direction_of_each_locale() {
    let resolver = LocaleResolver::new(Locale::Fr);
    assert_eq!(resolver.direction_of(Locale::Ar), Direction::Rtl);
    assert_eq!(resolver.direction_of(Locale::En), Direction::Ltr);
    assert_eq!(resolver.direction_of(Locale::Fr), Direction::Ltr);
}

#[tokio::test]
async fn export_writes_one_tree_per_locale() {
    let out = tempfile::tempdir().unwrap();
    let config = test_config(&[]);

    let written = cli::cmd_export(&config, out.path()).await.unwrap();
    assert_eq!(written, 12);

    let home_ar = std::fs::read_to_string(out.path().join("ar/index.html")).unwrap();
    assert!(home_ar.contains(r#"dir="rtl""#));

    let contact_en = std::fs::read_to_string(out.path().join("en/contact/index.html")).unwrap();
    assert!(contact_en.contains(r#"lang="en""#));

    let root = std::fs::read_to_string(out.path().join("index.html")).unwrap();
    assert!(root.contains("url=/fr"));
}

#[tokio::test]
async fn check_dictionaries_command_succeeds() {
    cli::cmd_check_dictionaries(&test_config(&[])).await.unwrap();
}
