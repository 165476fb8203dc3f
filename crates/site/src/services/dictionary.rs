//! Localized page dictionaries.
//!
//! A dictionary is a JSON tree of namespaces (`navigation`, `home`,
//! `contactPage`, ...) holding the text for one locale. Dictionaries are
//! loaded once at startup, checked for structural parity across locales, and
//! then shared read-only as `Arc<Dictionary>`.
//!
//! A locale without a dictionary source is a configuration error: loading
//! fails and the server refuses to start.

use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info};

use super::locale::Locale;

/// Namespaces every dictionary must provide. Dotted entries name a nested
/// namespace whose parent must hold it as an object.
pub const REQUIRED_NAMESPACES: &[&str] = &[
    "navigation",
    "footer",
    "home",
    "aboutPage",
    "contactPage",
    "servicesPage",
    "services",
    "pricing",
    "equipment",
    "testimonials",
    "reviewsPage.stats",
    "contact",
    "appointment",
    "promoVideo",
];

/// Dictionary loading errors.
#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("no dictionary for locale '{locale}' (looked for {path})")]
    Missing { locale: Locale, path: PathBuf },

    #[error("failed to read dictionary file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid JSON in dictionary file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("dictionary for '{locale}' must be a JSON object at the top level")]
    NotAnObject { locale: Locale },

    #[error("dictionary for '{locale}' is missing namespace '{namespace}'")]
    MissingNamespace {
        locale: Locale,
        namespace: &'static str,
    },

    #[error(
        "dictionary for '{locale}' does not match '{reference}': missing {missing:?}, unexpected {unexpected:?}"
    )]
    ParityMismatch {
        locale: Locale,
        reference: Locale,
        missing: Vec<String>,
        unexpected: Vec<String>,
    },
}

/// Where dictionary content comes from.
#[async_trait]
pub trait DictionarySource: Send + Sync {
    /// Fetch the raw dictionary tree for a locale.
    async fn fetch(&self, locale: Locale) -> Result<Value, DictionaryError>;
}

/// Reads dictionaries from a directory.
///
/// For each locale, `<dir>/<code>.json` is used when present. Otherwise the
/// tree is composed from `<dir>/<code>/*.json`, one namespace per file named
/// after the file stem (`<dir>/ar/home.json` becomes `home`).
#[derive(Debug, Clone)]
pub struct FileDictionarySource {
    dir: PathBuf,
}

impl FileDictionarySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `Ok(false)` only when the path is confirmed absent.
    async fn exists(path: &Path) -> Result<bool, DictionaryError> {
        tokio::fs::try_exists(path)
            .await
            .map_err(|source| DictionaryError::Io {
                path: path.to_path_buf(),
                source,
            })
    }

    async fn read_json(path: &Path) -> Result<Value, DictionaryError> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| DictionaryError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        serde_json::from_str(&raw).map_err(|source| DictionaryError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    async fn compose_partials(dir: &Path) -> Result<Value, DictionaryError> {
        let io_err = |source| DictionaryError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut entries = tokio::fs::read_dir(dir).await.map_err(io_err)?;
        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                files.push(path);
            }
        }
        // Deterministic merge order.
        files.sort();

        let mut tree = Map::new();
        for path in files {
            let Some(namespace) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let value = Self::read_json(&path).await?;
            debug!(namespace = %namespace, path = %path.display(), "loaded dictionary partial");
            tree.insert(namespace.to_string(), value);
        }

        Ok(Value::Object(tree))
    }
}

#[async_trait]
impl DictionarySource for FileDictionarySource {
    async fn fetch(&self, locale: Locale) -> Result<Value, DictionaryError> {
        let file = self.dir.join(format!("{}.json", locale.as_str()));
        if Self::exists(&file).await? {
            return Self::read_json(&file).await;
        }

        let partial_dir = self.dir.join(locale.as_str());
        if Self::exists(&partial_dir).await? {
            return Self::compose_partials(&partial_dir).await;
        }

        Err(DictionaryError::Missing { locale, path: file })
    }
}

/// The full tree of localized content for one locale.
#[derive(Debug, Clone)]
pub struct Dictionary {
    locale: Locale,
    tree: Value,
}

impl Dictionary {
    /// Wrap a raw tree, checking that it is an object carrying every
    /// required namespace.
    pub fn from_value(locale: Locale, tree: Value) -> Result<Self, DictionaryError> {
        let Some(map) = tree.as_object() else {
            return Err(DictionaryError::NotAnObject { locale });
        };

        for &namespace in REQUIRED_NAMESPACES {
            let present = match namespace.split_once('.') {
                None => map.contains_key(namespace),
                Some(_) => lookup_in(&tree, namespace).is_some_and(Value::is_object),
            };
            if !present {
                return Err(DictionaryError::MissingNamespace { locale, namespace });
            }
        }

        Ok(Self { locale, tree })
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// The whole tree, as handed to templates.
    pub fn tree(&self) -> &Value {
        &self.tree
    }

    pub fn namespace(&self, name: &str) -> Option<&Value> {
        self.tree.get(name)
    }

    /// Look up a dotted key such as `reviewsPage.stats.patients`.
    pub fn lookup(&self, key: &str) -> Option<&Value> {
        lookup_in(&self.tree, key)
    }

    /// Look up a dotted key that holds a string.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.lookup(key).and_then(Value::as_str)
    }

    /// Every key path in the tree. Array elements appear as `[index]`.
    pub fn key_paths(&self) -> BTreeSet<String> {
        let mut paths = BTreeSet::new();
        collect_paths(&self.tree, String::new(), &mut paths);
        paths
    }
}

fn lookup_in<'a>(tree: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.').try_fold(tree, |node, part| match node {
        Value::Object(map) => map.get(part),
        Value::Array(items) => part.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

fn collect_paths(node: &Value, prefix: String, out: &mut BTreeSet<String>) {
    match node {
        Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                out.insert(path.clone());
                collect_paths(child, path, out);
            }
        }
        Value::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                let path = format!("{prefix}[{i}]");
                out.insert(path.clone());
                collect_paths(child, path, out);
            }
        }
        _ => {}
    }
}

/// Compare two dictionaries' key structure.
pub fn check_parity(reference: &Dictionary, other: &Dictionary) -> Result<(), DictionaryError> {
    let expected = reference.key_paths();
    let actual = other.key_paths();

    if expected == actual {
        return Ok(());
    }

    Err(DictionaryError::ParityMismatch {
        locale: other.locale(),
        reference: reference.locale(),
        missing: expected.difference(&actual).cloned().collect(),
        unexpected: actual.difference(&expected).cloned().collect(),
    })
}

/// Load and validate the dictionary for one locale.
pub async fn load_dictionary(
    source: &dyn DictionarySource,
    locale: Locale,
) -> Result<Dictionary, DictionaryError> {
    let tree = source.fetch(locale).await?;
    let dictionary = Dictionary::from_value(locale, tree)?;
    info!(
        locale = %locale,
        keys = dictionary.key_paths().len(),
        "loaded dictionary"
    );
    Ok(dictionary)
}

/// Immutable per-locale dictionary cache.
#[derive(Debug, Clone)]
pub struct DictionaryStore {
    en: Arc<Dictionary>,
    fr: Arc<Dictionary>,
    ar: Arc<Dictionary>,
}

impl DictionaryStore {
    /// Load every supported locale and verify structural parity.
    ///
    /// The first locale in [`Locale::ALL`] is the parity reference.
    pub async fn load(source: &dyn DictionarySource) -> Result<Self, DictionaryError> {
        let en = load_dictionary(source, Locale::En).await?;
        let fr = load_dictionary(source, Locale::Fr).await?;
        let ar = load_dictionary(source, Locale::Ar).await?;

        check_parity(&en, &fr)?;
        check_parity(&en, &ar)?;

        Ok(Self {
            en: Arc::new(en),
            fr: Arc::new(fr),
            ar: Arc::new(ar),
        })
    }

    /// The cached dictionary for a locale.
    pub fn get(&self, locale: Locale) -> Arc<Dictionary> {
        match locale {
            Locale::En => Arc::clone(&self.en),
            Locale::Fr => Arc::clone(&self.fr),
            Locale::Ar => Arc::clone(&self.ar),
        }
    }
}
