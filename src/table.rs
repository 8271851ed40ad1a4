//! The nested `{locale: {label: text}}` lookup table written as JSON.

use crate::error::Error;
use crate::i18n::Locale;
use serde_json::{Map, Value};
use std::path::Path;
use tracing::debug;

/// Insertion-ordered mapping from locale to label to text.
///
/// Re-inserting an existing label keeps its position and replaces the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocaleTable {
    entries: Map<String, Value>,
}

impl LocaleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table with an empty mapping for each locale, in the given order.
    pub fn with_locales(locales: &[Locale]) -> Self {
        let mut table = Self::new();
        for locale in locales {
            table.ensure_locale(*locale);
        }
        table
    }

    pub fn ensure_locale(&mut self, locale: Locale) {
        self.entries
            .entry(locale.code())
            .or_insert_with(|| Value::Object(Map::new()));
    }

    /// Insert one entry. Returns `true` when an earlier entry for the same
    /// label was overwritten.
    pub fn insert(&mut self, locale: Locale, label: &str, text: String) -> bool {
        self.ensure_locale(locale);
        let Some(Value::Object(labels)) = self.entries.get_mut(locale.code()) else {
            return false;
        };
        labels.insert(label.to_string(), Value::String(text)).is_some()
    }

    pub fn get(&self, locale: Locale, label: &str) -> Option<&str> {
        self.entries
            .get(locale.code())
            .and_then(|labels| labels.get(label))
            .and_then(Value::as_str)
    }

    /// Locale codes in insertion order.
    pub fn locales(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// Number of labels recorded for a locale (0 if absent).
    pub fn label_count(&self, locale: Locale) -> usize {
        self.entries
            .get(locale.code())
            .and_then(Value::as_object)
            .map_or(0, Map::len)
    }

    /// Number of labels across all locales.
    pub fn total_entries(&self) -> usize {
        self.entries
            .values()
            .filter_map(Value::as_object)
            .map(Map::len)
            .sum()
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.entries.clone())
    }

    pub fn to_json_pretty(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(&self.entries).map_err(|e| Error::Serialize(e.to_string()))
    }

    /// Write the table as pretty JSON, creating parent directories.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let path = path.as_ref();
        let mut json = self.to_json_pretty()?;
        json.push('\n');
        ensure_parent_dir(path)?;
        std::fs::write(path, json).map_err(|e| Error::io(path, e))?;
        debug!("Wrote {} locales to {}", self.entries.len(), path.display());
        Ok(())
    }
}

pub(crate) fn ensure_parent_dir(path: &Path) -> Result<(), Error> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))
        }
        _ => Ok(()),
    }
}
