//! Locale registry: single source of truth for the locales the tools know.
//!
//! The registry is a lazily initialized singleton (`OnceLock`). Adding a
//! locale means adding one `LocaleConfig` to `default_locales`.

use std::sync::OnceLock;

/// Metadata of a supported locale.
#[derive(Debug, Clone)]
pub struct LocaleConfig {
    /// ISO 639-1 code, used as the top-level JSON key (e.g. "de")
    pub code: &'static str,

    /// English name, used in progress logs (e.g. "German")
    pub name: &'static str,

    /// Whether this is the source locale of the label texts
    pub is_canonical: bool,
}

/// Global locale registry.
#[derive(Debug)]
pub struct LocaleRegistry {
    locales: Vec<LocaleConfig>,
}

static REGISTRY: OnceLock<LocaleRegistry> = OnceLock::new();

impl LocaleRegistry {
    /// Get the global registry instance, initializing it on first use.
    pub fn get() -> &'static LocaleRegistry {
        REGISTRY.get_or_init(|| LocaleRegistry {
            locales: default_locales(),
        })
    }

    /// Look up a locale by its code.
    pub fn get_by_code(&self, code: &str) -> Option<&LocaleConfig> {
        self.locales.iter().find(|locale| locale.code == code)
    }

    /// All locales in registry order.
    pub fn list_all(&self) -> &[LocaleConfig] {
        &self.locales
    }

    /// The first locale flagged as canonical.
    pub fn canonical(&self) -> Option<&LocaleConfig> {
        self.locales.iter().find(|locale| locale.is_canonical)
    }
}

/// English is canonical; the others are the translation targets of the
/// form data.
fn default_locales() -> Vec<LocaleConfig> {
    vec![
        LocaleConfig {
            code: "en",
            name: "English",
            is_canonical: true,
        },
        LocaleConfig {
            code: "de",
            name: "German",
            is_canonical: false,
        },
        LocaleConfig {
            code: "es",
            name: "Spanish",
            is_canonical: false,
        },
        LocaleConfig {
            code: "fr",
            name: "French",
            is_canonical: false,
        },
        LocaleConfig {
            code: "it",
            name: "Italian",
            is_canonical: false,
        },
    ]
}
