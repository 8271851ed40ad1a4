//! Locale type: a language code validated against the registry.

use crate::error::Error;
use crate::i18n::LocaleRegistry;
use std::fmt;

/// A validated locale.
///
/// Only codes present in the `LocaleRegistry` can be constructed, so a
/// `Locale` can always be used as a JSON key or a provider language code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Locale {
    code: &'static str,
}

impl Locale {
    pub const ENGLISH: Locale = Locale { code: "en" };
    pub const GERMAN: Locale = Locale { code: "de" };
    pub const SPANISH: Locale = Locale { code: "es" };
    pub const FRENCH: Locale = Locale { code: "fr" };
    pub const ITALIAN: Locale = Locale { code: "it" };

    /// Create a Locale from its code.
    ///
    /// Surrounding whitespace is ignored; the code itself is matched exactly.
    pub fn from_code(code: &str) -> Result<Locale, Error> {
        let code = code.trim();
        LocaleRegistry::get()
            .get_by_code(code)
            .map(|config| Locale { code: config.code })
            .ok_or_else(|| Error::UnknownLocale(code.to_string()))
    }

    /// Parse a comma-separated list such as `"de,es,fr,it"`, keeping order.
    pub fn parse_list(codes: &str) -> Result<Vec<Locale>, Error> {
        codes
            .split(',')
            .filter(|code| !code.trim().is_empty())
            .map(Locale::from_code)
            .collect()
    }

    /// The canonical (source) locale, English unless the registry says otherwise.
    pub fn canonical() -> Locale {
        LocaleRegistry::get()
            .canonical()
            .map(|config| Locale { code: config.code })
            .unwrap_or(Locale::ENGLISH)
    }

    /// Every non-canonical locale, in registry order.
    pub fn targets() -> Vec<Locale> {
        LocaleRegistry::get()
            .list_all()
            .iter()
            .map(|config| Locale { code: config.code })
            .filter(|locale| !locale.is_canonical())
            .collect()
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    /// English name of the locale, for log output.
    pub fn name(&self) -> &'static str {
        LocaleRegistry::get()
            .get_by_code(self.code)
            .map(|config| config.name)
            .unwrap_or(self.code)
    }

    pub fn is_canonical(&self) -> bool {
        LocaleRegistry::get()
            .get_by_code(self.code)
            .is_some_and(|config| config.is_canonical)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_match_registry() {
        for locale in [
            Locale::ENGLISH,
            Locale::GERMAN,
            Locale::SPANISH,
            Locale::FRENCH,
            Locale::ITALIAN,
        ] {
            assert_eq!(Locale::from_code(locale.code()).ok(), Some(locale));
        }
    }

    #[test]
    fn test_names() {
        assert_eq!(Locale::ENGLISH.name(), "English");
        assert_eq!(Locale::GERMAN.name(), "German");
        assert_eq!(Locale::SPANISH.name(), "Spanish");
        assert_eq!(Locale::FRENCH.name(), "French");
        assert_eq!(Locale::ITALIAN.name(), "Italian");
    }

    #[test]
    fn test_from_code_trims_whitespace() {
        assert_eq!(Locale::from_code(" de ").ok(), Some(Locale::GERMAN));
    }

    #[test]
    fn test_from_code_unknown() {
        let err = Locale::from_code("xx").unwrap_err();
        assert!(matches!(err, Error::UnknownLocale(ref code) if code == "xx"));
        assert!(Locale::from_code("DE").is_err());
        assert!(Locale::from_code("").is_err());
    }

    #[test]
    fn test_parse_list_keeps_order() {
        let locales = Locale::parse_list("fr, de,it").expect("valid list");
        assert_eq!(locales, vec![Locale::FRENCH, Locale::GERMAN, Locale::ITALIAN]);
    }

    #[test]
    fn test_parse_list_skips_empty_segments() {
        let locales = Locale::parse_list("de,,es,").expect("valid list");
        assert_eq!(locales, vec![Locale::GERMAN, Locale::SPANISH]);
        assert!(Locale::parse_list("").expect("empty list").is_empty());
    }

    #[test]
    fn test_parse_list_rejects_unknown() {
        assert!(Locale::parse_list("de,pt").is_err());
    }

    #[test]
    fn test_targets_exclude_canonical() {
        assert_eq!(
            Locale::targets(),
            vec![Locale::GERMAN, Locale::SPANISH, Locale::FRENCH, Locale::ITALIAN]
        );
    }

    #[test]
    fn test_canonical_is_english() {
        assert_eq!(Locale::canonical(), Locale::ENGLISH);
        assert!(Locale::ENGLISH.is_canonical());
        assert!(!Locale::GERMAN.is_canonical());
    }

    #[test]
    fn test_display_is_code() {
        assert_eq!(Locale::ITALIAN.to_string(), "it");
    }
}
