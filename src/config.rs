use crate::i18n::Locale;
use crate::labels::TranslationPlan;
use crate::options::{ExtractSpec, OptionSelector};
use crate::provider::MYMEMORY_API_URL;
use crate::strip::TagSet;
use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::time::Duration;

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Settings of the field stripper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub tags: TagSet,
}

impl StripConfig {
    pub fn from_env() -> Result<Self> {
        let config = Self {
            input: env_or("STRIP_INPUT", "data_en.xml").into(),
            output: env_or("STRIP_OUTPUT", "data_de_neu.xml").into(),
            tags: TagSet::parse(&env_or("STRIP_TAGS", "value,additionals,additionalshide")),
        };
        if config.tags.is_empty() {
            bail!("STRIP_TAGS must name at least one tag");
        }
        Ok(config)
    }
}

/// Settings of the label translator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslateConfig {
    pub input: PathBuf,
    pub output: PathBuf,

    // Locales
    pub source: Locale,
    pub targets: Vec<Locale>,

    // Provider
    pub api_url: String,
    pub email: Option<String>,
    pub delay: Duration,
}

impl TranslateConfig {
    pub fn from_env() -> Result<Self> {
        let source = match std::env::var("TRANSLATE_SOURCE_LOCALE") {
            Ok(code) => Locale::from_code(&code).context("Invalid TRANSLATE_SOURCE_LOCALE")?,
            Err(_) => Locale::canonical(),
        };
        let targets = match std::env::var("TRANSLATE_TARGET_LOCALES") {
            Ok(codes) => Locale::parse_list(&codes).context("Invalid TRANSLATE_TARGET_LOCALES")?,
            Err(_) => Locale::targets(),
        };

        Ok(Self {
            input: env_or("TRANSLATE_INPUT", "data_en.xml").into(),
            output: env_or("TRANSLATE_OUTPUT", "translations.json").into(),

            source,
            targets,

            api_url: env_or("TRANSLATOR_API_URL", MYMEMORY_API_URL),
            email: std::env::var("TRANSLATOR_EMAIL")
                .ok()
                .filter(|email| !email.trim().is_empty()),
            delay: Duration::from_millis(
                std::env::var("TRANSLATE_DELAY_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(1000),
            ),
        })
    }

    pub fn plan(&self) -> TranslationPlan {
        TranslationPlan {
            source: self.source,
            targets: self.targets.clone(),
            delay: self.delay,
        }
    }
}

/// Settings of the checkbox/dropdown converter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertConfig {
    /// One document per locale, in output order
    pub inputs: Vec<(Locale, PathBuf)>,
    pub output: PathBuf,
    pub spec: ExtractSpec,
}

impl ConvertConfig {
    pub fn from_env() -> Result<Self> {
        let inputs = parse_inputs(&env_or(
            "CONVERT_INPUTS",
            "en=XML/data_en.xml,de=XML/data_de.xml",
        ))
        .context("Invalid CONVERT_INPUTS")?;

        let selectors = OptionSelector::parse_list(&env_or(
            "CONVERT_SELECTORS",
            "checkboxes/checkbox,dropdowns/dropdown",
        ))
        .context("Invalid CONVERT_SELECTORS")?;
        if selectors.is_empty() {
            bail!("CONVERT_SELECTORS must contain at least one selector");
        }

        Ok(Self {
            inputs,
            output: env_or("CONVERT_OUTPUT", "XML/translations.json").into(),
            spec: ExtractSpec {
                selectors,
                label_tag: env_or("CONVERT_LABEL_TAG", "label"),
                value_tag: env_or("CONVERT_VALUE_TAG", "value"),
            },
        })
    }
}

/// Parse `"en=XML/data_en.xml,de=XML/data_de.xml"`.
fn parse_inputs(list: &str) -> Result<Vec<(Locale, PathBuf)>> {
    let inputs = list
        .split(',')
        .filter(|item| !item.trim().is_empty())
        .map(|item| -> Result<(Locale, PathBuf)> {
            let (code, path) = item
                .split_once('=')
                .with_context(|| format!("Expected <locale>=<path>, got '{}'", item.trim()))?;
            let path = path.trim();
            if path.is_empty() {
                bail!("Missing path for locale '{}'", code.trim());
            }
            Ok((Locale::from_code(code)?, PathBuf::from(path)))
        })
        .collect::<Result<Vec<_>>>()?;

    if inputs.is_empty() {
        bail!("At least one locale document is required");
    }
    Ok(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const ALL_VARS: [&str; 15] = [
        "STRIP_INPUT",
        "STRIP_OUTPUT",
        "STRIP_TAGS",
        "TRANSLATE_INPUT",
        "TRANSLATE_OUTPUT",
        "TRANSLATE_SOURCE_LOCALE",
        "TRANSLATE_TARGET_LOCALES",
        "TRANSLATE_DELAY_MS",
        "TRANSLATOR_API_URL",
        "TRANSLATOR_EMAIL",
        "CONVERT_INPUTS",
        "CONVERT_OUTPUT",
        "CONVERT_SELECTORS",
        "CONVERT_LABEL_TAG",
        "CONVERT_VALUE_TAG",
    ];

    fn clear_env() {
        for var in ALL_VARS {
            std::env::remove_var(var);
        }
    }

    // ==================== Defaults ====================

    #[test]
    #[serial]
    fn test_strip_defaults() {
        clear_env();
        let config = StripConfig::from_env().expect("defaults are valid");
        assert_eq!(config.input, PathBuf::from("data_en.xml"));
        assert_eq!(config.output, PathBuf::from("data_de_neu.xml"));
        assert_eq!(config.tags, TagSet::new(["value", "additionals", "additionalshide"]));
    }

    #[test]
    #[serial]
    fn test_translate_defaults() {
        clear_env();
        let config = TranslateConfig::from_env().expect("defaults are valid");
        assert_eq!(config.input, PathBuf::from("data_en.xml"));
        assert_eq!(config.output, PathBuf::from("translations.json"));
        assert_eq!(config.source, Locale::ENGLISH);
        assert_eq!(
            config.targets,
            vec![Locale::GERMAN, Locale::SPANISH, Locale::FRENCH, Locale::ITALIAN]
        );
        assert_eq!(config.api_url, MYMEMORY_API_URL);
        assert_eq!(config.email, None);
        assert_eq!(config.delay, Duration::from_secs(1));
    }

    #[test]
    #[serial]
    fn test_convert_defaults() {
        clear_env();
        let config = ConvertConfig::from_env().expect("defaults are valid");
        assert_eq!(
            config.inputs,
            vec![
                (Locale::ENGLISH, PathBuf::from("XML/data_en.xml")),
                (Locale::GERMAN, PathBuf::from("XML/data_de.xml")),
            ]
        );
        assert_eq!(config.output, PathBuf::from("XML/translations.json"));
        assert_eq!(config.spec.selectors.len(), 2);
        assert_eq!(config.spec.label_tag, "label");
        assert_eq!(config.spec.value_tag, "value");
    }

    // ==================== Overrides ====================

    #[test]
    #[serial]
    fn test_translate_overrides() {
        clear_env();
        std::env::set_var("TRANSLATE_TARGET_LOCALES", "it, fr");
        std::env::set_var("TRANSLATE_DELAY_MS", "250");
        std::env::set_var("TRANSLATOR_EMAIL", "forms@example.com");

        let config = TranslateConfig::from_env().expect("valid overrides");
        assert_eq!(config.targets, vec![Locale::ITALIAN, Locale::FRENCH]);
        assert_eq!(config.delay, Duration::from_millis(250));
        assert_eq!(config.email.as_deref(), Some("forms@example.com"));

        let plan = config.plan();
        assert_eq!(plan.targets, config.targets);
        assert_eq!(plan.delay, config.delay);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_translate_invalid_delay_falls_back_to_default() {
        clear_env();
        std::env::set_var("TRANSLATE_DELAY_MS", "soon");
        let config = TranslateConfig::from_env().expect("still valid");
        assert_eq!(config.delay, Duration::from_millis(1000));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_translate_unknown_locale_is_error() {
        clear_env();
        std::env::set_var("TRANSLATE_TARGET_LOCALES", "de,xx");
        let err = TranslateConfig::from_env().unwrap_err();
        assert!(format!("{:#}", err).contains("TRANSLATE_TARGET_LOCALES"));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_strip_empty_tags_is_error() {
        clear_env();
        std::env::set_var("STRIP_TAGS", " , ");
        assert!(StripConfig::from_env().is_err());
        clear_env();
    }

    #[test]
    #[serial]
    fn test_convert_overrides() {
        clear_env();
        std::env::set_var("CONVERT_INPUTS", "en=a.xml,fr=b.xml,it=c.xml");
        std::env::set_var("CONVERT_SELECTORS", ".//input");
        std::env::set_var("CONVERT_VALUE_TAG", "translation");

        let config = ConvertConfig::from_env().expect("valid overrides");
        assert_eq!(config.inputs.len(), 3);
        assert_eq!(config.inputs[2], (Locale::ITALIAN, PathBuf::from("c.xml")));
        assert_eq!(config.spec.value_tag, "translation");
        clear_env();
    }

    #[test]
    #[serial]
    fn test_convert_invalid_selector_is_error() {
        clear_env();
        std::env::set_var("CONVERT_SELECTORS", "/absolute");
        assert!(ConvertConfig::from_env().is_err());
        clear_env();
    }

    // ==================== parse_inputs ====================

    #[test]
    fn test_parse_inputs_rejects_malformed_items() {
        assert!(parse_inputs("en").is_err());
        assert!(parse_inputs("en=").is_err());
        assert!(parse_inputs("xx=a.xml").is_err());
        assert!(parse_inputs(" , ").is_err());
    }

    #[test]
    fn test_parse_inputs_trims() {
        let inputs = parse_inputs(" en = XML/data_en.xml ").expect("valid");
        assert_eq!(inputs, vec![(Locale::ENGLISH, PathBuf::from("XML/data_en.xml"))]);
    }
}
