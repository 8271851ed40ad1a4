//! Label translator: collect `label` texts and translate each into every
//! target locale, one paced provider call at a time.

use crate::config::TranslateConfig;
use crate::document::Document;
use crate::error::Error;
use crate::i18n::Locale;
use crate::provider::Translator;
use crate::table::LocaleTable;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// Which locales to produce and how to pace the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationPlan {
    /// Locale of the label texts; its mapping is the identity
    pub source: Locale,
    /// Translation targets, called in this order for every label
    pub targets: Vec<Locale>,
    /// Pause between two consecutive provider calls
    pub delay: Duration,
}

impl TranslationPlan {
    /// Output locales: the source first, then each distinct target.
    pub fn locales(&self) -> Vec<Locale> {
        let mut locales = vec![self.source];
        for target in &self.targets {
            if !locales.contains(target) {
                locales.push(*target);
            }
        }
        locales
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslateReport {
    pub labels: usize,
    pub locales: usize,
    pub output: PathBuf,
}

/// Trimmed text of every `label` element below the root, in document order.
///
/// Empty labels are kept: they are valid keys.
pub fn extract_labels(document: &Document) -> Vec<String> {
    document
        .root
        .descendants()
        .into_iter()
        .filter(|element| element.name == "label")
        .map(|element| element.text().trim().to_string())
        .collect()
}

/// Build the translation table for `labels`.
///
/// Stops at the first provider error; the partial table is discarded.
pub async fn translate_labels<T: Translator>(
    translator: &T,
    labels: &[String],
    plan: &TranslationPlan,
) -> Result<LocaleTable, Error> {
    let mut table = LocaleTable::with_locales(&plan.locales());
    let mut calls = 0usize;

    for label in labels {
        if table.insert(plan.source, label, label.clone()) {
            warn!("Duplicate label {:?}: later entries overwrite earlier ones", label);
        }
        info!("Translating label {:?}...", label);

        for &target in &plan.targets {
            if target == plan.source {
                continue;
            }
            if calls > 0 && !plan.delay.is_zero() {
                sleep(plan.delay).await;
            }
            calls += 1;

            let translated = translator
                .translate(label, target)
                .await
                .map_err(|source| Error::Provider {
                    locale: target.code().to_string(),
                    label: label.clone(),
                    source,
                })?;
            info!("Translated to {}: {}", target.name(), translated);
            table.insert(target, label, translated);
        }
    }

    info!("Finished {} labels with {} provider calls", labels.len(), calls);
    Ok(table)
}

/// Read the input document, translate its labels and write the JSON table.
///
/// Nothing is written unless every label was translated.
pub async fn run<T: Translator>(
    config: &TranslateConfig,
    translator: &T,
) -> Result<TranslateReport, Error> {
    let document = Document::read(&config.input)?;
    let labels = extract_labels(&document);
    info!("Found {} labels in {}", labels.len(), config.input.display());

    let plan = config.plan();
    let table = translate_labels(translator, &labels, &plan).await?;
    table.write(&config.output)?;

    Ok(TranslateReport {
        labels: labels.len(),
        locales: table.locales().len(),
        output: config.output.clone(),
    })
}
