//! Convert options binary - builds the {locale: {label: value}} JSON from per-locale XML files
//!
//! Usage:
//!   cargo run --bin convert-options
//!
//! Optional environment variables:
//! - CONVERT_INPUTS (defaults to en=XML/data_en.xml,de=XML/data_de.xml)
//! - CONVERT_OUTPUT (defaults to XML/translations.json)
//! - CONVERT_SELECTORS (defaults to checkboxes/checkbox,dropdowns/dropdown;
//!   use .//checkbox,.//dropdown to match at any depth)
//! - CONVERT_LABEL_TAG / CONVERT_VALUE_TAG (default to label / value)

use anyhow::{Context, Result};
use tracing::info;
use xml_label_tools::{config::ConvertConfig, options};

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("xml_label_tools=info".parse()?),
        )
        .init();

    let config = ConvertConfig::from_env()?;
    for (locale, path) in &config.inputs {
        info!("{}: {}", locale.name(), path.display());
    }

    let report = options::run(&config).context("Option conversion failed")?;

    info!(
        "✓ Exported {} entries for {} locales to {}",
        report.entries,
        report.locales,
        report.output.display()
    );
    Ok(())
}
