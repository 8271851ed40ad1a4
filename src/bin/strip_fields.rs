//! Strip fields binary - writes a copy of the form data with selected element texts blanked
//!
//! Usage:
//!   cargo run --bin strip-fields
//!
//! Optional environment variables:
//! - STRIP_INPUT (defaults to data_en.xml)
//! - STRIP_OUTPUT (defaults to data_de_neu.xml)
//! - STRIP_TAGS (defaults to value,additionals,additionalshide)

use anyhow::{Context, Result};
use tracing::info;
use xml_label_tools::{config::StripConfig, strip};

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("xml_label_tools=info".parse()?),
        )
        .init();

    let config = StripConfig::from_env()?;
    info!("Stripping {}", config.input.display());

    let report = strip::run(&config)
        .with_context(|| format!("Failed to strip {}", config.input.display()))?;

    info!(
        "✓ Wrote {} with {} blanked elements",
        report.output.display(),
        report.stripped
    );
    Ok(())
}
