use anyhow::{Context, Result};
use tracing::info;
use xml_label_tools::{config::TranslateConfig, labels, provider::MyMemoryTranslator};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored when absent)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("xml_label_tools=info".parse()?),
        )
        .init();

    info!("Starting label translation");

    let config = TranslateConfig::from_env()?;
    info!(
        "Translating labels of {} from {} into {}",
        config.input.display(),
        config.source,
        config
            .targets
            .iter()
            .map(|locale| locale.code())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let translator = MyMemoryTranslator::new(reqwest::Client::new(), &config.api_url, config.source)
        .with_email(config.email.clone());

    let report = labels::run(&config, &translator)
        .await
        .context("Label translation failed")?;

    info!(
        "✓ Wrote {} labels in {} locales to {}",
        report.labels,
        report.locales,
        report.output.display()
    );
    Ok(())
}
