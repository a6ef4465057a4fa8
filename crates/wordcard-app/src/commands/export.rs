use anyhow::{Context, Result};
use clap::Args;
use wordcard_anki::{AnkiConnectClient, CardTemplate, export_records};
use wordcard_config::Config;
use wordcard_store::RecordStore;

use crate::state::AppState;

#[derive(Args)]
pub struct ExportArgs {
    /// Target deck, overrides the configured one
    #[arg(long)]
    pub deck: Option<String>,
}

pub async fn run(args: &ExportArgs, mut config: Config) -> Result<()> {
    if let Some(deck) = &args.deck {
        config.anki.deck = deck.clone();
    }

    let state = AppState::new(config).await?;
    let config = &state.config;

    let records = state.store.all().await?;
    tracing::info!("Exporting {} records to deck {}", records.len(), config.anki.deck);

    let client = AnkiConnectClient::new(config.anki.url.clone());
    let template = CardTemplate::from_config(&config.anki);

    let report = export_records(
        &client,
        &template,
        &records,
        &config.storage.image_dir,
        config.anki.image_size,
        &config.anki.tags,
    )
    .await
    .context("Anki export failed")?;

    println!(
        "{} added, {} already in Anki, {} with images, {} failed",
        report.added, report.duplicates, report.images, report.failed
    );
    Ok(())
}
