use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use wordcard_config::Config;
use wordcard_core::{Dispatcher, Enricher, ImageMaterializer, PersistenceReconciler, PromptTemplate};
use wordcard_generator::{GenerationBackend, OpenAiBackend};
use wordcard_io::{CsvSource, filter_new};

use crate::state::AppState;

#[derive(Args)]
pub struct EnrichArgs {
    /// Vocabulary CSV with `word,phrase[,dictionary_form]` columns
    pub csv: Option<PathBuf>,

    /// Language the words are in
    #[arg(long, short)]
    pub language: Option<String>,

    /// Number of concurrent workers
    #[arg(long, short)]
    pub concurrency: Option<usize>,
}

pub async fn run(args: &EnrichArgs, mut config: Config) -> Result<()> {
    let csv_path = args.csv.clone().unwrap_or_else(|| config.pipeline.csv_path.clone());
    if let Some(language) = &args.language {
        config.pipeline.language = language.clone();
    }
    if let Some(concurrency) = args.concurrency {
        config.pipeline.concurrency = concurrency;
    }

    let state = AppState::new(config).await?;
    let config = &state.config;

    let items = CsvSource::read_path(&csv_path).with_context(|| format!("Failed to read {}", csv_path.display()))?;
    let total = items.len();
    let items = filter_new(items, state.store.as_ref()).await?;
    tracing::info!("{} of {} words are new", items.len(), total);

    if items.is_empty() {
        println!("Nothing new to enrich in {}", csv_path.display());
        return Ok(());
    }

    let backend: Arc<dyn GenerationBackend> = Arc::new(OpenAiBackend::new(&config.generation)?);
    let metadata = backend.metadata();
    tracing::info!(
        "Using {} ({} / {})",
        metadata.name,
        metadata.text_model,
        metadata.image_model
    );

    let images = ImageMaterializer::new(
        backend.clone(),
        config.storage.staging_dir.clone(),
        config.storage.image_extension.clone(),
    );
    let prompt = PromptTemplate::from_config(config.generation.prompt_template.as_deref());
    let enricher = Enricher::new(backend, images, prompt);
    let reconciler = PersistenceReconciler::new(state.store.clone(), config.storage.image_dir.clone());
    let dispatcher = Dispatcher::new(Arc::new(enricher), Arc::new(reconciler));

    let report = dispatcher
        .run(items, &config.pipeline.language, config.pipeline.concurrency)
        .await;
    println!("{report}");

    if report.failed() > 0 {
        anyhow::bail!("{} of {} words failed", report.failed(), report.len());
    }

    Ok(())
}
