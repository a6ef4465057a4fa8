use std::collections::HashSet;
use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use wordcard_config::Config;
use wordcard_io::{ReadlangSource, known_words, write_csv};

#[derive(Args)]
pub struct ImportReadlangArgs {
    /// Readlang export, `;` delimited
    pub file: PathBuf,

    /// Vocabulary CSV whose words are left out, defaults to the configured CSV
    #[arg(long)]
    pub existing: Option<PathBuf>,

    /// Where to write the new words
    #[arg(long, short, default_value = "new_words.csv")]
    pub out: PathBuf,
}

pub fn run(args: &ImportReadlangArgs, config: &Config) -> Result<()> {
    let existing = args
        .existing
        .clone()
        .unwrap_or_else(|| config.pipeline.csv_path.clone());

    let known = if existing.exists() {
        known_words(&existing).with_context(|| format!("Failed to read {}", existing.display()))?
    } else {
        tracing::debug!("{} not found, importing every word", existing.display());
        HashSet::new()
    };

    let items = ReadlangSource::new()
        .with_known_words(known)
        .read_path(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let out = File::create(&args.out).with_context(|| format!("Failed to create {}", args.out.display()))?;
    write_csv(&items, out)?;

    println!("Wrote {} new words to {}", items.len(), args.out.display());
    Ok(())
}
