use std::collections::HashSet;
use std::sync::Arc;

use kanal::AsyncReceiver;
use tokio::task::JoinSet;
use wordcard_types::VocabularyItem;

use crate::enricher::Enricher;
use crate::error::PipelineError;
use crate::reconciler::{Commit, PersistenceReconciler};
use crate::report::{ItemReport, Outcome, Report};

/// Split items into first occurrences (input order kept) and later repeats of the same word
pub fn dedup(items: Vec<VocabularyItem>) -> (Vec<VocabularyItem>, Vec<VocabularyItem>) {
    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(items.len());
    let mut duplicates = Vec::new();

    for item in items {
        if seen.insert(item.word.clone()) {
            unique.push(item);
        } else {
            duplicates.push(item);
        }
    }

    (unique, duplicates)
}

/// Runs enrichment and persistence for a batch of items over a fixed worker pool
pub struct Dispatcher {
    enricher: Arc<Enricher>,
    reconciler: Arc<PersistenceReconciler>,
}

impl Dispatcher {
    pub fn new(enricher: Arc<Enricher>, reconciler: Arc<PersistenceReconciler>) -> Self {
        Self {
            enricher,
            reconciler,
        }
    }

    /// Returns once every item has a terminal outcome. Items are never retried.
    pub async fn run(&self, items: Vec<VocabularyItem>, language: &str, concurrency: usize) -> Report {
        let (unique, duplicates) = dedup(items);

        let mut reports: Vec<ItemReport> = duplicates
            .into_iter()
            .map(|item| {
                tracing::info!("{} repeats an earlier entry, skipping", item.word);
                ItemReport::new(item, Outcome::Duplicate)
            })
            .collect();

        let workers = concurrency.max(1).min(unique.len());
        tracing::info!(
            "Dispatching {} items to {} workers ({} duplicates skipped)",
            unique.len(),
            workers,
            reports.len()
        );

        // Filled once; workers stop when it runs dry
        let (queue_tx, queue_rx) = kanal::unbounded_async();
        for item in unique {
            if let Err(e) = queue_tx.send(item).await {
                tracing::error!("Failed to queue item: {}", e);
            }
        }

        let language: Arc<str> = Arc::from(language);
        let mut tasks = JoinSet::new();
        for worker in 0..workers {
            tasks.spawn(worker_loop(
                worker,
                queue_rx.clone(),
                self.enricher.clone(),
                self.reconciler.clone(),
                language.clone(),
            ));
        }

        while let Some(result) = tasks.join_next().await {
            match result {
                Ok(done) => reports.extend(done),
                Err(e) => tracing::error!("Enrichment worker panicked: {}", e),
            }
        }
        drop(queue_tx);

        Report::new(reports)
    }
}

async fn worker_loop(
    worker: usize,
    queue: AsyncReceiver<VocabularyItem>,
    enricher: Arc<Enricher>,
    reconciler: Arc<PersistenceReconciler>,
    language: Arc<str>,
) -> Vec<ItemReport> {
    let mut done = Vec::new();

    while let Ok(Some(item)) = queue.try_recv() {
        tracing::debug!("[worker {}] {} | {}", worker, item.word, item.phrase.as_deref().unwrap_or(""));

        // Own task per item, so a panic costs only this item's outcome
        let task = tokio::spawn({
            let enricher = enricher.clone();
            let reconciler = reconciler.clone();
            let language = language.clone();
            let item = item.clone();
            async move { process(&enricher, &reconciler, &language, &item).await }
        });

        let outcome = match task.await {
            Ok(outcome) => outcome,
            Err(e) => Outcome::Failed(PipelineError::Aborted(e.to_string())),
        };
        match &outcome {
            Outcome::Failed(e) => tracing::error!("{} failed: {}", item.word, e),
            other => tracing::info!("{} -> {}", item.word, other.status()),
        }

        done.push(ItemReport::new(item, outcome));
    }

    tracing::debug!("[worker {}] queue drained after {} items", worker, done.len());
    done
}

async fn process(
    enricher: &Enricher,
    reconciler: &PersistenceReconciler,
    language: &str,
    item: &VocabularyItem,
) -> Outcome {
    let enriched = match enricher.enrich(language, item).await {
        Ok(enriched) => enriched,
        Err(e) => return Outcome::Failed(e),
    };

    match reconciler.commit(item, enriched).await {
        Ok(Commit::Stored {
            record,
            image: Ok(image),
        }) => Outcome::Committed { id: record.id, image },
        Ok(Commit::Stored {
            record,
            image: Err(warning),
        }) => Outcome::CommittedWithWarning {
            id: record.id,
            warning,
        },
        Ok(Commit::Ignored { record, .. }) => Outcome::IgnoredByStore { id: record.id },
        Err(e) => Outcome::Failed(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(words: &[&str]) -> Vec<VocabularyItem> {
        words
            .iter()
            .enumerate()
            .map(|(i, w)| VocabularyItem::new(*w, None, i))
            .collect()
    }

    #[test]
    fn test_dedup_keeps_first_occurrence_in_order() {
        let (unique, duplicates) = dedup(items(&["A", "B", "A", "C"]));

        let words: Vec<_> = unique.iter().map(|i| i.word.as_str()).collect();
        assert_eq!(words, vec!["A", "B", "C"]);
        assert_eq!(duplicates.len(), 1);
        assert_eq!(duplicates[0].position, 2);
    }

    #[test]
    fn test_dedup_is_case_sensitive() {
        let (unique, duplicates) = dedup(items(&["Haus", "haus", "HAUS"]));
        assert_eq!(unique.len(), 3);
        assert!(duplicates.is_empty());
    }

    #[test]
    fn test_dedup_empty() {
        let (unique, duplicates) = dedup(Vec::new());
        assert!(unique.is_empty());
        assert!(duplicates.is_empty());
    }
}
