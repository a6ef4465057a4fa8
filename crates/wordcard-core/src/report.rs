use std::fmt;
use std::path::PathBuf;

use wordcard_types::VocabularyItem;

use crate::error::{PipelineError, ReconciliationWarning};

/// Terminal state of one dispatched item
#[derive(Debug)]
pub enum Outcome {
    /// Row written and image placed at its identity path
    Committed { id: i64, image: PathBuf },
    /// Row written, image missing or not placed
    CommittedWithWarning { id: i64, warning: ReconciliationWarning },
    /// Same word appeared earlier in the input
    Duplicate,
    /// Store already had the word; its row was kept
    IgnoredByStore { id: i64 },
    Failed(PipelineError),
}

impl Outcome {
    pub fn status(&self) -> &'static str {
        match self {
            Outcome::Committed { .. } => "committed",
            Outcome::CommittedWithWarning { .. } => "reconciliation-warning",
            Outcome::Duplicate => "duplicate-skipped",
            Outcome::IgnoredByStore { .. } => "ignored-by-store",
            Outcome::Failed(e) => e.status(),
        }
    }

    pub fn is_committed(&self) -> bool {
        matches!(
            self,
            Outcome::Committed { .. } | Outcome::CommittedWithWarning { .. }
        )
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }
}

#[derive(Debug)]
pub struct ItemReport {
    pub word: String,
    pub phrase: Option<String>,
    pub position: usize,
    pub outcome: Outcome,
}

impl ItemReport {
    pub fn new(item: VocabularyItem, outcome: Outcome) -> Self {
        Self {
            word: item.word,
            phrase: item.phrase,
            position: item.position,
            outcome,
        }
    }
}

impl fmt::Display for ItemReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} | {}",
            self.word,
            self.phrase.as_deref().unwrap_or(""),
            self.outcome.status()
        )?;

        match &self.outcome {
            Outcome::Committed { id, image } => write!(f, " #{} {}", id, image.display()),
            Outcome::CommittedWithWarning { id, warning } => write!(f, " #{}: {}", id, warning),
            Outcome::IgnoredByStore { id } => write!(f, " #{}", id),
            Outcome::Failed(e) => write!(f, ": {}", e),
            Outcome::Duplicate => Ok(()),
        }
    }
}

/// Every item of a run with its terminal outcome, in input order
#[derive(Debug, Default)]
pub struct Report {
    pub items: Vec<ItemReport>,
}

impl Report {
    pub fn new(mut items: Vec<ItemReport>) -> Self {
        items.sort_by_key(|r| r.position);
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn committed(&self) -> usize {
        self.items.iter().filter(|r| r.outcome.is_committed()).count()
    }

    pub fn failed(&self) -> usize {
        self.items.iter().filter(|r| r.outcome.is_failure()).count()
    }

    pub fn count(&self, status: &str) -> usize {
        self.items
            .iter()
            .filter(|r| r.outcome.status() == status)
            .count()
    }

    pub fn get(&self, word: &str) -> Option<&ItemReport> {
        self.items.iter().find(|r| r.word == word)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for item in &self.items {
            writeln!(f, "{}", item)?;
        }
        write!(
            f,
            "{} items: {} committed ({} with warnings), {} duplicates, {} already stored, {} failed",
            self.len(),
            self.committed(),
            self.count("reconciliation-warning"),
            self.count("duplicate-skipped"),
            self.count("ignored-by-store"),
            self.failed()
        )
    }
}

#[cfg(test)]
mod tests {
    use wordcard_generator::GenerateError;

    use super::*;

    #[test]
    fn test_report_is_ordered_and_counted() {
        let report = Report::new(vec![
            ItemReport::new(
                VocabularyItem::new("b", None, 1),
                Outcome::Failed(PipelineError::Backend(GenerateError::RateLimitExceeded)),
            ),
            ItemReport::new(
                VocabularyItem::new("a", Some("a phrase".into()), 0),
                Outcome::Committed {
                    id: 1,
                    image: PathBuf::from("raw_images/1.png"),
                },
            ),
            ItemReport::new(VocabularyItem::new("a", None, 2), Outcome::Duplicate),
        ]);

        let words: Vec<_> = report.items.iter().map(|r| r.word.as_str()).collect();
        assert_eq!(words, vec!["a", "b", "a"]);
        assert_eq!(report.committed(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.count("backend-failed"), 1);
        assert_eq!(report.count("duplicate-skipped"), 1);
    }

    #[test]
    fn test_item_line_format() {
        let line = ItemReport::new(
            VocabularyItem::new("사과", Some("사과를 먹었다".into()), 0),
            Outcome::CommittedWithWarning {
                id: 7,
                warning: ReconciliationWarning::NoStagedImage,
            },
        )
        .to_string();

        assert_eq!(
            line,
            "사과 | 사과를 먹었다 | reconciliation-warning #7: no staged image to reconcile"
        );
    }
}
