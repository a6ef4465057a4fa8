pub mod dispatcher;
pub mod enricher;
pub mod error;
pub mod image;
pub mod parser;
pub mod prompt;
pub mod reconciler;
pub mod report;

pub use dispatcher::Dispatcher;
pub use enricher::Enricher;
pub use error::{PipelineError, ReconciliationWarning};
pub use image::ImageMaterializer;
pub use prompt::PromptTemplate;
pub use reconciler::{Commit, PersistenceReconciler};
pub use report::{ItemReport, Outcome, Report};

#[cfg(test)]
mod tests;
