//! Multi-step flows built on top of the services.

pub mod decision;
pub mod status_summary;
pub mod wizard;

pub use decision::{decide, RecommendationTally, TieBreakDecision};
pub use status_summary::{summarize_thematic_track, SubmissionEvaluationStatus, TrackEvaluationSummary};
pub use wizard::{CompletionReport, ReferenceFailure, Resubmission, SubmissionWizard, WizardStep};

use std::future::Future;

use futures::stream::{self, StreamExt};

/// Run `task` over `items` with at most `limit` futures in flight.
/// Results come back in completion order.
pub async fn fetch_bounded<I, F, Fut, T>(items: I, limit: usize, task: F) -> Vec<T>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Fut,
    Fut: Future<Output = T>,
{
    stream::iter(items)
        .map(task)
        .buffer_unordered(limit.max(1))
        .collect()
        .await
}
