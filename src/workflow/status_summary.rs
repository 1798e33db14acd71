//! Evaluation progress of every submission in a thematic track.

use serde::Serialize;
use tracing::{info, warn};

use super::fetch_bounded;
use crate::error::Result;
use crate::lifecycle::Badge;
use crate::models::{EvaluationStatusDetail, Submission, SubmissionStatus};
use crate::services::ApiClient;

/// One row of the summary. A failed detail request keeps its row with the error.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionEvaluationStatus {
    pub submission_id: String,
    pub title: String,
    pub status: SubmissionStatus,
    pub badge: Badge,
    pub detail: Option<EvaluationStatusDetail>,
    pub error: Option<String>,
}

impl SubmissionEvaluationStatus {
    fn new(submission: &Submission, outcome: Result<EvaluationStatusDetail>) -> Self {
        let (detail, error) = match outcome {
            Ok(detail) => (Some(detail), None),
            Err(err) => (None, Some(err.user_message())),
        };
        Self {
            submission_id: submission.id.clone(),
            title: submission.title.clone(),
            status: submission.status,
            badge: submission.status.badge(),
            detail,
            error,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.detail.is_some_and(|d| d.can_compute_final_status())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackEvaluationSummary {
    pub thematic_track_id: String,
    /// Sorted by submission id.
    pub rows: Vec<SubmissionEvaluationStatus>,
    /// Sum of every detail that loaded.
    pub totals: EvaluationStatusDetail,
    pub ready: usize,
    pub failed: usize,
}

impl TrackEvaluationSummary {
    fn from_rows(thematic_track_id: &str, mut rows: Vec<SubmissionEvaluationStatus>) -> Self {
        rows.sort_by(|a, b| a.submission_id.cmp(&b.submission_id));

        let mut totals = EvaluationStatusDetail::default();
        for detail in rows.iter().filter_map(|row| row.detail.as_ref()) {
            totals.required_evaluators += detail.required_evaluators;
            totals.accepted_invitations += detail.accepted_invitations;
            totals.declined_invitations += detail.declined_invitations;
            totals.pending_invitations += detail.pending_invitations;
            totals.completed_evaluations += detail.completed_evaluations;
            totals.pending_evaluations += detail.pending_evaluations;
        }
        let ready = rows.iter().filter(|row| row.is_ready()).count();
        let failed = rows.iter().filter(|row| row.error.is_some()).count();

        Self {
            thematic_track_id: thematic_track_id.to_string(),
            rows,
            totals,
            ready,
            failed,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// List the track's submissions, then fetch each evaluation status with at
/// most `concurrency` requests in flight.
pub async fn summarize_thematic_track(
    api: &ApiClient,
    thematic_track_id: &str,
    concurrency: usize,
) -> Result<TrackEvaluationSummary> {
    let submissions = api.submissions().by_thematic_track(thematic_track_id).await?;
    info!(
        "Summarizing {} submissions of thematic track {}",
        submissions.len(),
        thematic_track_id
    );

    let rows = fetch_bounded(submissions, concurrency, |submission: Submission| async move {
        let outcome = api.submissions().evaluation_status(&submission.id).await;
        if let Err(err) = &outcome {
            warn!("Evaluation status of {} unavailable: {}", submission.id, err);
        }
        SubmissionEvaluationStatus::new(&submission, outcome)
    })
    .await;

    Ok(TrackEvaluationSummary::from_rows(thematic_track_id, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::models::SubmissionFormat;

    fn submission(id: &str) -> Submission {
        Submission {
            id: id.into(),
            title: format!("Paper {id}"),
            abstract_text: String::new(),
            keywords: vec![],
            format: SubmissionFormat::FullPaper,
            status: SubmissionStatus::UnderEvaluation,
            version: 1,
            submitted_at: None,
            last_modified_at: None,
            event_id: "e1".into(),
            thematic_track_id: "tt1".into(),
            original_submission_id: None,
            author: None,
            file_name: None,
        }
    }

    fn detail(completed: u32, pending: u32) -> EvaluationStatusDetail {
        EvaluationStatusDetail {
            required_evaluators: 2,
            accepted_invitations: 2,
            completed_evaluations: completed,
            pending_evaluations: pending,
            ..Default::default()
        }
    }

    #[test]
    fn rows_are_sorted_and_totals_skip_failures() {
        let rows = vec![
            SubmissionEvaluationStatus::new(&submission("c"), Ok(detail(2, 0))),
            SubmissionEvaluationStatus::new(
                &submission("a"),
                Err(Error::Api {
                    status: 500,
                    message: None,
                }),
            ),
            SubmissionEvaluationStatus::new(&submission("b"), Ok(detail(1, 1))),
        ];
        let summary = TrackEvaluationSummary::from_rows("tt1", rows);

        let ids: Vec<_> = summary.rows.iter().map(|r| r.submission_id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.ready, 1);
        assert_eq!(summary.totals.completed_evaluations, 3);
        assert_eq!(summary.totals.required_evaluators, 4);
        assert_eq!(summary.rows[0].error.as_deref(), Some(crate::error::GENERIC_ERROR_MESSAGE));
    }
}
