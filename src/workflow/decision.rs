//! Organizer tie-break on submissions whose evaluations disagree.

use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::lifecycle::{self, Actor};
use crate::models::wire::wire_enum;
use crate::models::{Evaluation, Recommendation, Submission, SubmissionStatus};
use crate::services::ApiClient;

wire_enum! {
    /// Final word of the organizer. Form values may use either the status or the verb.
    pub enum TieBreakDecision {
        Approve => "APROVADA" | "APROVAR", "Approve";
        Reject => "REJEITADA" | "REJEITAR", "Reject";
    }
}

impl TieBreakDecision {
    pub fn target_status(self) -> SubmissionStatus {
        match self {
            TieBreakDecision::Approve => SubmissionStatus::Approved,
            TieBreakDecision::Reject => SubmissionStatus::Rejected,
        }
    }
}

/// Apply the organizer's decision. The move is checked locally first, so a
/// submission that is not under review never reaches the API.
pub async fn decide(api: &ApiClient, submission_id: &str, decision: TieBreakDecision) -> Result<Submission> {
    let submission = api.submissions().get(submission_id).await?;
    let target = lifecycle::transition(submission.status, decision.target_status(), Actor::Organizer)?;
    let updated = api.submissions().update_status(submission_id, target).await?;
    info!("Organizer decided {} on submission {}", target.as_wire(), submission_id);
    Ok(updated)
}

/// Recommendations gathered for one submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RecommendationTally {
    pub approve: usize,
    pub approve_with_caveats: usize,
    pub reject: usize,
    pub average_overall: Option<f32>,
}

impl RecommendationTally {
    pub fn from_evaluations(evaluations: &[Evaluation]) -> Self {
        let mut tally = Self::default();
        for evaluation in evaluations {
            match evaluation.recommendation {
                Recommendation::Approve => tally.approve += 1,
                Recommendation::ApproveWithCaveats => tally.approve_with_caveats += 1,
                Recommendation::Reject => tally.reject += 1,
            }
        }
        if !evaluations.is_empty() {
            let sum: f32 = evaluations.iter().map(|e| e.overall).sum();
            tally.average_overall = Some((sum / evaluations.len() as f32 * 10.0).round() / 10.0);
        }
        tally
    }

    pub fn total(&self) -> usize {
        self.approve + self.approve_with_caveats + self.reject
    }

    /// Evaluators disagree on acceptance.
    pub fn is_split(&self) -> bool {
        self.reject > 0 && self.approve + self.approve_with_caveats > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluation(recommendation: Recommendation, overall: f32) -> Evaluation {
        Evaluation {
            id: "ev".into(),
            submission_id: "s1".into(),
            evaluator_id: None,
            originality: overall,
            methodology: overall,
            relevance: overall,
            writing: overall,
            overall,
            recommendation,
            comments: String::new(),
            confidential: false,
            created_at: None,
        }
    }

    #[test]
    fn decision_accepts_status_and_verb() {
        assert_eq!("REJEITADA".parse::<TieBreakDecision>().unwrap(), TieBreakDecision::Reject);
        assert_eq!("REJEITAR".parse::<TieBreakDecision>().unwrap(), TieBreakDecision::Reject);
        assert_eq!("APROVADA".parse::<TieBreakDecision>().unwrap(), TieBreakDecision::Approve);
        assert!("APROVADA_COM_RESSALVAS".parse::<TieBreakDecision>().is_err());
        assert_eq!(TieBreakDecision::Reject.target_status(), SubmissionStatus::Rejected);
    }

    #[test]
    fn decision_decodes_from_json_verbs() {
        let decision: TieBreakDecision = serde_json::from_str("\"REJEITAR\"").unwrap();
        assert_eq!(decision, TieBreakDecision::Reject);
        assert_eq!(serde_json::to_value(decision).unwrap(), "REJEITADA");
        let err = "MAYBE".parse::<TieBreakDecision>().unwrap_err();
        assert_eq!(err.kind, "TieBreakDecision");
        let ok: Result<SubmissionStatus> = Ok(decision.target_status());
        assert!(ok.is_ok());
    }

    #[test]
    fn tally_detects_disagreement() {
        let tally = RecommendationTally::from_evaluations(&[
            evaluation(Recommendation::Approve, 8.0),
            evaluation(Recommendation::Reject, 3.0),
        ]);
        assert_eq!(tally.total(), 2);
        assert!(tally.is_split());
        assert_eq!(tally.average_overall, Some(5.5));

        let agreed = RecommendationTally::from_evaluations(&[
            evaluation(Recommendation::Reject, 2.0),
            evaluation(Recommendation::Reject, 4.0),
        ]);
        assert!(!agreed.is_split());
    }

    #[test]
    fn empty_tally_has_no_average() {
        let tally = RecommendationTally::from_evaluations(&[]);
        assert_eq!(tally.total(), 0);
        assert!(tally.average_overall.is_none());
    }
}
