//! Evaluations and per-submission evaluation progress.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::wire::wire_enum;

wire_enum! {
    pub enum Recommendation {
        Approve => "APROVAR", "Approve";
        Reject => "REJEITAR", "Reject";
        ApproveWithCaveats => "APROVAR_COM_RESSALVAS", "Approve with caveats";
    }
}

/// A scored review of one submission by one evaluator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Evaluation {
    pub id: String,
    #[serde(rename = "submissaoId")]
    pub submission_id: String,
    #[serde(rename = "avaliadorId", default, skip_serializing_if = "Option::is_none")]
    pub evaluator_id: Option<String>,
    #[serde(rename = "notaOriginalidade")]
    pub originality: f32,
    #[serde(rename = "notaMetodologia")]
    pub methodology: f32,
    #[serde(rename = "notaRelevancia")]
    pub relevance: f32,
    #[serde(rename = "notaEscrita")]
    pub writing: f32,
    #[serde(rename = "notaGeral")]
    pub overall: f32,
    #[serde(rename = "recomendacao")]
    pub recommendation: Recommendation,
    #[serde(rename = "comentarios", default)]
    pub comments: String,
    #[serde(rename = "confidencial", default)]
    pub confidential: bool,
    #[serde(rename = "dataCriacao", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Evaluation {
    /// Copy an author may see: confidential comments and the evaluator id are removed.
    pub fn for_author(mut self) -> Self {
        if self.confidential {
            self.comments.clear();
        }
        self.evaluator_id = None;
        self
    }
}

/// Body of `POST /submissoes/{id}/avaliacoes`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateEvaluationRequest {
    #[serde(rename = "notaOriginalidade")]
    pub originality: f32,
    #[serde(rename = "notaMetodologia")]
    pub methodology: f32,
    #[serde(rename = "notaRelevancia")]
    pub relevance: f32,
    #[serde(rename = "notaEscrita")]
    pub writing: f32,
    #[serde(rename = "notaGeral")]
    pub overall: f32,
    #[serde(rename = "recomendacao")]
    pub recommendation: Recommendation,
    #[serde(rename = "comentarios")]
    pub comments: String,
    #[serde(rename = "confidencial")]
    pub confidential: bool,
}

/// Invitation and evaluation counts for one submission, as reported by the server.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct EvaluationStatusDetail {
    #[serde(rename = "avaliadoresNecessarios")]
    pub required_evaluators: u32,
    #[serde(rename = "convitesAceitos", default)]
    pub accepted_invitations: u32,
    #[serde(rename = "convitesRecusados", default)]
    pub declined_invitations: u32,
    #[serde(rename = "convitesPendentes", default)]
    pub pending_invitations: u32,
    #[serde(rename = "avaliacoesConcluidas", default)]
    pub completed_evaluations: u32,
    #[serde(rename = "avaliacoesPendentes", default)]
    pub pending_evaluations: u32,
}

impl EvaluationStatusDetail {
    /// Evaluators still to be recruited.
    pub fn missing_evaluators(&self) -> u32 {
        self.required_evaluators
            .saturating_sub(self.accepted_invitations)
    }

    /// Enough evaluations exist for the server to compute a final status.
    pub fn can_compute_final_status(&self) -> bool {
        self.required_evaluators > 0 && self.completed_evaluations >= self.required_evaluators
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_evaluators_never_underflows() {
        let detail = EvaluationStatusDetail {
            required_evaluators: 3,
            accepted_invitations: 5,
            ..Default::default()
        };
        assert_eq!(detail.missing_evaluators(), 0);

        let short = EvaluationStatusDetail {
            required_evaluators: 3,
            accepted_invitations: 1,
            pending_invitations: 2,
            ..Default::default()
        };
        assert_eq!(short.missing_evaluators(), 2);
    }

    #[test]
    fn final_status_needs_all_required_evaluations() {
        let mut detail = EvaluationStatusDetail {
            required_evaluators: 2,
            accepted_invitations: 2,
            completed_evaluations: 1,
            pending_evaluations: 1,
            ..Default::default()
        };
        assert!(!detail.can_compute_final_status());
        detail.completed_evaluations = 2;
        assert!(detail.can_compute_final_status());
        assert!(!EvaluationStatusDetail::default().can_compute_final_status());
    }

    #[test]
    fn authors_never_see_confidential_comments() {
        let evaluation = Evaluation {
            id: "a1".into(),
            submission_id: "s1".into(),
            evaluator_id: Some("ev1".into()),
            originality: 8.0,
            methodology: 7.0,
            relevance: 9.0,
            writing: 6.0,
            overall: 7.5,
            recommendation: Recommendation::Approve,
            comments: "Only for the committee".into(),
            confidential: true,
            created_at: None,
        };
        let seen = evaluation.for_author();
        assert!(seen.comments.is_empty());
        assert!(seen.evaluator_id.is_none());
    }
}
