use serde::{Deserialize, Serialize};

use super::{checked, Validate, ValidationErrors};
use crate::models::{CreateEvaluationRequest, DeclineInvitationRequest, Recommendation};

pub const SCORE_MAX: f32 = 10.0;
pub const COMMENTS_MIN: usize = 20;

/// Evaluation form filled by an evaluator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvaluationForm {
    #[serde(default)]
    pub originality: String,
    #[serde(default)]
    pub methodology: String,
    #[serde(default)]
    pub relevance: String,
    #[serde(default)]
    pub writing: String,
    /// Left blank, the overall score is the mean of the four sub-scores.
    #[serde(default)]
    pub overall: Option<String>,
    #[serde(default)]
    pub recommendation: String,
    #[serde(default)]
    pub comments: String,
    #[serde(default)]
    pub confidential: Option<String>,
}

fn score(errors: &mut ValidationErrors, field: &str, raw: &str) -> Option<f32> {
    match raw.trim().replace(',', ".").parse::<f32>() {
        Ok(value) if value.is_finite() && (0.0..=SCORE_MAX).contains(&value) => Some(value),
        _ => {
            errors.add(field, format!("Enter a score between 0 and {SCORE_MAX}."));
            None
        }
    }
}

impl Validate for EvaluationForm {
    type Output = CreateEvaluationRequest;

    fn validate(&self) -> Result<CreateEvaluationRequest, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let originality = score(&mut errors, "originality", &self.originality);
        let methodology = score(&mut errors, "methodology", &self.methodology);
        let relevance = score(&mut errors, "relevance", &self.relevance);
        let writing = score(&mut errors, "writing", &self.writing);

        let overall = match self.overall.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => score(&mut errors, "overall", raw),
            None => match (originality, methodology, relevance, writing) {
                (Some(a), Some(b), Some(c), Some(d)) => Some(((a + b + c + d) / 4.0 * 10.0).round() / 10.0),
                _ => None,
            },
        };

        let recommendation = match self.recommendation.parse::<Recommendation>() {
            Ok(r) => Some(r),
            Err(_) => {
                errors.add("recommendation", "Choose a recommendation.");
                None
            }
        };

        let comments = self.comments.trim().to_string();
        if comments.chars().count() < COMMENTS_MIN {
            errors.add(
                "comments",
                format!("Comments must have at least {COMMENTS_MIN} characters."),
            );
        }

        match (originality, methodology, relevance, writing, overall, recommendation) {
            (Some(originality), Some(methodology), Some(relevance), Some(writing), Some(overall), Some(recommendation))
                if errors.is_empty() =>
            {
                Ok(CreateEvaluationRequest {
                    originality,
                    methodology,
                    relevance,
                    writing,
                    overall,
                    recommendation,
                    comments,
                    confidential: checked(&self.confidential),
                })
            }
            _ => Err(errors),
        }
    }
}

/// Reason given when declining an invitation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeclineForm {
    #[serde(default)]
    pub reason: String,
}

impl Validate for DeclineForm {
    type Output = DeclineInvitationRequest;

    fn validate(&self) -> Result<DeclineInvitationRequest, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let reason = super::require_text(&mut errors, "reason", &self.reason);
        errors.finish(|| DeclineInvitationRequest { reason })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> EvaluationForm {
        EvaluationForm {
            originality: "8".into(),
            methodology: "7".into(),
            relevance: "9".into(),
            writing: "6,5".into(),
            overall: None,
            recommendation: "APROVAR_COM_RESSALVAS".into(),
            comments: "Solid work, the evaluation section needs more baselines.".into(),
            confidential: Some("on".into()),
        }
    }

    #[test]
    fn overall_defaults_to_mean() {
        let request = form().validate().unwrap();
        assert_eq!(request.writing, 6.5);
        assert!((request.overall - 7.6).abs() < 1e-4);
        assert_eq!(request.recommendation, Recommendation::ApproveWithCaveats);
        assert!(request.confidential);
    }

    #[test]
    fn explicit_overall_is_kept() {
        let mut form = form();
        form.overall = Some("9".into());
        assert_eq!(form.validate().unwrap().overall, 9.0);
    }

    #[test]
    fn scores_out_of_range_are_rejected() {
        let mut form = form();
        form.originality = "11".into();
        form.methodology = "-1".into();
        form.relevance = "NaN".into();
        let errors = form.validate().unwrap_err();
        assert!(errors.has("originality"));
        assert!(errors.has("methodology"));
        assert!(errors.has("relevance"));
        assert!(!errors.has("overall"));
    }

    #[test]
    fn short_comments_and_missing_recommendation() {
        let mut form = form();
        form.comments = "ok".into();
        form.recommendation = String::new();
        let errors = form.validate().unwrap_err();
        assert!(errors.has("comments"));
        assert!(errors.has("recommendation"));
    }

    #[test]
    fn decline_requires_reason() {
        assert!(DeclineForm::default().validate().unwrap_err().has("reason"));
        let ok = DeclineForm {
            reason: " On leave ".into(),
        };
        assert_eq!(ok.validate().unwrap().reason, "On leave");
    }
}
