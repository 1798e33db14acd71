use super::ApiClient;
use crate::error::Result;
use crate::models::{CreateEvaluationRequest, Evaluation};

pub struct EvaluationService<'a> {
    api: &'a ApiClient,
}

impl<'a> EvaluationService<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    pub async fn for_submission(&self, submission_id: &str) -> Result<Vec<Evaluation>> {
        self.api
            .get_json(&["submissoes", submission_id, "avaliacoes"])
            .await
    }

    /// Evaluations written by the logged-in evaluator.
    pub async fn mine(&self) -> Result<Vec<Evaluation>> {
        self.api.get_json(&["avaliacoes", "minhas"]).await
    }

    pub async fn create(&self, submission_id: &str, request: &CreateEvaluationRequest) -> Result<Evaluation> {
        self.api
            .post_json(
                &["submissoes", submission_id, "avaliacoes"],
                request,
            )
            .await
    }
}
