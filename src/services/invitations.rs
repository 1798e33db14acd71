use super::ApiClient;
use crate::error::Result;
use crate::models::{CreateInvitationRequest, DeclineInvitationRequest, Invitation};

pub struct InvitationService<'a> {
    api: &'a ApiClient,
}

impl<'a> InvitationService<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// Invitations addressed to the logged-in evaluator.
    pub async fn mine(&self) -> Result<Vec<Invitation>> {
        self.api.get_json(&["convites", "meus"]).await
    }

    pub async fn for_submission(&self, submission_id: &str) -> Result<Vec<Invitation>> {
        self.api
            .get_json(&["submissoes", submission_id, "convites"])
            .await
    }

    pub async fn invite(&self, submission_id: &str, evaluator_email: &str) -> Result<Invitation> {
        self.api
            .post_json(
                &["submissoes", submission_id, "convites"],
                &CreateInvitationRequest {
                    evaluator_email: evaluator_email.to_string(),
                },
            )
            .await
    }

    pub async fn accept(&self, id: &str) -> Result<Invitation> {
        self.api
            .put_action(&["convites", id, "aceitar"])
            .await
    }

    pub async fn decline(&self, id: &str, request: &DeclineInvitationRequest) -> Result<Invitation> {
        self.api
            .put_json(&["convites", id, "recusar"], request)
            .await
    }
}
