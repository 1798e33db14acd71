use serde::Serialize;

use super::ApiClient;
use crate::error::Result;
use crate::models::{EvaluationStatusDetail, StatusChangeRequest, Submission, SubmissionStatus};

pub struct SubmissionService<'a> {
    api: &'a ApiClient,
}

#[derive(Serialize)]
struct StatusFilter {
    status: &'static str,
}

impl<'a> SubmissionService<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    pub async fn get(&self, id: &str) -> Result<Submission> {
        self.api.get_json(&["submissoes", id]).await
    }

    /// Submissions authored by the logged-in user.
    pub async fn mine(&self) -> Result<Vec<Submission>> {
        self.api.get_json(&["submissoes", "minhas"]).await
    }

    pub async fn by_thematic_track(&self, thematic_track_id: &str) -> Result<Vec<Submission>> {
        self.api
            .get_json(&["trilhas-tematicas", thematic_track_id, "submissoes"])
            .await
    }

    pub async fn by_event(&self, event_id: &str, status: Option<SubmissionStatus>) -> Result<Vec<Submission>> {
        let path = ["eventos", event_id, "submissoes"];
        match status {
            Some(status) => {
                self.api
                    .get_json_query(&path, &StatusFilter { status: status.as_wire() })
                    .await
            }
            None => self.api.get_json(&path).await,
        }
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.api.delete(&["submissoes", id]).await
    }

    /// Ask the server to move a submission. Callers check the lifecycle first.
    pub async fn update_status(&self, id: &str, status: SubmissionStatus) -> Result<Submission> {
        self.api
            .put_json(
                &["submissoes", id, "status"],
                &StatusChangeRequest { status },
            )
            .await
    }

    pub async fn evaluation_status(&self, id: &str) -> Result<EvaluationStatusDetail> {
        self.api
            .get_json(&["submissoes", id, "status-avaliacao"])
            .await
    }
}
