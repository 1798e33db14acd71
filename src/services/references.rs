use super::ApiClient;
use crate::error::Result;
use crate::models::{CreateReferenceRequest, Reference};

pub struct ReferenceService<'a> {
    api: &'a ApiClient,
}

impl<'a> ReferenceService<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self, submission_id: &str) -> Result<Vec<Reference>> {
        self.api
            .get_json(&["submissoes", submission_id, "referencias"])
            .await
    }

    /// Attach a reference; the API resolves the DOI metadata.
    pub async fn create_from_doi(&self, submission_id: &str, doi: &str) -> Result<Reference> {
        self.api
            .post_json(
                &["submissoes", submission_id, "referencias"],
                &CreateReferenceRequest {
                    doi: doi.to_string(),
                },
            )
            .await
    }
}
