use super::ApiClient;
use crate::error::Result;
use crate::models::{Committee, CreateCommitteeRequest};

pub struct CommitteeService<'a> {
    api: &'a ApiClient,
}

impl<'a> CommitteeService<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    pub async fn by_event(&self, event_id: &str) -> Result<Vec<Committee>> {
        self.api
            .get_json(&["eventos", event_id, "comites"])
            .await
    }

    pub async fn get(&self, id: &str) -> Result<Committee> {
        self.api.get_json(&["comites", id]).await
    }

    pub async fn create(&self, request: &CreateCommitteeRequest) -> Result<Committee> {
        self.api.post_json(&["comites"], request).await
    }
}
