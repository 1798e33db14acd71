use super::ApiClient;
use crate::error::Result;
use crate::models::{Event, EventRequest};

pub struct EventService<'a> {
    api: &'a ApiClient,
}

impl<'a> EventService<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<Event>> {
        self.api.get_json(&["eventos"]).await
    }

    pub async fn get(&self, id: &str) -> Result<Event> {
        self.api.get_json(&["eventos", id]).await
    }

    pub async fn create(&self, request: &EventRequest) -> Result<Event> {
        self.api.post_json(&["eventos"], request).await
    }

    pub async fn update(&self, id: &str, request: &EventRequest) -> Result<Event> {
        self.api.put_json(&["eventos", id], request).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.api.delete(&["eventos", id]).await
    }
}
