use super::ApiClient;
use crate::error::Result;
use crate::models::{CreateThematicTrackRequest, CreateTrackRequest, ThematicTrack, Track};

pub struct TrackService<'a> {
    api: &'a ApiClient,
}

impl<'a> TrackService<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    pub async fn by_event(&self, event_id: &str) -> Result<Vec<Track>> {
        self.api
            .get_json(&["eventos", event_id, "trilhas"])
            .await
    }

    pub async fn get(&self, id: &str) -> Result<Track> {
        self.api.get_json(&["trilhas", id]).await
    }

    pub async fn create(&self, event_id: &str, request: &CreateTrackRequest) -> Result<Track> {
        self.api
            .post_json(&["eventos", event_id, "trilhas"], request)
            .await
    }

    pub async fn thematic_tracks(&self, track_id: &str) -> Result<Vec<ThematicTrack>> {
        self.api
            .get_json(&["trilhas", track_id, "tematicas"])
            .await
    }

    pub async fn get_thematic(&self, id: &str) -> Result<ThematicTrack> {
        self.api
            .get_json(&["trilhas-tematicas", id])
            .await
    }

    pub async fn create_thematic(
        &self,
        track_id: &str,
        request: &CreateThematicTrackRequest,
    ) -> Result<ThematicTrack> {
        self.api
            .post_json(&["trilhas", track_id, "tematicas"], request)
            .await
    }
}
