use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::services::ApiClient;

/// Shared by every request: configuration and the pooled HTTP client.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let http = config.http_client()?;
        Ok(Self {
            config: Arc::new(config),
            http,
        })
    }

    /// API client acting for the session that owns `token`.
    pub fn api(&self, token: Option<String>) -> ApiClient {
        ApiClient::new(self.http.clone(), self.config.api_base_url.clone()).with_token(token)
    }
}
