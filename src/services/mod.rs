//! HTTP clients for the conference REST API.
//!
//! [`ApiClient`] owns the base URL, the pooled `reqwest` client and the session
//! token; each resource gets a thin service borrowing it. Every authorized call
//! fails with [`Error::MissingToken`] before touching the network when the
//! session has no token.

mod committees;
mod evaluations;
mod evaluators;
mod events;
mod files;
mod invitations;
mod references;
mod submissions;
mod tracks;
mod users;

pub use committees::CommitteeService;
pub use evaluations::EvaluationService;
pub use evaluators::{EvaluatorService, Resolved};
pub use events::EventService;
pub use files::{DownloadedFile, FileService};
pub use invitations::InvitationService;
pub use references::ReferenceService;
pub use submissions::SubmissionService;
pub use tracks::TrackService;
pub use users::UserService;

use reqwest::{multipart, Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.token.is_some())
            .finish()
    }
}

/// Error body shapes the server is known to send.
#[derive(Debug, Deserialize)]
struct ServerMessage {
    message: Option<String>,
    mensagem: Option<String>,
    error: Option<String>,
}

impl ApiClient {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of `segments` under the base URL, each segment percent-encoded.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let unusable = || Error::MissingConfig(format!("API base URL {} cannot take a path", self.base_url));
        let mut url = Url::parse(&self.base_url).map_err(|_| unusable())?;
        url.path_segments_mut()
            .map_err(|_| unusable())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorized(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let token = self.token.as_deref().ok_or(Error::MissingToken)?;
        let url = self.endpoint(segments)?;
        debug!("{} {}", method, url.path());
        Ok(self.http.request(method, url).bearer_auth(token))
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ServerMessage>(&body)
            .ok()
            .and_then(|m| m.message.or(m.mensagem).or(m.error))
            .filter(|m| !m.trim().is_empty());
        warn!(
            "API responded {} ({})",
            status.as_u16(),
            message.as_deref().unwrap_or("no message")
        );
        Err(Error::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let response = self.execute(self.authorized(Method::GET, segments)?).await?;
        Self::decode(response).await
    }

    pub(crate) async fn get_json_query<T, Q>(&self, segments: &[&str], query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let request = self.authorized(Method::GET, segments)?.query(query);
        let response = self.execute(request).await?;
        Self::decode(response).await
    }

    pub(crate) async fn post_json<B, T>(&self, segments: &[&str], body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.authorized(Method::POST, segments)?.json(body);
        let response = self.execute(request).await?;
        Self::decode(response).await
    }

    pub(crate) async fn put_json<B, T>(&self, segments: &[&str], body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.authorized(Method::PUT, segments)?.json(body);
        let response = self.execute(request).await?;
        Self::decode(response).await
    }

    /// PUT without a body, for action endpoints such as `/convites/{id}/aceitar`.
    pub(crate) async fn put_action<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let response = self.execute(self.authorized(Method::PUT, segments)?).await?;
        Self::decode(response).await
    }

    pub(crate) async fn delete(&self, segments: &[&str]) -> Result<()> {
        self.execute(self.authorized(Method::DELETE, segments)?).await?;
        Ok(())
    }

    pub(crate) async fn post_multipart<T: DeserializeOwned>(&self, segments: &[&str], form: multipart::Form) -> Result<T> {
        let request = self.authorized(Method::POST, segments)?.multipart(form);
        let response = self.execute(request).await?;
        Self::decode(response).await
    }

    pub(crate) async fn get_raw(&self, segments: &[&str]) -> Result<Response> {
        self.execute(self.authorized(Method::GET, segments)?).await
    }

    pub fn users(&self) -> UserService<'_> {
        UserService::new(self)
    }

    pub fn events(&self) -> EventService<'_> {
        EventService::new(self)
    }

    pub fn tracks(&self) -> TrackService<'_> {
        TrackService::new(self)
    }

    pub fn committees(&self) -> CommitteeService<'_> {
        CommitteeService::new(self)
    }

    pub fn evaluators(&self) -> EvaluatorService<'_> {
        EvaluatorService::new(self)
    }

    pub fn submissions(&self) -> SubmissionService<'_> {
        SubmissionService::new(self)
    }

    pub fn references(&self) -> ReferenceService<'_> {
        ReferenceService::new(self)
    }

    pub fn files(&self) -> FileService<'_> {
        FileService::new(self)
    }

    pub fn evaluations(&self) -> EvaluationService<'_> {
        EvaluationService::new(self)
    }

    pub fn invitations(&self) -> InvitationService<'_> {
        InvitationService::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_token_fails_before_any_request() {
        // Nothing listens on this port; reaching the network would give a Network error.
        let api = ApiClient::new(Client::new(), "http://127.0.0.1:9");
        let err = api.events().list().await.unwrap_err();
        assert!(matches!(err, Error::MissingToken));
    }

    #[test]
    fn blank_token_counts_as_missing() {
        let api = ApiClient::new(Client::new(), "http://localhost/").with_token(Some("  ".into()));
        assert!(!api.has_token());
        assert_eq!(api.base_url(), "http://localhost");
    }

    #[test]
    fn endpoint_encodes_each_segment() {
        let api = ApiClient::new(Client::new(), "https://api.example.org/v1/");
        let url = api.endpoint(&["submissoes", "a/b c", "status"]).unwrap();
        assert_eq!(url.as_str(), "https://api.example.org/v1/submissoes/a%2Fb%20c/status");
        let root = ApiClient::new(Client::new(), "http://localhost:8080");
        assert_eq!(root.endpoint(&["eventos"]).unwrap().as_str(), "http://localhost:8080/eventos");
    }

    #[test]
    fn base_url_without_a_path_is_refused() {
        let api = ApiClient::new(Client::new(), "mailto:chair@example.org");
        assert!(matches!(api.endpoint(&["eventos"]), Err(Error::MissingConfig(_))));
    }
}
