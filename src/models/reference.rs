//! Bibliographic references attached to a submission.

use serde::{Deserialize, Serialize};

/// A reference resolved from a DOI by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reference {
    pub id: String,
    pub doi: String,
    #[serde(rename = "titulo", default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "autores", default)]
    pub authors: Vec<String>,
    #[serde(rename = "ano", default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(rename = "submissaoId", default, skip_serializing_if = "Option::is_none")]
    pub submission_id: Option<String>,
}

/// Body of `POST /submissoes/{id}/referencias`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateReferenceRequest {
    pub doi: String,
}
