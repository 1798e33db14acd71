//! Submission model and the payloads that create or move one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::wire::wire_enum;
use super::PersonSummary;

wire_enum! {
    /// Presentation format requested by the authors.
    pub enum SubmissionFormat {
        FullPaper => "ARTIGO_COMPLETO", "Full paper";
        ShortPaper => "ARTIGO_CURTO", "Short paper";
        Poster => "POSTER", "Poster";
        ExtendedAbstract => "RESUMO_EXPANDIDO", "Extended abstract";
        Workshop => "WORKSHOP", "Workshop";
    }
}

wire_enum! {
    /// Server-owned status of a submission. Allowed moves live in [`crate::lifecycle`].
    pub enum SubmissionStatus {
        Draft => "RASCUNHO", "Draft";
        Submitted => "SUBMETIDA", "Submitted";
        UnderEvaluation => "EM_AVALIACAO", "Under evaluation";
        Approved => "APROVADA", "Approved";
        ApprovedWithCaveats => "APROVADA_COM_RESSALVAS", "Approved with caveats";
        Rejected => "REJEITADA", "Rejected";
        UnderReview => "EM_REVISAO" | "EM_REVISÃO", "Under review";
        Resubmitted => "RESUBMETIDA", "Resubmitted";
        Retired => "RETIRADA", "Retired";
    }
}

fn first_version() -> u32 {
    1
}

/// An authored work entered into a thematic track.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Submission {
    pub id: String,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "resumo")]
    pub abstract_text: String,
    #[serde(rename = "palavrasChave", default)]
    pub keywords: Vec<String>,
    #[serde(rename = "formato")]
    pub format: SubmissionFormat,
    pub status: SubmissionStatus,
    #[serde(rename = "versao", default = "first_version")]
    pub version: u32,
    #[serde(rename = "dataSubmissao", default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(rename = "dataUltimaModificacao", default, skip_serializing_if = "Option::is_none")]
    pub last_modified_at: Option<DateTime<Utc>>,
    #[serde(rename = "eventoId")]
    pub event_id: String,
    #[serde(rename = "trilhaTematicaId")]
    pub thematic_track_id: String,
    #[serde(rename = "submissaoOriginalId", default, skip_serializing_if = "Option::is_none")]
    pub original_submission_id: Option<String>,
    #[serde(rename = "autor", default, skip_serializing_if = "Option::is_none")]
    pub author: Option<PersonSummary>,
    #[serde(rename = "arquivo", default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

impl Submission {
    /// Id of the first submission in this resubmission chain.
    pub fn lineage_root_id(&self) -> &str {
        self.original_submission_id.as_deref().unwrap_or(&self.id)
    }

    pub fn is_resubmission(&self) -> bool {
        self.original_submission_id.is_some()
    }

    /// Hide the author summary, as required for double-blind review.
    pub fn redacted(mut self) -> Self {
        self.author = None;
        self
    }
}

/// Metadata part of the multipart upload that creates a submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateSubmissionRequest {
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "resumo")]
    pub abstract_text: String,
    #[serde(rename = "palavrasChave")]
    pub keywords: Vec<String>,
    #[serde(rename = "formato")]
    pub format: SubmissionFormat,
    pub status: SubmissionStatus,
    #[serde(rename = "versao")]
    pub version: u32,
    #[serde(rename = "eventoId")]
    pub event_id: String,
    #[serde(rename = "trilhaTematicaId")]
    pub thematic_track_id: String,
    #[serde(rename = "submissaoOriginalId", skip_serializing_if = "Option::is_none")]
    pub original_submission_id: Option<String>,
}

/// Body of `PUT /submissoes/{id}/status`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusChangeRequest {
    pub status: SubmissionStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_server_payload() {
        let json = r#"{
            "id": "s1",
            "titulo": "Deep Learning for X",
            "resumo": "An abstract",
            "palavrasChave": ["ml", "vision"],
            "formato": "POSTER",
            "status": "APROVADA_COM_RESSALVAS",
            "versao": 2,
            "eventoId": "e1",
            "trilhaTematicaId": "tt1",
            "submissaoOriginalId": "s0"
        }"#;
        let submission: Submission = serde_json::from_str(json).unwrap();
        assert_eq!(submission.format, SubmissionFormat::Poster);
        assert_eq!(submission.status, SubmissionStatus::ApprovedWithCaveats);
        assert_eq!(submission.version, 2);
        assert_eq!(submission.lineage_root_id(), "s0");
        assert!(submission.is_resubmission());
    }

    #[test]
    fn version_defaults_to_one() {
        let json = r#"{
            "id": "s1", "titulo": "T", "resumo": "R", "formato": "WORKSHOP",
            "status": "RASCUNHO", "eventoId": "e1", "trilhaTematicaId": "tt1"
        }"#;
        let submission: Submission = serde_json::from_str(json).unwrap();
        assert_eq!(submission.version, 1);
        assert_eq!(submission.lineage_root_id(), "s1");
        assert!(submission.keywords.is_empty());
    }

    #[test]
    fn request_omits_missing_original_id() {
        let request = CreateSubmissionRequest {
            title: "T".into(),
            abstract_text: "R".into(),
            keywords: vec!["a".into()],
            format: SubmissionFormat::FullPaper,
            status: SubmissionStatus::Submitted,
            version: 1,
            event_id: "e1".into(),
            thematic_track_id: "tt1".into(),
            original_submission_id: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("submissaoOriginalId").is_none());
        assert_eq!(value["status"], "SUBMETIDA");
        assert_eq!(value["formato"], "ARTIGO_COMPLETO");
    }
}
