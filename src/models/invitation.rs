//! Invitations to evaluate a submission.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::wire::wire_enum;
use super::PersonSummary;

wire_enum! {
    pub enum InvitationStatus {
        Pending => "PENDENTE", "Pending";
        Accepted => "ACEITO", "Accepted";
        Declined => "RECUSADO", "Declined";
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Invitation {
    pub id: String,
    #[serde(rename = "submissaoId")]
    pub submission_id: String,
    #[serde(rename = "avaliador", default, skip_serializing_if = "Option::is_none")]
    pub invitee: Option<PersonSummary>,
    pub status: InvitationStatus,
    #[serde(rename = "motivoRecusa", default, skip_serializing_if = "Option::is_none")]
    pub decline_reason: Option<String>,
    #[serde(rename = "dataEnvio", default, skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<DateTime<Utc>>,
    /// Title of the submission, when the server embeds it.
    #[serde(rename = "tituloSubmissao", default, skip_serializing_if = "Option::is_none")]
    pub submission_title: Option<String>,
}

impl Invitation {
    pub fn is_pending(&self) -> bool {
        self.status == InvitationStatus::Pending
    }
}

/// Body of `POST /submissoes/{id}/convites`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateInvitationRequest {
    #[serde(rename = "avaliadorEmail")]
    pub evaluator_email: String,
}

/// Body of `PUT /convites/{id}/recusar`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeclineInvitationRequest {
    #[serde(rename = "motivo")]
    pub reason: String,
}
