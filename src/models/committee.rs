//! Committee model.

use serde::{Deserialize, Serialize};

use super::wire::wire_enum;
use super::PersonSummary;

wire_enum! {
    pub enum CommitteeType {
        Scientific => "CIENTIFICO", "Scientific";
        Organizational => "ORGANIZACIONAL", "Organizational";
        Review => "REVISAO", "Review";
    }
}

/// A named group of evaluators and coordinators for one event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Committee {
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "tipo")]
    pub committee_type: CommitteeType,
    #[serde(rename = "descricao", default)]
    pub description: String,
    #[serde(rename = "eventoId")]
    pub event_id: String,
    #[serde(rename = "avaliadores", default)]
    pub evaluators: Vec<PersonSummary>,
    #[serde(rename = "coordenadores", default)]
    pub coordinators: Vec<PersonSummary>,
}

/// Body of `POST /comites`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateCommitteeRequest {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "tipo")]
    pub committee_type: CommitteeType,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "eventoId")]
    pub event_id: String,
    #[serde(rename = "avaliadoresIds")]
    pub evaluator_ids: Vec<String>,
    #[serde(rename = "coordenadoresIds")]
    pub coordinator_ids: Vec<String>,
}
