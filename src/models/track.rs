//! Tracks and the thematic tracks submissions are filed under.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ThematicTrack {
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descricao", default)]
    pub description: String,
    #[serde(rename = "palavrasChave", default)]
    pub keywords: Vec<String>,
    #[serde(rename = "trilhaId", default, skip_serializing_if = "Option::is_none")]
    pub track_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Track {
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descricao", default)]
    pub description: String,
    #[serde(rename = "coordenador", default)]
    pub coordinator: String,
    #[serde(rename = "palavrasChave", default)]
    pub keywords: Vec<String>,
    #[serde(rename = "eventoId", default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    #[serde(rename = "trilhasTematicas", default)]
    pub thematic_tracks: Vec<ThematicTrack>,
}

/// Body of `POST /eventos/{id}/trilhas`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateTrackRequest {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "coordenador")]
    pub coordinator: String,
    #[serde(rename = "palavrasChave")]
    pub keywords: Vec<String>,
}

/// Body of `POST /trilhas/{id}/tematicas`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateThematicTrackRequest {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "palavrasChave")]
    pub keywords: Vec<String>,
}
