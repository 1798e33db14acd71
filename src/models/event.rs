//! Event model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::wire::wire_enum;
use super::{Committee, PersonSummary, Track};

wire_enum! {
    /// Event status. Two server generations coexist; the older
    /// `INSCRICOES_ABERTAS`/`ENCERRADO` encodings decode to the same variants.
    pub enum EventStatus {
        Planning => "PLANEJAMENTO", "Planning";
        SubmissionsOpen => "SUBMISSOES_ABERTAS" | "INSCRICOES_ABERTAS", "Submissions open";
        SubmissionsClosed => "SUBMISSOES_ENCERRADAS" | "ENCERRADO", "Submissions closed";
        InProgress => "EM_ANDAMENTO", "In progress";
        Concluded => "CONCLUIDO", "Concluded";
        Cancelled => "CANCELADO", "Cancelled";
    }
}

/// Review settings of an event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventConfig {
    #[serde(rename = "prazoSubmissao")]
    pub submission_deadline: DateTime<Utc>,
    #[serde(rename = "prazoAvaliacao")]
    pub evaluation_deadline: DateTime<Utc>,
    #[serde(rename = "numeroAvaliadoresPorSubmissao")]
    pub evaluators_per_submission: u32,
    #[serde(rename = "avaliacaoDuplaCega", default)]
    pub double_blind: bool,
    #[serde(rename = "permiteResubmissao", default)]
    pub allow_resubmission: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Event {
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descricao", default)]
    pub description: String,
    #[serde(rename = "dataInicio")]
    pub starts_at: DateTime<Utc>,
    #[serde(rename = "dataFim")]
    pub ends_at: DateTime<Utc>,
    #[serde(rename = "local", default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(rename = "site", default, skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,
    #[serde(rename = "logoUrl", default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    pub status: EventStatus,
    #[serde(rename = "configuracao", default, skip_serializing_if = "Option::is_none")]
    pub config: Option<EventConfig>,
    #[serde(rename = "trilhas", default)]
    pub tracks: Vec<Track>,
    #[serde(rename = "comites", default)]
    pub committees: Vec<Committee>,
    #[serde(rename = "organizadores", default)]
    pub organizers: Vec<PersonSummary>,
}

impl Event {
    /// Whether authors may still submit at `now`.
    pub fn accepts_submissions(&self, now: DateTime<Utc>) -> bool {
        if self.status != EventStatus::SubmissionsOpen {
            return false;
        }
        self.config
            .as_ref()
            .map_or(true, |config| now <= config.submission_deadline)
    }

    pub fn is_double_blind(&self) -> bool {
        self.config.as_ref().is_some_and(|config| config.double_blind)
    }

    pub fn allows_resubmission(&self) -> bool {
        self.config.as_ref().is_some_and(|config| config.allow_resubmission)
    }

    /// Evaluators each submission needs; events without configuration need one.
    pub fn evaluators_per_submission(&self) -> u32 {
        self.config
            .as_ref()
            .map_or(1, |config| config.evaluators_per_submission)
    }

    pub fn is_organized_by(&self, user_id: &str) -> bool {
        self.organizers.iter().any(|organizer| organizer.id == user_id)
    }
}

/// Body of `POST /eventos` and `PUT /eventos/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventRequest {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "dataInicio")]
    pub starts_at: DateTime<Utc>,
    #[serde(rename = "dataFim")]
    pub ends_at: DateTime<Utc>,
    #[serde(rename = "local", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(rename = "site", skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,
    #[serde(rename = "logoUrl", skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    pub status: EventStatus,
    #[serde(rename = "configuracao", skip_serializing_if = "Option::is_none")]
    pub config: Option<EventConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn event(status: EventStatus, config: Option<EventConfig>) -> Event {
        Event {
            id: "e1".into(),
            name: "SBES".into(),
            description: String::new(),
            starts_at: Utc.with_ymd_and_hms(2026, 9, 1, 9, 0, 0).unwrap(),
            ends_at: Utc.with_ymd_and_hms(2026, 9, 3, 18, 0, 0).unwrap(),
            location: None,
            site: None,
            logo_url: None,
            status,
            config,
            tracks: vec![],
            committees: vec![],
            organizers: vec![],
        }
    }

    fn config() -> EventConfig {
        EventConfig {
            submission_deadline: Utc.with_ymd_and_hms(2026, 6, 1, 23, 59, 0).unwrap(),
            evaluation_deadline: Utc.with_ymd_and_hms(2026, 7, 1, 23, 59, 0).unwrap(),
            evaluators_per_submission: 3,
            double_blind: true,
            allow_resubmission: false,
        }
    }

    #[test]
    fn submissions_close_after_deadline() {
        let open = event(EventStatus::SubmissionsOpen, Some(config()));
        assert!(open.accepts_submissions(Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap()));
        assert!(!open.accepts_submissions(Utc.with_ymd_and_hms(2026, 6, 2, 0, 0, 0).unwrap()));

        let planning = event(EventStatus::Planning, None);
        assert!(!planning.accepts_submissions(Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap()));
    }

    #[test]
    fn configuration_defaults() {
        let bare = event(EventStatus::SubmissionsOpen, None);
        assert_eq!(bare.evaluators_per_submission(), 1);
        assert!(!bare.is_double_blind());
        assert!(!bare.allows_resubmission());

        let configured = event(EventStatus::SubmissionsOpen, Some(config()));
        assert_eq!(configured.evaluators_per_submission(), 3);
        assert!(configured.is_double_blind());
    }
}
