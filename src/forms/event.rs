use serde::{Deserialize, Serialize};

use super::{checked, check_length, optional_text, parse_datetime, require_text, Validate, ValidationErrors};
use crate::models::{Event, EventConfig, EventRequest, EventStatus};

/// Event creation/edit form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub starts_at: String,
    #[serde(default)]
    pub ends_at: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub site: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub submission_deadline: Option<String>,
    #[serde(default)]
    pub evaluation_deadline: Option<String>,
    #[serde(default)]
    pub evaluators_per_submission: Option<String>,
    #[serde(default)]
    pub double_blind: Option<String>,
    #[serde(default)]
    pub allow_resubmission: Option<String>,
}

impl EventForm {
    fn has_config(&self) -> bool {
        [
            &self.submission_deadline,
            &self.evaluation_deadline,
            &self.evaluators_per_submission,
        ]
        .iter()
        .any(|field| optional_text(field).is_some())
    }

    fn validate_config(&self, errors: &mut ValidationErrors) -> Option<EventConfig> {
        let submission_deadline = parse_datetime(
            errors,
            "submission_deadline",
            self.submission_deadline.as_deref().unwrap_or(""),
        );
        let evaluation_deadline = parse_datetime(
            errors,
            "evaluation_deadline",
            self.evaluation_deadline.as_deref().unwrap_or(""),
        );
        if let (Some(submission), Some(evaluation)) = (submission_deadline, evaluation_deadline) {
            if evaluation < submission {
                errors.add(
                    "evaluation_deadline",
                    "Evaluation deadline must not be before the submission deadline.",
                );
            }
        }

        let raw = self.evaluators_per_submission.as_deref().unwrap_or("").trim();
        let evaluators = match raw.parse::<u32>() {
            Ok(n) if n >= 1 => Some(n),
            _ => {
                errors.add(
                    "evaluators_per_submission",
                    "Must be a whole number of at least 1.",
                );
                None
            }
        };

        Some(EventConfig {
            submission_deadline: submission_deadline?,
            evaluation_deadline: evaluation_deadline?,
            evaluators_per_submission: evaluators?,
            double_blind: checked(&self.double_blind),
            allow_resubmission: checked(&self.allow_resubmission),
        })
    }
}

const INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

impl From<&Event> for EventForm {
    fn from(event: &Event) -> Self {
        let config = event.config.as_ref();
        Self {
            name: event.name.clone(),
            description: event.description.clone(),
            starts_at: event.starts_at.format(INPUT_FORMAT).to_string(),
            ends_at: event.ends_at.format(INPUT_FORMAT).to_string(),
            location: event.location.clone(),
            site: event.site.clone(),
            logo_url: event.logo_url.clone(),
            status: Some(event.status.as_wire().to_string()),
            submission_deadline: config.map(|c| c.submission_deadline.format(INPUT_FORMAT).to_string()),
            evaluation_deadline: config.map(|c| c.evaluation_deadline.format(INPUT_FORMAT).to_string()),
            evaluators_per_submission: config.map(|c| c.evaluators_per_submission.to_string()),
            double_blind: config.filter(|c| c.double_blind).map(|_| "on".to_string()),
            allow_resubmission: config.filter(|c| c.allow_resubmission).map(|_| "on".to_string()),
        }
    }
}

impl Validate for EventForm {
    type Output = EventRequest;

    fn validate(&self) -> Result<EventRequest, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = require_text(&mut errors, "name", &self.name);
        if !name.is_empty() {
            check_length(&mut errors, "name", &name, 3, 200);
        }
        let description = self.description.trim().to_string();
        check_length(&mut errors, "description", &description, 0, 5000);

        let starts_at = parse_datetime(&mut errors, "starts_at", &self.starts_at);
        let ends_at = parse_datetime(&mut errors, "ends_at", &self.ends_at);
        if let (Some(start), Some(end)) = (starts_at, ends_at) {
            if end < start {
                errors.add("ends_at", "End date must not be before the start date.");
            }
        }

        let status = match optional_text(&self.status) {
            None => Some(EventStatus::Planning),
            Some(raw) => match raw.parse::<EventStatus>() {
                Ok(status) => Some(status),
                Err(_) => {
                    errors.add("status", "Unknown status.");
                    None
                }
            },
        };

        let config = if self.has_config() {
            self.validate_config(&mut errors)
        } else {
            None
        };

        match (starts_at, ends_at, status) {
            (Some(starts_at), Some(ends_at), Some(status)) if errors.is_empty() => Ok(EventRequest {
                name,
                description,
                starts_at,
                ends_at,
                location: optional_text(&self.location),
                site: optional_text(&self.site),
                logo_url: optional_text(&self.logo_url),
                status,
                config,
            }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> EventForm {
        EventForm {
            name: "Simpósio Brasileiro".into(),
            description: "Annual meeting".into(),
            starts_at: "2026-09-01T09:00".into(),
            ends_at: "2026-09-03T18:00".into(),
            ..Default::default()
        }
    }

    #[test]
    fn valid_event_without_configuration() {
        let request = form().validate().unwrap();
        assert_eq!(request.status, EventStatus::Planning);
        assert!(request.config.is_none());
        assert!(request.location.is_none());
    }

    #[test]
    fn end_before_start_is_rejected() {
        let mut form = form();
        form.ends_at = "2026-08-31T09:00".into();
        let errors = form.validate().unwrap_err();
        assert!(errors.has("ends_at"));
    }

    #[test]
    fn same_instant_start_and_end_is_allowed() {
        let mut form = form();
        form.ends_at = form.starts_at.clone();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn evaluation_deadline_before_submission_deadline_is_rejected() {
        let mut form = form();
        form.submission_deadline = Some("2026-06-01T23:59".into());
        form.evaluation_deadline = Some("2026-05-01T23:59".into());
        form.evaluators_per_submission = Some("2".into());
        let errors = form.validate().unwrap_err();
        assert!(errors.has("evaluation_deadline"));
        assert!(!errors.has("evaluators_per_submission"));
    }

    #[test]
    fn evaluators_per_submission_must_be_positive_integer() {
        for raw in ["0", "-1", "1.5", "two", ""] {
            let mut form = form();
            form.submission_deadline = Some("2026-06-01T23:59".into());
            form.evaluation_deadline = Some("2026-07-01T23:59".into());
            form.evaluators_per_submission = Some(raw.into());
            let errors = form.validate().unwrap_err();
            assert!(errors.has("evaluators_per_submission"), "accepted {raw:?}");
        }
    }

    #[test]
    fn full_configuration() {
        let mut form = form();
        form.status = Some("SUBMISSOES_ABERTAS".into());
        form.submission_deadline = Some("2026-06-01T23:59".into());
        form.evaluation_deadline = Some("2026-06-01T23:59".into());
        form.evaluators_per_submission = Some("3".into());
        form.double_blind = Some("on".into());
        let request = form.validate().unwrap();
        let config = request.config.unwrap();
        assert_eq!(config.evaluators_per_submission, 3);
        assert!(config.double_blind);
        assert!(!config.allow_resubmission);
        assert_eq!(request.status, EventStatus::SubmissionsOpen);
    }

    #[test]
    fn edit_form_prefill_validates_back_to_the_event() {
        let mut form = form();
        form.status = Some("INSCRICOES_ABERTAS".into());
        form.submission_deadline = Some("2026-06-01T23:59".into());
        form.evaluation_deadline = Some("2026-06-15T23:59".into());
        form.evaluators_per_submission = Some("2".into());
        form.allow_resubmission = Some("on".into());
        let request = form.validate().unwrap();
        let event = Event {
            id: "e1".into(),
            name: request.name.clone(),
            description: request.description.clone(),
            starts_at: request.starts_at,
            ends_at: request.ends_at,
            location: None,
            site: None,
            logo_url: None,
            status: request.status,
            config: request.config.clone(),
            tracks: vec![],
            committees: vec![],
            organizers: vec![],
        };

        let prefill = EventForm::from(&event);
        assert_eq!(prefill.status.as_deref(), Some("SUBMISSOES_ABERTAS"));
        assert_eq!(prefill.double_blind, None);
        assert_eq!(prefill.validate().unwrap(), request);
    }
}
