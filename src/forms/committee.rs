use serde::{Deserialize, Serialize};

use super::{check_length, require_text, split_list, Validate, ValidationErrors};
use crate::models::{CommitteeType, CreateCommitteeRequest, PersonSummary};

/// Fewest evaluators a committee may be created with.
pub const MIN_COMMITTEE_EVALUATORS: usize = 3;

/// Committee creation form. Members are entered by e-mail, one per line, and
/// resolved to ids through the evaluator/organizer lookup before creation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommitteeForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub committee_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub evaluator_emails: String,
    #[serde(default)]
    pub coordinator_emails: String,
}

/// Validated committee form, members still identified by e-mail.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitteeDraft {
    pub name: String,
    pub committee_type: CommitteeType,
    pub description: String,
    pub evaluator_emails: Vec<String>,
    pub coordinator_emails: Vec<String>,
}

impl CommitteeForm {
    pub fn evaluator_count(&self) -> usize {
        split_list(&self.evaluator_emails).len()
    }

    /// The create action stays disabled until enough evaluators are listed.
    pub fn can_submit(&self) -> bool {
        self.evaluator_count() >= MIN_COMMITTEE_EVALUATORS
    }
}

impl Validate for CommitteeForm {
    type Output = CommitteeDraft;

    fn validate(&self) -> Result<CommitteeDraft, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = require_text(&mut errors, "name", &self.name);
        if !name.is_empty() {
            check_length(&mut errors, "name", &name, 3, 150);
        }

        let committee_type = match self.committee_type.parse::<CommitteeType>() {
            Ok(t) => Some(t),
            Err(_) => {
                errors.add("committee_type", "Choose a committee type.");
                None
            }
        };

        let evaluator_emails: Vec<String> = split_list(&self.evaluator_emails)
            .into_iter()
            .map(|email| email.to_lowercase())
            .collect();
        if evaluator_emails.len() < MIN_COMMITTEE_EVALUATORS {
            errors.add(
                "evaluator_emails",
                format!("At least {MIN_COMMITTEE_EVALUATORS} evaluators are required."),
            );
        }
        for email in &evaluator_emails {
            if !looks_like_email(email) {
                errors.add("evaluator_emails", format!("`{email}` is not an e-mail address."));
            }
        }

        let coordinator_emails: Vec<String> = split_list(&self.coordinator_emails)
            .into_iter()
            .map(|email| email.to_lowercase())
            .collect();
        for email in &coordinator_emails {
            if !looks_like_email(email) {
                errors.add("coordinator_emails", format!("`{email}` is not an e-mail address."));
            }
        }

        match committee_type {
            Some(committee_type) if errors.is_empty() => Ok(CommitteeDraft {
                name,
                committee_type,
                description: self.description.trim().to_string(),
                evaluator_emails,
                coordinator_emails,
            }),
            _ => Err(errors),
        }
    }
}

impl CommitteeDraft {
    /// Build the request once every member has been resolved.
    pub fn into_request(
        self,
        event_id: &str,
        evaluators: &[PersonSummary],
        coordinators: &[PersonSummary],
    ) -> Result<CreateCommitteeRequest, ValidationErrors> {
        let mut evaluator_ids: Vec<String> = Vec::new();
        for person in evaluators {
            if !evaluator_ids.contains(&person.id) {
                evaluator_ids.push(person.id.clone());
            }
        }
        let mut errors = ValidationErrors::new();
        if evaluator_ids.len() < MIN_COMMITTEE_EVALUATORS {
            errors.add(
                "evaluator_emails",
                format!("At least {MIN_COMMITTEE_EVALUATORS} distinct evaluators are required."),
            );
        }
        errors.finish(|| CreateCommitteeRequest {
            name: self.name,
            committee_type: self.committee_type,
            description: self.description,
            event_id: event_id.to_string(),
            evaluator_ids,
            coordinator_ids: coordinators.iter().map(|p| p.id.clone()).collect(),
        })
    }
}

fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    }
}
