//! Page handlers.
//!
//! Each handler extracts a [`Session`](crate::auth::Session), checks the role,
//! calls the services and renders a template. Failures bubble up as
//! [`Error`](crate::Error), whose `IntoResponse` renders the error page.

pub mod api;
pub mod committees;
pub mod dashboard;
pub mod evaluations;
pub mod events;
pub mod submissions;
pub mod wizard;

use axum::response::Redirect;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tera::Context;

use crate::lifecycle::Badge;
use crate::models::{Event, Submission, User};
use crate::navigation::sidebar;

/// Outcome codes carried in the query string after a redirect.
#[derive(Debug, Default, Deserialize)]
pub struct Flash {
    pub ok: Option<String>,
    pub refs_failed: Option<usize>,
    pub refs_total: Option<usize>,
}

impl Flash {
    pub fn message(&self) -> Option<&'static str> {
        let message = match self.ok.as_deref()? {
            "event_created" => "Event created.",
            "event_updated" => "Event updated.",
            "event_deleted" => "Event deleted.",
            "track_created" => "Track created.",
            "thematic_track_created" => "Thematic track created.",
            "committee_created" => "Committee created.",
            "submitted" => "Submission sent.",
            "draft_saved" => "Draft saved.",
            "submission_deleted" => "Submission deleted.",
            "decision_approved" => "Decision recorded: the submission was approved.",
            "decision_rejected" => "Decision recorded: the submission was rejected.",
            "evaluation_sent" => "Evaluation sent.",
            "invitation_sent" => "Invitation sent.",
            "invitation_accepted" => "Invitation accepted.",
            "invitation_declined" => "Invitation declined.",
            _ => return None,
        };
        Some(message)
    }

    pub fn warning(&self) -> Option<String> {
        let failed = self.refs_failed.filter(|&n| n > 0)?;
        let total = self.refs_total.unwrap_or(failed).max(failed);
        Some(format!(
            "{failed} of {total} references could not be added. You can add them again later."
        ))
    }
}

/// Context shared by every logged-in page.
pub(crate) fn page_context(user: &User, flash: &Flash) -> Context {
    let mut ctx = Context::new();
    ctx.insert("user_name", user.name());
    ctx.insert("user_role", user.role().label());
    ctx.insert("nav", &sidebar(user));
    ctx.insert("is_author", &user.is_author());
    ctx.insert("is_evaluator", &user.is_evaluator());
    ctx.insert("is_organizer", &user.is_organizer());
    if let Some(message) = flash.message() {
        ctx.insert("flash", message);
    }
    if let Some(warning) = flash.warning() {
        ctx.insert("warning", &warning);
    }
    ctx
}

pub(crate) fn redirect_ok(path: &str, code: &str) -> Redirect {
    let separator = if path.contains('?') { '&' } else { '?' };
    Redirect::to(&format!("{path}{separator}ok={code}"))
}

/// Confirmation checkboxes and hidden fields.
pub(crate) fn confirmed(value: &Option<String>) -> bool {
    matches!(value.as_deref(), Some("true" | "on" | "1" | "yes"))
}

pub(crate) fn display_date(value: &DateTime<Utc>) -> String {
    value.format("%d/%m/%Y %H:%M").to_string()
}

/// Submission as listed on pages.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct SubmissionRow {
    pub id: String,
    pub title: String,
    pub format: &'static str,
    pub version: u32,
    pub badge: Badge,
    pub author: Option<String>,
    pub submitted_at: Option<String>,
    pub event_id: String,
    pub thematic_track_id: String,
}

impl From<&Submission> for SubmissionRow {
    fn from(submission: &Submission) -> Self {
        Self {
            id: submission.id.clone(),
            title: submission.title.clone(),
            format: submission.format.label(),
            version: submission.version,
            badge: submission.status.badge(),
            author: submission.author.as_ref().map(|a| a.name.clone()),
            submitted_at: submission.submitted_at.as_ref().map(display_date),
            event_id: submission.event_id.clone(),
            thematic_track_id: submission.thematic_track_id.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct EventRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub status: &'static str,
    pub starts_at: String,
    pub ends_at: String,
    pub location: Option<String>,
    pub site: Option<String>,
    pub accepts_submissions: bool,
    pub double_blind: bool,
    pub allows_resubmission: bool,
    pub submission_deadline: Option<String>,
    pub evaluation_deadline: Option<String>,
    pub evaluators_per_submission: u32,
}

impl From<&Event> for EventRow {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id.clone(),
            name: event.name.clone(),
            description: event.description.clone(),
            status: event.status.label(),
            starts_at: display_date(&event.starts_at),
            ends_at: display_date(&event.ends_at),
            location: event.location.clone(),
            site: event.site.clone(),
            accepts_submissions: event.accepts_submissions(Utc::now()),
            double_blind: event.is_double_blind(),
            allows_resubmission: event.allows_resubmission(),
            submission_deadline: event.config.as_ref().map(|c| display_date(&c.submission_deadline)),
            evaluation_deadline: event.config.as_ref().map(|c| display_date(&c.evaluation_deadline)),
            evaluators_per_submission: event.evaluators_per_submission(),
        }
    }
}

/// `(wire value, label)` pairs for a select box.
pub(crate) fn options<T: Copy>(all: &[T], wire: fn(T) -> &'static str, label: fn(T) -> &'static str) -> Vec<(&'static str, &'static str)> {
    all.iter().map(|&v| (wire(v), label(v))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flash_codes() {
        let flash = Flash {
            ok: Some("decision_rejected".into()),
            ..Default::default()
        };
        assert_eq!(
            flash.message(),
            Some("Decision recorded: the submission was rejected.")
        );
        assert!(Flash {
            ok: Some("<script>".into()),
            ..Default::default()
        }
        .message()
        .is_none());
    }

    #[test]
    fn reference_warning_only_when_something_failed() {
        let none = Flash {
            refs_failed: Some(0),
            refs_total: Some(3),
            ..Default::default()
        };
        assert!(none.warning().is_none());

        let some = Flash {
            refs_failed: Some(2),
            refs_total: Some(5),
            ..Default::default()
        };
        assert_eq!(
            some.warning().as_deref(),
            Some("2 of 5 references could not be added. You can add them again later.")
        );
    }

    #[test]
    fn redirect_appends_code() {
        let response = axum::response::IntoResponse::into_response(redirect_ok("/comites/c1", "decision_rejected"));
        assert_eq!(
            response.headers()[axum::http::header::LOCATION],
            "/comites/c1?ok=decision_rejected"
        );
    }
}
