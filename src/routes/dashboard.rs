use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::Html,
};
use serde::Serialize;
use tracing::warn;

use super::{page_context, EventRow, Flash, SubmissionRow};
use crate::auth::Session;
use crate::error::Result;
use crate::models::{Evaluation, Invitation, SubmissionStatus, User};
use crate::state::AppState;
use crate::templates;
use crate::workflow::fetch_bounded;

#[derive(Debug, Serialize)]
struct InvitationRow {
    id: String,
    submission_id: String,
    submission_title: String,
    status: &'static str,
    pending: bool,
    sent_at: Option<String>,
}

impl From<&Invitation> for InvitationRow {
    fn from(invitation: &Invitation) -> Self {
        Self {
            id: invitation.id.clone(),
            submission_id: invitation.submission_id.clone(),
            submission_title: invitation
                .submission_title
                .clone()
                .unwrap_or_else(|| invitation.submission_id.clone()),
            status: invitation.status.label(),
            pending: invitation.is_pending(),
            sent_at: invitation.sent_at.as_ref().map(super::display_date),
        }
    }
}

#[derive(Debug, Serialize)]
struct EvaluationRow {
    submission_id: String,
    recommendation: &'static str,
    overall: f32,
}

impl From<&Evaluation> for EvaluationRow {
    fn from(evaluation: &Evaluation) -> Self {
        Self {
            submission_id: evaluation.submission_id.clone(),
            recommendation: evaluation.recommendation.label(),
            overall: evaluation.overall,
        }
    }
}

/// Landing page, composed by role.
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    session: Session,
    Query(flash): Query<Flash>,
) -> Result<Html<String>> {
    let mut ctx = page_context(&session.user, &flash);
    let api = &session.api;

    match &session.user {
        User::Author(_) => {
            let submissions: Vec<SubmissionRow> = api.submissions().mine().await?.iter().map(SubmissionRow::from).collect();
            ctx.insert("submissions", &submissions);
        }
        User::Evaluator(_) => {
            let mut invitations = api.invitations().mine().await?;
            invitations.sort_by_key(|i| !i.is_pending());
            let invitations: Vec<InvitationRow> = invitations.iter().map(InvitationRow::from).collect();
            let evaluations: Vec<EvaluationRow> = api.evaluations().mine().await?.iter().map(EvaluationRow::from).collect();
            ctx.insert("invitations", &invitations);
            ctx.insert("evaluations", &evaluations);
        }
        User::Organizer(organizer) => {
            let events = api.events().list().await?;
            let mine: Vec<_> = events.iter().filter(|e| e.is_organized_by(&organizer.id)).collect();
            let shown = if mine.is_empty() { events.iter().collect() } else { mine };

            let event_ids: Vec<String> = shown.iter().map(|e| e.id.clone()).collect();
            let batches = fetch_bounded(event_ids, state.config.fetch_concurrency, |event_id: String| async move {
                match api.submissions().by_event(&event_id, Some(SubmissionStatus::UnderReview)).await {
                    Ok(list) => list,
                    Err(err) => {
                        warn!("Submissions under review of {} unavailable: {}", event_id, err);
                        Vec::new()
                    }
                }
            })
            .await;
            let mut awaiting: Vec<SubmissionRow> = batches.iter().flatten().map(SubmissionRow::from).collect();
            awaiting.sort_by(|a, b| a.id.cmp(&b.id));

            let rows: Vec<EventRow> = shown.iter().map(|e| EventRow::from(*e)).collect();
            ctx.insert("events", &rows);
            ctx.insert("awaiting", &awaiting);
        }
    }

    templates::render("dashboard.html", &ctx)
}
