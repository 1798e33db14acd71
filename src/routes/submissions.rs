use axum::{
    extract::{Path, Query},
    response::{Html, IntoResponse, Response},
    Form,
};
use serde::{Deserialize, Serialize};
use tera::Context;
use tracing::{info, warn};

use super::{confirmed, page_context, redirect_ok, Flash, SubmissionRow};
use crate::auth::Session;
use crate::error::{Error, Result};
use crate::forms::ValidationErrors;
use crate::lifecycle::{self, Actor};
use crate::models::{CommitteeType, Evaluation, Event, Role, Submission, User};
use crate::templates;
use crate::workflow::{decide, RecommendationTally, TieBreakDecision};

#[derive(Debug, Serialize)]
struct EvaluationView {
    originality: f32,
    methodology: f32,
    relevance: f32,
    writing: f32,
    overall: f32,
    recommendation: &'static str,
    comments: String,
    confidential: bool,
}

impl From<&Evaluation> for EvaluationView {
    fn from(evaluation: &Evaluation) -> Self {
        Self {
            originality: evaluation.originality,
            methodology: evaluation.methodology,
            relevance: evaluation.relevance,
            writing: evaluation.writing,
            overall: evaluation.overall,
            recommendation: evaluation.recommendation.label(),
            comments: evaluation.comments.clone(),
            confidential: evaluation.confidential,
        }
    }
}

fn insert_submission(ctx: &mut Context, submission: &Submission) {
    ctx.insert("submission", &SubmissionRow::from(submission));
    ctx.insert("abstract_text", &submission.abstract_text);
    ctx.insert("keywords", &submission.keywords);
    ctx.insert("file_name", &submission.file_name);
    ctx.insert("original_id", &submission.original_submission_id);
}

/// Submission as the current user may see it.
async fn visible_submission(session: &Session, id: &str) -> Result<(Submission, Event)> {
    let submission = session.api.submissions().get(id).await?;
    let event = session.api.events().get(&submission.event_id).await?;
    let submission = if session.user.is_evaluator() && event.is_double_blind() {
        submission.redacted()
    } else {
        submission
    };
    Ok((submission, event))
}

async fn evaluations_for(session: &Session, submission_id: &str) -> Vec<Evaluation> {
    match session.api.evaluations().for_submission(submission_id).await {
        Ok(list) if session.user.is_author() => list.into_iter().map(Evaluation::for_author).collect(),
        Ok(list) => list,
        Err(err) => {
            warn!("Evaluations of {} unavailable: {}", submission_id, err);
            Vec::new()
        }
    }
}

pub async fn submission_detail(session: Session, Path(id): Path<String>, Query(flash): Query<Flash>) -> Result<Html<String>> {
    let (submission, event) = visible_submission(&session, &id).await?;
    let references = session.api.references().list(&id).await?;

    let mut ctx = page_context(&session.user, &flash);
    insert_submission(&mut ctx, &submission);
    ctx.insert("event_name", &event.name);
    ctx.insert("references", &references.iter().map(|r| &r.doi).collect::<Vec<_>>());

    let status = submission.status;
    let is_author = session.user.is_author();
    ctx.insert("can_delete", &(is_author && status.can_delete()));
    ctx.insert(
        "can_resubmit",
        &(is_author && status.can_resubmit() && event.allows_resubmission()),
    );
    ctx.insert(
        "resubmit_href",
        &format!(
            "/eventos/{}/tematicas/{}/submeter",
            submission.event_id, submission.thematic_track_id
        ),
    );
    ctx.insert("can_evaluate", &session.user.is_evaluator());
    ctx.insert(
        "can_decide",
        &(session.user.is_organizer() && status.awaits_organizer_decision()),
    );

    if matches!(session.user, User::Author(_) | User::Organizer(_)) {
        let evaluations = evaluations_for(&session, &id).await;
        let views: Vec<EvaluationView> = evaluations.iter().map(EvaluationView::from).collect();
        ctx.insert("evaluations", &views);
    }
    if session.user.is_organizer() {
        let invitations = session.api.invitations().for_submission(&id).await?;
        let invitations: Vec<_> = invitations
            .iter()
            .map(|i| {
                (
                    i.invitee.as_ref().map_or(String::new(), |p| p.name.clone()),
                    i.status.label(),
                    i.decline_reason.clone().unwrap_or_default(),
                )
            })
            .collect();
        ctx.insert("invitations", &invitations);
        match session.api.submissions().evaluation_status(&id).await {
            Ok(detail) => {
                ctx.insert("progress", &detail);
                ctx.insert("missing_evaluators", &detail.missing_evaluators());
            }
            Err(err) => warn!("Evaluation status of {} unavailable: {}", id, err),
        }
    }

    templates::render("submission.html", &ctx)
}

fn confirm_page(
    user: &User,
    title: &str,
    question: &str,
    action: &str,
    cancel: &str,
    fields: &[(&str, &str)],
) -> Result<Html<String>> {
    let mut ctx = page_context(user, &Flash::default());
    ctx.insert("title", title);
    ctx.insert("question", question);
    ctx.insert("action", action);
    ctx.insert("cancel", cancel);
    ctx.insert("fields", fields);
    templates::render("confirm.html", &ctx)
}

pub async fn confirm_delete(session: Session, Path(id): Path<String>) -> Result<Html<String>> {
    session.user.require(Role::Author)?;
    let submission = session.api.submissions().get(&id).await?;
    confirm_page(
        &session.user,
        "Delete submission",
        &format!("Delete the draft \"{}\"? This cannot be undone.", submission.title),
        &format!("/submissoes/{id}/excluir"),
        &format!("/submissoes/{id}"),
        &[],
    )
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteForm {
    pub confirm: Option<String>,
}

pub async fn delete_submission(session: Session, Path(id): Path<String>, Form(form): Form<DeleteForm>) -> Result<Response> {
    session.user.require(Role::Author)?;
    if !confirmed(&form.confirm) {
        return Ok(confirm_delete(session, Path(id)).await?.into_response());
    }
    let submission = session.api.submissions().get(&id).await?;
    if !submission.status.can_delete() {
        return Err(Error::Forbidden(format!(
            "only drafts can be deleted; this submission is {}",
            submission.status.label().to_lowercase()
        )));
    }
    session.api.submissions().delete(&id).await?;
    info!("Submission {} deleted by {}", id, session.user.id());
    Ok(redirect_ok("/dashboard", "submission_deleted").into_response())
}

#[derive(Debug, Default, Deserialize)]
pub struct ReviewQuery {
    pub comite: Option<String>,
}

/// Organizer view of a submission's evaluations, with the tie-break form.
pub async fn review(session: Session, Path(id): Path<String>, Query(query): Query<ReviewQuery>) -> Result<Html<String>> {
    session.user.require(Role::Organizer)?;
    let submission = session.api.submissions().get(&id).await?;
    let evaluations = session.api.evaluations().for_submission(&id).await?;
    let tally = RecommendationTally::from_evaluations(&evaluations);

    let mut ctx = page_context(&session.user, &Flash::default());
    insert_submission(&mut ctx, &submission);
    ctx.insert(
        "evaluations",
        &evaluations.iter().map(EvaluationView::from).collect::<Vec<_>>(),
    );
    ctx.insert("tally", &tally);
    ctx.insert("split", &tally.is_split());
    ctx.insert("can_decide", &submission.status.awaits_organizer_decision());
    ctx.insert("committee_id", &query.comite.unwrap_or_default());
    ctx.insert(
        "decisions",
        &TieBreakDecision::ALL
            .iter()
            .map(|d| (d.as_wire(), d.label()))
            .collect::<Vec<_>>(),
    );
    templates::render("review.html", &ctx)
}

#[derive(Debug, Default, Deserialize)]
pub struct DecisionForm {
    #[serde(default)]
    pub decision: String,
    pub confirm: Option<String>,
    pub committee_id: Option<String>,
}

/// Organizer tie-break. Without the confirmation flag a confirm page is shown
/// and nothing is sent.
pub async fn decide_submission(session: Session, Path(id): Path<String>, Form(form): Form<DecisionForm>) -> Result<Response> {
    session.user.require(Role::Organizer)?;
    let decision: TieBreakDecision = form.decision.parse().map_err(|_| {
        let mut errors = ValidationErrors::new();
        errors.add("decision", "Choose approve or reject.");
        Error::from(errors)
    })?;
    let committee_id = form.committee_id.as_deref().map(str::trim).filter(|c| !c.is_empty());

    if !confirmed(&form.confirm) {
        let submission = session.api.submissions().get(&id).await?;
        lifecycle::transition(submission.status, decision.target_status(), Actor::Organizer)?;
        let page = confirm_page(
            &session.user,
            "Confirm decision",
            &format!(
                "{} \"{}\"? This decision is final.",
                decision.label(),
                submission.title
            ),
            &format!("/submissoes/{id}/decisao"),
            &format!("/submissoes/{id}/revisao"),
            &[
                ("decision", decision.as_wire()),
                ("committee_id", committee_id.unwrap_or("")),
            ],
        )?;
        return Ok(page.into_response());
    }

    let updated = decide(&session.api, &id, decision).await?;
    info!("Submission {} is now {}", updated.id, updated.status.as_wire());
    let code = match decision {
        TieBreakDecision::Approve => "decision_approved",
        TieBreakDecision::Reject => "decision_rejected",
    };
    let committee_id = match committee_id {
        Some(committee_id) => Some(committee_id.to_string()),
        None => deciding_committee(&session, &updated.event_id).await,
    };
    let back = match committee_id {
        Some(committee_id) => format!("/comites/{committee_id}"),
        None => format!("/submissoes/{id}"),
    };
    Ok(redirect_ok(&back, code).into_response())
}

/// Committee that tie-breaks for an event: the first review or scientific
/// committee, else any. `None` when the event has none or the lookup fails.
async fn deciding_committee(session: &Session, event_id: &str) -> Option<String> {
    let committees = match session.api.committees().by_event(event_id).await {
        Ok(committees) => committees,
        Err(err) => {
            warn!("Could not list committees of event {}: {}", event_id, err);
            return None;
        }
    };
    committees
        .iter()
        .find(|c| matches!(c.committee_type, CommitteeType::Review | CommitteeType::Scientific))
        .or_else(|| committees.first())
        .map(|c| c.id.clone())
}

#[derive(Debug, Default, Deserialize)]
pub struct InviteForm {
    #[serde(default)]
    pub evaluator_email: String,
}

pub async fn invite_evaluator(session: Session, Path(id): Path<String>, Form(form): Form<InviteForm>) -> Result<Response> {
    session.user.require(Role::Organizer)?;
    let email = form.evaluator_email.trim();
    if email.is_empty() {
        let mut errors = ValidationErrors::new();
        errors.add("evaluator_email", "This field is required.");
        return Err(errors.into());
    }
    let invitation = session.api.invitations().invite(&id, email).await?;
    info!("Invitation {} sent for submission {}", invitation.id, id);
    Ok(redirect_ok(&format!("/submissoes/{id}"), "invitation_sent").into_response())
}
