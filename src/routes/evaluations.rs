use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form,
};
use tracing::info;

use super::{options, page_context, redirect_ok, Flash, SubmissionRow};
use crate::auth::Session;
use crate::error::Result;
use crate::forms::{DeclineForm, EvaluationForm, Validate, ValidationErrors};
use crate::models::{Recommendation, Role};
use crate::state::AppState;
use crate::templates;
use crate::workflow::summarize_thematic_track;

async fn evaluation_form_page(
    session: &Session,
    submission_id: &str,
    form: &EvaluationForm,
    errors: &ValidationErrors,
) -> Result<Html<String>> {
    let submission = session.api.submissions().get(submission_id).await?;
    let event = session.api.events().get(&submission.event_id).await?;
    let submission = if event.is_double_blind() {
        submission.redacted()
    } else {
        submission
    };

    let mut ctx = page_context(&session.user, &Flash::default());
    ctx.insert("submission", &SubmissionRow::from(&submission));
    ctx.insert("abstract_text", &submission.abstract_text);
    ctx.insert("form", form);
    ctx.insert("errors", errors);
    ctx.insert(
        "recommendations",
        &options(Recommendation::ALL, Recommendation::as_wire, Recommendation::label),
    );
    templates::render("evaluation_form.html", &ctx)
}

pub async fn evaluation_form(session: Session, Path(id): Path<String>) -> Result<Html<String>> {
    session.user.require(Role::Evaluator)?;
    evaluation_form_page(&session, &id, &EvaluationForm::default(), &ValidationErrors::new()).await
}

pub async fn submit_evaluation(session: Session, Path(id): Path<String>, Form(form): Form<EvaluationForm>) -> Result<Response> {
    session.user.require(Role::Evaluator)?;
    let request = match form.validate() {
        Ok(request) => request,
        Err(errors) => {
            let page = evaluation_form_page(&session, &id, &form, &errors).await?;
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
        }
    };
    let evaluation = session.api.evaluations().create(&id, &request).await?;
    info!(
        "Evaluation {} of submission {} recommends {}",
        evaluation.id,
        id,
        evaluation.recommendation.as_wire()
    );
    Ok(redirect_ok("/dashboard", "evaluation_sent").into_response())
}

pub async fn accept_invitation(session: Session, Path(id): Path<String>) -> Result<Response> {
    session.user.require(Role::Evaluator)?;
    session.api.invitations().accept(&id).await?;
    info!("Invitation {} accepted by {}", id, session.user.id());
    Ok(redirect_ok("/dashboard", "invitation_accepted").into_response())
}

fn decline_page(session: &Session, id: &str, form: &DeclineForm, errors: &ValidationErrors) -> Result<Html<String>> {
    let mut ctx = page_context(&session.user, &Flash::default());
    ctx.insert("invitation_id", id);
    ctx.insert("form", form);
    ctx.insert("errors", errors);
    templates::render("decline_form.html", &ctx)
}

pub async fn decline_form(session: Session, Path(id): Path<String>) -> Result<Html<String>> {
    session.user.require(Role::Evaluator)?;
    decline_page(&session, &id, &DeclineForm::default(), &ValidationErrors::new())
}

pub async fn decline_invitation(session: Session, Path(id): Path<String>, Form(form): Form<DeclineForm>) -> Result<Response> {
    session.user.require(Role::Evaluator)?;
    let request = match form.validate() {
        Ok(request) => request,
        Err(errors) => {
            let page = decline_page(&session, &id, &form, &errors)?;
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
        }
    };
    session.api.invitations().decline(&id, &request).await?;
    info!("Invitation {} declined by {}", id, session.user.id());
    Ok(redirect_ok("/dashboard", "invitation_declined").into_response())
}

/// Evaluation progress of every submission in a thematic track.
pub async fn thematic_track_status(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Html<String>> {
    session.user.require(Role::Organizer)?;
    let thematic = session.api.tracks().get_thematic(&id).await?;
    let summary = summarize_thematic_track(&session.api, &id, state.config.fetch_concurrency).await?;

    let mut ctx = page_context(&session.user, &Flash::default());
    ctx.insert("thematic_name", &thematic.name);
    ctx.insert("summary", &summary);
    templates::render("status_summary.html", &ctx)
}
