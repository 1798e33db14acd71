use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form,
};
use tracing::info;

use super::{options, page_context, redirect_ok, Flash, SubmissionRow};
use crate::auth::Session;
use crate::error::Result;
use crate::forms::{CommitteeForm, Validate, ValidationErrors, MIN_COMMITTEE_EVALUATORS};
use crate::models::{CommitteeType, Role, SubmissionStatus};
use crate::templates;

async fn committee_form_page(
    session: &Session,
    event_id: &str,
    form: &CommitteeForm,
    errors: &ValidationErrors,
) -> Result<Html<String>> {
    let event = session.api.events().get(event_id).await?;
    let mut ctx = page_context(&session.user, &Flash::default());
    ctx.insert("event_id", event_id);
    ctx.insert("event_name", &event.name);
    ctx.insert("form", form);
    ctx.insert("errors", errors);
    ctx.insert("can_submit", &form.can_submit());
    ctx.insert("evaluator_count", &form.evaluator_count());
    ctx.insert("min_evaluators", &MIN_COMMITTEE_EVALUATORS);
    ctx.insert(
        "types",
        &options(CommitteeType::ALL, CommitteeType::as_wire, CommitteeType::label),
    );
    templates::render("committee_form.html", &ctx)
}

pub async fn new_committee(session: Session, Path(event_id): Path<String>) -> Result<Html<String>> {
    session.user.require(Role::Organizer)?;
    committee_form_page(&session, &event_id, &CommitteeForm::default(), &ValidationErrors::new()).await
}

pub async fn create_committee(
    session: Session,
    Path(event_id): Path<String>,
    Form(form): Form<CommitteeForm>,
) -> Result<Response> {
    session.user.require(Role::Organizer)?;

    let draft = match form.validate() {
        Ok(draft) => draft,
        Err(errors) => return rejected(&session, &event_id, &form, &errors).await,
    };

    let evaluators = session
        .api
        .evaluators()
        .resolve_evaluators(&draft.evaluator_emails)
        .await?;
    let coordinators = session
        .api
        .evaluators()
        .resolve_organizers(&draft.coordinator_emails)
        .await?;

    let mut errors = ValidationErrors::new();
    if !evaluators.unknown.is_empty() {
        errors.add(
            "evaluator_emails",
            format!("No evaluator registered with: {}", evaluators.unknown.join(", ")),
        );
    }
    if !coordinators.unknown.is_empty() {
        errors.add(
            "coordinator_emails",
            format!("No organizer registered with: {}", coordinators.unknown.join(", ")),
        );
    }
    if !errors.is_empty() {
        return rejected(&session, &event_id, &form, &errors).await;
    }

    let request = match draft.into_request(&event_id, &evaluators.found, &coordinators.found) {
        Ok(request) => request,
        Err(errors) => return rejected(&session, &event_id, &form, &errors).await,
    };
    let committee = session.api.committees().create(&request).await?;
    info!(
        "Committee {} created for event {} with {} evaluators",
        committee.id,
        event_id,
        request.evaluator_ids.len()
    );
    Ok(redirect_ok(&format!("/comites/{}", committee.id), "committee_created").into_response())
}

async fn rejected(session: &Session, event_id: &str, form: &CommitteeForm, errors: &ValidationErrors) -> Result<Response> {
    let page = committee_form_page(session, event_id, form, errors).await?;
    Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response())
}

/// Committee members and the event's submissions waiting for a tie-break.
pub async fn committee_detail(
    session: Session,
    Path(id): Path<String>,
    Query(flash): Query<Flash>,
) -> Result<Html<String>> {
    session.user.require(Role::Organizer)?;
    let committee = session.api.committees().get(&id).await?;
    let awaiting: Vec<SubmissionRow> = session
        .api
        .submissions()
        .by_event(&committee.event_id, Some(SubmissionStatus::UnderReview))
        .await?
        .iter()
        .map(SubmissionRow::from)
        .collect();

    let mut ctx = page_context(&session.user, &flash);
    ctx.insert("committee_id", &committee.id);
    ctx.insert("name", &committee.name);
    ctx.insert("kind", committee.committee_type.label());
    ctx.insert("description", &committee.description);
    ctx.insert("event_id", &committee.event_id);
    ctx.insert("evaluators", &committee.evaluators);
    ctx.insert("coordinators", &committee.coordinators);
    ctx.insert("awaiting", &awaiting);
    templates::render("committee.html", &ctx)
}
