use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form,
};
use serde::{Deserialize, Serialize};
use tera::Context;
use tracing::{info, warn};

use super::{confirmed, options, page_context, redirect_ok, EventRow, Flash};
use crate::auth::Session;
use crate::error::Result;
use crate::forms::{EventForm, ThematicTrackForm, TrackForm, Validate, ValidationErrors};
use crate::models::{EventStatus, Role, ThematicTrack, Track};
use crate::state::AppState;
use crate::templates;
use crate::workflow::fetch_bounded;

pub async fn list_events(session: Session, Query(flash): Query<Flash>) -> Result<Html<String>> {
    let events = session.api.events().list().await?;
    let rows: Vec<EventRow> = events.iter().map(EventRow::from).collect();

    let mut ctx = page_context(&session.user, &flash);
    ctx.insert("events", &rows);
    templates::render("events.html", &ctx)
}

fn event_form_page(session: &Session, form: &EventForm, errors: &ValidationErrors, action: &str) -> Result<Html<String>> {
    let mut ctx = page_context(&session.user, &Flash::default());
    ctx.insert("form", form);
    ctx.insert("errors", errors);
    ctx.insert("action", action);
    ctx.insert(
        "statuses",
        &options(EventStatus::ALL, EventStatus::as_wire, EventStatus::label),
    );
    templates::render("event_form.html", &ctx)
}

pub async fn new_event(session: Session) -> Result<Html<String>> {
    session.user.require(Role::Organizer)?;
    event_form_page(&session, &EventForm::default(), &ValidationErrors::new(), "/eventos")
}

pub async fn create_event(session: Session, Form(form): Form<EventForm>) -> Result<Response> {
    session.user.require(Role::Organizer)?;
    let request = match form.validate() {
        Ok(request) => request,
        Err(errors) => {
            let page = event_form_page(&session, &form, &errors, "/eventos")?;
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
        }
    };
    let event = session.api.events().create(&request).await?;
    info!("Event {} created by {}", event.id, session.user.id());
    Ok(redirect_ok(&format!("/eventos/{}", event.id), "event_created").into_response())
}

pub async fn edit_event(session: Session, Path(id): Path<String>) -> Result<Html<String>> {
    session.user.require(Role::Organizer)?;
    let event = session.api.events().get(&id).await?;
    event_form_page(
        &session,
        &EventForm::from(&event),
        &ValidationErrors::new(),
        &format!("/eventos/{id}"),
    )
}

pub async fn update_event(session: Session, Path(id): Path<String>, Form(form): Form<EventForm>) -> Result<Response> {
    session.user.require(Role::Organizer)?;
    let request = match form.validate() {
        Ok(request) => request,
        Err(errors) => {
            let page = event_form_page(&session, &form, &errors, &format!("/eventos/{id}"))?;
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
        }
    };
    session.api.events().update(&id, &request).await?;
    Ok(redirect_ok(&format!("/eventos/{id}"), "event_updated").into_response())
}

#[derive(Debug, Default, Deserialize)]
pub struct ConfirmForm {
    pub confirm: Option<String>,
}

pub async fn delete_event(session: Session, Path(id): Path<String>, Form(form): Form<ConfirmForm>) -> Result<Response> {
    session.user.require(Role::Organizer)?;
    if !confirmed(&form.confirm) {
        let event = session.api.events().get(&id).await?;
        let mut ctx = page_context(&session.user, &Flash::default());
        ctx.insert("title", "Delete event");
        ctx.insert(
            "question",
            &format!("Delete \"{}\"? This cannot be undone.", event.name),
        );
        ctx.insert("action", &format!("/eventos/{id}/excluir"));
        ctx.insert("cancel", &format!("/eventos/{id}"));
        ctx.insert("fields", &Vec::<(String, String)>::new());
        return Ok(templates::render("confirm.html", &ctx)?.into_response());
    }
    session.api.events().delete(&id).await?;
    info!("Event {} deleted by {}", id, session.user.id());
    Ok(redirect_ok("/eventos", "event_deleted").into_response())
}

#[derive(Debug, Serialize)]
struct ThematicRow {
    id: String,
    name: String,
    description: String,
    keywords: Vec<String>,
}

impl From<&ThematicTrack> for ThematicRow {
    fn from(thematic: &ThematicTrack) -> Self {
        Self {
            id: thematic.id.clone(),
            name: thematic.name.clone(),
            description: thematic.description.clone(),
            keywords: thematic.keywords.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct TrackRow {
    id: String,
    name: String,
    description: String,
    coordinator: String,
    thematic_tracks: Vec<ThematicRow>,
}

#[derive(Debug, Serialize)]
struct CommitteeRow {
    id: String,
    name: String,
    kind: &'static str,
    evaluators: usize,
}

/// Thematic tracks of every track, loaded with bounded concurrency.
async fn load_tracks(session: &Session, event_id: &str, concurrency: usize) -> Result<Vec<TrackRow>> {
    let tracks = session.api.tracks().by_event(event_id).await?;
    let api = &session.api;
    let mut rows = fetch_bounded(tracks, concurrency, |track: Track| async move {
        let thematic = match api.tracks().thematic_tracks(&track.id).await {
            Ok(list) => list,
            Err(err) => {
                warn!("Thematic tracks of {} unavailable: {}", track.id, err);
                track.thematic_tracks.clone()
            }
        };
        TrackRow {
            thematic_tracks: thematic.iter().map(ThematicRow::from).collect(),
            id: track.id,
            name: track.name,
            description: track.description,
            coordinator: track.coordinator,
        }
    })
    .await;
    rows.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(rows)
}

async fn event_page(
    session: &Session,
    state: &AppState,
    id: &str,
    flash: &Flash,
    extra: impl FnOnce(&mut Context),
) -> Result<Html<String>> {
    let event = session.api.events().get(id).await?;
    let tracks = load_tracks(session, id, state.config.fetch_concurrency).await?;
    let committees: Vec<CommitteeRow> = session
        .api
        .committees()
        .by_event(id)
        .await?
        .iter()
        .map(|c| CommitteeRow {
            id: c.id.clone(),
            name: c.name.clone(),
            kind: c.committee_type.label(),
            evaluators: c.evaluators.len(),
        })
        .collect();

    let mut ctx = page_context(&session.user, flash);
    let row = EventRow::from(&event);
    ctx.insert("can_submit", &(session.user.is_author() && row.accepts_submissions));
    ctx.insert("event", &row);
    ctx.insert("tracks", &tracks);
    ctx.insert("committees", &committees);
    ctx.insert("track_form", &TrackForm::default());
    ctx.insert("track_errors", &ValidationErrors::new());
    ctx.insert("thematic_form", &ThematicTrackForm::default());
    ctx.insert("thematic_errors", &ValidationErrors::new());
    ctx.insert("thematic_parent", "");
    extra(&mut ctx);
    templates::render("event_detail.html", &ctx)
}

pub async fn event_detail(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<String>,
    Query(flash): Query<Flash>,
) -> Result<Html<String>> {
    event_page(&session, &state, &id, &flash, |_| {}).await
}

pub async fn create_track(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(event_id): Path<String>,
    Form(form): Form<TrackForm>,
) -> Result<Response> {
    session.user.require(Role::Organizer)?;
    let request = match form.validate() {
        Ok(request) => request,
        Err(errors) => {
            let page = event_page(&session, &state, &event_id, &Flash::default(), |ctx| {
                ctx.insert("track_form", &form);
                ctx.insert("track_errors", &errors);
            })
            .await?;
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
        }
    };
    let track = session.api.tracks().create(&event_id, &request).await?;
    info!("Track {} created in event {}", track.id, event_id);
    Ok(redirect_ok(&format!("/eventos/{event_id}"), "track_created").into_response())
}

pub async fn create_thematic_track(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(track_id): Path<String>,
    Form(form): Form<ThematicTrackForm>,
) -> Result<Response> {
    session.user.require(Role::Organizer)?;
    let track = session.api.tracks().get(&track_id).await?;
    let back = track
        .event_id
        .as_ref()
        .map_or_else(|| "/eventos".to_string(), |id| format!("/eventos/{id}"));

    let request = match form.validate() {
        Ok(request) => request,
        Err(errors) => match &track.event_id {
            Some(event_id) => {
                let page = event_page(&session, &state, event_id, &Flash::default(), |ctx| {
                    ctx.insert("thematic_form", &form);
                    ctx.insert("thematic_errors", &errors);
                    ctx.insert("thematic_parent", &track_id);
                })
                .await?;
                return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
            }
            None => return Err(errors.into()),
        },
    };
    let thematic = session.api.tracks().create_thematic(&track_id, &request).await?;
    info!("Thematic track {} created under {}", thematic.id, track_id);
    Ok(redirect_ok(&back, "thematic_track_created").into_response())
}
