//! Server-rendered front-end for a conference management platform.
//!
//! Pages are rendered here and every piece of data comes from the conference
//! REST API; nothing is persisted locally.

pub mod auth;
pub mod config;
pub mod error;
pub mod forms;
pub mod lifecycle;
pub mod models;
pub mod navigation;
pub mod routes;
pub mod services;
pub mod state;
pub mod templates;
pub mod workflow;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    response::Redirect,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use error::{Error, Result};
pub use state::AppState;

use routes::{api, committees, dashboard, evaluations, events, submissions, wizard};

/// Room for the multipart framing and the text fields around the manuscript.
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

pub fn create_router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD;

    Router::new()
        .route("/", get(|| async { Redirect::to("/eventos") }))
        .route("/health", get(api::health))
        .route("/api/lifecycle", get(api::lifecycle_doc))
        .route("/dashboard", get(dashboard::dashboard))
        // Events and tracks
        .route("/eventos", get(events::list_events).post(events::create_event))
        .route("/eventos/novo", get(events::new_event))
        .route("/eventos/:id", get(events::event_detail).post(events::update_event))
        .route("/eventos/:id/editar", get(events::edit_event))
        .route("/eventos/:id/excluir", post(events::delete_event))
        .route("/eventos/:id/trilhas", post(events::create_track))
        .route("/trilhas/:id/tematicas", post(events::create_thematic_track))
        // Committees
        .route("/eventos/:id/comites/novo", get(committees::new_committee))
        .route("/eventos/:id/comites", post(committees::create_committee))
        .route("/comites/:id", get(committees::committee_detail))
        // Submission wizard
        .route("/eventos/:id/tematicas/:thematic_id/submeter", get(wizard::start))
        .route("/eventos/:id/tematicas/:thematic_id/submeter/dados", post(wizard::basic_info))
        .route("/eventos/:id/tematicas/:thematic_id/submeter/referencias", post(wizard::references))
        .route("/eventos/:id/tematicas/:thematic_id/submeter/finalizar", post(wizard::finish))
        // Submissions
        .route("/submissoes/:id", get(submissions::submission_detail))
        .route(
            "/submissoes/:id/excluir",
            get(submissions::confirm_delete).post(submissions::delete_submission),
        )
        .route("/submissoes/:id/arquivo", get(api::download_file))
        .route("/submissoes/:id/revisao", get(submissions::review))
        .route("/submissoes/:id/decisao", post(submissions::decide_submission))
        .route("/submissoes/:id/convites", post(submissions::invite_evaluator))
        // Evaluations
        .route("/submissoes/:id/avaliar", get(evaluations::evaluation_form))
        .route("/submissoes/:id/avaliacoes", post(evaluations::submit_evaluation))
        .route("/convites/:id/aceitar", post(evaluations::accept_invitation))
        .route(
            "/convites/:id/recusar",
            get(evaluations::decline_form).post(evaluations::decline_invitation),
        )
        .route("/trilhas-tematicas/:id/avaliacoes", get(evaluations::thematic_track_status))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
