//! Submission wizard pages.
//!
//! Every step re-posts the fields of the earlier ones as hidden inputs; each
//! request reopens the wizard and replays them, so nothing is kept on the
//! server between steps.

use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use tracing::{info, warn};

use super::{confirmed, options, page_context, Flash};
use crate::auth::Session;
use crate::error::Result;
use crate::forms::{too_large, BasicInfoForm, FileUpload, ReferencesForm, ValidationErrors};
use crate::models::{Role, SubmissionFormat};
use crate::state::AppState;
use crate::templates;
use crate::workflow::{SubmissionWizard, WizardStep};

/// Every field the wizard may post.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WizardForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub abstract_text: String,
    #[serde(default)]
    pub keywords: String,
    #[serde(default)]
    pub format: String,
    #[serde(default)]
    pub dois: String,
    pub action: Option<String>,
    pub draft: Option<String>,
}

impl WizardForm {
    fn basic(&self) -> BasicInfoForm {
        BasicInfoForm {
            title: self.title.clone(),
            abstract_text: self.abstract_text.clone(),
            keywords: self.keywords.clone(),
            format: self.format.clone(),
        }
    }

    fn references(&self) -> ReferencesForm {
        ReferencesForm {
            dois: self.dois.clone(),
        }
    }

    fn going_back(&self) -> bool {
        self.action.as_deref() == Some("back")
    }

    fn set(&mut self, name: &str, value: String) {
        match name {
            "title" => self.title = value,
            "abstract_text" => self.abstract_text = value,
            "keywords" => self.keywords = value,
            "format" => self.format = value,
            "dois" => self.dois = value,
            "action" => self.action = Some(value),
            "draft" => self.draft = Some(value),
            _ => {}
        }
    }
}

struct StepView<'a> {
    step: WizardStep,
    basic: &'a BasicInfoForm,
    dois: &'a str,
    errors: &'a ValidationErrors,
}

fn wizard_page(session: &Session, state: &AppState, wizard: &SubmissionWizard, view: StepView<'_>) -> Result<Response> {
    let mut ctx = page_context(&session.user, &Flash::default());
    ctx.insert(
        "base",
        &format!(
            "/eventos/{}/tematicas/{}/submeter",
            wizard.event_id(),
            wizard.thematic_track_id()
        ),
    );
    ctx.insert("step", &view.step);
    ctx.insert("step_number", &view.step.number());
    ctx.insert("form", view.basic);
    ctx.insert("dois", view.dois);
    ctx.insert("errors", view.errors);
    ctx.insert("resubmission", wizard.resubmission());
    ctx.insert(
        "formats",
        &options(SubmissionFormat::ALL, SubmissionFormat::as_wire, SubmissionFormat::label),
    );
    ctx.insert("max_mb", &(state.config.max_upload_bytes / (1024 * 1024)));

    let page = templates::render("wizard.html", &ctx)?;
    if view.errors.is_empty() {
        Ok(page.into_response())
    } else {
        Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response())
    }
}

pub async fn start(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path((event_id, thematic_track_id)): Path<(String, String)>,
) -> Result<Response> {
    session.user.require(Role::Author)?;
    let wizard = SubmissionWizard::open(&session.api, &event_id, &thematic_track_id).await?;
    let dois = wizard.prefill_dois();
    wizard_page(
        &session,
        &state,
        &wizard,
        StepView {
            step: WizardStep::BasicInfo,
            basic: wizard.prefill(),
            dois: &dois,
            errors: &ValidationErrors::new(),
        },
    )
}

pub async fn basic_info(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path((event_id, thematic_track_id)): Path<(String, String)>,
    Form(form): Form<WizardForm>,
) -> Result<Response> {
    session.user.require(Role::Author)?;
    let mut wizard = SubmissionWizard::open(&session.api, &event_id, &thematic_track_id).await?;
    let basic = form.basic();
    let dois = if form.dois.trim().is_empty() {
        wizard.prefill_dois()
    } else {
        form.dois.clone()
    };

    let (step, errors) = match wizard.submit_basic_info(&basic) {
        Ok(()) => (WizardStep::References, ValidationErrors::new()),
        Err(errors) => (WizardStep::BasicInfo, errors),
    };
    wizard_page(
        &session,
        &state,
        &wizard,
        StepView {
            step,
            basic: &basic,
            dois: &dois,
            errors: &errors,
        },
    )
}

pub async fn references(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path((event_id, thematic_track_id)): Path<(String, String)>,
    Form(form): Form<WizardForm>,
) -> Result<Response> {
    session.user.require(Role::Author)?;
    let mut wizard = SubmissionWizard::open(&session.api, &event_id, &thematic_track_id).await?;
    let basic = form.basic();

    let (step, errors) = if let Err(errors) = wizard.submit_basic_info(&basic) {
        (WizardStep::BasicInfo, errors)
    } else if form.going_back() {
        (WizardStep::BasicInfo, ValidationErrors::new())
    } else {
        match wizard.submit_references(&form.references()) {
            Ok(()) => (WizardStep::Upload, ValidationErrors::new()),
            Err(errors) => (WizardStep::References, errors),
        }
    };
    wizard_page(
        &session,
        &state,
        &wizard,
        StepView {
            step,
            basic: &basic,
            dois: &form.dois,
            errors: &errors,
        },
    )
}

/// What the final step posted. Fields read before a failure are kept.
#[derive(Default)]
struct Upload {
    form: WizardForm,
    file: Option<FileUpload>,
    errors: ValidationErrors,
}

fn unreadable_upload(err: &MultipartError, max_bytes: usize) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        warn!("Upload over the body limit: {}", err);
        errors.add("file", too_large(max_bytes));
    } else {
        warn!("Malformed multipart body: {}", err);
        errors.add("file", "The upload could not be read. Please try again.");
    }
    errors
}

/// Collect the wizard fields and the manuscript from the final step. The
/// hidden fields precede the file input, so they survive a body cut short at
/// the size limit.
async fn read_upload(mut multipart: Multipart, max_bytes: usize) -> Upload {
    let mut upload = Upload::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => {
                upload.errors = unreadable_upload(&err, max_bytes);
                break;
            }
        };
        let name = field.name().unwrap_or("").to_string();
        if name == "arquivo" {
            let file_name = field.file_name().unwrap_or("").to_string();
            let content_type = field.content_type().map(str::to_string);
            match field.bytes().await {
                Ok(bytes) if file_name.is_empty() && bytes.is_empty() => {}
                Ok(bytes) => upload.file = Some(FileUpload::new(file_name, content_type, bytes.to_vec())),
                Err(err) => {
                    upload.errors = unreadable_upload(&err, max_bytes);
                    break;
                }
            }
        } else {
            match field.text().await {
                Ok(value) => upload.form.set(&name, value),
                Err(err) => {
                    upload.errors = unreadable_upload(&err, max_bytes);
                    break;
                }
            }
        }
    }
    upload
}

pub async fn finish(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path((event_id, thematic_track_id)): Path<(String, String)>,
    multipart: Multipart,
) -> Result<Response> {
    session.user.require(Role::Author)?;
    let mut wizard = SubmissionWizard::open(&session.api, &event_id, &thematic_track_id).await?;

    let Upload { form, file, errors: upload_errors } =
        read_upload(multipart, state.config.max_upload_bytes).await;
    let basic = form.basic();
    let page = |wizard: &SubmissionWizard, step: WizardStep, errors: &ValidationErrors| {
        wizard_page(
            &session,
            &state,
            wizard,
            StepView {
                step,
                basic: &basic,
                dois: &form.dois,
                errors,
            },
        )
    };

    if let Err(errors) = wizard.submit_basic_info(&basic) {
        return page(&wizard, WizardStep::BasicInfo, &errors);
    }
    if let Err(errors) = wizard.submit_references(&form.references()) {
        return page(&wizard, WizardStep::References, &errors);
    }
    if form.going_back() {
        return page(&wizard, WizardStep::References, &ValidationErrors::new());
    }
    if !upload_errors.is_empty() {
        return page(&wizard, WizardStep::Upload, &upload_errors);
    }
    wizard.save_as_draft(confirmed(&form.draft));

    let upload = file.unwrap_or_else(|| FileUpload::new("", None, Vec::new()));
    if let Err(errors) = wizard.attach_file(upload, state.config.max_upload_bytes) {
        return page(&wizard, WizardStep::Upload, &errors);
    }

    let report = wizard.finish(&session.api, state.config.fetch_concurrency).await?;
    info!(
        "Submission {} finished with {}/{} references",
        report.submission.id,
        report.references_created,
        report.references_requested()
    );

    let code = if confirmed(&form.draft) { "draft_saved" } else { "submitted" };
    let mut location = format!("/submissoes/{}?ok={code}", report.submission.id);
    if report.has_warnings() {
        location.push_str(&format!(
            "&refs_failed={}&refs_total={}",
            report.reference_errors.len(),
            report.references_requested()
        ));
    }
    Ok(Redirect::to(&location).into_response())
}
