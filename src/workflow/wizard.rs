//! Three-step submission wizard: basic information, references, upload.
//!
//! Opening the wizard looks for an earlier submission of the author in the same
//! thematic track that came back approved with caveats; when one exists the new
//! submission becomes its next version and starts from its content.

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use super::fetch_bounded;
use crate::error::{Error, Result};
use crate::forms::{BasicInfo, BasicInfoForm, FileUpload, ReferencesForm, Validate, ValidationErrors};
use crate::lifecycle::{self, Actor};
use crate::models::{CreateSubmissionRequest, Reference, Submission, SubmissionStatus};
use crate::services::ApiClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    BasicInfo,
    References,
    Upload,
}

impl WizardStep {
    pub fn number(self) -> u8 {
        match self {
            WizardStep::BasicInfo => 1,
            WizardStep::References => 2,
            WizardStep::Upload => 3,
        }
    }

    fn previous(self) -> Self {
        match self {
            WizardStep::BasicInfo | WizardStep::References => WizardStep::BasicInfo,
            WizardStep::Upload => WizardStep::References,
        }
    }
}

/// Version bookkeeping of the submission being written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resubmission {
    #[serde(rename = "isResubmissao")]
    pub is_resubmission: bool,
    #[serde(rename = "versao")]
    pub version: u32,
    #[serde(rename = "submissaoOriginalId")]
    pub original_submission_id: Option<String>,
    /// Submission this one replaces.
    #[serde(skip)]
    pub previous_id: Option<String>,
}

impl Resubmission {
    pub fn fresh() -> Self {
        Self {
            is_resubmission: false,
            version: 1,
            original_submission_id: None,
            previous_id: None,
        }
    }

    pub fn from_previous(previous: &Submission) -> Self {
        Self {
            is_resubmission: true,
            version: previous.version + 1,
            original_submission_id: Some(previous.lineage_root_id().to_string()),
            previous_id: Some(previous.id.clone()),
        }
    }
}

/// Latest submission in `thematic_track_id` that was approved with caveats.
pub fn resubmission_candidate<'a>(mine: &'a [Submission], thematic_track_id: &str) -> Option<&'a Submission> {
    mine.iter()
        .filter(|s| s.thematic_track_id == thematic_track_id)
        .filter(|s| s.status == SubmissionStatus::ApprovedWithCaveats)
        .max_by_key(|s| s.version)
}

/// A reference that could not be created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceFailure {
    pub doi: String,
    #[serde(rename = "mensagem")]
    pub message: String,
}

/// Result of finishing the wizard. Reference failures do not undo the submission.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionReport {
    #[serde(rename = "submissao")]
    pub submission: Submission,
    #[serde(rename = "referenciasCriadas")]
    pub references_created: usize,
    #[serde(rename = "errosReferencias")]
    pub reference_errors: Vec<ReferenceFailure>,
}

impl CompletionReport {
    pub fn has_warnings(&self) -> bool {
        !self.reference_errors.is_empty()
    }

    pub fn references_requested(&self) -> usize {
        self.references_created + self.reference_errors.len()
    }
}

#[derive(Debug, Clone)]
pub struct SubmissionWizard {
    event_id: String,
    thematic_track_id: String,
    step: WizardStep,
    prefill: BasicInfoForm,
    prefill_dois: Vec<String>,
    basic: Option<BasicInfo>,
    dois: Vec<String>,
    file: Option<FileUpload>,
    resubmission: Resubmission,
    as_draft: bool,
}

impl SubmissionWizard {
    pub fn new(event_id: impl Into<String>, thematic_track_id: impl Into<String>) -> Self {
        Self {
            event_id: event_id.into(),
            thematic_track_id: thematic_track_id.into(),
            step: WizardStep::BasicInfo,
            prefill: BasicInfoForm::default(),
            prefill_dois: Vec::new(),
            basic: None,
            dois: Vec::new(),
            file: None,
            resubmission: Resubmission::fresh(),
            as_draft: false,
        }
    }

    /// Start a new version of `previous`, preloading its content.
    pub fn resuming(
        event_id: impl Into<String>,
        thematic_track_id: impl Into<String>,
        previous: &Submission,
        references: &[Reference],
    ) -> Self {
        let mut wizard = Self::new(event_id, thematic_track_id);
        wizard.prefill = BasicInfoForm {
            title: previous.title.clone(),
            abstract_text: previous.abstract_text.clone(),
            keywords: previous.keywords.join(", "),
            format: previous.format.as_wire().to_string(),
        };
        wizard.prefill_dois = references.iter().map(|r| r.doi.clone()).collect();
        wizard.resubmission = Resubmission::from_previous(previous);
        wizard
    }

    /// Open the wizard for the logged-in author.
    ///
    /// A new version of a submission approved with caveats may be written after
    /// the submission window closes, as long as the event allows resubmission.
    /// Anything else needs the window to be open.
    pub async fn open(api: &ApiClient, event_id: &str, thematic_track_id: &str) -> Result<Self> {
        let event = api.events().get(event_id).await?;
        let mine = api.submissions().mine().await?;

        match resubmission_candidate(&mine, thematic_track_id) {
            Some(previous) if event.allows_resubmission() => {
                let references = api.references().list(&previous.id).await?;
                info!(
                    "Resubmission of {} (version {}) in thematic track {}",
                    previous.id,
                    previous.version + 1,
                    thematic_track_id
                );
                Ok(Self::resuming(event_id, thematic_track_id, previous, &references))
            }
            _ if event.accepts_submissions(Utc::now()) => Ok(Self::new(event_id, thematic_track_id)),
            _ => Err(Error::Forbidden(format!(
                "{} is not accepting submissions",
                event.name
            ))),
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn event_id(&self) -> &str {
        &self.event_id
    }

    pub fn thematic_track_id(&self) -> &str {
        &self.thematic_track_id
    }

    pub fn resubmission(&self) -> &Resubmission {
        &self.resubmission
    }

    /// Values to show in the basic information step.
    pub fn prefill(&self) -> &BasicInfoForm {
        &self.prefill
    }

    /// DOIs to show in the references step, one per line.
    pub fn prefill_dois(&self) -> String {
        if self.dois.is_empty() {
            self.prefill_dois.join("\n")
        } else {
            self.dois.join("\n")
        }
    }

    pub fn dois(&self) -> &[String] {
        &self.dois
    }

    pub fn file(&self) -> Option<&FileUpload> {
        self.file.as_ref()
    }

    pub fn save_as_draft(&mut self, as_draft: bool) {
        self.as_draft = as_draft;
    }

    pub fn submit_basic_info(&mut self, form: &BasicInfoForm) -> std::result::Result<(), ValidationErrors> {
        self.prefill = form.clone();
        let info = form.validate()?;
        self.basic = Some(info);
        self.step = WizardStep::References;
        Ok(())
    }

    pub fn submit_references(&mut self, form: &ReferencesForm) -> std::result::Result<(), ValidationErrors> {
        self.require_basic()?;
        let dois = form.validate()?;
        self.dois = dois;
        self.step = WizardStep::Upload;
        Ok(())
    }

    pub fn attach_file(&mut self, file: FileUpload, max_bytes: usize) -> std::result::Result<(), ValidationErrors> {
        self.require_basic()?;
        if self.step == WizardStep::BasicInfo {
            let mut errors = ValidationErrors::new();
            errors.add("step", "Review the references before uploading.");
            return Err(errors);
        }
        file.validate(max_bytes)?;
        self.file = Some(file);
        self.step = WizardStep::Upload;
        Ok(())
    }

    /// Go back one step; entered data is kept.
    pub fn back(&mut self) {
        self.step = self.step.previous();
    }

    fn require_basic(&self) -> std::result::Result<&BasicInfo, ValidationErrors> {
        self.basic.as_ref().ok_or_else(|| {
            let mut errors = ValidationErrors::new();
            errors.add("step", "Complete the basic information first.");
            errors
        })
    }

    /// Metadata for the upload, once the first step is done.
    pub fn metadata(&self) -> Option<CreateSubmissionRequest> {
        let basic = self.basic.as_ref()?;
        Some(CreateSubmissionRequest {
            title: basic.title.clone(),
            abstract_text: basic.abstract_text.clone(),
            keywords: basic.keywords.clone(),
            format: basic.format,
            status: if self.as_draft {
                SubmissionStatus::Draft
            } else {
                SubmissionStatus::Submitted
            },
            version: self.resubmission.version,
            event_id: self.event_id.clone(),
            thematic_track_id: self.thematic_track_id.clone(),
            original_submission_id: self.resubmission.original_submission_id.clone(),
        })
    }

    /// Create the submission, then its references with at most `concurrency`
    /// requests in flight. Failed references are reported, not raised.
    pub async fn finish(&self, api: &ApiClient, concurrency: usize) -> Result<CompletionReport> {
        let (metadata, file) = match (self.metadata(), self.file.as_ref()) {
            (Some(metadata), Some(file)) => (metadata, file),
            _ => {
                let mut errors = ValidationErrors::new();
                errors.add("step", "Complete every step before finishing.");
                return Err(errors.into());
            }
        };

        let submission = api.files().upload_submission(&metadata, file).await?;
        info!("Created submission {} (version {})", submission.id, submission.version);

        let submission_id = submission.id.as_str();
        let pending: Vec<(usize, String)> = self.dois.iter().cloned().enumerate().collect();
        let mut outcomes = fetch_bounded(pending, concurrency, |(index, doi): (usize, String)| async move {
            let outcome = api.references().create_from_doi(submission_id, &doi).await;
            (index, doi, outcome)
        })
        .await;
        outcomes.sort_by_key(|(index, _, _)| *index);

        let mut references_created = 0;
        let mut reference_errors = Vec::new();
        for (_, doi, outcome) in outcomes {
            match outcome {
                Ok(_) => references_created += 1,
                Err(err) => reference_errors.push(ReferenceFailure {
                    doi,
                    message: err.user_message(),
                }),
            }
        }
        if !reference_errors.is_empty() {
            warn!(
                "Submission {}: {} of {} references failed: {:?}",
                submission.id,
                reference_errors.len(),
                self.dois.len(),
                reference_errors
            );
        }

        if let Some(previous_id) = &self.resubmission.previous_id {
            self.retire_previous(api, previous_id).await;
        }

        Ok(CompletionReport {
            submission,
            references_created,
            reference_errors,
        })
    }

    /// Mark the replaced submission as resubmitted; failure only gets logged.
    async fn retire_previous(&self, api: &ApiClient, previous_id: &str) {
        let from = SubmissionStatus::ApprovedWithCaveats;
        if let Err(err) = lifecycle::transition(from, SubmissionStatus::Resubmitted, Actor::Author) {
            warn!("Not marking {} as resubmitted: {}", previous_id, err);
            return;
        }
        if let Err(err) = api
            .submissions()
            .update_status(previous_id, SubmissionStatus::Resubmitted)
            .await
        {
            warn!("Could not mark {} as resubmitted: {}", previous_id, err);
        }
    }
}
