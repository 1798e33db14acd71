use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use tracing::info;

use super::ApiClient;
use crate::error::Result;
use crate::forms::FileUpload;
use crate::models::{CreateSubmissionRequest, Submission};

pub struct FileService<'a> {
    api: &'a ApiClient,
}

/// A manuscript fetched back from the API.
#[derive(Debug, Clone)]
pub struct DownloadedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl<'a> FileService<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// Create a submission from its JSON metadata and the manuscript.
    /// References are added afterwards, one DOI at a time.
    pub async fn upload_submission(&self, metadata: &CreateSubmissionRequest, file: &FileUpload) -> Result<Submission> {
        let metadata_part = Part::text(serde_json::to_string(metadata)?).mime_str("application/json")?;
        let file_part = Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.mime_type())?;

        let form = Form::new()
            .part("submissao", metadata_part)
            .part("arquivo", file_part);

        info!(
            "Uploading '{}' ({} bytes) for thematic track {}",
            file.file_name,
            file.len(),
            metadata.thematic_track_id
        );
        self.api.post_multipart(&["submissoes"], form).await
    }

    pub async fn download(&self, submission_id: &str) -> Result<DownloadedFile> {
        let response = self
            .api
            .get_raw(&["submissoes", submission_id, "arquivo"])
            .await?;
        let headers = response.headers();
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let file_name = headers
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(disposition_file_name)
            .unwrap_or_else(|| format!("submission_{submission_id}"));
        let bytes = response.bytes().await?.to_vec();
        Ok(DownloadedFile {
            file_name,
            content_type,
            bytes,
        })
    }
}

fn disposition_file_name(header: &str) -> Option<String> {
    header
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|name| name.trim_matches('"').to_string())
        .filter(|name| !name.is_empty() && !name.contains(['/', '\\']) && !name.contains(".."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_from_disposition() {
        assert_eq!(
            disposition_file_name("attachment; filename=\"paper.pdf\"").as_deref(),
            Some("paper.pdf")
        );
        assert_eq!(disposition_file_name("inline").as_deref(), None);
        assert_eq!(disposition_file_name("attachment; filename=\"../etc/passwd\""), None);
    }
}
