use axum::{
    extract::Path,
    http::header,
    response::{IntoResponse, Response},
    Json,
};

use crate::auth::Api;
use crate::error::Result;
use crate::lifecycle::{self, LifecycleDoc};

pub async fn health() -> &'static str {
    "ok"
}

/// Submission states and transitions, for clients and documentation.
pub async fn lifecycle_doc() -> Json<LifecycleDoc> {
    Json(lifecycle::describe())
}

/// Stream a submission's manuscript back to the browser.
pub async fn download_file(Api(api): Api, Path(submission_id): Path<String>) -> Result<Response> {
    let file = api.files().download(&submission_id).await?;
    let mime = if file.content_type == "application/octet-stream" {
        mime_guess::from_path(&file.file_name)
            .first_raw()
            .unwrap_or("application/octet-stream")
            .to_string()
    } else {
        file.content_type
    };
    tracing::info!("Downloading {} for submission {}", file.file_name, submission_id);
    Ok((
        [
            (header::CONTENT_TYPE, mime),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file.file_name),
            ),
        ],
        file.bytes,
    )
        .into_response())
}
