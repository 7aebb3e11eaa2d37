//! POST /api/v1/sessions/{id}/ask - one image question.
//!
//! Multipart fields: `image` (file) and `question` (text). Either may be
//! absent while the user is still filling in the page; the response then
//! carries `answer: null` and the unchanged history.

use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use serde::Serialize;
use tracing::{debug, info};

use gemtalk_core::vision::service::{Outcome, Submission};
use gemtalk_types::image::ImageUpload;

use crate::http::error::AppError;
use crate::http::handlers::session::parse_uuid;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AskView {
    /// `None` when the submission was incomplete.
    pub answer: Option<String>,
    pub history: String,
}

fn form_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::Validation(format!("Invalid form data: {}", e.body_text()))
    }
}

async fn read_submission(
    mut multipart: Multipart,
    max_upload_bytes: usize,
) -> Result<Submission, AppError> {
    let mut submission = Submission::default();

    while let Some(field) = multipart.next_field().await.map_err(form_error)? {
        match field.name() {
            Some("question") => {
                submission.question = Some(field.text().await.map_err(form_error)?);
            }
            Some("image") => {
                let filename = field
                    .file_name()
                    .filter(|name| !name.is_empty())
                    .map(str::to_string);
                let bytes = field.bytes().await.map_err(form_error)?;
                if bytes.len() > max_upload_bytes {
                    return Err(AppError::PayloadTooLarge(format!(
                        "Image is {} bytes; the limit is {max_upload_bytes}",
                        bytes.len()
                    )));
                }
                // Browsers send an empty part when no file is chosen.
                if !bytes.is_empty() {
                    submission.image = Some(ImageUpload {
                        filename,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            other => debug!(field = ?other, "Ignoring unknown form field"),
        }
    }

    Ok(submission)
}

/// POST /api/v1/sessions/{id}/ask
pub async fn ask(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<AskView>>, AppError> {
    let timer = RequestTimer::start();
    let id = parse_uuid(&id)?;
    let slot = state.session(&id).ok_or(AppError::SessionNotFound(id))?;

    let submission = read_submission(multipart, state.max_upload_bytes).await?;

    // Held for the whole exchange: one submission per session at a time.
    let mut history = slot.lock().await;
    let view = match state.vision.handle(&history, submission).await? {
        Outcome::Incomplete => AskView {
            answer: None,
            history: history.as_str().to_string(),
        },
        Outcome::Answered {
            answer,
            history: updated,
        } => {
            *history = updated;
            info!(
                session_id = %id,
                request_id = timer.request_id(),
                "Stored answered question"
            );
            AskView {
                answer: Some(answer),
                history: history.as_str().to_string(),
            }
        }
    };

    Ok(Json(timer.success(view)))
}
