//! Session HTTP handlers.
//!
//! Endpoints:
//! - POST   /api/v1/sessions      - Start a session with an empty history
//! - GET    /api/v1/sessions/{id} - Current history buffer
//! - DELETE /api/v1/sessions/{id} - Drop the session (reset)

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Serialize;
use uuid::Uuid;

use crate::http::error::AppError;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

/// A session and its rendered history.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub history: String,
}

#[derive(Debug, Serialize)]
pub struct DeletedView {
    pub id: Uuid,
    pub deleted: bool,
}

/// Parse a UUID from a path parameter, returning a 400 error on invalid format.
pub(crate) fn parse_uuid(s: &str) -> Result<Uuid, AppError> {
    s.parse::<Uuid>()
        .map_err(|_| AppError::Validation(format!("Invalid session id: {s}")))
}

/// POST /api/v1/sessions - Start a session.
pub async fn create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<SessionView>>) {
    let timer = RequestTimer::start();
    let id = state.create_session();
    let view = SessionView {
        id,
        history: String::new(),
    };
    (StatusCode::CREATED, Json(timer.success(view)))
}

/// GET /api/v1/sessions/{id} - Current history.
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<SessionView>>, AppError> {
    let timer = RequestTimer::start();
    let id = parse_uuid(&id)?;
    let slot = state.session(&id).ok_or(AppError::SessionNotFound(id))?;
    let history = slot.lock().await.as_str().to_string();

    Ok(Json(timer.success(SessionView { id, history })))
}

/// DELETE /api/v1/sessions/{id} - Drop the session.
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DeletedView>>, AppError> {
    let timer = RequestTimer::start();
    let id = parse_uuid(&id)?;
    if !state.remove_session(&id) {
        return Err(AppError::SessionNotFound(id));
    }

    Ok(Json(timer.success(DeletedView { id, deleted: true })))
}
