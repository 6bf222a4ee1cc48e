//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! session store for business logic.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::dto::{
    CreateSessionRequest, CreateSessionResponse, HealthResponse, PlanResponse,
    PushMessagesRequest, PushMessagesResponse, SessionListResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::models::Message;
use crate::services::{SessionId, SharedSession};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

fn lookup(state: &AppState, session_id: &SessionId) -> Result<SharedSession, AppError> {
    state
        .sessions
        .get(session_id)
        .ok_or_else(|| AppError::NotFound(format!("Session '{}' not found", session_id)))
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        sessions: state.sessions.len(),
    }))
}

// =============================================================================
// Sessions
// =============================================================================

/// GET /v1/sessions
///
/// List all live sessions, oldest first.
pub async fn list_sessions(State(state): State<AppState>) -> HandlerResult<SessionListResponse> {
    // Counting takes every session lock, which a running push may hold.
    let store = state.sessions.clone();
    let sessions = tokio::task::spawn_blocking(move || store.list())
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))?;
    let total = sessions.len();
    Ok(Json(SessionListResponse { sessions, total }))
}

/// POST /v1/sessions
///
/// Create an empty scheduling session. Interval overrides in the body are
/// merged onto the server defaults.
pub async fn create_session(
    State(state): State<AppState>,
    body: Option<Json<CreateSessionRequest>>,
) -> Result<(StatusCode, Json<CreateSessionResponse>), AppError> {
    let request = body.map(|Json(request)| request).unwrap_or_default();
    let config = request.resolve(state.sessions.default_config())?;
    let session_id = state.sessions.create_session(Some(config));

    Ok((
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            session_id,
            intervals: config.into(),
        }),
    ))
}

/// DELETE /v1/sessions/{session_id}
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<SessionId>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(&session_id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!(
            "Session '{}' not found",
            session_id
        )))
    }
}

// =============================================================================
// Scheduling
// =============================================================================

/// POST /v1/sessions/{session_id}/messages
///
/// Schedule messages in request order. On failure, messages before the
/// failing one stay scheduled and the error reports how many there were.
pub async fn push_messages(
    State(state): State<AppState>,
    Path(session_id): Path<SessionId>,
    Json(request): Json<PushMessagesRequest>,
) -> HandlerResult<PushMessagesResponse> {
    let session = lookup(&state, &session_id)?;
    let messages: Vec<Message> = request.messages.into_iter().map(Into::into).collect();

    // Resolution holds the session lock; keep it off the async workers.
    let (accepted, total, outcome) = tokio::task::spawn_blocking(move || {
        let (accepted, outcome) = session.push_batch(messages);
        (accepted, session.len(), outcome)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))?;

    if let Err(e) = outcome {
        tracing::error!(
            "Push to session {} failed after {} message(s): {}",
            session_id,
            accepted,
            e
        );
        return Err(AppError::scheduler(e, accepted));
    }

    Ok(Json(PushMessagesResponse { accepted, total }))
}

/// GET /v1/sessions/{session_id}/plan
pub async fn get_plan(
    State(state): State<AppState>,
    Path(session_id): Path<SessionId>,
) -> HandlerResult<PlanResponse> {
    let session = lookup(&state, &session_id)?;
    let entries = tokio::task::spawn_blocking(move || session.get_plan())
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))?;
    let total = entries.len();

    Ok(Json(PlanResponse {
        session_id,
        entries,
        total,
    }))
}
