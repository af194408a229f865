use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use uuid::Uuid;

use streak_types::api::{Claims, CreateNoteRequest, DeleteResponse, UpdateNoteRequest};
use streak_types::models::Note;

use crate::auth::AppState;
use crate::error::ApiError;

/// `GET /notes`: every note owned by the caller, storage order.
pub async fn list_notes(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let email = claims.email.clone();
    let notes = tokio::task::spawn_blocking(move || db.db.list_notes(&email)).await??;

    Ok(Json(notes))
}

/// `POST /notes`: persist the raw content string verbatim (newlines
/// included; splitting into bullet lines is a rendering concern). The
/// emptiness check lives here, not only in the view.
pub async fn create_note(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateNoteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.content.trim().is_empty() {
        return Err(ApiError::validation("note content is required"));
    }

    let note = Note {
        id: Uuid::new_v4(),
        local_key: req.local_key,
        content: req.content,
        updated_at: req.updated_at,
        owner_email: claims.email.clone(),
        created_at: Utc::now(),
    };

    let db = state.clone();
    let stored = note.clone();
    tokio::task::spawn_blocking(move || db.db.insert_note(&stored)).await??;

    Ok((StatusCode::CREATED, Json(note)))
}

/// `PUT /notes/{note_id}`: full replace of content and the display
/// timestamp. A missing target is NotFound, distinct from validation
/// failures; `local_key` and the owner never change.
pub async fn update_note(
    State(state): State<AppState>,
    Path(note_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<UpdateNoteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.content.trim().is_empty() {
        return Err(ApiError::validation("note content is required"));
    }

    let db = state.clone();
    let id = note_id.to_string();
    let email = claims.email.clone();
    let updated = tokio::task::spawn_blocking(move || -> Result<Note, ApiError> {
        let note = db.db.get_note(&id)?.ok_or(ApiError::NotFound("note"))?;
        if note.owner_email != email {
            return Err(ApiError::Forbidden);
        }
        db.db
            .update_note(&id, &req.content, &req.updated_at)?
            .ok_or(ApiError::NotFound("note"))
    })
    .await??;

    Ok(Json(updated))
}

/// `DELETE /notes/{note_id}`: idempotent like habit delete.
pub async fn delete_note(
    State(state): State<AppState>,
    Path(note_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let id = note_id.to_string();
    let email = claims.email.clone();
    tokio::task::spawn_blocking(move || -> Result<(), ApiError> {
        match db.db.get_note(&id)? {
            None => Ok(()),
            Some(note) if note.owner_email != email => Err(ApiError::Forbidden),
            Some(_) => {
                db.db.delete_note(&id)?;
                Ok(())
            }
        }
    })
    .await??;

    Ok(Json(DeleteResponse { success: true }))
}
