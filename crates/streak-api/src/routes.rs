use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use crate::auth::{self, AppState};
use crate::habits;
use crate::middleware::require_auth;
use crate::notes;

/// Assemble the full API router. Lives here so the server binary and the
/// integration tests share one route table.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/exists", post(auth::exists))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/habits", get(habits::list_habits).post(habits::create_habit))
        .route("/habits/{habit_id}", delete(habits::delete_habit))
        .route("/habits/{habit_id}/checkmarks", put(habits::toggle_checkmark))
        .route("/notes", get(notes::list_notes).post(notes::create_note))
        .route("/notes/{note_id}", put(notes::update_note).delete(notes::delete_note))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state);

    Router::new().merge(public_routes).merge(protected_routes)
}
