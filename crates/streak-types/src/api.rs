use serde::{Deserialize, Serialize};
use uuid::Uuid;

// -- JWT Claims --

/// JWT claims used by the REST middleware and issued at register/login.
/// Canonical definition lives here in streak-types so every consumer agrees
/// on the field set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub user_id: Uuid,
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user_id: Uuid,
    pub email: String,
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserExistsRequest {
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserExistsResponse {
    pub exists: bool,
}

// -- Habits --

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateHabitRequest {
    pub name: String,
    /// Optional creation timestamp override: RFC 3339 or a plain
    /// `YYYY-MM-DD` date. Defaults to now when absent.
    pub created_at: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToggleCheckmarkRequest {
    /// Zero-based day slot, 0 ..= 30 for calendar days 1 ..= 31.
    pub day_index: usize,
}

// -- Notes --

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateNoteRequest {
    /// Client-assigned view key (creation time in milliseconds).
    pub local_key: i64,
    pub content: String,
    /// Pre-formatted display timestamp.
    pub updated_at: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateNoteRequest {
    pub content: String,
    pub updated_at: String,
}

// -- Shared --

/// Body returned by both delete endpoints. Deleting a missing id still
/// reports success; deletes are idempotent.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
}
