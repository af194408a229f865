use std::sync::Arc;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use streak_db::Database;
use streak_types::api::{
    Claims, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, UserExistsRequest,
    UserExistsResponse,
};

use crate::error::ApiError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub jwt_secret: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let name = req.name.trim();
    let email = req.email.trim();
    if name.is_empty() || email.is_empty() || req.password.trim().is_empty() {
        return Err(ApiError::validation("all fields are required"));
    }
    if req.password.len() < 8 {
        return Err(ApiError::validation(
            "password must be at least 8 characters",
        ));
    }

    if state.db.get_user_by_email(email)?.is_some() {
        return Err(ApiError::Conflict("user already exists"));
    }

    // Hash password with Argon2id
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(req.password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("password hashing failed: {}", e))?
        .to_string();

    let user_id = Uuid::new_v4();

    state.db.create_user(
        &user_id.to_string(),
        name,
        email,
        &password_hash,
        Utc::now(),
    )?;

    let token = create_token(&state.jwt_secret, user_id, email)?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse { user_id, token }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .db
        .get_user_by_email(req.email.trim())?
        .ok_or(ApiError::Unauthorized)?;

    // Verify password
    let parsed_hash = PasswordHash::new(&user.password)
        .map_err(|e| anyhow::anyhow!("stored password hash is corrupt: {}", e))?;

    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .map_err(|_| ApiError::Unauthorized)?;

    let user_id: Uuid = user
        .id
        .parse()
        .map_err(|e| anyhow::anyhow!("corrupt user id '{}': {}", user.id, e))?;

    let token = create_token(&state.jwt_secret, user_id, &user.email)?;

    Ok(Json(LoginResponse {
        user_id,
        email: user.email,
        token,
    }))
}

/// Pre-check used by the sign-up form before submitting credentials.
pub async fn exists(
    State(state): State<AppState>,
    Json(req): Json<UserExistsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let email = req.email.trim();
    if email.is_empty() {
        return Err(ApiError::validation("email is required"));
    }

    let exists = state.db.get_user_by_email(email)?.is_some();
    Ok(Json(UserExistsResponse { exists }))
}

fn create_token(secret: &str, user_id: Uuid, email: &str) -> anyhow::Result<String> {
    let claims = Claims {
        sub: user_id,
        email: email.to_string(),
        exp: (Utc::now() + chrono::Duration::days(30)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}
