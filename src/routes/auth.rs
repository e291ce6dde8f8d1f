use crate::{
    db::{self, users as db_users},
    error::AppError,
    middleware::auth::{create_token, hash_token, verify_token, AuthUser, TokenKind, REFRESH_TOKEN_DAYS},
    models::user::*,
    routes::ideas::AppState,
};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{extract::State, Json};
use chrono::{Duration, Utc};
use serde_json::{json, Value};

const DEFAULT_NAME: &str = "Anonymous";

/// Issues an access/refresh pair and stores the refresh token's hash.
async fn issue_tokens(state: &AppState, user: User) -> Result<AuthResponse, AppError> {
    let access_token = create_token(&user.id, &state.jwt_secret, TokenKind::Access)
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;
    let refresh_token = create_token(&user.id, &state.jwt_secret, TokenKind::Refresh)
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;

    let token_id = uuid::Uuid::now_v7().to_string();
    let token_hash = hash_token(&refresh_token);
    let expires_at = (Utc::now() + Duration::days(REFRESH_TOKEN_DAYS))
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string();

    db_users::store_refresh_token(&state.pool, &token_id, &user.id, &token_hash, &expires_at).await?;

    Ok(AuthResponse {
        user: user.into(),
        access_token,
        refresh_token,
    })
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let email = req.email.trim();
    if req.password.len() < 8 {
        return Err(AppError::BadRequest("Password must be at least 8 characters".to_string()));
    }
    if !email.contains('@') {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    }
    let name = req
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(DEFAULT_NAME);

    if db_users::find_by_email(&state.pool, email).await?.is_some() {
        return Err(AppError::Conflict("Email already exists".to_string()));
    }

    // Hash password with Argon2id
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(req.password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?
        .to_string();

    let user_id = uuid::Uuid::now_v7().to_string();
    let user = db_users::create_user(&state.pool, &user_id, name, email, &password_hash).await?;
    tracing::info!(user_id = %user.id, "user registered");

    Ok(Json(issue_tokens(&state, user).await?))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let user = db_users::find_by_email(&state.pool, req.email.trim())
        .await?
        .ok_or(AppError::Unauthorized("Invalid email or password".to_string()))?;

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|e| AppError::Internal(format!("Password hash parse error: {}", e)))?;

    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .map_err(|_| AppError::Unauthorized("Invalid email or password".to_string()))?;

    Ok(Json(issue_tokens(&state, user).await?))
}

/// Rotates the refresh token: the presented one is deleted and a new pair issued.
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    verify_token(&req.refresh_token, &state.jwt_secret, TokenKind::Refresh)
        .map_err(|_| AppError::Unauthorized("Invalid refresh token".to_string()))?;

    let token_hash = hash_token(&req.refresh_token);
    let (user_id, expires_at) = db_users::find_refresh_token(&state.pool, &token_hash)
        .await?
        .ok_or(AppError::Unauthorized("Refresh token not found or revoked".to_string()))?;

    // Same fixed-width format, so string order is time order.
    if expires_at < db::now_timestamp() {
        db_users::delete_refresh_token(&state.pool, &token_hash).await?;
        return Err(AppError::Unauthorized("Refresh token expired".to_string()));
    }

    let user = db_users::find_by_id(&state.pool, &user_id)
        .await?
        .ok_or(AppError::Unauthorized("User not found".to_string()))?;

    db_users::delete_refresh_token(&state.pool, &token_hash).await?;

    Ok(Json(issue_tokens(&state, user).await?))
}

pub async fn logout(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Value>, AppError> {
    db_users::delete_user_refresh_tokens(&state.pool, &auth_user.user_id).await?;

    Ok(Json(json!({ "message": "Logged out successfully" })))
}

pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<UserResponse>, AppError> {
    let user = db_users::find_by_id(&state.pool, &auth_user.user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(user.into()))
}

/// Settings are merged key by key into the stored object; a `null` value removes the key.
pub async fn update_me(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let user = db_users::find_by_id(&state.pool, &auth_user.user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let name = match req.name.as_deref().map(str::trim) {
        Some("") => return Err(AppError::BadRequest("Name must not be empty".to_string())),
        Some(name) => name,
        None => user.name.as_str(),
    };

    let mut settings = match user.settings {
        Value::Object(map) => map,
        _ => serde_json::Map::new(),
    };
    match req.settings {
        Some(Value::Object(patch)) => {
            for (key, value) in patch {
                if value.is_null() {
                    settings.remove(&key);
                } else {
                    settings.insert(key, value);
                }
            }
        }
        Some(_) => return Err(AppError::BadRequest("Settings must be an object".to_string())),
        None => {}
    }

    let updated = db_users::update_profile(&state.pool, &user.id, name, &Value::Object(settings))
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(updated.into()))
}
