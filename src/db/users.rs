use crate::error::AppError;
use crate::models::user::{User, DEFAULT_PLAN, DEFAULT_TOKENS};
use serde_json::Value;
use sqlx::{types::Json, SqlitePool};

const USER_COLUMNS: &str =
    "id, name, email, password_hash, plan, tokens, settings, created_at, updated_at";

pub async fn create_user(
    pool: &SqlitePool,
    id: &str,
    name: &str,
    email: &str,
    password_hash: &str,
) -> Result<User, AppError> {
    sqlx::query(
        r#"
        INSERT INTO users (id, name, email, password_hash, plan, tokens)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .bind(DEFAULT_PLAN)
    .bind(DEFAULT_TOKENS)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created user".to_string()))
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<User>, AppError> {
    let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
    let user = sqlx::query_as::<_, User>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

/// 이메일은 대소문자를 구분하지 않고 비교합니다.
pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>, AppError> {
    let query = format!("SELECT {USER_COLUMNS} FROM users WHERE lower(email) = lower(?)");
    let user = sqlx::query_as::<_, User>(&query)
        .bind(email)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

/// 이름과 설정을 갱신합니다. `settings`는 호출 측에서 병합을 마친 전체 객체입니다.
pub async fn update_profile(
    pool: &SqlitePool,
    id: &str,
    name: &str,
    settings: &Value,
) -> Result<Option<User>, AppError> {
    let query = format!(
        r#"
        UPDATE users
        SET name = ?, settings = ?, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ?
        RETURNING {USER_COLUMNS}
        "#
    );
    let user = sqlx::query_as::<_, User>(&query)
        .bind(name)
        .bind(Json(settings))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

pub async fn store_refresh_token(
    pool: &SqlitePool,
    id: &str,
    user_id: &str,
    token_hash: &str,
    expires_at: &str,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO refresh_tokens (id, user_id, token_hash, expires_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(token_hash)
    .bind(expires_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// 해시로 리프레시 토큰을 찾습니다. `(user_id, expires_at)`를 반환합니다.
pub async fn find_refresh_token(
    pool: &SqlitePool,
    token_hash: &str,
) -> Result<Option<(String, String)>, AppError> {
    let row = sqlx::query_as::<_, (String, String)>(
        "SELECT user_id, expires_at FROM refresh_tokens WHERE token_hash = ?",
    )
    .bind(token_hash)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn delete_refresh_token(pool: &SqlitePool, token_hash: &str) -> Result<(), AppError> {
    sqlx::query("DELETE FROM refresh_tokens WHERE token_hash = ?")
        .bind(token_hash)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn delete_user_refresh_tokens(pool: &SqlitePool, user_id: &str) -> Result<(), AppError> {
    sqlx::query("DELETE FROM refresh_tokens WHERE user_id = ?")
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(())
}
