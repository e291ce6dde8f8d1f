use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 새 사용자의 기본 요금제와 AI 토큰 수
pub const DEFAULT_PLAN: &str = "free";
pub const DEFAULT_TOKENS: i64 = 20;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub plan: String,
    pub tokens: i64,
    /// 설정 화면의 임의 JSON 객체 (테마 등)
    #[sqlx(json)]
    pub settings: Value,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub plan: String,
    pub tokens: i64,
    pub settings: Value,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            plan: user.plan,
            tokens: user.tokens,
            settings: user.settings,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// `PATCH /auth/me`: settings는 기존 객체에 얕게(shallow) 병합됩니다.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub settings: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub refresh_token: String,
}
