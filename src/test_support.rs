//! 테스트 공용 도우미: 메모리 DB, 가짜 생성기, 테스트용 AppState

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

use crate::middleware::auth::{create_token, TokenKind};
use crate::routes::ideas::AppState;
use crate::services::editor::SessionRegistry;
use crate::services::gemini::{GenerationError, TextGenerator};

pub const TEST_JWT_SECRET: &str = "test-secret";

/// 마이그레이션이 적용된 메모리 SQLite. 연결이 닫히면 DB도 사라지므로
/// 연결 하나를 끝까지 유지합니다.
pub async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("open in-memory sqlite");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("run migrations");
    pool
}

/// 미리 넣어 둔 응답을 순서대로 돌려주고, 받은 프롬프트를 기록합니다.
#[derive(Default)]
pub struct FakeGenerator {
    responses: Mutex<VecDeque<Result<String, GenerationError>>>,
    prompts: Mutex<Vec<String>>,
}

impl FakeGenerator {
    pub fn with_responses<I>(responses: I) -> Arc<Self>
    where
        I: IntoIterator<Item = Result<String, GenerationError>>,
    {
        Arc::new(Self {
            responses: Mutex::new(responses.into_iter().collect()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(GenerationError::EmptyResponse))
    }
}

pub async fn test_state(generator: Arc<FakeGenerator>) -> AppState {
    let pool = memory_pool().await;
    AppState {
        sessions: SessionRegistry::new(pool.clone(), Duration::from_millis(40)),
        pool,
        jwt_secret: TEST_JWT_SECRET.to_string(),
        generator,
    }
}

pub fn bearer(user_id: &str) -> String {
    let token = create_token(user_id, TEST_JWT_SECRET, TokenKind::Access).unwrap();
    format!("Bearer {token}")
}
