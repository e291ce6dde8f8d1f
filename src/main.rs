//! # ThinkFuel 웹 서버 진입점
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. SQLite 데이터베이스 연결 풀 생성
//! 4. 데이터베이스 마이그레이션 실행
//! 5. 생성 API 클라이언트와 편집 세션 목록 준비 (유휴 세션 정리 작업 시작)
//! 6. API 라우터 설정
//! 7. HTTP 서버 시작

// ── 모듈 선언 ──
mod config;
mod db;
mod error;
mod middleware;
mod models;
mod routes;
mod services;

#[cfg(test)]
mod test_support;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::Router;
use config::Config;
use routes::ideas::AppState;
use services::{editor::SessionRegistry, gemini::GeminiClient};
use sqlx::sqlite::SqlitePoolOptions;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1단계: 환경변수 로딩 ──
    // .env 파일이 없어도 시스템 환경변수만으로 동작합니다.
    dotenvy::dotenv().ok();

    // ── 2단계: 로깅(tracing) 초기화 ──
    // RUST_LOG가 없으면 thinkfuel, tower_http, axum 모듈을 debug 레벨로 출력합니다.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "thinkfuel=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // ── 3단계: 설정 로딩 ──
    let config = Config::from_env()?;
    tracing::info!("Starting ThinkFuel server on {}:{}", config.host, config.port);
    if config.gemini_api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY is not set; AI routes will fail with generation_unavailable");
    }

    // ── 4단계: SQLite 연결 풀 생성 ──
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;

    // ── 5단계: 데이터베이스 마이그레이션 실행 ──
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;

    // ── 6단계: 애플리케이션 상태(State) 생성 ──
    // 생성 클라이언트는 트레이트 객체로 담아 테스트에서 가짜 구현으로 바꿀 수 있게 합니다.
    let generator = GeminiClient::new(config.gemini_api_key.clone(), config.gemini_model.clone())?;
    let state = AppState {
        pool: pool.clone(),
        jwt_secret: config.jwt_secret.clone(),
        generator: Arc::new(generator),
        sessions: SessionRegistry::new(pool.clone(), config.autosave_delay)
            .with_idle_timeout(config.session_idle_timeout),
    };

    // 닫히지 않고 버려진 편집 세션을 1분마다 정리합니다.
    let _sweeper = state.sessions.spawn_idle_sweeper(Duration::from_secs(60));

    // ── 7단계: 라우터 + 미들웨어 ──
    // 개발 편의를 위해 CORS는 모두 허용합니다. 프로덕션에서는 출처를 제한해야 합니다.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .nest("/api/v1", routes::api_router(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // ── 8단계: 서버 시작 ──
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
