//! # 아이디어(Idea) 라우트 핸들러
//!
//! ## 엔드포인트
//! - `GET    /api/v1/ideas`                → 내 아이디어 목록 (`?q=` 검색)
//! - `GET    /api/v1/ideas/public`         → 공개 피드 (`?q=` 검색)
//! - `POST   /api/v1/ideas`                → 새 아이디어 생성 (빈 본문)
//! - `GET    /api/v1/ideas/{id}`           → 아이디어 조회 (소유자만)
//! - `PATCH  /api/v1/ideas/{id}`           → 제목/본문 저장 (revision 필요)
//! - `DELETE /api/v1/ideas/{id}`           → 영구 삭제
//! - `POST   /api/v1/ideas/{id}/visibility` → 공개 ↔ 비공개 전환
//! - `PUT    /api/v1/ideas/{id}/tags`      → 태그 집합 교체
//! - `GET    /api/v1/share/{id}`           → 공개 아이디어 읽기 전용 조회 (인증 없음)

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use sqlx::SqlitePool;

use crate::{
    db,
    error::AppError,
    middleware::auth::AuthUser,
    models::*,
    services::{editor::SessionRegistry, gemini::TextGenerator, lifecycle},
};

/// 애플리케이션 공유 상태
///
/// 모든 요청 핸들러가 `State(state): State<AppState>`로 접근합니다.
#[derive(Clone)]
pub struct AppState {
    /// SQLite 연결 풀 (내부적으로 Arc로 공유)
    pub pool: SqlitePool,
    /// JWT 토큰 서명용 비밀키
    pub jwt_secret: String,
    /// 생성 API. 테스트에서는 가짜 구현으로 바꿔 끼웁니다.
    pub generator: Arc<dyn TextGenerator>,
    /// 열린 편집 세션들
    pub sessions: SessionRegistry,
}

/// `GET /ideas`: 내 아이디어를 최근 수정순으로 조회합니다.
pub async fn list_ideas(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListIdeasQuery>,
) -> Result<Json<Value>, AppError> {
    let ideas = db::list_ideas_by_owner(&state.pool, &auth.user_id, query.q.as_deref()).await?;
    Ok(Json(json!({ "ideas": ideas })))
}

/// `GET /ideas/public`: 공개 피드
pub async fn list_public_ideas(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListIdeasQuery>,
) -> Result<Json<Value>, AppError> {
    let ideas = db::list_public_ideas(&state.pool, query.q.as_deref()).await?;
    Ok(Json(json!({ "ideas": ideas })))
}

/// `POST /ideas`: 빈 본문의 새 아이디어를 만듭니다. 공개 범위 기본값은 비공개입니다.
pub async fn create_idea(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateIdeaRequest>,
) -> Result<(StatusCode, Json<Idea>), AppError> {
    let visibility = req.visibility.unwrap_or(Visibility::Private);
    let idea = lifecycle::create(&state.pool, &auth.user_id, &req.title, visibility).await?;
    Ok((StatusCode::CREATED, Json(idea)))
}

pub async fn get_idea(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Idea>, AppError> {
    let idea = lifecycle::load_for_owner(&state.pool, &id, &auth.user_id).await?;
    Ok(Json(idea))
}

/// `PATCH /ideas/{id}`: 편집 세션 없이 한 번에 저장합니다.
/// 요청의 `revision`이 현재 값과 다르면 409를 반환합니다.
pub async fn update_idea(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateIdeaRequest>,
) -> Result<Json<Idea>, AppError> {
    let idea = lifecycle::update_idea(&state.pool, &id, &auth.user_id, &req).await?;
    Ok(Json(idea))
}

/// `DELETE /ideas/{id}`: 되돌릴 수 없습니다. 열린 편집 세션도 함께 닫힙니다.
pub async fn delete_idea(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    lifecycle::delete(&state.pool, &state.sessions, &id, &auth.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn toggle_visibility(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Idea>, AppError> {
    let idea = lifecycle::toggle_visibility(&state.pool, &id, &auth.user_id).await?;
    Ok(Json(idea))
}

pub async fn set_tags(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<SetTagsRequest>,
) -> Result<Json<Idea>, AppError> {
    let idea = lifecycle::set_tags(&state.pool, &id, &auth.user_id, &req.tags).await?;
    Ok(Json(idea))
}

/// `GET /share/{id}`: 인증 없이 공개 아이디어를 읽습니다.
pub async fn get_shared_idea(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Idea>, AppError> {
    let idea = lifecycle::load_shared(&state.pool, &id).await?;
    Ok(Json(idea))
}
