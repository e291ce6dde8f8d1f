//! # 편집 세션 라우트 핸들러
//!
//! ## 엔드포인트
//! - `POST   /api/v1/ideas/{id}/sessions` → 아이디어를 불러와 편집 세션 시작
//! - `GET    /api/v1/sessions/{sid}`      → 세션 상태 조회
//! - `PUT    /api/v1/sessions/{sid}`      → 로컬 편집 기록 (자동 저장 예약)
//! - `POST   /api/v1/sessions/{sid}/save` → 수동 저장
//! - `DELETE /api/v1/sessions/{sid}`      → 세션 종료 (저장되지 않은 편집은 버림)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{error::AppError, middleware::auth::AuthUser, models::*, routes::ideas::AppState};

pub async fn open_session(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(idea_id): Path<String>,
) -> Result<(StatusCode, Json<OpenSessionResponse>), AppError> {
    let opened = state.sessions.open(&idea_id, &auth.user_id).await?;
    Ok((StatusCode::CREATED, Json(opened)))
}

pub async fn get_session(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(session_id): Path<String>,
) -> Result<Json<SessionView>, AppError> {
    Ok(Json(state.sessions.view(&session_id, &auth.user_id).await?))
}

pub async fn edit_session(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(session_id): Path<String>,
    Json(req): Json<EditRequest>,
) -> Result<Json<SessionView>, AppError> {
    Ok(Json(state.sessions.edit(&session_id, &auth.user_id, req).await?))
}

pub async fn save_session(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(session_id): Path<String>,
) -> Result<Json<SyncOutcome>, AppError> {
    Ok(Json(state.sessions.save(&session_id, &auth.user_id).await?))
}

pub async fn close_session(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(session_id): Path<String>,
) -> Result<Json<SessionView>, AppError> {
    Ok(Json(state.sessions.close(&session_id, &auth.user_id).await?))
}
