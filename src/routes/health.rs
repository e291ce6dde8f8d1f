//! # 헬스체크(Health Check) 핸들러
//!
//! - `GET /api/v1/health` → `{ "status": "ok" }`
//!
//! 데이터베이스에 간단한 쿼리를 보내 저장소까지 응답하는지 확인합니다.
//! 생성 API는 확인하지 않습니다.

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::{error::AppError, routes::ideas::AppState};

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    sqlx::query("SELECT 1").execute(&state.pool).await?;
    Ok(Json(json!({ "status": "ok" })))
}
