//! # 에러 처리 모듈
//!
//! 애플리케이션에서 발생할 수 있는 모든 에러 타입을 정의합니다.
//!
//! 이 모듈의 핵심:
//! - `AppError` 열거형(enum): 모든 에러 종류를 하나의 타입으로 통합
//! - `IntoResponse` 구현: 에러를 HTTP 응답으로 자동 변환
//!
//! 모든 에러는 호출 지점(핸들러)에서 로그를 남기고 일회성 알림(JSON 에러 응답)으로
//! 끝납니다. 재시도하거나 세션을 중단시키지 않습니다.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::services::gemini::GenerationError;

/// 애플리케이션에서 발생할 수 있는 모든 에러 종류
///
/// 핸들러에서 `Result<T, AppError>`를 반환하면,
/// Axum이 자동으로 `IntoResponse`를 호출하여 HTTP 응답으로 변환합니다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 아이디어/사용자/세션이 존재하지 않음 (HTTP 404)
    #[error("Resource not found")]
    NotFound,

    /// 소유자가 아닌 사용자의 접근, 또는 잘못된 자격 증명 (HTTP 401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// 저장소(SQLite) 읽기/쓰기 실패 (HTTP 500)
    /// #[from] 덕분에 sqlx 함수 뒤의 `?`가 자동으로 이 variant로 변환됩니다.
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    /// 생성 API 호출 실패 또는 응답 파싱 실패 (HTTP 502)
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    /// 오래된 revision으로 쓰기를 시도했거나 중복 리소스 (HTTP 409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// 잘못된 요청 (HTTP 400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// 서버 내부 오류 (HTTP 500)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    /// AppError를 HTTP 응답으로 변환합니다.
    ///
    /// 내부 에러(Storage, Internal)는 실제 에러 내용을 로그에만 기록하고,
    /// 클라이언트에는 일반적인 메시지만 반환합니다.
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "not_found", self.to_string()),
            AppError::Unauthorized(ref msg) => {
                (StatusCode::UNAUTHORIZED, "unauthorized", msg.clone())
            }
            AppError::Storage(ref e) => {
                tracing::error!("Storage error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "storage_error",
                    "A storage error occurred".to_string(),
                )
            }
            AppError::Generation(ref e) => {
                tracing::error!("Generation error: {}", e);
                // 파싱 실패와 API 실패를 구분할 수 있도록 code만 나눕니다.
                let code = match e {
                    GenerationError::Malformed(_) => "malformed_response",
                    GenerationError::MissingApiKey => "generation_unavailable",
                    _ => "generation_error",
                };
                (StatusCode::BAD_GATEWAY, code, "Failed to generate a response".to_string())
            }
            AppError::Conflict(ref msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            AppError::BadRequest(ref msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", msg.clone())
            }
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        // 결과: { "error": { "code": "not_found", "message": "Resource not found" } }
        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
