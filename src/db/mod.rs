//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 데이터베이스와 직접 상호작용하는 함수들을 모아둔 모듈입니다.
//! - `ideas`: 아이디어 CRUD와 목록/검색 쿼리
//! - `users`: 사용자와 리프레시 토큰 쿼리

pub mod ideas;
pub mod users;

pub use ideas::*;

use chrono::Utc;

/// 저장용 타임스탬프 (UTC, 밀리초 정밀도: "2026-02-16T12:00:00.000Z")
///
/// 고정 폭 형식이므로 문자열 비교가 시간 비교와 같습니다.
pub fn now_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}
