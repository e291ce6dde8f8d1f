//! # 데이터 모델 모듈
//!
//! 애플리케이션에서 사용하는 데이터 구조체(struct)들을 정의합니다.
//! - `idea`: 아이디어 문서와 요청 본문
//! - `session`: 편집 세션 상태와 응답
//! - `user`: 사용자 프로필과 인증 요청/응답
//! - `generation`: 생성 API 응답의 엄격한 스키마 (평가, 시장 조사, 브랜드 키트)

pub mod generation;
pub mod idea;
pub mod session;
pub mod user;

pub use generation::*;
pub use idea::*;
pub use session::*;
