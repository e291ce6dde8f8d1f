//! # 서비스 계층
//!
//! 라우트 핸들러와 DB 쿼리 사이의 로직을 담습니다.
//! - `lifecycle`: 아이디어 생성/불러오기/저장/공개 전환/삭제
//! - `editor`: 편집 세션 상태와 세션 목록
//! - `autosave`: 자동 저장용 debounce 타이머
//! - `gemini`: 생성 API 클라이언트
//! - `prompts`: 생성 API에 보낼 프롬프트
//! - `markup`: 코드 펜스 제거, 제목 추출, 태그 정규화

pub mod autosave;
pub mod editor;
pub mod gemini;
pub mod lifecycle;
pub mod markup;
pub mod prompts;
