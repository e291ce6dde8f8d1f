//! # 편집 세션 모델 정의
//!
//! 에디터가 아이디어 하나를 열어 두고 편집하는 동안의 상태를 나타냅니다.
//!
//! ## 상태 흐름
//! ```text
//! Uninitialized → Loading → Synced ⇄ Dirty → Closed
//!                    └──(불러오기 실패)──────→ Closed
//! ```
//! `Synced`와 `Dirty`는 함께 "Ready" 상태를 이룹니다.

use serde::{Deserialize, Serialize};

use super::Idea;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Uninitialized,
    Loading,
    /// 마지막 저장 내용과 에디터 내용이 같음
    Synced,
    /// 저장되지 않은 편집이 있음
    Dirty,
    Closed,
}

impl SessionState {
    pub fn is_ready(self) -> bool {
        matches!(self, SessionState::Synced | SessionState::Dirty)
    }
}

/// 세션 조회 응답: `GET /api/v1/sessions/{sid}`
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub id: String,
    pub idea_id: String,
    pub state: SessionState,
    /// 마지막으로 저장에 성공한 revision
    pub revision: i64,
    pub last_synced_at: Option<String>,
}

/// 세션 시작 응답: 세션 정보와 불러온 아이디어 전체
#[derive(Debug, Serialize)]
pub struct OpenSessionResponse {
    pub session: SessionView,
    pub idea: Idea,
}

/// 로컬 편집 내용: `PUT /api/v1/sessions/{sid}`
#[derive(Debug, Deserialize)]
pub struct EditRequest {
    pub body: String,
    pub title: String,
}

/// 저장 결과
#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// 마지막 저장 내용과 같아 쓰기를 생략함
    Unchanged,
    /// 저장 완료
    Written { idea: Idea },
}
