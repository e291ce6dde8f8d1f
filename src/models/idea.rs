//! # 아이디어 모델 정의
//!
//! `ideas` 테이블 한 행과 아이디어 관련 요청 본문들을 정의합니다.
//!
//! ## 필드 규칙
//! - `id`, `owner_id`, `created_at`: 생성 후 변경되지 않음
//! - `revision`: 제목/본문이 저장될 때마다 1씩 증가하는 낙관적 동시성 토큰
//! - `updated_at`: 모든 변경 시 갱신되며 항상 `created_at` 이상

use serde::{Deserialize, Serialize};

/// 공개 범위. DB에는 소문자 문자열("public", "private")로 저장됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
}

impl Visibility {
    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
        }
    }
}

/// 아이디어 엔티티: DB의 `ideas` 테이블 한 행에 대응합니다.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Idea {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    /// 리치 텍스트 에디터의 HTML 마크업
    pub body: String,
    /// JSON 배열 문자열로 저장된 태그 집합 (정렬, 중복 제거 상태)
    #[sqlx(json)]
    pub tags: Vec<String>,
    pub visibility: Visibility,
    pub revision: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// 목록 화면용 요약: 본문(body)은 크기가 크므로 제외합니다.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct IdeaSummary {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    #[sqlx(json)]
    pub tags: Vec<String>,
    pub visibility: Visibility,
    pub created_at: String,
    pub updated_at: String,
}

/// `POST /api/v1/ideas`
#[derive(Debug, Deserialize)]
pub struct CreateIdeaRequest {
    pub title: String,
    pub visibility: Option<Visibility>,
}

/// `PATCH /api/v1/ideas/{id}`: 편집 세션 없이 한 번에 저장할 때 사용합니다.
///
/// `revision`은 클라이언트가 마지막으로 본 값입니다.
/// 그 사이 다른 쓰기가 있었다면 409 Conflict가 반환됩니다.
#[derive(Debug, Deserialize)]
pub struct UpdateIdeaRequest {
    pub title: Option<String>,
    pub body: Option<String>,
    pub revision: i64,
}

/// `PUT /api/v1/ideas/{id}/tags`
#[derive(Debug, Deserialize)]
pub struct SetTagsRequest {
    pub tags: Vec<String>,
}

/// 목록 조회 쿼리 (`?q=키워드`)
#[derive(Debug, Default, Deserialize)]
pub struct ListIdeasQuery {
    pub q: Option<String>,
}
