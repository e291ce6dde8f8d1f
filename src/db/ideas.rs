//! # 아이디어 데이터베이스 쿼리 모듈
//!
//! `ideas` 테이블에 대한 CRUD 쿼리 함수들입니다.
//!
//! 변경 쿼리는 모두 `WHERE id = ? AND owner_id = ?` 조건을 가지므로
//! 소유자가 아니면 어떤 행도 바뀌지 않습니다. 영향받은 행이 없을 때
//! 그 이유(없음/소유자 불일치/오래된 revision)를 구분하는 일은
//! `services::lifecycle`이 담당합니다.
//!
//! `updated_at`은 `MAX(새 시각, 기존 값)`으로 기록하여
//! 서버 시계가 뒤로 가더라도 줄어들지 않게 합니다.

use crate::error::AppError;
use crate::models::*;
use sqlx::{types::Json, SqlitePool};

const IDEA_COLUMNS: &str =
    "id, owner_id, title, body, tags, visibility, revision, created_at, updated_at";

const SUMMARY_COLUMNS: &str = "id, owner_id, title, tags, visibility, created_at, updated_at";

/// 새 아이디어 행에 들어갈 값
#[derive(Debug)]
pub struct NewIdea<'a> {
    pub id: &'a str,
    pub owner_id: &'a str,
    pub title: &'a str,
    pub body: &'a str,
    pub tags: &'a [String],
    pub visibility: Visibility,
    /// created_at과 updated_at에 같은 값이 들어갑니다.
    pub now: &'a str,
}

pub async fn insert_idea(pool: &SqlitePool, idea: &NewIdea<'_>) -> Result<Idea, AppError> {
    let query = format!(
        r#"
        INSERT INTO ideas (id, owner_id, title, body, tags, visibility, revision, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, 1, ?, ?)
        RETURNING {IDEA_COLUMNS}
        "#
    );

    let created = sqlx::query_as::<_, Idea>(&query)
        .bind(idea.id)
        .bind(idea.owner_id)
        .bind(idea.title)
        .bind(idea.body)
        .bind(Json(idea.tags))
        .bind(idea.visibility)
        .bind(idea.now)
        .bind(idea.now)
        .fetch_one(pool)
        .await?;

    Ok(created)
}

pub async fn get_idea(pool: &SqlitePool, id: &str) -> Result<Option<Idea>, AppError> {
    let query = format!("SELECT {IDEA_COLUMNS} FROM ideas WHERE id = ?");
    let idea = sqlx::query_as::<_, Idea>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(idea)
}

/// LIKE 패턴의 특수문자(%, _, \)를 이스케이프하고 소문자로 감쌉니다.
///
/// SQLite의 `lower()`는 ASCII만 바꾸므로 검색어도 ASCII만 소문자로 바꿉니다.
/// 대소문자 무시 검색은 ASCII 문자에만 적용됩니다.
fn like_pattern(q: &str) -> String {
    let mut escaped = String::with_capacity(q.len() + 2);
    escaped.push('%');
    for c in q.trim().to_ascii_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// 빈 검색어는 필터 없음으로 취급합니다.
fn search_pattern(q: Option<&str>) -> Option<String> {
    q.filter(|q| !q.trim().is_empty()).map(like_pattern)
}

/// 사용자의 아이디어 목록 (최근 수정순). `q`가 있으면 제목 또는 태그로 필터링합니다.
pub async fn list_ideas_by_owner(
    pool: &SqlitePool,
    owner_id: &str,
    q: Option<&str>,
) -> Result<Vec<IdeaSummary>, AppError> {
    let query = format!(
        r#"
        SELECT {SUMMARY_COLUMNS}
        FROM ideas
        WHERE owner_id = ?
          AND (?2 IS NULL OR lower(title) LIKE ?2 ESCAPE '\' OR lower(tags) LIKE ?2 ESCAPE '\')
        ORDER BY updated_at DESC
        "#
    );

    let ideas = sqlx::query_as::<_, IdeaSummary>(&query)
        .bind(owner_id)
        .bind(search_pattern(q))
        .fetch_all(pool)
        .await?;

    Ok(ideas)
}

/// 공개 피드 (최근 수정순)
pub async fn list_public_ideas(
    pool: &SqlitePool,
    q: Option<&str>,
) -> Result<Vec<IdeaSummary>, AppError> {
    let query = format!(
        r#"
        SELECT {SUMMARY_COLUMNS}
        FROM ideas
        WHERE visibility = 'public'
          AND (?1 IS NULL OR lower(title) LIKE ?1 ESCAPE '\' OR lower(tags) LIKE ?1 ESCAPE '\')
        ORDER BY updated_at DESC
        LIMIT 100
        "#
    );

    let ideas = sqlx::query_as::<_, IdeaSummary>(&query)
        .bind(search_pattern(q))
        .fetch_all(pool)
        .await?;

    Ok(ideas)
}

/// 제목과 본문을 저장합니다.
///
/// `expected_revision`과 현재 revision이 같을 때만 쓰기가 일어나고
/// revision이 1 증가합니다. 조건이 맞지 않으면 `Ok(None)`.
pub async fn update_content(
    pool: &SqlitePool,
    id: &str,
    owner_id: &str,
    title: &str,
    body: &str,
    expected_revision: i64,
    now: &str,
) -> Result<Option<Idea>, AppError> {
    let query = format!(
        r#"
        UPDATE ideas
        SET title = ?, body = ?, revision = revision + 1, updated_at = MAX(?, updated_at)
        WHERE id = ? AND owner_id = ? AND revision = ?
        RETURNING {IDEA_COLUMNS}
        "#
    );

    let idea = sqlx::query_as::<_, Idea>(&query)
        .bind(title)
        .bind(body)
        .bind(now)
        .bind(id)
        .bind(owner_id)
        .bind(expected_revision)
        .fetch_optional(pool)
        .await?;

    Ok(idea)
}

/// 공개 범위를 뒤집습니다. 본문 revision은 바뀌지 않습니다.
pub async fn toggle_visibility(
    pool: &SqlitePool,
    id: &str,
    owner_id: &str,
    now: &str,
) -> Result<Option<Idea>, AppError> {
    let query = format!(
        r#"
        UPDATE ideas
        SET visibility = CASE visibility WHEN 'public' THEN 'private' ELSE 'public' END,
            updated_at = MAX(?, updated_at)
        WHERE id = ? AND owner_id = ?
        RETURNING {IDEA_COLUMNS}
        "#
    );

    let idea = sqlx::query_as::<_, Idea>(&query)
        .bind(now)
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;

    Ok(idea)
}

pub async fn set_tags(
    pool: &SqlitePool,
    id: &str,
    owner_id: &str,
    tags: &[String],
    now: &str,
) -> Result<Option<Idea>, AppError> {
    let query = format!(
        r#"
        UPDATE ideas
        SET tags = ?, updated_at = MAX(?, updated_at)
        WHERE id = ? AND owner_id = ?
        RETURNING {IDEA_COLUMNS}
        "#
    );

    let idea = sqlx::query_as::<_, Idea>(&query)
        .bind(Json(tags))
        .bind(now)
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;

    Ok(idea)
}

/// 아이디어를 영구 삭제합니다. 삭제된 행이 있으면 true.
pub async fn delete_idea(pool: &SqlitePool, id: &str, owner_id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM ideas WHERE id = ? AND owner_id = ?")
        .bind(id)
        .bind(owner_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::memory_pool;

    async fn seed(pool: &SqlitePool, id: &str, owner: &str, title: &str, vis: Visibility, now: &str) {
        let tags = vec!["saas".to_string()];
        insert_idea(
            pool,
            &NewIdea {
                id,
                owner_id: owner,
                title,
                body: "",
                tags: &tags,
                visibility: vis,
                now,
            },
        )
        .await
        .unwrap();
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern(" AI "), "%ai%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(search_pattern(Some("   ")), None);
    }

    #[tokio::test]
    async fn search_folds_ascii_case_only_like_sqlite() {
        let pool = memory_pool().await;
        seed(&pool, "i1", "u1", "Éclair Shop", Visibility::Private, "2026-01-01T00:00:00.000Z").await;

        let found = list_ideas_by_owner(&pool, "u1", Some("ÉCLAIR SHOP")).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(like_pattern("ÉCLAIR"), "%Éclair%");
    }

    #[tokio::test]
    async fn update_content_requires_matching_revision() {
        let pool = memory_pool().await;
        seed(&pool, "i1", "u1", "Demo", Visibility::Private, "2026-01-01T00:00:00.000Z").await;

        let stale = update_content(&pool, "i1", "u1", "Demo", "x", 7, "2026-01-01T00:00:01.000Z")
            .await
            .unwrap();
        assert!(stale.is_none());

        let fresh = update_content(&pool, "i1", "u1", "Demo", "x", 1, "2026-01-01T00:00:01.000Z")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fresh.revision, 2);
        assert_eq!(fresh.body, "x");
    }

    #[tokio::test]
    async fn updated_at_never_moves_backwards() {
        let pool = memory_pool().await;
        seed(&pool, "i1", "u1", "Demo", Visibility::Private, "2026-01-01T00:00:05.000Z").await;

        let idea = toggle_visibility(&pool, "i1", "u1", "2026-01-01T00:00:01.000Z")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(idea.updated_at, "2026-01-01T00:00:05.000Z");
        assert!(idea.updated_at >= idea.created_at);
    }

    #[tokio::test]
    async fn mutations_ignore_other_owners() {
        let pool = memory_pool().await;
        seed(&pool, "i1", "u1", "Demo", Visibility::Private, "2026-01-01T00:00:00.000Z").await;

        assert!(toggle_visibility(&pool, "i1", "u2", "2026-01-01T00:00:01.000Z")
            .await
            .unwrap()
            .is_none());
        assert!(!delete_idea(&pool, "i1", "u2").await.unwrap());
        assert!(get_idea(&pool, "i1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn lists_filter_by_owner_visibility_and_query() {
        let pool = memory_pool().await;
        seed(&pool, "i1", "u1", "Solar Drones", Visibility::Public, "2026-01-01T00:00:01.000Z").await;
        seed(&pool, "i2", "u1", "Pet Diary", Visibility::Private, "2026-01-01T00:00:02.000Z").await;
        seed(&pool, "i3", "u2", "Tutor Match", Visibility::Public, "2026-01-01T00:00:03.000Z").await;

        let mine = list_ideas_by_owner(&pool, "u1", None).await.unwrap();
        let ids: Vec<_> = mine.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["i2", "i1"]);

        let filtered = list_ideas_by_owner(&pool, "u1", Some("solar")).await.unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "i1");

        let by_tag = list_ideas_by_owner(&pool, "u1", Some("SAAS")).await.unwrap();
        assert_eq!(by_tag.len(), 2);

        let feed = list_public_ideas(&pool, None).await.unwrap();
        let ids: Vec<_> = feed.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["i3", "i1"]);
    }
}
