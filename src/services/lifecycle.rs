//! # 아이디어 라이프사이클 컨트롤러
//!
//! 아이디어의 생성, 불러오기, 저장(sync), 공개 범위 전환, 태그 설정, 삭제를 담당합니다.
//! 모든 함수는 요청한 사용자 ID를 명시적으로 받습니다.
//!
//! ## 에러 규칙
//! - 아이디어가 없음 → `AppError::NotFound`
//! - 소유자가 아님 → `AppError::Unauthorized`
//! - 다른 쓰기가 먼저 일어나 revision이 맞지 않음 → `AppError::Conflict`
//!
//! 실패는 호출한 쪽으로 보고만 하고 재시도하지 않습니다.

use sqlx::SqlitePool;

use crate::db::{self, NewIdea};
use crate::error::AppError;
use crate::models::*;
use crate::services::editor::{EditSession, SessionRegistry, Snapshot};
use crate::services::markup::normalize_tags;

fn new_id() -> String {
    uuid::Uuid::now_v7().to_string()
}

fn clean_title(title: &str) -> Result<&str, AppError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::BadRequest("Title must not be empty".to_string()));
    }
    Ok(title)
}

/// 빈 본문으로 새 아이디어를 만듭니다. `created_at == updated_at`.
pub async fn create(
    pool: &SqlitePool,
    owner_id: &str,
    title: &str,
    visibility: Visibility,
) -> Result<Idea, AppError> {
    create_with_body(pool, owner_id, title, "", visibility, &[]).await
}

/// 본문과 태그가 있는 아이디어를 만듭니다. (생성기 "저장" 흐름)
pub async fn create_with_body(
    pool: &SqlitePool,
    owner_id: &str,
    title: &str,
    body: &str,
    visibility: Visibility,
    tags: &[String],
) -> Result<Idea, AppError> {
    let id = new_id();
    let now = db::now_timestamp();
    let tags = normalize_tags(tags);

    let idea = db::insert_idea(
        pool,
        &NewIdea {
            id: &id,
            owner_id,
            title: clean_title(title)?,
            body,
            tags: &tags,
            visibility,
            now: &now,
        },
    )
    .await
    .inspect_err(|e| tracing::error!(owner_id, error = %e, "failed to create idea"))?;

    tracing::info!(idea_id = %idea.id, owner_id, "idea created");
    Ok(idea)
}

/// 편집 경로: 소유자만 불러올 수 있습니다.
pub async fn load_for_owner(
    pool: &SqlitePool,
    id: &str,
    user_id: &str,
) -> Result<Idea, AppError> {
    let idea = db::get_idea(pool, id).await?.ok_or(AppError::NotFound)?;
    if idea.owner_id != user_id {
        return Err(AppError::Unauthorized(
            "Only the owner can open this idea".to_string(),
        ));
    }
    Ok(idea)
}

/// 공유(읽기 전용) 경로: 공개 아이디어만 보이며 소유자 확인은 없습니다.
///
/// 비공개 아이디어는 존재 여부를 드러내지 않도록 `NotFound`로 응답합니다.
pub async fn load_shared(pool: &SqlitePool, id: &str) -> Result<Idea, AppError> {
    db::get_idea(pool, id)
        .await?
        .filter(|idea| idea.visibility == Visibility::Public)
        .ok_or(AppError::NotFound)
}

/// 소유자이거나 공개된 아이디어라면 읽을 수 있습니다. (AI 기능에서 사용)
pub async fn load_readable(
    pool: &SqlitePool,
    id: &str,
    user_id: &str,
) -> Result<Idea, AppError> {
    let idea = db::get_idea(pool, id).await?.ok_or(AppError::NotFound)?;
    if idea.owner_id != user_id && idea.visibility != Visibility::Public {
        return Err(AppError::Unauthorized("This idea is private".to_string()));
    }
    Ok(idea)
}

/// 조건부 쓰기가 아무 행도 바꾸지 못했을 때 그 이유를 찾습니다.
async fn explain_missed_write(pool: &SqlitePool, id: &str, owner_id: &str) -> AppError {
    match db::get_idea(pool, id).await {
        Ok(None) => AppError::NotFound,
        Ok(Some(idea)) if idea.owner_id != owner_id => {
            AppError::Unauthorized("Only the owner can modify this idea".to_string())
        }
        Ok(Some(idea)) => AppError::Conflict(format!(
            "Idea was modified elsewhere (current revision {})",
            idea.revision
        )),
        Err(e) => e,
    }
}

/// 편집 세션의 내용을 저장합니다.
///
/// 제목은 앞뒤 공백을 뺀 형태로 비교합니다.
/// `(body, title)`이 마지막으로 저장된 값과 같으면 쓰기 없이 `Unchanged`를 반환합니다.
/// 다르면 세션이 알고 있는 revision을 조건으로 저장하고, 성공하면 세션의
/// 마지막 저장 내용을 갱신합니다. revision이 맞지 않으면 `Conflict`이며
/// 세션은 `Dirty`로 남습니다. 에디터 상태는 되돌리지 않습니다.
pub async fn sync(
    pool: &SqlitePool,
    session: &mut EditSession,
    body: &str,
    title: &str,
) -> Result<SyncOutcome, AppError> {
    let snapshot = Snapshot::new(body, title);
    session.record_edit(snapshot.clone())?;

    if session.is_synced_with(&snapshot) {
        return Ok(SyncOutcome::Unchanged);
    }

    let now = db::now_timestamp();
    let written = db::update_content(
        pool,
        &session.idea_id,
        &session.owner_id,
        clean_title(&snapshot.title)?,
        body,
        session.revision(),
        &now,
    )
    .await?;

    match written {
        Some(idea) => {
            session.mark_synced(&idea);
            tracing::debug!(idea_id = %idea.id, revision = idea.revision, "idea synced");
            Ok(SyncOutcome::Written { idea })
        }
        None => {
            let err = explain_missed_write(pool, &session.idea_id, &session.owner_id).await;
            tracing::warn!(idea_id = %session.idea_id, error = %err, "sync rejected");
            Err(err)
        }
    }
}

/// 편집 세션 없이 제목/본문을 한 번에 저장합니다. (`PATCH /ideas/{id}`)
pub async fn update_idea(
    pool: &SqlitePool,
    id: &str,
    owner_id: &str,
    req: &UpdateIdeaRequest,
) -> Result<Idea, AppError> {
    let current = load_for_owner(pool, id, owner_id).await?;
    let title = match req.title.as_deref() {
        Some(title) => clean_title(title)?,
        None => current.title.as_str(),
    };
    let body = req.body.as_deref().unwrap_or(&current.body);

    if title == current.title && body == current.body {
        return Ok(current);
    }

    let now = db::now_timestamp();
    match db::update_content(pool, id, owner_id, title, body, req.revision, &now).await? {
        Some(idea) => Ok(idea),
        None => Err(explain_missed_write(pool, id, owner_id).await),
    }
}

/// 공개 ↔ 비공개를 뒤집고 `updated_at`을 갱신합니다. 본문 저장과는 독립적입니다.
pub async fn toggle_visibility(
    pool: &SqlitePool,
    id: &str,
    owner_id: &str,
) -> Result<Idea, AppError> {
    let now = db::now_timestamp();
    let toggled = match db::toggle_visibility(pool, id, owner_id, &now).await? {
        Some(idea) => Ok(idea),
        None => Err(explain_missed_write(pool, id, owner_id).await),
    };

    match &toggled {
        Ok(idea) => tracing::info!(idea_id = %id, visibility = idea.visibility.as_str(), "visibility toggled"),
        Err(e) => tracing::warn!(idea_id = %id, error = %e, "visibility toggle failed"),
    }
    toggled
}

pub async fn set_tags(
    pool: &SqlitePool,
    id: &str,
    owner_id: &str,
    tags: &[String],
) -> Result<Idea, AppError> {
    let tags = normalize_tags(tags);
    let now = db::now_timestamp();
    match db::set_tags(pool, id, owner_id, &tags, &now).await? {
        Some(idea) => Ok(idea),
        None => Err(explain_missed_write(pool, id, owner_id).await),
    }
}

/// 아이디어를 영구 삭제합니다.
///
/// 열려 있는 편집 세션을 먼저 닫으므로 삭제 이후에는 자동 저장이 일어나지 않습니다.
pub async fn delete(
    pool: &SqlitePool,
    sessions: &SessionRegistry,
    id: &str,
    owner_id: &str,
) -> Result<(), AppError> {
    load_for_owner(pool, id, owner_id).await?;

    let closed = sessions.close_for_idea(id).await;
    if closed > 0 {
        tracing::debug!(idea_id = %id, closed, "closed editing sessions before delete");
    }

    if !db::delete_idea(pool, id, owner_id).await? {
        return Err(AppError::NotFound);
    }
    tracing::info!(idea_id = %id, "idea deleted");
    Ok(())
}

/// AI 기능에 넘길 아이디어 내용을 결정합니다.
///
/// `idea_id`가 있으면 읽기 권한을 확인한 뒤 본문을, 없으면 `content`를 사용합니다.
pub async fn resolve_idea_content(
    pool: &SqlitePool,
    user_id: &str,
    source: &IdeaSourceRequest,
) -> Result<String, AppError> {
    if let Some(id) = source.idea_id.as_deref() {
        let idea = load_readable(pool, id, user_id).await?;
        if idea.body.trim().is_empty() {
            return Err(AppError::BadRequest("Idea has no content yet".to_string()));
        }
        return Ok(idea.body);
    }

    source
        .content
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AppError::BadRequest("Either idea_id or content is required".to_string()))
}
