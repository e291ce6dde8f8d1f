//! # 편집 세션
//!
//! 에디터가 아이디어 하나를 열어 두고 편집하는 동안의 메모리 상태입니다.
//!
//! ## 상태 흐름
//! ```text
//! Uninitialized → Loading → Synced ⇄ Dirty → Closed
//!                    └──(불러오기 실패)──────→ Closed
//! ```
//!
//! - 불러온 직후의 내용이 "마지막 저장 내용"이 되므로, 열자마자 같은 내용을 다시 쓰지 않습니다.
//! - 편집(`edit`)마다 자동 저장 타이머가 다시 시작되고, 입력이 멈추면 한 번 저장합니다.
//! - 세션을 닫으면 저장되지 않은 편집은 버려지며 이후 쓰기는 일어나지 않습니다.
//! - 닫히지 않고 버려진 세션은 유휴 시간이 지나면 주기적인 정리 작업이 닫습니다.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::time::Duration;

use sqlx::SqlitePool;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::config::DEFAULT_SESSION_IDLE_TIMEOUT_SECS;
use crate::error::AppError;
use crate::models::*;
use crate::services::autosave::Debouncer;
use crate::services::lifecycle;

/// 에디터 내용 한 벌 (본문 + 제목)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub body: String,
    pub title: String,
}

impl Snapshot {
    /// 제목은 저장될 때와 같은 형태(앞뒤 공백 제거)로 보관합니다.
    pub fn new(body: &str, title: &str) -> Self {
        Self {
            body: body.to_string(),
            title: title.trim().to_string(),
        }
    }
}

#[derive(Debug)]
pub struct EditSession {
    pub id: String,
    pub idea_id: String,
    pub owner_id: String,
    state: SessionState,
    /// 마지막으로 저장소와 일치했던 내용
    last_synced: Snapshot,
    /// 아직 저장되지 않은 최신 편집
    pending: Option<Snapshot>,
    revision: i64,
    last_synced_at: Option<String>,
}

impl EditSession {
    pub fn new(id: String, idea_id: String, owner_id: String) -> Self {
        Self {
            id,
            idea_id,
            owner_id,
            state: SessionState::Uninitialized,
            last_synced: Snapshot::new("", ""),
            pending: None,
            revision: 0,
            last_synced_at: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn revision(&self) -> i64 {
        self.revision
    }

    pub fn begin_load(&mut self) -> Result<(), AppError> {
        if self.state != SessionState::Uninitialized {
            return Err(AppError::Internal(format!(
                "session {} cannot start loading from {:?}",
                self.id, self.state
            )));
        }
        self.state = SessionState::Loading;
        Ok(())
    }

    pub fn finish_load(&mut self, idea: &Idea) {
        self.last_synced = Snapshot::new(&idea.body, &idea.title);
        self.pending = None;
        self.revision = idea.revision;
        self.last_synced_at = Some(idea.updated_at.clone());
        self.state = SessionState::Synced;
    }

    pub fn fail_load(&mut self) {
        self.state = SessionState::Closed;
    }

    /// 로컬 편집을 기록합니다. 마지막 저장 내용과 같아지면 다시 `Synced`가 됩니다.
    pub fn record_edit(&mut self, snapshot: Snapshot) -> Result<(), AppError> {
        if !self.state.is_ready() {
            return Err(AppError::BadRequest(format!(
                "Session is not editable in state {:?}",
                self.state
            )));
        }

        if snapshot == self.last_synced {
            self.pending = None;
            self.state = SessionState::Synced;
        } else {
            self.pending = Some(snapshot);
            self.state = SessionState::Dirty;
        }
        Ok(())
    }

    pub fn is_synced_with(&self, snapshot: &Snapshot) -> bool {
        *snapshot == self.last_synced
    }

    /// 에디터가 현재 보여주는 내용
    pub fn current(&self) -> Snapshot {
        self.pending
            .clone()
            .unwrap_or_else(|| self.last_synced.clone())
    }

    pub fn mark_synced(&mut self, idea: &Idea) {
        self.last_synced = Snapshot::new(&idea.body, &idea.title);
        self.revision = idea.revision;
        self.last_synced_at = Some(idea.updated_at.clone());

        match &self.pending {
            Some(pending) if *pending != self.last_synced => {
                self.state = SessionState::Dirty;
            }
            _ => {
                self.pending = None;
                self.state = SessionState::Synced;
            }
        }
    }

    /// 세션을 닫고 저장되지 않은 편집을 버립니다.
    pub fn close(&mut self) {
        self.pending = None;
        self.state = SessionState::Closed;
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            id: self.id.clone(),
            idea_id: self.idea_id.clone(),
            state: self.state,
            revision: self.revision,
            last_synced_at: self.last_synced_at.clone(),
        }
    }
}

struct SessionHandle {
    idea_id: String,
    owner_id: String,
    session: Arc<Mutex<EditSession>>,
    // 핸들이 사라지면 자동 저장 태스크도 끝납니다.
    autosave: Debouncer,
    last_touched: StdMutex<Instant>,
}

impl SessionHandle {
    fn touch(&self) {
        *self.last_touched.lock().unwrap_or_else(PoisonError::into_inner) = Instant::now();
    }

    fn idle_for(&self, now: Instant) -> Duration {
        let touched = *self.last_touched.lock().unwrap_or_else(PoisonError::into_inner);
        now.saturating_duration_since(touched)
    }
}

/// 열린 편집 세션 목록. `AppState`에 담겨 요청 간에 공유됩니다.
#[derive(Clone)]
pub struct SessionRegistry {
    pool: SqlitePool,
    autosave_delay: Duration,
    idle_timeout: Duration,
    handles: Arc<RwLock<HashMap<String, Arc<SessionHandle>>>>,
}

impl SessionRegistry {
    pub fn new(pool: SqlitePool, autosave_delay: Duration) -> Self {
        Self {
            pool,
            autosave_delay,
            idle_timeout: Duration::from_secs(DEFAULT_SESSION_IDLE_TIMEOUT_SECS),
            handles: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    /// 아이디어를 불러와 새 편집 세션을 엽니다. 소유자만 열 수 있습니다.
    pub async fn open(&self, idea_id: &str, owner_id: &str) -> Result<OpenSessionResponse, AppError> {
        let session_id = uuid::Uuid::now_v7().to_string();
        let mut session = EditSession::new(session_id.clone(), idea_id.to_string(), owner_id.to_string());

        session.begin_load()?;
        let idea = match lifecycle::load_for_owner(&self.pool, idea_id, owner_id).await {
            Ok(idea) => idea,
            Err(e) => {
                session.fail_load();
                return Err(e);
            }
        };
        session.finish_load(&idea);
        let view = session.view();

        let session = Arc::new(Mutex::new(session));
        let autosave = {
            let pool = self.pool.clone();
            let session = session.clone();
            Debouncer::spawn(self.autosave_delay, move || {
                flush_autosave(pool.clone(), session.clone())
            })
        };

        let handle = SessionHandle {
            idea_id: idea_id.to_string(),
            owner_id: owner_id.to_string(),
            session,
            autosave,
            last_touched: StdMutex::new(Instant::now()),
        };
        self.handles
            .write()
            .await
            .insert(session_id.clone(), Arc::new(handle));

        tracing::debug!(session_id = %session_id, idea_id, "editing session opened");
        Ok(OpenSessionResponse { session: view, idea })
    }

    async fn handle(&self, session_id: &str, owner_id: &str) -> Result<Arc<SessionHandle>, AppError> {
        let handle = self
            .handles
            .read()
            .await
            .get(session_id)
            .cloned()
            .ok_or(AppError::NotFound)?;

        if handle.owner_id != owner_id {
            return Err(AppError::Unauthorized(
                "Session belongs to another user".to_string(),
            ));
        }
        handle.touch();
        Ok(handle)
    }

    pub async fn view(&self, session_id: &str, owner_id: &str) -> Result<SessionView, AppError> {
        let handle = self.handle(session_id, owner_id).await?;
        let session = handle.session.lock().await;
        Ok(session.view())
    }

    /// 로컬 편집을 기록하고 자동 저장 타이머를 다시 시작합니다.
    pub async fn edit(
        &self,
        session_id: &str,
        owner_id: &str,
        edit: EditRequest,
    ) -> Result<SessionView, AppError> {
        let handle = self.handle(session_id, owner_id).await?;
        let mut session = handle.session.lock().await;

        session.record_edit(Snapshot::new(&edit.body, &edit.title))?;
        if session.state() == SessionState::Dirty {
            handle.autosave.trigger();
        }
        Ok(session.view())
    }

    /// 수동 저장: 현재 내용을 바로 저장합니다.
    pub async fn save(&self, session_id: &str, owner_id: &str) -> Result<SyncOutcome, AppError> {
        let handle = self.handle(session_id, owner_id).await?;
        let mut session = handle.session.lock().await;

        let current = session.current();
        lifecycle::sync(&self.pool, &mut session, &current.body, &current.title).await
    }

    pub async fn close(&self, session_id: &str, owner_id: &str) -> Result<SessionView, AppError> {
        self.handle(session_id, owner_id).await?;
        let handle = self
            .handles
            .write()
            .await
            .remove(session_id)
            .ok_or(AppError::NotFound)?;

        let mut session = handle.session.lock().await;
        session.close();
        tracing::debug!(session_id, idea_id = %handle.idea_id, "editing session closed");
        Ok(session.view())
    }

    /// 아이디어에 열린 모든 세션을 닫습니다. 닫은 세션 수를 반환합니다.
    pub async fn close_for_idea(&self, idea_id: &str) -> usize {
        let closed = self.remove_where(|h| h.idea_id == idea_id).await;
        for (_, handle) in &closed {
            handle.session.lock().await.close();
        }
        closed.len()
    }

    /// `idle_timeout` 동안 쓰이지 않은 세션을 닫습니다. 저장되지 않은 편집은 버려집니다.
    pub async fn close_idle(&self) -> usize {
        let now = Instant::now();
        let idle_timeout = self.idle_timeout;
        let expired = self.remove_where(|h| h.idle_for(now) >= idle_timeout).await;

        for (session_id, handle) in &expired {
            handle.session.lock().await.close();
            tracing::debug!(session_id = %session_id, idea_id = %handle.idea_id, "idle editing session closed");
        }
        expired.len()
    }

    /// `every`마다 유휴 세션을 정리하는 백그라운드 태스크를 띄웁니다.
    pub fn spawn_idle_sweeper(&self, every: Duration) -> JoinHandle<()> {
        let registry = self.clone();
        tokio::spawn(async move {
            tracing::info!(
                "Starting idle session sweeper with interval {:?}, idle timeout {:?}",
                every,
                registry.idle_timeout
            );
            let mut interval = tokio::time::interval(every);
            loop {
                interval.tick().await;
                let closed = registry.close_idle().await;
                if closed > 0 {
                    tracing::info!(closed, "closed idle editing sessions");
                }
            }
        })
    }

    async fn remove_where<F>(&self, matches: F) -> Vec<(String, Arc<SessionHandle>)>
    where
        F: Fn(&SessionHandle) -> bool,
    {
        let mut handles = self.handles.write().await;
        let ids: Vec<String> = handles
            .iter()
            .filter(|(_, h)| matches(h))
            .map(|(id, _)| id.clone())
            .collect();
        ids.into_iter()
            .filter_map(|id| handles.remove(&id).map(|h| (id, h)))
            .collect()
    }
}

/// 자동 저장 한 번. 실패는 로그만 남기고 세션은 `Dirty`로 남습니다.
async fn flush_autosave(pool: SqlitePool, session: Arc<Mutex<EditSession>>) {
    let mut session = session.lock().await;
    if session.state() != SessionState::Dirty {
        return;
    }

    let current = session.current();
    match lifecycle::sync(&pool, &mut session, &current.body, &current.title).await {
        Ok(SyncOutcome::Written { idea }) => {
            tracing::debug!(idea_id = %idea.id, revision = idea.revision, "autosaved");
        }
        Ok(SyncOutcome::Unchanged) => {}
        Err(e) => {
            tracing::warn!(idea_id = %session.idea_id, session_id = %session.id, error = %e, "autosave failed");
        }
    }
}
