//! AppBuilder - ストア・計算バックエンド・時計のワイヤリング
//!
//! # Fail-fast 設計
//! - 協調オブジェクトが欠けている、または設定が使えない場合 `build()` は [`App`] を返さない
//! - 設定ミスは最初の確定時ではなく起動時に検出される

use std::sync::Arc;

use tracing::info;

use crate::domain::SessionId;
use crate::ports::{Clock, ComputeBackend, IdGenerator, SessionStore, SystemClock, UlidGenerator};

use super::config::PayoffConfig;
use super::session::Session;

/// AppBuilder は [`App`] を構築
///
/// # 使用例
/// ```ignore
/// let app = AppBuilder::new()
///     .with_store(FileSessionStore::new("sessions"))
///     .with_backend(LocalComputeBackend::new())
///     .build()?;
/// let mut session = app.new_session().await;
/// ```
pub struct AppBuilder {
    store: Option<Arc<dyn SessionStore>>,
    backend: Option<Arc<dyn ComputeBackend>>,
    clock: Arc<dyn Clock>,
    config: PayoffConfig,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("no session store configured; call with_store()")]
    MissingStore,

    #[error("no compute backend configured; call with_backend()")]
    MissingBackend,

    #[error("compute.timeout_ms must be greater than zero")]
    ZeroTimeout,
}

impl AppBuilder {
    pub fn new() -> Self {
        Self {
            store: None,
            backend: None,
            clock: Arc::new(SystemClock),
            config: PayoffConfig::default(),
        }
    }

    pub fn with_store(self, store: impl SessionStore + 'static) -> Self {
        self.with_shared_store(Arc::new(store))
    }

    pub fn with_shared_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_backend(mut self, backend: impl ComputeBackend + 'static) -> Self {
        self.backend = Some(Arc::new(backend));
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn with_config(mut self, config: PayoffConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<App, BuildError> {
        let store = self.store.ok_or(BuildError::MissingStore)?;
        let backend = self.backend.ok_or(BuildError::MissingBackend)?;
        if self.config.compute.timeout_ms == 0 {
            return Err(BuildError::ZeroTimeout);
        }
        Ok(App {
            store,
            backend,
            ids: Box::new(UlidGenerator::new(self.clock.clone())),
            clock: self.clock,
            config: self.config,
        })
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// App は協調オブジェクトを共有する [`Session`] を払い出す
pub struct App {
    store: Arc<dyn SessionStore>,
    backend: Arc<dyn ComputeBackend>,
    clock: Arc<dyn Clock>,
    ids: Box<dyn IdGenerator>,
    config: PayoffConfig,
}

impl App {
    pub fn config(&self) -> &PayoffConfig {
        &self.config
    }

    /// 新しく生成した id で会話を開始
    pub async fn new_session(&self) -> Session {
        let id = self.ids.generate_session_id();
        info!(session = %id, "starting session");
        self.open_session(id).await
    }

    /// `id` を再開。ストアに使えるものがなければ新規に開始
    pub async fn open_session(&self, id: SessionId) -> Session {
        Session::open(
            id,
            self.store.clone(),
            self.backend.clone(),
            self.clock.clone(),
            self.config.compute.timeout(),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Stage;
    use crate::impls::{InMemorySessionStore, LocalComputeBackend};
    use crate::ports::FixedClock;
    use chrono::{TimeZone, Utc};

    fn app_with(store: &InMemorySessionStore) -> App {
        AppBuilder::new()
            .with_store(store.clone())
            .with_backend(LocalComputeBackend::new())
            .with_clock(FixedClock::new(Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap()))
            .build()
            .unwrap()
    }

    #[test]
    fn test_build_missing_store() {
        let app = AppBuilder::new().with_backend(LocalComputeBackend::new()).build();
        assert!(matches!(app, Err(BuildError::MissingStore)));
    }

    #[test]
    fn test_build_missing_backend() {
        let app = AppBuilder::new().with_store(InMemorySessionStore::new()).build();
        assert!(matches!(app, Err(BuildError::MissingBackend)));
    }

    #[test]
    fn test_build_rejects_zero_timeout() {
        let mut config = PayoffConfig::default();
        config.compute.timeout_ms = 0;
        let app = AppBuilder::new()
            .with_store(InMemorySessionStore::new())
            .with_backend(LocalComputeBackend::new())
            .with_config(config)
            .build();
        assert!(matches!(app, Err(BuildError::ZeroTimeout)));
    }

    #[tokio::test]
    async fn test_new_sessions_get_distinct_ids() {
        let app = app_with(&InMemorySessionStore::new());
        let a = app.new_session().await;
        let b = app.new_session().await;
        assert_ne!(a.id(), b.id());
        assert_eq!(
            a.id().as_ulid().timestamp_ms(),
            Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap().timestamp_millis() as u64
        );
    }

    #[tokio::test]
    async fn test_open_session_resumes_by_id() {
        let store = InMemorySessionStore::new();
        let app = app_with(&store);
        let mut session = app.new_session().await;
        session.send("laplace").await.unwrap();
        let id = session.id();
        drop(session);

        let resumed = app.open_session(id).await;
        assert_eq!(resumed.state().stage, Stage::CollectAlternatives);
    }
}
