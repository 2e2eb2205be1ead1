//! Session - 1 つの会話を協調オブジェクトに対して駆動する
//!
//! collector は純粋な値の状態機械で、副作用は `Session` が適用する:
//! - 遷移のたびに [`SessionSnapshot`] を永続化
//! - COMPUTE をタイムアウト付きで [`ComputeBackend`] に投げる
//! - 呼び出し中は `watch` チャネルで busy フラグを公開
//!
//! 永続化の失敗はログに残し、会話はメモリ上で続行する。

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::collector::{self, Busy, ConversationState};
use crate::domain::{ComputeRequest, DecisionError, DecisionResult, SessionId};
use crate::ports::{Clock, ComputeBackend, SessionStore, StoreError};

use super::status::SessionStatus;

/// 永続化レイアウトに互換性のない変更を入れたら上げる
pub const SNAPSHOT_VERSION: u32 = 1;

/// セッションがストアに書き込む blob
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub state: ConversationState,
}

impl SessionSnapshot {
    /// 保存済み blob をデコード
    ///
    /// 読めないものは `None`。バージョン違いのスナップショットや、
    /// [`ConversationState::validate`] に通らない会話も含む。
    pub fn decode(blob: &[u8]) -> Option<Self> {
        match serde_json::from_slice::<Self>(blob) {
            Ok(snapshot) if snapshot.version != SNAPSHOT_VERSION => {
                warn!(version = snapshot.version, "unsupported snapshot version");
                None
            }
            Ok(snapshot) => match snapshot.state.validate() {
                Ok(()) => Some(snapshot),
                Err(err) => {
                    warn!(error = %err, "inconsistent session blob");
                    None
                }
            },
            Err(err) => {
                warn!(error = %err, "corrupt session blob");
                None
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Busy(#[from] Busy),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("failed to encode session: {0}")]
    Encode(#[from] serde_json::Error),
}

pub struct Session {
    id: SessionId,
    state: ConversationState,
    store: Arc<dyn SessionStore>,
    backend: Arc<dyn ComputeBackend>,
    clock: Arc<dyn Clock>,
    timeout: Duration,
    busy: watch::Sender<bool>,
}

impl Session {
    /// ストアから `id` を復元、なければ新規に開始
    ///
    /// blob が無い・壊れている・読めない場合は「以前の状態なし」として扱う。
    /// 計算途中で保存された会話は CONFIRM に巻き戻す。
    pub async fn open(
        id: SessionId,
        store: Arc<dyn SessionStore>,
        backend: Arc<dyn ComputeBackend>,
        clock: Arc<dyn Clock>,
        timeout: Duration,
    ) -> Self {
        let state = match store.load(&id).await {
            Ok(Some(blob)) => match SessionSnapshot::decode(&blob) {
                Some(snapshot) => {
                    info!(session = %id, stage = ?snapshot.state.stage, "session restored");
                    snapshot.state.recovered()
                }
                None => ConversationState::new(),
            },
            Ok(None) => {
                info!(session = %id, "new session");
                ConversationState::new()
            }
            Err(err) => {
                warn!(session = %id, error = %err, "session load failed; starting fresh");
                ConversationState::new()
            }
        };
        let (busy, _) = watch::channel(false);
        Self {
            id,
            state,
            store,
            backend,
            clock,
            timeout,
            busy,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    /// busy フラグを購読。計算呼び出しが未完了の間だけ `true`
    pub fn busy(&self) -> watch::Receiver<bool> {
        self.busy.subscribe()
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus::of(&self.state, *self.busy.borrow())
    }

    /// ユーザーのターンを 1 つ適用し、確定なら計算して永続化
    pub async fn send(&mut self, input: &str) -> Result<&ConversationState, SessionError> {
        let next = collector::accept(&self.state, input)?;
        self.commit(next).await;

        if self.state.is_busy() {
            self.busy.send_replace(true);
            let outcome = self.run_compute().await;
            self.busy.send_replace(false);
            let next = collector::resolve(&self.state, outcome);
            self.commit(next).await;
        }
        Ok(&self.state)
    }

    /// 現在の状態をストアに書き込む
    pub async fn persist(&self) -> Result<(), SessionError> {
        let snapshot = SessionSnapshot {
            version: SNAPSHOT_VERSION,
            saved_at: self.clock.now(),
            state: self.state.clone(),
        };
        let blob = serde_json::to_vec(&snapshot)?;
        self.store.save(&self.id, blob).await?;
        Ok(())
    }

    /// ストアからセッションを削除
    pub async fn discard(self) -> Result<(), SessionError> {
        self.store.remove(&self.id).await?;
        info!(session = %self.id, "session discarded");
        Ok(())
    }

    async fn commit(&mut self, next: ConversationState) {
        self.state = next;
        if let Err(err) = self.persist().await {
            warn!(session = %self.id, error = %err, "failed to persist session");
        }
    }

    async fn run_compute(&self) -> Result<DecisionResult, DecisionError> {
        let problem = self.state.pending_problem()?;
        let request = ComputeRequest::from(&problem);
        debug!(session = %self.id, criterion = %problem.criterion, "compute requested");

        match tokio::time::timeout(self.timeout, self.backend.compute(request)).await {
            Ok(Ok(response)) => response.into_result(),
            Ok(Err(err)) => Err(err),
            Err(_) => Err(DecisionError::unavailable(format!(
                "no answer within {} ms",
                self.timeout.as_millis()
            ))),
        }
    }
}
