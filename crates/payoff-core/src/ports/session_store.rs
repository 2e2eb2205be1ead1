//! SessionStore port - 会話 blob のキー・バリュー永続化
//!
//! ストアは中身を知らず、セッション ID ごとに不透明なバイト列を 1 つ持つだけ。
//! デコード（と壊れた blob からの復帰）はセッション側の仕事。

use crate::domain::SessionId;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("session store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("session store operation failed: {0}")]
    OperationFailed(String),
}

/// SessionStore はセッション ID をキーとする put/get
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    /// `id` で何も保存されていなければ `Ok(None)`
    async fn load(&self, id: &SessionId) -> Result<Option<Vec<u8>>, StoreError>;

    /// `id` の blob を置き換える
    async fn save(&self, id: &SessionId, blob: Vec<u8>) -> Result<(), StoreError>;

    /// `id` を忘れる。未知の id の削除はエラーにしない
    async fn remove(&self, id: &SessionId) -> Result<(), StoreError>;
}
