//! InMemorySessionStore - 開発・テスト用のセッションストア

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::SessionId;
use crate::ports::{SessionStore, StoreError};

/// InMemorySessionStore は mutex 越しの `HashMap` に blob を保持
///
/// clone すると中身の map を共有するので、テストは手元のハンドルで
/// セッションが書いた内容を確認できる。
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    blobs: Arc<Mutex<HashMap<SessionId, Vec<u8>>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.blobs.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.blobs.lock().await.is_empty()
    }
}

#[async_trait::async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self, id: &SessionId) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.blobs.lock().await.get(id).cloned())
    }

    async fn save(&self, id: &SessionId, blob: Vec<u8>) -> Result<(), StoreError> {
        self.blobs.lock().await.insert(*id, blob);
        Ok(())
    }

    async fn remove(&self, id: &SessionId) -> Result<(), StoreError> {
        self.blobs.lock().await.remove(id);
        Ok(())
    }
}
