//! FileSessionStore - ディレクトリ配下にセッションごとの JSON ファイル
//!
//! 書き込みは一時ファイルに出してから rename するので、
//! 途中でクラッシュしても残るのは古い blob か新しい blob のどちらか。

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::SessionId;
use crate::ports::{SessionStore, StoreError};

#[derive(Debug, Clone)]
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    /// ディレクトリは最初の保存時に作成する
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &SessionId) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }
}

#[async_trait::async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self, id: &SessionId) -> Result<Option<Vec<u8>>, StoreError> {
        match tokio::fs::read(self.path_for(id)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn save(&self, id: &SessionId, blob: Vec<u8>) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(id);
        let staging = path.with_extension("json.tmp");
        tokio::fs::write(&staging, &blob).await?;
        tokio::fs::rename(&staging, &path).await?;
        debug!(path = %path.display(), bytes = blob.len(), "session saved");
        Ok(())
    }

    async fn remove(&self, id: &SessionId) -> Result<(), StoreError> {
        match tokio::fs::remove_file(self.path_for(id)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
