//! PayoffConfig - TOML 設定
//!
//! ```toml
//! [session]
//! store_dir = "~/.payoff/sessions"
//!
//! [compute]
//! timeout_ms = 5000
//!
//! [display]
//! decimals = 2
//! ```
//!
//! すべてのセクションとキーは省略可能。

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::domain::decimal::DISPLAY_PLACES;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PayoffConfig {
    pub session: SessionConfig,
    pub compute: ComputeConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// `FileSessionStore` の保存先。`None` なら呼び出し側が決める
    pub store_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ComputeConfig {
    pub timeout_ms: u64,
}

impl Default for ComputeConfig {
    fn default() -> Self {
        Self { timeout_ms: 5_000 }
    }
}

impl ComputeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// スコア表示時の小数桁数
    pub decimals: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            decimals: DISPLAY_PLACES,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

impl PayoffConfig {
    /// `path` から読み込む。ファイルが存在しなければデフォルト値
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file; using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}
