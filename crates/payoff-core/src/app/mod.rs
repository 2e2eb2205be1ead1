//! App - アプリケーション層
//!
//! collector と ports を組み合わせる。
//!
//! # 構成要素
//! - **AppBuilder / App**: ワイヤリングと起動時検証（Fail-fast）
//! - **Session**: 永続化される 1 つの会話と非同期の計算呼び出し
//! - **PayoffConfig**: TOML 設定
//! - **SessionStatus**: 会話の状態を 1 行で表示

pub mod builder;
pub mod config;
pub mod session;
pub mod status;

pub use self::builder::{App, AppBuilder, BuildError};
pub use self::config::{ConfigError, PayoffConfig};
pub use self::session::{Session, SessionError, SessionSnapshot};
pub use self::status::SessionStatus;
