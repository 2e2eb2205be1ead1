//! Ports - 抽象化層
//!
//! ここの trait はそれぞれ collector の外部協調オブジェクトへのインターフェース
//! （ヘキサゴナルアーキテクチャの「ポート」）。アダプタは `impls` が提供する。
//!
//! # 協調オブジェクト
//! - セッションの永続化はセッション ID ごとの不透明な put/get 1 組
//! - 計算境界は decimal 文字列のリクエストを受ける
//! - 時刻と ID 生成はテストのために注入する

pub mod clock;
pub mod compute;
pub mod id_generator;
pub mod session_store;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::compute::ComputeBackend;
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::session_store::{SessionStore, StoreError};
