//! Impls - ports のアダプタ
//!
//! # 含まれるもの
//! - **InMemorySessionStore**: テストや使い捨てのセッション用
//! - **FileSessionStore**: セッションごとに JSON ファイル 1 つ（CLI のデフォルト）
//! - **LocalComputeBackend**: プロセス内で提供する計算境界

pub mod file_store;
pub mod inmem_store;
pub mod local_compute;

pub use self::file_store::FileSessionStore;
pub use self::inmem_store::InMemorySessionStore;
pub use self::local_compute::LocalComputeBackend;
