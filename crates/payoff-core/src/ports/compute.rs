//! ComputeBackend port - 計算境界
//!
//! セッション配下の collector はエンジンを直接呼ばず、バックエンドを経由する。
//! バックエンドはプロセス内でもネットワーク越しでもよい。
//! リクエストとレスポンスは数値を decimal 文字列で運ぶ。

use crate::domain::{ComputeRequest, ComputeResponse, DecisionError};

/// ComputeBackend は計算リクエストに 1 つずつ応答
///
/// `Err` は境界そのものの失敗（`EngineUnavailable`）。
/// エンジン側の失敗は [`ComputeResponse::Error`] の中で返る。
#[async_trait::async_trait]
pub trait ComputeBackend: Send + Sync {
    async fn compute(&self, request: ComputeRequest) -> Result<ComputeResponse, DecisionError>;
}
