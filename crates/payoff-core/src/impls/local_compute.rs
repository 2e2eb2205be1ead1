//! LocalComputeBackend - プロセス内で提供する計算境界
//!
//! 境界のサーバ側と同じく、decimal 文字列を受けて一度だけパースし、
//! エンジンを実行して decimal 文字列を返す。

use crate::domain::{ComputeRequest, ComputeResponse, DecisionError, DecisionProblem};
use crate::engine;
use crate::ports::ComputeBackend;

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalComputeBackend;

impl LocalComputeBackend {
    pub fn new() -> Self {
        Self
    }

    /// リクエストに同期的に応答
    pub fn answer(&self, request: ComputeRequest) -> ComputeResponse {
        let outcome = DecisionProblem::try_from(request).and_then(|problem| engine::compute(&problem));
        ComputeResponse::from(outcome)
    }
}

#[async_trait::async_trait]
impl ComputeBackend for LocalComputeBackend {
    async fn compute(&self, request: ComputeRequest) -> Result<ComputeResponse, DecisionError> {
        Ok(self.answer(request))
    }
}
