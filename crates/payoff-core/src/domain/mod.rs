//! ドメインモデル
//!
//! decimal・基準・問題・結果・ステージ・エラー。ここにあるのはデータと検証だけで、I/O は無い。

pub mod criterion;
pub mod decimal;
pub mod errors;
pub mod ids;
pub mod problem;
pub mod result;
pub mod state;
pub mod wire;

pub use self::criterion::Criterion;
pub use self::decimal::{Decimal, DecimalError};
pub use self::errors::{DecisionError, ErrorKind};
pub use self::ids::SessionId;
pub use self::problem::{DecisionProblem, ProblemDraft, Slot};
pub use self::result::{AlternativeScore, DecisionResult, PerfectInformation};
pub use self::state::{Role, Stage, Turn};
pub use self::wire::{ComputeRequest, ComputeResponse};
