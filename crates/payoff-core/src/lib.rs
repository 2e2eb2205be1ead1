//! payoff-core
//!
//! 不確実性下の意思決定分析。対話型コレクタがペイオフ行列の問題を
//! ターンごとに集め、純粋なエンジンが 7 つの基準のいずれかで厳密な decimal 演算により解く。
//!
//! # モジュール構成
//! - **domain**: 値型（decimal 演算、基準、問題、結果、会話ステージ、ID、ワイヤ DTO）
//! - **engine**: 意思決定計算エンジン
//! - **collector**: 対話型の状態機械
//! - **ports**: 抽象化層（SessionStore, ComputeBackend, Clock, IdGenerator）
//! - **impls**: インメモリ・ファイルのストア、プロセス内計算バックエンド
//! - **app**: ビルダー、セッション駆動、設定、ステータス

pub mod app;
pub mod collector;
pub mod domain;
pub mod engine;
pub mod impls;
pub mod ports;

pub use self::collector::{ConversationState, accept, resolve, transition};
pub use self::domain::{Criterion, DecisionError, DecisionProblem, DecisionResult, Stage};
pub use self::engine::compute;
