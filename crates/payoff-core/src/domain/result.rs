//! エンジンの出力
//!
//! 数値はすべて厳密な decimal 文字列で、計算境界の通過や永続化で精度を失わない。

use serde::{Deserialize, Serialize};

use super::criterion::Criterion;

/// 選んだ基準における代替案 1 つのスコア
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlternativeScore {
    pub alternative: String,
    pub score: String,
}

/// EVPI 計算の中間値
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerfectInformation {
    /// 完全情報下の期待値
    pub evwpi: String,
    /// 完全情報なしの最良 EMV
    pub best_emv: String,
}

/// 解かれた意思決定問題
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionResult {
    pub criterion: Criterion,
    /// EVPI では EMV 最適の代替案
    pub recommended_alternative: String,
    pub best_value: String,
    /// 代替案ごとのスコア。問題の代替案と同じ順
    pub values: Vec<AlternativeScore>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regret_matrix: Option<Vec<Vec<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub perfect_information: Option<PerfectInformation>,
    /// Markdown の導出過程。チャットのターンとしてそのまま表示する
    pub trace: String,
}

impl DecisionResult {
    pub fn score_of(&self, alternative: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|entry| entry.alternative == alternative)
            .map(|entry| entry.score.as_str())
    }
}
