//! 意思決定基準

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// 不確実性下の古典的な意思決定基準
///
/// SCREAMING_SNAKE_CASE（`"MINIMAX_REGRET"`）でシリアライズする。
/// エンジンは網羅的に match するので、基準の追加はそこに arm を 1 つ足すだけ。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Criterion {
    Maximax,
    Maximin,
    Emv,
    MinimaxRegret,
    Laplace,
    Hurwicz,
    #[serde(alias = "EVWPI_EVPI")]
    Evpi,
}

impl Criterion {
    pub const ALL: [Criterion; 7] = [
        Criterion::Maximax,
        Criterion::Maximin,
        Criterion::Emv,
        Criterion::MinimaxRegret,
        Criterion::Laplace,
        Criterion::Hurwicz,
        Criterion::Evpi,
    ];

    /// ワイヤ上のタグ
    pub fn tag(self) -> &'static str {
        match self {
            Criterion::Maximax => "MAXIMAX",
            Criterion::Maximin => "MAXIMIN",
            Criterion::Emv => "EMV",
            Criterion::MinimaxRegret => "MINIMAX_REGRET",
            Criterion::Laplace => "LAPLACE",
            Criterion::Hurwicz => "HURWICZ",
            Criterion::Evpi => "EVPI",
        }
    }

    pub fn friendly_name(self) -> &'static str {
        match self {
            Criterion::Maximax => "Optimistic (Maximax)",
            Criterion::Maximin => "Conservative (Maximin)",
            Criterion::Emv => "Balanced (EMV)",
            Criterion::MinimaxRegret => "Regret-Minimizing (Minimax Regret)",
            Criterion::Laplace => "Equally Likely (Laplace)",
            Criterion::Hurwicz => "Weighted (Hurwicz)",
            Criterion::Evpi => "Value of Information (EVPI)",
        }
    }

    pub fn requires_probabilities(self) -> bool {
        matches!(self, Criterion::Emv | Criterion::Evpi)
    }

    pub fn requires_alpha(self) -> bool {
        matches!(self, Criterion::Hurwicz)
    }

    /// 自由入力から基準を認識
    ///
    /// スタイルを表す語を固定順でタグより先に照合するので、
    /// "conservative" が別の基準に読まれることはない。
    pub fn recognize(text: &str) -> Option<Criterion> {
        let upper = text.to_uppercase();
        let has = |needles: &[&str]| needles.iter().any(|needle| upper.contains(needle));

        if has(&["OPTIMIST", "MAXIMAX"]) {
            return Some(Criterion::Maximax);
        }
        if has(&["CONSERVATIVE", "PESSIMIST", "CAUTIOUS", "MAXIMIN"]) {
            return Some(Criterion::Maximin);
        }
        if has(&["REGRET"]) {
            return Some(Criterion::MinimaxRegret);
        }
        if has(&["EVPI", "EVWPI", "INFORMATION VALUE", "VALUE OF INFORMATION"]) {
            return Some(Criterion::Evpi);
        }
        if has(&["BALANCED", "EMV"]) {
            return Some(Criterion::Emv);
        }
        if has(&["LAPLACE", "EQUALLY", "AVERAGE"]) {
            return Some(Criterion::Laplace);
        }
        if has(&["HURWICZ", "COEFFICIENT"]) {
            return Some(Criterion::Hurwicz);
        }

        upper.trim().replace(char::is_whitespace, "_").parse().ok()
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown criterion: {0:?}")]
pub struct UnknownCriterion(pub String);

impl FromStr for Criterion {
    type Err = UnknownCriterion;

    /// 厳密なタグのパース（大文字小文字は区別しない）。旧名 `EVWPI_EVPI` も受け付ける
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_uppercase();
        if tag == "EVWPI_EVPI" {
            return Ok(Criterion::Evpi);
        }
        Criterion::ALL
            .into_iter()
            .find(|criterion| criterion.tag() == tag)
            .ok_or_else(|| UnknownCriterion(s.to_string()))
    }
}
