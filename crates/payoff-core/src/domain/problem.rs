//! 問題モデル - 確定したエンジン入力と入力途中の draft
//!
//! [`DecisionProblem`] はエンジンにちょうど一度渡される値オブジェクト。
//! [`ProblemDraft`] は collector のスロット置き場で、setter が検証するため
//! 検証に落ちた値を持つことはない。

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::criterion::Criterion;
use super::decimal::{self, Decimal};
use super::errors::DecisionError;

/// 確率の合計が 1 から離れてよい許容幅
pub const PROBABILITY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// すべて指定済みの意思決定問題
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionProblem {
    pub criterion: Criterion,
    pub alternatives: Vec<String>,
    pub states: Vec<String>,
    /// 行 `i` は `alternatives[i]` の各 `states` におけるペイオフ
    pub payoffs: Vec<Vec<Decimal>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probabilities: Option<Vec<Decimal>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha: Option<Decimal>,
}

/// 問題定義の名前付きスロット
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Criterion,
    Context,
    Alternatives,
    States,
    Payoffs,
    Probabilities,
    Alpha,
}

impl Slot {
    pub fn name(self) -> &'static str {
        match self {
            Slot::Criterion => "criterion",
            Slot::Context => "context",
            Slot::Alternatives => "alternatives",
            Slot::States => "states",
            Slot::Payoffs => "payoffs",
            Slot::Probabilities => "probabilities",
            Slot::Alpha => "alpha",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Slot {
    type Err = DecisionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "criterion" | "approach" | "style" => Ok(Slot::Criterion),
            "context" | "description" => Ok(Slot::Context),
            "alternatives" | "alternative" | "options" => Ok(Slot::Alternatives),
            "states" | "state" | "scenarios" => Ok(Slot::States),
            "payoffs" | "payoff" | "matrix" => Ok(Slot::Payoffs),
            "probabilities" | "probability" | "probs" => Ok(Slot::Probabilities),
            "alpha" => Ok(Slot::Alpha),
            other => Err(DecisionError::parse("slot", format!("unknown slot {other:?}"))),
        }
    }
}

// ========================================
// 共通の検証
// ========================================

/// 空でないラベルが 2 つ以上あり、大文字小文字を無視して重複しない
pub fn validate_labels(field: &str, labels: &[String]) -> Result<(), DecisionError> {
    if labels.len() < 2 {
        return Err(DecisionError::validation(
            field,
            format!("at least 2 are required, got {}", labels.len()),
        ));
    }
    for (index, label) in labels.iter().enumerate() {
        if label.trim().is_empty() {
            return Err(DecisionError::validation(field, "labels must not be empty"));
        }
        let duplicate = labels[..index]
            .iter()
            .any(|earlier| earlier.trim().eq_ignore_ascii_case(label.trim()));
        if duplicate {
            return Err(DecisionError::validation(
                field,
                format!("{label:?} appears more than once"),
            ));
        }
    }
    Ok(())
}

/// `rows` × `cols` の形状チェック
pub fn validate_payoffs(
    payoffs: &[Vec<Decimal>],
    rows: usize,
    cols: usize,
) -> Result<(), DecisionError> {
    if payoffs.len() != rows {
        return Err(DecisionError::validation(
            "payoffs",
            format!("expected {rows} rows (one per alternative), got {}", payoffs.len()),
        ));
    }
    for (index, row) in payoffs.iter().enumerate() {
        if row.len() != cols {
            return Err(DecisionError::validation(
                "payoffs",
                format!(
                    "row {} has {} entries, expected {cols} (one per state)",
                    index + 1,
                    row.len()
                ),
            ));
        }
    }
    Ok(())
}

/// 非負で状態ごとに 1 つ、合計が [`PROBABILITY_TOLERANCE`] 内で 1
pub fn validate_probabilities(probabilities: &[Decimal], cols: usize) -> Result<(), DecisionError> {
    if probabilities.len() != cols {
        return Err(DecisionError::validation(
            "probabilities",
            format!("expected {cols} values (one per state), got {}", probabilities.len()),
        ));
    }
    if let Some(negative) = probabilities.iter().find(|p| p.is_sign_negative() && !p.is_zero()) {
        return Err(DecisionError::validation(
            "probabilities",
            format!("{} is negative", decimal::canonical(*negative)),
        ));
    }
    let total = decimal::sum(probabilities)?;
    let distance = decimal::sub(total, Decimal::ONE)?.abs();
    if distance > PROBABILITY_TOLERANCE {
        return Err(DecisionError::validation(
            "probabilities",
            format!("values sum to {}, but must sum to 1", decimal::canonical(total)),
        ));
    }
    Ok(())
}

/// 楽観度の重み。`[0, 1]` の範囲
pub fn validate_alpha(alpha: Decimal) -> Result<(), DecisionError> {
    if alpha < Decimal::ZERO || alpha > Decimal::ONE {
        return Err(DecisionError::validation(
            "alpha",
            format!("{} is outside [0, 1]", decimal::canonical(alpha)),
        ));
    }
    Ok(())
}

fn position(labels: &[String], label: &str) -> Option<usize> {
    labels
        .iter()
        .position(|candidate| candidate.trim().eq_ignore_ascii_case(label.trim()))
}

// ========================================
// ドラフト
// ========================================

/// collector が持つ部分的に指定された問題
///
/// 未入力のスロットは `None` で、デフォルト値は入れない。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    criterion: Option<Criterion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    alternatives: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    states: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    payoffs: Option<Vec<Vec<Decimal>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    probabilities: Option<Vec<Decimal>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    alpha: Option<Decimal>,
}

impl ProblemDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn criterion(&self) -> Option<Criterion> {
        self.criterion
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    pub fn alternatives(&self) -> Option<&[String]> {
        self.alternatives.as_deref()
    }

    pub fn states(&self) -> Option<&[String]> {
        self.states.as_deref()
    }

    pub fn payoffs(&self) -> Option<&[Vec<Decimal>]> {
        self.payoffs.as_deref()
    }

    pub fn probabilities(&self) -> Option<&[Decimal]> {
        self.probabilities.as_deref()
    }

    pub fn alpha(&self) -> Option<Decimal> {
        self.alpha
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn has(&self, slot: Slot) -> bool {
        match slot {
            Slot::Criterion => self.criterion.is_some(),
            Slot::Context => self.context.is_some(),
            Slot::Alternatives => self.alternatives.is_some(),
            Slot::States => self.states.is_some(),
            Slot::Payoffs => self.payoffs.is_some(),
            Slot::Probabilities => self.probabilities.is_some(),
            Slot::Alpha => self.alpha.is_some(),
        }
    }

    /// 現在の基準が必要とする未入力スロット（収集順）
    pub fn missing(&self) -> Vec<Slot> {
        let Some(criterion) = self.criterion else {
            return vec![Slot::Criterion];
        };
        let mut required = vec![Slot::Alternatives, Slot::States, Slot::Payoffs];
        if criterion.requires_probabilities() {
            required.push(Slot::Probabilities);
        }
        if criterion.requires_alpha() {
            required.push(Slot::Alpha);
        }
        required.into_iter().filter(|slot| !self.has(*slot)).collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }

    pub fn set_criterion(&mut self, criterion: Criterion) {
        self.criterion = Some(criterion);
    }

    pub fn set_context(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.context = (!text.trim().is_empty()).then(|| text.trim().to_string());
    }

    /// 代替案を置き換える。ペイオフは行数が一致する場合だけ残る
    pub fn set_alternatives(&mut self, labels: Vec<String>) -> Result<(), DecisionError> {
        validate_labels("alternatives", &labels)?;
        if self.payoffs.as_ref().is_some_and(|rows| rows.len() != labels.len()) {
            self.payoffs = None;
        }
        self.alternatives = Some(labels);
        Ok(())
    }

    /// 状態を置き換える。ペイオフと確率は列数が一致する場合だけ残る
    pub fn set_states(&mut self, labels: Vec<String>) -> Result<(), DecisionError> {
        validate_labels("states", &labels)?;
        let cols = labels.len();
        if self
            .payoffs
            .as_ref()
            .is_some_and(|rows| rows.iter().any(|row| row.len() != cols))
        {
            self.payoffs = None;
        }
        if self.probabilities.as_ref().is_some_and(|p| p.len() != cols) {
            self.probabilities = None;
        }
        self.states = Some(labels);
        Ok(())
    }

    /// 両方のラベル列が揃っていれば `(rows, cols)`
    pub fn dimensions(&self) -> Option<(usize, usize)> {
        Some((self.alternatives.as_ref()?.len(), self.states.as_ref()?.len()))
    }

    fn require_dimensions(&self, field: &str) -> Result<(usize, usize), DecisionError> {
        self.dimensions().ok_or_else(|| {
            DecisionError::validation(field, "alternatives and states must be set first")
        })
    }

    pub fn set_payoffs(&mut self, payoffs: Vec<Vec<Decimal>>) -> Result<(), DecisionError> {
        let (rows, cols) = self.require_dimensions("payoffs")?;
        validate_payoffs(&payoffs, rows, cols)?;
        self.payoffs = Some(payoffs);
        Ok(())
    }

    /// ラベルで指定したペイオフのセルを 1 つ上書き
    pub fn set_payoff_cell(
        &mut self,
        alternative: &str,
        state: &str,
        value: Decimal,
    ) -> Result<(), DecisionError> {
        let row = self.alternative_index(alternative)?;
        let col = self.state_index(state)?;
        let payoffs = self
            .payoffs
            .as_mut()
            .ok_or_else(|| DecisionError::validation("payoffs", "enter the payoff matrix first"))?;
        let cell = payoffs
            .get_mut(row)
            .and_then(|cells| cells.get_mut(col))
            .ok_or_else(|| {
                DecisionError::validation("payoffs", "the payoff matrix does not match the labels")
            })?;
        *cell = value;
        Ok(())
    }

    pub fn set_probabilities(&mut self, probabilities: Vec<Decimal>) -> Result<(), DecisionError> {
        let cols = self
            .states
            .as_ref()
            .map(Vec::len)
            .ok_or_else(|| DecisionError::validation("probabilities", "states must be set first"))?;
        validate_probabilities(&probabilities, cols)?;
        self.probabilities = Some(probabilities);
        Ok(())
    }

    pub fn set_alpha(&mut self, alpha: Decimal) -> Result<(), DecisionError> {
        validate_alpha(alpha)?;
        self.alpha = Some(alpha);
        Ok(())
    }

    pub fn alternative_index(&self, label: &str) -> Result<usize, DecisionError> {
        self.alternatives
            .as_deref()
            .and_then(|labels| position(labels, label))
            .ok_or_else(|| {
                DecisionError::validation("alternatives", format!("no alternative named {label:?}"))
            })
    }

    pub fn state_index(&self, label: &str) -> Result<usize, DecisionError> {
        self.states
            .as_deref()
            .and_then(|labels| position(labels, label))
            .ok_or_else(|| DecisionError::validation("states", format!("no state named {label:?}")))
    }

    /// 代替案を追加。ペイオフ行列が追加分を覆わなくなるので破棄する
    pub fn add_alternative(&mut self, label: &str) -> Result<(), DecisionError> {
        let mut labels = self.alternatives.clone().unwrap_or_default();
        labels.push(label.trim().to_string());
        validate_labels("alternatives", &labels)?;
        self.alternatives = Some(labels);
        self.payoffs = None;
        Ok(())
    }

    /// 代替案とそのペイオフ行を削除
    pub fn remove_alternative(&mut self, label: &str) -> Result<(), DecisionError> {
        let index = self.alternative_index(label)?;
        let mut labels = self.alternatives.clone().unwrap_or_default();
        labels.remove(index);
        validate_labels("alternatives", &labels)?;
        if let Some(rows) = self.payoffs.as_mut() {
            if index >= rows.len() {
                return Err(DecisionError::validation(
                    "payoffs",
                    "the payoff matrix does not match the labels",
                ));
            }
            rows.remove(index);
        }
        self.alternatives = Some(labels);
        Ok(())
    }

    /// 状態を追加。ペイオフと確率はそれを覆わなくなる
    pub fn add_state(&mut self, label: &str) -> Result<(), DecisionError> {
        let mut labels = self.states.clone().unwrap_or_default();
        labels.push(label.trim().to_string());
        validate_labels("states", &labels)?;
        self.states = Some(labels);
        self.payoffs = None;
        self.probabilities = None;
        Ok(())
    }

    /// 状態とそのペイオフ列を削除
    ///
    /// 残りの確率は合計 1 にならないので破棄する。
    pub fn remove_state(&mut self, label: &str) -> Result<(), DecisionError> {
        let index = self.state_index(label)?;
        let mut labels = self.states.clone().unwrap_or_default();
        labels.remove(index);
        validate_labels("states", &labels)?;
        if let Some(rows) = self.payoffs.as_mut() {
            if rows.iter().any(|row| index >= row.len()) {
                return Err(DecisionError::validation(
                    "payoffs",
                    "the payoff matrix does not match the labels",
                ));
            }
            for row in rows.iter_mut() {
                row.remove(index);
            }
        }
        self.states = Some(labels);
        self.probabilities = None;
        Ok(())
    }

    /// 入力済みスロットが互いに整合しているか検査
    ///
    /// setter は常にこれを保つ。ストレージから読み戻した draft は setter を通っていない。
    pub fn validate(&self) -> Result<(), DecisionError> {
        if let Some(labels) = &self.alternatives {
            validate_labels("alternatives", labels)?;
        }
        if let Some(labels) = &self.states {
            validate_labels("states", labels)?;
        }
        if let Some(payoffs) = &self.payoffs {
            let (rows, cols) = self.require_dimensions("payoffs")?;
            validate_payoffs(payoffs, rows, cols)?;
        }
        if let Some(probabilities) = &self.probabilities {
            let cols = self.states.as_ref().map(Vec::len).ok_or_else(|| {
                DecisionError::validation("probabilities", "states must be set first")
            })?;
            validate_probabilities(probabilities, cols)?;
        }
        if let Some(alpha) = self.alpha {
            validate_alpha(alpha)?;
        }
        Ok(())
    }

    /// draft を [`DecisionProblem`] に確定
    ///
    /// 基準が使うスロットだけを引き継ぐ。
    pub fn to_problem(&self) -> Result<DecisionProblem, DecisionError> {
        if let Some(slot) = self.missing().first() {
            return Err(DecisionError::validation(slot.name(), "is missing"));
        }
        let absent = |slot: Slot| DecisionError::validation(slot.name(), "is missing");
        let criterion = self.criterion.ok_or_else(|| absent(Slot::Criterion))?;
        Ok(DecisionProblem {
            criterion,
            alternatives: self.alternatives.clone().ok_or_else(|| absent(Slot::Alternatives))?,
            states: self.states.clone().ok_or_else(|| absent(Slot::States))?,
            payoffs: self.payoffs.clone().ok_or_else(|| absent(Slot::Payoffs))?,
            probabilities: if criterion.requires_probabilities() {
                self.probabilities.clone()
            } else {
                None
            },
            alpha: if criterion.requires_alpha() { self.alpha } else { None },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn filled(criterion: Criterion) -> ProblemDraft {
        let mut draft = ProblemDraft::new();
        draft.set_criterion(criterion);
        draft.set_alternatives(labels(&["A", "B", "C"])).unwrap();
        draft.set_states(labels(&["S1", "S2"])).unwrap();
        draft
            .set_payoffs(vec![
                vec![dec!(100), dec!(0)],
                vec![dec!(50), dec!(50)],
                vec![dec!(20), dec!(80)],
            ])
            .unwrap();
        draft
    }

    #[test]
    fn labels_must_be_distinct_ignoring_case() {
        let err = validate_labels("states", &labels(&["Boom", "boom"])).unwrap_err();
        assert_eq!(err.field(), Some("states"));
        assert!(validate_labels("states", &labels(&["Boom"])).is_err());
        assert!(validate_labels("states", &labels(&["Boom", "Bust"])).is_ok());
    }

    #[test]
    fn probabilities_within_tolerance_are_accepted() {
        assert!(validate_probabilities(&[dec!(0.6), dec!(0.4)], 2).is_ok());
        assert!(validate_probabilities(&[dec!(0.333), dec!(0.333), dec!(0.333)], 3).is_ok());
        assert!(validate_probabilities(&[dec!(0.5), dec!(0.4)], 2).is_err());
        assert!(validate_probabilities(&[dec!(1.2), dec!(-0.2)], 2).is_err());
        assert!(validate_probabilities(&[dec!(1)], 2).is_err());
    }

    #[test]
    fn alpha_range_is_inclusive() {
        assert!(validate_alpha(dec!(0)).is_ok());
        assert!(validate_alpha(dec!(1)).is_ok());
        assert!(validate_alpha(dec!(1.01)).is_err());
        assert!(validate_alpha(dec!(-0.1)).is_err());
    }

    #[test]
    fn rejected_set_leaves_prior_value() {
        let mut draft = filled(Criterion::Maximax);
        let before = draft.clone();
        assert!(draft.set_alternatives(labels(&["only"])).is_err());
        assert!(draft.set_payoffs(vec![vec![dec!(1), dec!(2)]]).is_err());
        assert!(draft.set_alpha(dec!(2)).is_err());
        assert_eq!(draft, before);
    }

    #[test]
    fn payoffs_need_dimensions() {
        let mut draft = ProblemDraft::new();
        let err = draft.set_payoffs(vec![vec![dec!(1)]]).unwrap_err();
        assert_eq!(err.field(), Some("payoffs"));
    }

    #[test]
    fn replacing_states_keeps_matching_payoffs() {
        let mut draft = filled(Criterion::Emv);
        draft.set_probabilities(vec![dec!(0.6), dec!(0.4)]).unwrap();

        draft.set_states(labels(&["Up", "Down"])).unwrap();
        assert!(draft.has(Slot::Payoffs));
        assert!(draft.has(Slot::Probabilities));

        draft.set_states(labels(&["Up", "Flat", "Down"])).unwrap();
        assert!(!draft.has(Slot::Payoffs));
        assert!(!draft.has(Slot::Probabilities));
    }

    #[test]
    fn replacing_alternatives_with_new_count_drops_payoffs() {
        let mut draft = filled(Criterion::Maximax);
        draft.set_alternatives(labels(&["X", "Y", "Z"])).unwrap();
        assert!(draft.has(Slot::Payoffs));
        draft.set_alternatives(labels(&["X", "Y"])).unwrap();
        assert!(!draft.has(Slot::Payoffs));
    }

    #[test]
    fn missing_follows_criterion() {
        let draft = filled(Criterion::Maximin);
        assert!(draft.is_complete());

        let draft = filled(Criterion::Emv);
        assert_eq!(draft.missing(), vec![Slot::Probabilities]);

        let draft = filled(Criterion::Hurwicz);
        assert_eq!(draft.missing(), vec![Slot::Alpha]);

        assert_eq!(ProblemDraft::new().missing(), vec![Slot::Criterion]);
    }

    #[test]
    fn cell_edit_addresses_by_label() {
        let mut draft = filled(Criterion::Maximax);
        draft.set_payoff_cell("b", "S2", dec!(75)).unwrap();
        assert_eq!(draft.payoffs().unwrap()[1][1], dec!(75));
        assert!(draft.set_payoff_cell("Q", "S2", dec!(1)).is_err());
    }

    #[test]
    fn removing_a_state_trims_columns() {
        let mut draft = filled(Criterion::Emv);
        draft.add_state("S3").unwrap();
        assert!(!draft.has(Slot::Payoffs));

        let mut draft = filled(Criterion::Maximax);
        draft.add_state("S3").unwrap();
        draft
            .set_payoffs(vec![
                vec![dec!(1), dec!(2), dec!(3)],
                vec![dec!(4), dec!(5), dec!(6)],
                vec![dec!(7), dec!(8), dec!(9)],
            ])
            .unwrap();
        draft.remove_state("S2").unwrap();
        assert_eq!(draft.payoffs().unwrap()[2], vec![dec!(7), dec!(9)]);
    }

    #[test]
    fn removing_below_two_is_rejected() {
        let mut draft = filled(Criterion::Maximax);
        draft.remove_alternative("C").unwrap();
        assert_eq!(draft.payoffs().unwrap().len(), 2);
        assert!(draft.remove_alternative("B").is_err());
        assert_eq!(draft.alternatives().unwrap().len(), 2);
    }

    #[test]
    fn to_problem_carries_only_used_slots() {
        let mut draft = filled(Criterion::Hurwicz);
        draft.set_probabilities(vec![dec!(0.5), dec!(0.5)]).unwrap();
        assert!(draft.to_problem().is_err());

        draft.set_alpha(dec!(0.7)).unwrap();
        let problem = draft.to_problem().unwrap();
        assert_eq!(problem.alpha, Some(dec!(0.7)));
        assert_eq!(problem.probabilities, None);
    }

    #[test]
    fn draft_serializes_decimals_as_strings() {
        let mut draft = filled(Criterion::Emv);
        draft.set_probabilities(vec![dec!(0.6), dec!(0.4)]).unwrap();
        let v = serde_json::to_value(&draft).unwrap();
        assert_eq!(v["probabilities"][0], "0.6");
        assert_eq!(v["criterion"], "EMV");
        assert!(v.get("alpha").is_none());

        let back: ProblemDraft = serde_json::from_value(v).unwrap();
        assert_eq!(back, draft);
    }

    fn stored(payoffs: serde_json::Value) -> ProblemDraft {
        serde_json::from_value(serde_json::json!({
            "criterion": "MAXIMAX",
            "alternatives": ["A", "B"],
            "states": ["S1", "S2"],
            "payoffs": payoffs,
        }))
        .unwrap()
    }

    #[test]
    fn validate_accepts_setter_built_drafts() {
        let mut draft = filled(Criterion::Hurwicz);
        draft.set_alpha(dec!(0.5)).unwrap();
        assert!(draft.validate().is_ok());
        assert!(ProblemDraft::new().validate().is_ok());
        assert!(stored(serde_json::json!([["1", "0"], ["2", "0"]])).validate().is_ok());
    }

    #[test]
    fn validate_rejects_a_matrix_that_disagrees_with_the_labels() {
        let draft = stored(serde_json::json!([["1"], ["2"]]));
        assert_eq!(draft.validate().unwrap_err().field(), Some("payoffs"));
    }

    #[test]
    fn ragged_matrix_edits_fail_instead_of_panicking() {
        let mut draft = stored(serde_json::json!([["1"], ["2"]]));
        let err = draft.set_payoff_cell("A", "S2", dec!(5)).unwrap_err();
        assert_eq!(err.field(), Some("payoffs"));

        let mut wide: ProblemDraft = serde_json::from_value(serde_json::json!({
            "alternatives": ["A", "B", "C"],
            "states": ["S1", "S2", "S3"],
            "payoffs": [["1"], ["2"]],
        }))
        .unwrap();
        let before = wide.clone();
        assert_eq!(wide.remove_state("S3").unwrap_err().field(), Some("payoffs"));
        assert_eq!(wide.remove_alternative("C").unwrap_err().field(), Some("payoffs"));
        assert_eq!(wide, before);
    }
}
