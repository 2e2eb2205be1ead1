//! 基準ごとのソルバ
//!
//! 各ソルバは [`super::validate`] を通過済みの問題を前提に [`Solution`] を返す。
//! 極値の走査はすべて [`decimal::max_by_first`]/[`decimal::min_by_first`] を通すので、
//! 同値は常に最小の代替案添字が勝つ。

use crate::domain::decimal::{self, Decimal};
use crate::domain::{DecisionError, DecisionProblem};

use super::trace::{self, Trace};

/// ラベルを付ける前のエンジン生出力
#[derive(Debug, Clone)]
pub(crate) struct Solution {
    /// 代替案ごとのスコア
    pub scores: Vec<Decimal>,
    pub best: usize,
    pub best_value: Decimal,
    pub regret: Option<Vec<Vec<Decimal>>>,
    /// EVPI のときの `(evwpi, best_emv)`
    pub perfect_information: Option<(Decimal, Decimal)>,
    pub trace: String,
}

impl Solution {
    fn scored(scores: Vec<Decimal>, best: usize, trace: String) -> Self {
        Self {
            best_value: scores[best],
            scores,
            best,
            regret: None,
            perfect_information: None,
            trace,
        }
    }
}

// ========================================
// 走査
// ========================================

fn empty(field: &str) -> DecisionError {
    DecisionError::validation(field, "nothing to compare")
}

fn row_max(row: &[Decimal]) -> Result<Decimal, DecisionError> {
    decimal::max_of(row).ok_or_else(|| empty("payoffs"))
}

fn row_min(row: &[Decimal]) -> Result<Decimal, DecisionError> {
    decimal::min_of(row).ok_or_else(|| empty("payoffs"))
}

/// 状態ごとの最良ペイオフ
fn column_maxima(payoffs: &[Vec<Decimal>], cols: usize) -> Result<Vec<Decimal>, DecisionError> {
    (0..cols)
        .map(|col| {
            let column: Vec<Decimal> = payoffs.iter().map(|row| row[col]).collect();
            decimal::max_of(&column).ok_or_else(|| empty("payoffs"))
        })
        .collect()
}

fn argmax(scores: &[Decimal]) -> Result<usize, DecisionError> {
    decimal::max_by_first(scores, decimal::compare).ok_or_else(|| empty("alternatives"))
}

fn argmin(scores: &[Decimal]) -> Result<usize, DecisionError> {
    decimal::min_by_first(scores, decimal::compare).ok_or_else(|| empty("alternatives"))
}

fn probabilities(problem: &DecisionProblem) -> Result<&[Decimal], DecisionError> {
    problem
        .probabilities
        .as_deref()
        .ok_or_else(|| DecisionError::validation("probabilities", "is missing"))
}

/// 各代替案の Σ(payoff × probability)
fn expected_values(
    payoffs: &[Vec<Decimal>],
    probabilities: &[Decimal],
) -> Result<Vec<Decimal>, DecisionError> {
    payoffs
        .iter()
        .map(|row| -> Result<Decimal, DecisionError> {
            let weighted = row
                .iter()
                .zip(probabilities)
                .map(|(payoff, p)| decimal::mul(*payoff, *p))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(decimal::sum(&weighted)?)
        })
        .collect()
}

fn canon(value: Decimal) -> String {
    decimal::canonical(value)
}

// ========================================
// 基準
// ========================================

pub(crate) fn maximax(problem: &DecisionProblem) -> Result<Solution, DecisionError> {
    let mut trace = Trace::new("Optimistic Calculation (Maximax)");
    trace.header(&["Alternative", "Max Payoff"]);

    let mut scores = Vec::with_capacity(problem.payoffs.len());
    for (label, row) in problem.alternatives.iter().zip(&problem.payoffs) {
        let best = row_max(row)?;
        trace.row(&[label.clone(), canon(best)]);
        scores.push(best);
    }

    let best = argmax(&scores)?;
    let text = trace.recommend(&problem.alternatives[best], "max payoff", scores[best]);
    Ok(Solution::scored(scores, best, text))
}

pub(crate) fn maximin(problem: &DecisionProblem) -> Result<Solution, DecisionError> {
    let mut trace = Trace::new("Conservative Calculation (Maximin)");
    trace.header(&["Alternative", "Min Payoff"]);

    let mut scores = Vec::with_capacity(problem.payoffs.len());
    for (label, row) in problem.alternatives.iter().zip(&problem.payoffs) {
        let worst = row_min(row)?;
        trace.row(&[label.clone(), canon(worst)]);
        scores.push(worst);
    }

    let best = argmax(&scores)?;
    let text = trace.recommend(&problem.alternatives[best], "guaranteed minimum", scores[best]);
    Ok(Solution::scored(scores, best, text))
}

pub(crate) fn emv(problem: &DecisionProblem) -> Result<Solution, DecisionError> {
    let probabilities = probabilities(problem)?;
    let scores = expected_values(&problem.payoffs, probabilities)?;

    let mut trace = Trace::new("Balanced Calculation (Expected Monetary Value)");
    trace
        .fact("Probabilities", &trace::list(probabilities))
        .header(&["Alternative", "Calculation", "EMV"]);
    for ((label, row), score) in problem.alternatives.iter().zip(&problem.payoffs).zip(&scores) {
        let terms: Vec<String> = row
            .iter()
            .zip(probabilities)
            .map(|(payoff, p)| format!("{}×{}", canon(*payoff), canon(*p)))
            .collect();
        trace.row(&[label.clone(), terms.join(" + "), canon(*score)]);
    }

    let best = argmax(&scores)?;
    let text = trace.recommend(&problem.alternatives[best], "EMV", scores[best]);
    Ok(Solution::scored(scores, best, text))
}

pub(crate) fn laplace(problem: &DecisionProblem) -> Result<Solution, DecisionError> {
    let count = Decimal::from(problem.states.len());

    let mut trace = Trace::new("Equally Likely Calculation (Laplace)");
    trace.header(&["Alternative", "Calculation (Sum / n)", "Average Payoff"]);

    let mut scores = Vec::with_capacity(problem.payoffs.len());
    for (label, row) in problem.alternatives.iter().zip(&problem.payoffs) {
        let total = decimal::sum(row)?;
        let average = decimal::div(total, count)?;
        trace.row(&[
            label.clone(),
            format!("{} / {}", canon(total), canon(count)),
            canon(average),
        ]);
        scores.push(average);
    }

    let best = argmax(&scores)?;
    let text = trace.recommend(&problem.alternatives[best], "average payoff", scores[best]);
    Ok(Solution::scored(scores, best, text))
}

pub(crate) fn hurwicz(problem: &DecisionProblem) -> Result<Solution, DecisionError> {
    let alpha = problem
        .alpha
        .ok_or_else(|| DecisionError::validation("alpha", "is missing"))?;
    let pessimism = decimal::sub(Decimal::ONE, alpha)?;

    let mut trace = Trace::new("Coefficient of Optimism (Hurwicz)");
    trace
        .fact("Alpha (α)", &format!("{} (optimism level)", canon(alpha)))
        .header(&[
            "Alternative",
            "Max",
            "Min",
            "Calculation (α×Max + (1-α)×Min)",
            "Hurwicz Score",
        ]);

    let mut scores = Vec::with_capacity(problem.payoffs.len());
    for (label, row) in problem.alternatives.iter().zip(&problem.payoffs) {
        let high = row_max(row)?;
        let low = row_min(row)?;
        let score = decimal::add(decimal::mul(alpha, high)?, decimal::mul(pessimism, low)?)?;
        trace.row(&[
            label.clone(),
            canon(high),
            canon(low),
            format!(
                "{}×{} + {}×{}",
                canon(alpha),
                canon(high),
                canon(pessimism),
                canon(low)
            ),
            canon(score),
        ]);
        scores.push(score);
    }

    let best = argmax(&scores)?;
    let text = trace.recommend(&problem.alternatives[best], "Hurwicz score", scores[best]);
    Ok(Solution::scored(scores, best, text))
}

pub(crate) fn minimax_regret(problem: &DecisionProblem) -> Result<Solution, DecisionError> {
    let maxima = column_maxima(&problem.payoffs, problem.states.len())?;

    let regret = problem
        .payoffs
        .iter()
        .map(|row| {
            row.iter()
                .zip(&maxima)
                .map(|(payoff, best)| decimal::sub(*best, *payoff))
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;
    let scores = regret
        .iter()
        .map(|row| row_max(row))
        .collect::<Result<Vec<_>, _>>()?;

    let mut trace = Trace::new("Regret-Minimizing Calculation (Minimax Regret)");
    trace.subheading("Best payoff per state");
    for (state, best) in problem.states.iter().zip(&maxima) {
        trace.bullet(state, &canon(*best));
    }
    trace
        .blank()
        .header(&["Alternative", "Regret (per State)", "Max Regret"]);
    for ((label, row), score) in problem.alternatives.iter().zip(&regret).zip(&scores) {
        trace.row(&[label.clone(), trace::list(row), canon(*score)]);
    }

    let best = argmin(&scores)?;
    let text = trace.recommend(&problem.alternatives[best], "Minimax Regret", scores[best]);
    let mut solution = Solution::scored(scores, best, text);
    solution.regret = Some(regret);
    Ok(solution)
}

/// EVPI = Σ(colMax × p) − best EMV
///
/// 推奨案と代替案ごとのスコアは EMV のもので、best value は EVPI そのもの。
pub(crate) fn evpi(problem: &DecisionProblem) -> Result<Solution, DecisionError> {
    let probabilities = probabilities(problem)?;
    let maxima = column_maxima(&problem.payoffs, problem.states.len())?;

    let mut trace = Trace::new("Perfect Information Analysis (EVPI)");
    trace
        .subheading("Step 1: Expected Value with Perfect Information (EVwPI)")
        .header(&["State", "Best Payoff", "Prob", "Weight"]);

    let mut weights = Vec::with_capacity(maxima.len());
    for ((state, best), p) in problem.states.iter().zip(&maxima).zip(probabilities) {
        let weight = decimal::mul(*best, *p)?;
        trace.row(&[state.clone(), canon(*best), canon(*p), canon(weight)]);
        weights.push(weight);
    }
    let evwpi = decimal::sum(&weights)?;

    let scores = expected_values(&problem.payoffs, probabilities)?;
    let best = argmax(&scores)?;
    let best_emv = scores[best];
    let value = decimal::sub(evwpi, best_emv)?;

    trace
        .blank()
        .fact("EVwPI Sum", &canon(evwpi))
        .subheading("Step 2: Value of Information")
        .bullet("EVwPI", &canon(evwpi))
        .bullet(
            "Maximum EMV (without perfect info)",
            &format!("{} ({})", canon(best_emv), problem.alternatives[best]),
        )
        .bullet("EVPI (EVwPI - Best EMV)", &canon(value))
        .blank();
    let text = trace.finish(&format!(
        "**Analysis**: The most you should pay for perfect information about the future states is **{}**.",
        canon(value)
    ));

    Ok(Solution {
        scores,
        best,
        best_value: value,
        regret: None,
        perfect_information: Some((evwpi, best_emv)),
        trace: text,
    })
}
