//! 意思決定計算エンジン
//!
//! `compute` は [`DecisionProblem`] の純粋関数で、I/O も状態も持たず、
//! 同じ入力にはバイト単位で同じ出力を返す。
//! 先に検証し、却下した入力に対しては途中まで計算することもない。

mod criteria;
mod trace;

use tracing::debug;

use crate::domain::decimal;
use crate::domain::problem::{
    validate_alpha, validate_labels, validate_payoffs, validate_probabilities,
};
use crate::domain::{
    AlternativeScore, Criterion, DecisionError, DecisionProblem, DecisionResult,
    PerfectInformation,
};

use self::criteria::Solution;

/// `problem` の前提条件をすべて検査し、最初に違反したフィールドを示す
pub fn validate(problem: &DecisionProblem) -> Result<(), DecisionError> {
    validate_labels("alternatives", &problem.alternatives)?;
    validate_labels("states", &problem.states)?;
    let (rows, cols) = (problem.alternatives.len(), problem.states.len());
    validate_payoffs(&problem.payoffs, rows, cols)?;

    let criterion = problem.criterion;
    if criterion.requires_probabilities() {
        let probabilities = problem.probabilities.as_deref().ok_or_else(|| {
            DecisionError::validation("probabilities", format!("are required for {criterion}"))
        })?;
        validate_probabilities(probabilities, cols)?;
    }
    if criterion.requires_alpha() {
        let alpha = problem.alpha.ok_or_else(|| {
            DecisionError::validation("alpha", format!("is required for {criterion}"))
        })?;
        validate_alpha(alpha)?;
    }
    Ok(())
}

/// `problem` をその基準で解く
pub fn compute(problem: &DecisionProblem) -> Result<DecisionResult, DecisionError> {
    validate(problem)?;
    debug!(
        criterion = %problem.criterion,
        alternatives = problem.alternatives.len(),
        states = problem.states.len(),
        "computing decision"
    );

    let solution = match problem.criterion {
        Criterion::Maximax => criteria::maximax(problem)?,
        Criterion::Maximin => criteria::maximin(problem)?,
        Criterion::Emv => criteria::emv(problem)?,
        Criterion::MinimaxRegret => criteria::minimax_regret(problem)?,
        Criterion::Laplace => criteria::laplace(problem)?,
        Criterion::Hurwicz => criteria::hurwicz(problem)?,
        Criterion::Evpi => criteria::evpi(problem)?,
    };

    let result = into_result(problem, solution);
    debug!(
        criterion = %result.criterion,
        recommended = %result.recommended_alternative,
        best_value = %result.best_value,
        "decision computed"
    );
    Ok(result)
}

fn into_result(problem: &DecisionProblem, solution: Solution) -> DecisionResult {
    let values = problem
        .alternatives
        .iter()
        .zip(&solution.scores)
        .map(|(alternative, score)| AlternativeScore {
            alternative: alternative.clone(),
            score: decimal::canonical(*score),
        })
        .collect();

    DecisionResult {
        criterion: problem.criterion,
        recommended_alternative: problem.alternatives[solution.best].clone(),
        best_value: decimal::canonical(solution.best_value),
        values,
        regret_matrix: solution.regret.map(|rows| {
            rows.into_iter()
                .map(|row| row.into_iter().map(decimal::canonical).collect())
                .collect()
        }),
        perfect_information: solution
            .perfect_information
            .map(|(evwpi, best_emv)| PerfectInformation {
                evwpi: decimal::canonical(evwpi),
                best_emv: decimal::canonical(best_emv),
            }),
        trace: solution.trace,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::decimal::Decimal;
    use crate::domain::ErrorKind;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn problem(criterion: Criterion) -> DecisionProblem {
        DecisionProblem {
            criterion,
            alternatives: labels(&["A", "B", "C"]),
            states: labels(&["S1", "S2"]),
            payoffs: vec![
                vec![dec!(100), dec!(0)],
                vec![dec!(50), dec!(50)],
                vec![dec!(20), dec!(80)],
            ],
            probabilities: criterion
                .requires_probabilities()
                .then(|| vec![dec!(0.6), dec!(0.4)]),
            alpha: criterion.requires_alpha().then_some(dec!(0.7)),
        }
    }

    #[rstest]
    #[case::maximax(Criterion::Maximax, "A", "100")]
    #[case::maximin(Criterion::Maximin, "B", "50")]
    #[case::emv(Criterion::Emv, "A", "60")]
    #[case::minimax_regret(Criterion::MinimaxRegret, "B", "50")]
    #[case::laplace(Criterion::Laplace, "A", "50")]
    #[case::hurwicz(Criterion::Hurwicz, "A", "70")]
    #[case::evpi(Criterion::Evpi, "A", "32")]
    fn reference_scenarios(
        #[case] criterion: Criterion,
        #[case] recommended: &str,
        #[case] best_value: &str,
    ) {
        let result = compute(&problem(criterion)).unwrap();
        assert_eq!(result.criterion, criterion);
        assert_eq!(result.recommended_alternative, recommended);
        assert_eq!(result.best_value, best_value);
        assert_eq!(result.values.len(), 3);
        assert!(result.trace.contains(best_value));
    }

    #[test]
    fn scores_are_aligned_to_alternatives() {
        let result = compute(&problem(Criterion::Hurwicz)).unwrap();
        let scores: Vec<&str> = result.values.iter().map(|v| v.score.as_str()).collect();
        assert_eq!(scores, vec!["70", "50", "62"]);
        assert_eq!(result.score_of("C"), Some("62"));
    }

    #[rstest]
    #[case::maximax(Criterion::Maximax)]
    #[case::maximin(Criterion::Maximin)]
    #[case::emv(Criterion::Emv)]
    #[case::laplace(Criterion::Laplace)]
    #[case::hurwicz(Criterion::Hurwicz)]
    #[case::minimax_regret(Criterion::MinimaxRegret)]
    fn ties_go_to_the_lowest_index(#[case] criterion: Criterion) {
        let mut tied = problem(criterion);
        tied.alternatives = labels(&["First", "Other", "Last"]);
        tied.payoffs = vec![
            vec![dec!(10), dec!(5)],
            vec![dec!(1), dec!(1)],
            vec![dec!(10), dec!(5)],
        ];

        let result = compute(&tied).unwrap();
        assert_eq!(result.recommended_alternative, "First");
    }

    #[test]
    fn laplace_all_equal_picks_first() {
        let result = compute(&problem(Criterion::Laplace)).unwrap();
        assert!(result.values.iter().all(|v| v.score == "50"));
        assert_eq!(result.recommended_alternative, "A");
    }

    #[test]
    fn regret_matrix_is_opportunity_loss() {
        let result = compute(&problem(Criterion::MinimaxRegret)).unwrap();
        let matrix = result.regret_matrix.unwrap();
        assert_eq!(
            matrix,
            vec![
                vec!["0".to_string(), "80".to_string()],
                vec!["50".to_string(), "30".to_string()],
                vec!["80".to_string(), "0".to_string()],
            ]
        );
        for row in &matrix {
            for cell in row {
                assert!(!cell.starts_with('-'));
            }
        }
        assert!(result.trace.contains("**Recommendation**: B with Minimax Regret of 50"));
    }

    #[test]
    fn regret_is_never_negative_with_negative_payoffs() {
        let mut losses = problem(Criterion::MinimaxRegret);
        losses.payoffs = vec![
            vec![dec!(-10), dec!(-3.5)],
            vec![dec!(-7), dec!(-9)],
            vec![dec!(-20), dec!(0)],
        ];
        let result = compute(&losses).unwrap();
        for row in result.regret_matrix.unwrap() {
            for cell in row {
                let value: Decimal = cell.parse().unwrap();
                assert!(value >= Decimal::ZERO);
            }
        }
    }

    #[test]
    fn evpi_reports_perfect_information_and_emv_choice() {
        let result = compute(&problem(Criterion::Evpi)).unwrap();
        let info = result.perfect_information.clone().unwrap();
        assert_eq!(info.evwpi, "92");
        assert_eq!(info.best_emv, "60");
        assert_eq!(result.score_of("C"), Some("44"));
        assert!(result.regret_matrix.is_none());
        assert!(result.trace.contains("**32**"));
    }

    #[rstest]
    #[case::skewed(dec!(0.9), dec!(0.1))]
    #[case::even(dec!(0.5), dec!(0.5))]
    #[case::certain(dec!(1), dec!(0))]
    fn evpi_is_never_negative(#[case] p1: Decimal, #[case] p2: Decimal) {
        let mut p = problem(Criterion::Evpi);
        p.probabilities = Some(vec![p1, p2]);
        let result = compute(&p).unwrap();
        let value: Decimal = result.best_value.parse().unwrap();
        assert!(value >= Decimal::ZERO);
    }

    #[test]
    fn compute_is_deterministic() {
        for criterion in Criterion::ALL {
            let p = problem(criterion);
            let first = serde_json::to_string(&compute(&p).unwrap()).unwrap();
            let second = serde_json::to_string(&compute(&p).unwrap()).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn thirds_keep_twenty_significant_digits() {
        let mut p = problem(Criterion::Laplace);
        p.states = labels(&["S1", "S2", "S3"]);
        p.payoffs = vec![
            vec![dec!(100), dec!(0), dec!(0)],
            vec![dec!(1), dec!(1), dec!(1)],
            vec![dec!(0), dec!(0), dec!(0)],
        ];
        let result = compute(&p).unwrap();
        assert_eq!(result.best_value, "33.333333333333333333");
    }

    #[rstest]
    #[case::short_row(Criterion::Maximax, "payoffs", |p: &mut DecisionProblem| {
        p.payoffs[2].pop();
    })]
    #[case::missing_probabilities(Criterion::Emv, "probabilities", |p: &mut DecisionProblem| {
        p.probabilities = None;
    })]
    #[case::negative_probability(Criterion::Evpi, "probabilities", |p: &mut DecisionProblem| {
        p.probabilities = Some(vec![dec!(1.2), dec!(-0.2)]);
    })]
    #[case::missing_alpha(Criterion::Hurwicz, "alpha", |p: &mut DecisionProblem| {
        p.alpha = None;
    })]
    #[case::alpha_out_of_range(Criterion::Hurwicz, "alpha", |p: &mut DecisionProblem| {
        p.alpha = Some(dec!(1.5));
    })]
    #[case::duplicate_state(Criterion::Laplace, "states", |p: &mut DecisionProblem| {
        p.states = labels(&["S1", "s1"]);
    })]
    #[case::single_alternative(Criterion::Maximin, "alternatives", |p: &mut DecisionProblem| {
        p.alternatives.truncate(1);
    })]
    fn invalid_problems_name_the_field(
        #[case] criterion: Criterion,
        #[case] field: &str,
        #[case] break_it: fn(&mut DecisionProblem),
    ) {
        let mut p = problem(criterion);
        break_it(&mut p);

        let err = compute(&p).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Input);
        assert_eq!(err.field(), Some(field));
    }

    #[test]
    fn probabilities_off_by_more_than_tolerance_are_rejected() {
        let mut p = problem(Criterion::Emv);
        p.probabilities = Some(vec![dec!(0.6), dec!(0.3)]);
        let err = compute(&p).unwrap_err();
        assert_eq!(err.field(), Some("probabilities"));

        p.probabilities = Some(vec![dec!(0.605), dec!(0.4)]);
        assert!(compute(&p).is_ok());
    }

    #[test]
    fn mismatched_alternative_count_is_rejected() {
        let mut p = problem(Criterion::Maximin);
        p.alternatives.push("D".into());
        let err = compute(&p).unwrap_err();
        assert_eq!(err.field(), Some("payoffs"));
    }

    #[test]
    fn overflow_surfaces_as_arithmetic_error() {
        let mut p = problem(Criterion::Laplace);
        p.payoffs[0] = vec![Decimal::MAX, Decimal::MAX];
        let err = compute(&p).unwrap_err();
        assert!(matches!(err, DecisionError::Arithmetic { .. }));
        assert_eq!(err.kind(), ErrorKind::Compute);
    }
}
