//! ステージ遷移表
//!
//! 正しいステージ列は `(stage, criterion)` だけで決まるため、
//! 基準ごとのルートを事前に列挙してテストできる。

use crate::domain::{Criterion, ProblemDraft, Stage};

/// `criterion` のルート上で `stage` の次に来るステージ
///
/// 終端ステージ、およびルートに含まれないステージ（EMV での `CollectAlpha` など）は `None`。
pub fn successor(stage: Stage, criterion: Criterion) -> Option<Stage> {
    use Criterion::{Emv, Evpi, Hurwicz};
    use Stage::*;

    match (stage, criterion) {
        (CollectCriterion, _) => Some(CollectAlternatives),
        (CollectAlternatives, _) => Some(CollectStates),
        (CollectStates, _) => Some(CollectPayoffs),
        (CollectPayoffs, Emv | Evpi) => Some(CollectProbabilities),
        (CollectPayoffs, Hurwicz) => Some(CollectAlpha),
        (CollectPayoffs, _) => Some(Confirm),
        (CollectProbabilities, Emv | Evpi) => Some(Confirm),
        (CollectProbabilities, _) => None,
        (CollectAlpha, Hurwicz) => Some(Confirm),
        (CollectAlpha, _) => None,
        (Confirm, _) => Some(Compute),
        (Compute, _) => Some(Result),
        (Result, _) => None,
    }
}

/// `criterion` が通過する全ステージ（順序どおり）
pub fn route(criterion: Criterion) -> Vec<Stage> {
    let mut stages = vec![Stage::CollectCriterion];
    while let Some(next) = stages.last().and_then(|stage| successor(*stage, criterion)) {
        stages.push(next);
    }
    stages
}

pub fn on_route(stage: Stage, criterion: Criterion) -> bool {
    route(criterion).contains(&stage)
}

/// ルート上でスロットが未入力の最初の収集ステージ。なければ `Confirm`
pub fn next_open_stage(draft: &ProblemDraft) -> Stage {
    let Some(criterion) = draft.criterion() else {
        return Stage::CollectCriterion;
    };
    route(criterion)
        .into_iter()
        .find(|stage| stage.slot().is_some_and(|slot| !draft.has(slot)))
        .unwrap_or(Stage::Confirm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Slot;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use Stage::*;

    #[rstest]
    #[case::maximax(Criterion::Maximax, false, false)]
    #[case::maximin(Criterion::Maximin, false, false)]
    #[case::emv(Criterion::Emv, true, false)]
    #[case::minimax_regret(Criterion::MinimaxRegret, false, false)]
    #[case::laplace(Criterion::Laplace, false, false)]
    #[case::hurwicz(Criterion::Hurwicz, false, true)]
    #[case::evpi(Criterion::Evpi, true, false)]
    fn routes_skip_unused_stages(
        #[case] criterion: Criterion,
        #[case] probabilities: bool,
        #[case] alpha: bool,
    ) {
        let stages = route(criterion);
        assert_eq!(stages.contains(&CollectProbabilities), probabilities);
        assert_eq!(stages.contains(&CollectAlpha), alpha);
        assert_eq!(stages.first(), Some(&CollectCriterion));
        assert_eq!(&stages[stages.len() - 3..], &[Confirm, Compute, Result]);
        assert!(stages.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn emv_route_is_exact() {
        assert_eq!(
            route(Criterion::Emv),
            vec![
                CollectCriterion,
                CollectAlternatives,
                CollectStates,
                CollectPayoffs,
                CollectProbabilities,
                Confirm,
                Compute,
                Result,
            ]
        );
    }

    #[test]
    fn off_route_stages_have_no_successor() {
        assert_eq!(successor(CollectAlpha, Criterion::Emv), None);
        assert_eq!(successor(CollectProbabilities, Criterion::Maximax), None);
        assert!(!on_route(CollectAlpha, Criterion::Laplace));
        assert!(on_route(CollectAlpha, Criterion::Hurwicz));
    }

    #[test]
    fn next_open_stage_follows_the_first_gap() {
        let mut draft = ProblemDraft::new();
        assert_eq!(next_open_stage(&draft), CollectCriterion);

        draft.set_criterion(Criterion::Hurwicz);
        assert_eq!(next_open_stage(&draft), CollectAlternatives);

        draft.set_alternatives(vec!["A".into(), "B".into()]).unwrap();
        draft.set_states(vec!["S1".into(), "S2".into()]).unwrap();
        draft
            .set_payoffs(vec![vec![dec!(1), dec!(2)], vec![dec!(3), dec!(4)]])
            .unwrap();
        assert_eq!(next_open_stage(&draft), CollectAlpha);

        draft.set_alpha(dec!(0.5)).unwrap();
        assert_eq!(next_open_stage(&draft), Confirm);
        assert!(draft.has(Slot::Alpha));

        draft.set_criterion(Criterion::Evpi);
        assert_eq!(next_open_stage(&draft), CollectProbabilities);
    }
}
