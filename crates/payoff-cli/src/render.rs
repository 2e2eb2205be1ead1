//! 会話出力のターミナル描画

use payoff_core::domain::decimal;
use payoff_core::domain::{DecisionResult, Role, Turn};

/// `history` の先頭 `seen` 件より後に追加されたアシスタントのターン
pub fn new_replies(history: &[Turn], seen: usize) -> impl Iterator<Item = &str> {
    history
        .iter()
        .skip(seen)
        .filter(|turn| turn.role == Role::Assistant)
        .map(|turn| turn.content.as_str())
}

/// 表示用に `places` 桁へ丸めたスコア表
pub fn score_table(result: &DecisionResult, places: u32) -> String {
    let width = result
        .values
        .iter()
        .map(|score| score.alternative.chars().count())
        .max()
        .unwrap_or(0)
        .max("Alternative".len());

    let mut out = format!("{:<width$}  Score\n", "Alternative");
    for score in &result.values {
        let shown = decimal::parse_exact(&score.score)
            .map(|value| decimal::display(value, places))
            .unwrap_or_else(|_| score.score.clone());
        let marker = if score.alternative == result.recommended_alternative {
            "  *"
        } else {
            ""
        };
        out.push_str(&format!("{:<width$}  {shown}{marker}\n", score.alternative));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use payoff_core::domain::{Criterion, DecisionProblem};

    fn laplace_thirds() -> DecisionResult {
        let problem = DecisionProblem {
            criterion: Criterion::Laplace,
            alternatives: vec!["Build".into(), "Buy".into()],
            states: vec!["Low".into(), "Mid".into(), "High".into()],
            payoffs: vec![
                vec![1.into(), 0.into(), 0.into()],
                vec![0.into(), 0.into(), 0.into()],
            ],
            probabilities: None,
            alpha: None,
        };
        payoff_core::compute(&problem).unwrap()
    }

    #[test]
    fn table_rounds_and_marks_the_winner() {
        let table = score_table(&laplace_thirds(), 2);
        assert_eq!(
            table,
            "Alternative  Score\nBuild        0.33  *\nBuy          0.00\n"
        );
    }

    #[test]
    fn only_new_assistant_turns_are_replayed() {
        let history = vec![
            Turn::assistant("old"),
            Turn::user("hi"),
            Turn::assistant("new"),
        ];
        let replies: Vec<&str> = new_replies(&history, 1).collect();
        assert_eq!(replies, vec!["new"]);
    }
}
