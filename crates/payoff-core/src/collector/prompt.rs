//! アシスタントのメッセージ

use crate::domain::decimal::{self, Decimal};
use crate::domain::{Criterion, DecisionError, ErrorKind, ProblemDraft, Stage};

pub const STYLE_MENU: &str = "- **Optimistic** (focus on best-case payouts)\n\
- **Conservative** (focus on avoiding the worst)\n\
- **Balanced** (use probabilities / EMV)\n\
- **Regret-Minimizing** (focus on minimizing missed opportunities)\n\
- **Equally Likely** (Laplace), **Hurwicz** (weighted optimism) or **EVPI** (value of information)";

pub fn welcome() -> String {
    format!(
        "Welcome! I'm your Decision Assistant. To help you choose the best option, \
         I need to know your preference. Are you feeling:\n{STYLE_MENU}"
    )
}

pub const HELP: &str = "Commands:\n\
- `/set <slot>=<value>` (criterion, context, alternatives, states, payoffs, probabilities, alpha)\n\
- `/set payoff alt=\"A\" state=\"S1\" value=10`\n\
- `/set probability state=\"S1\" value=0.5`\n\
- `/add alternative \"X\"`, `/remove state \"X\"`\n\
- `/normalize` to rescale rejected probabilities\n\
- `/reset` to start over";

fn join(labels: &[String]) -> String {
    labels.join(", ")
}

fn numbers(values: &[Decimal]) -> String {
    let items: Vec<String> = values.iter().map(|v| decimal::canonical(*v)).collect();
    format!("[{}]", items.join(", "))
}

/// `stage` に入ったときに尋ねる質問
///
/// `rows_done` は 1 行ずつ入力済みのペイオフ行数。
pub fn ask(stage: Stage, draft: &ProblemDraft, rows_done: usize) -> String {
    let states = draft.states().map(join).unwrap_or_default();
    match stage {
        Stage::CollectCriterion => format!("Which approach should I take?\n{STYLE_MENU}"),
        Stage::CollectAlternatives => {
            "List your **alternatives** (options), separated by commas. (e.g. 'Gold, Stocks, Savings')"
                .to_string()
        }
        Stage::CollectStates => {
            "List the **states of nature** (future scenarios), separated by commas. (e.g. 'Market Boom, Market Bust')"
                .to_string()
        }
        Stage::CollectPayoffs => {
            let alternative = draft
                .alternatives()
                .and_then(|labels| labels.get(rows_done))
                .cloned()
                .unwrap_or_default();
            if rows_done == 0 {
                format!(
                    "Enter payoffs for **{alternative}** for [{states}].\n\
                     You can also paste the whole matrix, one row per alternative, rows separated by `;` or new lines."
                )
            } else {
                format!("Saved. Next, enter payoffs for **{alternative}** [{states}].")
            }
        }
        Stage::CollectProbabilities => {
            let name = draft.criterion().map(Criterion::friendly_name).unwrap_or("EMV");
            let count = draft.states().map(<[String]>::len).unwrap_or_default();
            format!(
                "Since you chose **{name}**, I need **probabilities** for the states [{states}].\n\
                 Enter {count} decimal values summing to 1."
            )
        }
        Stage::CollectAlpha => "For the **Hurwicz** approach, I need your **alpha** (optimism coefficient).\n\n\
             - **1.0** is completely optimistic (Maximax)\n\
             - **0.0** is completely conservative (Maximin)\n\
             - **0.5** is exactly in the middle.\n\n\
             What's your alpha? (0 to 1)"
            .to_string(),
        Stage::Confirm => summary(draft),
        Stage::Compute => "Computing...".to_string(),
        Stage::Result => {
            "You can edit the problem with /set commands or `edit <slot>`, or /reset to start over."
                .to_string()
        }
    }
}

/// ここまで収集した内容と確定コマンド
pub fn summary(draft: &ProblemDraft) -> String {
    let mut s = String::from("**Decision Summary**\n\n");
    if let Some(criterion) = draft.criterion() {
        s.push_str(&format!("**Approach**: {}\n", criterion.friendly_name()));
    }
    if let Some(context) = draft.context() {
        s.push_str(&format!("**Context**: {context}\n"));
    }
    if let Some(alpha) = draft.alpha()
        && draft.criterion().is_some_and(Criterion::requires_alpha)
    {
        s.push_str(&format!("**Alpha (α)**: {}\n", decimal::canonical(alpha)));
    }
    if let Some(alternatives) = draft.alternatives() {
        s.push_str(&format!("**Options**: {}\n", join(alternatives)));
    }
    if let Some(states) = draft.states() {
        s.push_str(&format!("**Scenarios**: {}\n", join(states)));
    }
    if let (Some(alternatives), Some(states), Some(payoffs)) =
        (draft.alternatives(), draft.states(), draft.payoffs())
    {
        s.push_str(&format!("\n| Alternative | {} |\n", states.join(" | ")));
        s.push_str(&format!("|---|{}\n", "---|".repeat(states.len())));
        for (label, row) in alternatives.iter().zip(payoffs) {
            let cells: Vec<String> = row.iter().map(|v| decimal::canonical(*v)).collect();
            s.push_str(&format!("| {label} | {} |\n", cells.join(" | ")));
        }
    }
    if let Some(probabilities) = draft.probabilities()
        && draft.criterion().is_some_and(Criterion::requires_probabilities)
    {
        s.push_str(&format!("\n**Probabilities**: {}\n", numbers(probabilities)));
    }
    s.push_str(
        "\nEverything look correct? Type **run** to compute, `edit <slot>` to change something, \
         or **cancel** to start a new problem.",
    );
    s
}

/// 却下した入力の説明
pub fn explain(error: &DecisionError) -> String {
    match error {
        DecisionError::Parse { field, message } => {
            format!("I couldn't read the **{field}**: {message}.")
        }
        DecisionError::Validation { field, message } => {
            format!("That doesn't work for **{field}**: {message}.")
        }
        other => compute_failed(other),
    }
}

/// 失敗した計算の説明。状態機械は CONFIRM に戻っている
pub fn compute_failed(error: &DecisionError) -> String {
    let reason = match error.kind() {
        ErrorKind::Transport => "The compute engine could not be reached",
        ErrorKind::Compute | ErrorKind::Input => "The computation failed",
    };
    format!(
        "{reason} ({error}). Your inputs are kept: type **run** to retry, or edit them first."
    )
}

pub fn probabilities_rejected(error: &DecisionError, values: &[Decimal]) -> String {
    format!(
        "{}\nYou entered {}. Re-enter them, or type **/normalize** to have me rescale them to sum to 1.",
        explain(error),
        numbers(values)
    )
}

pub fn normalized(values: &[Decimal]) -> String {
    format!("Probabilities normalized to sum to 1: {}.", numbers(values))
}

pub fn interrupted() -> String {
    "The previous computation was interrupted. Type **run** to try again.".to_string()
}
