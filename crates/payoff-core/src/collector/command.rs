//! スラッシュコマンド
//!
//! ```text
//! /reset
//! /normalize
//! /set <slot>=<value>              /set alpha value=0.5
//! /set payoff alt="A" state="S1" value=10
//! /set probability state="S1" value=0.5
//! /add alternative "X"             /remove state "Boom"
//! ```

use crate::domain::Slot;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Reset,
    Normalize,
    Set {
        slot: Slot,
        value: String,
    },
    SetPayoff {
        alternative: String,
        state: String,
        value: String,
    },
    SetProbability {
        state: String,
        value: String,
    },
    AddAlternative(String),
    RemoveAlternative(String),
    AddState(String),
    RemoveState(String),
    /// `/` で始まるが解釈できないコマンド
    Unknown(String),
}

/// `input` をコマンドとしてパース。`None` はそもそもコマンドではない
pub fn parse(input: &str) -> Option<Command> {
    let body = input.trim().strip_prefix('/')?;
    let (name, rest) = split_word(body);
    let unknown = || Command::Unknown(input.trim().to_string());

    let command = match name.to_lowercase().as_str() {
        "reset" => Command::Reset,
        "normalize" | "normalise" => Command::Normalize,
        "set" => parse_set(rest).unwrap_or_else(unknown),
        "add" => match parse_target(rest) {
            Some((Target::Alternative, label)) => Command::AddAlternative(label),
            Some((Target::State, label)) => Command::AddState(label),
            None => unknown(),
        },
        "remove" | "delete" => match parse_target(rest) {
            Some((Target::Alternative, label)) => Command::RemoveAlternative(label),
            Some((Target::State, label)) => Command::RemoveState(label),
            None => unknown(),
        },
        _ => unknown(),
    };
    Some(command)
}

fn parse_set(rest: &str) -> Option<Command> {
    let (head, tail) = split_key(rest);
    let tail = tail.trim_start();

    if let Some(value) = tail.strip_prefix('=') {
        let slot: Slot = head.parse().ok()?;
        let value = unquote(value.trim());
        return (!value.is_empty()).then(|| Command::Set {
            slot,
            value: value.to_string(),
        });
    }

    let pairs = key_values(tail)?;
    let get = |key: &str| {
        pairs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.clone())
    };

    match head.to_lowercase().as_str() {
        "payoff" | "payoffs" | "cell" => Some(Command::SetPayoff {
            alternative: get("alt").or_else(|| get("alternative"))?,
            state: get("state")?,
            value: get("value")?,
        }),
        "probability" | "probabilities" | "prob" => Some(Command::SetProbability {
            state: get("state")?,
            value: get("value")?,
        }),
        other => Some(Command::Set {
            slot: other.parse().ok()?,
            value: get("value")?,
        }),
    }
}

enum Target {
    Alternative,
    State,
}

fn parse_target(rest: &str) -> Option<(Target, String)> {
    let (kind, label) = split_word(rest);
    let target = match kind.to_lowercase().as_str() {
        "alternative" | "alternatives" | "option" | "alt" => Target::Alternative,
        "state" | "states" | "scenario" => Target::State,
        _ => return None,
    };
    let label = unquote(label.trim());
    (!label.is_empty()).then(|| (target, label.to_string()))
}

/// 空白区切りの最初の語と残り
fn split_word(text: &str) -> (&str, &str) {
    let text = text.trim_start();
    match text.find(char::is_whitespace) {
        Some(end) => (&text[..end], &text[end..]),
        None => (text, ""),
    }
}

/// 先頭の識別子（英数字と `_`）と残り
fn split_key(text: &str) -> (&str, &str) {
    let text = text.trim_start();
    let end = text
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(text.len());
    (&text[..end], &text[end..])
}

fn unquote(text: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = text
            .strip_prefix(quote)
            .and_then(|inner| inner.strip_suffix(quote))
        {
            return inner.trim();
        }
    }
    text
}

/// `key=value key2="quoted value"` の組。それ以外が混じれば `None`
fn key_values(text: &str) -> Option<Vec<(String, String)>> {
    let mut pairs = Vec::new();
    let mut rest = text.trim();
    while !rest.is_empty() {
        let (key, after) = split_key(rest);
        let after = after.trim_start().strip_prefix('=')?.trim_start();
        if key.is_empty() {
            return None;
        }

        let (value, remaining) = match after.chars().next() {
            Some(quote @ ('"' | '\'')) => {
                let inner = &after[1..];
                let end = inner.find(quote)?;
                (&inner[..end], &inner[end + 1..])
            }
            _ => {
                let end = after.find(char::is_whitespace).unwrap_or(after.len());
                (&after[..end], &after[end..])
            }
        };
        pairs.push((key.to_string(), value.trim().to_string()));
        rest = remaining.trim_start();
    }
    Some(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn set(slot: Slot, value: &str) -> Command {
        Command::Set {
            slot,
            value: value.to_string(),
        }
    }

    #[test]
    fn plain_text_is_not_a_command() {
        assert_eq!(parse("A, B, C"), None);
        assert_eq!(parse("  run "), None);
    }

    #[rstest]
    #[case::reset("/reset", Command::Reset)]
    #[case::reset_upper("  /RESET ", Command::Reset)]
    #[case::normalize("/normalize probabilities", Command::Normalize)]
    #[case::criterion("/set criterion=EMV", set(Slot::Criterion, "EMV"))]
    #[case::spaced("/set criterion = minimax regret", set(Slot::Criterion, "minimax regret"))]
    #[case::context(r#"/set context="Choosing a vendor""#, set(Slot::Context, "Choosing a vendor"))]
    #[case::alternatives("/set alternatives=[A, B, C]", set(Slot::Alternatives, "[A, B, C]"))]
    #[case::payoffs("/set payoffs=100,0; 50,50", set(Slot::Payoffs, "100,0; 50,50"))]
    #[case::alpha_pair("/set alpha value=0.5", set(Slot::Alpha, "0.5"))]
    #[case::alpha_eq("/set alpha=0.5", set(Slot::Alpha, "0.5"))]
    fn parses_commands(#[case] input: &str, #[case] expected: Command) {
        assert_eq!(parse(input), Some(expected));
    }

    #[test]
    fn parses_cell_commands() {
        assert_eq!(
            parse(r#"/set payoff alt="Gold Bar" state='Boom' value=-10.5"#),
            Some(Command::SetPayoff {
                alternative: "Gold Bar".into(),
                state: "Boom".into(),
                value: "-10.5".into(),
            })
        );
        assert_eq!(
            parse(r#"/set probability state="S1" value=0.5"#),
            Some(Command::SetProbability {
                state: "S1".into(),
                value: "0.5".into(),
            })
        );
    }

    #[rstest]
    #[case::add_alt(r#"/add alternative "Bonds""#, Command::AddAlternative("Bonds".into()))]
    #[case::add_state("/add state Recession", Command::AddState("Recession".into()))]
    #[case::remove_alt("/remove alternative 'Gold'", Command::RemoveAlternative("Gold".into()))]
    #[case::remove_state(r#"/remove state "Market Boom""#, Command::RemoveState("Market Boom".into()))]
    fn parses_structural_commands(#[case] input: &str, #[case] expected: Command) {
        assert_eq!(parse(input), Some(expected));
    }

    #[rstest]
    #[case::unknown_verb("/frobnicate")]
    #[case::unknown_slot("/set colour=red")]
    #[case::empty_value("/set alpha=")]
    #[case::cell_missing_state(r#"/set payoff alt="A" value=1"#)]
    #[case::unterminated(r#"/set payoff alt="A state="S" value=1"#)]
    #[case::add_nothing("/add alternative")]
    fn malformed_commands_are_unknown(#[case] input: &str) {
        assert!(matches!(parse(input), Some(Command::Unknown(raw)) if raw == input.trim()));
    }
}
