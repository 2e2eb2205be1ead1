//! State - 会話のステージとチャットのターン

use serde::{Deserialize, Serialize};

use super::problem::Slot;

/// collector のステージ
///
/// variant の順序が会話の順序で、`Ord` もそれに従う。
///
/// # ルート
/// - CollectCriterion -> CollectAlternatives -> CollectStates -> CollectPayoffs
/// - CollectPayoffs -> CollectProbabilities (EMV, EVPI) -> Confirm
/// - CollectPayoffs -> CollectAlpha (HURWICZ) -> Confirm
/// - CollectPayoffs -> Confirm（その他）
/// - Confirm -> Compute -> Result（失敗時は Confirm に戻る）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    CollectCriterion,
    CollectAlternatives,
    CollectStates,
    CollectPayoffs,
    CollectProbabilities,
    CollectAlpha,
    Confirm,
    /// ユーザー入力のステージではない。現在のターンのエンジン呼び出しが未完了
    Compute,
    Result,
}

impl Stage {
    /// 収集ステージが埋めるスロット
    pub fn slot(self) -> Option<Slot> {
        match self {
            Stage::CollectCriterion => Some(Slot::Criterion),
            Stage::CollectAlternatives => Some(Slot::Alternatives),
            Stage::CollectStates => Some(Slot::States),
            Stage::CollectPayoffs => Some(Slot::Payoffs),
            Stage::CollectProbabilities => Some(Slot::Probabilities),
            Stage::CollectAlpha => Some(Slot::Alpha),
            Stage::Confirm | Stage::Compute | Stage::Result => None,
        }
    }

    /// スロットに対応する収集ステージ。`Context` には無い
    pub fn for_slot(slot: Slot) -> Option<Stage> {
        match slot {
            Slot::Criterion => Some(Stage::CollectCriterion),
            Slot::Alternatives => Some(Stage::CollectAlternatives),
            Slot::States => Some(Stage::CollectStates),
            Slot::Payoffs => Some(Stage::CollectPayoffs),
            Slot::Probabilities => Some(Stage::CollectProbabilities),
            Slot::Alpha => Some(Stage::CollectAlpha),
            Slot::Context => None,
        }
    }

    pub fn is_collecting(self) -> bool {
        self.slot().is_some()
    }
}

/// ターンの話者
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// チャットのターン 1 つ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_are_totally_ordered() {
        assert!(Stage::CollectCriterion < Stage::CollectAlternatives);
        assert!(Stage::CollectAlpha < Stage::Confirm);
        assert!(Stage::Compute < Stage::Result);
    }

    #[test]
    fn slot_mapping_is_inverse() {
        for stage in [
            Stage::CollectCriterion,
            Stage::CollectAlternatives,
            Stage::CollectStates,
            Stage::CollectPayoffs,
            Stage::CollectProbabilities,
            Stage::CollectAlpha,
        ] {
            let slot = stage.slot().unwrap();
            assert_eq!(Stage::for_slot(slot), Some(stage));
        }
        assert_eq!(Stage::for_slot(Slot::Context), None);
        assert!(!Stage::Confirm.is_collecting());
    }

    #[test]
    fn turn_serializes_role_lowercase() {
        let v = serde_json::to_value(Turn::assistant("hi")).unwrap();
        assert_eq!(v["role"], "assistant");
        let s = serde_json::to_string(&Stage::CollectPayoffs).unwrap();
        assert_eq!(s, "\"COLLECT_PAYOFFS\"");
    }
}
