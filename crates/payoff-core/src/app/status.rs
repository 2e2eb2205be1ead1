//! Status - 会話の現在地を 1 行で表示

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::collector::ConversationState;
use crate::domain::{Criterion, Slot, Stage};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    pub stage: Stage,
    pub criterion: Option<Criterion>,
    pub busy: bool,
    pub turns: usize,
    pub has_result: bool,
    /// CONFIRM までにまだ必要なスロット
    pub missing: Vec<Slot>,
}

impl SessionStatus {
    pub fn of(state: &ConversationState, busy: bool) -> Self {
        Self {
            stage: state.stage,
            criterion: state.context.criterion(),
            busy,
            turns: state.history.len(),
            has_result: state.result.is_some(),
            missing: state.context.missing(),
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stage={:?}", self.stage)?;
        if let Some(criterion) = self.criterion {
            write!(f, " criterion={criterion}")?;
        }
        write!(f, " turns={}", self.turns)?;
        if self.busy {
            f.write_str(" busy")?;
        }
        if !self.missing.is_empty() {
            let names: Vec<String> = self.missing.iter().map(|slot| slot.to_string()).collect();
            write!(f, " missing=[{}]", names.join(", "))?;
        }
        Ok(())
    }
}
