//! 対話型コレクタの状態機械
//!
//! [`ConversationState`] はただの値。ユーザーのターンは [`accept`]（または
//! [`transition`]）に入り、新しい状態が出てくる。永続化と計算呼び出しは
//! 呼び出し側が適用する副作用。
//!
//! # 計算のハンドシェイク
//! 1. ユーザーが確定すると `accept` は [`Stage::Compute`] の状態を返す
//! 2. 呼び出し側が [`ConversationState::pending_problem`] でエンジンを実行
//! 3. [`resolve`] が結果を取り込む。成功なら RESULT、失敗なら CONFIRM
//!
//! COMPUTE の間、`accept` は [`Busy`] で入力を拒否する。

pub mod command;
pub mod flow;
pub mod input;
pub mod prompt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::decimal::{self, Decimal};
use crate::domain::{
    Criterion, DecisionError, DecisionProblem, DecisionResult, ProblemDraft, Slot, Stage, Turn,
};
use crate::engine;

use self::command::Command;

/// 現在のターンの計算が未完了のうちに入力が来た
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("a computation is in progress; wait for it to finish")]
pub struct Busy;

/// 1 つの会話
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationState {
    pub stage: Stage,
    /// ここまでの問題。未入力のスロットは無い
    pub context: ProblemDraft,
    /// 追記のみのターンログ
    pub history: Vec<Turn>,
    /// RESULT のときだけ存在
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<DecisionResult>,
    /// 1 ターンずつ入力された未確定のペイオフ行
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pending_rows: Vec<Vec<Decimal>>,
    /// 合計が合わず却下された直近の確率ベクトル。`/normalize` が使う
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejected_probabilities: Option<Vec<Decimal>>,
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new()
    }
}

/// ユーザーのターンを最後まで実行し、確定ならローカルで計算
///
/// すでに COMPUTE の状態は先に解決するので、[`Busy`] は返さない。
pub fn transition(state: &ConversationState, input: &str) -> ConversationState {
    let settled = if state.is_busy() {
        resolve_locally(state)
    } else {
        state.clone()
    };
    match accept(&settled, input) {
        Ok(next) if next.is_busy() => resolve_locally(&next),
        Ok(next) => next,
        Err(Busy) => settled,
    }
}

fn resolve_locally(state: &ConversationState) -> ConversationState {
    let outcome = state
        .pending_problem()
        .and_then(|problem| engine::compute(&problem));
    resolve(state, outcome)
}

/// ユーザーのターンを 1 つ適用
pub fn accept(state: &ConversationState, input: &str) -> Result<ConversationState, Busy> {
    if state.is_busy() {
        return Err(Busy);
    }
    let text = input.trim();

    let command = command::parse(text);
    if command == Some(Command::Reset) {
        debug!(from = ?state.stage, "conversation reset");
        return Ok(ConversationState::new());
    }

    let mut next = state.clone();
    next.history.push(Turn::user(text));
    let reply = match command {
        Some(command) => next.apply_command(command),
        None => next.answer(text),
    };
    next.history.push(Turn::assistant(reply));

    debug!(from = ?state.stage, to = ?next.stage, "transition");
    Ok(next)
}

/// COMPUTE 中の状態にエンジンの結果を取り込む
pub fn resolve(
    state: &ConversationState,
    outcome: Result<DecisionResult, DecisionError>,
) -> ConversationState {
    let mut next = state.clone();
    if !state.is_busy() {
        warn!(stage = ?state.stage, "compute outcome arrived outside COMPUTE; ignored");
        return next;
    }
    match outcome {
        Ok(result) => {
            debug!(recommended = %result.recommended_alternative, "compute succeeded");
            next.history.push(Turn::assistant(result.trace.clone()));
            next.result = Some(result);
            next.stage = Stage::Result;
        }
        Err(error) => {
            warn!(%error, "compute failed; back to CONFIRM");
            next.history.push(Turn::assistant(prompt::compute_failed(&error)));
            next.stage = Stage::Confirm;
        }
    }
    next
}

impl ConversationState {
    /// 初期状態。COLLECT_CRITERION で、何も収集しておらず履歴も空
    pub fn new() -> Self {
        Self {
            stage: Stage::CollectCriterion,
            context: ProblemDraft::new(),
            history: Vec::new(),
            result: None,
            pending_rows: Vec::new(),
            rejected_probabilities: None,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.stage == Stage::Compute
    }

    /// エンジンに渡す確定済みの問題
    pub fn pending_problem(&self) -> Result<DecisionProblem, DecisionError> {
        self.context.to_problem()
    }

    /// アシスタントが現在答えを待っている質問
    pub fn current_prompt(&self) -> String {
        if self.history.is_empty() && self.stage == Stage::CollectCriterion {
            return prompt::welcome();
        }
        prompt::ask(self.stage, &self.context, self.pending_rows.len())
    }

    /// ストレージから読み戻した状態を検査
    ///
    /// - draft 自体が整合していること
    /// - 入力途中の行と記憶している却下ベクトルが次元に合うこと
    /// - 結果を持つのは RESULT のときだけ
    pub fn validate(&self) -> Result<(), DecisionError> {
        self.context.validate()?;
        if !self.pending_rows.is_empty() {
            let (rows, cols) = self.context.dimensions().ok_or_else(|| {
                DecisionError::validation("payoffs", "pending rows without alternatives and states")
            })?;
            if self.pending_rows.len() >= rows || self.pending_rows.iter().any(|row| row.len() != cols) {
                return Err(DecisionError::validation(
                    "payoffs",
                    "pending rows do not match the labels",
                ));
            }
        }
        if let Some(values) = &self.rejected_probabilities
            && Some(values.len()) != self.context.states().map(<[String]>::len)
        {
            return Err(DecisionError::validation(
                "probabilities",
                "remembered probabilities do not match the states",
            ));
        }
        if self.result.is_some() && self.stage != Stage::Result {
            return Err(DecisionError::validation("result", "result held outside RESULT"));
        }
        Ok(())
    }

    /// 復元した状態を続行できる形にする
    ///
    /// 再起動をまたいで計算は残らないので COMPUTE は CONFIRM に巻き戻す。
    /// 結果の無い RESULT も同様。
    pub fn recovered(mut self) -> Self {
        let orphaned = self.stage == Stage::Compute
            || (self.stage == Stage::Result && self.result.is_none());
        if orphaned {
            warn!(stage = ?self.stage, "rewinding restored conversation to CONFIRM");
            self.stage = Stage::Confirm;
            self.result = None;
            self.history.push(Turn::assistant(prompt::interrupted()));
        }
        self
    }

    // ========================================
    // 自由入力
    // ========================================

    fn answer(&mut self, text: &str) -> String {
        match self.stage {
            Stage::CollectCriterion => match Criterion::recognize(text) {
                Some(criterion) => {
                    self.context.set_criterion(criterion);
                    self.advance(format!(
                        "Criterion set to **{}**.",
                        criterion.friendly_name()
                    ))
                }
                None => format!(
                    "I didn't recognize an approach in that. {}",
                    prompt::ask(Stage::CollectCriterion, &self.context, 0)
                ),
            },
            Stage::CollectAlternatives => {
                let labels = input::parse_labels(text);
                let count = labels.len();
                match self.context.set_alternatives(labels) {
                    Ok(()) => {
                        self.pending_rows.clear();
                        self.advance(format!("Registered {count} alternatives."))
                    }
                    Err(error) => self.reject(&error),
                }
            }
            Stage::CollectStates => {
                let labels = input::parse_labels(text);
                let count = labels.len();
                match self.context.set_states(labels) {
                    Ok(()) => {
                        self.pending_rows.clear();
                        self.rejected_probabilities = None;
                        self.advance(format!("Registered {count} states."))
                    }
                    Err(error) => self.reject(&error),
                }
            }
            Stage::CollectPayoffs => self.answer_payoffs(text),
            Stage::CollectProbabilities => match input::parse_row(text, "probabilities") {
                Ok(values) => self.commit_probabilities(values),
                Err(error) => self.reject(&error),
            },
            Stage::CollectAlpha => {
                let committed = input::parse_scalar(text, "alpha")
                    .and_then(|alpha| self.context.set_alpha(alpha));
                match committed {
                    Ok(()) => self.advance("Alpha recorded.".to_string()),
                    Err(error) => self.reject(&error),
                }
            }
            Stage::Confirm => self.answer_confirm(text),
            // `accept` は busy 中の入力を拒否するのでここには来ない
            Stage::Compute => prompt::ask(Stage::Compute, &self.context, 0),
            Stage::Result => self.answer_result(text),
        }
    }

    fn answer_payoffs(&mut self, text: &str) -> String {
        if input::is_matrix(text) {
            let committed = input::parse_matrix(text)
                .and_then(|matrix| self.context.set_payoffs(matrix));
            return match committed {
                Ok(()) => {
                    self.pending_rows.clear();
                    self.advance("Payoffs recorded.".to_string())
                }
                Err(error) => self.reject(&error),
            };
        }

        let Some((rows, cols)) = self.context.dimensions() else {
            return self.reject(&DecisionError::validation(
                "payoffs",
                "alternatives and states must be set first",
            ));
        };
        let row = match input::parse_row(text, "payoffs") {
            Ok(row) if row.len() == cols => row,
            Ok(row) => {
                let alternative = self
                    .context
                    .alternatives()
                    .and_then(|labels| labels.get(self.pending_rows.len()))
                    .cloned()
                    .unwrap_or_default();
                return self.reject(&DecisionError::validation(
                    "payoffs",
                    format!(
                        "expected {cols} numbers for {alternative:?}, got {}",
                        row.len()
                    ),
                ));
            }
            Err(error) => return self.reject(&error),
        };

        self.pending_rows.push(row);
        if self.pending_rows.len() < rows {
            return prompt::ask(Stage::CollectPayoffs, &self.context, self.pending_rows.len());
        }
        let matrix = std::mem::take(&mut self.pending_rows);
        match self.context.set_payoffs(matrix) {
            Ok(()) => self.advance("Payoffs recorded.".to_string()),
            Err(error) => self.reject(&error),
        }
    }

    fn answer_confirm(&mut self, text: &str) -> String {
        let lowered = text.to_lowercase();
        match lowered.as_str() {
            "run" | "yes" | "y" | "compute" | "confirm" | "go" => match self.pending_problem() {
                Ok(_) => {
                    self.stage = Stage::Compute;
                    prompt::ask(Stage::Compute, &self.context, 0)
                }
                Err(error) => {
                    self.stage = flow::next_open_stage(&self.context);
                    format!(
                        "{}\n\n{}",
                        prompt::explain(&error),
                        prompt::ask(self.stage, &self.context, self.pending_rows.len())
                    )
                }
            },
            "cancel" | "no" | "n" => {
                self.context = ProblemDraft::new();
                self.pending_rows.clear();
                self.rejected_probabilities = None;
                self.stage = Stage::CollectCriterion;
                format!(
                    "Cancelled. Let's start a new problem. {}",
                    prompt::ask(Stage::CollectCriterion, &self.context, 0)
                )
            }
            _ => match edit_target(&lowered) {
                Some(target) => self.edit(target),
                None => prompt::summary(&self.context),
            },
        }
    }

    fn answer_result(&mut self, text: &str) -> String {
        self.result = None;
        let lowered = text.to_lowercase();
        if let Some(target) = edit_target(&lowered) {
            self.stage = Stage::Confirm;
            return self.edit(target);
        }
        if let Some(criterion) = Criterion::recognize(text) {
            self.context.set_criterion(criterion);
            self.stage = flow::next_open_stage(&self.context);
            return format!(
                "Switched to **{}**.\n\n{}",
                criterion.friendly_name(),
                prompt::ask(self.stage, &self.context, self.pending_rows.len())
            );
        }
        self.stage = Stage::Confirm;
        prompt::summary(&self.context)
    }

    /// 入力済みスロットを保ったまま `target` の収集ステージへ移る
    fn edit(&mut self, target: Result<Slot, String>) -> String {
        let slot = match target {
            Ok(slot) => slot,
            Err(name) => return format!("There is no slot called {name:?}. {}", prompt::HELP),
        };
        let applicable = match (slot, self.context.criterion()) {
            (Slot::Probabilities, Some(criterion)) => criterion.requires_probabilities(),
            (Slot::Alpha, Some(criterion)) => criterion.requires_alpha(),
            _ => true,
        };
        match Stage::for_slot(slot) {
            Some(stage) if applicable => {
                if slot == Slot::Payoffs {
                    self.pending_rows.clear();
                }
                self.result = None;
                self.stage = stage;
                prompt::ask(stage, &self.context, 0)
            }
            Some(_) => format!("**{slot}** isn't used by the current approach."),
            None => "Use `/set context=\"...\"` to change the description.".to_string(),
        }
    }

    // ========================================
    // コマンド
    // ========================================

    fn apply_command(&mut self, command: Command) -> String {
        let outcome = match command {
            // ターンを記録する前に `accept` が処理する
            Command::Reset => return prompt::welcome(),
            Command::Normalize => return self.normalize(),
            Command::Set { slot, value } => self.set_slot(slot, &value).map(|ack| (slot, ack)),
            Command::SetPayoff {
                alternative,
                state,
                value,
            } => input::parse_scalar(&value, "payoff")
                .and_then(|v| self.context.set_payoff_cell(&alternative, &state, v).map(|()| v))
                .map(|v| {
                    (
                        Slot::Payoffs,
                        format!(
                            "Updated payoff for {alternative} in {state} to {}.",
                            decimal::canonical(v)
                        ),
                    )
                }),
            Command::SetProbability { state, value } => {
                return self.set_probability_cell(&state, &value);
            }
            Command::AddAlternative(label) => self
                .context
                .add_alternative(&label)
                .map(|()| (Slot::Alternatives, format!("Added alternative {label:?}."))),
            Command::RemoveAlternative(label) => self
                .context
                .remove_alternative(&label)
                .map(|()| (Slot::Alternatives, format!("Removed alternative {label:?}."))),
            Command::AddState(label) => self
                .context
                .add_state(&label)
                .map(|()| (Slot::States, format!("Added state {label:?}."))),
            Command::RemoveState(label) => self
                .context
                .remove_state(&label)
                .map(|()| (Slot::States, format!("Removed state {label:?}."))),
            Command::Unknown(raw) => {
                return format!("I don't know the command `{raw}`.\n{}", prompt::HELP);
            }
        };

        match outcome {
            Ok((slot, ack)) => {
                if matches!(slot, Slot::Alternatives | Slot::States | Slot::Payoffs) {
                    self.pending_rows.clear();
                }
                if slot == Slot::States {
                    self.rejected_probabilities = None;
                }
                self.settle(slot, ack)
            }
            Err(error) => self.reject(&error),
        }
    }

    /// `/set <slot>=<value>`。収集ステージと同じ検証を行う
    fn set_slot(&mut self, slot: Slot, value: &str) -> Result<String, DecisionError> {
        match slot {
            Slot::Criterion => {
                let criterion = Criterion::recognize(value).ok_or_else(|| {
                    DecisionError::parse("criterion", format!("unknown criterion {value:?}"))
                })?;
                self.context.set_criterion(criterion);
                Ok(format!("Criterion set to **{}**.", criterion.friendly_name()))
            }
            Slot::Context => {
                self.context.set_context(value);
                Ok("Context updated.".to_string())
            }
            Slot::Alternatives => {
                self.context.set_alternatives(input::parse_labels(value))?;
                Ok("Alternatives updated.".to_string())
            }
            Slot::States => {
                self.context.set_states(input::parse_labels(value))?;
                Ok("States updated.".to_string())
            }
            Slot::Payoffs => {
                self.context.set_payoffs(input::parse_matrix(value)?)?;
                Ok("Payoffs updated.".to_string())
            }
            Slot::Probabilities => {
                let values = input::parse_row(value, "probabilities")?;
                self.try_probabilities(values)?;
                Ok("Probabilities updated.".to_string())
            }
            Slot::Alpha => {
                self.context.set_alpha(input::parse_scalar(value, "alpha")?)?;
                Ok("Alpha updated.".to_string())
            }
        }
    }

    /// 確率ベクトルを確定。合計だけが誤りなら `/normalize` 用に記憶する
    fn try_probabilities(&mut self, values: Vec<Decimal>) -> Result<(), DecisionError> {
        match self.context.set_probabilities(values.clone()) {
            Ok(()) => {
                self.rejected_probabilities = None;
                Ok(())
            }
            Err(error) => {
                let cols = self.context.states().map(<[String]>::len);
                let normalizable = Some(values.len()) == cols
                    && values.iter().all(|v| !v.is_sign_negative() || v.is_zero());
                self.rejected_probabilities = normalizable.then_some(values);
                Err(error)
            }
        }
    }

    fn commit_probabilities(&mut self, values: Vec<Decimal>) -> String {
        match self.try_probabilities(values.clone()) {
            Ok(()) => self.advance("Probabilities recorded.".to_string()),
            Err(error) if self.rejected_probabilities.is_some() => {
                prompt::probabilities_rejected(&error, &values)
            }
            Err(error) => self.reject(&error),
        }
    }

    /// `/set probability state="S" value=p`
    ///
    /// 却下済みベクトルがあればそちらに適用するので、複数のセルを順に直せる。
    fn set_probability_cell(&mut self, state: &str, value: &str) -> String {
        let values = match self.edited_probabilities(state, value) {
            Ok(values) => values,
            Err(error) => return self.reject(&error),
        };
        match self.try_probabilities(values.clone()) {
            Ok(()) => self.settle(Slot::Probabilities, "Probabilities updated.".to_string()),
            Err(error) if self.rejected_probabilities.is_some() => {
                prompt::probabilities_rejected(&error, &values)
            }
            Err(error) => self.reject(&error),
        }
    }

    fn edited_probabilities(&self, state: &str, value: &str) -> Result<Vec<Decimal>, DecisionError> {
        let index = self.context.state_index(state)?;
        let value = input::parse_scalar(value, "probability")?;
        let mut values = self
            .rejected_probabilities
            .clone()
            .or_else(|| self.context.probabilities().map(<[Decimal]>::to_vec))
            .ok_or_else(|| {
                DecisionError::validation("probabilities", "enter the probabilities first")
            })?;
        let cell = values.get_mut(index).ok_or_else(|| {
            DecisionError::validation("probabilities", "re-enter the probabilities for every state")
        })?;
        *cell = value;
        Ok(values)
    }

    fn normalize(&mut self) -> String {
        let Some(values) = self.rejected_probabilities.clone() else {
            return "There are no rejected probabilities to normalize.".to_string();
        };
        let committed = input::normalize(&values).and_then(|scaled| {
            self.context.set_probabilities(scaled.clone())?;
            Ok(scaled)
        });
        match committed {
            Ok(scaled) => {
                self.rejected_probabilities = None;
                self.settle(Slot::Probabilities, prompt::normalized(&scaled))
            }
            Err(error) => self.reject(&error),
        }
    }

    // ========================================
    // ステージ移動
    // ========================================

    /// 現在ステージのスロット確定後、ルート上の最初の未入力ステージへ移る
    fn advance(&mut self, ack: String) -> String {
        self.result = None;
        self.stage = flow::next_open_stage(&self.context);
        format!(
            "{ack}\n\n{}",
            prompt::ask(self.stage, &self.context, self.pending_rows.len())
        )
    }

    /// コマンドが `slot` に触れた後の遷移
    ///
    /// - CONFIRM/RESULT からは最初の未入力ステージへ（draft が揃っていれば CONFIRM）
    /// - 収集ステージでは、そのスロットが埋まったかステージがルートから外れた場合だけ動く
    fn settle(&mut self, slot: Slot, ack: String) -> String {
        self.result = None;
        let current = self.stage;
        let open = flow::next_open_stage(&self.context);
        let off_route = self
            .context
            .criterion()
            .is_some_and(|criterion| !flow::on_route(current, criterion));
        let filled_current = current.slot() == Some(slot) && self.context.has(slot);

        self.stage = match current {
            Stage::Confirm | Stage::Result => open,
            _ if off_route || filled_current => open,
            _ => current,
        };

        if self.stage != current || self.stage == Stage::Confirm {
            format!(
                "{ack}\n\n{}",
                prompt::ask(self.stage, &self.context, self.pending_rows.len())
            )
        } else {
            ack
        }
    }

    /// 却下した入力を説明する。draft とステージは変えない
    fn reject(&self, error: &DecisionError) -> String {
        debug!(stage = ?self.stage, %error, "input rejected");
        let reminder = match self.stage {
            Stage::Confirm | Stage::Result => return prompt::explain(error),
            stage => prompt::ask(stage, &self.context, self.pending_rows.len()),
        };
        format!("{}\n\n{reminder}", prompt::explain(error))
    }
}

/// `edit <slot>` の解釈
///
/// `Some(Ok(slot))`、未知のスロットなら `Some(Err(name))`、編集要求でなければ `None`。
fn edit_target(lowered: &str) -> Option<Result<Slot, String>> {
    let rest = lowered.strip_prefix("edit")?;
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let name = rest.trim();
    Some(name.parse::<Slot>().map_err(|_| name.to_string()))
}
