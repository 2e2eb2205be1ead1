//! Errors - エンジンと collector で共有するエラー分類
//!
//! どれも会話にとって致命的ではない。collector はすべてをアシスタントの
//! ターンに変え、状態機械を修正可能なステージに残す。

use serde::{Deserialize, Serialize};

use super::decimal::DecimalError;

/// ErrorKind は呼び出し側のために [`DecisionError`] を分類
///
/// - Input: スロット入力が不正（その場で再質問）
/// - Compute: エンジン内部の演算失敗（CONFIRM に戻る）
/// - Transport: 計算境界に到達できない（CONFIRM に戻る）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Input,
    Compute,
    Transport,
}

/// DecisionError はドメインエラー
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DecisionError {
    #[error("could not read {field}: {message}")]
    Parse { field: String, message: String },

    #[error("invalid {field}: {message}")]
    Validation { field: String, message: String },

    #[error("division by zero")]
    DivisionByZero,

    #[error("arithmetic error: {message}")]
    Arithmetic { message: String },

    #[error("compute engine unavailable: {message}")]
    EngineUnavailable { message: String },
}

impl DecisionError {
    pub fn parse(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::EngineUnavailable {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Parse { .. } | Self::Validation { .. } => ErrorKind::Input,
            Self::DivisionByZero | Self::Arithmetic { .. } => ErrorKind::Compute,
            Self::EngineUnavailable { .. } => ErrorKind::Transport,
        }
    }

    /// 入力エラーの原因フィールド
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Parse { field, .. } | Self::Validation { field, .. } => Some(field),
            _ => None,
        }
    }

    /// 演算層の失敗にフィールドを付ける
    pub fn from_decimal(field: impl Into<String>, error: DecimalError) -> Self {
        match error {
            DecimalError::Parse(input) => {
                Self::parse(field, format!("{input:?} is not a number"))
            }
            other => other.into(),
        }
    }
}

impl From<DecimalError> for DecisionError {
    fn from(error: DecimalError) -> Self {
        match error {
            DecimalError::Parse(input) => Self::parse("value", format!("{input:?} is not a number")),
            DecimalError::DivisionByZero => Self::DivisionByZero,
            DecimalError::Overflow(op) => Self::Arithmetic {
                message: format!("overflow in {op}"),
            },
        }
    }
}
