//! 計算境界の DTO
//!
//! リクエストとレスポンスは数値をすべて decimal 文字列で運ぶ。
//! [`Decimal`] へのパースはここで一度だけ行い、失敗時は原因フィールドを示す。

use serde::{Deserialize, Serialize};

use super::criterion::Criterion;
use super::decimal::{self, Decimal};
use super::errors::DecisionError;
use super::problem::DecisionProblem;
use super::result::DecisionResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputeRequest {
    pub criterion: Criterion,
    pub alternatives: Vec<String>,
    pub states: Vec<String>,
    pub payoffs: Vec<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probabilities: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha: Option<String>,
}

/// 計算境界の応答
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ComputeResponse {
    Ok { result: DecisionResult },
    Error { error: DecisionError },
}

impl ComputeResponse {
    pub fn into_result(self) -> Result<DecisionResult, DecisionError> {
        match self {
            ComputeResponse::Ok { result } => Ok(result),
            ComputeResponse::Error { error } => Err(error),
        }
    }
}

impl From<Result<DecisionResult, DecisionError>> for ComputeResponse {
    fn from(outcome: Result<DecisionResult, DecisionError>) -> Self {
        match outcome {
            Ok(result) => ComputeResponse::Ok { result },
            Err(error) => ComputeResponse::Error { error },
        }
    }
}

impl From<&DecisionProblem> for ComputeRequest {
    fn from(problem: &DecisionProblem) -> Self {
        let strings = |values: &[Decimal]| values.iter().map(|v| v.to_string()).collect();
        Self {
            criterion: problem.criterion,
            alternatives: problem.alternatives.clone(),
            states: problem.states.clone(),
            payoffs: problem.payoffs.iter().map(|row| strings(row)).collect(),
            probabilities: problem.probabilities.as_deref().map(strings),
            alpha: problem.alpha.map(|alpha| alpha.to_string()),
        }
    }
}

fn parse_field(field: String, raw: &str) -> Result<Decimal, DecisionError> {
    decimal::parse_exact(raw).map_err(|err| DecisionError::from_decimal(field, err))
}

impl TryFrom<ComputeRequest> for DecisionProblem {
    type Error = DecisionError;

    fn try_from(request: ComputeRequest) -> Result<Self, Self::Error> {
        let payoffs = request
            .payoffs
            .iter()
            .enumerate()
            .map(|(i, row)| {
                row.iter()
                    .enumerate()
                    .map(|(j, raw)| parse_field(format!("payoffs[{i}][{j}]"), raw))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        let probabilities = request
            .probabilities
            .as_ref()
            .map(|values| {
                values
                    .iter()
                    .enumerate()
                    .map(|(i, raw)| parse_field(format!("probabilities[{i}]"), raw))
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;

        let alpha = request
            .alpha
            .as_deref()
            .map(|raw| parse_field("alpha".to_string(), raw))
            .transpose()?;

        Ok(DecisionProblem {
            criterion: request.criterion,
            alternatives: request.alternatives,
            states: request.states,
            payoffs,
            probabilities,
            alpha,
        })
    }
}
