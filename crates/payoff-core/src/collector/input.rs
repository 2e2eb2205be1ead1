//! スロット入力のパース
//!
//! 数値はトークン単位で [`decimal::parse_lenient`] を通すので、
//! 会話的な `₹1200` や `60%` が二進浮動小数点を経由することはない。

use crate::domain::decimal::{self, Decimal};
use crate::domain::DecisionError;

/// カンマまたは改行区切りのラベル（`[...]` や引用符は任意）
///
/// 空の要素は捨てる。検証は draft に任せる。
pub fn parse_labels(text: &str) -> Vec<String> {
    let text = text.trim();
    let text = text
        .strip_prefix('[')
        .and_then(|inner| inner.strip_suffix(']'))
        .unwrap_or(text);
    text.split([',', '\n', ';'])
        .map(|item| item.trim().trim_matches(['"', '\'']).trim())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// カンマ・タブ・空白で区切られた 1 行の数値
pub fn parse_row(text: &str, field: &str) -> Result<Vec<Decimal>, DecisionError> {
    let values = text
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| {
            decimal::parse_lenient(token)
                .map_err(|_| DecisionError::parse(field, format!("{token:?} is not a number")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if values.is_empty() {
        return Err(DecisionError::parse(field, "no numbers found"));
    }
    Ok(values)
}

/// 行列全体。行は `;` または改行で区切る
pub fn parse_matrix(text: &str) -> Result<Vec<Vec<Decimal>>, DecisionError> {
    let rows = text
        .split([';', '\n'])
        .map(str::trim)
        .filter(|row| !row.is_empty())
        .enumerate()
        .map(|(index, row)| parse_row(row, &format!("payoffs row {}", index + 1)))
        .collect::<Result<Vec<_>, _>>()?;

    if rows.is_empty() {
        return Err(DecisionError::parse("payoffs", "no rows found"));
    }
    Ok(rows)
}

/// `text` が 2 行以上を含むなら true
pub fn is_matrix(text: &str) -> bool {
    text.trim().contains([';', '\n'])
}

pub fn parse_scalar(text: &str, field: &str) -> Result<Decimal, DecisionError> {
    decimal::parse_lenient(text).map_err(|err| DecisionError::from_decimal(field, err))
}

/// 非負の重みを合計 1 になるよう再スケール
pub fn normalize(values: &[Decimal]) -> Result<Vec<Decimal>, DecisionError> {
    if values.iter().any(|v| v.is_sign_negative() && !v.is_zero()) {
        return Err(DecisionError::validation(
            "probabilities",
            "negative values cannot be normalized",
        ));
    }
    let total = decimal::sum(values)?;
    if total.is_zero() {
        return Err(DecisionError::validation(
            "probabilities",
            "values summing to 0 cannot be normalized",
        ));
    }
    values
        .iter()
        .map(|v| decimal::div(*v, total).map_err(DecisionError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case::commas("Gold, Stocks, Savings", &["Gold", "Stocks", "Savings"])]
    #[case::brackets("[A, 'B', \"C\"]", &["A", "B", "C"])]
    #[case::lines("Boom\nBust\n", &["Boom", "Bust"])]
    #[case::blanks(" , A,, B ,", &["A", "B"])]
    fn labels_are_split_and_trimmed(#[case] input: &str, #[case] expected: &[&str]) {
        assert_eq!(parse_labels(input), expected);
    }

    #[test]
    fn row_accepts_mixed_separators_and_symbols() {
        let row = parse_row("₹100, $-20\t60%  7", "payoffs").unwrap();
        assert_eq!(row, vec![dec!(100), dec!(-20), dec!(0.6), dec!(7)]);
    }

    #[test]
    fn row_names_the_field_on_garbage() {
        let err = parse_row("10, ten", "probabilities").unwrap_err();
        assert_eq!(err.field(), Some("probabilities"));
        assert!(parse_row("   ", "payoffs").is_err());
    }

    #[test]
    fn matrix_splits_on_semicolons_and_newlines() {
        let matrix = parse_matrix("100, 0; 50 50\n20, 80\n").unwrap();
        assert_eq!(matrix.len(), 3);
        assert_eq!(matrix[2], vec![dec!(20), dec!(80)]);

        let err = parse_matrix("1, 2; x, 4").unwrap_err();
        assert_eq!(err.field(), Some("payoffs row 2"));
        assert!(is_matrix("1 2; 3 4"));
        assert!(!is_matrix("1 2 3 4"));
    }

    #[test]
    fn scalar_is_lenient() {
        assert_eq!(parse_scalar("70%", "alpha").unwrap(), dec!(0.7));
        assert_eq!(parse_scalar("abc", "alpha").unwrap_err().field(), Some("alpha"));
    }

    #[test]
    fn normalize_rescales_to_one() {
        let scaled = normalize(&[dec!(0.5), dec!(0.3)]).unwrap();
        assert_eq!(scaled, vec![dec!(0.625), dec!(0.375)]);

        let thirds = normalize(&[dec!(1), dec!(1), dec!(1)]).unwrap();
        let total = decimal::sum(&thirds).unwrap();
        assert!((total - Decimal::ONE).abs() < dec!(0.0000001));

        assert!(normalize(&[dec!(0), dec!(0)]).is_err());
        assert!(normalize(&[dec!(2), dec!(-1)]).is_err());
    }
}
