//! Decimal 演算層
//!
//! ペイオフ・確率・alpha はすべて境界で一度だけ [`Decimal`] にパースされ、
//! 以降の演算はすべてその上で行う。パースは入力された桁をすべて保持し、
//! 丸めるのは演算結果だけ。
//!
//! # 丸め規則
//! - 中間結果は演算ごとに [`SIGNIFICANT_DIGITS`] 有効桁へ四捨五入（half-up）
//! - 正規文字列は末尾のゼロを落とす（`60.0` → `"60"`）
//! - 表示文字列は固定桁数で half-up（デフォルト 2 桁）

use std::cmp::Ordering;
use std::str::FromStr;

pub use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;

/// 中間結果で保持する有効桁数
pub const SIGNIFICANT_DIGITS: i64 = 20;

/// 通貨風の表示に使うデフォルト桁数
pub const DISPLAY_PLACES: u32 = 2;

/// 演算層のエラー
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecimalError {
    #[error("invalid numeric input: {0:?}")]
    Parse(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("decimal overflow in {0}")]
    Overflow(&'static str),
}

/// 厳密な decimal 文字列（ワイヤ形式）をパース
///
/// 通常表記（`-12.5`）と指数表記（`1.2e3`）を受け付ける。二進浮動小数点は経由しない。
pub fn parse_exact(input: &str) -> Result<Decimal, DecimalError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DecimalError::Parse(input.to_string()));
    }
    let parsed = Decimal::from_str(trimmed).or_else(|_| {
        if trimmed.contains(['e', 'E']) {
            Decimal::from_scientific(trimmed)
        } else {
            Err(rust_decimal::Error::ConversionTo(trimmed.to_string()))
        }
    });
    parsed.map_err(|_| DecimalError::Parse(input.to_string()))
}

/// 会話的な数値入力をパース
///
/// 通貨記号・桁区切り・空白を取り除く。末尾の `%` は 100 で割る（`"60%"` → `0.6`）。
pub fn parse_lenient(input: &str) -> Result<Decimal, DecimalError> {
    let cleaned: String = input
        .chars()
        .filter(|c| !matches!(c, '₹' | '$' | ',') && !c.is_whitespace())
        .collect();

    if let Some(number) = cleaned.strip_suffix('%') {
        let value = parse_exact(number).map_err(|_| DecimalError::Parse(input.to_string()))?;
        return div(value, Decimal::ONE_HUNDRED);
    }

    parse_exact(&cleaned).map_err(|_| DecimalError::Parse(input.to_string()))
}

/// [`SIGNIFICANT_DIGITS`] 有効桁へ half-up で丸める
pub fn fit(value: Decimal) -> Decimal {
    if value.is_zero() {
        return value;
    }
    let digits = value.mantissa().unsigned_abs().to_string().len() as i64;
    let magnitude = digits - i64::from(value.scale());
    let places = SIGNIFICANT_DIGITS - magnitude;
    if places < 0 || places >= i64::from(value.scale()) {
        return value;
    }
    value.round_dp_with_strategy(places as u32, RoundingStrategy::MidpointAwayFromZero)
}

pub fn add(a: Decimal, b: Decimal) -> Result<Decimal, DecimalError> {
    a.checked_add(b).map(fit).ok_or(DecimalError::Overflow("add"))
}

pub fn sub(a: Decimal, b: Decimal) -> Result<Decimal, DecimalError> {
    a.checked_sub(b).map(fit).ok_or(DecimalError::Overflow("subtract"))
}

pub fn mul(a: Decimal, b: Decimal) -> Result<Decimal, DecimalError> {
    a.checked_mul(b).map(fit).ok_or(DecimalError::Overflow("multiply"))
}

pub fn div(a: Decimal, b: Decimal) -> Result<Decimal, DecimalError> {
    if b.is_zero() {
        return Err(DecimalError::DivisionByZero);
    }
    a.checked_div(b).map(fit).ok_or(DecimalError::Overflow("divide"))
}

/// 中間丸めつきの総和
pub fn sum<'a, I>(values: I) -> Result<Decimal, DecimalError>
where
    I: IntoIterator<Item = &'a Decimal>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, value| add(acc, *value))
}

pub fn compare(a: &Decimal, b: &Decimal) -> Ordering {
    a.cmp(b)
}

/// `cmp` で見て、それ以前のどの要素よりも真に大きい最初の要素の添字
///
/// 同値なら最小の添字を保つ。
pub fn max_by_first<T, F>(items: &[T], mut cmp: F) -> Option<usize>
where
    F: FnMut(&T, &T) -> Ordering,
{
    let mut best: Option<usize> = None;
    for (index, item) in items.iter().enumerate() {
        match best {
            Some(current) if cmp(item, &items[current]) != Ordering::Greater => {}
            _ => best = Some(index),
        }
    }
    best
}

/// `cmp` で最小となる最初の要素の添字。同値なら最小の添字を保つ
pub fn min_by_first<T, F>(items: &[T], mut cmp: F) -> Option<usize>
where
    F: FnMut(&T, &T) -> Ordering,
{
    max_by_first(items, |a, b| cmp(b, a))
}

/// スライス中の最大値（最初の出現）
pub fn max_of(values: &[Decimal]) -> Option<Decimal> {
    max_by_first(values, compare).map(|index| values[index])
}

/// スライス中の最小値（最初の出現）
pub fn min_of(values: &[Decimal]) -> Option<Decimal> {
    min_by_first(values, compare).map(|index| values[index])
}

/// 正規の厳密文字列。末尾ゼロも負のゼロも無い
pub fn canonical(value: Decimal) -> String {
    value.normalize().to_string()
}

/// 固定桁の表示文字列（half-up）
pub fn display(value: Decimal, places: u32) -> String {
    let rounded = value.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}", places as usize, rounded)
}
