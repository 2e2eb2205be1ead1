//! Markdown トレースの描画
//!
//! トレースはチャットにそのまま表示されるので、中の数値はすべて
//! エンジンが実際に使った値の正規 decimal 文字列。

use crate::domain::decimal::{self, Decimal};

/// 1 つの基準の導出過程を少しずつ組み立てる
pub(crate) struct Trace {
    out: String,
}

impl Trace {
    pub(crate) fn new(title: &str) -> Self {
        Self {
            out: format!("### {title}\n\n"),
        }
    }

    /// 太字の `label: value` 行と空行
    pub(crate) fn fact(&mut self, label: &str, value: &str) -> &mut Self {
        self.out.push_str(&format!("**{label}**: {value}\n\n"));
        self
    }

    pub(crate) fn subheading(&mut self, text: &str) -> &mut Self {
        self.out.push_str(&format!("#### {text}\n"));
        self
    }

    pub(crate) fn bullet(&mut self, label: &str, value: &str) -> &mut Self {
        self.out.push_str(&format!("- **{label}**: {value}\n"));
        self
    }

    pub(crate) fn header(&mut self, columns: &[&str]) -> &mut Self {
        self.out.push_str(&format!("| {} |\n", columns.join(" | ")));
        self.out
            .push_str(&format!("|{}\n", "---|".repeat(columns.len())));
        self
    }

    pub(crate) fn row(&mut self, cells: &[String]) -> &mut Self {
        self.out.push_str(&format!("| {} |\n", cells.join(" | ")));
        self
    }

    pub(crate) fn blank(&mut self) -> &mut Self {
        self.out.push('\n');
        self
    }

    /// 勝者とその値を繰り返す締めの行
    pub(crate) fn recommend(mut self, alternative: &str, measure: &str, value: Decimal) -> String {
        self.out.push_str(&format!(
            "\n**Recommendation**: {alternative} with {measure} of {}",
            decimal::canonical(value)
        ));
        self.out
    }

    pub(crate) fn finish(mut self, closing: &str) -> String {
        self.out.push_str(closing);
        self.out
    }
}

/// 正規形の `[a, b, c]`
pub(crate) fn list(values: &[Decimal]) -> String {
    let items: Vec<String> = values.iter().map(|v| decimal::canonical(*v)).collect();
    format!("[{}]", items.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn renders_table_and_recommendation() {
        let mut trace = Trace::new("Title");
        trace
            .header(&["Alternative", "Score"])
            .row(&["A".into(), "1".into()]);
        let text = trace.recommend("A", "score", dec!(1.50));

        assert!(text.starts_with("### Title\n\n| Alternative | Score |\n|---|---|\n| A | 1 |\n"));
        assert!(text.ends_with("**Recommendation**: A with score of 1.5"));
    }

    #[test]
    fn list_uses_canonical_strings() {
        assert_eq!(list(&[dec!(0.60), dec!(0.4)]), "[0.6, 0.4]");
    }
}
