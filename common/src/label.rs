//! 属性名の正規化
//!
//! リクエスト表の自由記述の属性名（例: `"Height (in)"`）を
//! マスタ表の列名規約（例: `"height"`）に変換する。

use regex::Regex;

/// 属性名をマスタ列名のキーに変換する
///
/// 1. 括弧書き `( ... )` をすべて除去（最短一致・改行をまたぐ）
/// 2. 前後の空白を除去
/// 3. 空白で分割してハイフンで連結
/// 4. 小文字化
///
/// # Examples
/// ```
/// use pim_match_common::normalize_attribute_label;
///
/// assert_eq!(normalize_attribute_label("Height (in)"), "height");
/// assert_eq!(normalize_attribute_label("Color Family"), "color-family");
/// ```
pub fn normalize_attribute_label(label: &str) -> String {
    lazy_static::lazy_static! {
        static ref PAREN_RE: Regex = Regex::new(r"(?s)\(.*?\)").unwrap();
    }

    let stripped = PAREN_RE.replace_all(label, "");
    stripped
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_known_labels() {
        assert_eq!(normalize_attribute_label("Height (in)"), "height");
        assert_eq!(normalize_attribute_label("Color Family"), "color-family");
        assert_eq!(normalize_attribute_label("  Product Weight (lbs) "), "product-weight");
    }

    #[test]
    fn test_normalize_multiple_parentheses() {
        assert_eq!(
            normalize_attribute_label("Depth (in) Overall (Nominal)"),
            "depth-overall"
        );
        // 最短一致なので間の語は残る
        assert_eq!(normalize_attribute_label("(a) Flow Rate (gpm)"), "flow-rate");
    }

    #[test]
    fn test_normalize_collapses_inner_whitespace() {
        assert_eq!(normalize_attribute_label("Max \t Water   Temp"), "max-water-temp");
    }

    #[test]
    fn test_normalize_to_empty() {
        assert_eq!(normalize_attribute_label("(in)"), "");
        assert_eq!(normalize_attribute_label("   "), "");
        assert_eq!(normalize_attribute_label(""), "");
    }

    #[test]
    fn test_normalize_unbalanced_parenthesis_kept() {
        assert_eq!(normalize_attribute_label("Width (in"), "width-(in");
    }

    #[test]
    fn test_normalize_parenthesis_across_line_break() {
        assert_eq!(normalize_attribute_label("Height (in\nmm)"), "height");
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(label in "\\PC{0,40}") {
            let once = normalize_attribute_label(&label);
            prop_assert_eq!(normalize_attribute_label(&once), once);
        }

        #[test]
        fn single_word_without_parentheses_is_trimmed_lowercase(
            word in "[A-Za-z0-9_.-]{1,20}",
            pad_left in " {0,3}",
            pad_right in " {0,3}",
        ) {
            let label = format!("{}{}{}", pad_left, word, pad_right);
            prop_assert_eq!(normalize_attribute_label(&label), label.trim().to_lowercase());
        }
    }
}
