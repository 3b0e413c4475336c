//! 表のプレビュー表示

use pim_match_common::Table;

/// セルの最大表示幅（文字数）
const MAX_CELL_WIDTH: usize = 32;

/// 先頭 `limit` 行を桁揃えしたテキストにする
pub fn render_preview(table: &Table, limit: usize) -> String {
    let head = table.head(limit);
    let width = head.width();

    let cells: Vec<Vec<String>> = std::iter::once(head.headers().to_vec())
        .chain(head.rows().iter().cloned())
        .map(|row| (0..width).map(|i| clip(row.get(i).map(|s| s.as_str()).unwrap_or(""))).collect())
        .collect();

    let widths: Vec<usize> = (0..width)
        .map(|i| cells.iter().map(|row| row[i].chars().count()).max().unwrap_or(0))
        .collect();

    let mut out = String::new();
    for (line_no, row) in cells.iter().enumerate() {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{:<w$}", cell, w = w))
            .collect();
        out.push_str(line.join(" | ").trim_end());
        out.push('\n');

        if line_no == 0 {
            let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
            out.push_str(&rule.join("-+-"));
            out.push('\n');
        }
    }

    if table.len() > limit {
        out.push_str(&format!("... (全{}行)\n", table.len()));
    }
    out
}

fn clip(value: &str) -> String {
    let value = value.replace(['\n', '\r'], " ");
    if value.chars().count() <= MAX_CELL_WIDTH {
        return value;
    }
    let mut clipped: String = value.chars().take(MAX_CELL_WIDTH - 1).collect();
    clipped.push('…');
    clipped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_preview() {
        let table = Table::from_rows(
            &["Item no.", "Attribute Value"],
            &[&["A1", "10"], &["B9", "Null"], &["C3", "7"]],
        );
        let text = render_preview(&table, 2);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Item no. | Attribute Value");
        assert_eq!(lines[1], "---------+----------------");
        assert_eq!(lines[2], "A1       | 10");
        assert_eq!(lines[3], "B9       | Null");
        assert_eq!(lines[4], "... (全3行)");
    }

    #[test]
    fn test_clip_long_cell() {
        let long = "x".repeat(40);
        let clipped = clip(&long);
        assert_eq!(clipped.chars().count(), MAX_CELL_WIDTH);
        assert!(clipped.ends_with('…'));
        assert_eq!(clip("a\nb"), "a b");
    }
}
