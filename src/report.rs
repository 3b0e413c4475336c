//! 処理結果の表示・レポート出力

use crate::error::Result;
use pim_match_common::{AugmentReport, SourceTable};
use serde::Serialize;
use std::path::Path;

/// 警告の表示上限
const MAX_WARNINGS_SHOWN: usize = 20;

/// 入力ファイルの概要
#[derive(Debug, Clone, Serialize)]
pub struct FileSummary {
    pub name: String,
    pub sha256: String,
    pub rows: usize,
    pub columns: usize,
}

impl From<&SourceTable> for FileSummary {
    fn from(source: &SourceTable) -> Self {
        Self {
            name: source.name.clone(),
            sha256: source.hash.to_hex(),
            rows: source.table.len(),
            columns: source.table.width(),
        }
    }
}

/// JSONレポート
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub pipeline: &'static str,
    pub generated_at: String,
    pub master: FileSummary,
    pub request: FileSummary,
    pub output: String,
    /// 処理したページ（0始まり、属性照合のみ）
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pages: Vec<usize>,
    pub output_rows: usize,
    pub summary: AugmentReport,
}

impl RunReport {
    pub fn new(
        pipeline: &'static str,
        master: &SourceTable,
        request: &SourceTable,
        output: &Path,
        summary: AugmentReport,
    ) -> Self {
        Self {
            pipeline,
            generated_at: chrono::Local::now().to_rfc3339(),
            master: master.into(),
            request: request.into(),
            output: output.display().to_string(),
            pages: Vec::new(),
            output_rows: 0,
            summary,
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// 件数サマリーを表示
pub fn print_summary(report: &AugmentReport) {
    println!(
        "  {}行処理: 一致 {} / 該当なし {} / 未対応キー {} / 警告 {}",
        report.total_rows,
        report.found,
        report.not_found,
        report.unrecognized,
        report.warnings.len()
    );
}

/// 行単位の警告を表示（多い場合は先頭のみ）
pub fn print_warnings(report: &AugmentReport) {
    for warning in report.warnings.iter().take(MAX_WARNINGS_SHOWN) {
        println!("  ⚠ {}", warning);
        tracing::warn!(row = warning.sheet_row, item = %warning.item, "{}", warning.reason);
    }
    if report.warnings.len() > MAX_WARNINGS_SHOWN {
        println!(
            "  ⚠ ...ほか{}件の警告",
            report.warnings.len() - MAX_WARNINGS_SHOWN
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pim_match_common::{ContentHash, Table};
    use tempfile::tempdir;

    #[test]
    fn test_run_report_json() {
        let dir = tempdir().expect("Failed to create temp dir");
        let master = SourceTable::new(
            "master.csv",
            ContentHash::of_bytes(b"m"),
            Table::from_rows(&["Catalog Number", "Spec Type", "URL"], &[&["X1", "Installation", "u"]]),
        );
        let request = SourceTable::new(
            "request.csv",
            ContentHash::of_bytes(b"r"),
            Table::from_rows(&["Item no.", "Media File Requested"], &[]),
        );

        let report = RunReport::new(
            "documents",
            &master,
            &request,
            Path::new("updated_document_urls.csv"),
            AugmentReport::default(),
        );
        let path = dir.path().join("report.json");
        report.save(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["pipeline"], "documents");
        assert_eq!(value["master"]["rows"], 1);
        assert_eq!(value["master"]["sha256"], ContentHash::of_bytes(b"m").to_hex());
        assert_eq!(value["summary"]["total_rows"], 0);
        assert!(value.get("pages").is_none());
        assert!(value["generatedAt"].is_string());
    }
}
