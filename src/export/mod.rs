pub mod csv_writer;
pub mod excel;

use crate::error::Result;
use pim_match_common::Table;
use std::path::{Path, PathBuf};

/// 出力形式
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Excel,
    Csv,
}

impl OutputFormat {
    /// 拡張子から判定（不明な場合は既定値）
    pub fn from_path(path: &Path, default: OutputFormat) -> Self {
        match path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .as_deref()
        {
            Some("xlsx") => OutputFormat::Excel,
            Some("csv") => OutputFormat::Csv,
            _ => default,
        }
    }
}

/// 出力先を決定する
///
/// ディレクトリ指定の場合は既定のファイル名を付ける。
pub fn resolve_output_path(output: Option<&Path>, default_file_name: &str) -> PathBuf {
    match output {
        Some(path) if path.is_dir() => path.join(default_file_name),
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(default_file_name),
    }
}

/// 表を出力する
pub fn export_table(table: &Table, output_path: &Path, format: OutputFormat) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    match format {
        OutputFormat::Excel => excel::write_excel(table, output_path),
        OutputFormat::Csv => csv_writer::write_csv(table, output_path),
    }
}
