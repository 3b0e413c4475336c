//! 表ファイル読み込みモジュール
//!
//! xlsx/xlsm（calamine）と csv（csv crate）を文字列セルの [`Table`] に変換する。
//! ファイル内容のハッシュで [`TableCache`] を引き、同じ内容なら再パースしない。

mod csv_reader;
mod workbook;

use crate::error::{PimMatchError, Result};
use pim_match_common::{ContentHash, SourceTable, Table, TableCache};
use std::path::Path;

/// 入力ファイルの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Workbook,
    Csv,
}

const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm"];
const CSV_EXTENSIONS: &[&str] = &["csv"];

impl FileKind {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        if WORKBOOK_EXTENSIONS.contains(&ext.as_str()) {
            Ok(FileKind::Workbook)
        } else if CSV_EXTENSIONS.contains(&ext.as_str()) {
            Ok(FileKind::Csv)
        } else {
            Err(PimMatchError::UnsupportedFormat(path.display().to_string()))
        }
    }
}

/// ファイルを読み込んで [`SourceTable`] を返す
///
/// - 1行目をヘッダーとする（前後の空白は除去）
/// - 全セルが空の行は読み飛ばす
/// - ワークブックは先頭シートのみ
pub fn load_table(path: &Path, cache: &mut TableCache) -> Result<SourceTable> {
    if !path.exists() {
        return Err(PimMatchError::FileNotFound(path.display().to_string()));
    }

    let kind = FileKind::from_path(path)?;
    let bytes = std::fs::read(path)?;
    let hash = ContentHash::of_bytes(&bytes);

    let table = cache.get_or_try_insert(hash, || {
        parse_bytes(kind, bytes).map_err(|reason| PimMatchError::FileRead {
            path: path.display().to_string(),
            reason,
        })
    })?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    tracing::debug!(
        file = %name,
        hash = %hash.short(),
        rows = table.len(),
        columns = table.width(),
        "table loaded"
    );

    Ok(SourceTable {
        name,
        hash,
        table,
    })
}

/// バイト列をパース
pub fn parse_bytes(kind: FileKind, bytes: Vec<u8>) -> std::result::Result<Table, String> {
    match kind {
        FileKind::Workbook => workbook::parse_workbook(bytes),
        FileKind::Csv => csv_reader::parse_csv(&bytes),
    }
}

/// ヘッダーと行を整えて表にする
///
/// 空の見出しは `Unnamed: {列番号}` に置き換える。
fn build_table(headers: Vec<String>, rows: impl Iterator<Item = Vec<String>>) -> Table {
    let headers = headers
        .into_iter()
        .enumerate()
        .map(|(idx, h)| match h.trim() {
            "" => format!("Unnamed: {}", idx),
            trimmed => trimmed.to_string(),
        })
        .collect();
    let rows = rows
        .filter(|row| row.iter().any(|cell| !cell.is_empty()))
        .collect();
    Table::new(headers, rows)
}
