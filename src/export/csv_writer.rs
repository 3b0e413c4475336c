//! CSV出力

use crate::error::{PimMatchError, Result};
use pim_match_common::Table;
use std::path::Path;

/// 表をCSVのバイト列に変換（UTF-8、ヘッダー行あり）
pub fn to_csv_bytes(table: &Table) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());

    writer
        .write_record(table.headers())
        .map_err(|e| PimMatchError::CsvWrite(e.to_string()))?;
    for row in table.rows() {
        writer
            .write_record(row)
            .map_err(|e| PimMatchError::CsvWrite(e.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|e| PimMatchError::CsvWrite(e.to_string()))
}

/// 表をCSVファイルに保存
pub fn write_csv(table: &Table, output_path: &Path) -> Result<()> {
    let bytes = to_csv_bytes(table)?;
    std::fs::write(output_path, bytes)?;
    Ok(())
}
