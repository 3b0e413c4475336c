//! Excel出力（rust_xlsxwriter）
//!
//! 全セルを文字列として書き出す（品番の先頭ゼロ等を保持するため）。

use crate::error::{PimMatchError, Result};
use pim_match_common::Table;
use rust_xlsxwriter::{Workbook, XlsxError};
use std::path::Path;

pub const SHEET_NAME: &str = "Sheet1";

/// xlsxの上限（ヘッダー行を含む）
const MAX_ROWS: usize = 1_048_576;
const MAX_COLUMNS: usize = 16_384;

/// 表をxlsxファイルに保存
pub fn write_excel(table: &Table, output_path: &Path) -> Result<()> {
    let mut workbook = build_workbook(table)?;
    workbook
        .save(output_path)
        .map_err(|e| PimMatchError::ExcelGeneration(format!("保存エラー: {}", e)))
}

/// 表をxlsxのバイト列に変換
pub fn to_excel_buffer(table: &Table) -> Result<Vec<u8>> {
    let mut workbook = build_workbook(table)?;
    workbook
        .save_to_buffer()
        .map_err(|e| PimMatchError::ExcelGeneration(format!("バッファ生成エラー: {}", e)))
}

fn build_workbook(table: &Table) -> Result<Workbook> {
    if table.len() + 1 > MAX_ROWS {
        return Err(PimMatchError::ExcelGeneration(format!(
            "行数がxlsxの上限を超えています: {}行",
            table.len()
        )));
    }
    if table.rows().iter().map(|r| r.len()).chain([table.width()]).max().unwrap_or(0) > MAX_COLUMNS {
        return Err(PimMatchError::ExcelGeneration(
            "列数がxlsxの上限を超えています".into(),
        ));
    }

    let mut workbook = Workbook::new();
    fill_sheet(&mut workbook, table)
        .map_err(|e| PimMatchError::ExcelGeneration(format!("シート書き込みエラー: {}", e)))?;
    Ok(workbook)
}

fn fill_sheet(workbook: &mut Workbook, table: &Table) -> std::result::Result<(), XlsxError> {
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, header) in table.headers().iter().enumerate() {
        worksheet.write_string(0, col as u16, header)?;
    }

    for (idx, row) in table.rows().iter().enumerate() {
        let sheet_row = (idx + 1) as u32;
        for (col, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            worksheet.write_string(sheet_row, col as u16, value)?;
        }
    }

    Ok(())
}
