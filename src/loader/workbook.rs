//! xlsx/xlsm 読み込み（calamine）

use super::build_table;
use calamine::{Data, Reader, Xlsx};
use pim_match_common::Table;
use std::io::Cursor;

/// 先頭シートを表として読み込む
pub fn parse_workbook(bytes: Vec<u8>) -> Result<Table, String> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))
        .map_err(|e| format!("ワークブックを開けません: {}", e))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| "ワークシートがありません".to_string())?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| format!("シート「{}」を読み込めません: {}", sheet_name, e))?;

    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(header) => header.iter().map(cell_to_string).collect(),
        None => Vec::new(),
    };

    Ok(build_table(
        headers,
        rows.map(|row| row.iter().map(cell_to_string).collect()),
    ))
}

/// セル値を文字列化（整数値の小数は "10.0" ではなく "10"）
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_to_string() {
        assert_eq!(cell_to_string(&Data::Empty), "");
        assert_eq!(cell_to_string(&Data::String("A1".into())), "A1");
        assert_eq!(cell_to_string(&Data::Float(10.0)), "10");
        assert_eq!(cell_to_string(&Data::Float(2.5)), "2.5");
        assert_eq!(cell_to_string(&Data::Int(42)), "42");
        assert_eq!(cell_to_string(&Data::Bool(true)), "true");
    }

    #[test]
    fn test_parse_invalid_bytes() {
        let result = parse_workbook(b"PK not really".to_vec());
        assert!(result.is_err());
    }
}
