//! csv 読み込み

use super::build_table;
use pim_match_common::Table;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// CSVを表として読み込む（列数が揃っていない行も許容）
pub fn parse_csv(bytes: &[u8]) -> Result<Table, String> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| format!("ヘッダー行を読み込めません: {}", e))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(|e| format!("{}行目を読み込めません: {}", idx + 2, e))?;
        rows.push(record.iter().map(|c| c.to_string()).collect::<Vec<_>>());
    }

    Ok(build_table(headers, rows.into_iter()))
}
