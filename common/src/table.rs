//! 表データモジュール
//!
//! xlsx/csvから読み込んだシートを、ヘッダー行＋文字列セルの行として保持する。
//! セル値は読み込み時に文字列化済み。CSVでは行がヘッダーより短い場合がある
//! （欠けたセルは空文字とは区別する）。

use crate::error::{Error, Result};
use std::ops::Range;

/// 1シート分の表
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// `&str`のスライスから構築（主にテスト用）
    pub fn from_rows(headers: &[&str], rows: &[&[&str]]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// データ行数（ヘッダー除く）
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 列数
    pub fn width(&self) -> usize {
        self.headers.len()
    }

    /// 列名から最初に一致した列番号を取得
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// 列名に一致する全列番号（同名列の検出用）
    pub fn column_indices(&self, name: &str) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .filter(|(_, h)| h.as_str() == name)
            .map(|(i, _)| i)
            .collect()
    }

    /// 必須列の存在を確認し、指定順の列番号を返す
    ///
    /// # Arguments
    /// * `table` - エラーメッセージ用の表名（"マスタ" など）
    /// * `names` - 必須列名
    pub fn require_columns(&self, table: &str, names: &[&str]) -> Result<Vec<usize>> {
        let mut indices = Vec::with_capacity(names.len());
        let mut missing = Vec::new();

        for name in names {
            match self.column_index(name) {
                Some(idx) => indices.push(idx),
                None => missing.push(name.to_string()),
            }
        }

        if !missing.is_empty() {
            return Err(Error::MissingColumns {
                table: table.to_string(),
                missing,
            });
        }

        Ok(indices)
    }

    /// セル値を取得（行が短い場合は None）
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(|s| s.as_str())
    }

    /// 指定範囲の行を切り出す（範囲は行数でクランプ）
    pub fn slice(&self, range: Range<usize>) -> Table {
        let end = range.end.min(self.rows.len());
        let start = range.start.min(end);
        Table {
            headers: self.headers.clone(),
            rows: self.rows[start..end].to_vec(),
        }
    }

    /// 先頭n行（プレビュー用）
    pub fn head(&self, n: usize) -> Table {
        self.slice(0..n)
    }
}
