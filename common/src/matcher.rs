//! マスタ照合モジュール
//!
//! リクエスト1行分の品番とキー（属性列名 or ドキュメント種別）から、
//! マスタ表の最初の一致行の値を取り出す。
//! 一致しない場合・行単位の失敗は例外にせず [`RowOutcome`] で返す。

use crate::category::DocumentCategory;
use crate::error::Result;
use crate::label::normalize_attribute_label;
use crate::table::Table;
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

/// 属性マスタの品番列
pub const CATALOG_NUMBER_COLUMN: &str = "catalog-number";

/// ドキュメントマスタの列
pub const DOC_CATALOG_NUMBER_COLUMN: &str = "Catalog Number";
pub const DOC_SPEC_TYPE_COLUMN: &str = "Spec Type";
pub const DOC_URL_COLUMN: &str = "URL";

/// リクエスト表の列
pub const ITEM_NO_COLUMN: &str = "Item no.";
pub const ATTRIBUTE_NAME_COLUMN: &str = "Attribute Name";
pub const MEDIA_FILE_COLUMN: &str = "Media File Requested";

/// 出力で追加される列
pub const ATTRIBUTE_VALUE_COLUMN: &str = "Attribute Value";
pub const DOCUMENT_PATH_COLUMN: &str = "FileName or Path to File";

/// 該当なし時の値
pub const ATTRIBUTE_SENTINEL: &str = "Null";
pub const DOCUMENT_SENTINEL: &str = "";

/// 行単位の照合失敗（RowLookupError）
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowFailure {
    #[error("リクエスト行に「{column}」のセルがありません")]
    MissingRequestCell { column: String },

    #[error("マスタに「{column}」列が{count}個あります")]
    AmbiguousColumn { column: String, count: usize },

    #[error("マスタ{sheet_row}行目に「{column}」のセルがありません")]
    MissingMasterCell { sheet_row: usize, column: String },
}

/// 1行分の照合結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    /// マスタの値
    Found(String),
    /// 一致するマスタ行なし
    NotFound,
    /// 正規化した属性キーがマスタ列に存在しない
    UnknownColumn(String),
    /// リクエストラベルが種別マップにない
    UnknownLabel(String),
    /// 行単位の失敗
    Failed(RowFailure),
}

impl RowOutcome {
    /// 出力セルの値（見つからない場合は番兵値）
    pub fn into_value(self, sentinel: &str) -> String {
        match self {
            RowOutcome::Found(value) => value,
            _ => sentinel.to_string(),
        }
    }
}

/// マスタのデータ行番号 → シート上の行番号（ヘッダーが1行目）
pub(crate) fn sheet_row(index: usize) -> usize {
    index + 2
}

/// 属性マスタ（PIM）
///
/// 品番ごとに最初の行だけを索引する。同じ品番が複数行あっても
/// 表の並び順で先頭の行が使われる。
#[derive(Debug)]
pub struct AttributeMaster<'a> {
    table: &'a Table,
    first_row_by_item: HashMap<&'a str, usize>,
}

impl<'a> AttributeMaster<'a> {
    pub fn new(table: &'a Table) -> Result<Self> {
        let cols = table.require_columns("マスタ", &[CATALOG_NUMBER_COLUMN])?;
        let catalog_col = cols[0];

        // 空の品番セルは索引しない（空の品番はどの行とも一致しない）
        let mut first_row_by_item = HashMap::new();
        for (idx, row) in table.rows().iter().enumerate() {
            match row.get(catalog_col) {
                Some(item) if !item.is_empty() => {
                    first_row_by_item.entry(item.as_str()).or_insert(idx);
                }
                _ => {}
            }
        }

        Ok(Self {
            table,
            first_row_by_item,
        })
    }

    /// 品番と正規化済みキーで値を取得
    pub fn lookup(&self, item: &str, key: &str) -> RowOutcome {
        // 空のキーは見出しが空の列とも一致させない
        let columns = if key.is_empty() {
            Vec::new()
        } else {
            self.table.column_indices(key)
        };
        if columns.is_empty() {
            return RowOutcome::UnknownColumn(key.to_string());
        }

        let Some(&row) = self.first_row_by_item.get(item) else {
            return RowOutcome::NotFound;
        };

        if columns.len() > 1 {
            return RowOutcome::Failed(RowFailure::AmbiguousColumn {
                column: key.to_string(),
                count: columns.len(),
            });
        }

        match self.table.cell(row, columns[0]) {
            Some(value) => RowOutcome::Found(value.to_string()),
            None => RowOutcome::Failed(RowFailure::MissingMasterCell {
                sheet_row: sheet_row(row),
                column: key.to_string(),
            }),
        }
    }

    /// 自由記述の属性名で値を取得
    pub fn lookup_label(&self, item: &str, label: &str) -> RowOutcome {
        self.lookup(item, &normalize_attribute_label(label))
    }

    pub fn item_count(&self) -> usize {
        self.first_row_by_item.len()
    }
}

/// ドキュメントマスタ（Catalog Number / Spec Type / URL）
#[derive(Debug)]
pub struct DocumentMaster<'a> {
    table: &'a Table,
    url_col: usize,
    first_row_by_key: HashMap<(&'a str, &'a str), usize>,
}

impl<'a> DocumentMaster<'a> {
    pub fn new(table: &'a Table) -> Result<Self> {
        let cols = table.require_columns(
            "マスタ",
            &[DOC_CATALOG_NUMBER_COLUMN, DOC_SPEC_TYPE_COLUMN, DOC_URL_COLUMN],
        )?;
        let (catalog_col, spec_col, url_col) = (cols[0], cols[1], cols[2]);

        let mut first_row_by_key = HashMap::new();
        for (idx, row) in table.rows().iter().enumerate() {
            if let (Some(item), Some(spec)) = (row.get(catalog_col), row.get(spec_col)) {
                if item.is_empty() || spec.is_empty() {
                    continue;
                }
                first_row_by_key
                    .entry((item.as_str(), spec.as_str()))
                    .or_insert(idx);
            }
        }

        Ok(Self {
            table,
            url_col,
            first_row_by_key,
        })
    }

    /// 品番とカテゴリでURLを取得
    pub fn lookup(&self, item: &str, category: DocumentCategory) -> RowOutcome {
        let Some(&row) = self.first_row_by_key.get(&(item, category.as_str())) else {
            return RowOutcome::NotFound;
        };

        match self.table.cell(row, self.url_col) {
            Some(url) => RowOutcome::Found(url.to_string()),
            None => RowOutcome::Failed(RowFailure::MissingMasterCell {
                sheet_row: sheet_row(row),
                column: DOC_URL_COLUMN.to_string(),
            }),
        }
    }

    /// リクエストラベルでURLを取得
    ///
    /// ラベルが種別マップにない場合はマスタを検索せずに返す。
    pub fn lookup_label(&self, item: &str, label: &str) -> RowOutcome {
        match DocumentCategory::from_request_label(label) {
            Some(category) => self.lookup(item, category),
            None => RowOutcome::UnknownLabel(label.to_string()),
        }
    }
}
