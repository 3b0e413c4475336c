//! リクエスト表への結果列追加
//!
//! 全行に照合を適用し、元の列と行順を保ったまま結果列を追加した表と、
//! 件数・警告をまとめた [`AugmentReport`] を返す。

use crate::error::Result;
use crate::matcher::{
    AttributeMaster, DocumentMaster, RowFailure, RowOutcome, ATTRIBUTE_NAME_COLUMN,
    ATTRIBUTE_SENTINEL, ATTRIBUTE_VALUE_COLUMN, DOCUMENT_PATH_COLUMN, DOCUMENT_SENTINEL,
    ITEM_NO_COLUMN, MEDIA_FILE_COLUMN,
};
use crate::table::Table;
use serde::Serialize;

/// 行単位の警告
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowWarning {
    /// リクエストシート上の行番号（ヘッダーが1行目）
    pub sheet_row: usize,
    pub item: String,
    pub label: String,
    pub reason: RowFailure,
}

impl std::fmt::Display for RowWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}行目 ({} / {}): {}",
            self.sheet_row, self.item, self.label, self.reason
        )
    }
}

/// 一括処理の集計
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AugmentReport {
    /// 処理した行数
    pub total_rows: usize,
    /// マスタ値が見つかった行数
    pub found: usize,
    /// 一致するマスタ行がなかった行数
    pub not_found: usize,
    /// 属性キーがマスタ列にない／ラベルが種別マップにない行数
    pub unrecognized: usize,
    /// 行単位の失敗
    pub warnings: Vec<RowWarning>,
}

impl AugmentReport {
    fn record(&mut self, sheet_row: usize, item: &str, label: &str, outcome: &RowOutcome) {
        self.total_rows += 1;
        match outcome {
            RowOutcome::Found(_) => self.found += 1,
            RowOutcome::NotFound => self.not_found += 1,
            RowOutcome::UnknownColumn(_) | RowOutcome::UnknownLabel(_) => self.unrecognized += 1,
            RowOutcome::Failed(reason) => self.warnings.push(RowWarning {
                sheet_row,
                item: item.to_string(),
                label: label.to_string(),
                reason: reason.clone(),
            }),
        }
    }

    /// 番兵値になった行数
    pub fn sentinel_rows(&self) -> usize {
        self.total_rows - self.found
    }

    /// 複数ページの集計をまとめる
    pub fn merge(&mut self, other: &AugmentReport) {
        self.total_rows += other.total_rows;
        self.found += other.found;
        self.not_found += other.not_found;
        self.unrecognized += other.unrecognized;
        self.warnings.extend(other.warnings.iter().cloned());
    }
}

/// 結果列を追加した表と集計
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Augmented {
    pub table: Table,
    pub report: AugmentReport,
}

/// 属性リクエストに `Attribute Value` 列を追加する
///
/// # Arguments
/// * `master` - PIMマスタ表
/// * `request` - リクエスト表（またはその1ページ分）
/// * `row_offset` - `request` の先頭行が元の表の何行目か（警告の行番号用）
pub fn augment_attributes(master: &Table, request: &Table, row_offset: usize) -> Result<Augmented> {
    let master = AttributeMaster::new(master)?;
    augment_rows(
        request,
        ATTRIBUTE_NAME_COLUMN,
        ATTRIBUTE_VALUE_COLUMN,
        ATTRIBUTE_SENTINEL,
        row_offset,
        |item, label| master.lookup_label(item, label),
        |_, _| {},
    )
}

/// ドキュメントリクエストに `FileName or Path to File` 列を追加する
///
/// `progress` は1行処理するたびに `(処理済み行数, 総行数)` で呼ばれる。
pub fn augment_documents<P>(master: &Table, request: &Table, progress: P) -> Result<Augmented>
where
    P: FnMut(usize, usize),
{
    let master = DocumentMaster::new(master)?;
    augment_rows(
        request,
        MEDIA_FILE_COLUMN,
        DOCUMENT_PATH_COLUMN,
        DOCUMENT_SENTINEL,
        0,
        |item, label| master.lookup_label(item, label),
        progress,
    )
}

fn augment_rows<F, P>(
    request: &Table,
    label_column: &str,
    result_column: &str,
    sentinel: &str,
    row_offset: usize,
    resolve: F,
    mut progress: P,
) -> Result<Augmented>
where
    F: Fn(&str, &str) -> RowOutcome,
    P: FnMut(usize, usize),
{
    let cols = request.require_columns("リクエスト", &[ITEM_NO_COLUMN, label_column])?;
    let (item_col, label_col) = (cols[0], cols[1]);

    // 既に結果列があれば上書き、なければ末尾に追加
    let mut headers = request.headers().to_vec();
    let result_col = match request.column_index(result_column) {
        Some(idx) => idx,
        None => {
            headers.push(result_column.to_string());
            headers.len() - 1
        }
    };
    let width = headers.len();

    let total = request.len();
    let mut report = AugmentReport::default();
    let mut rows = Vec::with_capacity(total);

    for (idx, source) in request.rows().iter().enumerate() {
        let item = source.get(item_col).map(|s| s.as_str());
        let label = source.get(label_col).map(|s| s.as_str());

        let outcome = match (item, label) {
            (Some(item), Some(label)) => resolve(item, label),
            (None, _) => RowOutcome::Failed(RowFailure::MissingRequestCell {
                column: ITEM_NO_COLUMN.to_string(),
            }),
            (_, None) => RowOutcome::Failed(RowFailure::MissingRequestCell {
                column: label_column.to_string(),
            }),
        };

        let sheet_row = crate::matcher::sheet_row(row_offset + idx);
        report.record(sheet_row, item.unwrap_or_default(), label.unwrap_or_default(), &outcome);

        let mut row = source.clone();
        if row.len() < width {
            row.resize(width, String::new());
        }
        row[result_col] = outcome.into_value(sentinel);
        rows.push(row);

        progress(idx + 1, total);
    }

    tracing::debug!(
        total = report.total_rows,
        found = report.found,
        not_found = report.not_found,
        unrecognized = report.unrecognized,
        warnings = report.warnings.len(),
        "augmented request rows"
    );

    Ok(Augmented {
        table: Table::new(headers, rows),
        report,
    })
}
