use thiserror::Error;

#[derive(Error, Debug)]
pub enum PimMatchError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    /// 読み込めない・形式が不正なファイル（FileReadError）
    #[error("ファイル読み込みエラー ({path}): {reason}")]
    FileRead { path: String, reason: String },

    #[error("未対応のファイル形式です: {0} (xlsx/xlsm/csv のいずれか)")]
    UnsupportedFormat(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),

    #[error("CSV出力エラー: {0}")]
    CsvWrite(String),

    #[error("ページ {page} は範囲外です (全{page_count}ページ、0始まり)")]
    PageOutOfRange { page: usize, page_count: usize },

    #[error("入力エラー: {0}")]
    Prompt(String),

    #[error(transparent)]
    Common(#[from] pim_match_common::Error),
}

pub type Result<T> = std::result::Result<T, PimMatchError>;
