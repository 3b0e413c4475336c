//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    /// 必須列が揃っていない（SchemaError）
    #[error("{table}に必須列がありません: {}", missing.join(", "))]
    MissingColumns {
        table: String,
        missing: Vec<String>,
    },

    #[error("マスタファイルが読み込まれていません")]
    MasterNotLoaded,

    #[error("リクエストファイルが読み込まれていません")]
    RequestNotLoaded,
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
