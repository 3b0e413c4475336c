//! PIM属性・ドキュメントURL照合ツール
//!
//! 照合ロジックは `pim-match-common` にあり、このクレートは
//! ファイル入出力・CLI・対話操作を担当する。

pub mod attributes;
pub mod browse;
pub mod cli;
pub mod config;
pub mod documents;
pub mod error;
pub mod export;
pub mod loader;
pub mod preview;
pub mod report;
