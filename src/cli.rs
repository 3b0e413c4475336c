use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pim-match")]
#[command(about = "PIM属性・ドキュメントURL照合ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 属性リクエストにPIMマスタの値を付与（Attribute Value）
    Attributes {
        /// PIMマスタファイル（catalog-number列＋属性列）
        #[arg(short, long)]
        master: PathBuf,

        /// リクエストファイル（Item no. / Attribute Name）
        #[arg(short, long)]
        request: PathBuf,

        /// 出力ファイル（デフォルト: Updated Request.xlsx）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 指定ページのみ処理（0始まり、省略時は全ページ）
        #[arg(long)]
        page: Option<usize>,

        /// 1ページあたりの行数（省略時は設定値）
        #[arg(long)]
        page_size: Option<usize>,

        /// JSONレポートの出力先
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// ドキュメントリクエストにURLを付与（FileName or Path to File）
    Documents {
        /// ドキュメントマスタ（Catalog Number / Spec Type / URL）
        #[arg(short, long)]
        master: PathBuf,

        /// リクエストファイル（Item no. / Media File Requested）
        #[arg(short, long)]
        request: PathBuf,

        /// 出力ファイル（デフォルト: updated_document_urls.csv）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// JSONレポートの出力先
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// 属性照合を対話的にページ送りしながら実行
    Browse {
        /// PIMマスタファイル（省略時は入力を求める）
        #[arg(short, long)]
        master: Option<PathBuf>,

        /// リクエストファイル（省略時は入力を求める）
        #[arg(short, long)]
        request: Option<PathBuf>,

        /// 保存先（デフォルト: Updated Request.xlsx）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 1ページあたりの行数（省略時は設定値）
        #[arg(long)]
        page_size: Option<usize>,
    },

    /// 属性名をマスタ列名に正規化して表示
    Normalize {
        /// 属性名（複数可）
        #[arg(required = true)]
        labels: Vec<String>,
    },

    /// ドキュメント種別の対応表を表示
    Categories,

    /// 設定を表示/編集
    Config {
        /// 1ページあたりの行数を設定
        #[arg(long)]
        page_size: Option<usize>,

        /// プレビュー行数を設定
        #[arg(long)]
        preview_rows: Option<usize>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_attributes() {
        let cli = Cli::parse_from([
            "pim-match", "attributes", "-m", "pim.xlsx", "-r", "req.xlsx", "--page", "2",
        ]);
        match cli.command {
            Commands::Attributes { master, request, page, output, .. } => {
                assert_eq!(master, PathBuf::from("pim.xlsx"));
                assert_eq!(request, PathBuf::from("req.xlsx"));
                assert_eq!(page, Some(2));
                assert!(output.is_none());
            }
            _ => panic!("attributes コマンドとして解析されるべき"),
        }
    }

    #[test]
    fn test_parse_normalize_requires_label() {
        assert!(Cli::try_parse_from(["pim-match", "normalize"]).is_err());
        let cli = Cli::try_parse_from(["pim-match", "-v", "normalize", "Height (in)"]).unwrap();
        assert!(cli.verbose);
    }
}
