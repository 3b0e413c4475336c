use clap::Parser;
use pim_match::{attributes, browse, cli, config, documents, error, export};
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use pim_match_common::{normalize_attribute_label, CATEGORY_MAP};
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Attributes { master, request, output, page, page_size, report } => {
            println!("📋 pim-match - 属性照合\n");

            let output = export::resolve_output_path(output.as_deref(), &config.attribute_output);
            attributes::run_attributes(&attributes::AttributeRun {
                master,
                request,
                output,
                page,
                page_size: page_size.unwrap_or(config.page_size),
                report,
            })?;

            println!("\n✅ 属性照合完了");
        }

        Commands::Documents { master, request, output, report } => {
            println!("📎 pim-match - ドキュメントURL照合\n");

            let output = export::resolve_output_path(output.as_deref(), &config.document_output);
            documents::run_documents(&documents::DocumentRun {
                master,
                request,
                output,
                report,
                preview_rows: config.preview_rows,
            })?;

            println!("\n✅ ドキュメント照合完了");
        }

        Commands::Browse { master, request, output, page_size } => {
            println!("📖 pim-match - ページ送り照合\n");

            let output = export::resolve_output_path(output.as_deref(), &config.attribute_output);
            browse::run_interactive_browse(
                master.as_deref(),
                request.as_deref(),
                &output,
                page_size.unwrap_or(config.page_size),
                config.preview_rows,
            )?;
        }

        Commands::Normalize { labels } => {
            for label in labels {
                println!("{} → {}", label, normalize_attribute_label(&label));
            }
        }

        Commands::Categories => {
            println!("ドキュメント種別:");
            for (label, category) in CATEGORY_MAP.iter() {
                println!("  {} → {}", label, category);
            }
        }

        Commands::Config { page_size, preview_rows, show } => {
            let mut config = config;

            if let Some(size) = page_size {
                config.set_page_size(size)?;
                println!("✔ ページサイズを設定しました: {}", size);
            }

            if let Some(rows) = preview_rows {
                config.set_preview_rows(rows)?;
                println!("✔ プレビュー行数を設定しました: {}", rows);
            }

            if show || (page_size.is_none() && preview_rows.is_none()) {
                println!("設定:");
                println!("  ページサイズ: {}行", config.page_size);
                println!("  プレビュー行数: {}", config.preview_rows);
                println!("  属性照合の出力: {}", config.attribute_output);
                println!("  ドキュメント照合の出力: {}", config.document_output);
                if let Ok(path) = Config::config_path() {
                    println!("  設定ファイル: {}", path.display());
                }
            }
        }
    }

    Ok(())
}
