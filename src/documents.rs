//! ドキュメントURL照合パイプライン

use crate::error::Result;
use crate::export::{self, OutputFormat};
use crate::preview::render_preview;
use crate::report::{self, RunReport};
use indicatif::{ProgressBar, ProgressStyle};
use pim_match_common::matcher::{DOC_CATALOG_NUMBER_COLUMN, DOC_SPEC_TYPE_COLUMN, DOC_URL_COLUMN};
use pim_match_common::{augment_documents, TableCache};
use std::path::PathBuf;

/// ドキュメント照合の実行オプション
#[derive(Debug, Clone)]
pub struct DocumentRun {
    pub master: PathBuf,
    pub request: PathBuf,
    pub output: PathBuf,
    pub report: Option<PathBuf>,
    /// 読み込み後に表示する行数（0で非表示）
    pub preview_rows: usize,
}

fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    let style = ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")
        .map(|s| s.progress_chars("##-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb
}

/// ドキュメント照合を実行し、結果レポートを返す
pub fn run_documents(run: &DocumentRun) -> Result<RunReport> {
    let mut cache = TableCache::new();

    println!("[1/4] ドキュメントマスタを読み込み中...");
    let master = crate::loader::load_table(&run.master, &mut cache)?;
    master.table.require_columns(
        "マスタ",
        &[DOC_CATALOG_NUMBER_COLUMN, DOC_SPEC_TYPE_COLUMN, DOC_URL_COLUMN],
    )?;
    println!("✔ {} ({}行)", master.name, master.table.len());
    if run.preview_rows > 0 {
        print!("{}", render_preview(&master.table, run.preview_rows));
    }
    println!();

    println!("[2/4] リクエストを読み込み中...");
    let request = crate::loader::load_table(&run.request, &mut cache)?;
    println!("✔ {} ({}行)", request.name, request.table.len());
    if run.preview_rows > 0 {
        print!("{}", render_preview(&request.table, run.preview_rows));
    }
    println!();

    println!("[3/4] ドキュメントURLを照合中...");
    let pb = progress_bar(request.table.len());
    let augmented = augment_documents(&master.table, &request.table, |done, _| {
        pb.set_position(done as u64);
    })?;
    pb.finish_with_message("完了");
    if run.preview_rows > 0 {
        print!("{}", render_preview(&augmented.table, run.preview_rows));
    }
    report::print_summary(&augmented.report);
    report::print_warnings(&augmented.report);
    println!("✔ 照合完了\n");

    println!("[4/4] 結果を保存中...");
    let format = OutputFormat::from_path(&run.output, OutputFormat::Csv);
    export::export_table(&augmented.table, &run.output, format)?;
    println!("✔ {}行を保存: {}", augmented.table.len(), run.output.display());

    let mut run_report = RunReport::new("documents", &master, &request, &run.output, augmented.report);
    run_report.output_rows = augmented.table.len();

    if let Some(path) = &run.report {
        run_report.save(path)?;
        println!("✔ レポートを保存: {}", path.display());
    }

    Ok(run_report)
}
