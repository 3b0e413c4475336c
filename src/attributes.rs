//! 属性照合パイプライン（非対話）
//!
//! マスタとリクエストを読み込み、全ページ（または指定ページ）を処理して
//! 蓄積結果を出力する。

use crate::error::{PimMatchError, Result};
use crate::export::{self, OutputFormat};
use crate::report::{self, RunReport};
use pim_match_common::{AttributeSession, AugmentReport, TableCache};
use std::path::PathBuf;

/// 属性照合の実行オプション
#[derive(Debug, Clone)]
pub struct AttributeRun {
    pub master: PathBuf,
    pub request: PathBuf,
    pub output: PathBuf,
    /// 指定ページのみ処理（0始まり）
    pub page: Option<usize>,
    pub page_size: usize,
    pub report: Option<PathBuf>,
}

/// 属性照合を実行し、結果レポートを返す
pub fn run_attributes(run: &AttributeRun) -> Result<RunReport> {
    let mut cache = TableCache::new();
    let mut session = AttributeSession::uncached(run.page_size);

    println!("[1/4] マスタを読み込み中...");
    let master = crate::loader::load_table(&run.master, &mut cache)?;
    println!("✔ {} ({}行, {}列)\n", master.name, master.table.len(), master.table.width());
    session.set_master(master)?;

    println!("[2/4] リクエストを読み込み中...");
    let request = crate::loader::load_table(&run.request, &mut cache)?;
    println!("✔ {} ({}行)\n", request.name, request.table.len());
    session.set_request(request)?;

    println!("[3/4] 属性値を照合中...");
    let mut summary = AugmentReport::default();
    let mut pages = Vec::new();

    if let Some(page) = run.page {
        if !session.go_to(page) {
            let total = session.request().map(|s| s.table.len()).unwrap_or(0);
            return Err(PimMatchError::PageOutOfRange {
                page,
                page_count: session.pager().page_count(total),
            });
        }
        let view = session.view()?;
        println!("  {}", view.summary());
        summary.merge(&view.report);
        pages.push(view.page);
    } else {
        let mut next = Some(session.view()?);
        while let Some(view) = next {
            println!("  {}", view.summary());
            summary.merge(&view.report);
            pages.push(view.page);
            next = session.next()?;
        }
    }
    report::print_summary(&summary);
    report::print_warnings(&summary);
    println!("✔ 照合完了\n");

    println!("[4/4] 結果を保存中...");
    let accumulated = session.accumulated().to_table();
    let format = OutputFormat::from_path(&run.output, OutputFormat::Excel);
    export::export_table(&accumulated, &run.output, format)?;
    println!("✔ {}行を保存: {}", accumulated.len(), run.output.display());

    let master = session.master().ok_or(pim_match_common::Error::MasterNotLoaded)?;
    let request = session.request().ok_or(pim_match_common::Error::RequestNotLoaded)?;
    let mut run_report = RunReport::new("attributes", master, request, &run.output, summary);
    run_report.pages = pages;
    run_report.output_rows = accumulated.len();

    if let Some(path) = &run.report {
        run_report.save(path)?;
        println!("✔ レポートを保存: {}", path.display());
    }

    Ok(run_report)
}
