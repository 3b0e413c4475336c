//! 対話式ページ送り
//!
//! 属性照合セッションを端末上で操作する。ページ移動・ファイル差し替え・保存を
//! [`BrowseAction`] として [`Browser::apply`] に渡す。プロンプトは
//! [`run_interactive_browse`] のみが扱う。

use crate::error::{PimMatchError, Result};
use crate::export::{self, OutputFormat};
use crate::loader;
use crate::preview::render_preview;
use crate::report;
use dialoguer::{Input, Select};
use pim_match_common::{AttributeSession, PageView, TableCache};
use std::path::{Path, PathBuf};

/// 対話アクション
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseAction {
    /// 現在ページを表示
    View,
    /// 次のページへ
    Next,
    /// 前のページへ
    Previous,
    /// 蓄積結果を保存
    Save,
    /// マスタを別ファイルに差し替え
    ReloadMaster(PathBuf),
    /// リクエストを別ファイルに差し替え
    ReloadRequest(PathBuf),
    /// 終了
    Quit,
}

/// アクションの結果
#[derive(Debug)]
pub enum BrowseStep {
    Viewed(PageView),
    /// 先頭または末尾で移動できなかった
    Boundary,
    Saved { path: PathBuf, rows: usize },
    Quit,
}

/// ページ送りの状態
#[derive(Debug)]
pub struct Browser {
    session: AttributeSession,
    cache: TableCache,
    output: PathBuf,
}

impl Browser {
    pub fn new(page_size: usize, output: PathBuf) -> Self {
        Self {
            session: AttributeSession::new(page_size),
            cache: TableCache::new(),
            output,
        }
    }

    pub fn session(&self) -> &AttributeSession {
        &self.session
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn load_master(&mut self, path: &Path) -> Result<()> {
        let source = loader::load_table(path, &mut self.cache)?;
        self.session.set_master(source)?;
        Ok(())
    }

    pub fn load_request(&mut self, path: &Path) -> Result<()> {
        let source = loader::load_table(path, &mut self.cache)?;
        self.session.set_request(source)?;
        Ok(())
    }

    /// 蓄積結果を保存し、保存行数を返す
    pub fn save(&self) -> Result<usize> {
        let table = self.session.accumulated().to_table();
        let format = OutputFormat::from_path(&self.output, OutputFormat::Excel);
        export::export_table(&table, &self.output, format)?;
        Ok(table.len())
    }

    pub fn apply(&mut self, action: BrowseAction) -> Result<BrowseStep> {
        match action {
            BrowseAction::View => Ok(BrowseStep::Viewed(self.session.view()?)),
            BrowseAction::Next => Ok(self
                .session
                .next()?
                .map(BrowseStep::Viewed)
                .unwrap_or(BrowseStep::Boundary)),
            BrowseAction::Previous => Ok(self
                .session
                .previous()?
                .map(BrowseStep::Viewed)
                .unwrap_or(BrowseStep::Boundary)),
            BrowseAction::Save => {
                let rows = self.save()?;
                Ok(BrowseStep::Saved {
                    path: self.output.clone(),
                    rows,
                })
            }
            BrowseAction::ReloadMaster(path) => {
                self.load_master(&path)?;
                Ok(BrowseStep::Viewed(self.session.view()?))
            }
            BrowseAction::ReloadRequest(path) => {
                self.load_request(&path)?;
                Ok(BrowseStep::Viewed(self.session.view()?))
            }
            BrowseAction::Quit => Ok(BrowseStep::Quit),
        }
    }
}

fn print_view(view: &PageView, preview_rows: usize, accumulated: usize) {
    println!("\n{}{}", view.summary(), if view.cached { " (キャッシュ)" } else { "" });
    if preview_rows > 0 {
        print!("{}", render_preview(&view.table, preview_rows));
    }
    report::print_summary(&view.report);
    report::print_warnings(&view.report);
    println!("  蓄積結果: {}行 (+{})", accumulated, view.added_rows);
}

fn prompt_path(prompt: &str) -> Result<PathBuf> {
    let input: String = Input::new()
        .with_prompt(prompt)
        .interact_text()
        .map_err(|e| PimMatchError::Prompt(e.to_string()))?;
    Ok(PathBuf::from(input.trim()))
}

fn prompt_action(session: &AttributeSession) -> Result<BrowseAction> {
    let mut labels = Vec::new();
    let mut actions = Vec::new();

    if session.has_next() {
        labels.push("次のページ");
        actions.push(BrowseAction::Next);
    }
    if session.has_previous() {
        labels.push("前のページ");
        actions.push(BrowseAction::Previous);
    }
    labels.extend(["結果を保存", "マスタを差し替え", "リクエストを差し替え", "終了"]);

    let selection = Select::new()
        .with_prompt("操作を選択")
        .items(&labels)
        .default(0)
        .interact()
        .map_err(|e| PimMatchError::Prompt(e.to_string()))?;

    if let Some(action) = actions.get(selection) {
        return Ok(action.clone());
    }
    match selection - actions.len() {
        0 => Ok(BrowseAction::Save),
        1 => Ok(BrowseAction::ReloadMaster(prompt_path("マスタファイルのパス")?)),
        2 => Ok(BrowseAction::ReloadRequest(prompt_path("リクエストファイルのパス")?)),
        _ => Ok(BrowseAction::Quit),
    }
}

/// 対話式で属性照合をページ送りする
pub fn run_interactive_browse(
    master: Option<&Path>,
    request: Option<&Path>,
    output: &Path,
    page_size: usize,
    preview_rows: usize,
) -> Result<()> {
    let mut browser = Browser::new(page_size, output.to_path_buf());

    let master = match master {
        Some(path) => path.to_path_buf(),
        None => prompt_path("マスタファイルのパス")?,
    };
    browser.load_master(&master)?;

    let request = match request {
        Some(path) => path.to_path_buf(),
        None => prompt_path("リクエストファイルのパス")?,
    };
    browser.load_request(&request)?;

    println!("---");
    println!("操作: 次/前のページ・保存・ファイル差し替え・終了");
    println!("---");

    let mut action = BrowseAction::View;
    loop {
        match browser.apply(action) {
            Ok(BrowseStep::Viewed(view)) => {
                print_view(&view, preview_rows, browser.session().accumulated().len());
            }
            Ok(BrowseStep::Boundary) => println!("  → これ以上移動できません"),
            Ok(BrowseStep::Saved { path, rows }) => {
                println!("✔ {}行を保存: {}", rows, path.display());
            }
            Ok(BrowseStep::Quit) => break,
            // 読み込み失敗などはセッションを保ったまま続行
            Err(e) => println!("⚠ {}", e),
        }
        action = prompt_action(browser.session())?;
    }

    if !browser.session().accumulated().is_empty() {
        println!(
            "未保存の場合は「結果を保存」で {} に書き出してください",
            browser.output().display()
        );
    }
    Ok(())
}
