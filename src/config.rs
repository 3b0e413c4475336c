use crate::error::{PimMatchError, Result};
use pim_match_common::DEFAULT_PAGE_SIZE;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 属性照合の1ページあたりの行数
    pub page_size: usize,
    /// プレビュー表示の行数
    pub preview_rows: usize,
    /// 属性照合の出力ファイル名
    pub attribute_output: String,
    /// ドキュメント照合の出力ファイル名
    pub document_output: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default_config())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.validate()?;
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| PimMatchError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("pim-match").join("config.json"))
    }

    fn default_config() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            preview_rows: 10,
            attribute_output: "Updated Request.xlsx".into(),
            document_output: "updated_document_urls.csv".into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(PimMatchError::Config("page_size は1以上にしてください".into()));
        }
        if self.attribute_output.trim().is_empty() || self.document_output.trim().is_empty() {
            return Err(PimMatchError::Config("出力ファイル名が空です".into()));
        }
        Ok(())
    }

    pub fn set_page_size(&mut self, page_size: usize) -> Result<()> {
        self.page_size = page_size;
        self.save()
    }

    pub fn set_preview_rows(&mut self, preview_rows: usize) -> Result<()> {
        self.preview_rows = preview_rows;
        self.save()
    }
}
