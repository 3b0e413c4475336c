//! PIM Match Common Library
//!
//! リクエスト表とマスタ表の照合ロジック（ファイル入出力なし）

pub mod error;
pub mod table;
pub mod label;
pub mod category;
pub mod matcher;
pub mod augment;
pub mod source;
pub mod session;

pub use error::{Error, Result};
pub use table::Table;
pub use label::normalize_attribute_label;
pub use category::{DocumentCategory, CATEGORY_MAP};
pub use matcher::{AttributeMaster, DocumentMaster, RowFailure, RowOutcome};
pub use augment::{augment_attributes, augment_documents, AugmentReport, Augmented, RowWarning};
pub use source::{ContentHash, SourceTable, TableCache};
pub use session::{AccumulatedResults, AttributeSession, PageView, Pager, DEFAULT_PAGE_SIZE};
