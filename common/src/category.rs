//! ドキュメント種別マップ
//!
//! リクエスト表の「Media File Requested」ラベルを、
//! マスタ表の「Spec Type」カテゴリに変換する固定テーブル。

/// マスタ表の Spec Type（閉じた語彙）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentCategory {
    Installation,
    WarrantyCard,
    OwnersManual,
    Brochure,
    ProductData,
    WiringDiagrams,
    Submittal,
}

/// リクエストラベル → カテゴリの対応表（7件）
pub const CATEGORY_MAP: [(&str, DocumentCategory); 7] = [
    ("Installation Instructions", DocumentCategory::Installation),
    ("Warranty Document", DocumentCategory::WarrantyCard),
    ("Use & Care Instructions", DocumentCategory::OwnersManual),
    ("Consumer Literature", DocumentCategory::Brochure),
    ("Specification Sheet", DocumentCategory::ProductData),
    ("Wiring Diagrams", DocumentCategory::WiringDiagrams),
    ("Submittal Sheet", DocumentCategory::Submittal),
];

impl DocumentCategory {
    /// リクエストラベルからカテゴリを取得（完全一致・大文字小文字区別）
    pub fn from_request_label(label: &str) -> Option<Self> {
        CATEGORY_MAP
            .iter()
            .find(|(key, _)| *key == label)
            .map(|(_, category)| *category)
    }

    /// マスタ表の Spec Type 値
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentCategory::Installation => "Installation",
            DocumentCategory::WarrantyCard => "Warranty Card",
            DocumentCategory::OwnersManual => "Owners Manual",
            DocumentCategory::Brochure => "Brochure",
            DocumentCategory::ProductData => "Product Data",
            DocumentCategory::WiringDiagrams => "Wiring Diagrams",
            DocumentCategory::Submittal => "Submittal",
        }
    }
}

impl std::fmt::Display for DocumentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
