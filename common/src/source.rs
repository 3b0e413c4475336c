//! 読み込み済みファイルの識別
//!
//! ファイル内容のSHA-256を識別子として、読み込み済みの表をキャッシュする。

use crate::table::Table;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;

/// ファイル内容のハッシュ（SHA-256）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    pub fn of_bytes(bytes: &[u8]) -> Self {
        Self(Sha256::digest(bytes).into())
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// 表示用の短縮形（先頭12桁）
    pub fn short(&self) -> String {
        let mut hex = self.to_hex();
        hex.truncate(12);
        hex
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// 読み込み済みの表（アップロードされた1ファイル）
#[derive(Debug, Clone)]
pub struct SourceTable {
    /// 表示用のファイル名
    pub name: String,
    pub hash: ContentHash,
    pub table: Arc<Table>,
}

impl SourceTable {
    pub fn new(name: impl Into<String>, hash: ContentHash, table: Table) -> Self {
        Self {
            name: name.into(),
            hash,
            table: Arc::new(table),
        }
    }
}

/// 内容ハッシュ → パース済みの表
///
/// 同じ内容のファイルを読み直した場合はパースを省略する。
#[derive(Debug, Default)]
pub struct TableCache {
    entries: HashMap<ContentHash, Arc<Table>>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, hash: &ContentHash) -> Option<Arc<Table>> {
        self.entries.get(hash).cloned()
    }

    /// キャッシュから取得、なければ `parse` で作成して登録
    pub fn get_or_try_insert<E, F>(&mut self, hash: ContentHash, parse: F) -> Result<Arc<Table>, E>
    where
        F: FnOnce() -> Result<Table, E>,
    {
        if let Some(table) = self.get(&hash) {
            tracing::debug!(hash = %hash.short(), "table cache hit");
            return Ok(table);
        }
        let table = Arc::new(parse()?);
        self.entries.insert(hash, Arc::clone(&table));
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_content_addressed() {
        let a = ContentHash::of_bytes(b"catalog-number,height\nA1,10\n");
        let b = ContentHash::of_bytes(b"catalog-number,height\nA1,10\n");
        let c = ContentHash::of_bytes(b"catalog-number,height\nA1,11\n");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_hash_hex() {
        // SHA-256("")
        let hash = ContentHash::of_bytes(b"");
        assert_eq!(
            hash.to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(hash.short(), "e3b0c44298fc");
        assert_eq!(format!("{}", hash), hash.to_hex());
    }

    #[test]
    fn test_table_cache_parses_once() {
        let mut cache = TableCache::new();
        let hash = ContentHash::of_bytes(b"x");
        let mut parses = 0;

        for _ in 0..3 {
            let table = cache
                .get_or_try_insert::<(), _>(hash, || {
                    parses += 1;
                    Ok(Table::from_rows(&["a"], &[&["1"]]))
                })
                .unwrap();
            assert_eq!(table.len(), 1);
        }

        assert_eq!(parses, 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_table_cache_parse_error_not_cached() {
        let mut cache = TableCache::new();
        let hash = ContentHash::of_bytes(b"broken");
        let result = cache.get_or_try_insert(hash, || Err("壊れたファイル"));
        assert_eq!(result.unwrap_err(), "壊れたファイル");
        assert!(cache.is_empty());
    }
}
