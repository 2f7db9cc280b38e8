//! 处理结果登记・临时文件清理
//!
//! 处理结果以随机ID登记，超过保留时间后视为失效。
//! 登记表由调用方持有，不使用进程级全局状态。

use crate::error::Result;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
struct StoredFile {
    path: PathBuf,
    inserted_at: DateTime<Utc>,
}

/// 文件ID → 结果文件路径
#[derive(Debug, Clone)]
pub struct ProcessedFileStore {
    entries: HashMap<String, StoredFile>,
    max_age: Duration,
}

impl ProcessedFileStore {
    pub fn new(max_age: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            max_age,
        }
    }

    pub fn with_max_age_secs(secs: u64) -> Self {
        let secs = i64::try_from(secs).unwrap_or(i64::MAX).min(i64::MAX / 1000);
        Self::new(Duration::seconds(secs))
    }

    /// 登记并返回新的文件ID
    pub fn insert(&mut self, path: PathBuf) -> String {
        self.insert_at(path, Utc::now())
    }

    pub fn insert_at(&mut self, path: PathBuf, now: DateTime<Utc>) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        self.entries.insert(
            id.clone(),
            StoredFile {
                path,
                inserted_at: now,
            },
        );
        id
    }

    /// 查找结果文件（已过期或文件已被删除时返回 None）
    pub fn get(&self, id: &str) -> Option<&Path> {
        self.get_at(id, Utc::now())
    }

    pub fn get_at(&self, id: &str, now: DateTime<Utc>) -> Option<&Path> {
        let entry = self.entries.get(id)?;
        if self.is_expired(entry, now) || !entry.path.exists() {
            return None;
        }
        Some(&entry.path)
    }

    /// 删除过期登记，返回删除数
    pub fn evict_expired(&mut self) -> usize {
        self.evict_expired_at(Utc::now())
    }

    pub fn evict_expired_at(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        let max_age = self.max_age;
        self.entries.retain(|_, entry| now - entry.inserted_at <= max_age);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn is_expired(&self, entry: &StoredFile, now: DateTime<Utc>) -> bool {
        now - entry.inserted_at > self.max_age
    }
}

/// 删除目录下（不递归）修改时间早于 `max_age` 的文件
///
/// 单个文件删除失败时忽略。目录不存在时返回 0。
pub fn clean_temp_files(dir: &Path, max_age: std::time::Duration) -> Result<usize> {
    if !dir.exists() {
        return Ok(0);
    }

    let now = std::time::SystemTime::now();
    let mut removed = 0;

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let age = entry
            .metadata()
            .ok()
            .and_then(|m| m.modified().ok())
            .and_then(|modified| now.duration_since(modified).ok());

        if matches!(age, Some(age) if age > max_age) {
            match std::fs::remove_file(path) {
                Ok(()) => removed += 1,
                Err(e) => tracing::debug!(path = %path.display(), error = %e, "临时文件删除失败"),
            }
        }
    }

    if removed > 0 {
        tracing::info!(dir = %dir.display(), removed, "已清理过期临时文件");
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_store_insert_and_get() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("8月班次原始数据.xlsx");
        std::fs::write(&path, b"x").unwrap();

        let mut store = ProcessedFileStore::with_max_age_secs(3600);
        let id = store.insert(path.clone());
        assert_eq!(store.get(&id), Some(path.as_path()));
        assert_eq!(store.get("unknown"), None);
    }

    #[test]
    fn test_store_expired_entry_misses() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        std::fs::write(&path, b"x").unwrap();

        let mut store = ProcessedFileStore::new(Duration::seconds(60));
        let start = Utc::now();
        let id = store.insert_at(path, start);

        assert!(store.get_at(&id, start + Duration::seconds(30)).is_some());
        assert!(store.get_at(&id, start + Duration::seconds(61)).is_none());

        assert_eq!(store.evict_expired_at(start + Duration::seconds(30)), 0);
        assert_eq!(store.evict_expired_at(start + Duration::seconds(61)), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_missing_file_misses() {
        let dir = tempdir().unwrap();
        let mut store = ProcessedFileStore::with_max_age_secs(3600);
        let id = store.insert(dir.path().join("deleted.xlsx"));
        assert!(store.get(&id).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_clean_temp_files() {
        let dir = tempdir().unwrap();
        let old = dir.path().join("old.xlsx");
        let fresh = dir.path().join("fresh.xlsx");
        std::fs::write(&old, b"x").unwrap();
        std::fs::write(&fresh, b"x").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();

        let two_hours_ago = std::time::SystemTime::now() - std::time::Duration::from_secs(7200);
        std::fs::File::options()
            .write(true)
            .open(&old)
            .unwrap()
            .set_modified(two_hours_ago)
            .unwrap();

        let removed = clean_temp_files(dir.path(), std::time::Duration::from_secs(3600)).unwrap();
        assert_eq!(removed, 1);
        assert!(!old.exists());
        assert!(fresh.exists());
        assert!(dir.path().join("sub").exists());
    }

    #[test]
    fn test_clean_temp_files_missing_dir() {
        let removed =
            clean_temp_files(Path::new("/nonexistent/temp_files_12345"), std::time::Duration::ZERO)
                .unwrap();
        assert_eq!(removed, 0);
    }
}
