//! # 文件扫描器
//!
//! 列出目录中（不递归）扩展名为 `.nef` 的普通文件，大小写不敏感、去重。
//!
//! ## 功能
//! - 目录存在性 / 类型校验
//! - glob 模式匹配（大小写不敏感）
//! - 结果按路径排序去重
//!
//! ## 依赖关系
//! - 被 `batch/orchestrator.rs` 调用
//! - 使用 `walkdir` 遍历目录，`glob` 匹配文件名

use crate::error::{NefconvError, Result};
use crate::models::task::RAW_EXTENSION;

use glob::{MatchOptions, Pattern};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// 批量模式文件扫描器
pub struct FileScanner {
    /// 输入目录
    directory: PathBuf,
    /// 匹配模式列表
    patterns: Vec<String>,
}

impl FileScanner {
    /// 创建扫描器，默认匹配 `*.nef`（大小写不敏感）
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            patterns: vec![format!("*.{}", RAW_EXTENSION)],
        }
    }

    /// 扫描目录
    pub fn scan(&self) -> Result<Vec<PathBuf>> {
        let dir_display = self.directory.display().to_string();

        if !self.directory.exists() {
            return Err(NefconvError::DirectoryNotFound { path: dir_display });
        }
        if !self.directory.is_dir() {
            return Err(NefconvError::NotADirectory { path: dir_display });
        }

        // 目录本身不可读时报告真实的 I/O 错误，而不是“没有文件”
        fs::read_dir(&self.directory).map_err(|e| NefconvError::DirectoryUnreadable {
            path: dir_display.clone(),
            source: e,
        })?;

        let patterns = self
            .patterns
            .iter()
            .map(|p| {
                Pattern::new(p).map_err(|e| {
                    NefconvError::InvalidArgument(format!("Invalid pattern '{}': {}", p, e))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut files = BTreeSet::new();
        let walker = WalkDir::new(&self.directory)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true);

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry in {}: {}", dir_display, e);
                    continue;
                }
            };
            if entry.file_type().is_file() && matches_patterns(&patterns, entry.path()) {
                files.insert(entry.into_path());
            }
        }

        if files.is_empty() {
            return Err(NefconvError::NoMatchingFiles { path: dir_display });
        }

        info!("Found {} NEF files in {}", files.len(), dir_display);
        Ok(files.into_iter().collect())
    }
}

/// 检查文件名是否匹配任一模式
fn matches_patterns(patterns: &[Pattern], path: &Path) -> bool {
    let filename = match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => name,
        None => {
            debug!("Skipping non UTF-8 file name: {}", path.display());
            return false;
        }
    };

    let options = MatchOptions {
        case_sensitive: false,
        ..MatchOptions::new()
    };

    patterns.iter().any(|p| p.matches_with(filename, options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"x").unwrap();
    }

    #[test]
    fn test_scan_mixed_case() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a.nef");
        touch(dir.path(), "b.NEF");
        touch(dir.path(), "c.Nef");
        touch(dir.path(), "notes.txt");
        touch(dir.path(), "d.nef.jpg");
        fs::create_dir(dir.path().join("sub.nef")).unwrap();
        touch(&dir.path().join("sub.nef"), "nested.nef");

        let files = FileScanner::new(dir.path()).scan().unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();

        assert_eq!(names, vec!["a.nef", "b.NEF", "c.Nef"]);
    }

    #[test]
    fn test_scan_no_matching_files() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "photo.jpg");
        touch(dir.path(), "raw.cr2");

        assert!(matches!(
            FileScanner::new(dir.path()).scan(),
            Err(NefconvError::NoMatchingFiles { .. })
        ));
    }

    #[test]
    fn test_scan_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            FileScanner::new(dir.path()).scan(),
            Err(NefconvError::NoMatchingFiles { .. })
        ));
    }

    #[test]
    fn test_scan_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            FileScanner::new(dir.path().join("nope")).scan(),
            Err(NefconvError::DirectoryNotFound { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_unreadable_directory() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        touch(&locked, "a.nef");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // root 忽略权限位，此时无法构造不可读目录
        let readable = fs::read_dir(&locked).is_ok();
        let result = FileScanner::new(&locked).scan();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        if readable {
            assert_eq!(result.unwrap().len(), 1);
        } else {
            assert!(matches!(
                result,
                Err(NefconvError::DirectoryUnreadable { .. })
            ));
        }
    }

    #[test]
    fn test_scan_file_instead_of_directory() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a.nef");
        assert!(matches!(
            FileScanner::new(dir.path().join("a.nef")).scan(),
            Err(NefconvError::NotADirectory { .. })
        ));
    }
}
