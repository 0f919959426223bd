//! # 输出目录分配
//!
//! 每次运行在基目录下创建一个 `export_<8 位十六进制>` 新目录。
//! 尽力保证唯一，而非严格分配器：目录已存在时视为成功。
//!
//! ## 依赖关系
//! - 被 `batch/orchestrator.rs`, `commands/watch.rs` 调用
//! - 使用 `uuid` 生成随机后缀

use crate::error::{NefconvError, Result};

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use uuid::Uuid;

/// 输出目录前缀
pub const OUTPUT_PREFIX: &str = "export_";

/// 随机后缀长度
const TOKEN_LEN: usize = 8;

/// 输出目录分配器
pub struct OutputAllocator {
    base: PathBuf,
}

impl OutputAllocator {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// 创建新的输出目录
    pub fn allocate(&self) -> Result<PathBuf> {
        let token = Uuid::new_v4().simple().to_string();
        let dir = self
            .base
            .join(format!("{}{}", OUTPUT_PREFIX, &token[..TOKEN_LEN]));

        create_dir_idempotent(&dir)?;
        info!("Created output directory: {}", dir.display());
        Ok(dir)
    }
}

/// 创建目录；已存在视为成功
pub fn create_dir_idempotent(dir: &Path) -> Result<()> {
    match fs::create_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && dir.is_dir() => {
            warn!("Output directory already exists: {}", dir.display());
            Ok(())
        }
        Err(e) => Err(NefconvError::OutputDirectoryCreationFailed {
            path: dir.display().to_string(),
            source: e,
        }),
    }
}
