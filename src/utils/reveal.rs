//! # 在文件管理器中打开目录
//!
//! 尽力而为的系统集成：失败只记录日志，不影响转换结果。
//!
//! ## 依赖关系
//! - 被 `batch/orchestrator.rs` 使用（通过 `Reveal` trait 注入）

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

/// 打开目录的能力
pub trait Reveal: Send + Sync {
    fn reveal(&self, directory: &Path) -> io::Result<()>;
}

impl<R: Reveal + ?Sized> Reveal for Box<R> {
    fn reveal(&self, directory: &Path) -> io::Result<()> {
        (**self).reveal(directory)
    }
}

/// 调用系统文件管理器
#[derive(Debug, Clone)]
pub struct SystemFileBrowser {
    program: PathBuf,
}

impl SystemFileBrowser {
    /// 按平台选择文件管理器命令
    pub fn detect() -> Self {
        Self::with_program(default_program())
    }

    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for SystemFileBrowser {
    fn default() -> Self {
        Self::detect()
    }
}

impl Reveal for SystemFileBrowser {
    fn reveal(&self, directory: &Path) -> io::Result<()> {
        debug!("Opening {} with {}", directory.display(), self.program.display());
        let child = Command::new(&self.program)
            .arg(directory)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        // 文件管理器独立运行，不等待其退出
        drop(child);
        Ok(())
    }
}

/// 不做任何事（`--no-gui` 等场景）
#[derive(Debug, Default, Clone, Copy)]
pub struct NoReveal;

impl Reveal for NoReveal {
    fn reveal(&self, _directory: &Path) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(windows)]
fn default_program() -> PathBuf {
    let windir = std::env::var("WINDIR").unwrap_or_else(|_| "C:\\Windows".to_string());
    PathBuf::from(windir).join("explorer.exe")
}

#[cfg(target_os = "macos")]
fn default_program() -> PathBuf {
    PathBuf::from("open")
}

#[cfg(not(any(windows, target_os = "macos")))]
fn default_program() -> PathBuf {
    PathBuf::from("xdg-open")
}
