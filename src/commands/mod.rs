//! # 命令执行模块
//!
//! 校验参数、确定输入目录，然后进入批量或监视模式。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `models/`, `utils/`
//! - 子模块: batch, watch

pub mod batch;
pub mod watch;

use crate::cli::Cli;
use crate::error::{NefconvError, Result};
use crate::models::ConversionSettings;
use crate::utils::picker;

use std::path::PathBuf;

/// 全部成功 / 监视正常停止
pub const EXIT_SUCCESS: i32 = 0;
/// 用户按下 Ctrl+C 中断批量转换
pub const EXIT_INTERRUPTED: i32 = 130;

/// 执行命令，返回进程退出码
pub fn run(cli: Cli) -> Result<i32> {
    // 先校验设置：无效参数不应留下任何输出目录
    let settings = ConversionSettings::new(cli.quality, cli.workers, !cli.no_exif)?;
    let directory = resolve_directory(cli.directory.clone(), cli.no_gui)?;

    if cli.watch {
        watch::execute(&cli, directory, settings)
    } else {
        batch::execute(&cli, directory, settings)
    }
}

/// 确定输入目录：命令行 > 交互式询问
fn resolve_directory(directory: Option<PathBuf>, no_gui: bool) -> Result<PathBuf> {
    match directory {
        Some(dir) => Ok(dir),
        None if no_gui => Err(NefconvError::NoDirectorySelected),
        None => picker::select_directory("Directory containing NEF files")
            .ok_or(NefconvError::NoDirectorySelected),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("nefconv").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_invalid_quality_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.nef"), b"raw").unwrap();
        let path = dir.path().to_str().unwrap();

        for quality in ["0", "101", "-3"] {
            let result = run(cli(&["-d", path, "-q", quality, "--no-gui"]));
            assert!(matches!(result, Err(NefconvError::InvalidQuality(_))));
        }
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_zero_workers_rejected() {
        let result = run(cli(&["-j", "0", "--no-gui"]));
        assert!(matches!(result, Err(NefconvError::InvalidWorkerCount)));
    }

    #[test]
    fn test_missing_directory_without_gui() {
        assert!(matches!(
            run(cli(&["--no-gui"])),
            Err(NefconvError::NoDirectorySelected)
        ));
    }

    #[test]
    fn test_batch_on_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let result = run(cli(&["-d", missing.to_str().unwrap(), "--no-gui"]));
        assert!(matches!(result, Err(NefconvError::DirectoryNotFound { .. })));
    }

    #[test]
    fn test_watch_on_missing_directory_creates_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let result = run(cli(&["-d", missing.to_str().unwrap(), "--watch", "--no-gui"]));
        assert!(matches!(result, Err(NefconvError::WatchTargetInvalid { .. })));
        assert!(!missing.exists());
    }
}
