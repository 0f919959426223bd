//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数（单命令、扁平参数）。
//!
//! ## 运行模式
//! - 默认: 一次性批量转换目录中的所有 NEF 文件
//! - `--watch`: 持续监视目录，转换新出现的 NEF 文件
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 参数传递给 `commands/`

use clap::Parser;
use std::path::PathBuf;

use crate::models::settings::DEFAULT_QUALITY;
use crate::watch::monitor::DEFAULT_SETTLE_MS;

/// nefconv - Nikon NEF 转 JPEG 批量转换工具
#[derive(Parser, Debug)]
#[command(name = "nefconv")]
#[command(version)]
#[command(about = "Convert Nikon NEF raw files to JPEG, in batch or by watching a folder", long_about = None)]
pub struct Cli {
    /// Input directory containing NEF files (prompted for when omitted)
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// Output directory (watch mode only; batch mode always creates export_<id>)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// JPEG quality (1-100)
    #[arg(short, long, default_value_t = DEFAULT_QUALITY, allow_negative_numbers = true)]
    pub quality: i64,

    /// Number of parallel workers (default: CPU count)
    #[arg(short = 'j', long)]
    pub workers: Option<usize>,

    /// Convert files one at a time
    #[arg(long, default_value_t = false)]
    pub no_parallel: bool,

    /// Do not copy EXIF metadata into the JPEG files
    #[arg(long, default_value_t = false)]
    pub no_exif: bool,

    /// Watch the directory and convert new NEF files as they appear
    #[arg(short, long, default_value_t = false)]
    pub watch: bool,

    /// Never prompt; a missing --directory is an error
    #[arg(long, default_value_t = false)]
    pub no_gui: bool,

    /// Enable debug logging
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Watch mode: milliseconds to wait for a new file to finish writing
    #[arg(long, env = "NEFCONV_SETTLE_MS", default_value_t = DEFAULT_SETTLE_MS, hide = true)]
    pub settle_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["nefconv"]).unwrap();
        assert_eq!(cli.quality, 95);
        assert_eq!(cli.settle_ms, DEFAULT_SETTLE_MS);
        assert!(cli.directory.is_none());
        assert!(cli.workers.is_none());
        assert!(!cli.watch && !cli.no_parallel && !cli.no_exif && !cli.no_gui);
    }

    #[test]
    fn test_out_of_range_quality_reaches_validation() {
        let cli = Cli::try_parse_from(["nefconv", "-q", "-5", "--no-gui"]).unwrap();
        assert_eq!(cli.quality, -5);
        let cli = Cli::try_parse_from(["nefconv", "--quality", "101"]).unwrap();
        assert_eq!(cli.quality, 101);
    }

    #[test]
    fn test_short_flags() {
        let cli =
            Cli::try_parse_from(["nefconv", "-d", "/photos", "-o", "/out", "-j", "3", "-w", "-v"])
                .unwrap();
        assert_eq!(cli.directory, Some(PathBuf::from("/photos")));
        assert_eq!(cli.output, Some(PathBuf::from("/out")));
        assert_eq!(cli.workers, Some(3));
        assert!(cli.watch && cli.verbose);
    }
}
