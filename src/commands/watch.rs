//! # 监视命令
//!
//! 持续监视目录，直到用户按下 Ctrl+C。
//!
//! ## 依赖关系
//! - 被 `commands/mod.rs` 调用
//! - 使用 `watch/monitor.rs`
//! - 使用 `ctrlc` 触发停止信号

use crate::batch::output::{create_dir_idempotent, OutputAllocator};
use crate::cli::Cli;
use crate::codec::Converter;
use crate::commands::EXIT_SUCCESS;
use crate::error::{NefconvError, Result};
use crate::models::ConversionSettings;
use crate::utils::output;
use crate::watch::{StopSignal, WatchMonitor};

use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// 执行监视模式
pub fn execute(cli: &Cli, directory: PathBuf, settings: ConversionSettings) -> Result<i32> {
    // 在分配输出目录之前校验，避免在不存在的路径下创建目录
    if !directory.is_dir() {
        return Err(NefconvError::WatchTargetInvalid {
            path: directory.display().to_string(),
        });
    }

    let output_dir = resolve_output_dir(cli.output.as_ref(), &directory)?;

    let stop = StopSignal::new();
    let handler = stop.clone();
    if let Err(e) = ctrlc::set_handler(move || handler.raise()) {
        output::print_warning(&format!("Could not install Ctrl+C handler: {}", e));
    }

    let mut monitor = WatchMonitor::new(&directory, output_dir, settings, Converter::system())
        .settle_delay(Duration::from_millis(cli.settle_ms));

    output::print_header("Watching for new NEF files");
    output::print_info(&format!("Directory: {}", directory.display()));
    output::print_info(&format!("Output: {}", monitor.session().output_dir.display()));
    output::print_info(&format!("Settings: {}", settings));
    output::print_info("Press Ctrl+C to stop");

    let summary = monitor.run(&stop)?;
    debug!("Watch monitor {}", monitor.state());

    output::print_separator();
    output::print_done(&format!(
        "Watch stopped: {} converted, {} failed",
        summary.converted, summary.failed
    ));

    Ok(EXIT_SUCCESS)
}

/// `--output` 优先（不存在则创建），否则在监视目录下分配新目录
fn resolve_output_dir(requested: Option<&PathBuf>, directory: &Path) -> Result<PathBuf> {
    match requested {
        Some(dir) => {
            create_dir_idempotent(dir)?;
            Ok(dir.clone())
        }
        None => OutputAllocator::new(directory).allocate(),
    }
}
