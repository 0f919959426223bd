//! # 批量转换编排
//!
//! 一次运行：扫描 -> 分配输出目录 -> 分派任务 -> 汇总统计 -> 打开输出目录。
//!
//! ## 功能
//! - 扫描 / 目录错误在分派任何任务之前终止整个运行
//! - 多于一个任务且启用并行时使用有界线程池，否则顺序执行
//! - 单个任务失败只记入结果，不影响其他任务
//! - 至少一个成功时尽力打开输出目录，失败只记录日志
//!
//! ## 依赖关系
//! - 被 `commands/batch.rs` 调用
//! - 使用 `batch/collector.rs`, `batch/output.rs`, `batch/runner.rs`
//! - 使用 `codec/converter.rs` 执行单个任务

use crate::batch::{BatchRunner, FileScanner, Mode, OutputAllocator};
use crate::codec::{Converter, ExifRetry};
use crate::error::Result;
use crate::models::{BatchStatistics, ConversionSettings, ConversionTask, RunReport};
use crate::utils::reveal::Reveal;

use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

/// 批量转换编排器
pub struct BatchOrchestrator {
    settings: ConversionSettings,
    converter: Converter,
    reveal: Box<dyn Reveal>,
    parallel: bool,
    interactive: bool,
}

impl BatchOrchestrator {
    pub fn new(settings: ConversionSettings, converter: Converter, reveal: impl Reveal + 'static) -> Self {
        info!("Initialized NEF converter with {}", settings);
        Self {
            settings,
            converter,
            reveal: Box::new(reveal),
            parallel: true,
            interactive: true,
        }
    }

    /// 是否允许并行
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// 是否显示进度条
    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    /// 转换目录中的所有 NEF 文件
    pub fn run(&self, directory: &Path) -> Result<RunReport> {
        let start = Instant::now();

        let files = FileScanner::new(directory).scan()?;
        let output_dir = OutputAllocator::new(directory).allocate()?;

        let tasks: Vec<ConversionTask> = files
            .into_iter()
            .map(|file| ConversionTask::new(file, &output_dir, self.settings))
            .collect();

        let runner = if self.parallel && tasks.len() > 1 {
            BatchRunner::parallel(self.settings.effective_workers())
        } else {
            BatchRunner::sequential()
        }
        .interactive(self.interactive);

        let workers = match runner.mode() {
            Mode::Parallel(jobs) => Some(jobs),
            Mode::Sequential => None,
        };

        let converter = &self.converter;
        let result = runner.run(&tasks, |task| converter.convert(task, ExifRetry::Once));

        let total = tasks.len();
        debug_assert_eq!(result.total(), total);
        let statistics = BatchStatistics::from_elapsed(start.elapsed(), total);

        info!(
            "Conversion complete: {}/{} files converted in {:.2}s",
            result.success,
            total,
            statistics.total_time.as_secs_f64()
        );

        if result.success > 0 {
            if let Err(e) = self.reveal.reveal(&output_dir) {
                warn!("Could not open directory {}: {}", output_dir.display(), e);
            }
        }

        Ok(RunReport {
            output_dir,
            successful: result.success,
            total,
            failures: result.failures,
            warnings: result.warnings,
            workers,
            statistics,
        })
    }
}
