//! # 批量执行器
//!
//! 以有界并行度或顺序方式执行转换任务，并在全部完成后汇总结果。
//!
//! ## 功能
//! - 基于 rayon 专用线程池的并行迭代
//! - 顺序执行回退
//! - 进度条显示与失败即时输出
//! - 与完成顺序无关的结果汇总
//!
//! ## 依赖关系
//! - 被 `batch/orchestrator.rs` 调用
//! - 使用 `utils/progress.rs` 创建进度条
//! - 使用 `rayon` 进行并行计算

use crate::models::{ConversionResult, FailureReason, TaskOutcome};
use crate::utils::{output, progress};

use indicatif::ProgressBar;
use rayon::prelude::*;
use std::path::PathBuf;
use tracing::warn;

/// 批量处理结果统计
#[derive(Debug, Default)]
pub struct BatchResult {
    /// 成功数量
    pub success: usize,
    /// 失败数量
    pub failed: usize,
    /// 警告数量
    pub warnings: usize,
    /// 失败详情
    pub failures: Vec<(PathBuf, FailureReason)>,
}

impl BatchResult {
    /// 合并处理结果
    pub fn merge(&mut self, result: ConversionResult) {
        self.warnings += result.warnings.len();
        match result.outcome {
            TaskOutcome::Success(_) => self.success += 1,
            TaskOutcome::Failure(reason) => {
                self.failed += 1;
                self.failures.push((result.input, reason));
            }
        }
    }

    /// 总处理数量
    pub fn total(&self) -> usize {
        self.success + self.failed
    }
}

/// 执行模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// 有界并行（作业数）
    Parallel(usize),
    /// 按扫描顺序逐个执行
    Sequential,
}

/// 批量执行器
pub struct BatchRunner {
    mode: Mode,
    /// 是否显示进度条与逐个失败信息
    interactive: bool,
}

impl BatchRunner {
    /// 并行执行器（0 = 自动）
    pub fn parallel(jobs: usize) -> Self {
        let jobs = if jobs == 0 { num_cpus::get() } else { jobs };
        Self {
            mode: Mode::Parallel(jobs),
            interactive: true,
        }
    }

    /// 顺序执行器
    pub fn sequential() -> Self {
        Self {
            mode: Mode::Sequential,
            interactive: true,
        }
    }

    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// 执行全部任务
    pub fn run<T, F>(&self, items: &[T], processor: F) -> BatchResult
    where
        T: Sync,
        F: Fn(&T) -> ConversionResult + Sync + Send,
    {
        let pb = progress::create_progress_bar(items.len() as u64, "Converting NEF files", self.interactive);

        let step = |item: &T| {
            let result = processor(item);
            if self.interactive && !result.is_success() {
                report_failure(&pb, &result);
            }
            pb.inc(1);
            result
        };

        let results: Vec<ConversionResult> = match self.mode {
            Mode::Parallel(jobs) => match rayon::ThreadPoolBuilder::new().num_threads(jobs).build() {
                Ok(pool) => pool.install(|| items.par_iter().map(step).collect()),
                Err(e) => {
                    warn!("Failed to build worker pool ({}), falling back to sequential", e);
                    items.iter().map(step).collect()
                }
            },
            Mode::Sequential => items.iter().map(step).collect(),
        };

        pb.finish_and_clear();

        // 汇总结果
        let mut batch_result = BatchResult::default();
        for result in results {
            batch_result.merge(result);
        }
        batch_result.failures.sort_by(|a, b| a.0.cmp(&b.0));

        batch_result
    }
}

/// 失败时在进度条上方打印一行
fn report_failure(pb: &ProgressBar, result: &ConversionResult) {
    if let TaskOutcome::Failure(reason) = &result.outcome {
        pb.suspend(|| output::print_failure(&result.input, reason));
    }
}
