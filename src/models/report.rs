//! # 批次统计与运行报告
//!
//! 所有任务完成后才生成，不在批次中途发布。
//!
//! ## 依赖关系
//! - 被 `batch/orchestrator.rs`, `commands/batch.rs` 使用

use crate::models::FailureReason;

use std::path::PathBuf;
use std::time::Duration;

/// 批次统计
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchStatistics {
    /// 总耗时
    pub total_time: Duration,
    /// 平均每文件耗时
    pub time_per_file: Duration,
    /// 吞吐量 (文件/秒)
    pub files_per_second: f64,
}

impl BatchStatistics {
    /// 由批次起止时间差计算
    pub fn from_elapsed(elapsed: Duration, total: usize) -> Self {
        let time_per_file = if total > 0 {
            elapsed / total as u32
        } else {
            Duration::ZERO
        };
        let secs = elapsed.as_secs_f64();
        let files_per_second = if secs > 0.0 { total as f64 / secs } else { 0.0 };

        Self {
            total_time: elapsed,
            time_per_file,
            files_per_second,
        }
    }
}

/// 运行结果类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// 全部成功
    Clean,
    /// 部分失败
    Partial,
    /// 零成功
    Failed,
}

impl RunOutcome {
    pub fn from_counts(successful: usize, total: usize) -> Self {
        if successful == 0 {
            RunOutcome::Failed
        } else if successful < total {
            RunOutcome::Partial
        } else {
            RunOutcome::Clean
        }
    }

    /// 进程退出码
    pub fn exit_code(&self) -> i32 {
        match self {
            RunOutcome::Clean => 0,
            RunOutcome::Partial | RunOutcome::Failed => 1,
        }
    }
}

/// 一次批量运行的报告
#[derive(Debug, Clone)]
pub struct RunReport {
    /// 本次运行的输出目录
    pub output_dir: PathBuf,
    /// 成功数量
    pub successful: usize,
    /// 总数量
    pub total: usize,
    /// 失败详情
    pub failures: Vec<(PathBuf, FailureReason)>,
    /// 警告数量
    pub warnings: usize,
    /// 并行作业数（None = 顺序执行）
    pub workers: Option<usize>,
    /// 统计信息
    pub statistics: BatchStatistics,
}

impl RunReport {
    pub fn outcome(&self) -> RunOutcome {
        RunOutcome::from_counts(self.successful, self.total)
    }
}
