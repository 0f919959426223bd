//! # 数据模型模块
//!
//! 定义转换设置、转换任务/结果以及批次统计。
//!
//! ## 依赖关系
//! - 被 `batch/`, `codec/`, `watch/`, `commands/` 使用
//! - 子模块: settings, task, report

pub mod report;
pub mod settings;
pub mod task;

pub use report::{BatchStatistics, RunOutcome, RunReport};
pub use settings::ConversionSettings;
pub use task::{
    ConversionResult, ConversionTask, DecodeFailure, DecodeFailureKind, FailureReason,
    TaskOutcome, TaskWarning,
};
