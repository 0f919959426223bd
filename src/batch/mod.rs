//! # 批量处理模块
//!
//! 提供 NEF 目录的批量转换能力。
//!
//! ## 功能
//! - 扫描输入目录（大小写不敏感、去重）
//! - 分配唯一输出目录
//! - 并行 / 顺序执行
//! - 结果汇总与统计
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `rayon` 进行并行处理
//! - 使用 `indicatif` 显示进度

pub mod collector;
pub mod orchestrator;
pub mod output;
pub mod runner;

pub use collector::FileScanner;
pub use orchestrator::BatchOrchestrator;
pub use output::OutputAllocator;
pub use runner::{BatchRunner, Mode};
