//! # 工具函数模块
//!
//! 提供美化输出、进度条、日志初始化、目录选择与文件管理器集成。
//!
//! ## 依赖关系
//! - 被 `commands/`, `batch/`, `watch/` 使用
//! - 子模块: logger, output, picker, progress, reveal

pub mod logger;
pub mod output;
pub mod picker;
pub mod progress;
pub mod reveal;
