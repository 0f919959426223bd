//! # 统一错误处理模块
//!
//! 定义 nefconv 的所有运行级错误类型，使用 `thiserror` 派生。
//!
//! 单个文件的转换失败不属于这里：它们以 `models::FailureReason`
//! 标签值的形式在任务边界内返回，不会中断整个批次。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// nefconv 统一错误类型
#[derive(Error, Debug)]
pub enum NefconvError {
    // ─────────────────────────────────────────────────────────────
    // 目录 / 扫描错误
    // ─────────────────────────────────────────────────────────────
    #[error("Directory does not exist: {path}\nTip: Check the path and try again")]
    DirectoryNotFound { path: String },

    #[error("Path is not a directory: {path}\nTip: Provide a folder path, not a file path")]
    NotADirectory { path: String },

    #[error("Cannot read directory: {path}\nTip: Check the folder permissions")]
    DirectoryUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("No NEF files found in: {path}\nTip: Ensure the directory contains .nef or .NEF files")]
    NoMatchingFiles { path: String },

    #[error("Failed to create output directory: {path}")]
    OutputDirectoryCreationFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Quality must be between 1 and 100 (got {0})")]
    InvalidQuality(i64),

    #[error("Worker count must be a positive integer")]
    InvalidWorkerCount,

    #[error("No directory specified and GUI disabled")]
    NoDirectorySelected,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ─────────────────────────────────────────────────────────────
    // 监视模式错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid watch directory: {path}")]
    WatchTargetInvalid { path: String },

    #[error("Failed to watch {path}: {reason}")]
    WatchFailed { path: String, reason: String },

    #[error("Watch monitor cannot start from state '{0}'")]
    InvalidWatchState(String),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, NefconvError>;
