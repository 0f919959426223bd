//! # 转换任务与结果
//!
//! 单个文件的工作单元，以及按类别标记的处理结果。
//!
//! ## 依赖关系
//! - 被 `batch/`, `codec/`, `watch/` 使用
//! - 使用 `models/settings.rs`

use crate::models::ConversionSettings;

use std::io;
use std::path::{Path, PathBuf};

/// 识别的 RAW 扩展名（不含点）
pub const RAW_EXTENSION: &str = "nef";

/// 输出扩展名
pub const OUTPUT_EXTENSION: &str = "jpg";

/// 单个转换任务
#[derive(Debug, Clone)]
pub struct ConversionTask {
    /// 输入 NEF 文件
    pub input: PathBuf,
    /// 输出 JPEG 文件
    pub output: PathBuf,
    /// 设置快照（按值复制）
    pub settings: ConversionSettings,
}

impl ConversionTask {
    /// 在输出目录中派生同名 `.jpg` 输出路径
    pub fn new(input: PathBuf, output_dir: &Path, settings: ConversionSettings) -> Self {
        let output = output_path_for(&input, output_dir);
        Self {
            input,
            output,
            settings,
        }
    }
}

/// 输出路径：相同文件名主干，`.jpg` 扩展名
pub fn output_path_for(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image");
    output_dir.join(format!("{}.{}", stem, OUTPUT_EXTENSION))
}

// ─────────────────────────────────────────────────────────────
// 结果
// ─────────────────────────────────────────────────────────────

/// 单个文件处理结果
#[derive(Debug, Clone)]
pub struct ConversionResult {
    /// 来源输入路径
    pub input: PathBuf,
    /// 结果标签
    pub outcome: TaskOutcome,
    /// 非致命警告（如 EXIF 丢失）
    pub warnings: Vec<TaskWarning>,
}

impl ConversionResult {
    pub fn success(input: PathBuf, output: PathBuf, warnings: Vec<TaskWarning>) -> Self {
        Self {
            input,
            outcome: TaskOutcome::Success(output),
            warnings,
        }
    }

    pub fn failure(input: PathBuf, reason: FailureReason, warnings: Vec<TaskWarning>) -> Self {
        Self {
            input,
            outcome: TaskOutcome::Failure(reason),
            warnings,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, TaskOutcome::Success(_))
    }
}

/// 结果标签
#[derive(Debug, Clone)]
pub enum TaskOutcome {
    /// 转换成功（输出路径）
    Success(PathBuf),
    /// 转换失败（分类原因）
    Failure(FailureReason),
}

/// 任务级警告
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskWarning {
    /// 无法读取 EXIF，继续无 EXIF 转换
    ExifUnavailable(String),
    /// 带 EXIF 编码失败，已改为不带 EXIF 保存
    ExifDropped(String),
}

impl std::fmt::Display for TaskWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskWarning::ExifUnavailable(e) => write!(f, "Could not extract EXIF data: {}", e),
            TaskWarning::ExifDropped(e) => {
                write!(f, "Could not save with EXIF ({}), saved without EXIF", e)
            }
        }
    }
}

/// 失败原因分类
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// RAW 解码失败（不重试）
    Decode(DecodeFailure),
    /// JPEG 编码失败
    Encode(String),
    /// 写出文件失败
    Write(String),
}

impl FailureReason {
    /// 面向用户的提示
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            FailureReason::Decode(d) => d.kind.hint(),
            FailureReason::Encode(_) => None,
            FailureReason::Write(_) => Some("Check free disk space and output directory permissions"),
        }
    }
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::Decode(d) => write!(f, "{}: {}", d.kind, d.message),
            FailureReason::Encode(e) => write!(f, "JPEG encoding failed: {}", e),
            FailureReason::Write(e) => write!(f, "Failed to write output: {}", e),
        }
    }
}

/// 解码失败详情
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeFailure {
    pub kind: DecodeFailureKind,
    pub message: String,
}

impl DecodeFailure {
    pub fn new(kind: DecodeFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// 由 I/O 错误分类
    pub fn from_io(err: &io::Error) -> Self {
        let kind = match err.kind() {
            io::ErrorKind::NotFound => DecodeFailureKind::NotFound,
            io::ErrorKind::PermissionDenied => DecodeFailureKind::PermissionDenied,
            io::ErrorKind::OutOfMemory => DecodeFailureKind::OutOfMemory,
            io::ErrorKind::InvalidData | io::ErrorKind::UnexpectedEof => {
                DecodeFailureKind::Corrupted
            }
            _ => DecodeFailureKind::Other,
        };
        Self::new(kind, err.to_string())
    }

    /// 由解码器消息分类
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_lowercase();

        let kind = if lower.contains("memory") || lower.contains("allocat") {
            DecodeFailureKind::OutOfMemory
        } else if lower.contains("permission") {
            DecodeFailureKind::PermissionDenied
        } else if [
            "corrupt",
            "invalid",
            "unknown",
            "unsupported",
            "couldn't",
            "truncated",
            "panic",
        ]
        .iter()
        .any(|k| lower.contains(k))
        {
            DecodeFailureKind::Corrupted
        } else {
            DecodeFailureKind::Other
        };

        Self::new(kind, message)
    }
}

/// 解码失败类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecodeFailureKind {
    NotFound,
    PermissionDenied,
    Corrupted,
    OutOfMemory,
    Other,
}

impl DecodeFailureKind {
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            DecodeFailureKind::NotFound => None,
            DecodeFailureKind::PermissionDenied => {
                Some("Check file permissions or close any program using the file")
            }
            DecodeFailureKind::Corrupted => Some("File may be corrupted; try opening it in Nikon software to verify"),
            DecodeFailureKind::OutOfMemory => {
                Some("Close other applications or use the --no-parallel flag")
            }
            DecodeFailureKind::Other => None,
        }
    }
}

impl std::fmt::Display for DecodeFailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeFailureKind::NotFound => write!(f, "File not found"),
            DecodeFailureKind::PermissionDenied => write!(f, "Permission denied"),
            DecodeFailureKind::Corrupted => write!(f, "File may be corrupted"),
            DecodeFailureKind::OutOfMemory => write!(f, "Out of memory"),
            DecodeFailureKind::Other => write!(f, "Failed to decode"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_for() {
        let out = output_path_for(Path::new("/photos/DSC_0001.NEF"), Path::new("/photos/export_ab"));
        assert_eq!(out, PathBuf::from("/photos/export_ab/DSC_0001.jpg"));

        let task = ConversionTask::new(
            PathBuf::from("in/a.nef"),
            Path::new("out"),
            ConversionSettings::default(),
        );
        assert_eq!(task.output, PathBuf::from("out/a.jpg"));
    }

    #[test]
    fn test_decode_failure_from_io() {
        let denied = io::Error::new(io::ErrorKind::PermissionDenied, "nope");
        assert_eq!(
            DecodeFailure::from_io(&denied).kind,
            DecodeFailureKind::PermissionDenied
        );

        let missing = io::Error::new(io::ErrorKind::NotFound, "gone");
        assert_eq!(DecodeFailure::from_io(&missing).kind, DecodeFailureKind::NotFound);
    }

    #[test]
    fn test_decode_failure_from_message() {
        assert_eq!(
            DecodeFailure::from_message("Couldn't find camera").kind,
            DecodeFailureKind::Corrupted
        );
        assert_eq!(
            DecodeFailure::from_message("memory allocation failed").kind,
            DecodeFailureKind::OutOfMemory
        );
        assert_eq!(
            DecodeFailure::from_message("something odd").kind,
            DecodeFailureKind::Other
        );
        assert_eq!(
            DecodeFailure::from_message("Caught a panic while decoding").kind,
            DecodeFailureKind::Corrupted
        );
    }

    #[test]
    fn test_failure_hint() {
        let reason = FailureReason::Decode(DecodeFailure::new(DecodeFailureKind::OutOfMemory, "x"));
        assert!(reason.hint().unwrap().contains("--no-parallel"));
        assert!(FailureReason::Encode("bad".into()).hint().is_none());
    }
}
