//! # 单文件转换流程
//!
//! 将一个 `ConversionTask` 转换为一个 `ConversionResult`，失败以标签值返回，
//! 绝不越过任务边界向上抛出。
//!
//! ## 功能
//! - 读取 EXIF（失败只记录警告）
//! - RAW 解码（失败即终止该任务，不重试）
//! - JPEG 编码，可选在带 EXIF 编码失败后去掉 EXIF 重试一次
//! - 写出输出文件
//!
//! ## 依赖关系
//! - 被 `batch/orchestrator.rs`, `watch/monitor.rs` 调用
//! - 使用 `codec/` 中的协作者 trait

use crate::codec::{
    ExifReader, ImageJpegEncoder, JpegEncoder, KamadakExifReader, RawDecoder, RawloaderDecoder,
};
use crate::models::{ConversionResult, ConversionTask, FailureReason, TaskWarning};

use std::fs;
use tracing::{debug, warn};

/// 带 EXIF 编码失败时的重试策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExifRetry {
    /// 去掉 EXIF 再编码一次（批量模式）
    Once,
    /// 直接判定失败（监视模式）
    Never,
}

/// 单文件转换器
///
/// 只持有不可变的协作者，可在任意线程中共享调用。
pub struct Converter {
    decoder: Box<dyn RawDecoder>,
    encoder: Box<dyn JpegEncoder>,
    exif: Box<dyn ExifReader>,
}

impl Converter {
    pub fn new(
        decoder: impl RawDecoder + 'static,
        encoder: impl JpegEncoder + 'static,
        exif: impl ExifReader + 'static,
    ) -> Self {
        Self {
            decoder: Box::new(decoder),
            encoder: Box::new(encoder),
            exif: Box::new(exif),
        }
    }

    /// 使用 rawloader / image / kamadak-exif 的默认实现
    pub fn system() -> Self {
        Self::new(RawloaderDecoder::new(), ImageJpegEncoder, KamadakExifReader)
    }

    /// 转换单个文件
    pub fn convert(&self, task: &ConversionTask, retry: ExifRetry) -> ConversionResult {
        let input = &task.input;
        let mut warnings = Vec::new();

        let exif = if task.settings.preserve_exif() {
            match self.exif.read_exif(input) {
                Ok(blob) => blob,
                Err(e) => {
                    warn!("Could not extract EXIF data from {}: {}", input.display(), e);
                    warnings.push(TaskWarning::ExifUnavailable(e.to_string()));
                    None
                }
            }
        } else {
            None
        };

        let pixels = match self.decoder.decode(input) {
            Ok(pixels) => pixels,
            Err(failure) => {
                debug!("Decode failed for {}: {:?}", input.display(), failure);
                return ConversionResult::failure(
                    input.clone(),
                    FailureReason::Decode(failure),
                    warnings,
                );
            }
        };

        let quality = task.settings.quality();
        let encoded = match exif.as_deref() {
            Some(blob) => match self.encoder.encode(&pixels, quality, Some(blob)) {
                Ok(bytes) => Ok(bytes),
                Err(e) if retry == ExifRetry::Once => {
                    warn!(
                        "Could not save with EXIF for {}: {}, saving without EXIF",
                        input.display(),
                        e
                    );
                    warnings.push(TaskWarning::ExifDropped(e.to_string()));
                    self.encoder.encode(&pixels, quality, None)
                }
                Err(e) => Err(e),
            },
            None => self.encoder.encode(&pixels, quality, None),
        };

        let bytes = match encoded {
            Ok(bytes) => bytes,
            Err(e) => {
                return ConversionResult::failure(
                    input.clone(),
                    FailureReason::Encode(e.to_string()),
                    warnings,
                )
            }
        };

        if let Err(e) = fs::write(&task.output, &bytes) {
            return ConversionResult::failure(
                input.clone(),
                FailureReason::Write(format!("{}: {}", task.output.display(), e)),
                warnings,
            );
        }

        debug!(
            "Saved {} ({} bytes, exif={})",
            task.output.display(),
            bytes.len(),
            exif.is_some()
        );

        ConversionResult::success(input.clone(), task.output.clone(), warnings)
    }
}
