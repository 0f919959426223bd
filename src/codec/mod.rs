//! # 编解码协作者模块
//!
//! RAW 解码、JPEG 编码与 EXIF 读取通过 trait 注入，转换流程只依赖这些接口。
//!
//! ## 功能
//! - `RawDecoder`: 路径 -> 像素缓冲
//! - `JpegEncoder`: 像素缓冲 + 质量 (+ EXIF) -> JPEG 字节
//! - `ExifReader`: 路径 -> EXIF 数据块（可为空）
//! - `Converter`: 单文件转换流程
//!
//! ## 依赖关系
//! - 被 `batch/`, `watch/`, `commands/` 使用
//! - 子模块: converter, exif, jpeg, rawloader_decoder

pub mod converter;
pub mod exif;
pub mod jpeg;
pub mod rawloader_decoder;

#[cfg(test)]
pub mod testing;

pub use converter::{Converter, ExifRetry};
pub use self::exif::KamadakExifReader;
pub use jpeg::ImageJpegEncoder;
pub use rawloader_decoder::RawloaderDecoder;

use crate::models::DecodeFailure;

use std::path::Path;
use thiserror::Error;

/// 8 位 RGB 交错像素缓冲
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    /// RGBRGB... 长度为 width * height * 3
    pub data: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data,
        }
    }

    /// 缓冲长度是否与尺寸一致
    pub fn is_consistent(&self) -> bool {
        (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|px| px.checked_mul(3))
            .map(|len| len == self.data.len())
            .unwrap_or(false)
    }
}

/// JPEG 编码错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("Invalid pixel buffer: {0}")]
    InvalidBuffer(String),

    #[error("EXIF block of {0} bytes does not fit in a JPEG APP1 segment")]
    ExifTooLarge(usize),

    #[error("{0}")]
    Encoder(String),
}

/// EXIF 读取错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ExifError(pub String);

/// RAW 解码能力
pub trait RawDecoder: Send + Sync {
    fn decode(&self, path: &Path) -> std::result::Result<PixelBuffer, DecodeFailure>;
}

/// JPEG 编码能力
pub trait JpegEncoder: Send + Sync {
    fn encode(
        &self,
        pixels: &PixelBuffer,
        quality: u8,
        exif: Option<&[u8]>,
    ) -> std::result::Result<Vec<u8>, EncodeError>;
}

/// EXIF 读取能力
pub trait ExifReader: Send + Sync {
    /// `Ok(None)` 表示文件没有 EXIF
    fn read_exif(&self, path: &Path) -> std::result::Result<Option<Vec<u8>>, ExifError>;
}
