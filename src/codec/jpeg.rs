//! # JPEG 编码器
//!
//! 使用 `image` 的 JPEG 编码器；EXIF 以 APP1 段插入到 SOI 之后。
//!
//! ## 依赖关系
//! - 被 `codec/converter.rs` 使用
//! - 使用 `image` crate

use crate::codec::{EncodeError, JpegEncoder, PixelBuffer};

use image::codecs::jpeg::JpegEncoder as ImageEncoder;
use image::ExtendedColorType;
use std::io::Cursor;

/// APP1 段标记
const APP1_MARKER: [u8; 2] = [0xFF, 0xE1];

/// EXIF 标识头
const EXIF_HEADER: &[u8; 6] = b"Exif\0\0";

/// 段长度字段上限（包含长度字段自身的 2 字节）
const MAX_SEGMENT_LEN: usize = u16::MAX as usize;

/// 基于 `image` crate 的 JPEG 编码器
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageJpegEncoder;

impl JpegEncoder for ImageJpegEncoder {
    fn encode(
        &self,
        pixels: &PixelBuffer,
        quality: u8,
        exif: Option<&[u8]>,
    ) -> Result<Vec<u8>, EncodeError> {
        if !pixels.is_consistent() {
            return Err(EncodeError::InvalidBuffer(format!(
                "got {} bytes for {}x{} RGB",
                pixels.data.len(),
                pixels.width,
                pixels.height
            )));
        }

        let mut out = Cursor::new(Vec::new());
        let mut encoder = ImageEncoder::new_with_quality(&mut out, quality);
        encoder
            .encode(
                &pixels.data,
                pixels.width,
                pixels.height,
                ExtendedColorType::Rgb8,
            )
            .map_err(|e| EncodeError::Encoder(e.to_string()))?;

        let jpeg = out.into_inner();
        match exif {
            Some(blob) => insert_exif_segment(jpeg, blob),
            None => Ok(jpeg),
        }
    }
}

/// 在 SOI 之后插入 `FFE1 <len> Exif\0\0 <tiff>` 段
fn insert_exif_segment(jpeg: Vec<u8>, exif: &[u8]) -> Result<Vec<u8>, EncodeError> {
    if jpeg.len() < 2 || jpeg[0] != 0xFF || jpeg[1] != 0xD8 {
        return Err(EncodeError::Encoder(
            "encoder output does not start with SOI".to_string(),
        ));
    }

    let segment_len = 2 + EXIF_HEADER.len() + exif.len();
    if segment_len > MAX_SEGMENT_LEN {
        return Err(EncodeError::ExifTooLarge(exif.len()));
    }

    let mut out = Vec::with_capacity(jpeg.len() + segment_len + 2);
    out.extend_from_slice(&jpeg[..2]);
    out.extend_from_slice(&APP1_MARKER);
    out.extend_from_slice(&(segment_len as u16).to_be_bytes());
    out.extend_from_slice(EXIF_HEADER);
    out.extend_from_slice(exif);
    out.extend_from_slice(&jpeg[2..]);
    Ok(out)
}
