//! # RAW 解码器
//!
//! 使用 `rawloader` 解码 NEF 传感器数据，`bayer` 做线性去马赛克，
//! 输出 8 位 sRGB 像素缓冲。
//!
//! ## 功能
//! - 读取文件（I/O 错误按类型分类）
//! - 黑电平 / 白电平归一化与白平衡
//! - Bayer 去马赛克（单通道数据）或直接使用三通道数据
//! - sRGB gamma 映射到 8 位
//!
//! ## 依赖关系
//! - 被 `codec/converter.rs` 使用
//! - 使用 `rawloader`, `bayer` crate

use crate::codec::{PixelBuffer, RawDecoder};
use crate::models::{DecodeFailure, DecodeFailureKind};

use bayer::{BayerDepth, Demosaic, RasterDepth, RasterMut, CFA};
use rawloader::{RawImage, RawImageData};
use std::fs;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// 基于 rawloader + bayer 的解码器
#[derive(Debug, Default, Clone, Copy)]
pub struct RawloaderDecoder;

impl RawloaderDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl RawDecoder for RawloaderDecoder {
    fn decode(&self, path: &Path) -> Result<PixelBuffer, DecodeFailure> {
        let bytes = fs::read(path).map_err(|e| DecodeFailure::from_io(&e))?;
        debug!("Decoding RAW image {}, {} bytes", path.display(), bytes.len());

        let raw = rawloader::decode(&mut Cursor::new(&bytes[..]))
            .map_err(|e| DecodeFailure::from_message(e.to_string()))?;
        drop(bytes);

        debug!(
            "Decoded {} {}: {}x{}, cpp={}, cfa={}",
            raw.clean_make, raw.clean_model, raw.width, raw.height, raw.cpp, raw.cfa.name
        );

        self.develop(&raw)
    }
}

impl RawloaderDecoder {
    /// 传感器数据 -> 8 位 sRGB
    fn develop(&self, raw: &RawImage) -> Result<PixelBuffer, DecodeFailure> {
        let width = u32::try_from(raw.width).map_err(|_| oversized(raw.width, raw.height))?;
        let height = u32::try_from(raw.height).map_err(|_| oversized(raw.width, raw.height))?;

        let linear = match raw.cpp {
            1 => self.demosaic(raw)?,
            3 => normalize(raw, |i| i % 3),
            n => {
                return Err(DecodeFailure::new(
                    DecodeFailureKind::Corrupted,
                    format!("unsupported {} components per pixel", n),
                ))
            }
        };

        let lut = srgb_lut();
        let data = linear.iter().map(|&v| lut[v as usize]).collect();

        Ok(PixelBuffer::new(width, height, data))
    }

    /// 归一化 + 白平衡后去马赛克，返回 16 位线性 RGB
    fn demosaic(&self, raw: &RawImage) -> Result<Vec<u16>, DecodeFailure> {
        let cfa = bayer_cfa(&raw.cfa.name).ok_or_else(|| {
            DecodeFailure::new(
                DecodeFailureKind::Other,
                format!("unsupported CFA pattern '{}'", raw.cfa.name),
            )
        })?;

        let width = raw.width;
        let mosaic = normalize(raw, |i| raw.cfa.color_at(i / width, i % width));
        let input: Vec<u8> = mosaic.iter().flat_map(|v| v.to_le_bytes()).collect();

        let mut output = vec![0u8; raw.width * raw.height * 3 * 2];
        let mut raster = RasterMut::new(raw.width, raw.height, RasterDepth::Depth16, &mut output);

        bayer::run_demosaic(
            &mut Cursor::new(&input[..]),
            BayerDepth::Depth16LE,
            cfa,
            Demosaic::Linear,
            &mut raster,
        )
        .map_err(|e| DecodeFailure::from_message(format!("demosaic failed: {:?}", e)))?;

        // bayer 以本机字节序写出 16 位样本
        Ok(output
            .chunks_exact(2)
            .map(|b| u16::from_ne_bytes([b[0], b[1]]))
            .collect())
    }
}

fn oversized(width: usize, height: usize) -> DecodeFailure {
    DecodeFailure::new(
        DecodeFailureKind::Corrupted,
        format!("invalid image dimensions {}x{}", width, height),
    )
}

/// rawloader CFA 名称 -> bayer CFA
fn bayer_cfa(name: &str) -> Option<CFA> {
    match name {
        "RGGB" => Some(CFA::RGGB),
        "BGGR" => Some(CFA::BGGR),
        "GRBG" => Some(CFA::GRBG),
        "GBRG" => Some(CFA::GBRG),
        _ => None,
    }
}

/// 按颜色通道做黑白电平归一化与白平衡，结果为 16 位线性值
///
/// `color_of(i)` 返回第 i 个样本的颜色索引 (0=R, 1=G, 2=B, 3=E)。
fn normalize(raw: &RawImage, color_of: impl Fn(usize) -> usize) -> Vec<u16> {
    let wb = white_balance(&raw.wb_coeffs);

    let sample = |i: usize, v: f32| -> u16 {
        let c = color_of(i).min(3);
        let (black, white) = match raw.data {
            RawImageData::Integer(_) => (raw.blacklevels[c] as f32, raw.whitelevels[c] as f32),
            RawImageData::Float(_) => (0.0, 1.0),
        };
        let range = (white - black).max(1e-6);
        let scaled = ((v - black) / range).clamp(0.0, 1.0) * wb[c];
        (scaled.clamp(0.0, 1.0) * u16::MAX as f32) as u16
    };

    match &raw.data {
        RawImageData::Integer(values) => values
            .iter()
            .enumerate()
            .map(|(i, &v)| sample(i, v as f32))
            .collect(),
        RawImageData::Float(values) => values
            .iter()
            .enumerate()
            .map(|(i, &v)| sample(i, v))
            .collect(),
    }
}

/// 以绿色通道为 1 归一化白平衡系数；E 通道视为绿色
fn white_balance(coeffs: &[f32; 4]) -> [f32; 4] {
    let valid = |v: f32| v.is_finite() && v > 0.0;
    let green = coeffs[1];
    if !valid(green) {
        return [1.0; 4];
    }

    let mut wb = [1.0f32; 4];
    for (c, out) in wb.iter_mut().enumerate().take(3) {
        if valid(coeffs[c]) {
            *out = coeffs[c] / green;
        }
    }
    wb[3] = 1.0;
    wb
}

/// 16 位线性 -> 8 位 sRGB 查找表
fn srgb_lut() -> Vec<u8> {
    (0..=u16::MAX as u32)
        .map(|v| {
            let linear = v as f32 / u16::MAX as f32;
            let encoded = if linear <= 0.003_130_8 {
                linear * 12.92
            } else {
                1.055 * linear.powf(1.0 / 2.4) - 0.055
            };
            (encoded * 255.0).round().clamp(0.0, 255.0) as u8
        })
        .collect()
}
