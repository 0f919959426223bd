//! 测试替身：可计数、可按文件名失败的协作者。

use crate::codec::{EncodeError, ExifError, ExifReader, JpegEncoder, PixelBuffer, RawDecoder};
use crate::models::{DecodeFailure, DecodeFailureKind};
use crate::utils::reveal::Reveal;

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// 文件名主干包含任一关键字时解码失败
#[derive(Default)]
pub struct MockDecoder {
    fail_on: Vec<String>,
    attempts: Arc<AtomicUsize>,
}

impl MockDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(keywords: &[&str]) -> Self {
        Self {
            fail_on: keywords.iter().map(|k| k.to_string()).collect(),
            attempts: Arc::default(),
        }
    }

    pub fn attempts(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.attempts)
    }
}

impl RawDecoder for MockDecoder {
    fn decode(&self, path: &Path) -> Result<PixelBuffer, DecodeFailure> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        if self.fail_on.iter().any(|k| stem.contains(k.as_str())) {
            return Err(DecodeFailure::new(
                DecodeFailureKind::Corrupted,
                "invalid NEF data",
            ));
        }

        Ok(PixelBuffer::new(2, 1, vec![255, 0, 0, 0, 255, 0]))
    }
}

/// 记录每次调用的 (quality, 是否带 EXIF)
#[derive(Default)]
pub struct MockEncoder {
    reject_exif: bool,
    calls: Arc<Mutex<Vec<(u8, bool)>>>,
}

impl MockEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 带 EXIF 时总是失败
    pub fn rejecting_exif() -> Self {
        Self {
            reject_exif: true,
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> Arc<Mutex<Vec<(u8, bool)>>> {
        Arc::clone(&self.calls)
    }
}

impl JpegEncoder for MockEncoder {
    fn encode(
        &self,
        _pixels: &PixelBuffer,
        quality: u8,
        exif: Option<&[u8]>,
    ) -> Result<Vec<u8>, EncodeError> {
        self.calls.lock().unwrap().push((quality, exif.is_some()));

        match exif {
            Some(blob) if self.reject_exif => Err(EncodeError::ExifTooLarge(blob.len())),
            _ => Ok(vec![0xFF, 0xD8, 0xFF, 0xD9]),
        }
    }
}

/// 总是返回固定 EXIF
pub struct StaticExif(pub Vec<u8>);

impl ExifReader for StaticExif {
    fn read_exif(&self, _path: &Path) -> Result<Option<Vec<u8>>, ExifError> {
        Ok(Some(self.0.clone()))
    }
}

/// 总是读取失败
pub struct FailingExif;

impl ExifReader for FailingExif {
    fn read_exif(&self, _path: &Path) -> Result<Option<Vec<u8>>, ExifError> {
        Err(ExifError("no EXIF segment".to_string()))
    }
}

/// 记录 reveal 调用，可配置为失败
#[derive(Default)]
pub struct RecordingReveal {
    fail: bool,
    calls: Arc<Mutex<Vec<PathBuf>>>,
}

impl RecordingReveal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> Arc<Mutex<Vec<PathBuf>>> {
        Arc::clone(&self.calls)
    }
}

impl Reveal for RecordingReveal {
    fn reveal(&self, directory: &Path) -> io::Result<()> {
        self.calls.lock().unwrap().push(directory.to_path_buf());
        if self.fail {
            return Err(io::Error::new(io::ErrorKind::NotFound, "no file browser"));
        }
        Ok(())
    }
}
