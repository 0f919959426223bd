//! # 转换设置
//!
//! 每次运行（或监视会话）持有的不可变设置快照。
//!
//! ## 依赖关系
//! - 被 `batch/`, `watch/`, `commands/` 使用
//! - 使用 `num_cpus` 决定默认并行度

use crate::error::{NefconvError, Result};

use std::num::NonZeroUsize;

/// 默认 JPEG 质量
pub const DEFAULT_QUALITY: i64 = 95;

/// 转换设置（构造时即校验，之后不可变）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionSettings {
    /// JPEG 质量 (1-100)
    quality: u8,
    /// 并行作业数（None = 自动）
    workers: Option<NonZeroUsize>,
    /// 是否保留 EXIF
    preserve_exif: bool,
}

impl ConversionSettings {
    /// 创建并校验设置
    ///
    /// 超出 [1, 100] 的质量值直接拒绝，不做截断。
    pub fn new(quality: i64, workers: Option<usize>, preserve_exif: bool) -> Result<Self> {
        if !(1..=100).contains(&quality) {
            return Err(NefconvError::InvalidQuality(quality));
        }

        let workers = match workers {
            Some(n) => Some(NonZeroUsize::new(n).ok_or(NefconvError::InvalidWorkerCount)?),
            None => None,
        };

        Ok(Self {
            quality: quality as u8,
            workers,
            preserve_exif,
        })
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// 实际使用的并行作业数
    pub fn effective_workers(&self) -> usize {
        self.workers.map(NonZeroUsize::get).unwrap_or_else(num_cpus::get)
    }

    pub fn preserve_exif(&self) -> bool {
        self.preserve_exif
    }
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY as u8,
            workers: None,
            preserve_exif: true,
        }
    }
}

impl std::fmt::Display for ConversionSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let workers = match self.workers {
            Some(n) => n.to_string(),
            None => "auto".to_string(),
        };
        write!(
            f,
            "quality={}, workers={}, preserve_exif={}",
            self.quality, workers, self.preserve_exif
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_bounds() {
        assert!(ConversionSettings::new(1, None, true).is_ok());
        assert!(ConversionSettings::new(100, None, true).is_ok());

        for bad in [0, 101, -5, 255] {
            match ConversionSettings::new(bad, None, true) {
                Err(NefconvError::InvalidQuality(q)) => assert_eq!(q, bad),
                other => panic!("expected InvalidQuality for {}, got {:?}", bad, other),
            }
        }
    }

    #[test]
    fn test_worker_count() {
        let settings = ConversionSettings::new(80, Some(3), false).unwrap();
        assert_eq!(settings.effective_workers(), 3);
        assert_eq!(settings.quality(), 80);
        assert!(!settings.preserve_exif());

        let auto = ConversionSettings::new(80, None, false).unwrap();
        assert!(auto.to_string().contains("workers=auto"));
        assert!(auto.effective_workers() >= 1);

        assert!(matches!(
            ConversionSettings::new(80, Some(0), false),
            Err(NefconvError::InvalidWorkerCount)
        ));
    }

    #[test]
    fn test_default_settings() {
        let settings = ConversionSettings::default();
        assert_eq!(settings.quality(), 95);
        assert!(settings.preserve_exif());
        assert_eq!(
            settings.to_string(),
            "quality=95, workers=auto, preserve_exif=true"
        );
    }
}
