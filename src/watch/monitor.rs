//! # 监视器
//!
//! 非递归监视一个目录，新建的 `.nef` 文件各转换一次。
//!
//! ## 功能
//! - 状态机: Idle -> Watching -> Stopped
//! - 只处理文件创建事件，忽略目录创建
//! - 只匹配小写 `.nef`（比批量扫描更窄）
//! - 按路径字符串去重，同一路径只尝试一次
//! - 固定等待后再读取文件，避免读到写了一半的文件
//! - 停止信号触发后注销监视器再返回
//!
//! ## 依赖关系
//! - 被 `commands/watch.rs` 调用
//! - 使用 `notify` 接收文件系统事件
//! - 使用 `codec/converter.rs` 执行单文件转换

use crate::codec::{Converter, ExifRetry};
use crate::error::{NefconvError, Result};
use crate::models::task::RAW_EXTENSION;
use crate::models::{ConversionResult, ConversionSettings, ConversionTask, TaskOutcome};
use crate::utils::output;
use crate::watch::StopSignal;

use notify::event::CreateKind;
use notify::{Event, EventKind, RecursiveMode, Watcher};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

/// 默认等待写入完成的时间（毫秒）
pub const DEFAULT_SETTLE_MS: u64 = 1000;

/// 轮询停止信号的间隔
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// 监视器状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    Idle,
    Watching,
    Stopped,
}

impl std::fmt::Display for WatchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WatchState::Idle => write!(f, "idle"),
            WatchState::Watching => write!(f, "watching"),
            WatchState::Stopped => write!(f, "stopped"),
        }
    }
}

/// 监视会话：设置快照、输出目录、已处理路径集合（只增不删）
#[derive(Debug)]
pub struct WatchSession {
    pub settings: ConversionSettings,
    pub output_dir: PathBuf,
    processed: HashSet<String>,
}

impl WatchSession {
    pub fn new(settings: ConversionSettings, output_dir: PathBuf) -> Self {
        Self {
            settings,
            output_dir,
            processed: HashSet::new(),
        }
    }

    fn mark_processed(&mut self, path: &Path) {
        self.processed.insert(path.to_string_lossy().to_string());
    }

    pub fn is_processed(&self, path: &Path) -> bool {
        self.processed.contains(path.to_string_lossy().as_ref())
    }

    pub fn processed_count(&self) -> usize {
        self.processed.len()
    }
}

/// 会话统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WatchSummary {
    pub converted: usize,
    pub failed: usize,
    /// 因重复事件跳过
    pub duplicates: usize,
}

/// 目录监视器
pub struct WatchMonitor {
    directory: PathBuf,
    session: WatchSession,
    converter: Converter,
    settle_delay: Duration,
    state: WatchState,
    summary: WatchSummary,
}

impl WatchMonitor {
    pub fn new(
        directory: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        settings: ConversionSettings,
        converter: Converter,
    ) -> Self {
        Self {
            directory: directory.into(),
            session: WatchSession::new(settings, output_dir.into()),
            converter,
            settle_delay: Duration::from_millis(DEFAULT_SETTLE_MS),
            state: WatchState::Idle,
            summary: WatchSummary::default(),
        }
    }

    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn state(&self) -> WatchState {
        self.state
    }

    pub fn session(&self) -> &WatchSession {
        &self.session
    }

    #[cfg(test)]
    pub fn summary(&self) -> WatchSummary {
        self.summary
    }

    /// 开始监视，直到停止信号触发
    pub fn run(&mut self, stop: &StopSignal) -> Result<WatchSummary> {
        if self.state != WatchState::Idle {
            return Err(NefconvError::InvalidWatchState(self.state.to_string()));
        }

        if !self.directory.is_dir() {
            return Err(NefconvError::WatchTargetInvalid {
                path: self.directory.display().to_string(),
            });
        }

        let watch_failed = |e: notify::Error| NefconvError::WatchFailed {
            path: self.directory.display().to_string(),
            reason: e.to_string(),
        };

        let (tx, rx) = mpsc::channel::<notify::Result<Event>>();
        let mut watcher = notify::recommended_watcher(tx).map_err(watch_failed)?;
        watcher
            .watch(&self.directory, RecursiveMode::NonRecursive)
            .map_err(watch_failed)?;

        self.state = WatchState::Watching;
        info!("Watching {} (non-recursive)", self.directory.display());

        while !stop.is_raised() {
            match rx.recv_timeout(POLL_INTERVAL) {
                Ok(Ok(event)) => self.handle_event(&event),
                Ok(Err(e)) => warn!("Watch error: {}", e),
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => {
                    warn!("Watch event channel disconnected");
                    break;
                }
            }
        }

        if let Err(e) = watcher.unwatch(&self.directory) {
            debug!("Unwatch failed: {}", e);
        }
        drop(watcher);

        self.state = WatchState::Stopped;
        info!(
            "Watch stopped: {} converted, {} failed, {} paths seen",
            self.summary.converted,
            self.summary.failed,
            self.session.processed_count()
        );
        Ok(self.summary)
    }

    /// 处理一个文件系统事件
    pub fn handle_event(&mut self, event: &Event) {
        match event.kind {
            EventKind::Create(CreateKind::Folder) => {}
            EventKind::Create(_) => {
                for path in &event.paths {
                    self.handle_created(path);
                }
            }
            _ => {}
        }
    }

    /// 处理一个新建路径；未尝试转换时返回 None
    pub fn handle_created(&mut self, path: &Path) -> Option<ConversionResult> {
        if path.is_dir() {
            return None;
        }

        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext == RAW_EXTENSION => {}
            Some(ext) if ext.eq_ignore_ascii_case(RAW_EXTENSION) => {
                debug!(
                    "Ignoring {}: watch mode only matches lowercase .{}",
                    path.display(),
                    RAW_EXTENSION
                );
                return None;
            }
            _ => return None,
        }

        if self.session.is_processed(path) {
            debug!("Already processed, skipping: {}", path.display());
            self.summary.duplicates += 1;
            return None;
        }
        // 在转换之前记录：失败的文件也不会被再次尝试
        self.session.mark_processed(path);

        info!("New NEF file detected: {}", path.display());

        thread::sleep(self.settle_delay);

        let task = ConversionTask::new(
            path.to_path_buf(),
            &self.session.output_dir,
            self.session.settings,
        );
        let result = self.converter.convert(&task, ExifRetry::Never);

        match &result.outcome {
            TaskOutcome::Success(out) => {
                self.summary.converted += 1;
                output::print_converted(path, out);
            }
            TaskOutcome::Failure(reason) => {
                self.summary.failed += 1;
                output::print_failure(path, reason);
            }
        }

        Some(result)
    }
}
