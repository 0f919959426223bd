//! # 监视模块
//!
//! 监视目录中新出现的 NEF 文件并逐个转换。
//!
//! ## 依赖关系
//! - 被 `commands/watch.rs` 使用
//! - 使用 `notify` 接收文件系统事件

pub mod monitor;

pub use monitor::WatchMonitor;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// 跨线程停止信号（Ctrl+C 处理器与监视循环共享）
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_signal_shared_between_clones() {
        let stop = StopSignal::new();
        let handler = stop.clone();
        assert!(!stop.is_raised());
        handler.raise();
        assert!(stop.is_raised());
    }
}
