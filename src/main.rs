//! # nefconv - Nikon NEF 转 JPEG 工具
//!
//! 将目录中的 NEF 原始文件批量转换为 JPEG，或持续监视目录并转换新文件。
//!
//! ## 运行模式
//! - 批量: 扫描目录 -> 新建 `export_<id>` -> 并行转换 -> 汇总
//! - 监视 (`--watch`): 新出现的 `.nef` 文件逐个转换，Ctrl+C 停止
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── batch/     (扫描、输出目录、执行器、编排)
//!   │     ├── watch/     (目录监视)
//!   │     ├── codec/     (RAW 解码、JPEG 编码、EXIF)
//!   │     └── models/    (数据模型)
//!   ├── utils/      (输出、日志、进度条、系统集成)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod codec;
mod commands;
mod error;
mod models;
mod utils;
mod watch;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help / --version 正常退出，其余参数错误退出码为 1
            let code = if e.use_stderr() { 1 } else { 0 };
            e.print().ok();
            std::process::exit(code);
        }
    };

    utils::logger::init(cli.verbose);

    match commands::run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            utils::output::print_error(&format!("{}", e));
            if let Some(source) = std::error::Error::source(&e) {
                utils::output::print_hint(&source.to_string());
            }
            std::process::exit(1);
        }
    }
}
