//! # 终端输出
//!
//! 面向用户的彩色输出：状态行、单文件转换结果、标题栏。
//! 诊断日志走 `tracing`，不经过这里。
//!
//! ## 依赖关系
//! - 被 `commands/`, `batch/runner.rs`, `watch/monitor.rs` 使用
//! - 使用 `colored` crate

use crate::models::FailureReason;

use colored::{ColoredString, Colorize};
use std::path::Path;

/// 标题栏宽度
const RULE_WIDTH: usize = 64;

/// 状态标签
#[derive(Debug, Clone, Copy)]
enum Tag {
    Ok,
    Err,
    Warn,
    Info,
    Done,
}

impl Tag {
    fn label(self) -> ColoredString {
        match self {
            Tag::Ok => "[OK]".green().bold(),
            Tag::Err => "[ERR]".red().bold(),
            Tag::Warn => "[WARN]".yellow().bold(),
            Tag::Info => "[*]".blue().bold(),
            Tag::Done => "[DONE]".green().bold(),
        }
    }
}

fn line(tag: Tag, msg: &str) -> String {
    format!("{} {}", tag.label(), msg)
}

pub fn print_success(msg: &str) {
    println!("{}", line(Tag::Ok, msg));
}

/// 错误写到 stderr
pub fn print_error(msg: &str) {
    eprintln!("{}", line(Tag::Err, msg));
}

pub fn print_warning(msg: &str) {
    println!("{}", line(Tag::Warn, msg));
}

pub fn print_info(msg: &str) {
    println!("{}", line(Tag::Info, msg));
}

pub fn print_done(msg: &str) {
    println!("{}", line(Tag::Done, msg));
}

/// 跟在错误之后的提示
pub fn print_hint(msg: &str) {
    eprintln!("      {} {}", "Tip:".cyan(), msg.dimmed());
}

/// 路径的文件名部分，没有时退回完整路径
pub fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// `[OK] DSC_0001.nef -> DSC_0001.jpg`
pub fn print_converted(input: &Path, output: &Path) {
    println!(
        "{} {} {} {}",
        Tag::Ok.label(),
        file_label(input).dimmed(),
        "->".cyan(),
        file_label(output)
    );
}

/// 单个文件失败：原因 + 可选提示
pub fn print_failure(input: &Path, reason: &FailureReason) {
    print_error(&format!("{}: {}", file_label(input), reason));
    if let Some(hint) = reason.hint() {
        print_hint(hint);
    }
}

pub fn print_header(title: &str) {
    let rule = "─".repeat(RULE_WIDTH);
    println!("\n{}", rule.dimmed());
    println!("  {}", title.bold());
    println!("{}\n", rule.dimmed());
}

pub fn print_separator() {
    println!("{}", "─".repeat(RULE_WIDTH).dimmed());
}
