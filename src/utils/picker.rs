//! # 交互式目录选择
//!
//! 未提供 `--directory` 且允许交互时，在终端中询问输入目录。
//!
//! ## 依赖关系
//! - 被 `commands/mod.rs` 使用
//! - 使用 `console` crate

use console::{style, Term};
use std::path::PathBuf;

/// 询问目录；空输入或终端不可交互时返回 None
pub fn select_directory(prompt: &str) -> Option<PathBuf> {
    let term = Term::stderr();
    if !term.is_term() {
        return None;
    }

    term.write_str(&format!("{} {}: ", style("?").cyan().bold(), prompt))
        .ok()?;
    let answer = term.read_line().ok()?;
    parse_answer(&answer)
}

/// 去掉首尾空白和拖放路径常见的引号
fn parse_answer(answer: &str) -> Option<PathBuf> {
    let trimmed = answer.trim().trim_matches(|c| c == '"' || c == '\'');
    if trimmed.is_empty() {
        None
    } else {
        Some(PathBuf::from(trimmed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_answer() {
        assert_eq!(parse_answer("  /photos/day1 \n"), Some(PathBuf::from("/photos/day1")));
        assert_eq!(parse_answer("'/photos/with space'"), Some(PathBuf::from("/photos/with space")));
        assert_eq!(parse_answer("   "), None);
    }
}
