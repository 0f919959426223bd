//! # 批量转换命令
//!
//! 一次性转换目录中的所有 NEF 文件，打印汇总与统计表格。
//!
//! ## 依赖关系
//! - 被 `commands/mod.rs` 调用
//! - 使用 `batch/orchestrator.rs` 执行转换
//! - 使用 `tabled` 显示统计信息

use crate::batch::BatchOrchestrator;
use crate::cli::Cli;
use crate::codec::Converter;
use crate::commands::EXIT_INTERRUPTED;
use crate::error::Result;
use crate::models::{ConversionSettings, RunOutcome, RunReport};
use crate::utils::output;
use crate::utils::reveal::{NoReveal, Reveal, SystemFileBrowser};

use console::Term;
use std::path::PathBuf;
use tabled::{Table, Tabled};
use tracing::debug;

/// 汇总中最多列出的失败文件数
const MAX_LISTED_FAILURES: usize = 10;

/// 统计表格行
#[derive(Debug, Clone, Tabled)]
struct StatRow {
    #[tabled(rename = "Metric")]
    metric: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

/// 执行批量转换
pub fn execute(cli: &Cli, directory: PathBuf, settings: ConversionSettings) -> Result<i32> {
    output::print_header("NEF -> JPEG Batch Conversion");
    output::print_info(&format!("Input: {}", directory.display()));
    output::print_info(&format!("Settings: {}", settings));

    if let Some(ref out) = cli.output {
        output::print_warning(&format!(
            "--output {} is only used in watch mode; batch output goes to a new export_ folder",
            out.display()
        ));
    }

    // Ctrl+C 立即结束整个批次
    if let Err(e) = ctrlc::set_handler(|| {
        output::print_warning("Interrupted by user");
        std::process::exit(EXIT_INTERRUPTED);
    }) {
        debug!("Could not install Ctrl+C handler: {}", e);
    }

    let reveal: Box<dyn Reveal> = if cli.no_gui {
        Box::new(NoReveal)
    } else {
        Box::new(SystemFileBrowser::detect())
    };

    // 进度条画在 stderr 上，重定向时关闭
    let report = BatchOrchestrator::new(settings, Converter::system(), reveal)
        .parallel(!cli.no_parallel)
        .interactive(Term::stderr().is_term())
        .run(&directory)?;

    print_summary(&report);
    print_statistics(&report);

    Ok(report.outcome().exit_code())
}

/// 打印成功数量与失败列表
fn print_summary(report: &RunReport) {
    output::print_separator();

    let counts = format!("{}/{}", report.successful, report.total);
    match report.outcome() {
        RunOutcome::Clean => output::print_success(&format!(
            "Converted {} file(s) into {}",
            counts,
            report.output_dir.display()
        )),
        RunOutcome::Partial => output::print_warning(&format!(
            "Converted {} file(s) into {}",
            counts,
            report.output_dir.display()
        )),
        RunOutcome::Failed => output::print_error(&format!("No files converted ({})", counts)),
    }

    if report.warnings > 0 {
        output::print_warning(&format!(
            "{} EXIF warning(s); some JPEGs were written without metadata",
            report.warnings
        ));
    }

    if report.failures.is_empty() {
        return;
    }

    output::print_error(&format!("Failed files ({}):", report.failures.len()));
    for (path, reason) in report.failures.iter().take(MAX_LISTED_FAILURES) {
        output::print_failure(path, reason);
    }
    if report.failures.len() > MAX_LISTED_FAILURES {
        output::print_info(&format!(
            "... and {} more",
            report.failures.len() - MAX_LISTED_FAILURES
        ));
    }
}

/// 打印统计表格
fn print_statistics(report: &RunReport) {
    output::print_header("Statistics");
    println!("{}", Table::new(statistics_rows(report)));
}

fn statistics_rows(report: &RunReport) -> Vec<StatRow> {
    let stats = &report.statistics;
    let (mode, workers) = match report.workers {
        Some(n) => ("parallel", n.to_string()),
        None => ("sequential", "1".to_string()),
    };

    vec![
        StatRow {
            metric: "Total time",
            value: format!("{:.2} s", stats.total_time.as_secs_f64()),
        },
        StatRow {
            metric: "Time per file",
            value: format!("{:.3} s", stats.time_per_file.as_secs_f64()),
        },
        StatRow {
            metric: "Files per second",
            value: format!("{:.2}", stats.files_per_second),
        },
        StatRow {
            metric: "Mode",
            value: mode.to_string(),
        },
        StatRow {
            metric: "Workers",
            value: workers,
        },
    ]
}
