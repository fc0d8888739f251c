mod app_settings;
mod batch;
mod cli;
mod error;
mod logger;

use std::fs;
use std::process::ExitCode;

use clap::Parser;
use lip_core::{CharTable, FullWidthTable, MappedTable, discover_pairs};

use app_settings::AppSettings;
use batch::BatchSummary;
use cli::Cli;
use error::AppResult;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // 日志配置来自设置文件，所以加载设置时的错误只能直接打印。
    let settings = match AppSettings::load(cli.config.as_deref()) {
        Ok(mut settings) => {
            settings.apply_cli(&cli);
            settings
        }
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let _logger_guard = match logger::init_global_logger(&settings.log_settings, cli.verbose) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    match run(&settings) {
        Ok(summary) => {
            tracing::info!(
                "[Main] 完成: 写入 {} 个（共 {} 字节），跳过 {} 个，失败 {} 个。",
                summary.written,
                summary.bytes_written,
                summary.skipped,
                summary.failed
            );
            if summary.has_failures() {
                tracing::warn!("[Main] 未完成的文件: {}", summary.unfinished.join(", "));
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            tracing::error!("[Main] {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(settings: &AppSettings) -> AppResult<BatchSummary> {
    settings.rebuild.validate()?;

    let table: Box<dyn CharTable> = match &settings.char_table {
        Some(path) => Box::new(MappedTable::load(&settings.resolve(path))?),
        None => Box::new(FullWidthTable),
    };

    let translate_dir = settings.translate_path();
    let source_dir = settings.source_path();
    let output_dir = settings.output_path();
    fs::create_dir_all(&output_dir)?;

    let pairs = discover_pairs(&translate_dir, &source_dir)?;
    if pairs.is_empty() {
        tracing::warn!(
            "[Main] {} 中没有与 {} 匹配的替换表。",
            translate_dir.display(),
            source_dir.display()
        );
    } else {
        tracing::info!(
            "[Main] 找到 {} 组文件，delay = {}，输出到 {}。",
            pairs.len(),
            settings.rebuild.delay,
            output_dir.display()
        );
    }

    batch::run_batch(
        &pairs,
        &output_dir,
        &settings.rebuild,
        table.as_ref(),
        settings.jobs,
    )
}
