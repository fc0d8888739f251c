use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::app_settings::LogSettings;
use crate::error::{AppError, AppResult};

/// 持有文件日志的后台写入线程，程序退出前不能被丢弃。
#[must_use]
pub struct LoggerGuard {
    _file_guard: Option<WorkerGuard>,
}

fn console_level(settings: &LogSettings, verbose: u8) -> &str {
    match verbose {
        0 => settings.console_log_level.as_str(),
        1 => "debug",
        _ => "trace",
    }
}

/// 初始化全局日志：控制台输出到 stderr，可选同时写入文件。
///
/// `RUST_LOG` 环境变量优先于配置文件和 `-v` 参数。
pub fn init_global_logger(settings: &LogSettings, verbose: u8) -> AppResult<LoggerGuard> {
    let level = console_level(settings, verbose);
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| AppError::Logger(format!("无效的日志级别 {level:?}: {e}")))?;

    let console_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let (file_layer, file_guard) = match &settings.log_file {
        Some(path) => {
            let (writer, guard) = tracing_appender::non_blocking(open_log_file(path)?);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| AppError::Logger(e.to_string()))?;

    Ok(LoggerGuard {
        _file_guard: file_guard,
    })
}

fn open_log_file(path: &Path) -> AppResult<tracing_appender::rolling::RollingFileAppender> {
    let file_name = path
        .file_name()
        .ok_or_else(|| AppError::Logger(format!("日志路径 {} 不是文件", path.display())))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;
    Ok(tracing_appender::rolling::never(dir, file_name))
}
