use lip_core::RebuildOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// 控制台日志级别，可被 `RUST_LOG` 覆盖。
    pub console_log_level: String,
    /// 设置后同时写入该文件。
    pub log_file: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            console_log_level: "info".to_string(),
            log_file: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub root: PathBuf,
    pub translate_dir: PathBuf,
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
    pub rebuild: RebuildOptions,
    pub char_table: Option<PathBuf>,
    pub jobs: usize,
    pub log_settings: LogSettings,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            translate_dir: PathBuf::from("translate"),
            source_dir: PathBuf::from("source"),
            output_dir: PathBuf::from("output"),
            rebuild: RebuildOptions::default(),
            char_table: None,
            jobs: 1,
            log_settings: LogSettings::default(),
        }
    }
}

impl AppSettings {
    /// 读取配置文件；未指定时使用默认配置。
    ///
    /// 此时日志尚未初始化，错误直接返回给调用方。
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = fs::read_to_string(path).map_err(|e| {
            AppError::Settings(format!("读取配置文件 {} 失败: {e}", path.display()))
        })?;
        let settings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// 用命令行参数覆盖配置文件中的值。
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(root) = &cli.root {
            self.root.clone_from(root);
        }
        if let Some(dir) = &cli.translate {
            self.translate_dir.clone_from(dir);
        }
        if let Some(dir) = &cli.source {
            self.source_dir.clone_from(dir);
        }
        if let Some(dir) = &cli.output {
            self.output_dir.clone_from(dir);
        }
        if let Some(delay) = cli.delay {
            self.rebuild.delay = delay;
        }
        if let Some(filler) = cli.filler {
            self.rebuild.filler = filler;
        }
        if let Some(table) = &cli.char_table {
            self.char_table = Some(table.clone());
        }
        if let Some(jobs) = cli.jobs {
            self.jobs = jobs;
        }
        if let Some(file) = &cli.log_file {
            self.log_settings.log_file = Some(file.clone());
        }
    }

    /// 相对路径以 `root` 为基准。
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    pub fn translate_path(&self) -> PathBuf {
        self.resolve(&self.translate_dir)
    }

    pub fn source_path(&self) -> PathBuf {
        self.resolve(&self.source_dir)
    }

    pub fn output_path(&self) -> PathBuf {
        self.resolve(&self.output_dir)
    }
}
