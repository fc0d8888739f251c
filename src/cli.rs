use std::path::PathBuf;

use clap::{ArgAction, Parser};

/// 将 translate 目录中的替换表写回 source 目录中同名的 LIP 文件，结果输出到 output 目录。
#[derive(Debug, Parser)]
#[command(name = "lip_inserter", version, about)]
pub struct Cli {
    /// TOML 配置文件
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// 工作目录，相对路径都以此为基准
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// 替换表（*.csv）所在目录
    #[arg(long, value_name = "DIR")]
    pub translate: Option<PathBuf>,

    /// 参考 LIP 文件所在目录
    #[arg(long, value_name = "DIR")]
    pub source: Option<PathBuf>,

    /// 输出目录
    #[arg(long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// 每个文本字符之间的口型指令数量
    #[arg(short, long)]
    pub delay: Option<usize>,

    /// 对齐用的填充字节，例如 0x40
    #[arg(long, value_parser = parse_byte)]
    pub filler: Option<u8>,

    /// 自定义码表（TOML）
    #[arg(long, value_name = "FILE")]
    pub char_table: Option<PathBuf>,

    /// 并行处理的文件数
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// 同时把日志写入此文件
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// 输出更详细的日志（-v 为 debug，-vv 为 trace）
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

fn parse_byte(value: &str) -> Result<u8, String> {
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => value.parse::<u8>(),
    };
    parsed.map_err(|e| format!("无效的字节值 {value:?}: {e}"))
}
