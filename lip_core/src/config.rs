use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::error::{LipError, Result};

/// 每个文本字符之间默认插入的口型指令数量。
pub const DEFAULT_DELAY: usize = 3;

/// `delay` 的上限。游戏的口型帧计数只有一个字节。
pub const MAX_DELAY: usize = u8::MAX as usize;

/// 对齐字符串区时使用的默认填充字节。
pub const DEFAULT_FILLER: u8 = 0x40;

/// LIP 文件重建选项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[builder(setter(into), default)]
#[serde(default)]
pub struct RebuildOptions {
    /// 每绘制一个文本字符前的口型指令数量（不含绘制标记 `7`）。
    ///
    /// 数值越大，文字显示得越慢。
    pub delay: usize,
    /// 字符串区末尾用于 4 字节对齐的填充字节。
    pub filler: u8,
}

impl Default for RebuildOptions {
    fn default() -> Self {
        Self {
            delay: DEFAULT_DELAY,
            filler: DEFAULT_FILLER,
        }
    }
}

impl RebuildOptions {
    /// 检查选项是否可用。
    pub fn validate(&self) -> Result<()> {
        check_delay(self.delay)
    }
}

/// `delay` 必须在 `1..=MAX_DELAY` 之间。
pub fn check_delay(delay: usize) -> Result<()> {
    if !(1..=MAX_DELAY).contains(&delay) {
        return Err(LipError::Config(format!(
            "delay 必须在 1 到 {MAX_DELAY} 之间，实际为 {delay}"
        )));
    }
    Ok(())
}
