//! LIP 容器的数据结构。

use binrw::binrw;
use strum_macros::Display;

/// LIP 文件开头的 4 字节签名。
pub const SIGNATURE: &[u8; 4] = b"ALPD";

/// 文本与指令序列末尾的结束字节。
pub const SENTINEL: u8 = 0x00;

/// 口型指令中表示“绘制一个文本字符”的数字。
pub const DRAW_MARKER: char = '7';

/// 文件头长度：签名、`body_size` 和 `row_count`。
pub const HEADER_LEN: usize = 12;

/// 每个偏移表条目的长度。
pub const ENTRY_LEN: usize = 12;

/// 第一个偏移表条目中文本偏移量所在的位置。
pub const ANCHOR_POSITION: u64 = 16;

/// LIP 文件头。
///
/// `body_size` 从 `row_count` 字段开始计算，一直到填充区之前，
/// 因此填充区起始于 `body_size + 8`。
#[binrw]
#[brw(little, magic = b"ALPD")]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerHeader {
    pub body_size: u32,
    pub row_count: u32,
}

/// 偏移表条目，每行一个。
#[binrw]
#[brw(little)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetEntry {
    pub voice_index: u32,
    pub text_offset: u32,
    pub command_offset: u32,
}

/// 替换表中的一行。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    /// 该行在替换表中的行号（从 1 开始），用于错误信息。为 0 时表示未知。
    pub line: usize,
    /// 语音编号。
    pub voice_index: u32,
    /// 原文本偏移量，仅作为码表的上下文标识使用。
    pub text_offset_hint: String,
    /// 文本内容。
    pub text: String,
    /// 原指令偏移量，不参与计算。
    pub command_offset_hint: String,
    /// 口型指令，由 `1`-`7` 组成的数字串。
    pub commands: String,
}

impl Row {
    /// 文本的字符数，即重新计时后需要的绘制标记数量。
    #[must_use]
    pub fn text_char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// 返回口型指令中第一个不在 `1`-`7` 范围内的字符。
#[must_use]
pub fn find_invalid_command(commands: &str) -> Option<char> {
    commands.chars().find(|c| !('1'..=DRAW_MARKER).contains(c))
}

/// 文本行的来源类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TextKind {
    /// 纯 ASCII 文本，视为已翻译的行，需要重新计时。
    #[strum(serialize = "edited")]
    Edited,
    /// 含有非 ASCII 字符，视为未修改的原文。
    #[strum(serialize = "original")]
    Original,
}

/// 编码完成的一行，两段字节都以 [`SENTINEL`] 结尾。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedRow {
    pub kind: TextKind,
    pub text_bytes: Vec<u8>,
    pub command_bytes: Vec<u8>,
}
