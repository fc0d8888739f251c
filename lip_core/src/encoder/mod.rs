//! # 文本编码器

pub mod table;

pub use table::{CharTable, FullWidthTable, MappedTable, UnmappedChar, encode_shift_jis};

use crate::model::{SENTINEL, TextKind};

/// 将一行文本编码为游戏的原生编码，末尾附加结束字节。
///
/// 纯 ASCII 文本（包括空文本）被视为译文，交给 `table` 按 `context_id` 转换；
/// 其余文本被视为未修改的原文，直接以 Shift_JIS 编码。
pub fn encode_text(
    text: &str,
    context_id: &str,
    table: &dyn CharTable,
) -> Result<(TextKind, Vec<u8>), UnmappedChar> {
    let (kind, mut bytes) = if text.is_ascii() {
        (TextKind::Edited, table.encode(text, context_id)?)
    } else {
        (TextKind::Original, encode_shift_jis(text)?)
    };
    bytes.push(SENTINEL);
    Ok((kind, bytes))
}
