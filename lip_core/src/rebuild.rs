//! # LIP 文件重建
//!
//! 以参考文件为基础，按替换表的顺序逐行编码文本与口型指令，
//! 生成新的偏移表和字符串区。任何一行失败都会中止整个文件，不会写出半成品。

use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::RebuildOptions;
use crate::container::{ContainerWriter, SourceContainer};
use crate::encoder::{CharTable, encode_text};
use crate::error::{LipError, Result};
use crate::io::BatchPair;
use crate::model::{EncodedRow, Row, TextKind, find_invalid_command};
use crate::retimer::{pack_commands, retime};
use crate::table::read_rows_from_path;

/// 单个文件成功重建后的结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RebuildReport {
    pub name: String,
    pub output_path: PathBuf,
    pub rows: usize,
    pub bytes_written: usize,
}

impl fmt::Display for RebuildReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: 已写入 {} ({:#x}) 字节。",
            self.name, self.bytes_written, self.bytes_written
        )
    }
}

/// 编码一行，错误信息中的行号取自 `row.line`。
///
/// 译文的口型指令会按字符数重新计时，原文的指令则原样打包。
pub fn encode_row(
    row: &Row,
    options: &RebuildOptions,
    table: &dyn CharTable,
) -> Result<EncodedRow> {
    if let Some(bad) = find_invalid_command(&row.commands) {
        return Err(LipError::malformed_row(
            row.line,
            format!("口型指令中含有无效字符 {bad:?}"),
        ));
    }

    let (kind, text_bytes) = encode_text(&row.text, &row.text_offset_hint, table)
        .map_err(|e| LipError::encoding(row.line, e.character, e.to_string()))?;

    let digits = match kind {
        TextKind::Edited => Cow::Owned(retime(
            &row.commands,
            row.text_char_count(),
            options.delay,
        )?),
        TextKind::Original => Cow::Borrowed(row.commands.as_str()),
    };

    let command_bytes = pack_commands(&digits).map_err(|e| {
        LipError::malformed_row(row.line, format!("口型指令 {digits:?} 无法打包: {e}"))
    })?;

    Ok(EncodedRow {
        kind,
        text_bytes,
        command_bytes,
    })
}

/// 在内存中重建 LIP 文件。
pub fn rebuild(
    source: &SourceContainer,
    rows: &[Row],
    options: &RebuildOptions,
    table: &dyn CharTable,
) -> Result<Vec<u8>> {
    options.validate()?;

    if usize::try_from(source.header.row_count).ok() != Some(rows.len()) {
        tracing::warn!(
            "[Rebuild] 替换表有 {} 行，但参考文件的 row_count 为 {}，row_count 将保持不变。",
            rows.len(),
            source.header.row_count
        );
    }

    let mut writer = ContainerWriter::new(source.anchor, options.filler);
    for row in rows {
        let encoded = encode_row(row, options, table)?;
        let entry = writer.push_row(row.voice_index, &encoded)?;
        tracing::trace!(
            "[Rebuild] 第 {} 行 ({}): text = {:#x}, commands = {:#x}",
            row.line,
            encoded.kind,
            entry.text_offset,
            entry.command_offset
        );
    }

    writer.finish(source.header.row_count, &source.padding)
}

/// 处理一组文件，并把结果写入 `output_dir`。
///
/// 只有在整个文件重建成功后才会创建输出文件。
pub fn rebuild_file(
    pair: &BatchPair,
    output_dir: &Path,
    options: &RebuildOptions,
    table: &dyn CharTable,
) -> Result<RebuildReport> {
    let source = SourceContainer::open(&pair.source_path)?;
    let rows = read_rows_from_path(&pair.table_path)?;
    let bytes = rebuild(&source, &rows, options, table)?;

    let output_path = pair.output_path(output_dir);
    fs::write(&output_path, &bytes)?;

    Ok(RebuildReport {
        name: pair.name.clone(),
        output_path,
        rows: rows.len(),
        bytes_written: bytes.len(),
    })
}
