use std::io::Cursor;

use binrw::BinWrite;

use crate::error::{LipError, Result};
use crate::model::{ContainerHeader, ENTRY_LEN, EncodedRow, HEADER_LEN, OffsetEntry};

/// 逐行累积偏移表与字符串区，最后输出完整的 LIP 文件。
#[derive(Debug, Clone)]
pub struct ContainerWriter {
    entries: Vec<OffsetEntry>,
    blob: Vec<u8>,
    cursor: u32,
    filler: u8,
}

impl ContainerWriter {
    /// `anchor` 为第一行文本的偏移量，`filler` 为对齐用的填充字节。
    #[must_use]
    pub const fn new(anchor: u32, filler: u8) -> Self {
        Self {
            entries: Vec::new(),
            blob: Vec::new(),
            cursor: anchor,
            filler,
        }
    }

    /// 下一段数据将被写入的偏移量。
    #[must_use]
    pub const fn cursor(&self) -> u32 {
        self.cursor
    }

    /// 已经写入的条目。
    #[must_use]
    pub fn entries(&self) -> &[OffsetEntry] {
        &self.entries
    }

    /// 追加一行：先记录条目，再把文本和指令依次写入字符串区。
    pub fn push_row(&mut self, voice_index: u32, row: &EncodedRow) -> Result<&OffsetEntry> {
        let text_offset = self.cursor;
        let command_offset = advance(text_offset, row.text_bytes.len())?;
        self.cursor = advance(command_offset, row.command_bytes.len())?;

        self.blob.extend_from_slice(&row.text_bytes);
        self.blob.extend_from_slice(&row.command_bytes);
        self.entries.push(OffsetEntry {
            voice_index,
            text_offset,
            command_offset,
        });
        Ok(&self.entries[self.entries.len() - 1])
    }

    /// 对齐字符串区、重新计算 `body_size`，输出完整文件。
    ///
    /// 至少写入一个填充字节，直到文件头后的数据加上 8 字节是 4 的倍数。
    /// `padding` 原样附加在末尾，不会因为 `body_size` 变化而调整。
    pub fn finish(mut self, row_count: u32, padding: &[u8]) -> Result<Vec<u8>> {
        let table_len = self.entries.len() * ENTRY_LEN;
        loop {
            self.blob.push(self.filler);
            if (table_len + self.blob.len() + 8) % 4 == 0 {
                break;
            }
        }

        let body_size = u32::try_from(table_len + self.blob.len() + 4).map_err(|_| {
            LipError::OffsetOverflow(format!(
                "数据长度 {} 超出了 body_size 的范围",
                table_len + self.blob.len()
            ))
        })?;

        let header = ContainerHeader {
            body_size,
            row_count,
        };

        let mut out = Cursor::new(Vec::with_capacity(
            HEADER_LEN + table_len + self.blob.len() + padding.len(),
        ));
        header.write_le(&mut out)?;
        self.entries.write_le(&mut out)?;

        let mut bytes = out.into_inner();
        bytes.extend_from_slice(&self.blob);
        bytes.extend_from_slice(padding);
        Ok(bytes)
    }
}

fn advance(offset: u32, len: usize) -> Result<u32> {
    u32::try_from(len)
        .ok()
        .and_then(|len| offset.checked_add(len))
        .ok_or_else(|| LipError::OffsetOverflow(format!("偏移量 {offset:#x} 加上 {len} 字节后溢出")))
}
