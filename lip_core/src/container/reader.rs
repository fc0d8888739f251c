use std::fs;
use std::io::Cursor;
use std::path::Path;

use binrw::BinRead;

use crate::error::{LipError, Result};
use crate::model::{ANCHOR_POSITION, ContainerHeader, SIGNATURE};

/// 从参考 LIP 文件中读取的、重建时需要沿用的信息。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceContainer {
    /// 原文件头。
    pub header: ContainerHeader,
    /// 第一个条目的文本偏移量，新偏移量从这里开始累加。
    pub anchor: u32,
    /// `body_size + 8` 之后的全部字节，原样写回。
    pub padding: Vec<u8>,
}

impl SourceContainer {
    /// 解析内存中的 LIP 文件。
    ///
    /// 只检查签名与文件头是否完整，文件头中声明的大小不做校验。
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.get(..SIGNATURE.len()) != Some(SIGNATURE.as_slice()) {
            return Err(LipError::Format("不是 LIP 文件（签名不是 ALPD）".to_string()));
        }

        let mut cursor = Cursor::new(bytes);
        let header = ContainerHeader::read_le(&mut cursor)
            .map_err(|e| LipError::Format(format!("文件头不完整: {e}")))?;

        cursor.set_position(ANCHOR_POSITION);
        let anchor = u32::read_le(&mut cursor)
            .map_err(|e| LipError::Format(format!("缺少第一个偏移表条目: {e}")))?;

        let tail_start = usize::try_from(u64::from(header.body_size) + 8)
            .unwrap_or(usize::MAX)
            .min(bytes.len());

        Ok(Self {
            header,
            anchor,
            padding: bytes[tail_start..].to_vec(),
        })
    }

    /// 读取并解析 LIP 文件。
    pub fn open(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        let container = Self::parse(&bytes)?;
        tracing::debug!(
            "[Reader] {}: body_size = {:#x}, row_count = {}, anchor = {:#x}, 填充区 {} 字节",
            path.display(),
            container.header.body_size,
            container.header.row_count,
            container.anchor,
            container.padding.len()
        );
        Ok(container)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<u8> {
        let mut bytes = b"ALPD".to_vec();
        bytes.extend_from_slice(&16u32.to_le_bytes());
        bytes.extend_from_slice(&1u32.to_le_bytes());
        // 一个条目
        bytes.extend_from_slice(&3u32.to_le_bytes());
        bytes.extend_from_slice(&0x18u32.to_le_bytes());
        bytes.extend_from_slice(&0x1Au32.to_le_bytes());
        // 字符串区之后是填充区
        bytes.extend_from_slice(&[0xAA, 0xBB, 0xCC]);
        bytes
    }

    #[test]
    fn test_parse_header_anchor_and_padding() {
        let container = SourceContainer::parse(&sample()).unwrap();
        assert_eq!(container.header.body_size, 16);
        assert_eq!(container.header.row_count, 1);
        assert_eq!(container.anchor, 0x18);
        assert_eq!(container.padding, vec![0xAA, 0xBB, 0xCC]);
    }

    #[test]
    fn test_wrong_signature_is_format_error() {
        let mut bytes = sample();
        bytes[0] = b'X';
        assert!(SourceContainer::parse(&bytes).unwrap_err().is_format());
        assert!(SourceContainer::parse(b"AL").unwrap_err().is_format());
    }

    #[test]
    fn test_truncated_header_is_format_error() {
        assert!(SourceContainer::parse(b"ALPD\x10\x00").unwrap_err().is_format());
        assert!(
            SourceContainer::parse(&sample()[..18])
                .unwrap_err()
                .is_format()
        );
    }

    #[test]
    fn test_body_size_past_end_yields_empty_padding() {
        let mut bytes = sample();
        bytes[4..8].copy_from_slice(&0xFFFFu32.to_le_bytes());
        let container = SourceContainer::parse(&bytes).unwrap();
        assert!(container.padding.is_empty());
    }
}
