use std::io;

use thiserror::Error;

/// 定义 LIP 文件重建过程中可能发生的各种错误。
///
/// 所有错误都只影响当前处理的单个文件，批量处理时会记录原因并继续处理下一个文件。
#[derive(Error, Debug)]
pub enum LipError {
    /// 源文件不是有效的 LIP 容器（签名错误或文件头被截断）。
    #[error("LIP 格式错误: {0}")]
    Format(String),
    /// 某一行文本中含有无法编码的字符。
    #[error("第 {row} 行编码失败: 无法编码字符 {character:?} ({message})")]
    Encoding {
        /// 出错的行号（从 1 开始）。
        row: usize,
        /// 无法编码的字符。
        character: char,
        /// 附加说明。
        message: String,
    },
    /// 表格行的字段数量或字段内容不合法。
    #[error("第 {row} 行格式无效: {message}")]
    MalformedRow {
        /// 出错的行号（从 1 开始）。
        row: usize,
        /// 附加说明。
        message: String,
    },
    /// 偏移量或文件大小超出了 32 位无符号整数的范围。
    #[error("偏移量溢出: {0}")]
    OffsetOverflow(String),
    /// 配置项或码表文件无效。
    #[error("配置错误: {0}")]
    Config(String),
    /// 二进制读写错误，通常来自 `binrw` 库。
    #[error("二进制读写错误: {0}")]
    Binary(#[from] binrw::Error),
    /// 表格解析错误，通常来自 `csv` 库。
    #[error("表格解析错误: {0}")]
    Table(#[from] csv::Error),
    /// 文件读写等IO错误。
    #[error("IO 错误: {0}")]
    Io(#[from] io::Error),
}

impl LipError {
    /// 创建一个 `MalformedRow` 错误。
    #[must_use]
    pub fn malformed_row(row: usize, message: impl Into<String>) -> Self {
        Self::MalformedRow {
            row,
            message: message.into(),
        }
    }

    /// 创建一个 `Encoding` 错误。
    #[must_use]
    pub fn encoding(row: usize, character: char, message: impl Into<String>) -> Self {
        Self::Encoding {
            row,
            character,
            message: message.into(),
        }
    }

    /// 该错误是否意味着源文件不是 LIP 文件。
    #[must_use]
    pub const fn is_format(&self) -> bool {
        matches!(self, Self::Format(_))
    }
}

/// `lip_core` 的通用结果类型。
pub type Result<T> = std::result::Result<T, LipError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding_error_mentions_row_and_char() {
        let err = LipError::encoding(4, '\t', "码表中没有该字符");
        let text = err.to_string();
        assert!(text.contains('4'));
        assert!(text.contains("'\\t'"));
    }

    #[test]
    fn test_io_error_converts() {
        let err: LipError = io::Error::other("boom").into();
        assert!(matches!(err, LipError::Io(_)));
        assert!(err.to_string().contains("boom"));
        assert!(!err.is_format());
    }
}
