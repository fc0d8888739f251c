//! 译文所用的码表。
//!
//! 游戏只能显示其字库中的双字节字符，因此 ASCII 译文需要先经过码表转换。
//! 默认码表把 ASCII 转为对应的全角字符，也可以从 TOML 文件加载自定义映射，
//! 并按行的上下文标识（原文本偏移量）覆盖个别字符。

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use encoding_rs::SHIFT_JIS;
use serde::Deserialize;
use thiserror::Error;

use crate::error::{LipError, Result};
use crate::model::TextKind;

/// 码表中找不到对应编码的字符。
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{kind} 文本中的字符 {character:?} 没有对应的编码")]
pub struct UnmappedChar {
    pub character: char,
    pub kind: TextKind,
}

/// 文本到游戏原生编码的映射。
pub trait CharTable: Send + Sync {
    /// 返回单个字符的编码，`context` 为该行的上下文标识。
    fn encode_char(&self, ch: char, context: &str) -> Option<Vec<u8>>;

    /// 编码整行文本（不含结束字节）。
    fn encode(&self, text: &str, context: &str) -> std::result::Result<Vec<u8>, UnmappedChar> {
        let mut out = Vec::with_capacity(text.len() * 2);
        for ch in text.chars() {
            let bytes = self.encode_char(ch, context).ok_or(UnmappedChar {
                character: ch,
                kind: TextKind::Edited,
            })?;
            out.extend_from_slice(&bytes);
        }
        Ok(out)
    }
}

/// 将可打印 ASCII 字符映射为 Shift_JIS 全角字符的默认码表。
#[derive(Debug, Clone, Copy, Default)]
pub struct FullWidthTable;

impl CharTable for FullWidthTable {
    fn encode_char(&self, ch: char, _context: &str) -> Option<Vec<u8>> {
        match ch {
            // 全角空格
            ' ' => Some(vec![0x81, 0x40]),
            // ＂ 和 ＇ 只在 NEC/IBM 扩展区，改用 JIS X 0208 的引号
            '"' => Some(vec![0x81, 0x68]),
            '\'' => Some(vec![0x81, 0x66]),
            '!'..='~' => {
                let wide = char::from_u32(u32::from(ch) - 0x21 + 0xFF01)?;
                let mut buf = [0u8; 4];
                let (bytes, _, had_errors) = SHIFT_JIS.encode(wide.encode_utf8(&mut buf));
                (!had_errors).then(|| bytes.into_owned())
            }
            _ => None,
        }
    }
}

/// 码表文件的原始结构。
#[derive(Debug, Default, Deserialize)]
struct TableFile {
    #[serde(default)]
    default: HashMap<String, String>,
    #[serde(default)]
    context: HashMap<String, HashMap<String, String>>,
}

/// 从 TOML 文件加载的自定义码表。
///
/// 查找顺序：当前行上下文的映射、`[default]` 映射、最后是 [`FullWidthTable`]。
///
/// ```toml
/// [default]
/// "e" = "8285"
///
/// [context."0x1A40"]
/// "e" = "8286"
/// ```
#[derive(Debug, Clone, Default)]
pub struct MappedTable {
    default: HashMap<char, Vec<u8>>,
    contexts: HashMap<String, HashMap<char, Vec<u8>>>,
    fallback: FullWidthTable,
}

impl MappedTable {
    /// 从 TOML 字符串解析码表。
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: TableFile = toml::from_str(content)
            .map_err(|e| LipError::Config(format!("无法解析码表文件: {e}")))?;

        let default = convert_map(file.default)?;
        let contexts = file
            .context
            .into_iter()
            .map(|(id, map)| convert_map(map).map(|map| (id, map)))
            .collect::<Result<HashMap<_, _>>>()?;

        Ok(Self {
            default,
            contexts,
            fallback: FullWidthTable,
        })
    }

    /// 从文件加载码表。
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let table = Self::from_toml_str(&content)?;
        tracing::debug!(
            "[CharTable] 已从 {} 加载 {} 个默认映射和 {} 组上下文映射。",
            path.display(),
            table.default.len(),
            table.contexts.len()
        );
        Ok(table)
    }
}

impl CharTable for MappedTable {
    fn encode_char(&self, ch: char, context: &str) -> Option<Vec<u8>> {
        self.contexts
            .get(context)
            .and_then(|map| map.get(&ch))
            .or_else(|| self.default.get(&ch))
            .cloned()
            .or_else(|| self.fallback.encode_char(ch, context))
    }
}

fn convert_map(raw: HashMap<String, String>) -> Result<HashMap<char, Vec<u8>>> {
    raw.into_iter()
        .map(|(key, value)| {
            let mut chars = key.chars();
            let (Some(ch), None) = (chars.next(), chars.next()) else {
                return Err(LipError::Config(format!("码表键 {key:?} 必须是单个字符")));
            };
            let compact: String = value.split_whitespace().collect();
            let bytes = hex::decode(&compact)
                .map_err(|e| LipError::Config(format!("码表项 {key:?} 的值无效: {e}")))?;
            if bytes.is_empty() {
                return Err(LipError::Config(format!("码表项 {key:?} 的值为空")));
            }
            Ok((ch, bytes))
        })
        .collect()
}

/// `encoding_rs` 按 WHATWG 映射编码，以下字符需要单独处理：
/// JIS X 0208 原始字形（WHATWG 只收录 CP932 的替代码位）以及
/// JIS X 0213 第 1 面中游戏字库会用到的字符。
fn shift_jis_supplement(ch: char) -> Option<[u8; 2]> {
    let bytes = match ch {
        '\u{301C}' => [0x81, 0x60], // 〜
        '\u{2016}' => [0x81, 0x61], // ‖
        '\u{2212}' => [0x81, 0x7C], // −
        '\u{00A2}' => [0x81, 0x91], // ¢
        '\u{00A3}' => [0x81, 0x92], // £
        '\u{00AC}' => [0x81, 0xCA], // ¬
        'ゔ' => [0x82, 0xF2],
        'ゕ' => [0x82, 0xF3],
        'ゖ' => [0x82, 0xF4],
        '𠀋' => [0x87, 0xA0],
        _ => return None,
    };
    Some(bytes)
}

/// 以 Shift_JIS 编码原文（不含结束字节）。
///
/// 先查补充映射，其余字符交给 `encoding_rs`。其他 JIS X 0213 扩展字符不受支持。
pub fn encode_shift_jis(text: &str) -> std::result::Result<Vec<u8>, UnmappedChar> {
    let mut out = Vec::with_capacity(text.len());
    let mut buf = [0u8; 4];
    for ch in text.chars() {
        if let Some(bytes) = shift_jis_supplement(ch) {
            out.extend_from_slice(&bytes);
            continue;
        }
        let (bytes, _, had_errors) = SHIFT_JIS.encode(ch.encode_utf8(&mut buf));
        if had_errors {
            return Err(UnmappedChar {
                character: ch,
                kind: TextKind::Original,
            });
        }
        out.extend_from_slice(&bytes);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_width_letters_and_digits() {
        let table = FullWidthTable;
        assert_eq!(table.encode("A", "").unwrap(), vec![0x82, 0x60]);
        assert_eq!(table.encode("a", "").unwrap(), vec![0x82, 0x81]);
        assert_eq!(table.encode("0", "").unwrap(), vec![0x82, 0x4F]);
        assert_eq!(table.encode("A B", "").unwrap(), vec![0x82, 0x60, 0x81, 0x40, 0x82, 0x61]);
    }

    #[test]
    fn test_full_width_rejects_control_chars() {
        let err = FullWidthTable.encode("Hi\tthere", "").unwrap_err();
        assert_eq!(err.character, '\t');
        assert_eq!(err.kind, TextKind::Edited);
    }

    #[test]
    fn test_mapped_table_context_overrides_default() {
        let table = MappedTable::from_toml_str(
            r#"
[default]
"e" = "8285"

[context."0x1A40"]
"e" = "86 A0"
"#,
        )
        .unwrap();

        assert_eq!(table.encode("e", "0x0000").unwrap(), vec![0x82, 0x85]);
        assert_eq!(table.encode("e", "0x1A40").unwrap(), vec![0x86, 0xA0]);
        // 未覆盖的字符退回全角码表
        assert_eq!(table.encode("A", "0x1A40").unwrap(), vec![0x82, 0x60]);
    }

    #[test]
    fn test_mapped_table_rejects_bad_entries() {
        assert!(matches!(
            MappedTable::from_toml_str("[default]\n\"ab\" = \"8260\""),
            Err(LipError::Config(_))
        ));
        assert!(matches!(
            MappedTable::from_toml_str("[default]\n\"a\" = \"zz\""),
            Err(LipError::Config(_))
        ));
        assert!(matches!(
            MappedTable::from_toml_str("[default]\n\"a\" = \"\""),
            Err(LipError::Config(_))
        ));
    }

    #[test]
    fn test_shift_jis_original_text() {
        assert_eq!(encode_shift_jis("あ").unwrap(), vec![0x82, 0xA0]);
        let err = encode_shift_jis("あ😀").unwrap_err();
        assert_eq!(err.character, '😀');
        assert_eq!(err.kind, TextKind::Original);
    }

    #[test]
    fn test_shift_jis_jis_x_variants() {
        assert_eq!(encode_shift_jis("〜").unwrap(), vec![0x81, 0x60]);
        assert_eq!(encode_shift_jis("ゔ").unwrap(), vec![0x82, 0xF2]);
        assert_eq!(encode_shift_jis("𠀋").unwrap(), vec![0x87, 0xA0]);
        assert_eq!(
            encode_shift_jis("あ〜ゔ−").unwrap(),
            vec![0x82, 0xA0, 0x81, 0x60, 0x82, 0xF2, 0x81, 0x7C]
        );
        // CP932 的替代码位仍照常编码
        assert_eq!(encode_shift_jis("～").unwrap(), vec![0x81, 0x60]);
    }

    #[test]
    fn test_full_width_quotes() {
        assert_eq!(FullWidthTable.encode("\"", "").unwrap(), vec![0x81, 0x68]);
        assert_eq!(FullWidthTable.encode("'", "").unwrap(), vec![0x81, 0x66]);
        assert_eq!(
            FullWidthTable.encode("'A'", "").unwrap(),
            vec![0x81, 0x66, 0x82, 0x60, 0x81, 0x66]
        );
    }
}
