//! # 口型指令重新计时
//!
//! 口型指令是一串 `1`-`6` 的数字，每个数字驱动一帧嘴型，
//! 数字 `7` 则让游戏在屏幕上绘制下一个文本字符。
//! 译文的长度通常与原文不同，因此需要重新分配 `7` 的位置：
//! 每 `delay` 个嘴型数字之后绘制一个字符。

use crate::config::check_delay;
use crate::error::{LipError, Result};
use crate::model::{DRAW_MARKER, SENTINEL};

/// 按译文字符数重新分配绘制标记。
///
/// 返回的数字串包含恰好 `text_char_count` 个 `7`，长度为偶数且不以 `7` 结尾。
/// 如果 `text_char_count` 为 0，或指令中没有任何嘴型数字，则返回空串。
/// 原指令的分组数多于字符数时，多出的分组保留嘴型数字但不再附加绘制标记。
///
/// `delay` 超出 `1..=MAX_DELAY` 时返回 [`LipError::Config`]。
pub fn retime(commands: &str, text_char_count: usize, delay: usize) -> Result<String> {
    check_delay(delay)?;

    let digits: Vec<char> = commands.chars().filter(|&c| c != DRAW_MARKER).collect();
    let Some(&last_char) = digits.last() else {
        return Ok(String::new());
    };
    if text_char_count == 0 {
        return Ok(String::new());
    }

    let mut groups: Vec<Vec<char>> = digits.chunks(delay).map(<[char]>::to_vec).collect();

    if groups.len() < text_char_count {
        if let Some(tail) = groups.last_mut() {
            tail.resize(delay, last_char);
        }
        groups.resize(text_char_count, vec![last_char; delay]);
    }

    let capacity = groups
        .len()
        .checked_mul(delay + 1)
        .and_then(|n| n.checked_add(2))
        .ok_or_else(|| {
            LipError::OffsetOverflow(format!(
                "{} 个分组、delay = {delay} 的口型指令过长",
                groups.len()
            ))
        })?;
    let mut sequence = String::with_capacity(capacity);
    for (group_index, group) in groups.iter().enumerate() {
        sequence.extend(group);
        if group_index < text_char_count {
            sequence.push(DRAW_MARKER);
        }
    }

    // 播放器要求序列长度为偶数，并且不能以绘制标记结尾
    if sequence.ends_with(DRAW_MARKER) {
        sequence.push(last_char);
    }
    if sequence.len() % 2 != 0 {
        sequence.push(last_char);
    }

    Ok(sequence)
}

/// 将数字串按每两位一个字节打包，末尾附加结束字节。
///
/// 调用方需保证 `digits` 长度为偶数且只含数字。
pub fn pack_commands(digits: &str) -> std::result::Result<Vec<u8>, hex::FromHexError> {
    let mut packed = hex::decode(digits)?;
    packed.push(SENTINEL);
    Ok(packed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_DELAY;

    fn markers(sequence: &str) -> usize {
        sequence.chars().filter(|&c| c == DRAW_MARKER).count()
    }

    #[test]
    fn test_pads_short_sequence_with_last_digit() {
        let sequence = retime("1231231237", 5, 3).unwrap();
        assert_eq!(sequence, "1237123712373337333733");
        assert_eq!(
            pack_commands(&sequence).unwrap(),
            vec![0x12, 0x37, 0x12, 0x37, 0x12, 0x37, 0x33, 0x37, 0x33, 0x37, 0x33, 0x00]
        );
    }

    #[test]
    fn test_partial_last_group_is_filled() {
        // "12345" -> ["123", "45"] -> ["123", "455", "555"]
        // 以 7 结尾时补一位，之后长度为奇数再补一位
        assert_eq!(retime("12345", 3, 3).unwrap(), "12374557555755");
    }

    #[test]
    fn test_existing_markers_are_discarded() {
        let sequence = retime("7172737", 2, 1).unwrap();
        assert_eq!(sequence, "172733");
        assert_eq!(markers(&sequence), 2);
    }

    #[test]
    fn test_surplus_groups_keep_digits_without_markers() {
        let sequence = retime("121212121", 2, 2).unwrap();
        assert_eq!(markers(&sequence), 2);
        assert_eq!(sequence, "127127121211");
    }

    #[test]
    fn test_invariants_hold_for_many_inputs() {
        let inputs = ["1", "12", "123456", "6543217", "1111111111111", "27", "3737373"];
        for commands in inputs {
            for count in 1..8 {
                for delay in 1..5 {
                    let sequence = retime(commands, count, delay).unwrap();
                    assert_eq!(markers(&sequence), count, "{commands} {count} {delay}");
                    assert_eq!(sequence.len() % 2, 0, "{commands} {count} {delay}");
                    assert!(!sequence.ends_with(DRAW_MARKER));
                    assert_eq!(sequence, retime(commands, count, delay).unwrap());
                }
            }
        }
    }

    #[test]
    fn test_empty_inputs_produce_empty_sequence() {
        assert_eq!(retime("", 4, 3).unwrap(), "");
        assert_eq!(retime("777", 4, 3).unwrap(), "");
        assert_eq!(retime("123", 0, 3).unwrap(), "");
        assert_eq!(pack_commands("").unwrap(), vec![SENTINEL]);
    }

    #[test]
    fn test_out_of_range_delay_is_rejected() {
        for delay in [0, MAX_DELAY + 1, usize::MAX] {
            assert!(
                matches!(retime("12", 1, delay), Err(LipError::Config(_))),
                "{delay}"
            );
        }

        assert_eq!(retime("12", 1, MAX_DELAY).unwrap(), "1272");
        // 补齐的分组按 delay 长度填充
        let sequence = retime("12", 2, MAX_DELAY).unwrap();
        assert_eq!(markers(&sequence), 2);
        assert_eq!(sequence.len(), 2 * MAX_DELAY + 4);
    }

    #[test]
    fn test_pack_rejects_odd_length() {
        assert!(pack_commands("123").is_err());
    }
}
