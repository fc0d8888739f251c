//! # 替换表解析器
//!
//! 替换表是以 `|` 分隔的 UTF-8 文本，每行五个字段：
//! 语音编号、原文本偏移量、文本、原指令偏移量、口型指令。

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};

use crate::error::{LipError, Result};
use crate::model::{Row, find_invalid_command};

const FIELD_COUNT: usize = 5;

/// 解析替换表的全部行。空行会被跳过。
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<Row>> {
    let mut csv_reader = ReaderBuilder::new()
        .delimiter(b'|')
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record.map_err(convert_csv_error)?;
        let line = record
            .position()
            .map_or(rows.len() + 1, |pos| pos.line() as usize);
        rows.push(parse_record(&record, line)?);
    }
    Ok(rows)
}

/// 读取并解析替换表文件。
pub fn read_rows_from_path(path: &Path) -> Result<Vec<Row>> {
    let rows = read_rows(File::open(path)?)?;
    tracing::debug!("[Table] 从 {} 读取了 {} 行。", path.display(), rows.len());
    Ok(rows)
}

fn parse_record(record: &StringRecord, line: usize) -> Result<Row> {
    if record.len() != FIELD_COUNT {
        return Err(LipError::malformed_row(
            line,
            format!("应有 {FIELD_COUNT} 个字段，实际为 {} 个", record.len()),
        ));
    }

    let voice_index = record[0].trim().parse::<u32>().map_err(|e| {
        LipError::malformed_row(line, format!("语音编号 {:?} 无效: {e}", &record[0]))
    })?;

    let commands = &record[4];
    if let Some(bad) = find_invalid_command(commands) {
        return Err(LipError::malformed_row(
            line,
            format!("口型指令中含有无效字符 {bad:?}"),
        ));
    }

    Ok(Row {
        line,
        voice_index,
        text_offset_hint: record[1].to_string(),
        text: record[2].to_string(),
        command_offset_hint: record[3].to_string(),
        commands: commands.to_string(),
    })
}

fn convert_csv_error(err: csv::Error) -> LipError {
    if let csv::ErrorKind::Utf8 { pos, .. } = err.kind() {
        let line = pos.as_ref().map_or(0, |pos| pos.line() as usize);
        return LipError::malformed_row(line, "不是有效的 UTF-8 文本");
    }
    LipError::Table(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rows() {
        let content = "0|0x10|Hello|0x16|1231231237\n12|0x20|こんにちは|0x2C|12341234\n";
        let rows = read_rows(content.as_bytes()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0],
            Row {
                line: 1,
                voice_index: 0,
                text_offset_hint: "0x10".into(),
                text: "Hello".into(),
                command_offset_hint: "0x16".into(),
                commands: "1231231237".into(),
            }
        );
        assert_eq!(rows[1].line, 2);
        assert_eq!(rows[1].voice_index, 12);
        assert_eq!(rows[1].text, "こんにちは");
        assert_eq!(rows[1].text_char_count(), 5);
    }

    #[test]
    fn test_blank_lines_are_skipped_and_quotes_honoured() {
        let content = "1|a|\"Hi | there\"|b|12\n\n2|a|Yo|b|34\n";
        let rows = read_rows(content.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].text, "Hi | there");
        assert_eq!(rows[1].line, 3);
    }

    #[test]
    fn test_wrong_field_count_reports_line() {
        let content = "1|a|Hi|b|12\n2|a|Yo|b\n";
        let err = read_rows(content.as_bytes()).unwrap_err();
        assert!(matches!(err, LipError::MalformedRow { row: 2, .. }), "{err}");
    }

    #[test]
    fn test_bad_voice_index() {
        let err = read_rows("x|a|Hi|b|12\n".as_bytes()).unwrap_err();
        assert!(matches!(err, LipError::MalformedRow { row: 1, .. }));
        let err = read_rows("-1|a|Hi|b|12\n".as_bytes()).unwrap_err();
        assert!(matches!(err, LipError::MalformedRow { row: 1, .. }));
    }

    #[test]
    fn test_bad_command_digit() {
        let err = read_rows("1|a|Hi|b|1280\n".as_bytes()).unwrap_err();
        assert!(matches!(err, LipError::MalformedRow { row: 1, .. }));
    }

    #[test]
    fn test_invalid_utf8_is_malformed() {
        let bytes: &[u8] = b"1|a|\xFF\xFE|b|12\n";
        let err = read_rows(bytes).unwrap_err();
        assert!(matches!(err, LipError::MalformedRow { .. }), "{err}");
    }
}
