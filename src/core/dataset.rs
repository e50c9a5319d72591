//! Dataset codecs: whole-file JSON arrays and line-delimited JSON objects.

use crate::core::{Record, RecordTransform};
use crate::utils::error::{EtlError, Result};
use serde::Serialize;
use serde_json::ser::Formatter;
use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// 陣列模式：整份內容一次解析，任何錯誤都是整體失敗
pub fn decode_array(bytes: &[u8], path: &str) -> Result<Vec<Record>> {
    serde_json::from_slice::<Vec<Record>>(bytes).map_err(|source| EtlError::Decode {
        path: path.to_string(),
        source,
    })
}

/// 兩格縮排，非 ASCII 字元原樣輸出
pub fn encode_array(records: &[Record]) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(records)?)
}

pub fn decode_line(line: &str, line_no: usize) -> Result<Record> {
    let malformed = |reason: String| EtlError::MalformedRecord {
        line: line_no,
        content: line.to_string(),
        reason,
    };

    let value: serde_json::Value =
        serde_json::from_str(line).map_err(|e| malformed(e.to_string()))?;
    Record::from_value(value).ok_or_else(|| malformed("expected a JSON object".to_string()))
}

/// 單行輸出，採 `", "` 與 `": "` 分隔：`{"id": 1, "views": 5000000}`
pub fn encode_line(record: &Record) -> Result<String> {
    let mut buf = Vec::with_capacity(128);
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
    record.serialize(&mut ser)?;
    // serde_json 只輸出合法 UTF-8
    String::from_utf8(buf).map_err(|e| EtlError::IoError(io::Error::new(io::ErrorKind::InvalidData, e)))
}

struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineStats {
    pub processed: usize,
    pub skipped: usize,
    pub blank: usize,
}

/// 逐行串流轉換。格式錯誤的行會回報並略過，其餘錯誤（讀寫失敗、非 UTF-8）中止。
/// 中止前仍會 flush 已寫入的記錄。
pub async fn transform_lines<R, W, T>(reader: R, writer: &mut W, transform: &T) -> Result<LineStats>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    T: RecordTransform + ?Sized,
{
    let mut stats = LineStats::default();
    let streamed = stream_lines(reader, writer, transform, &mut stats).await;
    let flushed = writer.flush().await;

    if let Err(e) = &streamed {
        tracing::debug!(
            "Line stream aborted after {} records: {}",
            stats.processed,
            e
        );
    }
    streamed?;
    flushed?;

    tracing::debug!(
        "Line stream finished: {} processed, {} skipped, {} blank",
        stats.processed,
        stats.skipped,
        stats.blank
    );
    Ok(stats)
}

async fn stream_lines<R, W, T>(reader: R, writer: &mut W, transform: &T, stats: &mut LineStats) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    T: RecordTransform + ?Sized,
{
    let mut lines = reader.lines();
    let mut line_no = 0usize;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        if line.trim().is_empty() {
            stats.blank += 1;
            continue;
        }

        let record = match decode_line(&line, line_no) {
            Ok(record) => record,
            Err(e) => {
                tracing::debug!("{}", e);
                println!("{}", e.user_friendly_message());
                stats.skipped += 1;
                continue;
            }
        };

        let mut encoded = encode_line(&transform.apply(record))?;
        encoded.push('\n');
        writer.write_all(encoded.as_bytes()).await?;
        stats.processed += 1;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transform::{Annotate, CorrectOutlier, TransformChain};
    use crate::utils::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_decode_array_accepts_objects() {
        let records = decode_array(r#"[{"id": 1}, {"id": 2, "title": "장편"}]"#.as_bytes(), "in.json").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].data["title"], json!("장편"));
    }

    #[test]
    fn test_decode_array_rejects_bad_shapes() {
        let inputs: [&[u8]; 4] = [b"{not json", b"{\"id\": 1}", b"[1, 2]", b""];
        for input in inputs {
            let err = decode_array(input, "in.json").unwrap_err();
            assert_eq!(err.kind(), ErrorKind::DecodeError);
        }
    }

    #[test]
    fn test_encode_array_is_pretty_and_unescaped() {
        let records = decode_array(r#"[{"id":1,"title":"전생검신"}]"#.as_bytes(), "in.json").unwrap();
        let text = String::from_utf8(encode_array(&records).unwrap()).unwrap();
        assert_eq!(text, "[\n  {\n    \"id\": 1,\n    \"title\": \"전생검신\"\n  }\n]");
    }

    #[test]
    fn test_encode_line_spacing() {
        let record = Record::from_value(json!({"id": 1, "views": 5000000, "tags": ["a", "b"], "meta": {}}))
            .unwrap();
        assert_eq!(
            encode_line(&record).unwrap(),
            r#"{"id": 1, "views": 5000000, "tags": ["a", "b"], "meta": {}}"#
        );
    }

    #[test]
    fn test_decode_line_rejects_non_objects() {
        let err = decode_line("[1, 2]", 4).unwrap_err();
        match err {
            EtlError::MalformedRecord { line, content, .. } => {
                assert_eq!(line, 4);
                assert_eq!(content, "[1, 2]");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(decode_line("{\"id\": ", 1).is_err());
    }

    #[tokio::test]
    async fn test_transform_lines_skips_malformed_and_blank() {
        let input = "{\"id\": 1, \"views\": 50000000}\n\n   \n{broken\n{\"id\": 2, \"views\": 999}\n";
        let mut output: Vec<u8> = Vec::new();

        let stats = transform_lines(input.as_bytes(), &mut output, &CorrectOutlier::views())
            .await
            .unwrap();

        assert_eq!(
            stats,
            LineStats {
                processed: 2,
                skipped: 1,
                blank: 2
            }
        );
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "{\"id\": 1, \"views\": 5000000}\n{\"id\": 2, \"views\": 999}\n"
        );
    }

    #[tokio::test]
    async fn test_transform_lines_handles_crlf_and_missing_final_newline() {
        let input = "{\"id\": 1}\r\n{\"id\": 2}";
        let mut output: Vec<u8> = Vec::new();
        let chain = TransformChain::new().with(Annotate::source_label("Novelpia"));

        let stats = transform_lines(input.as_bytes(), &mut output, &chain).await.unwrap();

        assert_eq!(stats.processed, 2);
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "{\"id\": 1, \"source\": \"Novelpia\"}\n{\"id\": 2, \"source\": \"Novelpia\"}\n"
        );
    }

    #[tokio::test]
    async fn test_transform_lines_aborts_on_invalid_utf8() {
        let input: &[u8] = b"{\"id\": 1}\n\xff\xfe\n";
        let mut output: Vec<u8> = Vec::new();
        let err = transform_lines(input, &mut output, &TransformChain::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedError);
    }

    #[tokio::test]
    async fn test_records_before_abort_are_flushed() {
        let input: &[u8] = b"{\"id\": 1}\n{\"id\": 2}\n\xff\xfe\n{\"id\": 3}\n";
        let mut writer = tokio::io::BufWriter::new(Vec::new());

        let result = transform_lines(input, &mut writer, &Annotate::source_label("Novelpia")).await;

        assert!(result.is_err());
        assert_eq!(
            String::from_utf8(writer.into_inner()).unwrap(),
            "{\"id\": 1, \"source\": \"Novelpia\"}\n{\"id\": 2, \"source\": \"Novelpia\"}\n"
        );
    }

    #[test]
    fn test_big_integers_survive_round_trip() {
        let line = r#"{"id": 123456789012345678901234567890, "views": 100000000000000000000}"#;
        let record = CorrectOutlier::views().apply(decode_line(line, 1).unwrap());
        assert_eq!(
            encode_line(&record).unwrap(),
            r#"{"id": 123456789012345678901234567890, "views": 10000000000000000000}"#
        );
    }

    #[test]
    fn test_integers_beyond_i128_keep_their_digits() {
        let line = r#"{"id": 1234567890123456789012345678901234567890123, "views": 99999999999999999999999999999999999999999, "score": 4.50}"#;
        let record = CorrectOutlier::views().apply(decode_line(line, 1).unwrap());
        assert_eq!(encode_line(&record).unwrap(), line);

        let array = format!("[{}]", line);
        let records = decode_array(array.as_bytes(), "in.json").unwrap();
        let text = String::from_utf8(encode_array(&records).unwrap()).unwrap();
        assert!(text.contains("\"id\": 1234567890123456789012345678901234567890123"));
        assert!(text.contains("\"score\": 4.50"));
    }
}
