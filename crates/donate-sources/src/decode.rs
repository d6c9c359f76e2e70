//! Byte decoding and JSON parsing of uploads

use donate_core::{Error, Result};
use serde::Deserialize;
use serde_json::Value;
use std::borrow::Cow;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Decode upload bytes as UTF-8.
///
/// A leading byte-order mark is dropped. Invalid sequences become U+FFFD
/// instead of failing the upload.
pub fn decode_upload(bytes: &[u8]) -> Cow<'_, str> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    String::from_utf8_lossy(bytes)
}

/// Parse a whole JSON document, falling back to newline-delimited JSON.
///
/// In the fallback every non-blank line must hold one JSON value; the
/// values are collected into an array. Nesting deeper than `max_depth`
/// fails with `Error::DepthLimitExceeded` before anything is parsed.
pub fn parse_document(text: &str, max_depth: usize) -> Result<Value> {
    let whole_err = match parse_json(text, max_depth) {
        Ok(value) => return Ok(value),
        Err(Error::Parse(msg)) => msg,
        Err(e) => return Err(e),
    };

    tracing::debug!(error = %whole_err, "not a single JSON document, trying JSON lines");

    let mut items = Vec::new();
    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_json(line, max_depth) {
            Ok(item) => items.push(item),
            // Not JSON lines either; the whole-document error points at the real problem
            Err(Error::Parse(_)) if items.is_empty() => return Err(Error::Parse(whole_err)),
            Err(Error::Parse(msg)) => {
                return Err(Error::Parse(format!("line {}: {}", index + 1, msg)));
            }
            Err(e) => return Err(e),
        }
    }

    tracing::debug!(lines = items.len(), "parsed JSON lines");
    Ok(Value::Array(items))
}

/// One JSON value; serde_json's own recursion limit is replaced by `max_depth`
fn parse_json(text: &str, max_depth: usize) -> Result<Value> {
    check_nesting(text, max_depth)?;

    let mut de = serde_json::Deserializer::from_str(text);
    de.disable_recursion_limit();
    let value = Value::deserialize(&mut de).map_err(|e| Error::Parse(e.to_string()))?;
    de.end().map_err(|e| Error::Parse(e.to_string()))?;
    Ok(value)
}

/// Reject text whose arrays and objects nest deeper than `max_depth`
fn check_nesting(text: &str, max_depth: usize) -> Result<()> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for b in text.bytes() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'[' | b'{' => {
                depth += 1;
                if depth > max_depth {
                    return Err(Error::DepthLimitExceeded { limit: max_depth });
                }
            }
            b']' | b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use donate_core::DEFAULT_MAX_DEPTH;
    use serde_json::json;

    fn parse(text: &str) -> Result<Value> {
        parse_document(text, DEFAULT_MAX_DEPTH)
    }

    #[test]
    fn test_bom_is_stripped() {
        let bytes = b"\xEF\xBB\xBF{\"a\": 1}";
        assert_eq!(decode_upload(bytes), "{\"a\": 1}");
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let bytes = b"{\"a\": \"\xFF\"}";
        let text = decode_upload(bytes);
        assert_eq!(text, "{\"a\": \"\u{FFFD}\"}");
        assert_eq!(parse(&text).unwrap(), json!({"a": "\u{FFFD}"}));
    }

    #[test]
    fn test_whole_document() {
        let value = parse("{\n  \"user\": {\"name\": \"x\"}\n}").unwrap();
        assert_eq!(value, json!({"user": {"name": "x"}}));
    }

    #[test]
    fn test_json_lines_fallback() {
        let text = "{\"id\": 1}\n\n   \n{\"id\": 2}\r\n[3]\n";
        let value = parse(text).unwrap();
        assert_eq!(value, json!([{"id": 1}, {"id": 2}, [3]]));
    }

    #[test]
    fn test_json_lines_error_names_line() {
        let err = parse("{\"id\": 1}\n{broken\n").unwrap_err();
        match err {
            Error::Parse(msg) => assert!(msg.starts_with("line 2:"), "{}", msg),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_malformed_document_reports_whole_document_error() {
        let err = parse("{\n \"a\": 1,\n \"b\": 2,\n}").unwrap_err();
        match err {
            Error::Parse(msg) => {
                assert!(!msg.starts_with("line 1:"), "{}", msg);
                assert!(msg.contains("line 4"), "{}", msg);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_nesting_beyond_parser_default() {
        let text = format!("{}{}", "[".repeat(200), "]".repeat(200));
        let value = parse(&text).unwrap();
        assert!(value.is_array());
    }

    #[test]
    fn test_nesting_limit() {
        let text = format!("{}{}", "[".repeat(4), "]".repeat(4));
        assert!(parse_document(&text, 4).is_ok());
        assert!(matches!(
            parse_document(&text, 3),
            Err(Error::DepthLimitExceeded { limit: 3 })
        ));
    }

    #[test]
    fn test_brackets_inside_strings_do_not_nest() {
        let value = parse_document(r#"{"a": "[[[{{{\"]]]"}"#, 1).unwrap();
        assert_eq!(value, json!({"a": "[[[{{{\"]]]"}));
    }

    #[test]
    fn test_empty_upload_is_empty_array() {
        assert_eq!(parse("  \n").unwrap(), json!([]));
    }
}
