#![forbid(unsafe_code)]

//! JSON-RPC request parsing plus the dual stdio framings (newline-delimited
//! JSON, and `Content-Length:`-prefixed frames) adapted from `bm_mcp`'s
//! `entry::framing` module. Framing mode is auto-detected once per process
//! from the first line of input, never mixed mid-stream.

use serde::Deserialize;
use serde_json::{Value, json};
use std::io::{BufRead, Write};

#[derive(Debug, Deserialize)]
pub(crate) struct JsonRpcRequest {
    #[serde(default, rename = "jsonrpc")]
    pub(crate) _jsonrpc: Option<String>,
    pub(crate) method: String,
    #[serde(default)]
    pub(crate) id: Option<Value>,
    #[serde(default)]
    pub(crate) params: Option<Value>,
}

pub(crate) fn json_rpc_response(id: Option<Value>, result: Value) -> Value {
    json!({ "jsonrpc": "2.0", "id": id, "result": result })
}

pub(crate) fn json_rpc_error(id: Option<Value>, code: i64, message: &str) -> Value {
    json!({ "jsonrpc": "2.0", "id": id, "error": { "code": code, "message": message } })
}

pub(crate) fn tool_text_content(payload: &Value) -> Value {
    json!({
        "type": "text",
        "text": serde_json::to_string(payload).unwrap_or_else(|_| "null".to_string()),
    })
}

pub(crate) fn parse_request(body: &[u8]) -> Result<JsonRpcRequest, Value> {
    let data: Value = serde_json::from_slice(body)
        .map_err(|err| json_rpc_error(None, -32700, &format!("Parse error: {err}")))?;

    let (id, has_method) = match data.as_object() {
        Some(obj) => (obj.get("id").cloned(), obj.contains_key("method")),
        None => return Err(json_rpc_error(None, -32600, "Invalid Request")),
    };
    if !has_method {
        return Err(json_rpc_error(id, -32600, "Invalid Request"));
    }

    serde_json::from_value::<JsonRpcRequest>(data)
        .map_err(|err| json_rpc_error(id, -32600, &format!("Invalid Request: {err}")))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TransportMode {
    NewlineJson,
    ContentLength,
}

pub(crate) fn detect_mode_from_first_line(line: &str) -> Option<TransportMode> {
    let trimmed = line.trim_start();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return Some(TransportMode::NewlineJson);
    }
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("content-length:") || lower.starts_with("content-type:") {
        return Some(TransportMode::ContentLength);
    }
    None
}

fn parse_content_length_header(line: &str) -> Option<usize> {
    let trimmed = line.trim();
    let (key, value) = trimmed.split_once(':')?;
    if !key.trim().eq_ignore_ascii_case("content-length") {
        return None;
    }
    value.trim().parse::<usize>().ok()
}

const MAX_CONTENT_LENGTH_BYTES: usize = 16 * 1024 * 1024;

pub(crate) fn read_content_length_frame<R: BufRead>(
    reader: &mut R,
    mut first_header: Option<String>,
) -> std::io::Result<Option<Vec<u8>>> {
    let mut header = String::new();
    if let Some(seed) = first_header.take() {
        header = seed;
    } else {
        let read = reader.read_line(&mut header)?;
        if read == 0 {
            return Ok(None);
        }
    }

    let mut content_length = parse_content_length_header(&header);

    loop {
        let trimmed = header.trim_end();
        if trimmed.is_empty() {
            break;
        }
        header.clear();
        let read = reader.read_line(&mut header)?;
        if read == 0 {
            return Ok(None);
        }
        if content_length.is_none() {
            content_length = parse_content_length_header(&header);
        }
    }

    let Some(len) = content_length else {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "Missing Content-Length header",
        ));
    };
    if len > MAX_CONTENT_LENGTH_BYTES {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "Content-Length exceeds max allowed size",
        ));
    }

    let mut body = vec![0u8; len];
    reader.read_exact(&mut body)?;
    Ok(Some(body))
}

pub(crate) fn write_newline_json<W: Write>(
    writer: &mut W,
    resp: &Value,
) -> std::io::Result<()> {
    writeln!(writer, "{}", serde_json::to_string(resp)?)?;
    writer.flush()
}

pub(crate) fn write_content_length_json<W: Write>(
    writer: &mut W,
    resp: &Value,
) -> std::io::Result<()> {
    let body = serde_json::to_vec(resp)?;
    write!(writer, "Content-Length: {}\r\n\r\n", body.len())?;
    writer.write_all(&body)?;
    writer.flush()
}
