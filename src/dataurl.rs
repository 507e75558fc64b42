// src/dataurl.rs
//! Inline file content encoding
//!
//! Machine configs embed file contents as data URLs:
//! `data:[<mediatype>][;base64],<payload>`. The plain form carries a
//! percent-escaped payload; the `;base64` form carries a standard-alphabet
//! base64 payload. A file entry with no source at all is an empty file.

use crate::error::{Error, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

/// Decode an optional encoded-content string into raw bytes.
///
/// `None` means the entry has no inline source and decodes to an empty
/// byte vector.
pub fn decode(source: Option<&str>) -> Result<Vec<u8>> {
    let Some(source) = source else {
        return Ok(Vec::new());
    };

    let rest = source
        .strip_prefix("data:")
        .ok_or_else(|| Error::Decode(format!("unrecognized scheme: {}", scheme_of(source))))?;

    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| Error::Decode("missing ',' payload separator".to_string()))?;

    if header.split(';').any(|param| param == "base64") {
        BASE64
            .decode(payload)
            .map_err(|e| Error::Decode(format!("invalid base64 payload: {}", e)))
    } else {
        validate_percent_escapes(payload)?;
        Ok(urlencoding::decode_binary(payload.as_bytes()).into_owned())
    }
}

/// Encode raw bytes as a plain (percent-escaped) data URL.
pub fn encode(data: &[u8]) -> String {
    format!("data:,{}", urlencoding::encode_binary(data))
}

/// Encode raw bytes as a base64 data URL.
pub fn encode_base64(data: &[u8]) -> String {
    format!("data:;base64,{}", BASE64.encode(data))
}

/// Everything up to the first ':' (or the whole string if there is none),
/// for error messages.
fn scheme_of(source: &str) -> &str {
    source.split(':').next().unwrap_or(source)
}

/// Reject payloads with malformed percent escapes before decoding.
///
/// `decode_binary` passes broken escapes through untouched, which would
/// silently corrupt file contents.
fn validate_percent_escapes(payload: &str) -> Result<()> {
    let bytes = payload.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            if i + 2 >= bytes.len()
                || !bytes[i + 1].is_ascii_hexdigit()
                || !bytes[i + 2].is_ascii_hexdigit()
            {
                return Err(Error::Decode(format!(
                    "invalid percent escape at offset {}",
                    i
                )));
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    Ok(())
}
