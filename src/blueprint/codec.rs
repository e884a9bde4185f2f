//! Blueprint interchange text: `'0' || base64(zlib(json))`.
//!
//! The byte-level functions are exact inverses of each other; the document-level ones add
//! JSON (de)serialization on top.

use std::io::{Read as _, Write as _};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;

use crate::{
    blueprint::model::BlueprintDocument,
    foundation::error::{LampreelError, LampreelResult},
};

/// Version marker prefixed to every blueprint string.
pub const VERSION_MARKER: char = '0';

/// Compress and armor raw document bytes.
pub fn encode_bytes(json: &[u8]) -> LampreelResult<String> {
    let mut enc = ZlibEncoder::new(Vec::new(), Compression::best());
    enc.write_all(json)
        .map_err(|e| LampreelError::codec(format!("deflate failed: {e}")))?;
    let compressed = enc
        .finish()
        .map_err(|e| LampreelError::codec(format!("deflate failed: {e}")))?;

    let mut out = String::with_capacity(1 + compressed.len().div_ceil(3) * 4);
    out.push(VERSION_MARKER);
    STANDARD.encode_string(&compressed, &mut out);
    Ok(out)
}

/// Strip the marker, then base64-decode and inflate.
///
/// Surrounding whitespace (a trailing newline from a pasted string) is ignored.
pub fn decode_bytes(text: &str) -> LampreelResult<Vec<u8>> {
    let text = text.trim();
    let body = text.strip_prefix(VERSION_MARKER).ok_or_else(|| {
        match text.chars().next() {
            Some(c) => LampreelError::codec(format!("unsupported version marker '{c}'")),
            None => LampreelError::codec("empty blueprint string"),
        }
    })?;

    let compressed = STANDARD
        .decode(body)
        .map_err(|e| LampreelError::codec(format!("invalid base64: {e}")))?;
    let mut json = Vec::new();
    ZlibDecoder::new(compressed.as_slice())
        .read_to_end(&mut json)
        .map_err(|e| LampreelError::codec(format!("invalid deflate stream: {e}")))?;
    Ok(json)
}

pub fn encode(doc: &BlueprintDocument) -> LampreelResult<String> {
    let json = serde_json::to_vec(doc).map_err(|e| LampreelError::serde(e.to_string()))?;
    encode_bytes(&json)
}

pub fn decode(text: &str) -> LampreelResult<BlueprintDocument> {
    let json = decode_bytes(text)?;
    serde_json::from_slice(&json).map_err(|e| LampreelError::serde(e.to_string()))
}

/// Decode any blueprint string, including ones this crate did not generate.
pub fn decode_value(text: &str) -> LampreelResult<serde_json::Value> {
    let json = decode_bytes(text)?;
    serde_json::from_slice(&json).map_err(|e| LampreelError::serde(e.to_string()))
}

#[cfg(test)]
#[path = "../../tests/unit/blueprint/codec.rs"]
mod tests;
