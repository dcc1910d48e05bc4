//! State codec.
//!
//! Two independent encodings of an `AppState`:
//! - the compact token `lz:<payload>` carried in a URL fragment, where the
//!   payload is the JSON document compressed with raw DEFLATE and encoded
//!   with the URL-safe base64 alphabet (no padding),
//! - the plain, pretty-printed JSON document used for file export/import.

use std::io::{Read, Write};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;

use crate::constants::state::TOKEN_MARKER;
use crate::error::*;
use crate::state::AppState;

/// Encodes the state into a compact, URL-safe token prefixed with `lz:`.
///
/// # Examples
///
/// ```
/// use tmaker::codec::{decode_token, encode_token};
/// use tmaker::state::AppState;
///
/// let state = AppState::default();
/// let token = encode_token(&state).unwrap();
/// assert!(token.starts_with("lz:"));
/// assert_eq!(decode_token(&token).unwrap(), Some(state));
/// ```
pub fn encode_token(state: &AppState) -> Result<String> {
    let json = serde_json::to_string(state)?;
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(json.as_bytes())?;
    let compressed = encoder.finish()?;
    Ok(format!("{}{}", TOKEN_MARKER, URL_SAFE_NO_PAD.encode(compressed)))
}

/// Decodes the state carried by a fragment or a full URL.
///
/// Everything after the first `lz:` is the payload. Returns `Ok(None)` when
/// there is no marker at all, meaning no state was persisted.
///
/// # Errors
///
/// Returns `TokenDecodeError` when the payload cannot be decompressed or does
/// not hold a valid document.
pub fn decode_token(fragment: &str) -> Result<Option<AppState>> {
    let Some(position) = fragment.find(TOKEN_MARKER) else {
        crate::debug!("No state marker found in \"{}\"", fragment);
        return Ok(None);
    };
    let payload = &fragment[position + TOKEN_MARKER.len()..];

    let compressed = URL_SAFE_NO_PAD
        .decode(payload.trim_end())
        .map_err(|e| Error::TokenDecodeError(e.to_string()))?;
    let mut json = String::new();
    DeflateDecoder::new(compressed.as_slice())
        .read_to_string(&mut json)
        .map_err(|e| Error::TokenDecodeError(e.to_string()))?;
    let state = serde_json::from_str(&json).map_err(|e| Error::TokenDecodeError(e.to_string()))?;

    Ok(Some(state))
}

/// State recovered at load time, with the reason it had to fall back (if any)
#[derive(Debug)]
pub struct Restored {
    pub state: AppState,
    pub error: Option<Error>,
}

/// Restores the state from a fragment, never failing.
///
/// A missing marker gives `fallback()` silently, a corrupt token gives
/// `fallback()` together with the decode error.
pub fn restore<F>(fragment: Option<&str>, fallback: F) -> Restored
where
    F: FnOnce() -> AppState,
{
    match fragment.map(decode_token).transpose() {
        Ok(Some(Some(state))) => Restored { state, error: None },
        Ok(_) => Restored {
            state: fallback(),
            error: None,
        },
        Err(e) => {
            crate::debug!("Falling back to a new document: {}", e);
            Restored {
                state: fallback(),
                error: Some(e),
            }
        }
    }
}

/// Serializes the state as a human-readable document (two-space indentation)
pub fn export_document(state: &AppState) -> Result<String> {
    Ok(serde_json::to_string_pretty(state)?)
}

/// Parses and validates an exported document.
///
/// `bucket`, `templates` (with `name` and `code`) and `custom` (`""` or a
/// sequence) must all be present, otherwise the whole document is rejected.
pub fn import_document(text: &str) -> Result<AppState> {
    Ok(serde_json::from_str(text)?)
}
