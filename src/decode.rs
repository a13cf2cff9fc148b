//! Extracts a single textual body from a message's MIME part tree.

use crate::error::DecodeError;
use crate::gmail::{MessagePart, RawMessage};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

const HTML: &str = "text/html";
const PLAIN: &str = "text/plain";

/// Returns the message body and whether it is HTML.
///
/// Multi-part messages are scanned in document order: the first
/// `text/html` part wins outright, otherwise the first `text/plain` part
/// is used. Single-body messages are decoded directly. A message without
/// decodable content yields an empty plain-text body.
pub fn decode(message: &RawMessage) -> Result<(String, bool), DecodeError> {
    let payload = match &message.payload {
        Some(payload) => payload,
        None => return Ok((String::new(), false)),
    };
    if payload.parts.is_empty() {
        return match part_data(payload) {
            Some(data) => Ok((decode_data(data)?, false)),
            None => Ok((String::new(), false)),
        };
    }
    let mut plain = None;
    if let Some(html) = scan_parts(&payload.parts, &mut plain) {
        return Ok((decode_data(html)?, true));
    }
    match plain {
        Some(data) => Ok((decode_data(data)?, false)),
        None => Ok((String::new(), false)),
    }
}

/// Depth-first scan for the first `text/html` part, remembering the first
/// `text/plain` part seen on the way. The textual leaves of
/// multipart/alternative messages sit below container parts.
fn scan_parts<'a>(parts: &'a [MessagePart], plain: &mut Option<&'a str>) -> Option<&'a str> {
    for part in parts {
        if part.mime_type.eq_ignore_ascii_case(HTML) {
            if let Some(data) = part_data(part) {
                return Some(data);
            }
        } else if part.mime_type.eq_ignore_ascii_case(PLAIN) && plain.is_none() {
            *plain = part_data(part);
        }
        if let Some(data) = scan_parts(&part.parts, plain) {
            return Some(data);
        }
    }
    None
}

fn part_data(part: &MessagePart) -> Option<&str> {
    part.body.as_ref().and_then(|body| body.data.as_deref())
}

/// Reverses the base64url transport encoding into UTF-8 text. The service
/// emits unpadded base64url; padding is stripped so both variants decode.
fn decode_data(data: &str) -> Result<String, DecodeError> {
    let bytes = URL_SAFE_NO_PAD.decode(data.trim_end_matches('='))?;
    Ok(String::from_utf8(bytes)?)
}
