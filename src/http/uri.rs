//! Percent-encoding for stored asset names
//!
//! Extensions come from clients, so a stored name may hold spaces or
//! non-ASCII text. Incoming request paths are decoded before lookup and
//! redirect targets are encoded before they go into `Location`.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use std::borrow::Cow;

/// Bytes escaped in a `Location` path. `/` stays literal; `%` is escaped so
/// the decoded request path maps back to the exact stored name.
const LOCATION_PATH: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Decode one path segment; `None` when the bytes are not UTF-8
pub fn decode_segment(segment: &str) -> Option<Cow<'_, str>> {
    percent_decode_str(segment).decode_utf8().ok()
}

/// Encode a public URL path for use as a header value
pub fn encode_location(path: &str) -> String {
    utf8_percent_encode(path, LOCATION_PATH).to_string()
}
