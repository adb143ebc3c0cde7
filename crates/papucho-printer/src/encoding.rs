//! Windows-1252 encoding for thermal printers
//!
//! POS-80 class printers in Western locales ship with code page 16
//! (WPC1252) selected by `ESC t 16`. Ticket text is UTF-8 in memory and is
//! converted here, one character at a time, so an unmappable character
//! costs exactly one `?` and never shifts the fixed-width columns.

use encoding_rs::WINDOWS_1252;

/// Byte printed for characters the code page cannot represent.
pub const REPLACEMENT: u8 = b'?';

/// Encodes UTF-8 text as Windows-1252.
///
/// ASCII passes through unchanged; `á`, `ñ`, `°` and friends map to their
/// single-byte codes; anything else becomes [`REPLACEMENT`].
pub fn encode_cp1252(text: &str) -> Vec<u8> {
    if text.is_ascii() {
        return text.as_bytes().to_vec();
    }
    text.chars()
        .map(|c| encode_char(c).unwrap_or(REPLACEMENT))
        .collect()
}

fn encode_char(c: char) -> Option<u8> {
    if c.is_ascii() {
        return Some(c as u8);
    }
    let mut scratch = [0u8; 4];
    let (bytes, _, had_errors) = WINDOWS_1252.encode(c.encode_utf8(&mut scratch));
    match (had_errors, bytes.as_ref()) {
        (false, [byte]) => Some(*byte),
        _ => None,
    }
}

/// Decodes Windows-1252 bytes back to a `String` (previews and tests).
pub fn decode_cp1252(bytes: &[u8]) -> String {
    let (text, _, _) = WINDOWS_1252.decode(bytes);
    text.into_owned()
}

/// True when every character of `text` prints as itself.
pub fn is_printable(text: &str) -> bool {
    text.chars().all(|c| encode_char(c).is_some())
}
