//! Text encoding detection and strict decoding.
//!
//! Detection looks at the whole file at once. The strategies run in a fixed
//! priority order and the first match wins:
//!
//! 1. byte-order mark
//! 2. BOM-less UTF-16LE (ASCII text stored as 16-bit little-endian units)
//! 3. structural UTF-8 validation
//! 4. trial decoding as ISO-8859-1, UTF-8, then UTF-7
//!
//! Decoding never substitutes replacement characters: malformed input is an
//! error for the whole file.

use std::fmt;

use encoding_rs::{UTF_8, UTF_16BE, UTF_16LE};

use crate::error::{Error, Result};

/// Text encodings a model library file may be stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextEncoding {
    Utf7,
    Utf8,
    Utf16Le,
    Utf16Be,
    /// Big-endian UTF-32, the only byte order reachable through its BOM.
    Utf32,
    Latin1,
    Ascii,
    /// Nothing matched. Decoding with this value fails.
    Unknown,
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TextEncoding::Utf7 => "UTF-7",
            TextEncoding::Utf8 => "UTF-8",
            TextEncoding::Utf16Le => "UTF-16LE",
            TextEncoding::Utf16Be => "UTF-16BE",
            TextEncoding::Utf32 => "UTF-32",
            TextEncoding::Latin1 => "ISO-8859-1",
            TextEncoding::Ascii => "US-ASCII",
            TextEncoding::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Encodings tried, in order, once the structural checks have failed.
const TRIAL_ORDER: [TextEncoding; 3] = [
    TextEncoding::Latin1,
    TextEncoding::Utf8,
    TextEncoding::Utf7,
];

/// Guess the encoding of a complete file.
///
/// Returns `None` when every strategy fails. Callers fall back to
/// [`TextEncoding::Ascii`], see [`detect_or_default`].
pub fn detect(bytes: &[u8]) -> Option<TextEncoding> {
    if let Some(encoding) = detect_bom(bytes) {
        return Some(encoding);
    }

    if is_utf16le(bytes) {
        return Some(TextEncoding::Utf16Le);
    }

    // The structural check admits overlong and surrogate forms that strict
    // decoding refuses; those fall through to the trial decodes.
    if is_utf8(bytes) && decode(bytes, TextEncoding::Utf8).is_ok() {
        return Some(TextEncoding::Utf8);
    }

    TRIAL_ORDER
        .into_iter()
        .find(|&encoding| decode(bytes, encoding).is_ok())
}

/// [`detect`], falling back to 7-bit ASCII.
pub fn detect_or_default(bytes: &[u8]) -> TextEncoding {
    detect(bytes).unwrap_or(TextEncoding::Ascii)
}

/// Match the leading bytes against known byte-order marks.
///
/// Buffers shorter than four bytes are never classified here.
fn detect_bom(bytes: &[u8]) -> Option<TextEncoding> {
    if bytes.len() < 4 {
        return None;
    }

    match bytes {
        [0x2b, 0x2f, 0x76, ..] => Some(TextEncoding::Utf7),
        [0xef, 0xbb, 0xbf, ..] => Some(TextEncoding::Utf8),
        [0xff, 0xfe, ..] => Some(TextEncoding::Utf16Le),
        [0xfe, 0xff, ..] => Some(TextEncoding::Utf16Be),
        [0x00, 0x00, 0xfe, 0xff, ..] => Some(TextEncoding::Utf32),
        _ => None,
    }
}

/// BOM-less UTF-16LE heuristic.
///
/// ASCII text stored as little-endian 16-bit units has a zero high byte in
/// (almost) every odd position and (almost) never a zero in the even ones.
fn is_utf16le(bytes: &[u8]) -> bool {
    if bytes.len() % 2 != 0 {
        return false;
    }

    let units = bytes.len() / 2;
    let (even_zeros, odd_zeros) = bytes
        .chunks_exact(2)
        .fold((0usize, 0usize), |(even, odd), unit| {
            (even + usize::from(unit[0] == 0), odd + usize::from(unit[1] == 0))
        });

    let threshold = units / 10;
    even_zeros < threshold && odd_zeros > units - threshold
}

/// Structural UTF-8 check.
///
/// Only the lead/continuation byte shape is validated; a sequence cut off at
/// the end of the buffer makes the whole buffer invalid.
fn is_utf8(bytes: &[u8]) -> bool {
    let mut pending = 0u32;

    for &byte in bytes {
        if pending == 0 {
            if byte >= 0x80 {
                let run = byte.leading_ones();
                if !(2..=6).contains(&run) {
                    return false;
                }
                pending = run - 1;
            }
        } else {
            if byte & 0xc0 != 0x80 {
                return false;
            }
            pending -= 1;
        }
    }

    pending == 0
}

/// Decode `bytes` as `encoding` without any replacement characters.
///
/// A leading byte-order mark is dropped from the result.
pub fn decode(bytes: &[u8], encoding: TextEncoding) -> Result<String> {
    let decoded = match encoding {
        TextEncoding::Utf8 => strict(UTF_8, bytes),
        TextEncoding::Utf16Le => strict(UTF_16LE, bytes),
        TextEncoding::Utf16Be => strict(UTF_16BE, bytes),
        TextEncoding::Utf32 => decode_utf32be(bytes),
        TextEncoding::Utf7 => decode_utf7(bytes),
        TextEncoding::Latin1 => Some(bytes.iter().copied().map(char::from).collect()),
        TextEncoding::Ascii => bytes
            .is_ascii()
            .then(|| bytes.iter().copied().map(char::from).collect()),
        TextEncoding::Unknown => return Err(Error::EncodingUndetected),
    };

    let text = decoded.ok_or(Error::Malformed { encoding })?;
    Ok(match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_owned(),
        None => text,
    })
}

fn strict(encoding: &'static encoding_rs::Encoding, bytes: &[u8]) -> Option<String> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
}

fn decode_utf32be(bytes: &[u8]) -> Option<String> {
    if bytes.len() % 4 != 0 {
        return None;
    }

    bytes
        .chunks_exact(4)
        .map(|unit| char::from_u32(u32::from_be_bytes([unit[0], unit[1], unit[2], unit[3]])))
        .collect()
}

/// RFC 2152 UTF-7.
///
/// Printable ASCII passes through directly. `+` opens a modified-base64 run of
/// UTF-16 units that ends at the first non-base64 byte (an ending `-` is
/// absorbed), and `+-` stands for a literal plus sign.
fn decode_utf7(bytes: &[u8]) -> Option<String> {
    let mut out = String::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        let byte = bytes[i];
        if !byte.is_ascii() {
            return None;
        }
        i += 1;

        if byte != b'+' {
            out.push(char::from(byte));
            continue;
        }

        if bytes.get(i) == Some(&b'-') {
            out.push('+');
            i += 1;
            continue;
        }

        let mut units = Vec::new();
        let mut bits = 0u32;
        let mut width = 0u32;
        while let Some(value) = bytes.get(i).copied().and_then(base64_value) {
            bits = (bits << 6) | value;
            width += 6;
            if width >= 16 {
                width -= 16;
                units.push((bits >> width) as u16);
                bits &= (1 << width) - 1;
            }
            i += 1;
        }

        // Only zero padding may be left over once the run closes.
        if width >= 6 || bits != 0 {
            return None;
        }
        if bytes.get(i) == Some(&b'-') {
            i += 1;
        }

        for c in char::decode_utf16(units) {
            out.push(c.ok()?);
        }
    }

    Some(out)
}

fn base64_value(byte: u8) -> Option<u32> {
    let value = match byte {
        b'A'..=b'Z' => byte - b'A',
        b'a'..=b'z' => byte - b'a' + 26,
        b'0'..=b'9' => byte - b'0' + 52,
        b'+' => 62,
        b'/' => 63,
        _ => return None,
    };
    Some(u32::from(value))
}
