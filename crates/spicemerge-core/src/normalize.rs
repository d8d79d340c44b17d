//! Canonical text form for model libraries.
//!
//! The passes below run in a fixed order and each one is applied until the
//! text stops changing. The result is Latin-1 text with single spaces, `\n`
//! line endings, no blank lines, no `+` continuation lines, and exactly one
//! trailing newline.

use crate::encoding::{self, TextEncoding};
use crate::error::{Error, Result};

/// Decode `bytes` and normalize the resulting text.
///
/// Fails if the bytes are malformed for `encoding` or contain a character
/// outside Latin-1.
pub fn normalize(bytes: &[u8], encoding: TextEncoding) -> Result<String> {
    let text = encoding::decode(bytes, encoding)?;
    ensure_latin1(&text)?;
    Ok(normalize_text(&text))
}

/// Run the whitespace and line passes on already-decoded text.
pub fn normalize_text(text: &str) -> String {
    let mut data = text.replace('\t', " ");
    data = collapse_spaces(data);

    data = data.replace("\r\n", "\n").replace('\r', "\n");
    data = strip_line_spaces(data);
    data = replace_until_stable(data, "\n\n", "\n");

    // SPICE continuation: a line starting with `+` extends the previous one.
    data = data.replace("\n+", " ");
    data = collapse_spaces(data);
    data = strip_line_spaces(data);

    if !data.is_empty() && !data.ends_with('\n') {
        data.push('\n');
        data = replace_until_stable(data, " \n", "\n");
    }

    data
}

/// Encode normalized text as Latin-1 bytes.
pub fn encode_latin1(text: &str) -> Result<Vec<u8>> {
    text.char_indices()
        .map(|(offset, c)| {
            u8::try_from(u32::from(c)).map_err(|_| Error::UnmappableCharacter {
                code_point: u32::from(c),
                offset,
            })
        })
        .collect()
}

fn ensure_latin1(text: &str) -> Result<()> {
    match text.char_indices().find(|&(_, c)| u32::from(c) > 0xff) {
        Some((offset, c)) => Err(Error::UnmappableCharacter {
            code_point: u32::from(c),
            offset,
        }),
        None => Ok(()),
    }
}

fn collapse_spaces(data: String) -> String {
    replace_until_stable(data, "  ", " ")
}

fn strip_line_spaces(data: String) -> String {
    let data = replace_until_stable(data, " \n", "\n");
    replace_until_stable(data, "\n ", "\n")
}

fn replace_until_stable(mut data: String, from: &str, to: &str) -> String {
    while data.contains(from) {
        data = data.replace(from, to);
    }
    data
}
