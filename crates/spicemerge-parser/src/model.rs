//! `.model` directive parsing and serialization.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;

use crate::error::{Error, Result};

const DIRECTIVE: &str = ".model";

/// Kind tag of models defined relative to another model (`ako:BASE ...`).
const AKO: &str = "ako";

/// A parsed `.model` directive.
///
/// Parameters are keyed by their upper-cased name and hold the verbatim token
/// (`Rs=.568`, or a bare flag). Keys keep the position of their first
/// occurrence; a repeated key overwrites the earlier token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    name: String,
    kind: String,
    params: IndexMap<String, String>,
}

impl Model {
    /// Parse a single normalized line.
    ///
    /// Lines that are not well-formed `.model` directives are rejected with
    /// [`Error::InvalidModelLine`]; callers normally just skip them.
    pub fn parse(line: &str) -> Result<Self> {
        let rest =
            strip_directive(line).ok_or_else(|| invalid("line is not a .model directive"))?;

        let def = rest.trim();
        let split = def
            .find([' ', '('])
            .ok_or_else(|| invalid("no separator after model name"))?;

        // Trailing underscores are version suffixes added when merging.
        let name = latin1_uppercase(&def[..split])
            .trim_end_matches('_')
            .to_owned();
        if name.is_empty() {
            return Err(invalid("empty model name"));
        }

        let def = def[split..].trim();
        let split = def
            .find([' ', '(', ':'])
            .ok_or_else(|| invalid("no delimiter after model kind"))?;
        let kind = def[..split].to_owned();

        let body = clean_body(&def[split..]);
        let mut params = IndexMap::new();
        for token in body.split(' ').filter(|token| !token.is_empty()) {
            let key = token.split_once('=').map_or(token, |(key, _)| key);
            params.insert(latin1_uppercase(key), token.to_owned());
        }

        Ok(Self { name, kind, params })
    }

    /// Upper-cased model name without version underscores.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Device kind tag, as written in the source.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Look up the verbatim token of a parameter (case-insensitive key).
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(&latin1_uppercase(key)).map(String::as_str)
    }

    /// Whether a parameter key is defined (case-insensitive key).
    pub fn has_param(&self, key: &str) -> bool {
        self.params.contains_key(&latin1_uppercase(key))
    }

    /// `(KEY, token)` pairs in definition order.
    pub fn params(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params
            .iter()
            .map(|(key, token)| (key.as_str(), token.as_str()))
    }

    pub fn num_params(&self) -> usize {
        self.params.len()
    }

    pub fn is_ako(&self) -> bool {
        self.kind.eq_ignore_ascii_case(AKO)
    }

    /// The definition that follows the model name on a `.model` line.
    ///
    /// Regular models wrap their parameters in parentheses. `ako` models are
    /// written bare so `ako:BASE` stays intact.
    pub fn definition(&self) -> String {
        let tokens = self
            .params
            .values()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ");

        if self.is_ako() {
            let sep = if tokens.is_empty() || tokens.starts_with(':') {
                ""
            } else {
                " "
            };
            format!("{}{}{}", self.kind, sep, tokens)
        } else {
            format!("{}({})", self.kind, tokens)
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", DIRECTIVE, self.name, self.definition())
    }
}

impl FromStr for Model {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Upper-case `text` without leaving the Latin-1 range.
///
/// Characters whose upper case is outside Latin-1 or spans several characters
/// (`µ`, `ÿ`, `ß`) are kept as they are.
pub fn latin1_uppercase(text: &str) -> String {
    text.chars()
        .map(|c| {
            let mut upper = c.to_uppercase();
            match (upper.next(), upper.next()) {
                (Some(u), None) if u32::from(u) <= 0xff => u,
                _ => c,
            }
        })
        .collect()
}

fn invalid(reason: &'static str) -> Error {
    Error::InvalidModelLine { reason }
}

/// Remove a case-insensitive `.model` keyword followed by a space.
fn strip_directive(line: &str) -> Option<&str> {
    let keyword = line.get(..DIRECTIVE.len())?;
    let rest = &line[DIRECTIVE.len()..];
    (keyword.eq_ignore_ascii_case(DIRECTIVE) && rest.starts_with(' '))
        .then_some(rest)
}

/// Reduce a definition body to single-space separated `KEY=value` tokens.
fn clean_body(body: &str) -> String {
    let body: String = body
        .chars()
        .map(|c| match c {
            '(' | ')' | ',' => ' ',
            c => c,
        })
        .collect();

    let mut body = replace_until_stable(body, "  ", " ");
    loop {
        let next = body
            .replace(" =", "=")
            .replace("= ", "=")
            .replace(" :", ":")
            .replace(": ", ":");
        if next == body {
            return body;
        }
        body = next;
    }
}

fn replace_until_stable(mut data: String, from: &str, to: &str) -> String {
    while data.contains(from) {
        data = data.replace(from, to);
    }
    data
}
