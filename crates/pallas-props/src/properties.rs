//! The property-map context and its `.properties` text form.

use std::collections::{btree_map, BTreeMap, HashMap};
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::error::{PropertyError, PropertyResult};

const WHITESPACE: [char; 3] = [' ', '\t', '\x0c'];

/// An ordered map of string keys to string values.
///
/// This is the context type for property extractors and injectors. Values
/// are always stored as text; typed access goes through
/// [`PropertyValue`](crate::PropertyValue).
///
/// # Example
///
/// ```
/// use pallas_props::Properties;
///
/// let props = Properties::parse("env = DEV\nendDate: 2021-04-19\n").unwrap();
/// assert_eq!(props.get("env"), Some("DEV"));
/// assert_eq!(props.get("endDate"), Some("2021-04-19"));
/// ```
///
/// Serializes as a flat string map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties {
    entries: BTreeMap<String, String>,
}

impl Properties {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the raw value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Stores `value` under `key`, returning the previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    /// Removes `key`, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Finds a key equal to `key` ignoring ASCII case.
    pub fn find_key_ignore_case(&self, key: &str) -> Option<&str> {
        self.entries
            .keys()
            .find(|candidate| candidate.eq_ignore_ascii_case(key))
            .map(String::as_str)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Copies every entry of `other` into `self`, replacing existing keys.
    pub fn merge(&mut self, other: Properties) {
        self.entries.extend(other.entries);
    }

    /// Returns the underlying map.
    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.entries
    }

    /// Parses `.properties` text.
    ///
    /// Supports `#` and `!` comments, `=`, `:` or whitespace separators,
    /// backslash line continuation and the escapes `\t`, `\n`, `\r`, `\f`,
    /// `\uXXXX` and `\<char>`. A repeated key keeps its last value.
    pub fn parse(text: &str) -> PropertyResult<Self> {
        let mut props = Self::new();
        let mut lines = text.lines().enumerate();

        while let Some((index, line)) = lines.next() {
            let trimmed = line.trim_start_matches(WHITESPACE);
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
                continue;
            }

            let mut logical = trimmed.to_string();
            while continues(&logical) {
                logical.pop();
                match lines.next() {
                    Some((_, next)) => logical.push_str(next.trim_start_matches(WHITESPACE)),
                    None => break,
                }
            }

            let line_number = index + 1;
            let (key, value) = split_entry(&logical);
            props.set(unescape(key, line_number)?, unescape(value, line_number)?);
        }

        Ok(props)
    }

    /// Renders the map as `.properties` text, one `key=value` line per entry.
    ///
    /// The output parses back to an equal map.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.entries {
            escape_into(&mut out, key, true);
            out.push('=');
            escape_into(&mut out, value, false);
            out.push('\n');
        }
        out
    }
}

// A line continues if it ends with an odd number of backslashes.
fn continues(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

fn split_entry(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut end = line.len();
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' | ' ' | '\t' | '\x0c' => {
                end = i;
                break;
            }
            _ => {}
        }
    }

    let rest = line[end..].trim_start_matches(WHITESPACE);
    let rest = rest.strip_prefix(['=', ':']).unwrap_or(rest);
    (&line[..end], rest.trim_start_matches(WHITESPACE))
}

fn unescape(raw: &str, line: usize) -> PropertyResult<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => {
                let unit = read_code_unit(&mut chars, line)?;
                out.push(decode_code_unit(unit, &mut chars, line)?);
            }
            Some(other) => out.push(other),
            None => {}
        }
    }

    Ok(out)
}

fn read_code_unit(chars: &mut std::str::Chars<'_>, line: usize) -> PropertyResult<u16> {
    let hex: String = chars.by_ref().take(4).collect();
    if hex.len() != 4 {
        return Err(PropertyError::syntax(line, format!("truncated \\u escape: \\u{hex}")));
    }
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(PropertyError::syntax(line, format!("invalid \\u escape: \\u{hex}")));
    }
    u16::from_str_radix(&hex, 16)
        .map_err(|_| PropertyError::syntax(line, format!("invalid \\u escape: \\u{hex}")))
}

fn decode_code_unit(
    unit: u16,
    chars: &mut std::str::Chars<'_>,
    line: usize,
) -> PropertyResult<char> {
    if !(0xD800..0xDC00).contains(&unit) {
        return char::from_u32(u32::from(unit))
            .ok_or_else(|| PropertyError::syntax(line, format!("unpaired surrogate \\u{unit:04X}")));
    }

    // A high surrogate must be followed by an escaped low surrogate.
    if chars.next() != Some('\\') || chars.next() != Some('u') {
        return Err(PropertyError::syntax(line, format!("unpaired surrogate \\u{unit:04X}")));
    }
    let low = read_code_unit(chars, line)?;
    char::decode_utf16([unit, low])
        .next()
        .and_then(Result::ok)
        .ok_or_else(|| PropertyError::syntax(line, format!("unpaired surrogate \\u{unit:04X}")))
}

fn escape_into(out: &mut String, text: &str, is_key: bool) {
    for (i, c) in text.chars().enumerate() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\x0c' => out.push_str("\\f"),
            '=' | ':' | '#' | '!' => {
                out.push('\\');
                out.push(c);
            }
            ' ' if is_key || i == 0 => out.push_str("\\ "),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04X}", u32::from(c));
            }
            c => out.push(c),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut props = Self::new();
        props.extend(iter);
        props
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for Properties {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}

impl From<BTreeMap<String, String>> for Properties {
    fn from(entries: BTreeMap<String, String>) -> Self {
        Self { entries }
    }
}

impl From<HashMap<String, String>> for Properties {
    fn from(entries: HashMap<String, String>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Properties {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for Properties {
    type Item = (String, String);
    type IntoIter = btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
