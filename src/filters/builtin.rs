//! Default filter set.
//!
//! | name | effect |
//! |------|--------|
//! | `uc` | upper-case |
//! | `lc` | lower-case |
//! | `h` | HTML-escape; bytes outside printable ASCII become `&#N;` |
//! | `u` | percent-encode, keeping RFC 3986 unreserved chars, space → `+` |
//! | `trim` | strip surrounding whitespace |
//! | `length` | character count |
//! | `s` | `""` when the value is `1`, otherwise `"s"` |
//! | `null` | discard the value |
//! | `json` | encode as a JSON string literal |
//!
//! `h` and `u` accept an optional charset argument (`%{v | h utf-8}`). Values
//! are always UTF-8, so any other charset is rejected with a filter error.

use super::{FilterRegistry, Row};
use crate::{error::Error, error::Result, parser::is_space};
use std::fmt::Write;

pub(super) fn registry() -> FilterRegistry {
    FilterRegistry::new()
        .with("uc", uc)
        .with("lc", lc)
        .with("h", h)
        .with("u", u)
        .with("trim", trim)
        .with("length", length)
        .with("s", s)
        .with("null", null)
        .with("json", json)
}

pub fn uc(value: &str, _: &[String], _: &Row) -> Result<String> {
    Ok(value.to_uppercase())
}

pub fn lc(value: &str, _: &[String], _: &Row) -> Result<String> {
    Ok(value.to_lowercase())
}

/// Checks the optional charset argument of the byte-wise filters.
fn expect_utf8(filter: &str, args: &[String]) -> Result<()> {
    match args {
        [] => Ok(()),
        [cs] if cs.eq_ignore_ascii_case("utf-8") || cs.eq_ignore_ascii_case("utf8") => Ok(()),
        [cs] => Err(Error::filter(format!("{filter}: unsupported charset {cs:?}"))),
        _ => Err(Error::filter(format!("{filter}: expected at most one argument"))),
    }
}

/// HTML-escape, byte by byte over the UTF-8 encoding.
pub fn h(value: &str, args: &[String], _: &Row) -> Result<String> {
    expect_utf8("h", args)?;
    let mut out = String::with_capacity(value.len());
    for b in value.bytes() {
        match b {
            b'&' => out.push_str("&amp;"),
            b'<' => out.push_str("&lt;"),
            b'>' => out.push_str("&gt;"),
            b'\'' => out.push_str("&apos;"),
            b'"' => out.push_str("&quot;"),
            32..=126 => out.push(char::from(b)),
            _ => {
                let _ = write!(out, "&#{b};");
            }
        }
    }
    Ok(out)
}

pub fn u(value: &str, args: &[String], _: &Row) -> Result<String> {
    expect_utf8("u", args)?;
    Ok(urlencoding::encode(value).replace("%20", "+"))
}

pub fn trim(value: &str, _: &[String], _: &Row) -> Result<String> {
    Ok(value.trim_matches(is_space).to_owned())
}

pub fn length(value: &str, _: &[String], _: &Row) -> Result<String> {
    Ok(value.chars().count().to_string())
}

/// Pluralizing suffix.
pub fn s(value: &str, _: &[String], _: &Row) -> Result<String> {
    let n: i64 = value
        .parse()
        .map_err(|_| Error::filter(format!("s: not an integer: {value:?}")))?;
    Ok(if n == 1 { "" } else { "s" }.to_owned())
}

pub fn null(_: &str, _: &[String], _: &Row) -> Result<String> {
    Ok(String::new())
}

pub fn json(value: &str, _: &[String], _: &Row) -> Result<String> {
    serde_json::to_string(value).map_err(|e| Error::filter(format!("json: {e}")))
}
