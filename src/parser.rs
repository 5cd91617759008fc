//! Single-pass scanner for `%{key | filter args...}` templates.
//!
//! Grammar, with `\s` meaning ASCII whitespace:
//!
//! ```text
//! directive := "%{" \s* key ( \s* "|" ( \s* token )+ )* \s* "}"
//! key, token := [^\s|}]+
//! ```
//!
//! Anything that is not a directive is literal text. A `%` that does not open
//! a complete directive is emitted on its own and scanning resumes right after
//! it, so an unterminated `%{` degrades to plain text.

use crate::{
    action::{Action, FilterReference},
    error::Result,
};

/// Whitespace as the directive grammar understands it.
pub(crate) fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0b' | '\x0c' | '\r')
}

fn is_token(c: char) -> bool {
    !is_space(c) && c != '|' && c != '}'
}

/// Parse a (possibly empty) template string into its actions.
pub fn parse(input: &str) -> Result<Vec<Action>> {
    let mut actions = Vec::new();
    let mut rest = input;

    while !rest.is_empty() {
        if !rest.starts_with('%') {
            let end = rest.find('%').unwrap_or(rest.len());
            actions.push(Action::Text(rest[..end].to_owned()));
            rest = &rest[end..];
            continue;
        }

        match match_directive(rest) {
            Some(m) => {
                actions.push(Action::Substitute {
                    key: m.key.to_owned(),
                    chain: parse_filters(m.filters)?,
                });
                rest = &rest[m.len..];
            }
            None => {
                actions.push(Action::Text("%".to_owned()));
                rest = &rest[1..];
            }
        }
    }

    tracing::trace!(actions = actions.len(), "parsed template");
    Ok(actions)
}

/// Parse the filter-chain part of a directive (`| uc | wrap a b`).
///
/// Segments are split on `|`, trimmed, and empty ones skipped, so leading and
/// trailing pipes are harmless.
pub fn parse_filters(chain: &str) -> Result<Vec<FilterReference>> {
    chain
        .split('|')
        .map(|seg| seg.trim_matches(is_space))
        .filter(|seg| !seg.is_empty())
        .map(str::parse)
        .collect()
}

struct DirectiveMatch<'a> {
    key: &'a str,
    filters: &'a str,
    len: usize,
}

/// Try to match a full directive at the start of `s` (which begins with `%`).
fn match_directive(s: &str) -> Option<DirectiveMatch<'_>> {
    let mut pos = s.strip_prefix("%{").map(|_| 2)?;

    pos = skip(s, pos, is_space);
    let key_start = pos;
    pos = skip(s, pos, is_token);
    if pos == key_start {
        return None;
    }
    let key = &s[key_start..pos];

    let filters_start = pos;
    loop {
        let before = pos;
        let at = skip(s, pos, is_space);
        if !s[at..].starts_with('|') {
            break;
        }

        // Each pipe must be followed by at least one token.
        let mut cursor = at + 1;
        let mut tokens = 0;
        loop {
            let start = skip(s, cursor, is_space);
            let end = skip(s, start, is_token);
            if end == start {
                break;
            }
            cursor = end;
            tokens += 1;
        }

        if tokens == 0 {
            pos = before;
            break;
        }
        pos = cursor;
    }
    let filters = &s[filters_start..pos];

    pos = skip(s, pos, is_space);
    if !s[pos..].starts_with('}') {
        return None;
    }

    Some(DirectiveMatch {
        key,
        filters,
        len: pos + 1,
    })
}

/// Advance from byte offset `pos` past every char matching `pred`.
fn skip(s: &str, pos: usize, pred: fn(char) -> bool) -> usize {
    s[pos..]
        .char_indices()
        .find(|&(_, c)| !pred(c))
        .map_or(s.len(), |(i, _)| pos + i)
}
