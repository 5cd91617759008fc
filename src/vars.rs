//! Build a template [`Row`] from TOML files and `key=value` overrides.

use anyhow::{Context, Result, bail};
use luigi::Row;
use std::{fs, path::Path};

/// Merge every TOML file in order, then apply `--set` overrides.
pub fn build_row(files: &[impl AsRef<Path>], overrides: &[String]) -> Result<Row> {
    let mut row = Row::new();

    for file in files {
        let file = file.as_ref();
        let src = fs::read_to_string(file).with_context(|| format!("read {}", file.display()))?;
        let table: toml::Value =
            toml::from_str(&src).with_context(|| format!("parse {}", file.display()))?;
        flatten("", &table, &mut row);
    }

    for pair in overrides {
        let (key, value) = parse_override(pair)?;
        row.insert(key.to_owned(), value.to_owned());
    }

    Ok(row)
}

/// Split `key=value`; the value may itself contain `=`.
fn parse_override(pair: &str) -> Result<(&str, &str)> {
    let Some((key, value)) = pair.split_once('=') else {
        bail!("expected key=value, got {pair:?}");
    };
    let key = key.trim();
    if key.is_empty() {
        bail!("empty key in {pair:?}");
    }
    Ok((key, value))
}

/// Insert every scalar under `value` into the row, naming nested keys by
/// joining table names with `_` so directives can reach them as one key.
fn flatten(prefix: &str, value: &toml::Value, out: &mut Row) {
    let text = match value {
        toml::Value::Table(map) => {
            for (k, v) in map {
                match prefix {
                    "" => flatten(k, v, out),
                    _ => flatten(&format!("{prefix}_{k}"), v, out),
                }
            }
            return;
        }
        toml::Value::String(s) => s.clone(),
        toml::Value::Integer(i) => i.to_string(),
        toml::Value::Float(f) => f.to_string(),
        toml::Value::Boolean(b) => b.to_string(),
        // No directive can address an array element or a datetime.
        toml::Value::Array(_) | toml::Value::Datetime(_) => return,
    };
    out.insert(prefix.to_owned(), text);
}
