//! Load named template sources from a TOML file.
//!
//! ```toml
//! greet = "hello %{name}"
//! card = [
//!   "name: %{name | uc}\n",
//!   "city: %{city}\n",
//! ]
//! ```
//!
//! Array values are concatenated with no separator.

use anyhow::{Context, Result, bail};
use std::{collections::HashMap, fs, path::Path};

pub fn load(path: &Path) -> Result<HashMap<String, String>> {
    let src = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse(&src).with_context(|| format!("parse {}", path.display()))
}

fn parse(src: &str) -> Result<HashMap<String, String>> {
    let table: toml::Table = toml::from_str(src)?;
    let mut sources = HashMap::with_capacity(table.len());

    for (key, value) in table {
        let body = match value {
            toml::Value::String(s) => s,
            toml::Value::Array(parts) => parts
                .iter()
                .map(|p| match p {
                    toml::Value::String(s) => Ok(s.as_str()),
                    other => bail!("template {key:?}: expected string parts, got {}", other.type_str()),
                })
                .collect::<Result<String>>()?,
            other => bail!(
                "template {key:?}: expected a string or array of strings, got {}",
                other.type_str()
            ),
        };
        sources.insert(key, body);
    }

    Ok(sources)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strings_and_arrays() {
        let sources = parse("a = \"x%{y}\"\nb = [\"one \", \"two\"]\n").unwrap();
        assert_eq!(sources["a"], "x%{y}");
        assert_eq!(sources["b"], "one two");
    }

    #[test]
    fn rejects_other_types() {
        assert!(parse("a = 1").is_err());
        assert!(parse("a = [\"x\", 2]").is_err());
    }
}
