//! Parsed template actions and their evaluation.

use crate::{
    error::{Error, Result},
    filters::{FilterRegistry, Row},
    parser::is_space,
};
use std::{borrow::Cow, fmt, str::FromStr};

/// One step of a filter chain: `name arg1 arg2 ...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterReference {
    pub name: String,
    pub args: Vec<String>,
}

impl FilterReference {
    pub fn new(name: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}

impl FromStr for FilterReference {
    type Err = Error;

    /// Split a single segment on whitespace into name and arguments.
    ///
    /// Empty segments and segments carrying a `|` or `}` are rejected.
    fn from_str(segment: &str) -> Result<Self> {
        if segment.contains(['|', '}']) {
            return Err(Error::MalformedFilter(segment.to_owned()));
        }

        let mut tokens = segment.split(is_space).filter(|t| !t.is_empty());
        let name = tokens
            .next()
            .ok_or_else(|| Error::MalformedFilter(segment.to_owned()))?;

        Ok(Self::new(name, tokens.map(str::to_owned).collect()))
    }
}

impl fmt::Display for FilterReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// A single unit of template output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Literal text emitted verbatim.
    Text(String),
    /// `%{key | f args | g}`: look up `key`, then fold the chain over it.
    Substitute {
        key: String,
        chain: Vec<FilterReference>,
    },
}

impl Action {
    /// Produce this action's contribution to the output.
    ///
    /// Filters are resolved by name here, not at parse time, and every filter
    /// sees the whole row.
    pub fn evaluate<'a>(&'a self, filters: &FilterRegistry, row: &Row) -> Result<Cow<'a, str>> {
        match self {
            Self::Text(literal) => Ok(Cow::Borrowed(literal.as_str())),
            Self::Substitute { key, chain } => {
                let seed = row
                    .get(key)
                    .ok_or_else(|| Error::UnknownKey(key.clone()))?;

                chain
                    .iter()
                    .try_fold(seed.clone(), |value, step| {
                        let filter = filters
                            .get(&step.name)
                            .ok_or_else(|| Error::UnknownFilter(step.name.clone()))?;
                        filter(&value, step.args.as_slice(), row)
                    })
                    .map(Cow::Owned)
            }
        }
    }
}

impl fmt::Display for Action {
    /// Renders the action back as template source.
    ///
    /// Whitespace inside the original directive is normalised.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(literal) => f.write_str(literal),
            Self::Substitute { key, chain } => {
                write!(f, "%{{{key}")?;
                for step in chain {
                    write!(f, " | {step}")?;
                }
                f.write_str("}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn row(pairs: &[(&str, &str)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>()
    }

    fn substitute(key: &str, chain: &[&str]) -> Action {
        Action::Substitute {
            key: key.into(),
            chain: chain.iter().map(|s| s.parse().unwrap()).collect(),
        }
    }

    #[test]
    fn text_is_borrowed_verbatim() {
        let action = Action::Text("hello ".into());
        let out = action.evaluate(&FilterRegistry::new(), &Row::new()).unwrap();
        assert!(matches!(out, Cow::Borrowed("hello ")));
    }

    #[test]
    fn substitute_without_chain_is_the_row_value() {
        let action = substitute("name", &[]);
        let out = action
            .evaluate(&FilterRegistry::new(), &row(&[("name", "paul")]))
            .unwrap();
        assert_eq!(out, "paul");
    }

    #[test]
    fn chain_folds_left_to_right() {
        let filters = FilterRegistry::new()
            .with("first3", |v: &str, _: &[String], _: &Row| {
                Ok(v.chars().take(3).collect())
            })
            .with("dup", |v: &str, _: &[String], _: &Row| Ok(format!("{v}{v}")));
        let r = row(&[("x", "aB")]);

        let action_a = substitute("x", &["dup", "first3"]);
        let action_b = substitute("x", &["first3", "dup"]);
        let a = action_a.evaluate(&filters, &r).unwrap();
        let b = action_b.evaluate(&filters, &r).unwrap();
        assert_eq!(a, "aBa");
        assert_eq!(b, "aBaB");
    }

    #[test]
    fn filters_see_args_and_whole_row() {
        let filters = FilterRegistry::new().with("join", |v: &str, args: &[String], row: &Row| {
            Ok(format!("{v}{}{}", args.join(","), row["other"]))
        });
        let action = substitute("x", &["join a b"]);
        let out = action
            .evaluate(&filters, &row(&[("x", "1"), ("other", "!")]))
            .unwrap();
        assert_eq!(out, "1a,b!");
    }

    #[test]
    fn missing_key_fails_before_filters() {
        let err = substitute("missing", &["nope"])
            .evaluate(&FilterRegistry::new(), &Row::new())
            .unwrap_err();
        assert!(matches!(err, Error::UnknownKey(k) if k == "missing"));
    }

    #[test]
    fn missing_filter_is_reported_by_name() {
        let err = substitute("bar", &["nope"])
            .evaluate(&FilterRegistry::new(), &row(&[("bar", "x")]))
            .unwrap_err();
        assert!(matches!(err, Error::UnknownFilter(n) if n == "nope"));
    }

    #[test]
    fn filter_errors_propagate_unchanged() {
        let filters = FilterRegistry::new()
            .with("fail", |_: &str, _: &[String], _: &Row| Err(Error::filter("no")));
        let err = substitute("x", &["fail"])
            .evaluate(&filters, &row(&[("x", "1")]))
            .unwrap_err();
        assert!(matches!(err, Error::Filter(m) if m == "no"));
    }

    #[test]
    fn filter_reference_from_segment() {
        let f: FilterReference = "wrap  a\tb ".parse().unwrap();
        assert_eq!(f, FilterReference::new("wrap", vec!["a".into(), "b".into()]));
        assert_eq!(f.to_string(), "wrap a b");
    }

    #[test]
    fn malformed_segments_are_rejected() {
        for bad in ["", "   ", "a|b", "x}"] {
            let err = bad.parse::<FilterReference>().unwrap_err();
            assert!(matches!(err, Error::MalformedFilter(_)), "{bad:?}");
        }
    }

    #[test]
    fn display_renders_directive_source() {
        assert_eq!(substitute("k", &[]).to_string(), "%{k}");
        assert_eq!(substitute("k", &["uc", "wrap x"]).to_string(), "%{k | uc | wrap x}");
    }
}
