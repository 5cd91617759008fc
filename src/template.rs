//! Parsed templates and the sinks they can stream into.

use crate::{
    action::Action,
    error::{Error, Result},
    filters::{FilterRegistry, Row},
    parser,
};
use std::{fmt, io, str::FromStr, sync::Arc};

/// Receiver for streamed template output, one chunk per action.
pub trait Sink {
    fn append(&mut self, chunk: &str);
}

impl Sink for String {
    fn append(&mut self, chunk: &str) {
        self.push_str(chunk);
    }
}

impl Sink for Vec<String> {
    fn append(&mut self, chunk: &str) {
        self.push(chunk.to_owned());
    }
}

impl<F: FnMut(&str)> Sink for F {
    fn append(&mut self, chunk: &str) {
        self(chunk)
    }
}

/// A template parsed once and runnable against any number of rows.
#[derive(Debug, Clone)]
pub struct Template {
    source: String,
    actions: Vec<Action>,
    filters: Arc<FilterRegistry>,
}

impl Template {
    /// Parse `source` against the builtin filter set.
    pub fn new(source: impl Into<String>) -> Result<Self> {
        Self::with_filters(source, FilterRegistry::builtin())
    }

    pub fn with_filters(source: impl Into<String>, filters: Arc<FilterRegistry>) -> Result<Self> {
        let source = source.into();
        let actions = parser::parse(&source)?;
        Ok(Self {
            source,
            actions,
            filters,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn filters(&self) -> &Arc<FilterRegistry> {
        &self.filters
    }

    /// Expand the whole template into one string. Fails on the first error
    /// without returning partial output.
    pub fn run(&self, row: &Row) -> Result<String> {
        let mut out = String::with_capacity(self.source.len());
        for action in &self.actions {
            out.push_str(&action.evaluate(&self.filters, row)?);
        }
        Ok(out)
    }

    /// Stream each action's output into `sink` in order.
    ///
    /// Stops at the first failing action; chunks already appended stay there.
    pub fn run_to<S: Sink + ?Sized>(&self, row: &Row, sink: &mut S) -> Result<()> {
        for action in &self.actions {
            sink.append(&action.evaluate(&self.filters, row)?);
        }
        Ok(())
    }

    /// Stream into a writer. Same partial-output contract as [`run_to`](Self::run_to).
    pub fn write_to<W: io::Write + ?Sized>(&self, row: &Row, out: &mut W) -> Result<()> {
        for action in &self.actions {
            out.write_all(action.evaluate(&self.filters, row)?.as_bytes())?;
        }
        out.flush().map_err(Error::from)
    }

    /// Row keys referenced by the template, first use first, without repeats.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::new();
        for action in &self.actions {
            if let Action::Substitute { key, .. } = action {
                if !keys.contains(&key.as_str()) {
                    keys.push(key);
                }
            }
        }
        keys
    }

    /// Filter names referenced by the template, first use first, without repeats.
    pub fn filter_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        let chains = self.actions.iter().filter_map(|a| match a {
            Action::Substitute { chain, .. } => Some(chain),
            Action::Text(_) => None,
        });
        for step in chains.flatten() {
            if !names.contains(&step.name.as_str()) {
                names.push(&step.name);
            }
        }
        names
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl FromStr for Template {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

/// Parse and run `source` once with the builtin filters.
pub fn render(source: &str, row: &Row) -> Result<String> {
    Template::new(source)?.run(row)
}

/// Parse and run `source` once with `filters`.
pub fn render_with(source: &str, row: &Row, filters: Arc<FilterRegistry>) -> Result<String> {
    Template::with_filters(source, filters)?.run(row)
}
