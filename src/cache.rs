//! Keyed template sources with parse-once memoisation.

use crate::{
    error::{Error, Result},
    filters::{FilterRegistry, Row},
    template::{Sink, Template},
};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

/// Lazily parses and keeps one [`Template`] per source key.
///
/// A key moves from unparsed to cached on its first successful [`get`](Self::get)
/// and stays there; nothing is ever evicted. A source that fails to parse is
/// not cached, so the next lookup parses it again.
#[derive(Debug)]
pub struct Cache {
    sources: HashMap<String, String>,
    filters: Arc<FilterRegistry>,
    parsed: Mutex<HashMap<String, Arc<Template>>>,
}

impl Cache {
    /// Cache over `sources` using the builtin filters.
    pub fn new<I, K, V>(sources: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::with_filters(sources, FilterRegistry::builtin())
    }

    pub fn with_filters<I, K, V>(sources: I, filters: Arc<FilterRegistry>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            sources: sources
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            filters,
            parsed: Mutex::new(HashMap::new()),
        }
    }

    /// Fetch the template for `key`, parsing it on first use.
    ///
    /// The parse runs under the cache lock, so concurrent callers asking for
    /// the same key all receive the one instance.
    pub fn get(&self, key: &str) -> Result<Arc<Template>> {
        let mut parsed = self.parsed.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(template) = parsed.get(key) {
            return Ok(Arc::clone(template));
        }

        let source = self
            .sources
            .get(key)
            .ok_or_else(|| Error::UnknownTemplate(key.to_owned()))?;

        tracing::debug!(key, "parsing template");
        let template = Arc::new(Template::with_filters(
            source.as_str(),
            Arc::clone(&self.filters),
        )?);
        parsed.insert(key.to_owned(), Arc::clone(&template));
        Ok(template)
    }

    pub fn run(&self, key: &str, row: &Row) -> Result<String> {
        self.get(key)?.run(row)
    }

    pub fn run_to<S: Sink + ?Sized>(&self, key: &str, row: &Row, sink: &mut S) -> Result<()> {
        self.get(key)?.run_to(row, sink)
    }

    /// Whether a source exists for `key`. Never triggers a parse.
    pub fn contains_key(&self, key: &str) -> bool {
        self.sources.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Number of keys parsed so far.
    pub fn parsed_len(&self) -> usize {
        self.parsed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
