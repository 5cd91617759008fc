//! Named filter functions applied in directive chains.

pub mod builtin;

use crate::error::Result;
use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, LazyLock},
};

/// Argument mapping supplied to every template run.
pub type Row = HashMap<String, String>;

/// A filter: `(value, args, row) -> value`.
pub type Filter = dyn Fn(&str, &[String], &Row) -> Result<String> + Send + Sync;

static BUILTIN: LazyLock<Arc<FilterRegistry>> =
    LazyLock::new(|| Arc::new(builtin::registry()));

/// Mapping from filter name to filter function.
///
/// Templates look filters up by name on every run, so a registry is only
/// consulted, never bound, at parse time.
#[derive(Clone, Default)]
pub struct FilterRegistry {
    filters: HashMap<String, Arc<Filter>>,
}

impl FilterRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide default set, built once on first use.
    pub fn builtin() -> Arc<Self> {
        Arc::clone(&BUILTIN)
    }

    /// An owned copy of the default set, for deriving a registry with
    /// overrides or extra filters.
    pub fn with_builtins() -> Self {
        (**BUILTIN).clone()
    }

    /// Add or replace a filter.
    pub fn register<F>(&mut self, name: impl Into<String>, filter: F) -> &mut Self
    where
        F: Fn(&str, &[String], &Row) -> Result<String> + Send + Sync + 'static,
    {
        self.filters.insert(name.into(), Arc::new(filter));
        self
    }

    /// Builder form of [`register`](Self::register).
    pub fn with<F>(mut self, name: impl Into<String>, filter: F) -> Self
    where
        F: Fn(&str, &[String], &Row) -> Result<String> + Send + Sync + 'static,
    {
        self.register(name, filter);
        self
    }

    /// Copy every filter of `other` into `self`; `other` wins on name clashes.
    pub fn extend(&mut self, other: &FilterRegistry) {
        self.filters.extend(
            other
                .filters
                .iter()
                .map(|(k, v)| (k.clone(), Arc::clone(v))),
        );
    }

    pub fn get(&self, name: &str) -> Option<&Filter> {
        self.filters.get(name).map(|f| f.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.filters.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.filters.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}
