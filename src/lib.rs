//! `luigi` — string templates in the shape of Unix pipes.
//!
//! ```text
//! hello %{name | trim | uc}, you have %{count} message%{count | s}
//! ```
//!
//! A template is scanned once into [`Action`]s; each run looks every
//! directive's key up in a [`Row`] and folds the value through the named
//! filters, left to right.
//!
//! ```rust
//! use luigi::{Cache, Row, Template};
//!
//! let row: Row = [("name".to_string(), "paul".to_string())].into();
//!
//! let t = Template::new("hello %{name | uc}").unwrap();
//! assert_eq!(t.run(&row).unwrap(), "hello PAUL");
//!
//! let cache = Cache::new([("greet", "hi %{name}")]);
//! assert_eq!(cache.run("greet", &row).unwrap(), "hi paul");
//! ```

pub mod action;
pub mod cache;
pub mod error;
pub mod filters;
pub mod parser;
pub mod template;

pub use action::{Action, FilterReference};
pub use cache::Cache;
pub use error::{Error, ErrorKind, Result};
pub use filters::{Filter, FilterRegistry, Row};
pub use parser::{parse, parse_filters};
pub use template::{Sink, Template, render, render_with};
