//! End-to-end runs through the public API.

use luigi::{Cache, ErrorKind, FilterRegistry, Row, Template, render, render_with};
use std::sync::Arc;

fn row(pairs: &[(&str, &str)]) -> Row {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn basic() {
    let out = render("test basic: hello %{name}", &row(&[("name", "paul")])).unwrap();
    assert_eq!(out, "test basic: hello paul");
}

#[test]
fn uppercase_filter() {
    assert_eq!(render("%{name | uc}", &row(&[("name", "paul")])).unwrap(), "PAUL");
}

#[test]
fn custom_filter_followed_by_builtins() {
    let filters = FilterRegistry::with_builtins()
        .with("custom", |_: &str, _: &[String], _: &Row| Ok("custom".to_owned()));
    let out = render_with(
        "%{name | custom | uc | lc}",
        &row(&[("name", "paul")]),
        Arc::new(filters),
    )
    .unwrap();
    assert_eq!(out, "custom");
}

#[test]
fn several_keys() {
    let out = render("foo%{bar}%{baz}", &row(&[("bar", "foo"), ("baz", "bar")])).unwrap();
    assert_eq!(out, "foofoobar");
}

#[test]
fn html_escape() {
    let out = render("%{v | h}", &row(&[("v", "<>&\"'\u{000f}")])).unwrap();
    assert_eq!(out, "&lt;&gt;&amp;&quot;&apos;&#15;");
}

#[test]
fn pluralize_with_sibling_key() {
    let t = Template::new("%{n} item%{n | s}").unwrap();
    assert_eq!(t.run(&row(&[("n", "1")])).unwrap(), "1 item");
    assert_eq!(t.run(&row(&[("n", "3")])).unwrap(), "3 items");
}

#[test]
fn filter_reads_other_row_keys() {
    let filters = FilterRegistry::new().with("greet", |v: &str, _: &[String], row: &Row| {
        Ok(format!("{} {v}", row.get("greeting").map_or("hi", String::as_str)))
    });
    let out = render_with(
        "%{name | greet}",
        &row(&[("name", "paul"), ("greeting", "hello")]),
        Arc::new(filters),
    )
    .unwrap();
    assert_eq!(out, "hello paul");
}

#[test]
fn whitespace_variants_agree() {
    let r = row(&[("bar", "x")]);
    for src in ["%{bar}", "%{ bar }", "%{bar }", "%{\nbar\n}"] {
        assert_eq!(render(src, &r).unwrap(), "x", "{src:?}");
    }
}

#[test]
fn unknown_key() {
    let err = render("foo%{missing}", &Row::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownKey);
    assert_eq!(err.name(), Some("missing"));
}

#[test]
fn unknown_filter() {
    let err = render("foo%{bar|nope}", &row(&[("bar", "x")])).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownFilter);
    assert_eq!(err.name(), Some("nope"));
}

#[test]
fn unknown_template() {
    let cache = Cache::new([("foo", "foo%{bar}foo")]);
    let err = cache.run("absent-key", &row(&[("bar", "foo")])).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownTemplate);
    assert_eq!(err.name(), Some("absent-key"));
}

#[test]
fn unterminated_directive_is_literal() {
    assert_eq!(render("50% off %{sale", &Row::new()).unwrap(), "50% off %{sale");
}

#[test]
fn cache_returns_same_instance() {
    let cache = Cache::new([("t", "%{a}")]);
    let a = cache.get("t").unwrap();
    for _ in 0..3 {
        cache.run("t", &row(&[("a", "1")])).unwrap();
    }
    assert!(Arc::ptr_eq(&a, &cache.get("t").unwrap()));
    assert_eq!(cache.parsed_len(), 1);
}
