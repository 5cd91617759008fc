//! Property-based tests for parsing and expansion.

use luigi::{Row, Template, parse, render};
use proptest::prelude::*;

// Literal text that can never contain a directive opener.
fn literal() -> impl Strategy<Value = String> {
    "[^%]{0,40}(%([^{%][^%]{0,10})?){0,3}"
}

fn space() -> impl Strategy<Value = String> {
    "[ \t\r\n]{0,3}"
}

proptest! {
    /// Templates without directives expand to themselves.
    #[test]
    fn literal_round_trip(src in literal()) {
        prop_assert_eq!(render(&src, &Row::new()).unwrap(), src);
    }

    /// Parsing twice gives identical actions.
    #[test]
    fn parse_is_idempotent(src in ".{0,60}") {
        prop_assert_eq!(parse(&src).unwrap(), parse(&src).unwrap());
    }

    /// Arbitrary input never fails to parse and every action is accounted for.
    #[test]
    fn arbitrary_input_parses(src in ".{0,60}") {
        let t = Template::new(src.as_str()).unwrap();
        prop_assert_eq!(t.source(), src.as_str());
    }

    /// Padding around the key and pipes does not change the result.
    #[test]
    fn whitespace_is_insignificant(
        value in "[a-zA-Z ]{0,20}",
        a in space(), b in space(), c in space(), d in space(),
    ) {
        let row: Row = [("bar".to_string(), value)].into();
        let tight = render("%{bar|uc|trim}", &row).unwrap();
        let loose = render(&format!("%{{{a}bar{b}|{c}uc{d}| trim{a}}}"), &row).unwrap();
        prop_assert_eq!(tight, loose);
    }
}
