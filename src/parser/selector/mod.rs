use nom::branch::alt;
use nom::character::complete::char;
use nom::combinator::map;
use nom::error::context;
use nom::sequence::{pair, preceded, terminated};

use crate::spec::selector::filter::FilterSelector;
use crate::spec::selector::index::Index;
use crate::spec::selector::name::Name;
use crate::spec::selector::script::ScriptSelector;
use crate::spec::selector::Selector;

use self::slice::parse_array_slice;

use super::primitive::int::parse_int;
use super::primitive::string::parse_string_literal;
use super::utils::{take_until_bracket_end, take_until_paren_close};
use super::PResult;

pub(crate) mod filter;
pub(crate) mod function;
pub(crate) mod slice;

#[cfg_attr(feature = "trace", tracing::instrument(level = "trace", parent = None, ret, err))]
pub(crate) fn parse_wildcard_selector(input: &str) -> PResult<Selector> {
    map(char('*'), |_| Selector::Wildcard)(input)
}

#[cfg_attr(feature = "trace", tracing::instrument(level = "trace", parent = None, ret, err))]
pub(crate) fn parse_name(input: &str) -> PResult<Name> {
    map(parse_string_literal, Name)(input)
}

#[cfg_attr(feature = "trace", tracing::instrument(level = "trace", parent = None, ret, err))]
fn parse_name_selector(input: &str) -> PResult<Selector> {
    map(parse_name, Selector::Name)(input)
}

#[cfg_attr(feature = "trace", tracing::instrument(level = "trace", parent = None, ret, err))]
fn parse_index_selector(input: &str) -> PResult<Selector> {
    map(map(parse_int, Index), Selector::Index)(input)
}

#[cfg_attr(feature = "trace", tracing::instrument(level = "trace", parent = None, ret, err))]
fn parse_array_slice_selector(input: &str) -> PResult<Selector> {
    map(parse_array_slice, Selector::ArraySlice)(input)
}

/// Parse a selector admissible inside a bracketed union: a quoted name, a
/// slice, or an index
///
/// Wildcards, filters, and scripts must stand alone in their brackets and
/// are handled by the bracketed-segment parser.
#[cfg_attr(feature = "trace", tracing::instrument(level = "trace", parent = None, ret, err))]
pub(crate) fn parse_union_selector(input: &str) -> PResult<Selector> {
    context(
        "selector",
        alt((
            parse_name_selector,
            parse_array_slice_selector,
            parse_index_selector,
        )),
    )(input)
}

/// Parse a filter selector, carving the raw expression text out of the
/// source; the expression is compiled lazily, on first use
#[cfg_attr(feature = "trace", tracing::instrument(level = "trace", parent = None, ret, err))]
pub(crate) fn parse_filter_selector(input: &str) -> PResult<Selector> {
    context(
        "filter selector",
        map(
            preceded(pair(char('?'), nom::character::complete::space0), take_until_bracket_end),
            |raw| Selector::Filter(FilterSelector::new(raw.trim_end())),
        ),
    )(input)
}

/// Parse a script selector, carving the raw expression text out of the
/// parentheses; evaluation is delegated to the host
#[cfg_attr(feature = "trace", tracing::instrument(level = "trace", parent = None, ret, err))]
pub(crate) fn parse_script_selector(input: &str) -> PResult<Selector> {
    context(
        "script selector",
        map(
            terminated(preceded(char('('), take_until_paren_close), char(')')),
            |raw| Selector::Script(ScriptSelector::new(raw.trim())),
        ),
    )(input)
}

#[cfg(test)]
mod tests {
    use crate::spec::selector::index::Index;
    use crate::spec::selector::name::Name;
    use crate::spec::selector::slice::Slice;
    use crate::spec::selector::Selector;

    use super::{parse_filter_selector, parse_script_selector, parse_union_selector};

    #[test]
    fn union_selectors() {
        {
            let (_, s) = parse_union_selector("0").unwrap();
            assert_eq!(s, Selector::Index(Index(0)));
        }
        {
            let (_, s) = parse_union_selector("-10").unwrap();
            assert_eq!(s, Selector::Index(Index(-10)));
        }
        {
            let (_, s) = parse_union_selector("'name'").unwrap();
            assert_eq!(s, Selector::Name(Name(String::from("name"))));
        }
        {
            let (_, s) = parse_union_selector("\"name\"").unwrap();
            assert_eq!(s, Selector::Name(Name(String::from("name"))));
        }
        {
            let (_, s) = parse_union_selector("0:3").unwrap();
            assert_eq!(
                s,
                Selector::ArraySlice(Slice::new().with_start(0).with_end(3))
            );
        }
    }

    #[test]
    fn filter_selector_keeps_raw_text() {
        let (rest, s) = parse_filter_selector("?(@.price < 10)]").unwrap();
        assert_eq!(rest, "]");
        assert!(matches!(
            s,
            Selector::Filter(f) if f.expression() == "(@.price < 10)"
        ));
    }

    #[test]
    fn script_selector_keeps_raw_text() {
        let (rest, s) = parse_script_selector("(@.length-1)]").unwrap();
        assert_eq!(rest, "]");
        assert!(matches!(
            s,
            Selector::Script(sc) if sc.expression() == "@.length-1"
        ));
    }
}
