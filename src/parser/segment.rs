use nom::branch::alt;
use nom::bytes::complete::{tag, take_while1};
use nom::character::complete::{alpha1, char, digit1, satisfy, space0};
use nom::combinator::{cut, map, recognize, success, value};
use nom::error::context;
use nom::multi::{fold_many0, separated_list1};
use nom::sequence::{delimited, pair, preceded, terminated};

use crate::spec::segment::{QuerySegment, QuerySegmentKind, Segment};
use crate::spec::selector::name::Name;
use crate::spec::selector::Selector;

use super::selector::{
    parse_filter_selector, parse_name, parse_script_selector, parse_union_selector,
    parse_wildcard_selector,
};
use super::PResult;

fn is_non_ascii_unicode(chr: char) -> bool {
    chr >= '\u{0080}'
}

fn parse_non_ascii_unicode(input: &str) -> PResult<&str> {
    take_while1(is_non_ascii_unicode)(input)
}

fn parse_name_first(input: &str) -> PResult<&str> {
    alt((
        alpha1,
        recognize(satisfy(|c| c == '_' || c == '$')),
        parse_non_ascii_unicode,
    ))(input)
}

fn parse_name_char(input: &str) -> PResult<&str> {
    alt((digit1, parse_name_first))(input)
}

/// Parse a member name as written after a dot: letters, digits, underscore,
/// dollar sign, or non-ASCII code points; no leading digit
pub(crate) fn parse_member_name(input: &str) -> PResult<String> {
    map(
        recognize(pair(
            parse_name_first,
            fold_many0(parse_name_char, String::new, |mut s, item| {
                s.push_str(item);
                s
            }),
        )),
        |s| s.to_string(),
    )(input)
}

fn name_segment(name: String) -> Segment {
    Segment::Selectors(vec![Selector::Name(Name(name))])
}

/// The property-group sugar `.(a, 'b c', d)`, desugared to a selector list
fn parse_property_group(input: &str) -> PResult<Segment> {
    map(
        delimited(
            pair(char('('), space0),
            separated_list1(
                delimited(space0, char(','), space0),
                alt((parse_member_name, map(parse_name, |n| n.0))),
            ),
            pair(space0, char(')')),
        ),
        |names| {
            Segment::Selectors(
                names
                    .into_iter()
                    .map(|n| Selector::Name(Name(n)))
                    .collect(),
            )
        },
    )(input)
}

fn parse_dot_segment(input: &str) -> PResult<Segment> {
    preceded(
        char('.'),
        alt((
            map(parse_wildcard_selector, |s| Segment::Selectors(vec![s])),
            parse_property_group,
            map(parse_member_name, name_segment),
        )),
    )(input)
}

/// A single wildcard may stand alone in brackets; it is not admissible as a
/// union item
fn parse_sole_wildcard(input: &str) -> PResult<Segment> {
    map(
        terminated(
            parse_wildcard_selector,
            nom::combinator::peek(pair(space0, char(']'))),
        ),
        |s| Segment::Selectors(vec![s]),
    )(input)
}

fn parse_bracket_contents(input: &str) -> PResult<Segment> {
    alt((
        map(parse_filter_selector, |s| Segment::Selectors(vec![s])),
        map(parse_script_selector, |s| Segment::Selectors(vec![s])),
        parse_sole_wildcard,
        map(
            separated_list1(delimited(space0, char(','), space0), parse_union_selector),
            Segment::Selectors,
        ),
    ))(input)
}

pub(crate) fn parse_bracketed_segment(input: &str) -> PResult<Segment> {
    context(
        "bracketed segment",
        preceded(
            pair(char('['), space0),
            cut(terminated(
                parse_bracket_contents,
                pair(space0, char(']')),
            )),
        ),
    )(input)
}

fn parse_type_name(input: &str) -> PResult<String> {
    map(take_while1(|c: char| c.is_ascii_lowercase()), String::from)(input)
}

/// A type-selector segment, `@name()`; the name is checked by the
/// evaluator, not here
fn parse_type_filter(input: &str) -> PResult<Segment> {
    map(
        delimited(char('@'), parse_type_name, tag("()")),
        Segment::TypeFilter,
    )(input)
}

fn parse_child_segment(input: &str) -> PResult<Segment> {
    alt((
        parse_dot_segment,
        parse_bracketed_segment,
        value(Segment::Parent, char('^')),
        value(Segment::Keys, char('~')),
        parse_type_filter,
    ))(input)
}

fn parse_descendant_segment(input: &str) -> PResult<Segment> {
    preceded(
        tag(".."),
        alt((
            parse_dot_segment,
            parse_bracketed_segment,
            map(parse_wildcard_selector, |s| Segment::Selectors(vec![s])),
            map(parse_member_name, name_segment),
            // a bare `..` selects every visited node itself
            success(Segment::Identity),
        )),
    )(input)
}

pub(crate) fn parse_segment(input: &str) -> PResult<QuerySegment> {
    alt((
        map(parse_descendant_segment, |segment| QuerySegment {
            kind: QuerySegmentKind::Descendant,
            segment,
        }),
        map(parse_child_segment, |segment| QuerySegment {
            kind: QuerySegmentKind::Child,
            segment,
        }),
    ))(input)
}

#[cfg(test)]
mod tests {
    use nom::combinator::all_consuming;

    use crate::spec::segment::Segment;
    use crate::spec::selector::index::Index;
    use crate::spec::selector::name::Name;
    use crate::spec::selector::slice::Slice;
    use crate::spec::selector::Selector;

    use super::{
        parse_bracketed_segment, parse_child_segment, parse_descendant_segment, parse_dot_segment,
    };

    #[test]
    fn dot_member_names() {
        assert!(matches!(
            parse_dot_segment(".name"),
            Ok(("", seg)) if seg.as_single_name() == Some("name"),
        ));
        assert!(matches!(
            parse_dot_segment(".foo_bar"),
            Ok(("", seg)) if seg.as_single_name() == Some("foo_bar"),
        ));
        assert!(matches!(
            parse_dot_segment(".$ref"),
            Ok(("", seg)) if seg.as_single_name() == Some("$ref"),
        ));
        assert!(parse_dot_segment(". space").is_err());
        assert!(all_consuming(parse_dot_segment)(".no-dash").is_err());
        assert!(parse_dot_segment(".1no_num_1st").is_err());
    }

    #[test]
    fn property_groups() {
        let (_, seg) = parse_dot_segment(".(a, 'b c', d)").unwrap();
        let s = seg.as_selectors().unwrap();
        assert_eq!(s[0], Selector::Name(Name::from("a")));
        assert_eq!(s[1], Selector::Name(Name::from("b c")));
        assert_eq!(s[2], Selector::Name(Name::from("d")));
    }

    #[test]
    fn bracketed_segments() {
        {
            let (_, sk) = parse_bracketed_segment(r#"["name"]"#).unwrap();
            let s = sk.as_selectors().unwrap();
            assert_eq!(s[0], Selector::Name(Name::from("name")));
        }
        {
            let (_, sk) = parse_bracketed_segment(r#"['name']"#).unwrap();
            let s = sk.as_selectors().unwrap();
            assert_eq!(s[0], Selector::Name(Name::from("name")));
        }
        {
            let (_, sk) = parse_bracketed_segment(r#"["name","test"]"#).unwrap();
            let s = sk.as_selectors().unwrap();
            assert_eq!(s[0], Selector::Name(Name::from("name")));
            assert_eq!(s[1], Selector::Name(Name::from("test")));
        }
        {
            let (_, sk) = parse_bracketed_segment(r#"['name',10,0:3]"#).unwrap();
            let s = sk.as_selectors().unwrap();
            assert_eq!(s[0], Selector::Name(Name::from("name")));
            assert_eq!(s[1], Selector::Index(Index(10)));
            assert_eq!(
                s[2],
                Selector::ArraySlice(Slice::new().with_start(0).with_end(3))
            );
        }
        {
            let (_, sk) = parse_bracketed_segment("[*]").unwrap();
            let s = sk.as_selectors().unwrap();
            assert_eq!(s[0], Selector::Wildcard);
        }
        {
            // wildcards may not appear in unions
            assert!(parse_bracketed_segment("[*,1]").is_err());
        }
        {
            assert!(parse_bracketed_segment("[010]").is_err());
        }
    }

    #[test]
    fn extension_segments() {
        assert!(matches!(
            parse_child_segment("^"),
            Ok(("", Segment::Parent))
        ));
        assert!(matches!(parse_child_segment("~"), Ok(("", Segment::Keys))));
        assert!(matches!(
            parse_child_segment("@number()"),
            Ok(("", Segment::TypeFilter(name))) if name == "number",
        ));
        // unknown names parse; the evaluator rejects them
        assert!(matches!(
            parse_child_segment("@bogus()"),
            Ok(("", Segment::TypeFilter(name))) if name == "bogus",
        ));
    }

    #[test]
    fn descendant_segments() {
        {
            let (_, sk) = parse_descendant_segment("..['name']").unwrap();
            let s = sk.as_selectors().unwrap();
            assert_eq!(s[0], Selector::Name(Name::from("name")));
        }
        {
            let (_, sk) = parse_descendant_segment("..name").unwrap();
            assert_eq!(sk.as_single_name().unwrap(), "name");
        }
        {
            let (_, sk) = parse_descendant_segment("...name").unwrap();
            assert_eq!(sk.as_single_name().unwrap(), "name");
        }
        {
            let (_, sk) = parse_descendant_segment("..*").unwrap();
            let s = sk.as_selectors().unwrap();
            assert_eq!(s[0], Selector::Wildcard);
        }
        {
            let (rest, sk) = parse_descendant_segment("..").unwrap();
            assert_eq!(rest, "");
            assert!(matches!(sk, Segment::Identity));
        }
    }

    #[test]
    fn filters_and_scripts_stand_alone() {
        let (_, sk) = parse_bracketed_segment("[?(@.price < 10)]").unwrap();
        let s = sk.as_selectors().unwrap();
        assert!(matches!(&s[0], Selector::Filter(f) if f.expression() == "(@.price < 10)"));

        let (_, sk) = parse_bracketed_segment("[(@.length-1)]").unwrap();
        let s = sk.as_selectors().unwrap();
        assert!(matches!(&s[0], Selector::Script(sc) if sc.expression() == "@.length-1"));
    }
}
