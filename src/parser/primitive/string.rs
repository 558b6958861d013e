use nom::bytes::complete::{tag, take_while, take_while_m_n};
use nom::character::complete::char;
use nom::combinator::{cut, map, value, verify};
use nom::error::{context, ErrorKind, ParseError, VerboseError};
use nom::multi::fold_many0;
use nom::sequence::{delimited, preceded};
use nom::branch::alt;

use crate::parser::PResult;

#[derive(Debug, Copy, Clone)]
enum Quotes {
    Single,
    Double,
}

impl Quotes {
    fn char(&self) -> char {
        match self {
            Quotes::Single => '\'',
            Quotes::Double => '"',
        }
    }
}

#[cfg_attr(feature = "trace", tracing::instrument(level = "trace", parent = None, ret, err))]
fn parse_hex4(input: &str) -> PResult<u16> {
    let (rest, hex) = take_while_m_n(4, 4, |c: char| c.is_ascii_hexdigit())(input)?;
    match u16::from_str_radix(hex, 16) {
        Ok(u) => Ok((rest, u)),
        Err(_) => Err(nom::Err::Error(VerboseError::from_error_kind(
            input,
            ErrorKind::HexDigit,
        ))),
    }
}

/// Parse the hex payload of a `\uXXXX` escape, pairing UTF-16 surrogates
///
/// A high surrogate must be followed by `\u` and a low surrogate; a lone
/// surrogate in either direction is rejected.
#[cfg_attr(feature = "trace", tracing::instrument(level = "trace", parent = None, ret, err))]
fn parse_unicode_escape(input: &str) -> PResult<String> {
    let (rest, first) = parse_hex4(input)?;
    if (0xD800..=0xDBFF).contains(&first) {
        let (rest, low) = context(
            "low surrogate",
            preceded(
                tag("\\u"),
                verify(parse_hex4, |u: &u16| (0xDC00..=0xDFFF).contains(u)),
            ),
        )(rest)?;
        match String::from_utf16(&[first, low]) {
            Ok(s) => Ok((rest, s)),
            Err(_) => Err(nom::Err::Error(VerboseError::from_error_kind(
                input,
                ErrorKind::Verify,
            ))),
        }
    } else {
        // char::from_u32 rejects lone low surrogates
        match char::from_u32(u32::from(first)) {
            Some(c) => Ok((rest, c.to_string())),
            None => Err(nom::Err::Error(VerboseError::from_error_kind(
                input,
                ErrorKind::Verify,
            ))),
        }
    }
}

fn parse_escaped_char(quoted_with: Quotes) -> impl Fn(&str) -> PResult<String> {
    move |input: &str| {
        context(
            "escaped character",
            preceded(
                char('\\'),
                alt((
                    map(
                        alt((
                            value('\u{0008}', char('b')),
                            value('\u{0009}', char('t')),
                            value('\u{000A}', char('n')),
                            value('\u{000C}', char('f')),
                            value('\u{000D}', char('r')),
                            value('\u{002F}', char('/')),
                            value('\u{005C}', char('\\')),
                            value(quoted_with.char(), char(quoted_with.char())),
                        )),
                        String::from,
                    ),
                    preceded(char('u'), parse_unicode_escape),
                )),
            ),
        )(input)
    }
}

fn is_valid_unescaped_char(chr: char, quoted_with: Quotes) -> bool {
    if chr == quoted_with.char() {
        return false;
    }
    // Control characters below U+0020 and the backslash must be escaped
    matches!(chr, '\u{20}'..='\u{5B}' | '\u{5D}'..='\u{10FFFF}')
}

fn parse_unescaped(quoted_with: Quotes) -> impl Fn(&str) -> PResult<&str> {
    move |input: &str| {
        context(
            "unescaped character",
            verify(
                take_while(|chr| is_valid_unescaped_char(chr, quoted_with)),
                |s: &str| !s.is_empty(),
            ),
        )(input)
    }
}

fn parse_internal(quoted_with: Quotes) -> impl Fn(&str) -> PResult<String> {
    move |input: &str| {
        fold_many0(
            alt((
                map(parse_unescaped(quoted_with), String::from),
                parse_escaped_char(quoted_with),
            )),
            String::new,
            |mut string, fragment| {
                string.push_str(fragment.as_str());
                string
            },
        )(input)
    }
}

#[cfg_attr(feature = "trace", tracing::instrument(level = "trace", parent = None, ret, err))]
fn parse_single_quoted(input: &str) -> PResult<String> {
    context(
        "single quoted",
        delimited(
            char('\''),
            parse_internal(Quotes::Single),
            cut(char('\'')),
        ),
    )(input)
}

#[cfg_attr(feature = "trace", tracing::instrument(level = "trace", parent = None, ret, err))]
fn parse_double_quoted(input: &str) -> PResult<String> {
    context(
        "double quoted",
        delimited(char('"'), parse_internal(Quotes::Double), cut(char('"'))),
    )(input)
}

#[cfg_attr(feature = "trace", tracing::instrument(level = "trace", parent = None, ret, err))]
pub(crate) fn parse_string_literal(input: &str) -> PResult<String> {
    context(
        "string literal",
        alt((parse_single_quoted, parse_double_quoted)),
    )(input)
}

#[cfg(test)]
mod tests {
    use super::{parse_escaped_char, parse_string_literal, Quotes};

    #[test]
    fn valid_double_quoted_strings() {
        assert_eq!(
            parse_string_literal("\"test\""),
            Ok(("", String::from("test")))
        );
        assert_eq!(
            parse_string_literal("\"test\\ntest\""),
            Ok(("", String::from("test\ntest")))
        );
        assert_eq!(
            parse_string_literal("\"test\\\"\""),
            Ok(("", String::from("test\"")))
        );
        assert_eq!(
            parse_string_literal("\"tes't\""),
            Ok(("", String::from("tes't")))
        );
    }

    #[test]
    fn valid_single_quoted_strings() {
        assert_eq!(
            parse_string_literal("'test'"),
            Ok(("", String::from("test")))
        );
        assert_eq!(
            parse_string_literal(r#"'te"st'"#),
            Ok(("", String::from("te\"st")))
        );
        assert_eq!(
            parse_string_literal(r"'te\'st'"),
            Ok(("", String::from("te'st")))
        );
    }

    #[test]
    fn unicode_escapes() {
        assert_eq!(
            parse_string_literal(r"'\u00e9'"),
            Ok(("", String::from("é")))
        );
        // surrogate pair for U+1F600
        assert_eq!(
            parse_string_literal(r"'\uD83D\uDE00'"),
            Ok(("", String::from("😀")))
        );
        // lone surrogates are rejected
        assert!(parse_string_literal(r"'\uD83D'").is_err());
        assert!(parse_string_literal(r"'\uDE00'").is_err());
    }

    #[test]
    fn unescaped_control_characters_are_rejected() {
        for c in '\u{00}'..'\u{20}' {
            let input = format!("{c}");
            assert!(parse_escaped_char(Quotes::Double)(&input).is_err());
        }
        assert!(parse_string_literal("'a\u{0001}b'").is_err());
    }
}
