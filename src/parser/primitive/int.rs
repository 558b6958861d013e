use nom::character::complete::char;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while_m_n},
    character::complete::digit0,
    combinator::{map_res, opt, recognize},
    sequence::tuple,
};

use crate::parser::PResult;

#[cfg_attr(feature = "trace", tracing::instrument(level = "trace", parent = None, ret, err))]
fn parse_zero(input: &str) -> PResult<&str> {
    tag("0")(input)
}

fn is_non_zero_digit(chr: char) -> bool {
    ('1'..='9').contains(&chr)
}

#[cfg_attr(feature = "trace", tracing::instrument(level = "trace", parent = None, ret, err))]
fn parse_non_zero_first_digit(input: &str) -> PResult<&str> {
    take_while_m_n(1, 1, is_non_zero_digit)(input)
}

/// Recognize an integer with no leading zeros; `-0` is not an integer
#[cfg_attr(feature = "trace", tracing::instrument(level = "trace", parent = None, ret, err))]
fn parse_non_zero_int(input: &str) -> PResult<&str> {
    recognize(tuple((opt(char('-')), parse_non_zero_first_digit, digit0)))(input)
}

#[cfg_attr(feature = "trace", tracing::instrument(level = "trace", parent = None, ret, err))]
pub(crate) fn parse_int_string(input: &str) -> PResult<&str> {
    alt((parse_zero, parse_non_zero_int))(input)
}

/// Parse an index-sized integer
///
/// The text must fit a 64-bit signed integer; anything wider fails the
/// parse.
#[cfg_attr(feature = "trace", tracing::instrument(level = "trace", parent = None, ret, err))]
pub(crate) fn parse_int(input: &str) -> PResult<isize> {
    map_res(parse_int_string, |i_str| {
        i_str
            .parse::<i64>()
            .map_err(|_| ())
            .and_then(|i| isize::try_from(i).map_err(|_| ()))
    })(input)
}
