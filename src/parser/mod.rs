use nom::branch::alt;
use nom::character::complete::{alpha1, char, multispace0};
use nom::combinator::{all_consuming, map, not, opt, peek, value};
use nom::error::VerboseError;
use nom::multi::{many0, separated_list1};
use nom::sequence::{delimited, pair, terminated};
use nom::IResult;

use crate::error::ParseError;
use crate::spec::query::{Query, QueryKind};
use crate::spec::segment::QuerySegment;
use crate::spec::selector::filter::Filter;

use self::segment::parse_segment;

pub(crate) mod primitive;
pub(crate) mod segment;
pub(crate) mod selector;
pub(crate) mod utils;

pub(crate) type PResult<'a, O> = IResult<&'a str, O, VerboseError<&'a str>>;

#[cfg_attr(feature = "trace", tracing::instrument(level = "trace", parent = None, ret, err))]
fn parse_segments(input: &str) -> PResult<Vec<QuerySegment>> {
    many0(parse_segment)(input)
}

/// Parse a query head: `$` for a root query, `@` for a current-node query
///
/// An `@` that introduces a type selector (`@name()`) is left for the
/// segment parser.
#[cfg_attr(feature = "trace", tracing::instrument(level = "trace", parent = None, ret, err))]
fn parse_query_head(input: &str) -> PResult<QueryKind> {
    alt((
        value(QueryKind::Root, char('$')),
        terminated(
            value(QueryKind::Current, char('@')),
            not(peek(pair(alpha1, nom::bytes::complete::tag("()")))),
        ),
    ))(input)
}

/// Parse a query with an explicit head; used for sub-queries inside filter
/// expressions
#[cfg_attr(feature = "trace", tracing::instrument(level = "trace", parent = None, ret, err))]
pub(crate) fn parse_query(input: &str) -> PResult<Query> {
    map(pair(parse_query_head, parse_segments), |(kind, segments)| {
        Query { kind, segments }
    })(input)
}

/// Parse one alternative of a path expression; an omitted head means `$`
#[cfg_attr(feature = "trace", tracing::instrument(level = "trace", parent = None, ret, err))]
fn parse_alternative(input: &str) -> PResult<Query> {
    map(
        pair(opt(parse_query_head), parse_segments),
        |(kind, segments)| Query {
            kind: kind.unwrap_or_default(),
            segments,
        },
    )(input)
}

/// Parse a whole path expression: one or more alternatives joined with `|`
#[cfg_attr(feature = "trace", tracing::instrument(level = "trace", parent = None, ret, err))]
pub(crate) fn parse_path_main(input: &str) -> PResult<Vec<Query>> {
    all_consuming(separated_list1(
        delimited(multispace0, char('|'), multispace0),
        parse_alternative,
    ))(input)
}

/// Parse a single complete query; test convenience
#[cfg(test)]
pub(crate) fn parse_one_query(input: &str) -> PResult<Query> {
    all_consuming(parse_query)(input)
}

/// Compile the raw text of a filter expression
///
/// This is invoked lazily, the first time a filter selector is evaluated;
/// offsets in the error are relative to the expression text.
pub(crate) fn parse_filter_expression(expr: &str) -> Result<Filter, ParseError> {
    match all_consuming(delimited(
        multispace0,
        selector::filter::parse_logical_or_expr,
        multispace0,
    ))(expr)
    {
        Ok((_, logical_or)) => Ok(Filter(logical_or)),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(ParseError::from((expr, e))),
        Err(nom::Err::Incomplete(_)) => unreachable!("we do not use streaming parsers"),
    }
}
