use nom::character::complete::{char, multispace0, satisfy};
use nom::combinator::{map, map_res};
use nom::multi::{fold_many1, separated_list0};
use nom::sequence::{delimited, pair, preceded, terminated};
use nom::branch::alt;

use crate::parser::{parse_query, PResult};
use crate::spec::functions::{FunctionArg, FunctionExpr};

use super::filter::{parse_literal, parse_singular_query};

#[cfg_attr(feature = "trace", tracing::instrument(level = "trace", parent = None, ret, err))]
fn parse_function_name_first(input: &str) -> PResult<char> {
    satisfy(|c| c.is_ascii_lowercase())(input)
}

#[cfg_attr(feature = "trace", tracing::instrument(level = "trace", parent = None, ret, err))]
fn parse_function_name_char(input: &str) -> PResult<char> {
    alt((
        parse_function_name_first,
        char('_'),
        satisfy(|c| c.is_ascii_digit()),
    ))(input)
}

#[cfg_attr(feature = "trace", tracing::instrument(level = "trace", parent = None, ret, err))]
fn parse_function_name(input: &str) -> PResult<String> {
    map(
        pair(
            parse_function_name_first,
            fold_many1(
                parse_function_name_char,
                String::new,
                |mut string, fragment| {
                    string.push(fragment);
                    string
                },
            ),
        ),
        |(first, rest)| format!("{first}{rest}"),
    )(input)
}

#[cfg_attr(feature = "trace", tracing::instrument(level = "trace", parent = None, ret, err))]
fn parse_function_argument(input: &str) -> PResult<FunctionArg> {
    alt((
        map(parse_literal, FunctionArg::Literal),
        map(parse_singular_query, FunctionArg::SingularQuery),
        map(parse_query, FunctionArg::Query),
    ))(input)
}

/// Parse a function call, validating the name, arity, and argument kinds
/// against the registered function set
#[cfg_attr(feature = "trace", tracing::instrument(level = "trace", parent = None, ret, err))]
pub(crate) fn parse_function_expr(input: &str) -> PResult<FunctionExpr> {
    map_res(
        pair(
            parse_function_name,
            delimited(
                terminated(char('('), multispace0),
                separated_list0(
                    delimited(multispace0, char(','), multispace0),
                    parse_function_argument,
                ),
                preceded(multispace0, char(')')),
            ),
        ),
        |(name, args)| FunctionExpr::validate(&name, args),
    )(input)
}

#[cfg(test)]
mod tests {
    use crate::spec::functions::{FunctionArg, FunctionName};

    use super::parse_function_expr;

    #[test]
    fn known_functions() {
        let (_, fe) = parse_function_expr("length(@.authors)").unwrap();
        assert_eq!(fe.name, FunctionName::Length);
        assert!(matches!(fe.args[0], FunctionArg::SingularQuery(_)));

        let (_, fe) = parse_function_expr("count(@.*.author)").unwrap();
        assert_eq!(fe.name, FunctionName::Count);
        assert!(matches!(fe.args[0], FunctionArg::Query(_)));

        let (_, fe) = parse_function_expr("match(@.date, '1974-05-..')").unwrap();
        assert_eq!(fe.name, FunctionName::Match);
        assert_eq!(fe.args.len(), 2);
    }

    #[test]
    fn unknown_function_is_rejected() {
        assert!(parse_function_expr("frobnicate(@.a)").is_err());
    }

    #[test]
    fn arity_is_checked() {
        assert!(parse_function_expr("length(@.a, @.b)").is_err());
        assert!(parse_function_expr("match(@.a)").is_err());
    }

    #[test]
    fn count_requires_a_query() {
        assert!(parse_function_expr("count(1)").is_err());
        assert!(parse_function_expr("value('x')").is_err());
    }

    #[test]
    fn length_path_argument_must_be_singular() {
        assert!(parse_function_expr("length(@.a)").is_ok());
        // wildcard queries parse as plain queries, which validation rejects
        // for the value position
        assert!(parse_function_expr("length(@.a[*])").is_err());
    }
}
