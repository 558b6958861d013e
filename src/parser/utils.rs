use nom::error::{ErrorKind, ParseError};
use nom::IResult;

use super::PResult;

/// Prevent a `cut` parser from poisoning an alt branch
pub(crate) fn uncut<I, O, E: ParseError<I>, F: nom::Parser<I, O, E>>(
    mut parser: F,
) -> impl FnMut(I) -> IResult<I, O, E> {
    move |input: I| match parser.parse(input) {
        Err(nom::Err::Failure(e)) => Err(nom::Err::Error(e)),
        rest => rest,
    }
}

/// Take the raw text up to the `]` that closes the current bracketed
/// segment, ignoring brackets inside quoted strings and inside nested
/// bracket pairs
///
/// This is how filter expressions are carved out of the path source without
/// parsing them: they are compiled separately, on first use.
pub(crate) fn take_until_bracket_end(input: &str) -> PResult<&str> {
    take_until_close(input, '[', ']')
}

/// Take the raw text up to the `)` that closes the current parenthesized
/// expression, with the same quote and nesting rules
pub(crate) fn take_until_paren_close(input: &str) -> PResult<&str> {
    take_until_close(input, '(', ')')
}

fn take_until_close(input: &str, open: char, close: char) -> PResult<&str> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (i, c) in input.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            c if c == open => depth += 1,
            c if c == close => {
                if depth == 0 {
                    return Ok((&input[i..], &input[..i]));
                }
                depth -= 1;
            }
            _ => {}
        }
    }
    Err(nom::Err::Error(ParseError::from_error_kind(
        input,
        ErrorKind::TakeUntil,
    )))
}
