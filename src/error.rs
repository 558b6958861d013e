use nom::error::{VerboseError, VerboseErrorKind};

/// Error produced when parsing a JSONPath query string
///
/// Carries a message and the byte offset into the source text at which the
/// parser gave up. For filter expressions, which are compiled lazily on first
/// use, the offset is relative to the expression text inside the brackets.
#[derive(Debug, thiserror::Error)]
#[error("{err}")]
pub struct ParseError {
    err: Box<ErrorImpl>,
}

impl ParseError {
    pub(crate) fn new(position: usize, message: impl Into<Box<str>>) -> Self {
        Self {
            err: Box::new(ErrorImpl {
                position,
                message: message.into(),
            }),
        }
    }

    /// Get the byte offset of the error in the source text
    pub fn position(&self) -> usize {
        self.err.position
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.err.message
    }
}

#[derive(Debug, thiserror::Error)]
#[error("at position {position}, {message}")]
struct ErrorImpl {
    position: usize,
    message: Box<str>,
}

impl<'a> From<(&'a str, VerboseError<&'a str>)> for ParseError {
    fn from((input, pe): (&'a str, VerboseError<&'a str>)) -> Self {
        #[cfg(feature = "trace")]
        tracing::trace!(input, parser_error = ?pe);
        let position = pe
            .errors
            .first()
            .map(|(remaining, _)| input.len() - remaining.len())
            .unwrap_or_default();
        let message = pe
            .errors
            .iter()
            .find_map(|(_, kind)| match kind {
                VerboseErrorKind::Context(ctx) => Some(format!("invalid {ctx}")),
                _ => None,
            })
            .unwrap_or_else(|| String::from("unable to parse JSONPath query"));
        Self::new(position, message)
    }
}

/// Error produced while evaluating a query against a JSON document
///
/// Selectors never fail on missing data; evaluation errors come from filter
/// and script segments, and from type-selector segments with unrecognized
/// type names.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    /// A script segment was reached but no script evaluator is configured
    #[error("no script evaluator is configured; script segments cannot be evaluated")]
    ScriptUnavailable,
    /// The configured script evaluator reported a failure
    #[error("script expression '{expr}' failed: {message}")]
    Script {
        /// The script expression text
        expr: String,
        /// The failure reported by the host evaluator
        message: String,
    },
    /// A type-selector segment used a name the evaluator does not recognize
    #[error("unknown type predicate '@{name}()'")]
    UnknownTypePredicate {
        /// The unrecognized type name
        name: String,
    },
}

/// Error produced when the configured options are incompatible with a query
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The query contains a script segment, but script evaluation was
    /// disabled through [`QueryOptions`][crate::QueryOptions]
    #[error("query contains a script segment but script evaluation is disabled")]
    ScriptDisabled,
}

/// Umbrella error for the query entry points
///
/// A query either produces a complete result list or exactly one of these;
/// partial results are never returned alongside an error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The query string, or a lazily compiled filter expression inside it,
    /// failed to parse
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// Evaluation failed inside a filter, script, or type-selector segment
    #[error(transparent)]
    Eval(#[from] EvalError),
    /// The query and options are incompatible
    #[error(transparent)]
    Config(#[from] ConfigError),
}
