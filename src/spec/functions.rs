//! Function extensions available in filter expressions
//!
//! The function set is closed: `length`, `count`, `match`, `search`, and
//! `value`, with the signatures given in RFC 9535. Functions producing a
//! value (`length`, `count`, `value`) may only appear as comparison
//! operands; functions producing a logical result (`match`, `search`) may
//! only appear in boolean position.
use std::collections::HashMap;
use std::sync::RwLock;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::error::Error;

use super::context::{Context, Env};
use super::query::{Query, Queryable};
use super::selector::filter::{
    ExprValue, Literal, SingularQuery, TestFilter,
};

/// The name of a registered function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionName {
    /// `length(value)` — the length of a string, array, or object
    Length,
    /// `count(query)` — the number of nodes a query selects
    Count,
    /// `match(value, pattern)` — full-string regular expression test
    Match,
    /// `search(value, pattern)` — substring regular expression test
    Search,
    /// `value(query)` — the single node a query selects, or nothing
    Value,
}

impl FunctionName {
    /// Look up a function by the name written in the query
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "length" => Some(Self::Length),
            "count" => Some(Self::Count),
            "match" => Some(Self::Match),
            "search" => Some(Self::Search),
            "value" => Some(Self::Value),
            _ => None,
        }
    }

    /// The name as written in queries
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Length => "length",
            Self::Count => "count",
            Self::Match => "match",
            Self::Search => "search",
            Self::Value => "value",
        }
    }

    /// Does this function produce a logical result, making it valid in
    /// boolean position?
    pub fn returns_logical(&self) -> bool {
        matches!(self, Self::Match | Self::Search)
    }

    /// Does this function produce a value, making it valid as a comparison
    /// operand?
    pub fn returns_value(&self) -> bool {
        !self.returns_logical()
    }

    fn arity(&self) -> usize {
        match self {
            Self::Length | Self::Count | Self::Value => 1,
            Self::Match | Self::Search => 2,
        }
    }
}

impl std::fmt::Display for FunctionName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An argument to a function call
#[derive(Debug, PartialEq, Clone)]
pub enum FunctionArg {
    /// A literal value
    Literal(Literal),
    /// A singular query
    SingularQuery(SingularQuery),
    /// A non-singular query, admitted only where a nodelist is expected
    Query(Query),
}

impl std::fmt::Display for FunctionArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FunctionArg::Literal(lit) => write!(f, "{lit}"),
            FunctionArg::SingularQuery(sq) => write!(f, "{sq}"),
            FunctionArg::Query(q) => write!(f, "{q}"),
        }
    }
}

impl FunctionArg {
    /// Evaluate the argument where a single value is expected
    fn evaluate_value<'a>(
        &self,
        current: &'a Value,
        env: Env<'a, '_>,
    ) -> Result<ExprValue<'a>, Error> {
        match self {
            FunctionArg::Literal(lit) => Ok(lit.into()),
            FunctionArg::SingularQuery(sq) => Ok(match sq.eval_query(current, env.root) {
                Some(v) => ExprValue::Node(v),
                None => ExprValue::Nothing,
            }),
            // Validation admits a plain query here only when it is
            // structurally singular.
            FunctionArg::Query(q) => {
                let mut nodes = q.query(&Context::root(current), env)?;
                Ok(match nodes.pop() {
                    Some(ctx) if nodes.is_empty() => match ctx.borrowed() {
                        Some(v) => ExprValue::Node(v),
                        None => ExprValue::Value(ctx.node().clone()),
                    },
                    _ => ExprValue::Nothing,
                })
            }
        }
    }

    /// Evaluate the argument where a nodelist is expected
    fn evaluate_nodes<'a>(
        &self,
        current: &'a Value,
        env: Env<'a, '_>,
    ) -> Result<Vec<Context<'a>>, Error> {
        match self {
            FunctionArg::Literal(_) => Ok(vec![]),
            FunctionArg::SingularQuery(sq) => Ok(sq
                .eval_query(current, env.root)
                .map(Context::root)
                .into_iter()
                .collect()),
            FunctionArg::Query(q) => q.query(&Context::root(current), env),
        }
    }
}

/// A validated function call in a filter expression
#[derive(Debug, PartialEq, Clone)]
pub struct FunctionExpr {
    /// The function being called
    pub name: FunctionName,
    /// The call arguments
    pub args: Vec<FunctionArg>,
}

impl std::fmt::Display for FunctionExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{name}(", name = self.name)?;
        for (i, arg) in self.args.iter().enumerate() {
            write!(
                f,
                "{arg}{comma}",
                comma = if i == self.args.len() - 1 { "" } else { "," }
            )?;
        }
        write!(f, ")")
    }
}

impl FunctionExpr {
    /// Check a parsed function call against the function's signature
    pub(crate) fn validate(
        name: &str,
        args: Vec<FunctionArg>,
    ) -> Result<Self, FunctionValidationError> {
        let name = FunctionName::from_name(name).ok_or_else(|| {
            FunctionValidationError::Undefined {
                name: name.to_owned(),
            }
        })?;
        if args.len() != name.arity() {
            return Err(FunctionValidationError::NumberOfArgsMismatch {
                expected: name.arity(),
                received: args.len(),
            });
        }
        match name {
            FunctionName::Length | FunctionName::Match | FunctionName::Search => {
                // These take values; a path argument must be singular.
                for (position, arg) in args.iter().enumerate() {
                    if let FunctionArg::Query(q) = arg {
                        if !q.is_singular() {
                            return Err(FunctionValidationError::ArgumentMustBeSingular {
                                position: position + 1,
                            });
                        }
                    }
                }
            }
            FunctionName::Count | FunctionName::Value => {
                if matches!(args[0], FunctionArg::Literal(_)) {
                    return Err(FunctionValidationError::ArgumentMustBeQuery { position: 1 });
                }
            }
        }
        Ok(Self { name, args })
    }

    /// Evaluate a value-returning function for use as a comparison operand
    pub(crate) fn evaluate_value<'a>(
        &self,
        current: &'a Value,
        env: Env<'a, '_>,
    ) -> Result<ExprValue<'a>, Error> {
        match self.name {
            FunctionName::Length => {
                let arg = self.args[0].evaluate_value(current, env)?;
                Ok(ExprValue::Value(value_length(arg.as_value()).into()))
            }
            FunctionName::Count => {
                let nodes = self.args[0].evaluate_nodes(current, env)?;
                Ok(ExprValue::Value(nodes.len().into()))
            }
            FunctionName::Value => {
                let mut nodes = self.args[0].evaluate_nodes(current, env)?;
                Ok(match nodes.pop() {
                    Some(ctx) if nodes.is_empty() => match ctx.borrowed() {
                        Some(v) => ExprValue::Node(v),
                        None => ExprValue::Value(ctx.node().clone()),
                    },
                    _ => ExprValue::Nothing,
                })
            }
            FunctionName::Match | FunctionName::Search => {
                let b = self.evaluate_logical(current, env)?;
                Ok(ExprValue::Value(Value::Bool(b)))
            }
        }
    }

    /// Evaluate a logical-returning function for use in boolean position
    pub(crate) fn evaluate_logical<'a>(
        &self,
        current: &'a Value,
        env: Env<'a, '_>,
    ) -> Result<bool, Error> {
        match self.name {
            FunctionName::Match => self.regex_test(current, env, true),
            FunctionName::Search => self.regex_test(current, env, false),
            _ => {
                let value = self.evaluate_value(current, env)?;
                Ok(value.is_truthy())
            }
        }
    }

    fn regex_test<'a>(
        &self,
        current: &'a Value,
        env: Env<'a, '_>,
        anchored: bool,
    ) -> Result<bool, Error> {
        let subject = self.args[0].evaluate_value(current, env)?;
        let pattern = self.args[1].evaluate_value(current, env)?;
        let (Some(Value::String(subject)), Some(Value::String(pattern))) =
            (subject.as_value(), pattern.as_value())
        else {
            return Ok(false);
        };
        Ok(regex_for(pattern, anchored)
            .map(|rgx| rgx.is_match(subject))
            .unwrap_or(false))
    }
}

impl TestFilter for FunctionExpr {
    #[cfg_attr(feature = "trace", tracing::instrument(name = "Test Function Expr", level = "trace", parent = None, skip(env), ret))]
    fn test_filter<'a>(&self, current: &'a Value, env: Env<'a, '_>) -> Result<bool, Error> {
        self.evaluate_logical(current, env)
    }
}

fn value_length(value: Option<&Value>) -> usize {
    match value {
        Some(Value::String(s)) => s.chars().count(),
        Some(Value::Array(a)) => a.len(),
        Some(Value::Object(o)) => o.len(),
        _ => 0,
    }
}

/// An error occurred while validating a function call
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum FunctionValidationError {
    /// The function name is not one of the registered functions
    #[error("function name '{name}' is not defined")]
    Undefined {
        /// The name of the function
        name: String,
    },
    /// Mismatch in number of function arguments
    #[error("expected {expected} args, but received {received}")]
    NumberOfArgsMismatch {
        /// Expected number of arguments
        expected: usize,
        /// Received number of arguments
        received: usize,
    },
    /// A value-position argument was a non-singular query
    #[error("in argument position {position}, expected a singular query")]
    ArgumentMustBeSingular {
        /// Argument position, 1-indexed
        position: usize,
    },
    /// A nodelist-position argument was a literal
    #[error("in argument position {position}, expected a query")]
    ArgumentMustBeQuery {
        /// Argument position, 1-indexed
        position: usize,
    },
    /// A function was used in a position its return type does not permit
    #[error("function with incorrect return type used")]
    IncorrectFunctionReturnType,
}

const REGEX_CACHE_LIMIT: usize = 256;

/// Compiled patterns shared across queries and threads; invalid patterns
/// memoize as `None` so they are not recompiled per candidate
static REGEX_CACHE: Lazy<RwLock<HashMap<String, Option<Regex>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

fn regex_for(pattern: &str, anchored: bool) -> Option<Regex> {
    let source = if anchored {
        format!("^(?:{})$", rewrite_dot(pattern))
    } else {
        rewrite_dot(pattern)
    };
    if let Ok(cache) = REGEX_CACHE.read() {
        if let Some(cached) = cache.get(&source) {
            return cached.clone();
        }
    }
    let compiled = Regex::new(&source).ok();
    if let Ok(mut cache) = REGEX_CACHE.write() {
        if cache.len() < REGEX_CACHE_LIMIT {
            cache.insert(source, compiled.clone());
        }
    }
    compiled
}

/// Rewrite unescaped dots outside character classes to `[^\r\n]`, per the
/// I-Regexp reading of `.`
fn rewrite_dot(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut escaped = false;
    let mut in_class = false;
    for c in pattern.chars() {
        if escaped {
            out.push(c);
            escaped = false;
            continue;
        }
        match c {
            '\\' => {
                out.push(c);
                escaped = true;
            }
            '[' if !in_class => {
                out.push(c);
                in_class = true;
            }
            ']' if in_class => {
                out.push(c);
                in_class = false;
            }
            '.' if !in_class => out.push_str(r"[^\r\n]"),
            c => out.push(c),
        }
    }
    out
}
