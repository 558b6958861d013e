//! Types representing filter selectors in JSONPath
use std::cmp::Ordering;

use once_cell::sync::OnceCell;
use serde_json::{Number, Value};

use crate::error::Error;
use crate::options::FilterMode;
use crate::parser::parse_filter_expression;
use crate::spec::context::{Context, Env};
use crate::spec::functions::FunctionExpr;
use crate::spec::query::{Query, QueryKind, Queryable};
use crate::spec::segment::{QuerySegment, Segment};

use super::{absorb, expand, index::Index, name::Name, Selector};

/// A filter selector, holding the raw expression text as written
///
/// The expression is compiled to a [`Filter`] on first use and memoized for
/// the lifetime of the path; a compilation failure surfaces as a parse error
/// at evaluation time.
#[derive(Debug, Clone, Default)]
pub struct FilterSelector {
    expr: String,
    compiled: OnceCell<Filter>,
}

impl FilterSelector {
    pub(crate) fn new(expr: impl Into<String>) -> Self {
        Self {
            expr: expr.into(),
            compiled: OnceCell::new(),
        }
    }

    /// The raw expression text, as written inside the brackets
    pub fn expression(&self) -> &str {
        &self.expr
    }

    fn compiled(&self) -> Result<&Filter, Error> {
        self.compiled
            .get_or_try_init(|| parse_filter_expression(&self.expr).map_err(Error::Parse))
    }
}

impl PartialEq for FilterSelector {
    fn eq(&self, other: &Self) -> bool {
        self.expr == other.expr
    }
}

impl std::fmt::Display for FilterSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "?{expr}", expr = self.expr)
    }
}

impl Queryable for FilterSelector {
    #[cfg_attr(feature = "trace", tracing::instrument(name = "Query Filter", level = "trace", parent = None, skip(env), ret))]
    fn query<'b>(&self, ctx: &Context<'b>, env: Env<'b, '_>) -> Result<Vec<Context<'b>>, Error> {
        let filter = self.compiled()?;
        match env.opts.filter_mode {
            FilterMode::Rfc | FilterMode::JsonPath => {
                let mut result = Vec::new();
                for candidate in expand(ctx) {
                    let Some(node) = candidate.borrowed() else {
                        continue;
                    };
                    match filter.0.test_filter(node, env) {
                        Ok(true) => result.push(candidate),
                        Ok(false) => {}
                        Err(e) => absorb(e, env)?,
                    }
                }
                Ok(result)
            }
            FilterMode::XPath => match filter.0.test_filter(ctx.node(), env) {
                Ok(true) => Ok(vec![ctx.clone()]),
                Ok(false) => Ok(vec![]),
                Err(e) => {
                    absorb(e, env)?;
                    Ok(vec![])
                }
            },
        }
    }
}

/// Trait for testing a filter expression against a candidate node
pub(crate) trait TestFilter {
    /// Test self using the candidate node and the evaluation environment
    fn test_filter<'a>(&self, current: &'a Value, env: Env<'a, '_>) -> Result<bool, Error>;
}

/// Truthiness of a plain JSON value in boolean position
fn value_is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// A compiled filter expression
#[derive(Debug, PartialEq, Clone)]
pub struct Filter(pub(crate) LogicalOrExpr);

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{expr}", expr = self.0)
    }
}

/// The top level boolean expression type, a logical OR of one or more
/// logical AND expressions
#[derive(Debug, PartialEq, Clone)]
pub struct LogicalOrExpr(pub Vec<LogicalAndExpr>);

impl std::fmt::Display for LogicalOrExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, expr) in self.0.iter().enumerate() {
            write!(
                f,
                "{expr}{logic}",
                logic = if i == self.0.len() - 1 { "" } else { " || " }
            )?;
        }
        Ok(())
    }
}

impl TestFilter for LogicalOrExpr {
    #[cfg_attr(feature = "trace", tracing::instrument(name = "Test Logical Or Expr", level = "trace", parent = None, skip(env), ret))]
    fn test_filter<'a>(&self, current: &'a Value, env: Env<'a, '_>) -> Result<bool, Error> {
        for expr in &self.0 {
            if expr.test_filter(current, env)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

/// A logical AND expression
#[derive(Debug, PartialEq, Clone)]
pub struct LogicalAndExpr(pub Vec<BasicExpr>);

impl std::fmt::Display for LogicalAndExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, expr) in self.0.iter().enumerate() {
            write!(
                f,
                "{expr}{logic}",
                logic = if i == self.0.len() - 1 { "" } else { " && " }
            )?;
        }
        Ok(())
    }
}

impl TestFilter for LogicalAndExpr {
    #[cfg_attr(feature = "trace", tracing::instrument(name = "Test Logical And Expr", level = "trace", parent = None, skip(env), ret))]
    fn test_filter<'a>(&self, current: &'a Value, env: Env<'a, '_>) -> Result<bool, Error> {
        for expr in &self.0 {
            if !expr.test_filter(current, env)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// The basic form of expression in a filter
#[derive(Debug, PartialEq, Clone)]
pub enum BasicExpr {
    /// An expression wrapped in parenthesis
    Paren(LogicalOrExpr),
    /// A parenthesized expression preceded with a `!`
    NotParen(LogicalOrExpr),
    /// A relationship expression which compares two JSON values
    Relation(ComparisonExpr),
    /// An existence expression
    Exist(ExistExpr),
    /// The inverse of an existence expression, i.e., preceded by `!`
    NotExist(ExistExpr),
    /// A function expression
    FuncExpr(FunctionExpr),
    /// The inverse of a function expression, i.e., preceded by `!`
    NotFuncExpr(FunctionExpr),
}

impl std::fmt::Display for BasicExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BasicExpr::Paren(expr) => write!(f, "({expr})"),
            BasicExpr::NotParen(expr) => write!(f, "!({expr})"),
            BasicExpr::Relation(rel) => write!(f, "{rel}"),
            BasicExpr::Exist(exist) => write!(f, "{exist}"),
            BasicExpr::NotExist(exist) => write!(f, "!{exist}"),
            BasicExpr::FuncExpr(expr) => write!(f, "{expr}"),
            BasicExpr::NotFuncExpr(expr) => write!(f, "!{expr}"),
        }
    }
}

impl BasicExpr {
    /// Optionally express as a relation expression
    pub fn as_relation(&self) -> Option<&ComparisonExpr> {
        match self {
            BasicExpr::Relation(cx) => Some(cx),
            _ => None,
        }
    }
}

impl TestFilter for BasicExpr {
    #[cfg_attr(feature = "trace", tracing::instrument(name = "Test Basic Expr", level = "trace", parent = None, skip(env), ret))]
    fn test_filter<'a>(&self, current: &'a Value, env: Env<'a, '_>) -> Result<bool, Error> {
        match self {
            BasicExpr::Paren(expr) => expr.test_filter(current, env),
            BasicExpr::NotParen(expr) => Ok(!expr.test_filter(current, env)?),
            BasicExpr::Relation(expr) => expr.test_filter(current, env),
            BasicExpr::Exist(expr) => expr.test_filter(current, env),
            BasicExpr::NotExist(expr) => Ok(!expr.test_filter(current, env)?),
            BasicExpr::FuncExpr(expr) => expr.test_filter(current, env),
            BasicExpr::NotFuncExpr(expr) => Ok(!expr.test_filter(current, env)?),
        }
    }
}

/// Existence expression: a bare sub-query in boolean position
///
/// True when the sub-query selects at least one node.
#[derive(Debug, PartialEq, Clone)]
pub struct ExistExpr(pub Query);

impl std::fmt::Display for ExistExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{query}", query = self.0)
    }
}

impl TestFilter for ExistExpr {
    #[cfg_attr(feature = "trace", tracing::instrument(name = "Test Exists Expr", level = "trace", parent = None, skip(env), ret))]
    fn test_filter<'a>(&self, current: &'a Value, env: Env<'a, '_>) -> Result<bool, Error> {
        Ok(!self.0.query(&Context::root(current), env)?.is_empty())
    }
}

/// A comparison expression comparing two JSON values
#[derive(Debug, PartialEq, Clone)]
pub struct ComparisonExpr {
    /// The JSON value on the left of the comparison
    pub left: Comparable,
    /// The operator of comparison
    pub op: ComparisonOperator,
    /// The JSON value on the right of the comparison
    pub right: Comparable,
}

impl std::fmt::Display for ComparisonExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{left} {op} {right}",
            left = self.left,
            op = self.op,
            right = self.right
        )
    }
}

impl TestFilter for ComparisonExpr {
    #[cfg_attr(feature = "trace", tracing::instrument(name = "Test Comparison Expr", level = "trace", parent = None, skip(env), ret))]
    fn test_filter<'a>(&self, current: &'a Value, env: Env<'a, '_>) -> Result<bool, Error> {
        let left = self.left.as_value(current, env)?;
        let right = self.right.as_value(current, env)?;
        Ok(match self.op {
            ComparisonOperator::EqualTo => left.equal_to(&right, env),
            ComparisonOperator::NotEqualTo => !left.equal_to(&right, env),
            ComparisonOperator::LessThan => {
                matches!(left.ordering(&right), Some(Ordering::Less))
            }
            ComparisonOperator::GreaterThan => {
                matches!(left.ordering(&right), Some(Ordering::Greater))
            }
            ComparisonOperator::LessThanEqualTo => match left.ordering(&right) {
                Some(ord) => ord != Ordering::Greater,
                None => left.present_and_equal(&right),
            },
            ComparisonOperator::GreaterThanEqualTo => match left.ordering(&right) {
                Some(ord) => ord != Ordering::Less,
                None => left.present_and_equal(&right),
            },
        })
    }
}

/// Compare two JSON numbers by value, across the integer and float
/// representations `serde_json` hands back
fn compare_numbers(a: &Number, b: &Number) -> Option<Ordering> {
    if let (Some(x), Some(y)) = (a.as_f64(), b.as_f64()) {
        x.partial_cmp(&y)
    } else if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        Some(x.cmp(&y))
    } else if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        Some(x.cmp(&y))
    } else {
        None
    }
}

/// Structural equality, with top-level numbers compared by value rather
/// than by representation
fn deep_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => compare_numbers(a, b) == Some(Ordering::Equal),
        _ => left == right,
    }
}

/// The comparison operator
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ComparisonOperator {
    /// `==`
    EqualTo,
    /// `!=`
    NotEqualTo,
    /// `<`
    LessThan,
    /// `>`
    GreaterThan,
    /// `<=`
    LessThanEqualTo,
    /// `>=`
    GreaterThanEqualTo,
}

impl std::fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComparisonOperator::EqualTo => write!(f, "=="),
            ComparisonOperator::NotEqualTo => write!(f, "!="),
            ComparisonOperator::LessThan => write!(f, "<"),
            ComparisonOperator::GreaterThan => write!(f, ">"),
            ComparisonOperator::LessThanEqualTo => write!(f, "<="),
            ComparisonOperator::GreaterThanEqualTo => write!(f, ">="),
        }
    }
}

/// The result of evaluating one side of a comparison
///
/// Comparisons never see node lists: non-singular queries are rejected as
/// comparison operands when the filter expression is compiled.
#[derive(Debug)]
pub(crate) enum ExprValue<'a> {
    /// A single value selected out of the queried document
    Node(&'a Value),
    /// A value produced by a literal or a function
    Value(Value),
    /// A missing value
    Nothing,
}

impl<'a> ExprValue<'a> {
    pub(crate) fn as_value(&self) -> Option<&Value> {
        match self {
            ExprValue::Node(v) => Some(v),
            ExprValue::Value(v) => Some(v),
            ExprValue::Nothing => None,
        }
    }

    pub(crate) fn is_truthy(&self) -> bool {
        self.as_value().map(value_is_truthy).unwrap_or(false)
    }

    /// Equality under the configured filter mode
    ///
    /// A missing value equals a missing value; in the legacy mode it also
    /// equals zero. Present values use [`deep_equal`].
    fn equal_to(&self, other: &Self, env: Env<'_, '_>) -> bool {
        match (self.as_value(), other.as_value()) {
            (Some(l), Some(r)) => deep_equal(l, r),
            (None, None) => true,
            (None, Some(v)) | (Some(v), None) => {
                env.opts.filter_mode.nothing_equals_zero()
                    && matches!(v, Value::Number(n) if n.as_f64() == Some(0.0))
            }
        }
    }

    /// Ordering for the ordered operators
    ///
    /// Defined between two numbers, two strings, or two booleans
    /// (`false < true`); anything else, including a missing side, does not
    /// order.
    fn ordering(&self, other: &Self) -> Option<Ordering> {
        match (self.as_value()?, other.as_value()?) {
            (Value::Number(a), Value::Number(b)) => compare_numbers(a, b),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Both sides present and deeply equal; the fallback `<=` and `>=` use
    /// for operand pairs with no defined ordering
    fn present_and_equal(&self, other: &Self) -> bool {
        match (self.as_value(), other.as_value()) {
            (Some(l), Some(r)) => deep_equal(l, r),
            _ => false,
        }
    }
}

/// A type that is comparable
#[derive(Debug, PartialEq, Clone)]
pub enum Comparable {
    /// A literal JSON value, excluding objects and arrays
    Literal(Literal),
    /// A singular query
    ///
    /// This will only produce a single node, i.e., JSON value, or nothing
    SingularQuery(SingularQuery),
    /// A function expression that produces a value
    FunctionExpr(FunctionExpr),
}

impl std::fmt::Display for Comparable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Comparable::Literal(lit) => write!(f, "{lit}"),
            Comparable::SingularQuery(path) => write!(f, "{path}"),
            Comparable::FunctionExpr(expr) => write!(f, "{expr}"),
        }
    }
}

impl Comparable {
    pub(crate) fn as_value<'a>(
        &self,
        current: &'a Value,
        env: Env<'a, '_>,
    ) -> Result<ExprValue<'a>, Error> {
        match self {
            Comparable::Literal(lit) => Ok(lit.into()),
            Comparable::SingularQuery(sq) => Ok(match sq.eval_query(current, env.root) {
                Some(v) => ExprValue::Node(v),
                None => ExprValue::Nothing,
            }),
            Comparable::FunctionExpr(expr) => expr.evaluate_value(current, env),
        }
    }

    #[doc(hidden)]
    pub fn as_singular_path(&self) -> Option<&SingularQuery> {
        match self {
            Comparable::SingularQuery(sq) => Some(sq),
            _ => None,
        }
    }
}

/// A literal JSON value that can be represented in a JSONPath query
#[derive(Debug, PartialEq, Clone)]
pub enum Literal {
    /// A valid JSON number
    Number(Number),
    /// A string
    String(String),
    /// `true` or `false`
    Bool(bool),
    /// `null`
    Null,
}

impl<'a> From<&Literal> for ExprValue<'a> {
    fn from(literal: &Literal) -> Self {
        match literal {
            Literal::Number(n) => ExprValue::Value(n.to_owned().into()),
            Literal::String(s) => ExprValue::Value(s.to_owned().into()),
            Literal::Bool(b) => ExprValue::Value(Value::from(*b)),
            Literal::Null => ExprValue::Value(Value::Null),
        }
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Literal::Number(n) => write!(f, "{n}"),
            Literal::String(s) => write!(f, "'{s}'"),
            Literal::Bool(b) => write!(f, "{b}"),
            Literal::Null => write!(f, "null"),
        }
    }
}

/// A segment in a singular query
#[derive(Debug, PartialEq, Clone)]
pub enum SingularQuerySegment {
    /// A single name segment
    Name(Name),
    /// A single index segment
    Index(Index),
}

impl std::fmt::Display for SingularQuerySegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SingularQuerySegment::Name(name) => write!(f, "{name}"),
            SingularQuerySegment::Index(index) => write!(f, "{index}"),
        }
    }
}

impl TryFrom<QuerySegment> for SingularQuerySegment {
    type Error = NonSingularQueryError;

    fn try_from(segment: QuerySegment) -> Result<Self, Self::Error> {
        if segment.is_descendent() {
            return Err(NonSingularQueryError::Descendant);
        }
        match segment.segment {
            Segment::Selectors(mut selectors) => {
                if selectors.len() > 1 {
                    Err(NonSingularQueryError::TooManySelectors)
                } else if let Some(sel) = selectors.pop() {
                    sel.try_into()
                } else {
                    Err(NonSingularQueryError::NoSelectors)
                }
            }
            _ => Err(NonSingularQueryError::Extension),
        }
    }
}

impl TryFrom<Selector> for SingularQuerySegment {
    type Error = NonSingularQueryError;

    fn try_from(selector: Selector) -> Result<Self, Self::Error> {
        match selector {
            Selector::Name(n) => Ok(Self::Name(n)),
            Selector::Wildcard => Err(NonSingularQueryError::Wildcard),
            Selector::Index(i) => Ok(Self::Index(i)),
            Selector::ArraySlice(_) => Err(NonSingularQueryError::Slice),
            Selector::Filter(_) => Err(NonSingularQueryError::Filter),
            Selector::Script(_) => Err(NonSingularQueryError::Script),
        }
    }
}

/// Represents a singular query in JSONPath
///
/// A singular query is guaranteed to produce at most one node; only singular
/// queries are admitted as comparison operands.
#[derive(Debug, PartialEq, Clone)]
pub struct SingularQuery {
    /// The kind of singular query, relative or absolute
    pub kind: SingularQueryKind,
    /// The segments making up the query
    pub segments: Vec<SingularQuerySegment>,
}

impl SingularQuery {
    /// Evaluate the singular query by direct walk
    #[cfg_attr(feature = "trace", tracing::instrument(name = "SingularQuery::eval_query", level = "trace", parent = None, ret))]
    pub fn eval_query<'b>(&self, current: &'b Value, root: &'b Value) -> Option<&'b Value> {
        let mut target = match self.kind {
            SingularQueryKind::Absolute => root,
            SingularQueryKind::Relative => current,
        };
        for segment in &self.segments {
            match segment {
                SingularQuerySegment::Name(name) => {
                    target = target.as_object().and_then(|o| o.get(name.as_str()))?;
                }
                SingularQuerySegment::Index(index) => {
                    target = target
                        .as_array()
                        .and_then(|l| index.normalize(l.len()).and_then(|i| l.get(i)))?;
                }
            }
        }
        Some(target)
    }
}

impl TryFrom<Query> for SingularQuery {
    type Error = NonSingularQueryError;

    fn try_from(query: Query) -> Result<Self, Self::Error> {
        let kind = SingularQueryKind::from(query.kind);
        let segments = query
            .segments
            .into_iter()
            .map(TryFrom::try_from)
            .collect::<Result<Vec<SingularQuerySegment>, Self::Error>>()?;
        Ok(Self { kind, segments })
    }
}

impl std::fmt::Display for SingularQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            SingularQueryKind::Absolute => write!(f, "$")?,
            SingularQueryKind::Relative => write!(f, "@")?,
        }
        for s in &self.segments {
            write!(f, "[{s}]")?;
        }
        Ok(())
    }
}

/// The kind of singular query
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SingularQueryKind {
    /// Referencing the root node, i.e., `$`
    Absolute,
    /// Referencing the current node, i.e., `@`
    Relative,
}

impl From<QueryKind> for SingularQueryKind {
    fn from(qk: QueryKind) -> Self {
        match qk {
            QueryKind::Root => Self::Absolute,
            QueryKind::Current => Self::Relative,
        }
    }
}

/// Error when converting a query into a singular query
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum NonSingularQueryError {
    /// Descendant segment
    #[error("descendant segments are not singular")]
    Descendant,
    /// Selector-list segment with too many selectors
    #[error("selector list contained more than one selector")]
    TooManySelectors,
    /// Selector-list segment with no selectors
    #[error("selector list contained no selectors")]
    NoSelectors,
    /// A wildcard selector
    #[error("wildcard selectors are not singular")]
    Wildcard,
    /// A slice selector
    #[error("slice selectors are not singular")]
    Slice,
    /// A filter selector
    #[error("filter selectors are not singular")]
    Filter,
    /// A script selector
    #[error("script selectors are not singular")]
    Script,
    /// A parent, property-name, or type-selector segment
    #[error("extension segments are not singular")]
    Extension,
}
