//! Types representing the different selectors in JSONPath
pub mod filter;
pub mod index;
pub mod name;
pub mod script;
pub mod slice;

use crate::error::Error;
use crate::location::PathElement;

use self::filter::FilterSelector;
use self::index::Index;
use self::name::Name;
use self::script::ScriptSelector;
use self::slice::Slice;

use super::context::{Context, Env};
use super::query::Queryable;

/// A JSONPath selector
#[derive(Debug, PartialEq, Clone)]
pub enum Selector {
    /// Select an object key
    Name(Name),
    /// Select all nodes
    ///
    /// For an object, this produces its member values; for an array, its
    /// elements; for anything else, nothing.
    Wildcard,
    /// Select an array element
    Index(Index),
    /// Select a slice from an array
    ArraySlice(Slice),
    /// Use a filter expression to select nodes; the expression is compiled
    /// lazily on first use
    Filter(FilterSelector),
    /// Use a host-evaluated script expression to produce an index or name
    /// selector
    Script(ScriptSelector),
}

impl Selector {
    /// Can this selector produce more than one node?
    pub fn is_singular(&self) -> bool {
        matches!(self, Selector::Name(_) | Selector::Index(_))
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Selector::Name(name) => write!(f, "{name}"),
            Selector::Wildcard => write!(f, "*"),
            Selector::Index(index) => write!(f, "{index}"),
            Selector::ArraySlice(slice) => write!(f, "{slice}"),
            Selector::Filter(filter) => write!(f, "{filter}"),
            Selector::Script(script) => write!(f, "{script}"),
        }
    }
}

impl Queryable for Selector {
    #[cfg_attr(feature = "trace", tracing::instrument(name = "Query Selector", level = "trace", parent = None, skip(env), ret))]
    fn query<'b>(&self, ctx: &Context<'b>, env: Env<'b, '_>) -> Result<Vec<Context<'b>>, Error> {
        match self {
            Selector::Name(name) => name.query(ctx, env),
            Selector::Wildcard => Ok(expand(ctx)),
            Selector::Index(index) => index.query(ctx, env),
            Selector::ArraySlice(slice) => slice.query(ctx, env),
            Selector::Filter(filter) => filter.query(ctx, env),
            Selector::Script(script) => script.query(ctx, env),
        }
    }
}

/// Swallow an evaluation error when the caller asked for that, dropping the
/// offending item; configuration and parse errors always propagate
pub(crate) fn absorb(e: Error, env: Env<'_, '_>) -> Result<(), Error> {
    if env.opts.ignore_eval_errors && matches!(e, Error::Eval(_)) {
        Ok(())
    } else {
        Err(e)
    }
}

/// Expand a context over its children, in container order
pub(crate) fn expand<'b>(ctx: &Context<'b>) -> Vec<Context<'b>> {
    let mut result = Vec::new();
    if let Some(value) = ctx.borrowed() {
        if let Some(list) = value.as_array() {
            for (i, v) in list.iter().enumerate() {
                result.push(ctx.child(PathElement::Index(i), v));
            }
        } else if let Some(obj) = value.as_object() {
            for (k, v) in obj {
                result.push(ctx.child(PathElement::Name(k.as_str()), v));
            }
        }
    }
    result
}
