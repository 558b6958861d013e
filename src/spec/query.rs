//! Types representing queries in JSONPath
use crate::error::Error;

use super::context::{Context, Env};
use super::segment::{QuerySegment, Segment};
use super::selector::Selector;

/// A type that can be evaluated against a context, mapping it to the list of
/// contexts it selects
pub(crate) trait Queryable {
    fn query<'b>(&self, ctx: &Context<'b>, env: Env<'b, '_>) -> Result<Vec<Context<'b>>, Error>;
}

/// One alternative of a JSONPath expression: a head identifier plus a
/// sequence of segments
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Query {
    /// The kind of query, root (`$`), or current (`@`)
    pub kind: QueryKind,
    /// The segments constituting the query
    pub segments: Vec<QuerySegment>,
}

impl Query {
    /// Is this query guaranteed to select at most one node?
    ///
    /// Only `Root`/`Current` heads followed exclusively by single-name or
    /// single-index child segments qualify.
    pub fn is_singular(&self) -> bool {
        for s in &self.segments {
            if s.is_descendent() {
                return false;
            }
            if !s.segment.is_singular() {
                return false;
            }
        }
        true
    }

    /// Does any segment of this query contain a script selector?
    pub(crate) fn has_script(&self) -> bool {
        self.segments.iter().any(|s| match &s.segment {
            Segment::Selectors(selectors) => selectors
                .iter()
                .any(|sel| matches!(sel, Selector::Script(_))),
            _ => false,
        })
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            QueryKind::Root => write!(f, "$")?,
            QueryKind::Current => write!(f, "@")?,
        }
        for s in &self.segments {
            write!(f, "{s}")?;
        }
        Ok(())
    }
}

/// The kind of query
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub enum QueryKind {
    /// A query against the root of a JSON document, i.e., with `$`
    #[default]
    Root,
    /// A query against the current node within a JSON document, i.e., with
    /// `@`
    Current,
}

impl Queryable for Query {
    #[cfg_attr(feature = "trace", tracing::instrument(name = "Query", level = "trace", parent = None, skip(env), ret))]
    fn query<'b>(&self, ctx: &Context<'b>, env: Env<'b, '_>) -> Result<Vec<Context<'b>>, Error> {
        let mut contexts = match self.kind {
            QueryKind::Root => vec![Context::root(env.root)],
            QueryKind::Current => vec![ctx.clone()],
        };
        for segment in &self.segments {
            let mut next = Vec::new();
            for c in &contexts {
                next.append(&mut segment.query(c, env)?);
            }
            contexts = next;
            if contexts.is_empty() {
                break;
            }
        }
        Ok(contexts)
    }
}
