//! Types representing segments in JSONPath
use crate::error::{Error, EvalError};
use crate::location::PathElement;

use super::context::{Context, Env};
use super::query::Queryable;
use super::selector::Selector;
use super::ty::TypePredicate;

/// A segment of a JSONPath query
#[derive(Debug, PartialEq, Clone)]
pub struct QuerySegment {
    /// The kind of segment
    pub kind: QuerySegmentKind,
    /// The segment
    pub segment: Segment,
}

impl QuerySegment {
    /// Is this a normal child segment
    pub fn is_child(&self) -> bool {
        matches!(self.kind, QuerySegmentKind::Child)
    }

    /// Is this a recursive descent segment
    pub fn is_descendent(&self) -> bool {
        !self.is_child()
    }
}

impl std::fmt::Display for QuerySegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if matches!(self.kind, QuerySegmentKind::Descendant) {
            write!(f, "..")?;
        }
        write!(f, "{segment}", segment = self.segment)
    }
}

/// The kind of query segment
#[derive(Debug, PartialEq, Clone)]
pub enum QuerySegmentKind {
    /// A normal child
    ///
    /// Addresses the direct descendent of the preceding segment
    Child,
    /// A descendant child
    ///
    /// Addresses all descendant children of the preceding segment,
    /// recursively
    Descendant,
}

impl Queryable for QuerySegment {
    #[cfg_attr(feature = "trace", tracing::instrument(name = "Query Path Segment", level = "trace", parent = None, skip(env), ret))]
    fn query<'b>(&self, ctx: &Context<'b>, env: Env<'b, '_>) -> Result<Vec<Context<'b>>, Error> {
        let mut result = self.segment.query(ctx, env)?;
        if matches!(self.kind, QuerySegmentKind::Descendant) {
            result.append(&mut descend(self, ctx, env)?);
        }
        Ok(result)
    }
}

/// Visit the children of `ctx` in container order, applying the whole
/// descendant segment at each; a node is always visited before its own
/// children
#[cfg_attr(feature = "trace", tracing::instrument(name = "Descend", level = "trace", parent = None, skip(env), ret))]
fn descend<'b>(
    segment: &QuerySegment,
    ctx: &Context<'b>,
    env: Env<'b, '_>,
) -> Result<Vec<Context<'b>>, Error> {
    let mut result = Vec::new();
    if let Some(value) = ctx.borrowed() {
        if let Some(list) = value.as_array() {
            for (i, v) in list.iter().enumerate() {
                let child = ctx.child(PathElement::Index(i), v);
                result.append(&mut segment.query(&child, env)?);
            }
        } else if let Some(obj) = value.as_object() {
            for (k, v) in obj {
                let child = ctx.child(PathElement::Name(k.as_str()), v);
                result.append(&mut segment.query(&child, env)?);
            }
        }
    }
    Ok(result)
}

/// Represents the different forms of JSONPath segment
#[derive(Debug, PartialEq, Clone)]
pub enum Segment {
    /// A bracketed selector list
    ///
    /// The dot shorthands (`.name`, `.*`) and the property-group sugar
    /// (`.(a, b)`) desugar to this form when parsed, so the canonical
    /// bracket notation round-trips structurally.
    Selectors(Vec<Selector>),
    /// The parent step, `^`
    Parent,
    /// The property-name step, `~`
    Keys,
    /// A type-selector step, `@name()`
    ///
    /// The name is validated by the evaluator, not the parser.
    TypeFilter(String),
    /// The inner segment of a bare `..`, selecting the visited node itself
    Identity,
}

impl Segment {
    /// Does this segment extract at most a single node
    pub fn is_singular(&self) -> bool {
        match self {
            Segment::Selectors(selectors) => {
                if selectors.len() > 1 {
                    return false;
                }
                selectors.first().map(Selector::is_singular).unwrap_or(true)
            }
            _ => false,
        }
    }

    /// Optionally produce self as a slice of selectors
    pub fn as_selectors(&self) -> Option<&[Selector]> {
        match self {
            Segment::Selectors(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    /// Optionally produce self as a single name selector
    pub fn as_single_name(&self) -> Option<&str> {
        match self {
            Segment::Selectors(v) if v.len() == 1 => match &v[0] {
                Selector::Name(n) => Some(n.as_str()),
                _ => None,
            },
            _ => None,
        }
    }
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Segment::Selectors(selectors) => {
                write!(f, "[")?;
                for (i, s) in selectors.iter().enumerate() {
                    write!(
                        f,
                        "{s}{comma}",
                        comma = if i == selectors.len() - 1 { "" } else { "," }
                    )?;
                }
                write!(f, "]")?;
            }
            Segment::Parent => write!(f, "^")?,
            Segment::Keys => write!(f, "~")?,
            Segment::TypeFilter(name) => write!(f, "@{name}()")?,
            Segment::Identity => {}
        }
        Ok(())
    }
}

impl Queryable for Segment {
    #[cfg_attr(feature = "trace", tracing::instrument(name = "Query Segment", level = "trace", parent = None, skip(env), ret))]
    fn query<'b>(&self, ctx: &Context<'b>, env: Env<'b, '_>) -> Result<Vec<Context<'b>>, Error> {
        match self {
            Segment::Selectors(selectors) => {
                let mut result = Vec::new();
                for selector in selectors {
                    result.append(&mut selector.query(ctx, env)?);
                }
                Ok(result)
            }
            Segment::Parent => Ok(ctx.parent().into_iter().collect()),
            Segment::Keys => Ok(keys_of(ctx)),
            Segment::TypeFilter(name) => match TypePredicate::from_name(name) {
                Some(pred) => {
                    if pred.matches(ctx.node(), env.opts.other_type.as_deref()) {
                        Ok(vec![ctx.clone()])
                    } else {
                        Ok(vec![])
                    }
                }
                None if env.opts.ignore_eval_errors => Ok(vec![]),
                None => Err(EvalError::UnknownTypePredicate { name: name.clone() }.into()),
            },
            Segment::Identity => Ok(vec![ctx.clone()]),
        }
    }
}

/// The property-name step
///
/// A context selected under a key yields that key; an unkeyed container
/// context expands to one payload per key, with array indices rendered as
/// decimal strings. Unkeyed scalars yield nothing.
fn keys_of<'b>(ctx: &Context<'b>) -> Vec<Context<'b>> {
    if !ctx.loc.is_empty() {
        return ctx.own_key().into_iter().collect();
    }
    let mut result = Vec::new();
    if let Some(value) = ctx.borrowed() {
        if let Some(list) = value.as_array() {
            for i in 0..list.len() {
                result.push(ctx.child_key(PathElement::Index(i), i.to_string()));
            }
        } else if let Some(obj) = value.as_object() {
            for k in obj.keys() {
                result.push(ctx.child_key(PathElement::Name(k.as_str()), k.clone()));
            }
        }
    }
    result
}
