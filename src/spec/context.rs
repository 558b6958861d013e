//! The evaluation context threaded through every segment
use std::borrow::Cow;

use serde_json::Value;

use crate::location::{NormalizedPath, PathElement};
use crate::options::QueryOptions;

/// Per-query evaluation environment: the document root and the caller's
/// options
#[derive(Debug, Clone, Copy)]
pub(crate) struct Env<'b, 'o> {
    pub(crate) root: &'b Value,
    pub(crate) opts: &'o QueryOptions,
}

impl<'b, 'o> Env<'b, 'o> {
    pub(crate) fn new(root: &'b Value, opts: &'o QueryOptions) -> Self {
        Self { root, opts }
    }
}

/// A candidate node under evaluation, together with its location and the
/// chain of values leading to it from the document root
///
/// `ancestors[i]` is the value addressed by `loc[..i]`, so the two always
/// have the same length; the immediate parent is the last ancestor and the
/// parent property is the last location element. The node is borrowed from
/// the queried document for every data payload; only property-name payloads
/// (the key strings produced by `~`) own their value, and those are scalars,
/// so they are never expanded further.
#[derive(Debug, Clone)]
pub(crate) struct Context<'b> {
    pub(crate) node: Cow<'b, Value>,
    pub(crate) loc: NormalizedPath<'b>,
    pub(crate) ancestors: Vec<&'b Value>,
    pub(crate) is_property: bool,
}

impl<'b> Context<'b> {
    /// The context for the root of a document (or of a filter sub-query)
    pub(crate) fn root(value: &'b Value) -> Self {
        Self {
            node: Cow::Borrowed(value),
            loc: NormalizedPath::default(),
            ancestors: Vec::new(),
            is_property: false,
        }
    }

    /// The current value
    pub(crate) fn node(&self) -> &Value {
        self.node.as_ref()
    }

    /// The current value, if it is borrowed from the document
    ///
    /// Property-name payloads return `None`; they have no children to offer
    /// anyway.
    pub(crate) fn borrowed(&self) -> Option<&'b Value> {
        match self.node {
            Cow::Borrowed(v) => Some(v),
            Cow::Owned(_) => None,
        }
    }

    /// The immediate parent value, if any
    pub(crate) fn parent_value(&self) -> Option<&'b Value> {
        self.ancestors.last().copied()
    }

    /// A child of the current value, reached via `elem`
    pub(crate) fn child(&self, elem: PathElement<'b>, value: &'b Value) -> Self {
        let mut ancestors = self.ancestors.clone();
        if let Cow::Borrowed(v) = self.node {
            ancestors.push(v);
        }
        Self {
            node: Cow::Borrowed(value),
            loc: self.loc.clone_and_push(elem),
            ancestors,
            is_property: false,
        }
    }

    /// The context one level up, or `None` at the document root
    pub(crate) fn parent(&self) -> Option<Self> {
        let mut loc = self.loc.clone();
        loc.pop()?;
        let mut ancestors = self.ancestors.clone();
        let value = ancestors.pop()?;
        Some(Self {
            node: Cow::Borrowed(value),
            loc,
            ancestors,
            is_property: false,
        })
    }

    /// A property-name payload for the key of a child of the current value
    pub(crate) fn child_key(&self, elem: PathElement<'b>, key: String) -> Self {
        let mut ancestors = self.ancestors.clone();
        if let Cow::Borrowed(v) = self.node {
            ancestors.push(v);
        }
        Self {
            node: Cow::Owned(Value::String(key)),
            loc: self.loc.clone_and_push(elem),
            ancestors,
            is_property: true,
        }
    }

    /// A property-name payload for the key under which this context itself
    /// was selected, or `None` at the document root
    pub(crate) fn own_key(&self) -> Option<Self> {
        let key = match self.loc.last()? {
            PathElement::Name(n) => n.to_string(),
            PathElement::Index(i) => i.to_string(),
        };
        Some(Self {
            node: Cow::Owned(Value::String(key)),
            loc: self.loc.clone(),
            ancestors: self.ancestors.clone(),
            is_property: true,
        })
    }
}
