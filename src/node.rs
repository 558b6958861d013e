//! Types representing the nodes selected by a query
use std::borrow::Cow;

use serde::Serialize;
use serde_json::Value;

use crate::location::{NormalizedPath, PathElement};
use crate::spec::context::Context;

/// A list of nodes resulting from a JSONPath query
///
/// Nodes are borrowed from the queried [`serde_json::Value`] wherever
/// possible; only property-name payloads (produced by the `~` segment) own
/// their value, since a key name is not itself a node of the document.
#[derive(Debug, Default, PartialEq, Serialize, Clone)]
pub struct NodeList<'a>(pub(crate) Vec<Cow<'a, Value>>);

impl<'a> NodeList<'a> {
    /// Extract _at most_ one node from a [`NodeList`]
    ///
    /// This is intended for queries that are expected to optionally yield a
    /// single node.
    pub fn at_most_one(&self) -> Result<Option<&Value>, AtMostOneError> {
        if self.0.len() > 1 {
            Err(AtMostOneError(self.0.len()))
        } else {
            Ok(self.0.first().map(Cow::as_ref))
        }
    }

    /// Extract _exactly_ one node from a [`NodeList`]
    ///
    /// This is intended for queries that are expected to yield exactly one
    /// node.
    pub fn exactly_one(&self) -> Result<&Value, ExactlyOneError> {
        if self.0.is_empty() {
            Err(ExactlyOneError::Empty)
        } else if self.0.len() > 1 {
            Err(ExactlyOneError::MoreThanOne(self.0.len()))
        } else {
            Ok(self.0[0].as_ref())
        }
    }

    /// Extract all nodes yielded by the query, as owned values
    pub fn all(self) -> Vec<Value> {
        self.0.into_iter().map(Cow::into_owned).collect()
    }

    /// Get the length of a [`NodeList`]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if a [`NodeList`] is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get an iterator over the nodes in a [`NodeList`]
    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.0.iter().map(Cow::as_ref)
    }

    /// Returns the first node in the [`NodeList`], or `None` if it is empty
    pub fn first(&self) -> Option<&Value> {
        self.0.first().map(Cow::as_ref)
    }

    /// Returns the last node in the [`NodeList`], or `None` if it is empty
    pub fn last(&self) -> Option<&Value> {
        self.0.last().map(Cow::as_ref)
    }

    /// Returns the node at the given index in the [`NodeList`], or `None` if
    /// the given index is out of bounds
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index).map(Cow::as_ref)
    }
}

impl<'a> From<Vec<Context<'a>>> for NodeList<'a> {
    fn from(contexts: Vec<Context<'a>>) -> Self {
        Self(contexts.into_iter().map(|ctx| ctx.node).collect())
    }
}

impl<'a> IntoIterator for NodeList<'a> {
    type Item = Cow<'a, Value>;

    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Error produced when expecting no more than one node from a query
#[derive(Debug, thiserror::Error)]
#[error("nodelist expected to contain at most one entry, but instead contains {0} entries")]
pub struct AtMostOneError(pub usize);

/// Error produced when expecting exactly one node from a query
#[derive(Debug, thiserror::Error)]
pub enum ExactlyOneError {
    /// The query resulted in an empty [`NodeList`]
    #[error("nodelist expected to contain one entry, but is empty")]
    Empty,
    /// The query resulted in a [`NodeList`] containing more than one node
    #[error("nodelist expected to contain one entry, but instead contains {0} entries")]
    MoreThanOne(usize),
}

impl ExactlyOneError {
    /// Check that it is the `Empty` variant
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Check that it is the `MoreThanOne` variant
    pub fn is_more_than_one(&self) -> bool {
        self.as_more_than_one().is_some()
    }

    /// Extract the number of nodes, if it was more than one, or `None`
    /// otherwise
    pub fn as_more_than_one(&self) -> Option<usize> {
        match self {
            ExactlyOneError::Empty => None,
            ExactlyOneError::MoreThanOne(u) => Some(*u),
        }
    }
}

/// A node selected by a query, along with its location and ancestry
#[derive(Debug, Clone)]
pub struct LocatedNode<'a> {
    pub(crate) loc: NormalizedPath<'a>,
    pub(crate) node: Cow<'a, Value>,
    pub(crate) ancestors: Vec<&'a Value>,
    pub(crate) is_property: bool,
}

impl<'a> LocatedNode<'a> {
    /// Get the location of the node as a [`NormalizedPath`]
    pub fn location(&self) -> &NormalizedPath<'a> {
        &self.loc
    }

    /// Take the location of the node as a [`NormalizedPath`]
    pub fn to_location(self) -> NormalizedPath<'a> {
        self.loc
    }

    /// Get the node itself
    pub fn node(&self) -> &Value {
        self.node.as_ref()
    }

    /// Take the node itself, as an owned value
    pub fn to_node(self) -> Value {
        self.node.into_owned()
    }

    /// The value containing this node, or `None` for the document root
    pub fn parent(&self) -> Option<&'a Value> {
        self.ancestors.last().copied()
    }

    /// The property or index under which this node lives in its parent, or
    /// `None` for the document root
    pub fn parent_property(&self) -> Option<&PathElement<'a>> {
        self.loc.last()
    }

    /// Every value on the way from the document root down to the immediate
    /// parent of this node, root first
    pub fn ancestors(&self) -> &[&'a Value] {
        &self.ancestors
    }

    /// Is this node a property name produced by the `~` segment, rather
    /// than a value of the queried document?
    pub fn is_property_name(&self) -> bool {
        self.is_property
    }
}

impl<'a> From<Context<'a>> for LocatedNode<'a> {
    fn from(ctx: Context<'a>) -> Self {
        Self {
            loc: ctx.loc,
            node: ctx.node,
            ancestors: ctx.ancestors,
            is_property: ctx.is_property,
        }
    }
}

impl<'a> Serialize for LocatedNode<'a> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("LocatedNode", 2)?;
        s.serialize_field("loc", &self.loc)?;
        s.serialize_field("node", self.node())?;
        s.end()
    }
}

/// A list of nodes along with their locations, resulting from a JSONPath
/// query
#[derive(Debug, Default, Clone, Serialize)]
pub struct LocatedNodeList<'a>(Vec<LocatedNode<'a>>);

impl<'a> LocatedNodeList<'a> {
    /// Extract _at most_ one entry
    pub fn at_most_one(&self) -> Result<Option<&LocatedNode<'a>>, AtMostOneError> {
        if self.0.len() > 1 {
            Err(AtMostOneError(self.0.len()))
        } else {
            Ok(self.0.first())
        }
    }

    /// Extract _exactly_ one entry
    pub fn exactly_one(&self) -> Result<&LocatedNode<'a>, ExactlyOneError> {
        if self.0.is_empty() {
            Err(ExactlyOneError::Empty)
        } else if self.0.len() > 1 {
            Err(ExactlyOneError::MoreThanOne(self.0.len()))
        } else {
            Ok(&self.0[0])
        }
    }

    /// Extract all located nodes yielded by the query
    pub fn all(self) -> Vec<LocatedNode<'a>> {
        self.0
    }

    /// Get the length of a [`LocatedNodeList`]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if a [`LocatedNodeList`] is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get an iterator over a [`LocatedNodeList`]
    ///
    /// Note that [`LocatedNodeList`] also implements [`IntoIterator`].
    pub fn iter(&self) -> std::slice::Iter<'_, LocatedNode<'a>> {
        self.0.iter()
    }

    /// Get an iterator over the locations of nodes within a
    /// [`LocatedNodeList`]
    pub fn locations(&self) -> impl Iterator<Item = &NormalizedPath<'a>> {
        self.0.iter().map(LocatedNode::location)
    }

    /// Get an iterator over the nodes within a [`LocatedNodeList`]
    pub fn nodes(&self) -> impl Iterator<Item = &Value> {
        self.0.iter().map(LocatedNode::node)
    }

    /// Returns the first entry, or `None` if the list is empty
    pub fn first(&self) -> Option<&LocatedNode<'a>> {
        self.0.first()
    }

    /// Returns the last entry, or `None` if the list is empty
    pub fn last(&self) -> Option<&LocatedNode<'a>> {
        self.0.last()
    }

    /// Returns the entry at the given index, or `None` if the index is out
    /// of bounds
    pub fn get(&self, index: usize) -> Option<&LocatedNode<'a>> {
        self.0.get(index)
    }
}

impl<'a> From<Vec<Context<'a>>> for LocatedNodeList<'a> {
    fn from(contexts: Vec<Context<'a>>) -> Self {
        Self(contexts.into_iter().map(LocatedNode::from).collect())
    }
}

impl<'a> IntoIterator for LocatedNodeList<'a> {
    type Item = LocatedNode<'a>;

    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
