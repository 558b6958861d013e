//! This crate allows you to use JSONPath queries to extract nodelists from
//! a [`serde_json::Value`].
//!
//! The query syntax is a superset of the IETF JSONPath standard
//! ([RFC 9535][rfc]): on top of the standard selectors it supports the
//! parent (`^`) and property-name (`~`) segments, type selectors
//! (`@number()`, `@string()`, ...), host-evaluated script selectors
//! (`[(...)]`), the `.(a, b)` property-group shorthand, and top-level
//! alternation with `|`.
//!
//! [rfc]: https://www.rfc-editor.org/rfc/rfc9535.html
//!
//! # Features
//!
//! This crate provides three key abstractions:
//!
//! * The [`JsonPath`] struct, which represents a parsed JSONPath query.
//! * The [`NodeList`] struct, which represents the result of a JSONPath
//!   query performed on a [`serde_json::Value`] using the
//!   [`JsonPath::query`] method.
//! * The [`LocatedNodeList`] struct, which is similar to [`NodeList`], but
//!   pairs each node with its location in the document — as a
//!   [`NormalizedPath`] — along with its parent and full ancestor chain,
//!   and is produced by the [`JsonPath::query_located`] method.
//!
//! In addition, [`JsonPath::query_with`] evaluates a query under explicit
//! [`QueryOptions`], projecting each result into a configurable shape
//! (value, canonical path, JSON Pointer, parent, parent property, ancestor
//! chain, or a composite record), and the [`JsonPathExt`] trait extends
//! [`serde_json::Value`] with a [`json_path`][JsonPathExt::json_path]
//! method.
//!
//! # Usage
//!
//! ## Parsing
//!
//! JSONPath query strings can be parsed using the [`JsonPath`] type:
//!
//! ```rust
//! use serde_json_path_plus::JsonPath;
//!
//! # fn main() -> Result<(), serde_json_path_plus::ParseError> {
//! let path = JsonPath::parse("$.foo.bar")?;
//! # Ok(())
//! # }
//! ```
//!
//! Parsing is the only fallible step in the common case; a parsed path can
//! be reused, shared across threads, and serialized back to its canonical
//! form with [`ToString::to_string`].
//!
//! ## Querying for single nodes
//!
//! For queries that are expected to return a single node, use either the
//! [`exactly_one`][NodeList::exactly_one] or the
//! [`at_most_one`][NodeList::at_most_one] method:
//!
//! ```rust
//! use serde_json::json;
//! # use serde_json_path_plus::JsonPath;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let value = json!({ "foo": { "bar": ["baz", 42] } });
//! let path = JsonPath::parse("$.foo.bar[0]")?;
//! let nodes = path.query(&value)?;
//! let node = nodes.exactly_one()?;
//! assert_eq!(node, "baz");
//! # Ok(())
//! # }
//! ```
//!
//! JSONPath allows access via reverse indices:
//!
//! ```rust
//! # use serde_json::json;
//! # use serde_json_path_plus::JsonPath;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let value = json!([1, 2, 3, 4, 5]);
//! let path = JsonPath::parse("$[-1]")?;
//! let nodes = path.query(&value)?;
//! let node = nodes.at_most_one()?;
//! assert_eq!(node, Some(&json!(5)));
//! # Ok(())
//! # }
//! ```
//!
//! ## Querying for multiple nodes
//!
//! For queries that are expected to return zero or many nodes, use the
//! [`all`][NodeList::all] method:
//!
//! ```rust
//! # use serde_json::json;
//! # use serde_json_path_plus::JsonPath;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let value = json!({ "foo": { "bar": ["baz", "bop"] } });
//! let path = JsonPath::parse("$.foo.bar[*]")?;
//! let nodes = path.query(&value)?.all();
//! assert_eq!(nodes, vec!["baz", "bop"]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Locations, parents, and projections
//!
//! Every selected node knows where it lives:
//!
//! ```rust
//! # use serde_json::json;
//! # use serde_json_path_plus::JsonPath;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let value = json!({"foo": {"bar": [1, 2, 3]}});
//! let path = JsonPath::parse("$..[?(@ == 2)]")?;
//! let located = path.query_located(&value)?;
//! let node = located.exactly_one()?;
//! assert_eq!(node.location().to_string(), "$['foo']['bar'][1]");
//! assert_eq!(node.location().as_json_pointer(), "/foo/bar/1");
//! assert_eq!(node.parent(), Some(&json!([1, 2, 3])));
//! # Ok(())
//! # }
//! ```
//!
//! The same information is available in owned form through
//! [`JsonPath::query_with`] and [`QueryOptions`]:
//!
//! ```rust
//! # use serde_json::json;
//! # use serde_json_path_plus::{JsonPath, QueryOptions, ResultType};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let value = json!({"store": {"book": [{"price": 8.95}, {"price": 12.99}]}});
//! let path = JsonPath::parse("$.store.book[?(@.price < 10)]")?;
//! let opts = QueryOptions::default().with_result_type(ResultType::Path);
//! let paths = path.query_with(&value, &opts)?;
//! assert_eq!(paths, vec![json!("$['store']['book'][0]")]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Extension segments
//!
//! The parent and property-name segments step upward and sideways:
//!
//! ```rust
//! # use serde_json::json;
//! # use serde_json_path_plus::JsonPath;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let value = json!({"a": {"x": 1}, "b": {"x": 2}});
//! // the objects containing an `x`
//! let parents = JsonPath::parse("$..x^")?.query(&value)?;
//! assert_eq!(parents.len(), 2);
//! // the key names of the root object
//! let keys = JsonPath::parse("$.*~")?.query(&value)?;
//! assert_eq!(keys.all(), vec!["a", "b"]);
//! # Ok(())
//! # }
//! ```
//!
//! Script segments are parsed natively but evaluated only through a hook
//! the host installs with
//! [`QueryOptions::with_script_evaluator`][QueryOptions::with_script_evaluator];
//! no script language is embedded in the engine.
//!
//! # Unsupported features
//!
//! The engine is synchronous and purely computational: it performs no I/O,
//! never mutates the queried document, and does not resolve references to
//! other documents.
#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]

mod error;
mod ext;
mod format;
pub mod location;
mod node;
mod options;
mod parser;
pub mod spec;
mod path;

use serde_json::Value;

pub use error::{ConfigError, Error, EvalError, ParseError};
pub use ext::JsonPathExt;
pub use location::{NormalizedPath, PathElement};
pub use node::{AtMostOneError, ExactlyOneError, LocatedNode, LocatedNodeList, NodeList};
pub use options::{FilterMode, Flatten, QueryOptions, ResultType, ScriptEvaluator};
pub use path::JsonPath;

/// Parse a JSONPath query string
///
/// Equivalent to [`JsonPath::parse`].
pub fn parse(path_str: &str) -> Result<JsonPath, ParseError> {
    JsonPath::parse(path_str)
}

/// Parse and evaluate a JSONPath query in one step, projecting the results
/// per the given options
///
/// The engine is synchronous and CPU-bound; hosts wanting an asynchronous
/// surface can wrap this call in a blocking task.
///
/// # Example
/// ```rust
/// # use serde_json::json;
/// # use serde_json_path_plus::{query, QueryOptions, ResultType};
/// # fn main() -> Result<(), serde_json_path_plus::Error> {
/// let value = json!({"foo": [10, 20]});
/// let opts = QueryOptions::default().with_result_type(ResultType::Pointer);
/// assert_eq!(
///     query("$.foo[*]", &value, &opts)?,
///     vec![json!("/foo/0"), json!("/foo/1")],
/// );
/// # Ok(())
/// # }
/// ```
pub fn query(path_str: &str, value: &Value, opts: &QueryOptions) -> Result<Vec<Value>, Error> {
    let path = JsonPath::parse(path_str)?;
    path.query_with(value, opts)
}

/// Return the canonical bracket-quoted form of a path
///
/// The canonical form parses back to a structurally equal path, which makes
/// it suitable for cache keys and equality checks.
///
/// # Example
/// ```rust
/// # use serde_json_path_plus::normalize;
/// # fn main() -> Result<(), serde_json_path_plus::ParseError> {
/// assert_eq!(normalize("$.store.book[0]")?, "$['store']['book'][0]");
/// # Ok(())
/// # }
/// ```
pub fn normalize(path_str: &str) -> Result<String, ParseError> {
    Ok(JsonPath::parse(path_str)?.to_string())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{normalize, query, QueryOptions};

    #[test]
    fn free_functions() {
        let value = json!({"a": [1, 2]});
        let opts = QueryOptions::default();
        assert_eq!(query("$.a[*]", &value, &opts).unwrap(), vec![json!(1), json!(2)]);
        assert_eq!(normalize("$.a[ 0 ]").unwrap(), "$['a'][0]");
        assert_eq!(normalize("").unwrap(), "$");
    }
}
