use std::str::FromStr;

use serde::{de::Visitor, Deserialize};
use serde_json::Value;

use crate::error::{ConfigError, Error, ParseError};
use crate::format;
use crate::location::PathElement;
use crate::node::{LocatedNodeList, NodeList};
use crate::options::QueryOptions;
use crate::parser::parse_path_main;
use crate::spec::context::{Context, Env};
use crate::spec::query::{Query, Queryable};
use crate::spec::selector::Selector;

/// A parsed JSONPath query
///
/// This type represents a valid, parsed path expression: a superset of
/// [RFC 9535][rfc] including the parent (`^`) and property-name (`~`)
/// segments, type selectors (`@number()` etc.), script selectors, the
/// `.(a, b)` property-group sugar, and top-level alternation with `|`.
///
/// # Usage
///
/// A `JsonPath` can be parsed directly from an `&str` using the
/// [`parse`][JsonPath::parse] method:
/// ```rust
/// # use serde_json_path_plus::JsonPath;
/// let path = JsonPath::parse("$.foo.*").expect("valid JSONPath");
/// ```
/// It can then be used to query [`serde_json::Value`]'s with the
/// [`query`][JsonPath::query] method:
/// ```rust
/// # use serde_json::json;
/// # use serde_json_path_plus::JsonPath;
/// # fn main() -> Result<(), serde_json_path_plus::Error> {
/// # let path = JsonPath::parse("$.foo.*")?;
/// let value = json!({"foo": [1, 2, 3, 4]});
/// let nodes = path.query(&value)?;
/// assert_eq!(nodes.all(), vec![1, 2, 3, 4]);
/// # Ok(())
/// # }
/// ```
///
/// [rfc]: https://www.rfc-editor.org/rfc/rfc9535.html
#[derive(Debug, PartialEq, Clone)]
pub struct JsonPath(Vec<Query>);

impl JsonPath {
    /// Create a [`JsonPath`] by parsing a valid JSONPath query string
    ///
    /// An empty string is the root query, `$`.
    ///
    /// # Example
    /// ```rust
    /// # use serde_json_path_plus::JsonPath;
    /// let path = JsonPath::parse("$.foo[1:10:2].baz").expect("valid JSONPath");
    /// ```
    pub fn parse(path_str: &str) -> Result<Self, ParseError> {
        let input = path_str.trim();
        let (_, queries) = parse_path_main(input).map_err(|err| match err {
            nom::Err::Error(e) | nom::Err::Failure(e) => ParseError::from((input, e)),
            nom::Err::Incomplete(_) => unreachable!("we do not use streaming parsers"),
        })?;
        Ok(Self(queries))
    }

    /// Is this path guaranteed to select at most one node?
    pub fn is_singular(&self) -> bool {
        self.0.len() == 1 && self.0[0].is_singular()
    }

    fn has_script(&self) -> bool {
        self.0.iter().any(Query::has_script)
    }

    fn evaluate<'b>(
        &self,
        value: &'b Value,
        opts: &QueryOptions,
    ) -> Result<Vec<Context<'b>>, Error> {
        if !opts.allow_script && self.has_script() {
            return Err(ConfigError::ScriptDisabled.into());
        }
        let env = Env::new(value, opts);
        let root = Context::root(value);
        let mut contexts = Vec::new();
        for query in &self.0 {
            if query.is_singular() {
                // Singular alternatives walk the document directly, without
                // the list-of-contexts machinery.
                contexts.extend(walk_singular(query, value));
            } else {
                contexts.append(&mut query.query(&root, env)?);
            }
        }
        Ok(contexts)
    }

    /// Query a [`serde_json::Value`] using this [`JsonPath`]
    ///
    /// # Example
    /// ```rust
    /// # use serde_json::json;
    /// # use serde_json_path_plus::JsonPath;
    /// # fn main() -> Result<(), serde_json_path_plus::Error> {
    /// let path = JsonPath::parse("$.foo[::2]")?;
    /// let value = json!({"foo": [1, 2, 3, 4]});
    /// let nodes = path.query(&value)?;
    /// assert_eq!(nodes.all(), vec![1, 3]);
    /// # Ok(())
    /// # }
    /// ```
    pub fn query<'b>(&self, value: &'b Value) -> Result<NodeList<'b>, Error> {
        let opts = QueryOptions::default();
        Ok(self.evaluate(value, &opts)?.into())
    }

    /// Query a [`serde_json::Value`], keeping the location and ancestry of
    /// every selected node
    ///
    /// # Example
    /// ```rust
    /// # use serde_json::json;
    /// # use serde_json_path_plus::JsonPath;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let value = json!({"foo": {"bar": 1, "baz": 2}});
    /// let path = JsonPath::parse("$.foo.baz")?;
    /// let located = path.query_located(&value)?;
    /// let location = located.exactly_one()?.clone().to_location();
    /// assert_eq!(location.to_string(), "$['foo']['baz']");
    /// # Ok(())
    /// # }
    /// ```
    pub fn query_located<'b>(&self, value: &'b Value) -> Result<LocatedNodeList<'b>, Error> {
        let opts = QueryOptions::default();
        Ok(self.evaluate(value, &opts)?.into())
    }

    /// Query a [`serde_json::Value`] with explicit [`QueryOptions`],
    /// projecting each result into the configured
    /// [`ResultType`][crate::ResultType]
    ///
    /// # Example
    /// ```rust
    /// # use serde_json::json;
    /// # use serde_json_path_plus::{JsonPath, QueryOptions, ResultType};
    /// # fn main() -> Result<(), serde_json_path_plus::Error> {
    /// let value = json!({"foo": {"bar": [1, 2]}});
    /// let path = JsonPath::parse("$.foo.bar[0]")?;
    /// let opts = QueryOptions::default().with_result_type(ResultType::Pointer);
    /// let pointers = path.query_with(&value, &opts)?;
    /// assert_eq!(pointers, vec![json!("/foo/bar/0")]);
    /// # Ok(())
    /// # }
    /// ```
    pub fn query_with(&self, value: &Value, opts: &QueryOptions) -> Result<Vec<Value>, Error> {
        let contexts = self.evaluate(value, opts)?;
        Ok(format::project(&contexts, opts))
    }
}

/// Direct walk for singular alternatives; at most one context comes back
fn walk_singular<'b>(query: &Query, root: &'b Value) -> Option<Context<'b>> {
    let mut ctx = Context::root(root);
    for seg in &query.segments {
        let selectors = seg.segment.as_selectors()?;
        match selectors.first()? {
            Selector::Name(name) => {
                let (k, v) = ctx
                    .borrowed()?
                    .as_object()?
                    .get_key_value(name.as_str())?;
                ctx = ctx.child(PathElement::Name(k.as_str()), v);
            }
            Selector::Index(index) => {
                let list = ctx.borrowed()?.as_array()?;
                let i = index.normalize(list.len())?;
                ctx = ctx.child(PathElement::Index(i), list.get(i)?);
            }
            _ => return None,
        }
    }
    Some(ctx)
}

impl std::fmt::Display for JsonPath {
    /// Format the path in its canonical form: bracket notation with
    /// single-quoted, escaped names, and alternatives joined with `|`
    ///
    /// Parsing the canonical form produces a structurally equal path, so it
    /// is suitable for cache keys and equality checks.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, q) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " | ")?;
            }
            write!(f, "{q}")?;
        }
        Ok(())
    }
}

impl FromStr for JsonPath {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JsonPath::parse(s)
    }
}

impl<'de> Deserialize<'de> for JsonPath {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct JsonPathVisitor;

        impl<'de> Visitor<'de> for JsonPathVisitor {
            type Value = JsonPath;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(formatter, "a string representing a JSONPath query")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                JsonPath::parse(v).map_err(serde::de::Error::custom)
            }
        }

        deserializer.deserialize_str(JsonPathVisitor)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::JsonPath;

    #[test]
    fn test_send() {
        fn assert_send<T: Send>() {}
        assert_send::<JsonPath>();
    }

    #[test]
    fn test_sync() {
        fn assert_sync<T: Sync>() {}
        assert_sync::<JsonPath>();
    }

    #[test]
    fn canonical_display_round_trips() {
        for path in [
            "$.store.book[0].author",
            "$..author",
            "$.store.*",
            "$..book[?(@.isbn)]",
            "$['store']['book'][0,2]",
            "$..book[1:3:1]",
            "$.store^",
            "$.store.*~",
            "$..price@number()",
            "$.a | $.b",
        ] {
            let parsed = JsonPath::parse(path).expect(path);
            let normalized = parsed.to_string();
            let reparsed = JsonPath::parse(&normalized).expect(&normalized);
            assert_eq!(parsed, reparsed, "{path} normalized as {normalized}");
            assert_eq!(normalized, reparsed.to_string());
        }
    }

    #[test]
    fn deserialize_json_path() {
        #[derive(serde::Deserialize)]
        struct Config {
            pub path: JsonPath,
        }
        let config: Config =
            serde_json::from_value(json!({"path": "$.foo.*"})).expect("deserializes");
        assert_eq!(config.path.to_string(), "$['foo'][*]");
    }

    #[test]
    fn singular_fast_path_matches_general_evaluation() {
        let value = json!({"a": {"b": [10, 20, {"c": true}]}});
        let path = JsonPath::parse("$.a.b[-1].c").unwrap();
        assert!(path.is_singular());
        let nodes = path.query(&value).unwrap();
        assert_eq!(nodes.exactly_one().unwrap(), &json!(true));
        let located = path.query_located(&value).unwrap();
        assert_eq!(
            located.exactly_one().unwrap().location().to_string(),
            "$['a']['b'][2]['c']"
        );
    }
}
