use serde_json::Value;

use crate::{Error, JsonPath, NodeList};

/// Extension trait that allows for JSONPath queries directly on
/// [`serde_json::Value`]
///
/// ## Usage
/// ```rust
/// use serde_json::json;
/// use serde_json_path_plus::{JsonPath, JsonPathExt};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let value = json!({"foo": ["bar", "baz"]});
/// let query = JsonPath::parse("$.foo[*]")?;
/// let nodes = value.json_path(&query)?;
/// assert_eq!(nodes.all(), vec!["bar", "baz"]);
/// # Ok(())
/// # }
/// ```
pub trait JsonPathExt {
    /// Query a [`serde_json::Value`] with a parsed [`JsonPath`]
    fn json_path(&self, path: &JsonPath) -> Result<NodeList, Error>;
}

impl JsonPathExt for Value {
    fn json_path(&self, path: &JsonPath) -> Result<NodeList, Error> {
        path.query(self)
    }
}
