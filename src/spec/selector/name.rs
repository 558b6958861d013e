//! Name selectors for selecting object keys in JSONPath
use crate::error::Error;
use crate::location::{escape_name, PathElement};
use crate::spec::context::{Context, Env};
use crate::spec::query::Queryable;

/// Select a single JSON object key
///
/// Presence is tested with own-property semantics: the key must exist on the
/// object itself.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Name(pub String);

impl Name {
    /// Get the name as a `&str`
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{name}'", name = escape_name(&self.0))
    }
}

impl Queryable for Name {
    #[cfg_attr(feature = "trace", tracing::instrument(name = "Query Name", level = "trace", parent = None, skip(_env), ret))]
    fn query<'b>(&self, ctx: &Context<'b>, _env: Env<'b, '_>) -> Result<Vec<Context<'b>>, Error> {
        if let Some((k, v)) = ctx
            .borrowed()
            .and_then(|value| value.as_object())
            .and_then(|obj| obj.get_key_value(&self.0))
        {
            Ok(vec![ctx.child(PathElement::Name(k.as_str()), v)])
        } else {
            Ok(vec![])
        }
    }
}

impl From<&str> for Name {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}
