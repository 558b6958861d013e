//! Index selectors for selecting array elements in JSONPath
use crate::error::Error;
use crate::location::PathElement;
use crate::spec::context::{Context, Env};
use crate::spec::query::Queryable;

/// Select a single array element
///
/// Negative indices count from the end of the array; anything out of bounds
/// selects nothing.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Index(pub isize);

impl Index {
    /// Normalize against an array length, yielding `None` when out of bounds
    pub(crate) fn normalize(&self, len: usize) -> Option<usize> {
        if self.0 < 0 {
            self.0
                .checked_abs()
                .and_then(|i| usize::try_from(i).ok())
                .and_then(|i| len.checked_sub(i))
        } else {
            usize::try_from(self.0).ok().filter(|i| *i < len)
        }
    }
}

impl std::fmt::Display for Index {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{index}", index = self.0)
    }
}

impl Queryable for Index {
    #[cfg_attr(feature = "trace", tracing::instrument(name = "Query Index", level = "trace", parent = None, skip(_env), ret))]
    fn query<'b>(&self, ctx: &Context<'b>, _env: Env<'b, '_>) -> Result<Vec<Context<'b>>, Error> {
        if let Some(list) = ctx.borrowed().and_then(|value| value.as_array()) {
            Ok(self
                .normalize(list.len())
                .and_then(|i| list.get(i).map(|v| ctx.child(PathElement::Index(i), v)))
                .into_iter()
                .collect())
        } else {
            Ok(vec![])
        }
    }
}

impl From<isize> for Index {
    fn from(i: isize) -> Self {
        Self(i)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::options::QueryOptions;
    use crate::spec::context::{Context, Env};
    use crate::spec::query::Queryable;

    use super::Index;

    #[test]
    fn positive_and_negative_indices() {
        let value = json!(["a", "b", "c"]);
        let opts = QueryOptions::default();
        let env = Env::new(&value, &opts);
        let ctx = Context::root(&value);
        let nodes = Index(0).query(&ctx, env).unwrap();
        assert_eq!(nodes[0].node(), &json!("a"));
        assert_eq!(nodes[0].loc.to_string(), "$[0]");
        let nodes = Index(-1).query(&ctx, env).unwrap();
        assert_eq!(nodes[0].node(), &json!("c"));
        assert_eq!(nodes[0].loc.to_string(), "$[2]");
    }

    #[test]
    fn out_of_bounds_yields_empty() {
        let value = json!(["a", "b", "c"]);
        let opts = QueryOptions::default();
        let env = Env::new(&value, &opts);
        let ctx = Context::root(&value);
        assert!(Index(3).query(&ctx, env).unwrap().is_empty());
        assert!(Index(-4).query(&ctx, env).unwrap().is_empty());
    }

    #[test]
    fn index_on_object_yields_empty() {
        let value = json!({"0": "a"});
        let opts = QueryOptions::default();
        let env = Env::new(&value, &opts);
        assert!(Index(0)
            .query(&Context::root(&value), env)
            .unwrap()
            .is_empty());
    }
}
