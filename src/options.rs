//! Per-query configuration
//!
//! Everything is passed per call; the engine keeps no process-wide state.
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// The shape each query result is projected into by
/// [`JsonPath::query_with`][crate::JsonPath::query_with]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ResultType {
    /// The matched JSON value itself
    #[default]
    Value,
    /// The canonical bracket-quoted path string, e.g. `$['store']['book'][0]`
    Path,
    /// The RFC 6901 JSON Pointer string, e.g. `/store/book/0`
    Pointer,
    /// The JSON value containing the match
    Parent,
    /// The property name or array index leading from the parent to the match
    ParentProperty,
    /// The full ancestor chain, root first, as `{parent, parentProperty}`
    /// records
    ParentChain,
    /// A composite record carrying every field above
    All,
}

/// How filter segments (`[?(...)]`) are applied to a context
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// Expand the context over its children and select the candidates that
    /// satisfy the predicate. Comparison semantics are RFC 9535 strict.
    #[default]
    Rfc,
    /// Same expansion model as [`FilterMode::Rfc`], but with the legacy
    /// comparison rule that treats a missing value as equal to `0`.
    JsonPath,
    /// Test the context itself against the predicate, without expansion, and
    /// retain it if the predicate holds.
    XPath,
}

impl FilterMode {
    pub(crate) fn nothing_equals_zero(&self) -> bool {
        matches!(self, FilterMode::JsonPath)
    }
}

/// How many levels of nested arrays to flatten in the outer result list
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Flatten {
    /// Leave the result list as produced
    #[default]
    No,
    /// Flatten array results into the outer list, `n` levels deep
    Levels(usize),
}

impl From<bool> for Flatten {
    fn from(b: bool) -> Self {
        if b {
            Self::Levels(1)
        } else {
            Self::No
        }
    }
}

impl From<usize> for Flatten {
    fn from(n: usize) -> Self {
        if n == 0 {
            Self::No
        } else {
            Self::Levels(n)
        }
    }
}

/// Host-supplied evaluator for script segments (`[(...)]`)
///
/// The engine does not embed a script language. A host that wants script
/// segments to work provides one of these; a returned number is used as an
/// index selector, a returned string as a name selector, and anything else
/// selects nothing.
pub trait ScriptEvaluator: Send + Sync {
    /// Evaluate `expr` against the current node and the document root
    fn eval_script(&self, expr: &str, current: &Value, root: &Value) -> Result<Value, String>;
}

impl<F> ScriptEvaluator for F
where
    F: Fn(&str, &Value, &Value) -> Result<Value, String> + Send + Sync,
{
    fn eval_script(&self, expr: &str, current: &Value, root: &Value) -> Result<Value, String> {
        self(expr, current, root)
    }
}

/// Options controlling evaluation and result projection
///
/// The default options evaluate with RFC-strict filter semantics and project
/// bare values:
///
/// ```rust
/// use serde_json_path_plus::{QueryOptions, ResultType};
///
/// let opts = QueryOptions::default().with_result_type(ResultType::Pointer);
/// ```
#[derive(Clone)]
pub struct QueryOptions {
    /// The projection applied to each result
    pub result_type: ResultType,
    /// The filter evaluation semantics
    pub filter_mode: FilterMode,
    /// Swallow filter and script evaluation errors, dropping the offending
    /// items instead of failing the query
    pub ignore_eval_errors: bool,
    /// Permit script segments in the query; when `false`, a query containing
    /// one fails with a configuration error before evaluation
    pub allow_script: bool,
    /// Flattening applied to the outer result list (ignored for
    /// [`ResultType::All`])
    pub flatten: Flatten,
    /// External parent for the document root, used when querying a
    /// sub-document; surfaces in parent projections of root results
    pub parent: Option<Value>,
    /// The property under which the document root lives in the external
    /// parent
    pub parent_property: Option<String>,
    pub(crate) script_evaluator: Option<Arc<dyn ScriptEvaluator>>,
    pub(crate) other_type: Option<Arc<dyn Fn(&Value) -> bool + Send + Sync>>,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            result_type: ResultType::default(),
            filter_mode: FilterMode::default(),
            ignore_eval_errors: false,
            allow_script: true,
            flatten: Flatten::default(),
            parent: None,
            parent_property: None,
            script_evaluator: None,
            other_type: None,
        }
    }
}

impl fmt::Debug for QueryOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryOptions")
            .field("result_type", &self.result_type)
            .field("filter_mode", &self.filter_mode)
            .field("ignore_eval_errors", &self.ignore_eval_errors)
            .field("allow_script", &self.allow_script)
            .field("flatten", &self.flatten)
            .field("parent", &self.parent)
            .field("parent_property", &self.parent_property)
            .field("script_evaluator", &self.script_evaluator.is_some())
            .field("other_type", &self.other_type.is_some())
            .finish()
    }
}

impl QueryOptions {
    /// Create options with all defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the result projection
    pub fn with_result_type(mut self, result_type: ResultType) -> Self {
        self.result_type = result_type;
        self
    }

    /// Set the filter evaluation semantics
    pub fn with_filter_mode(mut self, filter_mode: FilterMode) -> Self {
        self.filter_mode = filter_mode;
        self
    }

    /// Drop items whose filter or script evaluation fails, instead of
    /// failing the whole query
    pub fn ignoring_eval_errors(mut self) -> Self {
        self.ignore_eval_errors = true;
        self
    }

    /// Refuse queries containing script segments
    pub fn without_script(mut self) -> Self {
        self.allow_script = false;
        self
    }

    /// Set result list flattening
    pub fn with_flatten(mut self, flatten: impl Into<Flatten>) -> Self {
        self.flatten = flatten.into();
        self
    }

    /// Seed the root context with an external parent and the property under
    /// which the queried document lives in it
    pub fn with_parent(mut self, parent: Value, property: impl Into<String>) -> Self {
        self.parent = Some(parent);
        self.parent_property = Some(property.into());
        self
    }

    /// Install a host evaluator for script segments
    pub fn with_script_evaluator(mut self, evaluator: impl ScriptEvaluator + 'static) -> Self {
        self.script_evaluator = Some(Arc::new(evaluator));
        self
    }

    /// Install the predicate backing the `@other()` type selector
    pub fn with_other_type(
        mut self,
        predicate: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.other_type = Some(Arc::new(predicate));
        self
    }
}
