//! Type predicates backing the `@name()` selector segments
use serde_json::Value;

/// The set of recognized type predicates
///
/// `@other()` delegates to a user-supplied predicate and matches nothing
/// when none is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypePredicate {
    /// Any JSON number
    Number,
    /// A number whose value is a finite mathematical integer
    Integer,
    /// A JSON string
    String,
    /// `true` or `false`
    Boolean,
    /// `null`
    Null,
    /// A JSON array
    Array,
    /// A JSON object
    Object,
    /// Anything that is not an array, an object, or `null`
    Scalar,
    /// An array or an object
    Nonscalar,
    /// Whatever the configured predicate says
    Other,
}

impl TypePredicate {
    /// Look up a predicate by the name written in the query; `None` for
    /// unrecognized names
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "number" => Some(Self::Number),
            "integer" => Some(Self::Integer),
            "string" => Some(Self::String),
            "boolean" => Some(Self::Boolean),
            "null" => Some(Self::Null),
            "array" => Some(Self::Array),
            "object" => Some(Self::Object),
            "scalar" => Some(Self::Scalar),
            "nonscalar" => Some(Self::Nonscalar),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    /// Test a value against the predicate
    pub(crate) fn matches(
        &self,
        value: &Value,
        other: Option<&(dyn Fn(&Value) -> bool + Send + Sync)>,
    ) -> bool {
        match self {
            TypePredicate::Number => value.is_number(),
            TypePredicate::Integer => match value {
                Value::Number(n) => {
                    n.is_i64()
                        || n.is_u64()
                        || n.as_f64().map(|f| f.is_finite() && f.fract() == 0.0) == Some(true)
                }
                _ => false,
            },
            TypePredicate::String => value.is_string(),
            TypePredicate::Boolean => value.is_boolean(),
            TypePredicate::Null => value.is_null(),
            TypePredicate::Array => value.is_array(),
            TypePredicate::Object => value.is_object(),
            TypePredicate::Scalar => !value.is_array() && !value.is_object() && !value.is_null(),
            TypePredicate::Nonscalar => value.is_array() || value.is_object(),
            TypePredicate::Other => other.map(|pred| pred(value)).unwrap_or(false),
        }
    }
}
