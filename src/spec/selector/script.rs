//! Script selectors, evaluated through a host-supplied hook
//!
//! The engine does not embed a script language. A script segment `[(...)]`
//! holds its expression text verbatim; evaluation is delegated to the
//! [`ScriptEvaluator`][crate::ScriptEvaluator] configured in the query
//! options. A numeric result selects by index, a string result selects by
//! name, and anything else selects nothing.
use serde_json::Value;

use crate::error::{ConfigError, Error, EvalError};
use crate::spec::context::{Context, Env};
use crate::spec::query::Queryable;

use super::{absorb, index::Index, name::Name};

/// A script selector, holding the raw expression text as written
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ScriptSelector {
    expr: String,
}

impl ScriptSelector {
    pub(crate) fn new(expr: impl Into<String>) -> Self {
        Self { expr: expr.into() }
    }

    /// The raw expression text, as written inside the parentheses
    pub fn expression(&self) -> &str {
        &self.expr
    }
}

impl std::fmt::Display for ScriptSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({expr})", expr = self.expr)
    }
}

impl Queryable for ScriptSelector {
    #[cfg_attr(feature = "trace", tracing::instrument(name = "Query Script", level = "trace", parent = None, skip(env), ret))]
    fn query<'b>(&self, ctx: &Context<'b>, env: Env<'b, '_>) -> Result<Vec<Context<'b>>, Error> {
        if !env.opts.allow_script {
            return Err(ConfigError::ScriptDisabled.into());
        }
        let Some(evaluator) = &env.opts.script_evaluator else {
            absorb(EvalError::ScriptUnavailable.into(), env)?;
            return Ok(vec![]);
        };
        let selected = match evaluator.eval_script(&self.expr, ctx.node(), env.root) {
            Ok(v) => v,
            Err(message) => {
                absorb(
                    EvalError::Script {
                        expr: self.expr.clone(),
                        message,
                    }
                    .into(),
                    env,
                )?;
                return Ok(vec![]);
            }
        };
        match selected {
            Value::Number(n) => match n.as_i64().and_then(|i| isize::try_from(i).ok()) {
                Some(i) => Index(i).query(ctx, env),
                None => Ok(vec![]),
            },
            Value::String(s) => Name::from(s.as_str()).query(ctx, env),
            _ => Ok(vec![]),
        }
    }
}
