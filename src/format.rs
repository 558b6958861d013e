//! Projection of query results into the shapes requested by the caller
use serde_json::{json, Value};

use crate::location::PathElement;
use crate::options::{Flatten, QueryOptions, ResultType};
use crate::spec::context::Context;

/// Project the final context list into the requested result shape and apply
/// flattening
pub(crate) fn project(contexts: &[Context<'_>], opts: &QueryOptions) -> Vec<Value> {
    let out: Vec<Value> = contexts
        .iter()
        .map(|ctx| match opts.result_type {
            ResultType::Value => ctx.node().clone(),
            ResultType::Path => Value::String(ctx.loc.to_string()),
            ResultType::Pointer => Value::String(ctx.loc.as_json_pointer()),
            ResultType::Parent => parent_of(ctx, opts),
            ResultType::ParentProperty => parent_property_of(ctx, opts),
            ResultType::ParentChain => Value::Array(parent_chain_of(ctx, opts)),
            ResultType::All => json!({
                "value": ctx.node().clone(),
                "path": ctx.loc.to_string(),
                "pointer": ctx.loc.as_json_pointer(),
                "parent": parent_of(ctx, opts),
                "parentProperty": parent_property_of(ctx, opts),
                "parentChain": parent_chain_of(ctx, opts),
            }),
        })
        .collect();
    match opts.flatten {
        // Flattening a composite record would tear it apart.
        _ if matches!(opts.result_type, ResultType::All) => out,
        Flatten::No => out,
        Flatten::Levels(n) => flatten_levels(out, n),
    }
}

fn parent_of(ctx: &Context<'_>, opts: &QueryOptions) -> Value {
    match ctx.parent_value() {
        Some(parent) => parent.clone(),
        None => opts.parent.clone().unwrap_or(Value::Null),
    }
}

fn parent_property_of(ctx: &Context<'_>, opts: &QueryOptions) -> Value {
    match ctx.loc.last() {
        Some(PathElement::Name(n)) => Value::String((*n).to_owned()),
        Some(PathElement::Index(i)) => Value::from(*i),
        None => opts
            .parent_property
            .clone()
            .map(Value::String)
            .unwrap_or(Value::Null),
    }
}

/// One `{parent, parentProperty}` record per ancestor, ordered from the
/// document root down to the immediate parent
fn parent_chain_of(ctx: &Context<'_>, opts: &QueryOptions) -> Vec<Value> {
    ctx.ancestors
        .iter()
        .enumerate()
        .map(|(i, ancestor)| {
            let property = if i == 0 {
                opts.parent_property
                    .clone()
                    .map(Value::String)
                    .unwrap_or(Value::Null)
            } else {
                match ctx.loc.get(i - 1) {
                    Some(PathElement::Name(n)) => Value::String((*n).to_owned()),
                    Some(PathElement::Index(idx)) => Value::from(*idx),
                    None => Value::Null,
                }
            };
            json!({"parent": ancestor, "parentProperty": property})
        })
        .collect()
}

fn flatten_levels(values: Vec<Value>, levels: usize) -> Vec<Value> {
    let mut out = values;
    for _ in 0..levels {
        let mut next = Vec::with_capacity(out.len());
        let mut changed = false;
        for v in out {
            match v {
                Value::Array(items) => {
                    changed = true;
                    next.extend(items);
                }
                other => next.push(other),
            }
        }
        out = next;
        if !changed {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::flatten_levels;

    #[test]
    fn flatten_one_level() {
        let values = vec![json!([1, 2]), json!(3), json!([[4]])];
        assert_eq!(
            flatten_levels(values, 1),
            vec![json!(1), json!(2), json!(3), json!([4])]
        );
    }

    #[test]
    fn flatten_two_levels() {
        let values = vec![json!([[1, 2]]), json!([3])];
        assert_eq!(
            flatten_levels(values, 2),
            vec![json!(1), json!(2), json!(3)]
        );
    }

    #[test]
    fn flatten_stops_when_nothing_changes() {
        let values: Vec<Value> = vec![json!(1), json!("a")];
        assert_eq!(flatten_levels(values.clone(), 10), values);
    }
}
