//! Deep merges over JSON values.
//!
//! Three flavours are used across the build:
//!
//! - [`merge_with_arrays`] concatenates arrays and drops exact duplicates. It
//!   combines the canonical model with project- and plugin-level overrides,
//!   so declared intents append instead of replacing.
//! - [`merge_deep`] is the ordinary merge: maps recurse, everything else is
//!   replaced by the incoming value.
//! - [`merge_reverse`] folds reverse-converted data into an existing model.
//!   Scalars are last-write-wins and containers are unioned, so data that
//!   belongs to other platforms survives.
//!
//! All are total: any pair of values produces a result, conflicts are
//! resolved by the rules above and never reported.

use serde_json::Value;

/// Deep merge where arrays on both sides are concatenated and deduplicated.
///
/// Element order is first-seen: `target` elements, then new `source` ones.
pub fn merge_with_arrays(target: &mut Value, source: &Value) {
    match (target, source) {
        (Value::Object(target), Value::Object(source)) => {
            for (key, value) in source {
                match target.get_mut(key) {
                    Some(existing) => merge_with_arrays(existing, value),
                    None => {
                        target.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (Value::Array(target), Value::Array(source)) => {
            let mut merged: Vec<Value> = Vec::with_capacity(target.len() + source.len());
            for item in target.iter().chain(source.iter()) {
                if !merged.contains(item) {
                    merged.push(item.clone());
                }
            }
            *target = merged;
        }
        (target, source) => *target = source.clone(),
    }
}

/// Ordinary deep merge: maps recurse, scalars and arrays are replaced.
pub fn merge_deep(target: &mut Value, source: &Value) {
    match (target, source) {
        (Value::Object(target), Value::Object(source)) => {
            for (key, value) in source {
                match target.get_mut(key) {
                    Some(existing) => merge_deep(existing, value),
                    None => {
                        target.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (target, source) => *target = source.clone(),
    }
}

/// Merge reverse-converted model data into an existing canonical model.
///
/// Arrays of named objects merge element-wise by `name` (input type values by
/// `value`), other arrays append the elements they lack. An `invocation` or
/// input `type` that is a per-platform map in `target` but a plain name in
/// `source` is stored under `platform`, keeping the other platforms' entries.
pub fn merge_reverse(target: &mut Value, source: &Value, platform: &str) {
    match (target, source) {
        (Value::Object(target), Value::Object(source)) => {
            for (key, value) in source {
                match target.get_mut(key) {
                    Some(existing) => {
                        let per_platform = matches!(key.as_str(), "invocation" | "type")
                            && existing.is_object()
                            && value.is_string();
                        if per_platform {
                            existing[platform] = value.clone();
                        } else {
                            merge_reverse(existing, value, platform);
                        }
                    }
                    None => {
                        target.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (Value::Array(target), Value::Array(source)) => {
            for item in source {
                match target.iter().position(|existing| same_entry(existing, item)) {
                    Some(index) => merge_reverse(&mut target[index], item, platform),
                    None => {
                        if !target.contains(item) {
                            target.push(item.clone());
                        }
                    }
                }
            }
        }
        (target, source) => *target = source.clone(),
    }
}

fn same_entry(a: &Value, b: &Value) -> bool {
    ["name", "value"].iter().any(|key| {
        match (a.get(key).and_then(Value::as_str), b.get(key).and_then(Value::as_str)) {
            (Some(left), Some(right)) => left == right,
            _ => false,
        }
    })
}

/// Apply project-level, then plugin-level overrides to a model value.
///
/// The plugin fragment is merged on top of the project-merged result with
/// the same array rule, so its arrays still append.
pub fn merge_model(
    mut model: Value,
    project_override: Option<&Value>,
    plugin_override: Option<&Value>,
) -> Value {
    for fragment in [project_override, plugin_override].into_iter().flatten() {
        merge_with_arrays(&mut model, fragment);
    }
    model
}
