//! Layering of configuration files.
//!
//! `.muzzle/config.local.yml` is laid over `.muzzle/config.yml` before the
//! result is parsed. Layering works on raw YAML values:
//!
//! - mappings merge key by key, recursively
//! - sequences (rules, references, catalog) are replaced as a whole
//! - a `null` value removes the key underneath it
//! - any other value replaces what was there
//!
//! An empty file parses to `null` and leaves the base untouched.

use serde_yaml::{Mapping, Value};

/// Lay `overlay` over `base`.
pub fn deep_merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (_, Value::Null) => base.clone(),
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            let mut merged = base_map.clone();
            for (key, value) in overlay_map {
                if value.is_null() {
                    merged.remove(key);
                    continue;
                }
                let next = match base_map.get(key) {
                    Some(existing) => deep_merge(existing, value),
                    None => value.clone(),
                };
                merged.insert(key.clone(), next);
            }
            Value::Mapping(merged)
        }
        (_, overlay) => overlay.clone(),
    }
}

/// Merge layers in order; the last layer wins.
pub fn merge_configs(layers: &[Value]) -> Value {
    layers
        .iter()
        .fold(Value::Mapping(Mapping::new()), |acc, layer| deep_merge(&acc, layer))
}
