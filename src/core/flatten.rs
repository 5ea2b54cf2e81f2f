//! Purpose: Flatten a parsed JSON response body into dotted property entries.
//! Exports: `flatten_property_map`, `EXCLUDED_TOP_LEVEL`.
//! Role: Inbound half of the codec; exact inverse of `tree::add_property` modulo exclusions.
//! Invariants: Every leaf scalar (null included) outside the exclusion set is emitted.
//! Invariants: Exclusion is a first-segment policy; `a.id` is emitted, `id.a` is not.
//! Invariants: Excluded subtrees are skipped whole, which never changes the output.

use std::collections::BTreeMap;

use serde_json::Value;

/// Top-level field names the driver manages itself and must not receive back
/// as generic outputs. `_links` covers the HAL-style `_links.*` hypermedia
/// block present on SOL003/SOL005 instance resources.
pub const EXCLUDED_TOP_LEVEL: [&str; 4] = ["id", "name", "index", "_links"];

/// Walk `tree` depth-first and return one entry per reachable leaf scalar,
/// keyed by the dotted path used to reach it. Object fields contribute their
/// name, array elements their index. Entry order is deterministic but carries
/// no meaning; consumers treat the result as a mapping.
pub fn flatten_property_map(tree: &Value) -> BTreeMap<String, Value> {
    let mut flat = BTreeMap::new();
    match tree {
        Value::Object(map) => {
            for (name, child) in map {
                if EXCLUDED_TOP_LEVEL.contains(&name.as_str()) {
                    continue;
                }
                flatten_into(child, name.clone(), &mut flat);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                flatten_into(child, index.to_string(), &mut flat);
            }
        }
        // A bare scalar has no path to key it by.
        _ => {}
    }
    flat
}

fn flatten_into(node: &Value, path: String, flat: &mut BTreeMap<String, Value>) {
    match node {
        Value::Object(map) => {
            for (name, child) in map {
                flatten_into(child, format!("{path}.{name}"), flat);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                flatten_into(child, format!("{path}.{index}"), flat);
            }
        }
        leaf => {
            flat.insert(path, leaf.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::flatten_property_map;
    use serde_json::json;

    #[test]
    fn flattens_nested_objects_and_arrays() {
        let tree = json!({
            "instantiationState": "INSTANTIATED",
            "vimConnectionInfo": [
                {"vimType": "OPENSTACK_V3"},
                {"vimType": "KUBERNETES"}
            ]
        });
        let flat = flatten_property_map(&tree);
        assert_eq!(flat["instantiationState"], json!("INSTANTIATED"));
        assert_eq!(flat["vimConnectionInfo.0.vimType"], json!("OPENSTACK_V3"));
        assert_eq!(flat["vimConnectionInfo.1.vimType"], json!("KUBERNETES"));
        assert_eq!(flat.len(), 3);
    }

    #[test]
    fn excludes_driver_managed_top_level_fields() {
        let tree = json!({
            "id": "v1",
            "name": "n",
            "index": 3,
            "_links": {"self": {"href": "u"}},
            "foo": "bar"
        });
        let flat = flatten_property_map(&tree);
        assert_eq!(flat.len(), 1);
        assert_eq!(flat["foo"], json!("bar"));
    }

    #[test]
    fn exclusion_is_first_segment_only() {
        let tree = json!({"vnfc": {"id": "c1", "name": "cpu"}});
        let flat = flatten_property_map(&tree);
        assert_eq!(flat["vnfc.id"], json!("c1"));
        assert_eq!(flat["vnfc.name"], json!("cpu"));
    }

    #[test]
    fn null_leaves_are_emitted() {
        let tree = json!({"a": [null, {"b": null}]});
        let flat = flatten_property_map(&tree);
        assert_eq!(flat["a.0"], json!(null));
        assert_eq!(flat["a.1.b"], json!(null));
    }

    #[test]
    fn empty_containers_emit_nothing() {
        let tree = json!({"a": {}, "b": []});
        assert!(flatten_property_map(&tree).is_empty());
    }

    #[test]
    fn array_root_uses_index_prefixes() {
        let tree = json!([{"x": 1}, 2]);
        let flat = flatten_property_map(&tree);
        assert_eq!(flat["0.x"], json!(1));
        assert_eq!(flat["1"], json!(2));
    }
}
