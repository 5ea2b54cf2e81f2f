//! Purpose: Materialize dotted property paths inside a JSON message body.
//! Exports: `add_property`, `set_property_if_not_null`.
//! Role: Outbound half of the codec; turns flat driver properties into nested JSON.
//! Invariants: `add_property` creates every missing intermediate container itself.
//! Invariants: Arrays are padded with `null` up to the addressed index.
//! Invariants: Descending through an existing scalar is a `PathConflict`, never an overwrite.

use serde_json::{Map, Value};

use crate::core::coerce::coerce_scalar;
use crate::core::error::{Error, ErrorKind};
use crate::core::path::{PropertyPath, Segment};

/// Destructively extend `root` so the value at `path` equals the coerced form
/// of `raw`, creating intermediate objects and arrays as needed. The value at
/// the final segment is overwritten if already present.
///
/// `root` must be a JSON object; top-level arrays are not supported, so the
/// first path segment must be a field name.
pub fn add_property(root: &mut Value, path: &str, raw: &str) -> Result<(), Error> {
    let parsed = PropertyPath::parse(path)?;
    if parsed.leading_field().is_none() {
        return Err(Error::new(ErrorKind::InvalidPath)
            .with_message("property path must start with a field name")
            .with_path(path)
            .with_hint("Top-level arrays are not supported; wrap the list in a named field."));
    }
    if !root.is_object() {
        return Err(Error::new(ErrorKind::Usage)
            .with_message("add_property root must be a JSON object")
            .with_path(path));
    }

    let segments = parsed.segments();
    let mut cursor = root;
    for pos in 0..segments.len() - 1 {
        cursor = descend(cursor, &segments[pos], &segments[pos + 1], path)?;
    }

    let leaf = slot_mut(cursor, &segments[segments.len() - 1], path)?;
    *leaf = coerce_scalar(raw);
    Ok(())
}

/// Guarded single-level copy: if `source[key]` is present and not null, set
/// `dest[key]` to it; otherwise leave `dest` untouched. No coercion, no path
/// semantics. Idempotent.
pub fn set_property_if_not_null(source: &Map<String, Value>, dest: &mut Map<String, Value>, key: &str) {
    match source.get(key) {
        Some(Value::Null) | None => {}
        Some(value) => {
            dest.insert(key.to_string(), value.clone());
        }
    }
}

/// Resolve (creating if needed) the container addressed by `seg` inside
/// `cursor`, shaped for `next`, and step into it.
fn descend<'a>(
    cursor: &'a mut Value,
    seg: &Segment,
    next: &Segment,
    path: &str,
) -> Result<&'a mut Value, Error> {
    let slot = slot_mut(cursor, seg, path)?;
    match slot {
        Value::Null => {
            *slot = match next {
                Segment::Field(_) => Value::Object(Map::new()),
                Segment::Index(_) => Value::Array(Vec::new()),
            };
            Ok(slot)
        }
        Value::Object(_) => match next {
            Segment::Field(_) => Ok(slot),
            Segment::Index(_) => Err(conflict(path, "existing value is an object, not an array")),
        },
        Value::Array(_) => match next {
            Segment::Index(_) => Ok(slot),
            Segment::Field(_) => Err(conflict(path, "existing value is an array, not an object")),
        },
        _ => Err(conflict(path, "cannot descend through an existing scalar")),
    }
}

/// Borrow the value slot addressed by `seg` within `container`, inserting a
/// `null` placeholder (and padding arrays) when the slot does not exist yet.
fn slot_mut<'a>(container: &'a mut Value, seg: &Segment, path: &str) -> Result<&'a mut Value, Error> {
    match (container, seg) {
        (Value::Object(map), Segment::Field(name)) => {
            Ok(map.entry(name.clone()).or_insert(Value::Null))
        }
        (Value::Array(items), Segment::Index(index)) => {
            while items.len() <= *index {
                items.push(Value::Null);
            }
            Ok(&mut items[*index])
        }
        // descend() always shapes the container to the segment kind first.
        _ => Err(Error::new(ErrorKind::Internal)
            .with_message("container kind does not match path segment")
            .with_path(path)),
    }
}

fn conflict(path: &str, message: &str) -> Error {
    Error::new(ErrorKind::PathConflict)
        .with_message(message)
        .with_path(path)
}

#[cfg(test)]
mod tests {
    use super::{add_property, set_property_if_not_null};
    use crate::core::error::ErrorKind;
    use serde_json::{Map, Value, json};

    #[test]
    fn builds_nested_objects_on_demand() {
        let mut root = json!({});
        add_property(&mut root, "vimConnectionInfo.0.vimType", "OPENSTACK_V3").unwrap();
        add_property(&mut root, "vimConnectionInfo.0.interfaceInfo.endpoint", "http://vim").unwrap();
        assert_eq!(
            root,
            json!({
                "vimConnectionInfo": [
                    {"vimType": "OPENSTACK_V3", "interfaceInfo": {"endpoint": "http://vim"}}
                ]
            })
        );
    }

    #[test]
    fn pads_arrays_with_null() {
        let mut root = json!({});
        add_property(&mut root, "extVirtualLinks.2.id", "x").unwrap();
        assert_eq!(
            root,
            json!({"extVirtualLinks": [null, null, {"id": "x"}]})
        );
    }

    #[test]
    fn overwrites_existing_leaf() {
        let mut root = json!({});
        add_property(&mut root, "a.b", "1").unwrap();
        add_property(&mut root, "a.b", "2").unwrap();
        assert_eq!(root, json!({"a": {"b": 2}}));
    }

    #[test]
    fn coerces_booleans_numbers_and_strings() {
        let mut root = json!({});
        add_property(&mut root, "flag", "true").unwrap();
        add_property(&mut root, "count", "3").unwrap();
        add_property(&mut root, "label", "abc").unwrap();
        assert_eq!(root, json!({"flag": true, "count": 3, "label": "abc"}));
    }

    #[test]
    fn conflict_when_descending_through_scalar() {
        let mut root = json!({"a": "x"});
        let err = add_property(&mut root, "a.b", "1").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PathConflict);
        // The tree is left as it was.
        assert_eq!(root, json!({"a": "x"}));
    }

    #[test]
    fn conflict_when_container_kind_mismatches() {
        let mut root = json!({"a": {"b": 1}});
        let err = add_property(&mut root, "a.0", "1").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PathConflict);

        let mut root = json!({"a": [1]});
        let err = add_property(&mut root, "a.b", "1").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PathConflict);
    }

    #[test]
    fn leaf_assignment_overwrites_even_containers() {
        let mut root = json!({"a": {"b": 1}});
        add_property(&mut root, "a", "x").unwrap();
        assert_eq!(root, json!({"a": "x"}));
    }

    #[test]
    fn rejects_leading_index_segment() {
        let mut root = json!({});
        let err = add_property(&mut root, "0.a", "x").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPath);
    }

    #[test]
    fn guarded_copy_skips_absent_and_null() {
        let mut source = Map::new();
        source.insert("present".to_string(), json!("v"));
        source.insert("nothing".to_string(), Value::Null);

        let mut dest = Map::new();
        set_property_if_not_null(&source, &mut dest, "present");
        set_property_if_not_null(&source, &mut dest, "nothing");
        set_property_if_not_null(&source, &mut dest, "absent");

        assert_eq!(dest.len(), 1);
        assert_eq!(dest.get("present"), Some(&json!("v")));
    }

    #[test]
    fn guarded_copy_is_idempotent() {
        let mut source = Map::new();
        source.insert("k".to_string(), json!(7));
        let mut dest = Map::new();
        set_property_if_not_null(&source, &mut dest, "k");
        set_property_if_not_null(&source, &mut dest, "k");
        assert_eq!(dest.get("k"), Some(&json!(7)));
        assert_eq!(dest.len(), 1);
    }
}
