//! Dotted-path access into loosely typed documents.
//!
//! Progress entries live under `progress.<problem_id>.solved`-style paths in
//! the user document, so every read and write in the store goes through the
//! helpers here rather than assuming a fixed shape.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde_json::{Map, Value};

/// A loosely typed store document.
pub type Document = Value;

/// Read the value at a dotted path (`"progress.abc.solved"`).
///
/// Returns `None` when any segment is missing or a non-object value sits in
/// the middle of the path.
pub fn get_path<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = doc;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Mutable variant of [`get_path`].
pub fn get_path_mut<'a>(doc: &'a mut Value, path: &str) -> Option<&'a mut Value> {
    let mut current = doc;
    for segment in path.split('.') {
        current = current.as_object_mut()?.get_mut(segment)?;
    }
    Some(current)
}

/// Write `value` at a dotted path, creating intermediate objects as needed.
///
/// A non-object value in the middle of the path is replaced by an object, so
/// a first-time write can create the whole path in one step.
pub fn set_path(doc: &mut Value, path: &str, value: Value) {
    if !doc.is_object() {
        *doc = Value::Object(Map::new());
    }
    let map = doc.as_object_mut().expect("ensured object above");
    match path.split_once('.') {
        None => {
            map.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let child = map
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            set_path(child, rest, value);
        }
    }
}

/// Remove the value at a dotted path. Absent paths are a no-op.
pub fn remove_path(doc: &mut Value, path: &str) {
    match path.split_once('.') {
        None => {
            if let Some(map) = doc.as_object_mut() {
                map.remove(path);
            }
        }
        Some((head, rest)) => {
            if let Some(child) = doc.as_object_mut().and_then(|map| map.get_mut(head)) {
                remove_path(child, rest);
            }
        }
    }
}

/// Total order over JSON values used for sorting query results.
///
/// Values order by type rank first (null < bool < number < string < array <
/// object), then within their type: booleans false-first, numbers as `f64`,
/// strings lexicographically.
pub fn cmp_values(a: &Value, b: &Value) -> Ordering {
    const fn rank(value: &Value) -> u8 {
        match value {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }

    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

/// Collect the distinct string forms of a field value into `out`.
///
/// Array fields contribute their elements, so `distinct("topics")` yields
/// individual topics rather than whole topic lists. Nulls are ignored.
pub fn collect_distinct(value: &Value, out: &mut BTreeSet<String>) {
    match value {
        Value::Null => {}
        Value::Array(items) => {
            for item in items {
                collect_distinct(item, out);
            }
        }
        Value::String(s) => {
            out.insert(s.clone());
        }
        other => {
            out.insert(other.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_path() {
        let doc = json!({"progress": {"p1": {"solved": true}}});
        assert_eq!(get_path(&doc, "progress.p1.solved"), Some(&json!(true)));
        assert_eq!(get_path(&doc, "progress.p2.solved"), None);
        assert_eq!(get_path(&doc, "progress"), Some(&json!({"p1": {"solved": true}})));
    }

    #[test]
    fn test_get_path_through_non_object() {
        let doc = json!({"progress": 42});
        assert_eq!(get_path(&doc, "progress.p1"), None);
    }

    #[test]
    fn test_set_path_creates_intermediate_objects() {
        let mut doc = json!({"username": "alice"});
        set_path(&mut doc, "progress.p1.solved", json!(true));
        assert_eq!(
            doc,
            json!({"username": "alice", "progress": {"p1": {"solved": true}}})
        );
    }

    #[test]
    fn test_set_path_overwrites_existing() {
        let mut doc = json!({"progress": {"p1": {"solved": true}}});
        set_path(&mut doc, "progress.p1.solved", json!(false));
        assert_eq!(doc, json!({"progress": {"p1": {"solved": false}}}));
    }

    #[test]
    fn test_set_path_replaces_scalar_in_the_middle() {
        let mut doc = json!({"progress": "oops"});
        set_path(&mut doc, "progress.p1.solved", json!(true));
        assert_eq!(doc, json!({"progress": {"p1": {"solved": true}}}));
    }

    #[test]
    fn test_remove_path() {
        let mut doc = json!({"a": {"b": 1, "c": 2}});
        remove_path(&mut doc, "a.b");
        assert_eq!(doc, json!({"a": {"c": 2}}));
        remove_path(&mut doc, "a.missing.deep");
        assert_eq!(doc, json!({"a": {"c": 2}}));
    }

    #[test]
    fn test_cmp_values_orders_strings() {
        assert_eq!(cmp_values(&json!("a"), &json!("b")), Ordering::Less);
        assert_eq!(cmp_values(&json!("b"), &json!("b")), Ordering::Equal);
    }

    #[test]
    fn test_cmp_values_type_rank() {
        assert_eq!(cmp_values(&json!(null), &json!(false)), Ordering::Less);
        assert_eq!(cmp_values(&json!(1), &json!("a")), Ordering::Less);
    }

    #[test]
    fn test_collect_distinct_flattens_arrays() {
        let mut out = BTreeSet::new();
        collect_distinct(&json!(["Array", "Hash Table"]), &mut out);
        collect_distinct(&json!("Array"), &mut out);
        collect_distinct(&json!(null), &mut out);
        assert_eq!(
            out.into_iter().collect::<Vec<_>>(),
            vec!["Array".to_string(), "Hash Table".to_string()]
        );
    }
}
