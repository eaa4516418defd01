//! Read and write values at a key path inside a JSON tree
//!
//! Objects are addressed by key. Arrays are addressed by decimal index
//! segments (`"0"`, `"12"`); a non-index segment never matches an array.

use serde_json::{Map, Value};

use crate::KeyPath;

/// Get the value at `path`, or `None` if any segment is missing
pub fn get<'a>(root: &'a Value, path: &KeyPath) -> Option<&'a Value> {
    path.segments()
        .iter()
        .try_fold(root, |node, segment| child(node, segment))
}

/// Mutable variant of [`get`]
pub fn get_mut<'a>(root: &'a mut Value, path: &KeyPath) -> Option<&'a mut Value> {
    path.segments()
        .iter()
        .try_fold(root, |node, segment| child_mut(node, segment))
}

/// Whether a value (including `null`) exists at `path`
pub fn has(root: &Value, path: &KeyPath) -> bool {
    get(root, path).is_some()
}

/// Assign `value` at `path`, creating intermediate objects as needed
///
/// Missing intermediates become `{}`. Intermediate scalars are replaced by
/// `{}`, so a nested path may overwrite a leaf. Index segments on arrays
/// replace in bounds and pad with `null` past the end, up to
/// [`MAX_INDEX_GAP`] new slots. An index further out is treated as an
/// object key, like any other non-index segment on an array.
pub fn set(root: &mut Value, path: &KeyPath, value: Value) {
    let segments = path.segments();
    let Some((last, parents)) = segments.split_last() else {
        return;
    };

    let mut node = root;
    for segment in parents {
        node = child_or_insert(node, segment);
    }

    let index = match &mut *node {
        Value::Array(items) => padded_index(items, last),
        _ => None,
    };
    match (node, index) {
        (Value::Array(items), Some(index)) => {
            items[index] = value;
        }
        (node, _) => {
            ensure_object(node).insert(last.clone(), value);
        }
    }
}

/// Remove the value at `path`, returning it if it existed
///
/// Missing intermediates make this a no-op.
pub fn delete(root: &mut Value, path: &KeyPath) -> Option<Value> {
    let segments = path.segments();
    let (last, parents) = segments.split_last()?;

    let parent = parents
        .iter()
        .try_fold(root, |node, segment| child_mut(node, segment))?;

    match parent {
        Value::Object(map) => map.shift_remove(last.as_str()),
        Value::Array(items) => parse_index(last)
            .filter(|&index| index < items.len())
            .map(|index| items.remove(index)),
        _ => None,
    }
}

fn child<'a>(node: &'a Value, segment: &str) -> Option<&'a Value> {
    match node {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => parse_index(segment).and_then(|index| items.get(index)),
        _ => None,
    }
}

fn child_mut<'a>(node: &'a mut Value, segment: &str) -> Option<&'a mut Value> {
    match node {
        Value::Object(map) => map.get_mut(segment),
        Value::Array(items) => parse_index(segment).and_then(move |index| items.get_mut(index)),
        _ => None,
    }
}

fn child_or_insert<'a>(node: &'a mut Value, segment: &str) -> &'a mut Value {
    let index = match &mut *node {
        Value::Array(items) => padded_index(items, segment),
        _ => None,
    };
    match (node, index) {
        (Value::Array(items), Some(index)) => {
            let slot = &mut items[index];
            if !is_container(slot) {
                *slot = Value::Object(Map::new());
            }
            slot
        }
        (node, _) => {
            let slot = ensure_object(node)
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !is_container(slot) {
                *slot = Value::Object(Map::new());
            }
            slot
        }
    }
}

fn ensure_object(node: &mut Value) -> &mut Map<String, Value> {
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    match node {
        Value::Object(map) => map,
        _ => unreachable!("node was just replaced with an object"),
    }
}

fn is_container(value: &Value) -> bool {
    value.is_object() || value.is_array()
}

/// Most `null` slots a single `set` appends to reach an index
pub const MAX_INDEX_GAP: usize = 1024;

/// Parse `segment` as an index into `items`, padding with `null` to reach it
///
/// Returns `None` for non-index segments and for indices more than
/// [`MAX_INDEX_GAP`] slots past the end.
fn padded_index(items: &mut Vec<Value>, segment: &str) -> Option<usize> {
    let index = parse_index(segment)?;
    if index >= items.len() {
        if index - items.len() > MAX_INDEX_GAP {
            return None;
        }
        items.resize(index + 1, Value::Null);
    }
    Some(index)
}

/// Canonical decimal index: `0` or digits without a leading zero
fn parse_index(segment: &str) -> Option<usize> {
    let canonical = !segment.is_empty()
        && segment.bytes().all(|b| b.is_ascii_digit())
        && (segment == "0" || !segment.starts_with('0'));
    if canonical {
        segment.parse().ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn path(s: &str) -> KeyPath {
        KeyPath::from(s)
    }

    #[test]
    fn test_get_nested() {
        let root = json!({"name": {"first": "Gaius", "last": "Caesar"}});
        assert_eq!(get(&root, &path("name.last")), Some(&json!("Caesar")));
        assert_eq!(get(&root, &path("name")), Some(&json!({"first": "Gaius", "last": "Caesar"})));
    }

    #[test]
    fn test_get_missing_is_none() {
        let root = json!({"a": {"b": 1}});
        assert_eq!(get(&root, &path("a.c")), None);
        assert_eq!(get(&root, &path("x.y.z")), None);
        // Walking through a scalar
        assert_eq!(get(&root, &path("a.b.c")), None);
    }

    #[test]
    fn test_get_array_index() {
        let root = json!({"list": [10, {"x": true}]});
        assert_eq!(get(&root, &path("list.0")), Some(&json!(10)));
        assert_eq!(get(&root, &path("list.1.x")), Some(&json!(true)));
        assert_eq!(get(&root, &path("list.2")), None);
        assert_eq!(get(&root, &path("list.01")), None);
        assert_eq!(get(&root, &path("list.length")), None);
    }

    #[test]
    fn test_has_counts_null_and_falsy() {
        let root = json!({"null": null, "zero": 0, "no": false, "empty": ""});
        assert!(has(&root, &path("null")));
        assert!(has(&root, &path("zero")));
        assert!(has(&root, &path("no")));
        assert!(has(&root, &path("empty")));
        assert!(!has(&root, &path("missing")));
    }

    #[test]
    fn test_set_creates_intermediates() {
        let mut root = json!({});
        set(&mut root, &path("name.last"), json!("Caesar"));
        assert_eq!(root, json!({"name": {"last": "Caesar"}}));
    }

    #[test]
    fn test_set_preserves_siblings() {
        let mut root = json!({"name": {"first": "Gaius"}, "age": 55});
        set(&mut root, &path("name.last"), json!("Caesar"));
        assert_eq!(
            root,
            json!({"name": {"first": "Gaius", "last": "Caesar"}, "age": 55})
        );
    }

    #[test]
    fn test_set_overwrites_scalar_intermediate() {
        let mut root = json!({"a": 5});
        set(&mut root, &path("a.b"), json!(1));
        assert_eq!(root, json!({"a": {"b": 1}}));
    }

    #[test]
    fn test_set_on_scalar_root() {
        let mut root = json!("text");
        set(&mut root, &path("a"), json!(1));
        assert_eq!(root, json!({"a": 1}));
    }

    #[test]
    fn test_set_escaped_key() {
        let mut root = json!({});
        set(&mut root, &path("a\\.b"), json!(1));
        set(&mut root, &path("a.b"), json!(2));
        assert_eq!(root, json!({"a.b": 1, "a": {"b": 2}}));
        assert_eq!(get(&root, &path("a\\.b")), Some(&json!(1)));
        assert_eq!(get(&root, &path("a.b")), Some(&json!(2)));
    }

    #[test]
    fn test_set_array_index() {
        let mut root = json!({"list": [1, 2]});
        set(&mut root, &path("list.0"), json!("one"));
        set(&mut root, &path("list.2"), json!(3));
        set(&mut root, &path("list.4"), json!(5));
        assert_eq!(root, json!({"list": ["one", 2, 3, null, 5]}));
    }

    #[test]
    fn test_set_into_array_element() {
        let mut root = json!({"list": [{"x": 1}]});
        set(&mut root, &path("list.0.y"), json!(2));
        set(&mut root, &path("list.1.z"), json!(3));
        assert_eq!(root, json!({"list": [{"x": 1, "y": 2}, {"z": 3}]}));
    }

    #[test]
    fn test_set_named_key_on_array_replaces_it() {
        let mut root = json!({"list": [1, 2]});
        set(&mut root, &path("list.name"), json!("x"));
        assert_eq!(root, json!({"list": {"name": "x"}}));
    }

    #[test]
    fn test_set_index_at_usize_max_becomes_key() {
        let mut root = json!({"list": [1, 2]});
        set(&mut root, &path("list.18446744073709551615"), json!(1));
        assert_eq!(root, json!({"list": {"18446744073709551615": 1}}));
    }

    #[test]
    fn test_set_index_far_past_end_does_not_pad() {
        let mut root = json!({"list": [1, 2]});
        set(&mut root, &path("list.20000000"), json!(1));
        assert_eq!(root, json!({"list": {"20000000": 1}}));

        let mut root = json!({"list": [[]]});
        set(&mut root, &path("list.0.20000000.x"), json!(1));
        assert_eq!(root, json!({"list": [{"20000000": {"x": 1}}]}));
    }

    #[test]
    fn test_set_index_gap_limit() {
        let mut root = json!([]);
        let edge = MAX_INDEX_GAP.to_string();
        set(&mut root, &path(&edge), json!(true));
        assert_eq!(root.as_array().map(Vec::len), Some(MAX_INDEX_GAP + 1));

        let mut root = json!([]);
        let beyond = (MAX_INDEX_GAP + 1).to_string();
        set(&mut root, &path(&beyond), json!(true));
        assert!(root.is_object());
    }

    #[test]
    fn test_get_mut_updates_in_place() {
        let mut root = json!({"a": {"count": 1}});
        if let Some(count) = get_mut(&mut root, &path("a.count")) {
            *count = json!(2);
        }
        assert_eq!(root, json!({"a": {"count": 2}}));
    }

    #[test]
    fn test_delete_leaf() {
        let mut root = json!({"a": {"b": 1, "c": 2}});
        assert_eq!(delete(&mut root, &path("a.b")), Some(json!(1)));
        assert_eq!(root, json!({"a": {"c": 2}}));
    }

    #[test]
    fn test_delete_keeps_key_order() {
        let mut root = json!({"a": 1, "b": 2, "c": 3});
        delete(&mut root, &path("a"));
        assert_eq!(serde_json::to_string(&root).unwrap(), r#"{"b":2,"c":3}"#);
    }

    #[test]
    fn test_delete_missing_is_noop() {
        let mut root = json!({"a": {"b": 1}});
        assert_eq!(delete(&mut root, &path("x.y")), None);
        assert_eq!(delete(&mut root, &path("a.b.c")), None);
        assert_eq!(delete(&mut root, &path("a.z")), None);
        assert_eq!(root, json!({"a": {"b": 1}}));
    }

    #[test]
    fn test_delete_array_element() {
        let mut root = json!({"list": [1, 2, 3]});
        assert_eq!(delete(&mut root, &path("list.1")), Some(json!(2)));
        assert_eq!(delete(&mut root, &path("list.9")), None);
        assert_eq!(root, json!({"list": [1, 3]}));
    }

    #[test]
    fn test_parse_index() {
        assert_eq!(parse_index("0"), Some(0));
        assert_eq!(parse_index("42"), Some(42));
        assert_eq!(parse_index("042"), None);
        assert_eq!(parse_index(""), None);
        assert_eq!(parse_index("-1"), None);
        assert_eq!(parse_index("1a"), None);
    }

    fn leaf() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| json!(n)),
            "[a-zA-Z0-9 ]{0,12}".prop_map(Value::String),
        ]
    }

    fn document() -> impl Strategy<Value = Value> {
        leaf().prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::btree_map("[a-z]{1,4}", inner, 0..4)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    fn key_path() -> impl Strategy<Value = KeyPath> {
        prop::collection::vec("[a-z]{1,4}(\\.[a-z]{1,3})?", 1..4)
            .prop_map(|segments| KeyPath::from_segments(segments))
    }

    proptest! {
        #[test]
        fn prop_set_then_get(mut root in document(), p in key_path(), v in document()) {
            set(&mut root, &p, v.clone());
            prop_assert_eq!(get(&root, &p), Some(&v));
        }

        #[test]
        fn prop_delete_then_absent(mut root in document(), p in key_path(), v in leaf()) {
            set(&mut root, &p, v);
            delete(&mut root, &p);
            prop_assert!(!has(&root, &p));
            // Deleting again is a no-op
            prop_assert_eq!(delete(&mut root, &p), None);
        }

        #[test]
        fn prop_absent_on_empty(p in key_path()) {
            let root = json!({});
            prop_assert!(!has(&root, &p));
            prop_assert_eq!(get(&root, &p), None);
        }
    }
}
