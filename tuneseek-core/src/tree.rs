//! Schema-agnostic traversal of JSON trees
//!
//! Sites that embed their data as JSON rarely keep the nesting stable, so
//! extractors search for nodes by shape or key instead of by path.

use serde_json::Value;

/// Visit every node of `root` in pre-order, document order.
///
/// The visitor receives the object key a node was found under (`None` for
/// the root and for array elements). Uses an explicit stack, so arbitrarily
/// deep documents are safe.
pub fn walk<'a, F>(root: &'a Value, mut visit: F)
where
    F: FnMut(Option<&'a str>, &'a Value),
{
    let mut stack: Vec<(Option<&'a str>, &'a Value)> = vec![(None, root)];

    while let Some((key, node)) = stack.pop() {
        visit(key, node);

        match node {
            Value::Object(map) => {
                for (k, v) in map.iter().rev() {
                    stack.push((Some(k.as_str()), v));
                }
            }
            Value::Array(items) => {
                for v in items.iter().rev() {
                    stack.push((None, v));
                }
            }
            _ => {}
        }
    }
}

/// Collect every node matching `pred`, in document order
pub fn find_all<'a, P>(root: &'a Value, mut pred: P) -> Vec<&'a Value>
where
    P: FnMut(Option<&str>, &Value) -> bool,
{
    let mut found = Vec::new();
    walk(root, |key, node| {
        if pred(key, node) {
            found.push(node);
        }
    });
    found
}

/// Collect the values stored under `key` anywhere in the tree
pub fn find_by_key<'a>(root: &'a Value, key: &str) -> Vec<&'a Value> {
    find_all(root, |k, _| k == Some(key))
}

/// Read a string at a JSON pointer (`/a/0/b`)
pub fn str_at<'a>(node: &'a Value, pointer: &str) -> Option<&'a str> {
    node.pointer(pointer).and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_find_by_key_any_depth() {
        let doc = json!({
            "contents": [
                { "target": { "id": 1 } },
                { "wrapper": { "inner": { "deeper": [ { "target": { "id": 2 } } ] } } }
            ]
        });

        let found = find_by_key(&doc, "target");
        let ids: Vec<_> = found.iter().map(|v| v["id"].as_i64().unwrap()).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_document_order_preserved() {
        let doc = json!({
            "z": { "target": "first" },
            "a": { "target": "second" }
        });

        let found: Vec<_> = find_by_key(&doc, "target")
            .into_iter()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(found, vec!["first", "second"]);
    }

    #[test]
    fn test_nested_match_inside_match() {
        let doc = json!({ "target": { "target": 7 } });
        assert_eq!(find_by_key(&doc, "target").len(), 2);
    }

    #[test]
    fn test_find_all_predicate() {
        let doc = json!([1, "x", [2, { "n": 3 }]]);
        let numbers = find_all(&doc, |_, v| v.is_number());
        assert_eq!(numbers.len(), 3);
    }

    #[test]
    fn test_deep_nesting() {
        let mut doc = json!({ "target": true });
        for _ in 0..2_000 {
            doc = json!({ "level": doc });
        }
        assert_eq!(find_by_key(&doc, "target").len(), 1);
    }

    #[test]
    fn test_str_at() {
        let doc = json!({ "title": { "runs": [ { "text": "Hello" } ] } });
        assert_eq!(str_at(&doc, "/title/runs/0/text"), Some("Hello"));
        assert_eq!(str_at(&doc, "/title/runs/1/text"), None);
    }
}
