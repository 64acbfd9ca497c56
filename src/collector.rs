use crate::dsl::{PathSegment, SegmentKind};
use serde_json::Value;

/// Resolve `path` against `node` and return every leaf it reaches
///
/// Navigation never fails: a missing key, a `null`, or a node of the wrong
/// shape simply contributes no leaves. Sequence expansion keeps element order;
/// mapping expansion visits values in the map's own order.
pub fn collect<'a>(node: &'a Value, path: &[PathSegment]) -> Vec<&'a Value> {
    let mut out = Vec::new();
    collect_into(node, path, &mut out);
    out
}

/// True if `path` reaches at least one leaf under `node`
pub fn reaches_any(node: &Value, path: &[PathSegment]) -> bool {
    // Stops at the first leaf instead of materializing all of them.
    match path.split_first() {
        _ if node.is_null() => false,
        None => true,
        Some((segment, rest)) => match child(node, segment) {
            None => false,
            Some(child) => match (segment.kind, child) {
                (SegmentKind::Field, child) => reaches_any(child, rest),
                (SegmentKind::Array, Value::Array(items)) => {
                    items.iter().any(|item| reaches_any(item, rest))
                }
                (SegmentKind::Map, Value::Object(entries)) => {
                    entries.values().any(|value| reaches_any(value, rest))
                }
                _ => false,
            },
        },
    }
}

fn collect_into<'a>(node: &'a Value, path: &[PathSegment], out: &mut Vec<&'a Value>) {
    if node.is_null() {
        return;
    }

    let Some((segment, rest)) = path.split_first() else {
        out.push(node);
        return;
    };

    let Some(child) = child(node, segment) else {
        return;
    };

    match (segment.kind, child) {
        (SegmentKind::Field, child) => collect_into(child, rest, out),
        (SegmentKind::Array, Value::Array(items)) => {
            for item in items {
                collect_into(item, rest, out);
            }
        }
        (SegmentKind::Map, Value::Object(entries)) => {
            for value in entries.values() {
                collect_into(value, rest, out);
            }
        }
        // Expansion over the wrong container type
        _ => {}
    }
}

fn child<'a>(node: &'a Value, segment: &PathSegment) -> Option<&'a Value> {
    match node {
        Value::Object(map) => map.get(&segment.key),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::parse_path;
    use serde_json::json;

    fn path(expr: &str) -> Vec<PathSegment> {
        parse_path(expr).unwrap()
    }

    fn strings(values: Vec<&Value>) -> Vec<&str> {
        values.into_iter().filter_map(Value::as_str).collect()
    }

    #[test]
    fn test_plain_path() {
        let doc = json!({"a": {"b": "x"}});
        assert_eq!(strings(collect(&doc, &path("a.b"))), vec!["x"]);
    }

    #[test]
    fn test_missing_key_is_empty() {
        let doc = json!({"a": {"b": "x"}});
        assert!(collect(&doc, &path("a.c")).is_empty());
        assert!(collect(&doc, &path("z")).is_empty());
    }

    #[test]
    fn test_empty_path_returns_node() {
        let doc = json!({"a": 1});
        let result = collect(&doc, &[]);
        assert_eq!(result, vec![&doc]);
    }

    #[test]
    fn test_map_expand_is_order_independent() {
        let doc = json!({
            "inv": {
                "k1": {"name": "sword"},
                "k2": {"name": "shield"}
            }
        });
        let mut found = strings(collect(&doc, &path("inv[o].name")));
        found.sort();
        assert_eq!(found, vec!["shield", "sword"]);
    }

    #[test]
    fn test_array_expand_preserves_order() {
        let doc = json!({
            "spellset": [
                {"spells": [{"letter": "a"}, {"letter": "b"}]},
                {"spells": []},
                {"spells": [{"letter": "c"}]}
            ]
        });
        let found = strings(collect(&doc, &path("spellset[].spells[].letter")));
        assert_eq!(found, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_trailing_expand_yields_elements() {
        let doc = json!({"labels": ["one", "two"], "lines": {"0": "first"}});
        assert_eq!(strings(collect(&doc, &path("labels[]"))), vec!["one", "two"]);
        assert_eq!(strings(collect(&doc, &path("lines[o]"))), vec!["first"]);
    }

    #[test]
    fn test_type_mismatch_is_empty() {
        let doc = json!({
            "arr": {"not": "an array"},
            "obj": ["not", "an", "object"],
            "scalar": 7
        });
        assert!(collect(&doc, &path("arr[]")).is_empty());
        assert!(collect(&doc, &path("obj[o]")).is_empty());
        assert!(collect(&doc, &path("scalar.deeper")).is_empty());
        assert!(collect(&json!("root string"), &path("a")).is_empty());
    }

    #[test]
    fn test_null_is_treated_as_absent() {
        let doc = json!({"a": null, "b": [null, "x"]});
        assert!(collect(&doc, &path("a")).is_empty());
        assert_eq!(strings(collect(&doc, &path("b[]"))), vec!["x"]);
    }

    #[test]
    fn test_non_string_leaves_are_collected() {
        let doc = json!({"items": [{"text": 1}, {"text": "x"}, {"text": true}]});
        assert_eq!(collect(&doc, &path("items[].text")).len(), 3);
    }

    #[test]
    fn test_mixed_elements_skip_bad_shapes() {
        let doc = json!({"items": [{"text": "a"}, "bare", 3, {"other": "b"}, {"text": "c"}]});
        assert_eq!(strings(collect(&doc, &path("items[].text"))), vec!["a", "c"]);
    }

    #[test]
    fn test_reaches_any_agrees_with_collect() {
        let doc = json!({
            "cells": [{"mon": null}, {"mon": {"name": "rat"}}],
            "empty": [],
            "title": {"text": "Menu"}
        });
        for expr in ["cells[].mon.name", "empty[].x", "title.text", "title.missing", "cells[o]"] {
            let p = path(expr);
            assert_eq!(reaches_any(&doc, &p), !collect(&doc, &p).is_empty(), "{}", expr);
        }
    }

    #[test]
    fn test_collect_does_not_mutate_input() {
        let doc = json!({"inv": {"k": {"name": "sword"}}});
        let before = doc.clone();
        let _ = collect(&doc, &path("inv[o].name"));
        assert_eq!(doc, before);
    }
}
