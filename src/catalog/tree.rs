//! Recursive visitor over `serde_json::Value`

use serde_json::Value;

/// Every node under (and including) `value` for which `predicate` holds,
/// depth first
pub fn collect_nodes<'a, F>(value: &'a Value, predicate: F) -> Vec<&'a Value>
where
    F: Fn(&Value) -> bool,
{
    let mut found = Vec::new();
    visit(value, &predicate, &mut found);
    found
}

fn visit<'a, F>(value: &'a Value, predicate: &F, found: &mut Vec<&'a Value>)
where
    F: Fn(&Value) -> bool,
{
    if predicate(value) {
        found.push(value);
    }
    match value {
        Value::Object(map) => {
            for child in map.values() {
                visit(child, predicate, found);
            }
        }
        Value::Array(items) => {
            for child in items {
                visit(child, predicate, found);
            }
        }
        _ => {}
    }
}

/// All string leaves, depth first
pub fn string_leaves(value: &Value) -> Vec<&str> {
    collect_nodes(value, Value::is_string)
        .into_iter()
        .filter_map(Value::as_str)
        .collect()
}
