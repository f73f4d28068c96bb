//! Field-level diffs for audit entries

use serde_json::Value;

/// Longest string value shown before it is truncated
const MAX_VALUE_CHARS: usize = 50;

/// Summarize the top-level fields that differ between two JSON objects
///
/// Returns `None` when nothing changed. Timestamps such as `updated_at` are
/// listed like any other field.
pub fn generate_diff(before: &Value, after: &Value) -> Option<String> {
    let changes: Vec<String> = match (before, after) {
        (Value::Object(before_obj), Value::Object(after_obj)) => {
            let mut changes: Vec<String> = before_obj
                .iter()
                .filter_map(|(key, old)| match after_obj.get(key) {
                    Some(new) if new != old => {
                        Some(format!("{}: {} -> {}", key, format_value(old), format_value(new)))
                    }
                    Some(_) => None,
                    None => Some(format!("{}: {} -> (removed)", key, format_value(old))),
                })
                .collect();

            changes.extend(
                after_obj
                    .iter()
                    .filter(|(key, _)| !before_obj.contains_key(*key))
                    .map(|(key, new)| format!("{}: (added) -> {}", key, format_value(new))),
            );
            changes
        }
        _ if before != after => vec![format!("{} -> {}", format_value(before), format_value(after))],
        _ => Vec::new(),
    };

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::String(s) if s.chars().count() > MAX_VALUE_CHARS => {
            let head: String = s.chars().take(MAX_VALUE_CHARS - 3).collect();
            format!("\"{}...\"", head)
        }
        Value::String(s) => format!("\"{}\"", s),
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_changed_field() {
        let before = json!({"category": "Miscellaneous", "amount": 1850});
        let after = json!({"category": "Travel", "amount": 1850});

        assert_eq!(
            generate_diff(&before, &after).unwrap(),
            "category: \"Miscellaneous\" -> \"Travel\""
        );
    }

    #[test]
    fn test_no_change() {
        let value = json!({"amount": 1850});
        assert!(generate_diff(&value, &value).is_none());
    }

    #[test]
    fn test_added_and_removed_fields() {
        let before = json!({"old": 1});
        let after = json!({"new": 2});
        let diff = generate_diff(&before, &after).unwrap();

        assert!(diff.contains("old: 1 -> (removed)"));
        assert!(diff.contains("new: (added) -> 2"));
    }

    #[test]
    fn test_long_multibyte_string_truncated() {
        let long = "é".repeat(80);
        let diff = generate_diff(&json!({"d": "x"}), &json!({"d": long})).unwrap();
        assert!(diff.ends_with("...\""));
    }
}
