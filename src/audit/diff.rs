//! Change summaries for audit updates

use serde_json::Value;

/// Fields that change on every write and are left out of summaries
const IGNORED_FIELDS: [&str; 2] = ["updated_at", "password_hash"];

/// Summarize top-level field changes between two entity snapshots
///
/// Returns `None` when nothing relevant changed.
pub fn generate_diff(before: &Value, after: &Value) -> Option<String> {
    let (Value::Object(before_obj), Value::Object(after_obj)) = (before, after) else {
        return (before != after)
            .then(|| format!("{} -> {}", format_value(before), format_value(after)));
    };

    let mut changes = Vec::new();
    for (key, old) in before_obj {
        if IGNORED_FIELDS.contains(&key.as_str()) {
            continue;
        }
        let new = after_obj.get(key).unwrap_or(&Value::Null);
        if old != new {
            changes.push(format!("{}: {} -> {}", key, format_value(old), format_value(new)));
        }
    }
    for (key, new) in after_obj {
        if !before_obj.contains_key(key) && !IGNORED_FIELDS.contains(&key.as_str()) {
            changes.push(format!("{}: null -> {}", key, format_value(new)));
        }
    }

    (!changes.is_empty()).then(|| changes.join(", "))
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) if s.chars().count() > 40 => {
            let head: String = s.chars().take(37).collect();
            format!("\"{}...\"", head)
        }
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
    fn test_role_change() {
        let before = json!({"username": "deo", "role": "DEO", "committee": "Tuni AMC"});
        let after = json!({"username": "deo", "role": "Supervisor", "committee": "Tuni AMC"});

        assert_eq!(
            generate_diff(&before, &after).as_deref(),
            Some("role: \"DEO\" -> \"Supervisor\"")
        );
    }

    #[test]
    fn test_committee_assigned() {
        let before = json!({"committee": null});
        let after = json!({"committee": "Kakinada AMC"});

        let diff = generate_diff(&before, &after).unwrap();
        assert!(diff.contains("committee: null -> \"Kakinada AMC\""));
    }

    #[test]
    fn test_timestamps_and_hashes_ignored() {
        let before = json!({"role": "JD", "updated_at": "2025-01-01", "password_hash": "a"});
        let after = json!({"role": "JD", "updated_at": "2025-02-01", "password_hash": "b"});

        assert!(generate_diff(&before, &after).is_none());
    }
}
