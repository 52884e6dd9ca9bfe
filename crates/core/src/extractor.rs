use crate::domain::{looks_numeric, Extraction, Username};
use serde_json::{Map, Value};

/// Container keys that social-media exports wrap their record arrays in,
/// probed in this order.
const CONTAINER_KEYS: [&str; 9] = [
    "relationships_following",
    "relationships_followers",
    "followers",
    "following",
    "users",
    "data",
    "items",
    "list",
    "connections",
];

/// Extracts usernames from one parsed export document of unknown shape.
///
/// Arrays are handled record by record: the first matching rule per record
/// decides how that record is read, so mixed-shape arrays work. Objects
/// are unwrapped through known container keys first, then by scanning all
/// keys. Candidates that fail username validation are dropped and counted,
/// never raised as errors.
pub fn extract(value: &Value) -> Extraction {
    let mut out = Extraction::default();
    let mut first_rule = None;
    extract_value(value, &mut out, &mut first_rule);
    if let Some(rule) = first_rule {
        log::debug!(
            "extraction matched rule '{}' first: {} usernames, {} dropped",
            rule,
            out.usernames.len(),
            out.dropped
        );
    }
    out
}

fn extract_value(value: &Value, out: &mut Extraction, first_rule: &mut Option<&'static str>) {
    match value {
        Value::Array(items) => {
            for item in items {
                extract_record(item, out, first_rule);
            }
        }
        Value::Object(map) => extract_object(map, out, first_rule),
        // A bare string document is treated like a single plain-string record
        Value::String(s) => push_candidate(s, out),
        _ => {}
    }
}

/// Applies the per-record rules in priority order; the first rule whose
/// shape is present wins, even if its candidates all fail validation.
fn extract_record(item: &Value, out: &mut Extraction, first_rule: &mut Option<&'static str>) {
    match apply_record_rules(item, out) {
        Some(rule) => {
            if first_rule.is_none() {
                *first_rule = Some(rule);
            }
        }
        None => {
            out.dropped += 1;
            log::debug!("record matched no extraction rule: {}", item);
        }
    }
}

fn apply_record_rules(item: &Value, out: &mut Extraction) -> Option<&'static str> {
    if let Some(title) = item.get("title").and_then(Value::as_str) {
        if !title.trim().is_empty() {
            push_candidate(title, out);
            return Some("title");
        }
    }
    if let Some(entries) = item.get("string_list_data").and_then(Value::as_array) {
        for entry in entries {
            push_list_entry(entry, out);
        }
        return Some("string_list_data");
    }
    if let Some(name) = item.get("username").and_then(Value::as_str) {
        push_candidate(name, out);
        return Some("username");
    }
    if let Some(value) = item.get("value").and_then(Value::as_str) {
        // a numeric value field is a timestamp, not a username
        if !looks_numeric(value.trim()) {
            push_candidate(value, out);
            return Some("value");
        }
    }
    if let Some(s) = item.as_str() {
        push_candidate(s, out);
        return Some("plain_string");
    }
    if let Some(name) = item
        .get("user")
        .and_then(|user| user.get("username"))
        .and_then(Value::as_str)
    {
        push_candidate(name, out);
        return Some("user.username");
    }
    if let Some(name) = item.get("name").and_then(Value::as_str) {
        push_candidate(name, out);
        return Some("name");
    }
    None
}

/// One entry of a `string_list_data` array: prefer `value`, else derive
/// the username from the profile `href`.
fn push_list_entry(entry: &Value, out: &mut Extraction) {
    if let Some(value) = entry.get("value").and_then(Value::as_str) {
        push_candidate(value, out);
    } else if let Some(href) = entry.get("href").and_then(Value::as_str) {
        if let Some(name) = username_from_href(href) {
            push_candidate(&name, out);
        }
    }
}

/// The path segment right after `instagram.com/`, stopped at the next
/// separator. `https://www.instagram.com/alice?hl=en` yields `alice`.
fn username_from_href(href: &str) -> Option<String> {
    let idx = href.find("instagram.com/")?;
    let rest = &href[idx + "instagram.com/".len()..];
    let segment = rest
        .split(|c| c == '/' || c == '?' || c == '#')
        .next()
        .unwrap_or("");
    if segment.is_empty() {
        None
    } else {
        Some(segment.to_string())
    }
}

fn extract_object(
    map: &Map<String, Value>,
    out: &mut Extraction,
    first_rule: &mut Option<&'static str>,
) {
    // Known container keys: the first array-valued one decides, even if it
    // turns out empty.
    for key in CONTAINER_KEYS {
        if let Some(value) = map.get(key) {
            if value.is_array() {
                extract_value(value, out, first_rule);
                return;
            }
        }
    }

    // Known keys holding a nested object count only if they yield results.
    for key in CONTAINER_KEYS {
        if let Some(value) = map.get(key) {
            if value.is_object() && try_extract(value, out, first_rule) {
                return;
            }
        }
    }

    // No known key matched: scan every key in document order for an array
    // that extracts something, then for a nested object that does.
    for value in map.values() {
        if matches!(value, Value::Array(items) if !items.is_empty())
            && try_extract(value, out, first_rule)
        {
            return;
        }
    }
    for value in map.values() {
        if value.is_object() && try_extract(value, out, first_rule) {
            return;
        }
    }

    // Last resort: the object is itself a record carrying string_list_data.
    if let Some(entries) = map.get("string_list_data").and_then(Value::as_array) {
        for entry in entries {
            if let Some(value) = entry.get("value").and_then(Value::as_str) {
                push_candidate(value, out);
            }
        }
    }
}

/// Trial recursion: merges into `out` only when the branch yields at least
/// one username, so abandoned branches leave no trace in the counts.
fn try_extract(value: &Value, out: &mut Extraction, first_rule: &mut Option<&'static str>) -> bool {
    let mut scratch = Extraction::default();
    extract_value(value, &mut scratch, first_rule);
    if scratch.usernames.is_empty() {
        return false;
    }
    out.usernames.append(&mut scratch.usernames);
    out.dropped += scratch.dropped;
    true
}

fn push_candidate(raw: &str, out: &mut Extraction) {
    match Username::parse(raw) {
        Some(username) => out.usernames.push(username),
        None => {
            out.dropped += 1;
            log::debug!("dropped invalid username candidate {:?}", raw);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(extraction: &Extraction) -> Vec<&str> {
        extraction.usernames.iter().map(|u| u.as_str()).collect()
    }

    #[test]
    fn test_extract_empty_array() {
        assert_eq!(extract(&json!([])), Extraction::default());
    }

    #[test]
    fn test_extract_empty_object() {
        assert_eq!(extract(&json!({})), Extraction::default());
    }

    #[test]
    fn test_extract_scalars_yield_nothing() {
        assert_eq!(extract(&json!(null)), Extraction::default());
        assert_eq!(extract(&json!(42)), Extraction::default());
        assert_eq!(extract(&json!(true)), Extraction::default());
    }

    #[test]
    fn test_extract_array_of_plain_strings() {
        let result = extract(&json!(["alice", "bob"]));
        assert_eq!(names(&result), vec!["alice", "bob"]);
        assert_eq!(result.dropped, 0);
    }

    #[test]
    fn test_extract_string_list_data_records() {
        let result = extract(&json!([
            {"string_list_data": [{"value": "alice", "timestamp": 1700000000}]},
            {"string_list_data": [{"value": "bob"}]}
        ]));
        assert_eq!(names(&result), vec!["alice", "bob"]);
    }

    #[test]
    fn test_extract_string_list_data_falls_back_to_href() {
        let result = extract(&json!([
            {"string_list_data": [{"href": "https://www.instagram.com/carol"}]},
            {"string_list_data": [{"href": "https://instagram.com/dave?hl=en"}]}
        ]));
        assert_eq!(names(&result), vec!["carol", "dave"]);
    }

    #[test]
    fn test_extract_mixed_shape_array_drops_numeric_value() {
        let result = extract(&json!([
            {"string_list_data": [{"value": "alice"}]},
            {"username": "bob"},
            {"value": "12345"},
            {"name": "carol"}
        ]));
        assert_eq!(names(&result), vec!["alice", "bob", "carol"]);
        assert_eq!(result.dropped, 1);
    }

    #[test]
    fn test_extract_title_beats_other_fields() {
        let result = extract(&json!([
            {"title": "alice", "username": "ignored"}
        ]));
        assert_eq!(names(&result), vec!["alice"]);
    }

    #[test]
    fn test_extract_blank_title_falls_through() {
        let result = extract(&json!([
            {"title": "  ", "username": "bob"}
        ]));
        assert_eq!(names(&result), vec!["bob"]);
    }

    #[test]
    fn test_extract_non_numeric_value_field() {
        let result = extract(&json!([{"value": "eve"}]));
        assert_eq!(names(&result), vec!["eve"]);
    }

    #[test]
    fn test_extract_nested_user_object() {
        let result = extract(&json!([{"user": {"username": "frank"}}]));
        assert_eq!(names(&result), vec!["frank"]);
    }

    #[test]
    fn test_extract_container_key_unwrapping() {
        let result = extract(&json!({"relationships_following": [{"title": "dave"}]}));
        assert_eq!(names(&result), vec!["dave"]);
    }

    #[test]
    fn test_extract_container_key_priority_over_scan() {
        let result = extract(&json!({
            "followers": [{"username": "alice"}],
            "zz_other": [{"username": "bob"}]
        }));
        assert_eq!(names(&result), vec!["alice"]);
    }

    #[test]
    fn test_extract_first_array_container_wins_even_when_empty() {
        // "followers" is probed before "following" and decides the result
        let result = extract(&json!({
            "followers": [],
            "following": [{"username": "bob"}]
        }));
        assert!(result.is_empty());
    }

    #[test]
    fn test_extract_nested_container_objects() {
        let result = extract(&json!({
            "data": {"users": [{"username": "grace"}]}
        }));
        assert_eq!(names(&result), vec!["grace"]);
    }

    #[test]
    fn test_extract_unknown_key_array_scan() {
        let result = extract(&json!({
            "some_export_section": [{"string_list_data": [{"value": "heidi"}]}]
        }));
        assert_eq!(names(&result), vec!["heidi"]);
    }

    #[test]
    fn test_extract_unknown_key_scan_follows_document_order() {
        // "zebra_section" comes first in the document even though
        // "alpha_section" sorts first alphabetically
        let result = extract(&json!({
            "zebra_section": [{"username": "first_in_doc"}],
            "alpha_section": [{"username": "sorts_first"}]
        }));
        assert_eq!(names(&result), vec!["first_in_doc"]);
    }

    #[test]
    fn test_extract_unknown_key_nested_object_scan() {
        let result = extract(&json!({
            "wrapper": {"inner": {"users": ["ivan"]}}
        }));
        assert_eq!(names(&result), vec!["ivan"]);
    }

    #[test]
    fn test_extract_object_as_direct_record() {
        let result = extract(&json!({
            "string_list_data": [{"value": "judy"}, {"value": "mallory"}]
        }));
        assert_eq!(names(&result), vec!["judy", "mallory"]);
    }

    #[test]
    fn test_extract_unrecognizable_object_is_empty_not_error() {
        let result = extract(&json!({"media_count": 3, "profile": "x y z!"}));
        assert!(result.is_empty());
    }

    #[test]
    fn test_extract_counts_invalid_candidates() {
        let result = extract(&json!([
            {"username": "ok_name"},
            {"username": "has spaces"},
            {"username": "way_too_long_for_a_username_over_30_chars"},
            {"unrecognized": true}
        ]));
        assert_eq!(names(&result), vec!["ok_name"]);
        assert_eq!(result.dropped, 3);
    }

    #[test]
    fn test_extract_keeps_duplicates_and_order() {
        let result = extract(&json!(["bob", "alice", "bob"]));
        assert_eq!(names(&result), vec!["bob", "alice", "bob"]);
    }

    #[test]
    fn test_extract_all_elements_pass_validity_predicate() {
        let result = extract(&json!([
            "alice", " bob ", "bad name!", "12345",
            {"string_list_data": [{"value": "carol.d_1"}]}
        ]));
        for username in &result.usernames {
            assert!(Username::parse(username.as_str()).is_some());
        }
        assert_eq!(names(&result), vec!["alice", "bob", "carol.d_1"]);
    }
}
