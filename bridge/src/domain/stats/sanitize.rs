//! Snapshot sanitization
//!
//! Two passes over a stats snapshot:
//!
//! 1. Root fields named in the skip list are dropped. Deeper fields with the
//!    same names are kept.
//! 2. Every remaining node is visited depth-first. Empty objects and arrays
//!    are removed from their parent, null leaves are replaced with the
//!    default value, everything else is kept. Inside an array a removed
//!    element leaves a `null` in its slot so positional rows stay aligned.
//!
//! Emptiness is tested on a node as it was *before* its children were
//! cleaned. A subtree that only becomes empty while being cleaned stays in
//! the output as an empty object or array. Running the sanitizer a second
//! time would remove it; a single call does not.

use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

use super::SkipList;
use crate::utils::json::{is_composite, is_empty_composite, type_name};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SanitizeError {
    #[error("Snapshot root must be an object, found {found}")]
    NotAnObject { found: &'static str },
}

/// Sanitize a snapshot for forwarding.
///
/// The root is never removed, even when nothing is left in it. The default
/// value is substituted as given, whatever its JSON type.
pub fn sanitize(
    snapshot: JsonValue,
    skip_list: &SkipList,
    default_value: &JsonValue,
) -> Result<JsonValue, SanitizeError> {
    let JsonValue::Object(root) = snapshot else {
        return Err(SanitizeError::NotAnObject {
            found: type_name(&snapshot),
        });
    };

    let kept: Map<String, JsonValue> = root
        .into_iter()
        .filter(|(key, _)| {
            let skipped = skip_list.contains(key);
            if skipped {
                tracing::trace!(field = %key, "Skipping root field");
            }
            !skipped
        })
        .collect();

    Ok(JsonValue::Object(clean_object(kept, default_value)))
}

fn clean_object(map: Map<String, JsonValue>, default_value: &JsonValue) -> Map<String, JsonValue> {
    map.into_iter()
        .filter_map(|(key, value)| clean_child(value, default_value).map(|v| (key, v)))
        .collect()
}

fn clean_array(items: Vec<JsonValue>, default_value: &JsonValue) -> Vec<JsonValue> {
    items
        .into_iter()
        .map(|value| clean_child(value, default_value).unwrap_or(JsonValue::Null))
        .collect()
}

/// `None` means the child is dropped from its parent.
fn clean_child(value: JsonValue, default_value: &JsonValue) -> Option<JsonValue> {
    if is_composite(&value) {
        if is_empty_composite(&value) {
            return None;
        }
        return Some(match value {
            JsonValue::Object(map) => JsonValue::Object(clean_object(map, default_value)),
            JsonValue::Array(items) => JsonValue::Array(clean_array(items, default_value)),
            other => other,
        });
    }

    if is_invalid_leaf(&value) {
        Some(default_value.clone())
    } else {
        Some(value)
    }
}

/// Null, or a number with no finite value.
fn is_invalid_leaf(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => true,
        JsonValue::Number(n) => n.as_f64().is_some_and(|f| !f.is_finite()),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn common_skip_list() -> SkipList {
        SkipList::default()
    }

    fn zero() -> JsonValue {
        json!(0)
    }

    fn clean(snapshot: JsonValue) -> JsonValue {
        sanitize(snapshot, &common_skip_list(), &zero()).unwrap()
    }

    fn latencies() -> JsonValue {
        json!([
            [1477902921336_u64, "761465ff-220d-4924-b1c1-062868d3169b", 428076699, 301],
            [1477902921342_u64, "e8fa92e9-50bf-4d67-bce9-f7bc8e3687ee", 259315569, 301]
        ])
    }

    #[test]
    fn test_returns_basic() {
        let basic = json!({ "basic": 500, "timestamp": "2016-10-31T08:35:21.676Z" });
        assert_eq!(clean(basic.clone()), basic);
    }

    #[test]
    fn test_removes_skipped() {
        let with_skipped = json!({
            "basic": 500,
            "timestamp": "2016-10-31T08:35:21.676Z",
            "latencies": latencies()
        });
        assert_eq!(
            clean(with_skipped),
            json!({ "basic": 500, "timestamp": "2016-10-31T08:35:21.676Z" })
        );
    }

    #[test]
    fn test_returns_nothing_when_all_skipped() {
        let snapshot = json!({
            "basic": 500,
            "timestamp": "2016-10-31T08:35:21.676Z",
            "latencies": latencies()
        });
        let skip_list: SkipList = ["basic", "timestamp"].into_iter().collect();
        assert_eq!(sanitize(snapshot, &skip_list, &zero()).unwrap(), json!({}));
    }

    #[test]
    fn test_null_property_gets_default() {
        assert_eq!(
            clean(json!({ "scenariosCreated": null })),
            json!({ "scenariosCreated": 0 })
        );
    }

    #[test]
    fn test_custom_default_value() {
        let result = sanitize(
            json!({ "rps": { "mean": null, "count": 4 } }),
            &common_skip_list(),
            &json!(100000),
        )
        .unwrap();
        assert_eq!(result, json!({ "rps": { "mean": 100000, "count": 4 } }));
    }

    #[test]
    fn test_fractional_default_value() {
        let result = sanitize(json!({ "p99": null }), &common_skip_list(), &json!(-1.5)).unwrap();
        assert_eq!(result, json!({ "p99": -1.5 }));
    }

    #[test]
    fn test_non_numeric_default_value() {
        let result = sanitize(
            json!({ "p99": null, "rps": { "mean": null } }),
            &common_skip_list(),
            &json!("n/a"),
        )
        .unwrap();
        assert_eq!(result, json!({ "p99": "n/a", "rps": { "mean": "n/a" } }));
    }

    #[test]
    fn test_empty_object_pruned() {
        assert_eq!(clean(json!({ "errors": {} })), json!({}));
    }

    #[test]
    fn test_empty_array_pruned() {
        assert_eq!(clean(json!({ "codes": [], "rps": 3 })), json!({ "rps": 3 }));
    }

    #[test]
    fn test_subproperties_with_values_unchanged() {
        let nested = json!({
            "customStats": {
                "so": {
                    "value": 10,
                    "many": {
                        "value": 11,
                        "properties": { "value": 12 }
                    }
                }
            }
        });
        assert_eq!(clean(nested.clone()), nested);
    }

    #[test]
    fn test_nested_null_gets_default() {
        let nested = json!({
            "customStats": {
                "so": {
                    "value": 10,
                    "many": {
                        "value": null,
                        "properties": { "value": 12 }
                    }
                }
            }
        });
        let expected = json!({
            "customStats": {
                "so": {
                    "value": 10,
                    "many": {
                        "value": 0,
                        "properties": { "value": 12 }
                    }
                }
            }
        });
        assert_eq!(clean(nested), expected);
    }

    #[test]
    fn test_skip_only_applies_at_root() {
        let snapshot = json!({
            "scenarioStats": { "latencies": [1, 2], "count": 1 },
            "latencies": [1, 2]
        });
        assert_eq!(
            clean(snapshot),
            json!({ "scenarioStats": { "latencies": [1, 2], "count": 1 } })
        );
    }

    #[test]
    fn test_skip_list_duplicates_harmless() {
        let skip_list = SkipList::parse("rps,rps");
        let result = sanitize(json!({ "rps": 1, "codes": 2 }), &skip_list, &zero()).unwrap();
        assert_eq!(result, json!({ "codes": 2 }));
    }

    #[test]
    fn test_other_scalars_unchanged() {
        let snapshot = json!({
            "flag": false,
            "zero": 0,
            "empty": "",
            "name": "NaN",
            "ratio": 0.25
        });
        assert_eq!(clean(snapshot.clone()), snapshot);
    }

    #[test]
    fn test_array_elements_cleaned() {
        let snapshot = json!({ "series": [null, 1, {}, [], { "v": null }, [null]] });
        assert_eq!(
            clean(snapshot),
            json!({ "series": [0, 1, null, null, { "v": 0 }, [0]] })
        );
    }

    #[test]
    fn test_pruned_array_element_keeps_position() {
        assert_eq!(clean(json!({ "row": [1, {}, 2] })), json!({ "row": [1, null, 2] }));

        let rows = json!({ "rows": [[1477902921336_u64, [], 428076699, 301]] });
        assert_eq!(
            clean(rows),
            json!({ "rows": [[1477902921336_u64, null, 428076699, 301]] })
        );
    }

    #[test]
    fn test_empty_check_happens_before_recursion() {
        // `errors` holds only an empty object: the inner object is removed,
        // `errors` itself stays behind as `{}`. The empty array inside
        // `codes` leaves a hole.
        let snapshot = json!({ "errors": { "ETIMEDOUT": {} }, "codes": [[]] });
        let once = clean(snapshot);
        assert_eq!(once, json!({ "errors": {}, "codes": [null] }));

        // A second call prunes what the first one left empty and fills the hole.
        assert_eq!(clean(once), json!({ "codes": [0] }));
    }

    #[test]
    fn test_idempotent_without_nested_empties() {
        let snapshot = json!({
            "timestamp": "2016-10-31T08:35:21.676Z",
            "scenariosCreated": null,
            "errors": {},
            "codes": { "200": 10, "500": null },
            "latencies": [[1, "a", 2, 200]]
        });
        let once = clean(snapshot);
        let twice = clean(once.clone());
        assert_eq!(once, twice);
        assert_eq!(
            once,
            json!({
                "timestamp": "2016-10-31T08:35:21.676Z",
                "scenariosCreated": 0,
                "codes": { "200": 10, "500": 0 }
            })
        );
    }

    #[test]
    fn test_empty_root_kept() {
        assert_eq!(clean(json!({})), json!({}));
    }

    #[test]
    fn test_preserves_field_order() {
        let result = clean(json!({ "z": 1, "a": null, "m": { "y": 2, "b": 3 } }));
        let keys: Vec<&String> = result.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
        let inner: Vec<&String> = result["m"].as_object().unwrap().keys().collect();
        assert_eq!(inner, vec!["y", "b"]);
    }

    #[test]
    fn test_non_object_root_rejected() {
        assert_eq!(
            sanitize(json!([1, 2]), &common_skip_list(), &zero()),
            Err(SanitizeError::NotAnObject { found: "array" })
        );
        assert_eq!(
            sanitize(JsonValue::Null, &common_skip_list(), &zero()),
            Err(SanitizeError::NotAnObject { found: "null" })
        );
        assert_eq!(
            sanitize(json!("stats"), &common_skip_list(), &zero()),
            Err(SanitizeError::NotAnObject { found: "string" })
        );
    }

    #[test]
    fn test_error_message() {
        let err = sanitize(json!(5), &common_skip_list(), &zero()).unwrap_err();
        assert_eq!(err.to_string(), "Snapshot root must be an object, found number");
    }
}
