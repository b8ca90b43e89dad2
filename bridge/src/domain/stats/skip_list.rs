//! Root-level field exclusion list

use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::core::constants::MANDATORY_SKIP_FIELD;
use crate::utils::json::type_name;

/// Ordered list of root field names removed before forwarding.
///
/// Always starts with the mandatory `latencies` entry. Duplicates supplied by
/// the user are kept as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SkipList(Vec<String>);

impl SkipList {
    /// Build from the raw `skipList` option.
    ///
    /// Only a JSON string contributes entries; anything else yields the
    /// seeded list.
    pub fn build(raw: Option<&JsonValue>) -> Self {
        match raw {
            Some(JsonValue::String(input)) => Self::parse(input),
            Some(other) => {
                tracing::debug!(
                    found = type_name(other),
                    "Ignoring non-string skipList option"
                );
                Self::default()
            }
            None => Self::default(),
        }
    }

    /// Parse a comma-separated list. Whitespace anywhere in the input is
    /// removed before splitting.
    pub fn parse(input: &str) -> Self {
        let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
        let mut list = Self::default();
        list.0.extend(
            compact
                .split(',')
                .filter(|token| !token.is_empty())
                .map(str::to_string),
        );
        list
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.iter().any(|entry| entry == field)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl Default for SkipList {
    fn default() -> Self {
        Self(vec![MANDATORY_SKIP_FIELD.to_string()])
    }
}

impl<S: Into<String>> FromIterator<S> for SkipList {
    /// Seeded list extended with the given entries.
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut list = Self::default();
        list.0.extend(iter.into_iter().map(Into::into));
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entries(list: &SkipList) -> Vec<&str> {
        list.as_slice().iter().map(String::as_str).collect()
    }

    #[test]
    fn test_default_is_seeded() {
        assert_eq!(entries(&SkipList::default()), vec!["latencies"]);
    }

    #[test]
    fn test_parse_single_value() {
        assert_eq!(entries(&SkipList::parse("rps")), vec!["latencies", "rps"]);
    }

    #[test]
    fn test_parse_without_spaces() {
        assert_eq!(
            entries(&SkipList::parse("rps,errors")),
            vec!["latencies", "rps", "errors"]
        );
    }

    #[test]
    fn test_parse_strips_whitespace() {
        assert_eq!(
            entries(&SkipList::parse("rps, errors, codes")),
            vec!["latencies", "rps", "errors", "codes"]
        );
        assert_eq!(
            entries(&SkipList::parse(" r p s ,\terr\nors ")),
            vec!["latencies", "rps", "errors"]
        );
    }

    #[test]
    fn test_parse_drops_empty_tokens() {
        assert_eq!(entries(&SkipList::parse("")), vec!["latencies"]);
        assert_eq!(entries(&SkipList::parse(" , ,")), vec!["latencies"]);
        assert_eq!(
            entries(&SkipList::parse("rps,,errors,")),
            vec!["latencies", "rps", "errors"]
        );
    }

    #[test]
    fn test_parse_keeps_duplicates() {
        assert_eq!(
            entries(&SkipList::parse("rps,rps,latencies")),
            vec!["latencies", "rps", "rps", "latencies"]
        );
    }

    #[test]
    fn test_build_from_string_option() {
        let raw = json!("codes, errors");
        assert_eq!(
            entries(&SkipList::build(Some(&raw))),
            vec!["latencies", "codes", "errors"]
        );
    }

    #[test]
    fn test_build_ignores_non_string_input() {
        assert_eq!(entries(&SkipList::build(None)), vec!["latencies"]);
        for raw in [json!(null), json!(42), json!(true), json!(["rps"]), json!({"rps": 1})] {
            assert_eq!(
                entries(&SkipList::build(Some(&raw))),
                vec!["latencies"],
                "input {} should be ignored",
                raw
            );
        }
    }

    #[test]
    fn test_contains() {
        let list = SkipList::parse("rps");
        assert!(list.contains("latencies"));
        assert!(list.contains("rps"));
        assert!(!list.contains("errors"));
        assert!(!list.contains("RPS"));
    }

    #[test]
    fn test_from_iter_is_seeded() {
        let list: SkipList = ["basic", "timestamp"].into_iter().collect();
        assert_eq!(entries(&list), vec!["latencies", "basic", "timestamp"]);
    }

    #[test]
    fn test_serializes_as_array() {
        let list = SkipList::parse("rps");
        assert_eq!(serde_json::to_value(&list).unwrap(), json!(["latencies", "rps"]));
    }
}
