//! Canonical field hashing for resource versions
//!
//! Every field write is terminated by a separator byte so that `("ab", "c")`
//! and `("a", "bc")` hash differently. Compound fields are sorted before they
//! are written and closed with one extra separator.

use sha2::{Digest, Sha256};
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::apis::NamedValue;

const FIELD_SEPARATOR: [u8; 1] = [0];

/// Order-independent hasher over a sequence of semantic fields
#[derive(Debug, Clone, Default)]
pub struct ObjectHasher {
    hasher: Sha256,
}

impl ObjectHasher {
    /// Create a fresh hasher
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a single string field followed by a separator
    pub fn write_string_field(&mut self, value: &str) {
        self.hasher.update(value.as_bytes());
        self.hasher.update(FIELD_SEPARATOR);
    }

    /// Write a map field as key/value pairs in key order
    pub fn write_map_field<'a, I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        let mut sorted: Vec<_> = entries.into_iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(b.0));
        for (key, value) in sorted {
            self.write_string_field(key);
            self.write_string_field(value);
        }
        self.hasher.update(FIELD_SEPARATOR);
    }

    /// Write a list field sorted by `compare`; the caller's list is left untouched
    pub fn write_list_field<T, C, W>(&mut self, list: &[T], mut compare: C, mut write_one: W)
    where
        C: FnMut(&T, &T) -> Ordering,
        W: FnMut(&mut Self, &T),
    {
        let mut sorted: Vec<&T> = list.iter().collect();
        sorted.sort_by(|a, b| compare(*a, *b));
        for item in sorted {
            write_one(self, item);
        }
        self.hasher.update(FIELD_SEPARATOR);
    }

    /// Write a list of named values ordered by name, then value
    pub fn write_named_values(&mut self, values: &[NamedValue]) {
        self.write_list_field(values, NamedValue::cmp, |oh, nv| {
            oh.write_string_field(&nv.name);
            oh.write_string_field(&nv.value);
        });
    }

    /// Write a list of plain strings in lexicographic order
    pub fn write_string_list(&mut self, values: &[String]) {
        self.write_list_field(values, String::cmp, |oh, v| oh.write_string_field(v));
    }

    /// Write a map of JSON values, each rendered as canonical JSON
    pub fn write_json_map_field(&mut self, map: &BTreeMap<String, serde_json::Value>) {
        let rendered: BTreeMap<String, String> = map
            .iter()
            .map(|(k, v)| (k.clone(), canonical_json(v)))
            .collect();
        self.write_map_field(&rendered);
    }

    /// Digest of everything written so far
    pub fn sum(&self) -> Vec<u8> {
        self.hasher.clone().finalize().to_vec()
    }
}

/// Render a JSON value with object keys sorted and no whitespace
pub fn canonical_json(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Object(map) => {
            let mut pairs: Vec<_> = map.iter().collect();
            pairs.sort_by_key(|(k, _)| k.as_str());
            let entries: Vec<String> = pairs
                .iter()
                .map(|(k, v)| format!("{}:{}", serde_json::Value::String((*k).clone()), canonical_json(v)))
                .collect();
            format!("{{{}}}", entries.join(","))
        }
        serde_json::Value::Array(items) => {
            let entries: Vec<String> = items.iter().map(canonical_json).collect();
            format!("[{}]", entries.join(","))
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn nv(name: &str, value: &str) -> NamedValue {
        NamedValue::new(name, value)
    }

    #[test]
    fn test_field_boundaries_matter() {
        let mut first = ObjectHasher::new();
        first.write_string_field("ab");
        first.write_string_field("c");

        let mut second = ObjectHasher::new();
        second.write_string_field("a");
        second.write_string_field("bc");

        assert_ne!(first.sum(), second.sum());
    }

    #[test]
    fn test_sum_is_repeatable() {
        let mut oh = ObjectHasher::new();
        oh.write_string_field("value");
        assert_eq!(oh.sum(), oh.sum());
        assert_eq!(oh.sum().len(), 32);
    }

    #[test]
    fn test_map_iteration_order_is_irrelevant() {
        let map: HashMap<String, String> = (0..32)
            .map(|i| (format!("key{i}"), format!("value{i}")))
            .collect();

        let mut expected = ObjectHasher::new();
        expected.write_map_field(&map);
        let expected = expected.sum();

        for _ in 0..16 {
            let copy: HashMap<String, String> = map.clone().into_iter().collect();
            let mut oh = ObjectHasher::new();
            oh.write_map_field(&copy);
            assert_eq!(oh.sum(), expected);
        }
    }

    #[test]
    fn test_list_permutation_is_irrelevant() {
        let values = vec![nv("b", "2"), nv("a", "1"), nv("a", "0")];
        let mut reversed = values.clone();
        reversed.reverse();

        let mut first = ObjectHasher::new();
        first.write_named_values(&values);
        let mut second = ObjectHasher::new();
        second.write_named_values(&reversed);

        assert_eq!(first.sum(), second.sum());
    }

    #[test]
    fn test_list_write_does_not_reorder_input() {
        let values = vec![nv("b", "2"), nv("a", "1")];
        let mut oh = ObjectHasher::new();
        oh.write_named_values(&values);
        assert_eq!(values, vec![nv("b", "2"), nv("a", "1")]);
    }

    #[test]
    fn test_map_matches_equivalent_named_values() {
        let map: BTreeMap<String, String> =
            [("a".to_string(), "b".to_string()), ("c".to_string(), "d".to_string())].into();

        let mut from_map = ObjectHasher::new();
        from_map.write_map_field(&map);
        let mut from_list = ObjectHasher::new();
        from_list.write_named_values(&[nv("c", "d"), nv("a", "b")]);

        assert_eq!(from_map.sum(), from_list.sum());
    }

    #[test]
    fn test_adjacent_compound_fields_do_not_merge() {
        let mut first = ObjectHasher::new();
        first.write_named_values(&[nv("a", "b"), nv("c", "d")]);
        first.write_named_values(&[]);

        let mut second = ObjectHasher::new();
        second.write_named_values(&[nv("a", "b")]);
        second.write_named_values(&[nv("c", "d")]);

        assert_ne!(first.sum(), second.sum());
    }

    #[test]
    fn test_canonical_json_sorts_keys() {
        let value = serde_json::json!({"z": 1, "a": {"y": [true, null], "b": "x"}});
        assert_eq!(canonical_json(&value), r#"{"a":{"b":"x","y":[true,null]},"z":1}"#);
    }
}
