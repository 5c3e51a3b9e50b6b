//! Named values and their map representation
//!
//! Older schema versions model several fields as string maps where newer ones
//! use lists of named values. Lists may hold duplicate names and carry an
//! order; maps cannot, so collapsing a list reports whether it was lossless.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{ConversionError, Result};

/// A name/value pair
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NamedValue {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

impl NamedValue {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// List form of a map, ordered by key
pub fn from_map(map: &BTreeMap<String, String>) -> Vec<NamedValue> {
    map.iter()
        .map(|(name, value)| NamedValue::new(name.clone(), value.clone()))
        .collect()
}

/// Map form of a list; fails on the first duplicate name
pub fn to_map(values: &[NamedValue], field: &str) -> Result<BTreeMap<String, String>> {
    let mut map = BTreeMap::new();
    for nv in values {
        if map.insert(nv.name.clone(), nv.value.clone()).is_some() {
            return Err(ConversionError::DuplicateKey {
                field: field.to_string(),
                key: nv.name.clone(),
            });
        }
    }
    Ok(map)
}

/// Map form of a list keeping the first value of every name
pub fn to_map_lossy(values: &[NamedValue]) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    for nv in values {
        map.entry(nv.name.clone()).or_insert_with(|| nv.value.clone());
    }
    map
}

/// Collapse a list into a map for a version that only has the map shape
///
/// Returns the map plus the original list when the map alone would not
/// restore it exactly (duplicates or an order other than by name).
pub fn collapse(values: &[NamedValue], field: &str) -> Result<(BTreeMap<String, String>, Option<Vec<NamedValue>>)> {
    match to_map(values, field) {
        Ok(map) => {
            let lossless = from_map(&map) == values;
            Ok((map, (!lossless).then(|| values.to_vec())))
        }
        Err(ConversionError::DuplicateKey { .. }) => Ok((to_map_lossy(values), Some(values.to_vec()))),
        Err(err) => Err(err),
    }
}

/// Inverse of [`collapse`]: prefer the stored list while it still matches the map
pub fn expand(map: &BTreeMap<String, String>, stored: Option<Vec<NamedValue>>) -> Vec<NamedValue> {
    match stored {
        Some(list) if to_map_lossy(&list) == *map => list,
        _ => from_map(map),
    }
}
