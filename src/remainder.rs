//! Conversion remainders stored as annotations
//!
//! When a resource is converted to a version that cannot express some of its
//! fields, those fields are written as JSON under a version-specific
//! annotation. Converting back reads them and removes the annotation.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::apis::{ObjectMeta, GROUP};
use crate::error::{ConversionError, Result};

/// Annotation key of the remainder owed to `version`
pub fn annotation_key(version: &str) -> String {
    format!("{}.{}/conversions.remainder", version, GROUP)
}

/// Fields a spoke version cannot represent
pub trait Remainder: Serialize + DeserializeOwned {
    /// The spoke version whose conversions produce this remainder
    const VERSION: &'static str;

    /// Whether there is nothing to preserve
    fn is_empty(&self) -> bool;
}

/// Object-safe view of a [`Remainder`], so several can be stored at once
pub trait StoredRemainder {
    fn annotation_key(&self) -> String;

    fn is_empty(&self) -> bool;

    fn encode(&self) -> Result<String>;

    fn decode(&mut self, raw: &str) -> Result<()>;
}

impl<T: Remainder> StoredRemainder for T {
    fn annotation_key(&self) -> String {
        annotation_key(T::VERSION)
    }

    fn is_empty(&self) -> bool {
        Remainder::is_empty(self)
    }

    fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    fn decode(&mut self, raw: &str) -> Result<()> {
        let key = StoredRemainder::annotation_key(self);
        *self = serde_json::from_str(raw).map_err(|source| ConversionError::MalformedRemainder { key, source })?;
        Ok(())
    }
}

/// Store every non-empty remainder under its annotation key
///
/// Empty remainders are skipped and leave any existing annotation untouched.
pub fn set(meta: &mut ObjectMeta, remainders: &[&dyn StoredRemainder]) -> Result<()> {
    for remainder in remainders {
        if remainder.is_empty() {
            continue;
        }
        let encoded = remainder.encode()?;
        meta.annotations
            .get_or_insert_with(BTreeMap::new)
            .insert(remainder.annotation_key(), encoded);
    }
    Ok(())
}

/// Load and remove every remainder present in the annotations
///
/// Absent annotations leave the remainder untouched. The annotation map is
/// dropped once it is empty.
pub fn get_and_clear(meta: &mut ObjectMeta, remainders: &mut [&mut dyn StoredRemainder]) -> Result<()> {
    for remainder in remainders.iter_mut() {
        let key = remainder.annotation_key();
        let raw = match meta.annotations.as_mut().and_then(|a| a.remove(&key)) {
            Some(raw) => raw,
            None => continue,
        };
        remainder.decode(&raw)?;
    }
    drop_empty_annotations(meta);
    Ok(())
}

/// Remove a remainder annotation without reading it
pub fn unset(meta: &mut ObjectMeta, version: &str) {
    if let Some(annotations) = meta.annotations.as_mut() {
        annotations.remove(&annotation_key(version));
    }
    drop_empty_annotations(meta);
}

fn drop_empty_annotations(meta: &mut ObjectMeta) {
    if meta.annotations.as_ref().is_some_and(BTreeMap::is_empty) {
        meta.annotations = None;
    }
}

/// Read the remainder for `T` from a copy of `meta`
///
/// Returns the metadata without the annotation together with the remainder
/// (its default when absent).
pub fn take<T: Remainder + Default>(meta: &ObjectMeta) -> Result<(ObjectMeta, T)> {
    let mut meta = meta.clone();
    let mut remainder = T::default();
    get_and_clear(&mut meta, &mut [&mut remainder])?;
    Ok((meta, remainder))
}

/// Attach the remainder for `T` to a copy of `meta`, replacing any earlier one
pub fn attach<T: Remainder>(meta: &ObjectMeta, remainder: &T) -> Result<ObjectMeta> {
    let mut meta = meta.clone();
    unset(&mut meta, T::VERSION);
    set(&mut meta, &[remainder])?;
    Ok(meta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct NamespaceRemainder {
        #[serde(default, skip_serializing_if = "String::is_empty")]
        namespace: String,
    }

    impl Remainder for NamespaceRemainder {
        const VERSION: &'static str = "v1test";

        fn is_empty(&self) -> bool {
            self.namespace.is_empty()
        }
    }

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct ScheduleRemainder {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        schedules: Vec<String>,
    }

    impl Remainder for ScheduleRemainder {
        const VERSION: &'static str = "v2test";

        fn is_empty(&self) -> bool {
            self.schedules.is_empty()
        }
    }

    #[test]
    fn test_key_format() {
        assert_eq!(annotation_key("v1alpha5"), "v1alpha5.pipelines.kubeflow.org/conversions.remainder");
    }

    #[test]
    fn test_set_and_get_round_trip() {
        let mut meta = ObjectMeta::default();
        let namespace = NamespaceRemainder { namespace: "ns".into() };
        let schedules = ScheduleRemainder { schedules: vec!["* * * * *".into()] };
        set(&mut meta, &[&namespace, &schedules]).unwrap();
        assert_eq!(meta.annotations.as_ref().unwrap().len(), 2);

        let mut loaded_namespace = NamespaceRemainder::default();
        let mut loaded_schedules = ScheduleRemainder::default();
        get_and_clear(&mut meta, &mut [&mut loaded_namespace, &mut loaded_schedules]).unwrap();

        assert_eq!(loaded_namespace, namespace);
        assert_eq!(loaded_schedules, schedules);
        assert_eq!(meta.annotations, None);
    }

    #[test]
    fn test_empty_remainder_is_not_written() {
        let mut meta = ObjectMeta::default();
        set(&mut meta, &[&NamespaceRemainder::default()]).unwrap();
        assert_eq!(meta.annotations, None);
    }

    #[test]
    fn test_empty_remainder_leaves_stale_annotation() {
        let mut meta = ObjectMeta::default();
        set(&mut meta, &[&NamespaceRemainder { namespace: "ns".into() }]).unwrap();
        set(&mut meta, &[&NamespaceRemainder::default()]).unwrap();
        assert!(meta.annotation(&annotation_key("v1test")).is_some());

        unset(&mut meta, "v1test");
        assert_eq!(meta.annotations, None);
    }

    #[test]
    fn test_absent_annotation_is_not_an_error() {
        let mut meta = ObjectMeta::default();
        meta.annotations = Some([("other".to_string(), "value".to_string())].into());
        let mut remainder = NamespaceRemainder::default();
        get_and_clear(&mut meta, &mut [&mut remainder]).unwrap();
        assert!(Remainder::is_empty(&remainder));
        assert_eq!(meta.annotation("other"), Some("value"));
    }

    #[test]
    fn test_malformed_payload_is_an_error() {
        let mut meta = ObjectMeta::default();
        meta.annotations = Some([(annotation_key("v1test"), "{not json".to_string())].into());
        let mut remainder = NamespaceRemainder::default();
        match get_and_clear(&mut meta, &mut [&mut remainder]) {
            Err(ConversionError::MalformedRemainder { key, .. }) => assert_eq!(key, annotation_key("v1test")),
            other => panic!("expected malformed remainder, got {other:?}"),
        }
    }

    #[test]
    fn test_take_leaves_source_untouched() {
        let mut meta = ObjectMeta::default();
        set(&mut meta, &[&NamespaceRemainder { namespace: "ns".into() }]).unwrap();
        let (cleared, remainder): (ObjectMeta, NamespaceRemainder) = take(&meta).unwrap();
        assert_eq!(remainder.namespace, "ns");
        assert_eq!(cleared.annotations, None);
        assert!(meta.annotation(&annotation_key("v1test")).is_some());
    }

    #[test]
    fn test_attach_replaces_stale_annotation() {
        let mut meta = ObjectMeta::default();
        set(&mut meta, &[&NamespaceRemainder { namespace: "stale".into() }]).unwrap();

        let attached = attach(&meta, &NamespaceRemainder::default()).unwrap();
        assert_eq!(attached.annotations, None);

        let attached = attach(&meta, &NamespaceRemainder { namespace: "fresh".into() }).unwrap();
        let (_, remainder): (ObjectMeta, NamespaceRemainder) = take(&attached).unwrap();
        assert_eq!(remainder.namespace, "fresh");
    }
}
