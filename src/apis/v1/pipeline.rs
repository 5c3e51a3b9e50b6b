use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::Status;
use crate::apis::fields::{write_pipeline_fields, FrameworkFields};
use crate::apis::{Kind, NamedValue, NamespacedName, ObjectMeta, Resource};
use crate::hash::ObjectHasher;
use crate::version::image_version;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pipeline {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: PipelineSpec,
    #[serde(default)]
    pub status: Status,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineSpec {
    #[serde(default, skip_serializing_if = "NamespacedName::is_empty")]
    pub provider: NamespacedName,
    #[serde(default)]
    pub image: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<NamedValue>,
    #[serde(default)]
    pub framework: PipelineFramework,
}

/// The framework a pipeline is compiled with and its parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineFramework {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, Value>,
}

impl PipelineFramework {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: BTreeMap::new(),
        }
    }
}

impl Resource for Pipeline {
    const KIND: Kind = Kind::Pipeline;
    const VERSION: &'static str = super::VERSION;

    resource_metadata!();

    fn compute_hash(&self) -> Vec<u8> {
        let mut oh = ObjectHasher::new();
        let framework = FrameworkFields::from_framework(&self.spec.framework.name, &self.spec.framework.parameters);
        write_pipeline_fields(&mut oh, &self.spec.image, &self.spec.env, &framework);
        oh.sum()
    }

    fn compute_version(&self) -> String {
        image_version(&self.spec.image, &self.compute_hash())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pipeline() -> Pipeline {
        Pipeline {
            metadata: ObjectMeta::new("ns", "name"),
            spec: PipelineSpec {
                provider: NamespacedName::new("ns", "provider"),
                image: "image:42".into(),
                env: vec![NamedValue::new("a", "b")],
                framework: PipelineFramework {
                    name: "tfx".into(),
                    parameters: [("components".to_string(), json!("value"))].into(),
                },
            },
            status: Status::default(),
        }
    }

    #[test]
    fn test_version_shapes() {
        let empty = Pipeline::default();
        let version = empty.compute_version();
        assert_eq!(version.len(), 6);
        assert!(version.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));

        let tagged = pipeline().compute_version();
        assert!(tagged.starts_with("42-"));
        assert_eq!(tagged.len(), "42-".len() + 6);
    }

    #[test]
    fn test_bookkeeping_does_not_change_version() {
        let original = pipeline();
        let mut changed = original.clone();
        changed.metadata.generation = 7;
        changed.spec.provider = NamespacedName::new("other", "provider");
        changed.status.version = "whatever".into();
        assert_eq!(original.compute_version(), changed.compute_version());
    }

    #[test]
    fn test_semantic_fields_change_version() {
        let original = pipeline();

        let mut image = original.clone();
        image.spec.image = "image:43".into();
        let mut env = original.clone();
        env.spec.env.push(NamedValue::new("c", "d"));
        let mut framework = original.clone();
        framework.spec.framework.parameters.insert("beamArgs".into(), json!([{"name": "k", "value": "v"}]));

        for changed in [image, env, framework] {
            assert_ne!(original.compute_hash(), changed.compute_hash());
        }
    }
}
