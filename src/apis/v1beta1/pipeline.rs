use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::Status;
use crate::apis::fields::{write_pipeline_fields, FrameworkFields};
use crate::apis::{Kind, NamedValue, ObjectMeta, Resource};
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
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub provider: String,
    #[serde(default)]
    pub image: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<NamedValue>,
    #[serde(default)]
    pub framework: PipelineFramework,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineFramework {
    #[serde(rename = "type", default)]
    pub type_: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, Value>,
}

impl Resource for Pipeline {
    const KIND: Kind = Kind::Pipeline;
    const VERSION: &'static str = super::VERSION;

    resource_metadata!();

    fn compute_hash(&self) -> Vec<u8> {
        let mut oh = ObjectHasher::new();
        let framework = FrameworkFields::from_framework(&self.spec.framework.type_, &self.spec.framework.parameters);
        write_pipeline_fields(&mut oh, &self.spec.image, &self.spec.env, &framework);
        oh.sum()
    }

    fn compute_version(&self) -> String {
        image_version(&self.spec.image, &self.compute_hash())
    }
}
