use serde::{Deserialize, Serialize};

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
#[serde(rename_all = "camelCase")]
pub struct PipelineSpec {
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub tfx_components: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<NamedValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub beam_args: Vec<NamedValue>,
}

impl Resource for Pipeline {
    const KIND: Kind = Kind::Pipeline;
    const VERSION: &'static str = super::VERSION;

    resource_metadata!();

    fn compute_hash(&self) -> Vec<u8> {
        let mut oh = ObjectHasher::new();
        let framework = FrameworkFields::legacy(&self.spec.tfx_components, &self.spec.beam_args);
        write_pipeline_fields(&mut oh, &self.spec.image, &self.spec.env, &framework);
        oh.sum()
    }

    fn compute_version(&self) -> String {
        image_version(&self.spec.image, &self.compute_hash())
    }
}
