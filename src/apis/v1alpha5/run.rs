use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{literal_parameters, Status};
use crate::apis::fields::write_run_fields;
use crate::apis::{CompletionState, Kind, ObjectMeta, PipelineIdentifier, Resource};
use crate::hash::ObjectHasher;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: RunSpec,
    #[serde(default)]
    pub status: RunStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSpec {
    #[serde(default)]
    pub pipeline: PipelineIdentifier,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub experiment_name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub runtime_parameters: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStatus {
    #[serde(flatten)]
    pub status: Status,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub observed_pipeline_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_state: Option<CompletionState>,
}

impl Resource for Run {
    const KIND: Kind = Kind::Run;
    const VERSION: &'static str = super::VERSION;

    resource_metadata!();

    fn compute_hash(&self) -> Vec<u8> {
        let mut oh = ObjectHasher::new();
        write_run_fields(
            &mut oh,
            &self.spec.pipeline,
            &self.spec.experiment_name,
            &literal_parameters(&self.spec.runtime_parameters),
            &[],
        );
        oh.sum()
    }
}
