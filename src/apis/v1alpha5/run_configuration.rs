use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{literal_parameters, Status};
use crate::apis::fields::{write_run_fields, write_trigger_fields};
use crate::apis::{Kind, ObjectMeta, PipelineIdentifier, Resource, Schedule};
use crate::hash::ObjectHasher;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfiguration {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: RunConfigurationSpec,
    #[serde(default)]
    pub status: RunConfigurationStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunConfigurationSpec {
    #[serde(default)]
    pub pipeline: PipelineIdentifier,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub experiment_name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub runtime_parameters: BTreeMap<String, String>,
    /// Cron expression; empty when the configuration is not scheduled
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub schedule: String,
}

impl RunConfigurationSpec {
    /// The schedule slot as a list of schedules
    pub fn schedules(&self) -> Vec<Schedule> {
        if self.schedule.is_empty() {
            Vec::new()
        } else {
            vec![Schedule::cron(self.schedule.as_str())]
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunConfigurationStatus {
    #[serde(flatten)]
    pub status: Status,
    /// The hub's `triggeredPipelineVersion`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub observed_pipeline_version: String,
}

impl Resource for RunConfiguration {
    const KIND: Kind = Kind::RunConfiguration;
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
        write_trigger_fields(&mut oh, &self.spec.schedules(), &[], &[]);
        oh.sum()
    }
}
