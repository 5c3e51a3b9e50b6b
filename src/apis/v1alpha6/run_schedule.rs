use serde::{Deserialize, Serialize};

use super::Status;
use crate::apis::fields::write_run_schedule_fields;
use crate::apis::{Kind, NamedValue, ObjectMeta, OutputArtifact, PipelineIdentifier, Resource, Schedule};
use crate::hash::ObjectHasher;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSchedule {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: RunScheduleSpec,
    #[serde(default)]
    pub status: Status,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunScheduleSpec {
    #[serde(default)]
    pub pipeline: PipelineIdentifier,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub experiment_name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub runtime_parameters: Vec<NamedValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<OutputArtifact>,
    /// Cron expression
    #[serde(default)]
    pub schedule: String,
}

impl Resource for RunSchedule {
    const KIND: Kind = Kind::RunSchedule;
    const VERSION: &'static str = super::VERSION;

    resource_metadata!();

    fn compute_hash(&self) -> Vec<u8> {
        let mut oh = ObjectHasher::new();
        write_run_schedule_fields(
            &mut oh,
            &self.spec.pipeline,
            &self.spec.experiment_name,
            &self.spec.runtime_parameters,
            &self.spec.artifacts,
            &Schedule::cron(self.spec.schedule.as_str()),
        );
        oh.sum()
    }
}
