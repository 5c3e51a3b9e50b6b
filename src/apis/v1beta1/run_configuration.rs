use serde::{Deserialize, Serialize};

use super::{RunSpec, Status, Triggers};
use crate::apis::fields::write_trigger_fields;
use crate::apis::{Kind, LatestRuns, ObjectMeta, Resource};
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
pub struct RunConfigurationSpec {
    #[serde(default)]
    pub run: RunSpec,
    #[serde(default)]
    pub triggers: Triggers,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunConfigurationStatus {
    #[serde(flatten)]
    pub status: Status,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub triggered_pipeline_version: String,
    #[serde(default, skip_serializing_if = "LatestRuns::is_empty")]
    pub latest_runs: LatestRuns,
}

impl Resource for RunConfiguration {
    const KIND: Kind = Kind::RunConfiguration;
    const VERSION: &'static str = super::VERSION;

    resource_metadata!();

    fn compute_hash(&self) -> Vec<u8> {
        let mut oh = ObjectHasher::new();
        self.spec.run.write_fields(&mut oh);
        write_trigger_fields(
            &mut oh,
            &self.spec.triggers.schedules,
            &self.spec.triggers.on_change,
            &self.spec.triggers.run_configurations,
        );
        oh.sum()
    }
}
