use serde::{Deserialize, Serialize};

use super::{RunSpec, Status};
use crate::apis::fields::write_trigger_fields;
use crate::apis::{Kind, ObjectMeta, OnChangeType, Resource, Schedule};
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
pub struct Triggers {
    /// Cron expressions
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schedules: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub on_change: Vec<OnChangeType>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunConfigurationStatus {
    #[serde(flatten)]
    pub status: Status,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub triggered_pipeline_version: String,
}

impl Resource for RunConfiguration {
    const KIND: Kind = Kind::RunConfiguration;
    const VERSION: &'static str = super::VERSION;

    resource_metadata!();

    fn compute_hash(&self) -> Vec<u8> {
        let schedules: Vec<Schedule> = self.spec.triggers.schedules.iter().map(Schedule::cron).collect();
        let mut oh = ObjectHasher::new();
        self.spec.run.write_fields(&mut oh);
        write_trigger_fields(&mut oh, &schedules, &self.spec.triggers.on_change, &[]);
        oh.sum()
    }
}
