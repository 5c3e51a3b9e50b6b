//! `v1alpha5`
//!
//! The oldest served version. Resources only record their provider's run id,
//! named values are string maps and a run configuration holds a single cron
//! schedule directly in its spec.

mod conversion;
mod experiment;
mod pipeline;
mod run;
mod run_configuration;
mod run_schedule;

pub use conversion::{
    PipelineConversionRemainder, ResourceConversionRemainder, RunConfigurationConversionRemainder,
    RunConversionRemainder, RunScheduleConversionRemainder,
};
pub use experiment::{Experiment, ExperimentSpec};
pub use pipeline::{Pipeline, PipelineSpec};
pub use run::{Run, RunSpec, RunStatus};
pub use run_configuration::{RunConfiguration, RunConfigurationSpec, RunConfigurationStatus};
pub use run_schedule::{RunSchedule, RunScheduleSpec};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{is_zero, NamedValue, RuntimeParameter, SynchronizationState};

pub const VERSION: &str = "v1alpha5";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub kfp_id: String,
    #[serde(default, skip_serializing_if = "SynchronizationState::is_unknown")]
    pub synchronization_state: SynchronizationState,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub observed_generation: i64,
}

/// Runtime parameters of a map, as literal values
pub(crate) fn literal_parameters(map: &BTreeMap<String, String>) -> Vec<RuntimeParameter> {
    map.iter()
        .map(|(name, value)| RuntimeParameter::literal(name.clone(), value.clone()))
        .collect()
}

pub(crate) fn named_values(map: &BTreeMap<String, String>) -> Vec<NamedValue> {
    super::named_value::from_map(map)
}
