//! `v1alpha6`
//!
//! Resources carry no provider in their spec, pipelines describe their
//! framework with the `tfxComponents`/`beamArgs` pair and triggers are bare
//! cron expressions.

mod conversion;
mod experiment;
mod pipeline;
mod run;
mod run_configuration;
mod run_schedule;

pub use conversion::{
    PipelineConversionRemainder, ResourceConversionRemainder, RunConfigurationConversionRemainder,
    RunScheduleConversionRemainder,
};
pub use experiment::{Experiment, ExperimentSpec};
pub use pipeline::{Pipeline, PipelineSpec};
pub use run::{Run, RunSpec, RunStatus};
pub use run_configuration::{RunConfiguration, RunConfigurationSpec, RunConfigurationStatus, Triggers};
pub use run_schedule::{RunSchedule, RunScheduleSpec};

use serde::{Deserialize, Serialize};

use super::{is_zero, SynchronizationState};

pub const VERSION: &str = "v1alpha6";

/// The provider a resource is synchronized with, by name, and its id there
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderAndId {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub provider: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    #[serde(default)]
    pub provider_id: ProviderAndId,
    #[serde(default, skip_serializing_if = "SynchronizationState::is_unknown")]
    pub synchronization_state: SynchronizationState,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub observed_generation: i64,
}
