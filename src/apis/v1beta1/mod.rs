//! `v1beta1`
//!
//! Close to the hub, but providers are referenced by bare name and the
//! provider resource has no framework list or namespace allow-list.

mod conversion;
mod experiment;
mod pipeline;
mod provider;
mod run;
mod run_configuration;
mod run_schedule;

pub use conversion::{ProviderConversionRemainder, ResourceConversionRemainder};
pub use experiment::{Experiment, ExperimentSpec};
pub use pipeline::{Pipeline, PipelineFramework, PipelineSpec};
pub use provider::{Provider, ProviderSpec};
pub use run::{Run, RunSpec, RunStatus};
pub use run_configuration::{RunConfiguration, RunConfigurationSpec, RunConfigurationStatus};
pub use run_schedule::{RunSchedule, RunScheduleSpec};

pub use super::v1::Triggers;

use serde::{Deserialize, Serialize};

use super::{is_zero, Condition, SynchronizationState};

pub const VERSION: &str = "v1beta1";

/// The provider a resource is synchronized with, by name, and its id there
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderAndId {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    #[serde(default)]
    pub provider: ProviderAndId,
    #[serde(default, skip_serializing_if = "SynchronizationState::is_unknown")]
    pub synchronization_state: SynchronizationState,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub observed_generation: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
}
