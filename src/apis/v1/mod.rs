//! `v1`: the hub version
//!
//! Resources are stored and processed in this shape; every other version
//! converts to and from it.

mod experiment;
mod pipeline;
mod provider;
mod run;
mod run_configuration;
mod run_schedule;

pub use experiment::{Experiment, ExperimentSpec};
pub use pipeline::{Pipeline, PipelineFramework, PipelineSpec};
pub use provider::{Framework, Provider, ProviderSpec};
pub use run::{Run, RunSpec, RunStatus};
pub use run_configuration::{RunConfiguration, RunConfigurationSpec, RunConfigurationStatus, Triggers};
pub use run_schedule::{RunSchedule, RunScheduleSpec};

use serde::{Deserialize, Serialize};

use super::{is_zero, Condition, Kind, NamespacedName, SynchronizationState};

pub const VERSION: &str = "v1";

/// The provider a resource is synchronized with and its id there
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderAndId {
    #[serde(default, skip_serializing_if = "NamespacedName::is_empty")]
    pub name: NamespacedName,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
}

/// Observed state shared by every kind
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

/// Any hub resource
///
/// Lets version-agnostic code handle resources without knowing their kind.
#[derive(Debug, Clone, PartialEq)]
pub enum HubObject {
    Pipeline(Pipeline),
    Experiment(Experiment),
    Run(Run),
    RunConfiguration(RunConfiguration),
    RunSchedule(RunSchedule),
    Provider(Provider),
}

impl HubObject {
    pub fn kind(&self) -> Kind {
        match self {
            HubObject::Pipeline(_) => Kind::Pipeline,
            HubObject::Experiment(_) => Kind::Experiment,
            HubObject::Run(_) => Kind::Run,
            HubObject::RunConfiguration(_) => Kind::RunConfiguration,
            HubObject::RunSchedule(_) => Kind::RunSchedule,
            HubObject::Provider(_) => Kind::Provider,
        }
    }
}
