use serde::{Deserialize, Serialize};

use super::{
    Experiment, ExperimentSpec, Pipeline, PipelineSpec, ProviderAndId, Run, RunConfiguration, RunConfigurationSpec,
    RunConfigurationStatus, RunSchedule, RunScheduleSpec, RunSpec, RunStatus, Status, Triggers,
};
use crate::apis::framework::LegacyFramework;
use crate::apis::{v1 as hub, Condition, LatestRuns, NamespacedName, Schedule};
use crate::conversion::{reduce_schedule, reduce_schedules, restore_schedule, restore_schedules, ConversionContext, Convertible};
use crate::error::Result;
use crate::remainder::{self, Remainder};

/// Provider and status details every kind loses at `v1alpha6`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceConversionRemainder {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<NamespacedName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_provider_namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
}

impl Remainder for ResourceConversionRemainder {
    const VERSION: &'static str = super::VERSION;

    fn is_empty(&self) -> bool {
        self.provider.is_none() && self.status_provider_namespace.is_none() && self.conditions.is_empty()
    }
}

impl ResourceConversionRemainder {
    /// Reduce a hub provider and status, keeping what the spoke cannot hold
    pub(crate) fn pack(provider: &NamespacedName, status: &hub::Status, ctx: &ConversionContext) -> (Self, Status) {
        let remainder = Self {
            provider: ctx.provider_to_store(provider),
            status_provider_namespace: ctx.namespace_to_store(&status.provider.name),
            conditions: status.conditions.clone(),
        };
        let status = Status {
            provider_id: ProviderAndId {
                provider: status.provider.name.name.clone(),
                id: status.provider.id.clone(),
            },
            synchronization_state: status.synchronization_state,
            version: status.version.clone(),
            observed_generation: status.observed_generation,
        };
        (remainder, status)
    }

    /// Inverse of [`ResourceConversionRemainder::pack`]
    pub(crate) fn unpack(self, status: &Status, ctx: &ConversionContext) -> (NamespacedName, hub::Status) {
        let status = hub::Status {
            provider: hub::ProviderAndId {
                name: ctx.qualify(&status.provider_id.provider, self.status_provider_namespace),
                id: status.provider_id.id.clone(),
            },
            synchronization_state: status.synchronization_state,
            version: status.version.clone(),
            observed_generation: status.observed_generation,
            conditions: self.conditions,
        };
        (ctx.spec_provider(self.provider), status)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConversionRemainder {
    #[serde(flatten)]
    pub resource: ResourceConversionRemainder,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework: Option<hub::PipelineFramework>,
}

impl Remainder for PipelineConversionRemainder {
    const VERSION: &'static str = super::VERSION;

    fn is_empty(&self) -> bool {
        Remainder::is_empty(&self.resource) && self.framework.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunConfigurationConversionRemainder {
    #[serde(flatten)]
    pub resource: ResourceConversionRemainder,
    /// Schedules with bounds, which bare cron expressions drop
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedules: Option<Vec<Schedule>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub run_configurations: Vec<String>,
    #[serde(default, skip_serializing_if = "LatestRuns::is_empty")]
    pub latest_runs: LatestRuns,
}

impl Remainder for RunConfigurationConversionRemainder {
    const VERSION: &'static str = super::VERSION;

    fn is_empty(&self) -> bool {
        Remainder::is_empty(&self.resource)
            && self.schedules.is_none()
            && self.run_configurations.is_empty()
            && self.latest_runs.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunScheduleConversionRemainder {
    #[serde(flatten)]
    pub resource: ResourceConversionRemainder,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Schedule>,
}

impl Remainder for RunScheduleConversionRemainder {
    const VERSION: &'static str = super::VERSION;

    fn is_empty(&self) -> bool {
        Remainder::is_empty(&self.resource) && self.schedule.is_none()
    }
}

impl Convertible for Pipeline {
    type Hub = hub::Pipeline;

    fn convert_to(&self, ctx: &ConversionContext) -> Result<hub::Pipeline> {
        let (metadata, remainder): (_, PipelineConversionRemainder) = remainder::take(&self.metadata)?;
        let framework = LegacyFramework {
            components: self.spec.tfx_components.clone(),
            beam_args: self.spec.beam_args.clone(),
            stored: remainder.framework,
        }
        .restore()?;
        let (provider, status) = remainder.resource.unpack(&self.status, ctx);
        Ok(hub::Pipeline {
            metadata,
            spec: hub::PipelineSpec {
                provider,
                image: self.spec.image.clone(),
                env: self.spec.env.clone(),
                framework,
            },
            status,
        })
    }

    fn convert_from(hub: &hub::Pipeline, ctx: &ConversionContext) -> Result<Self> {
        let framework = LegacyFramework::reduce(&hub.spec.framework)?;
        let (resource, status) = ResourceConversionRemainder::pack(&hub.spec.provider, &hub.status, ctx);
        let remainder = PipelineConversionRemainder {
            resource,
            framework: framework.stored,
        };
        Ok(Self {
            metadata: remainder::attach(&hub.metadata, &remainder)?,
            spec: PipelineSpec {
                image: hub.spec.image.clone(),
                tfx_components: framework.components,
                env: hub.spec.env.clone(),
                beam_args: framework.beam_args,
            },
            status,
        })
    }
}

impl Convertible for Experiment {
    type Hub = hub::Experiment;

    fn convert_to(&self, ctx: &ConversionContext) -> Result<hub::Experiment> {
        let (metadata, remainder): (_, ResourceConversionRemainder) = remainder::take(&self.metadata)?;
        let (provider, status) = remainder.unpack(&self.status, ctx);
        Ok(hub::Experiment {
            metadata,
            spec: hub::ExperimentSpec {
                provider,
                description: self.spec.description.clone(),
            },
            status,
        })
    }

    fn convert_from(hub: &hub::Experiment, ctx: &ConversionContext) -> Result<Self> {
        let (remainder, status) = ResourceConversionRemainder::pack(&hub.spec.provider, &hub.status, ctx);
        Ok(Self {
            metadata: remainder::attach(&hub.metadata, &remainder)?,
            spec: ExperimentSpec {
                description: hub.spec.description.clone(),
            },
            status,
        })
    }
}

impl RunSpec {
    fn to_hub(&self, provider: NamespacedName) -> hub::RunSpec {
        hub::RunSpec {
            provider,
            pipeline: self.pipeline.clone(),
            experiment_name: self.experiment_name.clone(),
            runtime_parameters: self.runtime_parameters.clone(),
            artifacts: self.artifacts.clone(),
        }
    }

    fn from_hub(spec: &hub::RunSpec) -> Self {
        Self {
            pipeline: spec.pipeline.clone(),
            experiment_name: spec.experiment_name.clone(),
            runtime_parameters: spec.runtime_parameters.clone(),
            artifacts: spec.artifacts.clone(),
        }
    }
}

impl Convertible for Run {
    type Hub = hub::Run;

    fn convert_to(&self, ctx: &ConversionContext) -> Result<hub::Run> {
        let (metadata, remainder): (_, ResourceConversionRemainder) = remainder::take(&self.metadata)?;
        let (provider, status) = remainder.unpack(&self.status.status, ctx);
        Ok(hub::Run {
            metadata,
            spec: self.spec.to_hub(provider),
            status: hub::RunStatus {
                status,
                observed_pipeline_version: self.status.observed_pipeline_version.clone(),
                completion_state: self.status.completion_state,
                marked_completed_at: self.status.marked_completed_at,
            },
        })
    }

    fn convert_from(hub: &hub::Run, ctx: &ConversionContext) -> Result<Self> {
        let (remainder, status) = ResourceConversionRemainder::pack(&hub.spec.provider, &hub.status.status, ctx);
        Ok(Self {
            metadata: remainder::attach(&hub.metadata, &remainder)?,
            spec: RunSpec::from_hub(&hub.spec),
            status: RunStatus {
                status,
                observed_pipeline_version: hub.status.observed_pipeline_version.clone(),
                completion_state: hub.status.completion_state,
                marked_completed_at: hub.status.marked_completed_at,
            },
        })
    }
}

impl Convertible for RunConfiguration {
    type Hub = hub::RunConfiguration;

    fn convert_to(&self, ctx: &ConversionContext) -> Result<hub::RunConfiguration> {
        let (metadata, remainder): (_, RunConfigurationConversionRemainder) = remainder::take(&self.metadata)?;
        let (provider, status) = remainder.resource.unpack(&self.status.status, ctx);
        Ok(hub::RunConfiguration {
            metadata,
            spec: hub::RunConfigurationSpec {
                run: self.spec.run.to_hub(provider),
                triggers: hub::Triggers {
                    schedules: restore_schedules(&self.spec.triggers.schedules, remainder.schedules),
                    on_change: self.spec.triggers.on_change.clone(),
                    run_configurations: remainder.run_configurations,
                },
            },
            status: hub::RunConfigurationStatus {
                status,
                triggered_pipeline_version: self.status.triggered_pipeline_version.clone(),
                latest_runs: remainder.latest_runs,
            },
        })
    }

    fn convert_from(hub: &hub::RunConfiguration, ctx: &ConversionContext) -> Result<Self> {
        let (resource, status) = ResourceConversionRemainder::pack(&hub.spec.run.provider, &hub.status.status, ctx);
        let (crons, schedules) = reduce_schedules(&hub.spec.triggers.schedules);
        let remainder = RunConfigurationConversionRemainder {
            resource,
            schedules,
            run_configurations: hub.spec.triggers.run_configurations.clone(),
            latest_runs: hub.status.latest_runs.clone(),
        };
        Ok(Self {
            metadata: remainder::attach(&hub.metadata, &remainder)?,
            spec: RunConfigurationSpec {
                run: RunSpec::from_hub(&hub.spec.run),
                triggers: Triggers {
                    schedules: crons,
                    on_change: hub.spec.triggers.on_change.clone(),
                },
            },
            status: RunConfigurationStatus {
                status,
                triggered_pipeline_version: hub.status.triggered_pipeline_version.clone(),
            },
        })
    }
}

impl Convertible for RunSchedule {
    type Hub = hub::RunSchedule;

    fn convert_to(&self, ctx: &ConversionContext) -> Result<hub::RunSchedule> {
        let (metadata, remainder): (_, RunScheduleConversionRemainder) = remainder::take(&self.metadata)?;
        let (provider, status) = remainder.resource.unpack(&self.status, ctx);
        Ok(hub::RunSchedule {
            metadata,
            spec: hub::RunScheduleSpec {
                provider,
                pipeline: self.spec.pipeline.clone(),
                experiment_name: self.spec.experiment_name.clone(),
                runtime_parameters: self.spec.runtime_parameters.clone(),
                artifacts: self.spec.artifacts.clone(),
                schedule: restore_schedule(&self.spec.schedule, remainder.schedule),
            },
            status,
        })
    }

    fn convert_from(hub: &hub::RunSchedule, ctx: &ConversionContext) -> Result<Self> {
        let (resource, status) = ResourceConversionRemainder::pack(&hub.spec.provider, &hub.status, ctx);
        let (cron, schedule) = reduce_schedule(&hub.spec.schedule);
        let remainder = RunScheduleConversionRemainder { resource, schedule };
        Ok(Self {
            metadata: remainder::attach(&hub.metadata, &remainder)?,
            spec: RunScheduleSpec {
                pipeline: hub.spec.pipeline.clone(),
                experiment_name: hub.spec.experiment_name.clone(),
                runtime_parameters: hub.spec.runtime_parameters.clone(),
                artifacts: hub.spec.artifacts.clone(),
                schedule: cron,
            },
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apis::framework::synthesize;
    use crate::apis::{NamedValue, ObjectMeta, OnChangeType, Resource, SynchronizationState};
    use crate::error::ConversionError;
    use crate::remainder::annotation_key;
    use chrono::{TimeZone, Utc};

    fn ctx() -> ConversionContext {
        ConversionContext::new(NamespacedName::new("kfp-operator-system", "default"))
    }

    fn spoke_pipeline() -> Pipeline {
        Pipeline {
            metadata: ObjectMeta::new("ns", "pipeline"),
            spec: PipelineSpec {
                image: "image:1".into(),
                tfx_components: "pipeline.create_components".into(),
                env: vec![NamedValue::new("a", "b")],
                beam_args: vec![NamedValue::new("key", "value")],
            },
            status: Status {
                provider_id: ProviderAndId {
                    provider: "default".into(),
                    id: "12345".into(),
                },
                synchronization_state: SynchronizationState::Succeeded,
                version: "1-abcdef".into(),
                observed_generation: 3,
            },
        }
    }

    #[test]
    fn test_pipeline_up_uses_default_provider() {
        let hub = spoke_pipeline().convert_to(&ctx()).unwrap();
        assert_eq!(hub.spec.provider, ctx().default_provider);
        assert_eq!(hub.status.provider.name, ctx().default_provider);
        assert_eq!(hub.spec.framework.name, "tfx");
        assert_eq!(
            hub.spec.framework.parameters.get("components"),
            Some(&serde_json::json!("pipeline.create_components"))
        );
    }

    #[test]
    fn test_pipeline_round_trip_needs_no_remainder() {
        let spoke = spoke_pipeline();
        let hub = spoke.convert_to(&ctx()).unwrap();
        let back = Pipeline::convert_from(&hub, &ctx()).unwrap();
        assert_eq!(back, spoke);
        assert_eq!(back.metadata.annotations, None);
    }

    #[test]
    fn test_pipeline_foreign_framework_round_trip() {
        let mut hub = spoke_pipeline().convert_to(&ctx()).unwrap();
        hub.spec.provider = NamespacedName::new("team", "vai");
        hub.spec.framework = hub::PipelineFramework {
            name: "kfpsdk".into(),
            parameters: [("pipeline".to_string(), serde_json::json!("train"))].into(),
        };
        let spoke = Pipeline::convert_from(&hub, &ctx()).unwrap();
        assert!(spoke.spec.tfx_components.is_empty());
        assert!(spoke.metadata.annotation(&annotation_key("v1alpha6")).is_some());
        assert_eq!(spoke.convert_to(&ctx()).unwrap(), hub);
    }

    #[test]
    fn test_pipeline_without_components_fails() {
        let mut spoke = spoke_pipeline();
        spoke.spec.tfx_components.clear();
        assert!(matches!(spoke.convert_to(&ctx()), Err(ConversionError::MissingField(_))));
    }

    #[test]
    fn test_pipeline_version_survives_conversion() {
        let spoke = spoke_pipeline();
        let hub = spoke.convert_to(&ctx()).unwrap();
        assert_eq!(spoke.compute_version(), hub.compute_version());
        assert_eq!(hub.spec.framework, synthesize("pipeline.create_components", &spoke.spec.beam_args).unwrap());
    }

    #[test]
    fn test_bounded_schedules_are_kept() {
        let hub = hub::RunConfiguration {
            metadata: ObjectMeta::new("ns", "rc"),
            spec: hub::RunConfigurationSpec {
                run: hub::RunSpec {
                    provider: ctx().default_provider,
                    ..hub::RunSpec::default()
                },
                triggers: hub::Triggers {
                    schedules: vec![Schedule {
                        cron_expression: "0 * * * *".into(),
                        start_time: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
                        end_time: None,
                    }],
                    on_change: vec![OnChangeType::Pipeline],
                    run_configurations: vec!["upstream".into()],
                },
            },
            status: hub::RunConfigurationStatus::default(),
        };
        let spoke = RunConfiguration::convert_from(&hub, &ctx()).unwrap();
        assert_eq!(spoke.spec.triggers.schedules, vec!["0 * * * *".to_string()]);
        assert_eq!(spoke.convert_to(&ctx()).unwrap(), hub);
    }

    #[test]
    fn test_conditions_are_kept() {
        let hub = hub::Experiment {
            metadata: ObjectMeta::new("ns", "experiment"),
            spec: hub::ExperimentSpec {
                provider: ctx().default_provider,
                description: "a description".into(),
            },
            status: hub::Status {
                conditions: vec![Condition {
                    type_: "Synced".into(),
                    status: "True".into(),
                    observed_generation: 1,
                    ..Condition::default()
                }],
                ..hub::Status::default()
            },
        };
        let spoke = Experiment::convert_from(&hub, &ctx()).unwrap();
        assert_eq!(spoke.convert_to(&ctx()).unwrap(), hub);
    }
}
