use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{
    literal_parameters, Experiment, ExperimentSpec, Pipeline, PipelineSpec, Run, RunConfiguration,
    RunConfigurationSpec, RunConfigurationStatus, RunSchedule, RunScheduleSpec, RunSpec, RunStatus, Status,
};
use crate::apis::framework::LegacyFramework;
use crate::apis::named_value::{self, collapse, expand};
use crate::apis::{
    v1 as hub, Condition, LatestRuns, NamedValue, NamespacedName, OnChangeType, OutputArtifact, RuntimeParameter,
    Schedule,
};
use crate::conversion::{reduce_schedule, restore, restore_schedule, ConversionContext, Convertible};
use crate::error::{ConversionError, Result};
use crate::remainder::{self, Remainder};

/// Provider and status details every kind loses at `v1alpha5`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceConversionRemainder {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<NamespacedName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_provider: Option<NamespacedName>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
}

impl Remainder for ResourceConversionRemainder {
    const VERSION: &'static str = super::VERSION;

    fn is_empty(&self) -> bool {
        self.provider.is_none() && self.status_provider.is_none() && self.conditions.is_empty()
    }
}

impl ResourceConversionRemainder {
    pub(crate) fn pack(provider: &NamespacedName, status: &hub::Status, ctx: &ConversionContext) -> (Self, Status) {
        let remainder = Self {
            provider: ctx.provider_to_store(provider),
            status_provider: ctx.status_provider_to_store(&status.provider.id, &status.provider.name),
            conditions: status.conditions.clone(),
        };
        let status = Status {
            kfp_id: status.provider.id.clone(),
            synchronization_state: status.synchronization_state,
            version: status.version.clone(),
            observed_generation: status.observed_generation,
        };
        (remainder, status)
    }

    pub(crate) fn unpack(self, status: &Status, ctx: &ConversionContext) -> (NamespacedName, hub::Status) {
        let status = hub::Status {
            provider: hub::ProviderAndId {
                name: ctx.status_provider(&status.kfp_id, self.status_provider),
                id: status.kfp_id.clone(),
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
#[serde(rename_all = "camelCase")]
pub struct PipelineConversionRemainder {
    #[serde(flatten)]
    pub resource: ResourceConversionRemainder,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework: Option<hub::PipelineFramework>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<Vec<NamedValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beam_args: Option<Vec<NamedValue>>,
}

impl Remainder for PipelineConversionRemainder {
    const VERSION: &'static str = super::VERSION;

    fn is_empty(&self) -> bool {
        Remainder::is_empty(&self.resource)
            && self.framework.is_none()
            && self.env.is_none()
            && self.beam_args.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunConversionRemainder {
    #[serde(flatten)]
    pub resource: ResourceConversionRemainder,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_parameters: Option<Vec<RuntimeParameter>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<OutputArtifact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marked_completed_at: Option<DateTime<Utc>>,
}

impl Remainder for RunConversionRemainder {
    const VERSION: &'static str = super::VERSION;

    fn is_empty(&self) -> bool {
        Remainder::is_empty(&self.resource)
            && self.runtime_parameters.is_none()
            && self.artifacts.is_empty()
            && self.marked_completed_at.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunConfigurationConversionRemainder {
    #[serde(flatten)]
    pub resource: ResourceConversionRemainder,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_parameters: Option<Vec<RuntimeParameter>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<OutputArtifact>,
    /// Every schedule, when the single schedule slot cannot hold them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedules: Option<Vec<Schedule>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub on_change: Vec<OnChangeType>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub run_configurations: Vec<String>,
    #[serde(default, skip_serializing_if = "LatestRuns::is_empty")]
    pub latest_runs: LatestRuns,
}

impl Remainder for RunConfigurationConversionRemainder {
    const VERSION: &'static str = super::VERSION;

    fn is_empty(&self) -> bool {
        Remainder::is_empty(&self.resource)
            && self.runtime_parameters.is_none()
            && self.artifacts.is_empty()
            && self.schedules.is_none()
            && self.on_change.is_empty()
            && self.run_configurations.is_empty()
            && self.latest_runs.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunScheduleConversionRemainder {
    #[serde(flatten)]
    pub resource: ResourceConversionRemainder,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_parameters: Option<Vec<NamedValue>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<OutputArtifact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Schedule>,
}

impl Remainder for RunScheduleConversionRemainder {
    const VERSION: &'static str = super::VERSION;

    fn is_empty(&self) -> bool {
        Remainder::is_empty(&self.resource)
            && self.runtime_parameters.is_none()
            && self.artifacts.is_empty()
            && self.schedule.is_none()
    }
}

fn names_and_values(parameters: &[RuntimeParameter]) -> Vec<NamedValue> {
    parameters
        .iter()
        .map(|p| NamedValue::new(p.name.clone(), p.value.clone()))
        .collect()
}

/// Collapse runtime parameters into a map, keeping the list when references,
/// duplicates or ordering would be lost
fn reduce_runtime_parameters(
    parameters: &[RuntimeParameter],
) -> Result<(BTreeMap<String, String>, Option<Vec<RuntimeParameter>>)> {
    let (map, reordered) = collapse(&names_and_values(parameters), "spec.runtimeParameters")?;
    let lossless = reordered.is_none() && parameters.iter().all(|p| p.value_from.is_none());
    Ok((map, (!lossless).then(|| parameters.to_vec())))
}

fn restore_runtime_parameters(
    map: &BTreeMap<String, String>,
    stored: Option<Vec<RuntimeParameter>>,
) -> Vec<RuntimeParameter> {
    restore(stored, literal_parameters(map), |parameters| {
        named_value::to_map_lossy(&names_and_values(parameters)) == *map
    })
}

/// Reduce schedules to the single schedule slot
///
/// The slot holds the first cron expression; the full list is stored unless
/// it is exactly one unbounded schedule.
fn reduce_schedule_slot(schedules: &[Schedule]) -> Result<(String, Option<Vec<Schedule>>)> {
    let first = match schedules.first() {
        Some(first) => first,
        None => return Ok((String::new(), None)),
    };
    if first.cron_expression.is_empty() {
        return Err(ConversionError::UnrepresentableTrigger {
            field: "spec.triggers.schedules[0]".to_string(),
            reason: "an empty cron expression reads as no schedule".to_string(),
        });
    }
    let lossless = schedules.len() == 1 && first.is_unbounded();
    Ok((first.cron_expression.clone(), (!lossless).then(|| schedules.to_vec())))
}

fn restore_schedule_slot(spec: &RunConfigurationSpec, stored: Option<Vec<Schedule>>) -> Vec<Schedule> {
    restore(stored, spec.schedules(), |schedules| {
        schedules.first().map(|s| s.cron_expression.as_str()) == Some(spec.schedule.as_str())
    })
}

impl Convertible for Pipeline {
    type Hub = hub::Pipeline;

    fn convert_to(&self, ctx: &ConversionContext) -> Result<hub::Pipeline> {
        let (metadata, remainder): (_, PipelineConversionRemainder) = remainder::take(&self.metadata)?;
        let framework = LegacyFramework {
            components: self.spec.tfx_components.clone(),
            beam_args: expand(&self.spec.beam_args, remainder.beam_args),
            stored: remainder.framework,
        }
        .restore()?;
        let (provider, status) = remainder.resource.unpack(&self.status, ctx);
        Ok(hub::Pipeline {
            metadata,
            spec: hub::PipelineSpec {
                provider,
                image: self.spec.image.clone(),
                env: expand(&self.spec.env, remainder.env),
                framework,
            },
            status,
        })
    }

    fn convert_from(hub: &hub::Pipeline, ctx: &ConversionContext) -> Result<Self> {
        let framework = LegacyFramework::reduce(&hub.spec.framework)?;
        let (env, stored_env) = collapse(&hub.spec.env, "spec.env")?;
        let (beam_args, stored_beam_args) = collapse(&framework.beam_args, "spec.beamArgs")?;
        let (resource, status) = ResourceConversionRemainder::pack(&hub.spec.provider, &hub.status, ctx);
        let remainder = PipelineConversionRemainder {
            resource,
            framework: framework.stored,
            env: stored_env,
            beam_args: stored_beam_args,
        };
        Ok(Self {
            metadata: remainder::attach(&hub.metadata, &remainder)?,
            spec: PipelineSpec {
                image: hub.spec.image.clone(),
                tfx_components: framework.components,
                env,
                beam_args,
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

impl Convertible for Run {
    type Hub = hub::Run;

    fn convert_to(&self, ctx: &ConversionContext) -> Result<hub::Run> {
        let (metadata, remainder): (_, RunConversionRemainder) = remainder::take(&self.metadata)?;
        let (provider, status) = remainder.resource.unpack(&self.status.status, ctx);
        Ok(hub::Run {
            metadata,
            spec: hub::RunSpec {
                provider,
                pipeline: self.spec.pipeline.clone(),
                experiment_name: self.spec.experiment_name.clone(),
                runtime_parameters: restore_runtime_parameters(
                    &self.spec.runtime_parameters,
                    remainder.runtime_parameters,
                ),
                artifacts: remainder.artifacts,
            },
            status: hub::RunStatus {
                status,
                observed_pipeline_version: self.status.observed_pipeline_version.clone(),
                completion_state: self.status.completion_state,
                marked_completed_at: remainder.marked_completed_at,
            },
        })
    }

    fn convert_from(hub: &hub::Run, ctx: &ConversionContext) -> Result<Self> {
        let (runtime_parameters, stored_parameters) = reduce_runtime_parameters(&hub.spec.runtime_parameters)?;
        let (resource, status) = ResourceConversionRemainder::pack(&hub.spec.provider, &hub.status.status, ctx);
        let remainder = RunConversionRemainder {
            resource,
            runtime_parameters: stored_parameters,
            artifacts: hub.spec.artifacts.clone(),
            marked_completed_at: hub.status.marked_completed_at,
        };
        Ok(Self {
            metadata: remainder::attach(&hub.metadata, &remainder)?,
            spec: RunSpec {
                pipeline: hub.spec.pipeline.clone(),
                experiment_name: hub.spec.experiment_name.clone(),
                runtime_parameters,
            },
            status: RunStatus {
                status,
                observed_pipeline_version: hub.status.observed_pipeline_version.clone(),
                completion_state: hub.status.completion_state,
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
                run: hub::RunSpec {
                    provider,
                    pipeline: self.spec.pipeline.clone(),
                    experiment_name: self.spec.experiment_name.clone(),
                    runtime_parameters: restore_runtime_parameters(
                        &self.spec.runtime_parameters,
                        remainder.runtime_parameters,
                    ),
                    artifacts: remainder.artifacts,
                },
                triggers: hub::Triggers {
                    schedules: restore_schedule_slot(&self.spec, remainder.schedules),
                    on_change: remainder.on_change,
                    run_configurations: remainder.run_configurations,
                },
            },
            status: hub::RunConfigurationStatus {
                status,
                triggered_pipeline_version: self.status.observed_pipeline_version.clone(),
                latest_runs: remainder.latest_runs,
            },
        })
    }

    fn convert_from(hub: &hub::RunConfiguration, ctx: &ConversionContext) -> Result<Self> {
        let run = &hub.spec.run;
        let (runtime_parameters, stored_parameters) = reduce_runtime_parameters(&run.runtime_parameters)?;
        let (schedule, stored_schedules) = reduce_schedule_slot(&hub.spec.triggers.schedules)?;
        let (resource, status) = ResourceConversionRemainder::pack(&run.provider, &hub.status.status, ctx);
        let remainder = RunConfigurationConversionRemainder {
            resource,
            runtime_parameters: stored_parameters,
            artifacts: run.artifacts.clone(),
            schedules: stored_schedules,
            on_change: hub.spec.triggers.on_change.clone(),
            run_configurations: hub.spec.triggers.run_configurations.clone(),
            latest_runs: hub.status.latest_runs.clone(),
        };
        Ok(Self {
            metadata: remainder::attach(&hub.metadata, &remainder)?,
            spec: RunConfigurationSpec {
                pipeline: run.pipeline.clone(),
                experiment_name: run.experiment_name.clone(),
                runtime_parameters,
                schedule,
            },
            status: RunConfigurationStatus {
                status,
                observed_pipeline_version: hub.status.triggered_pipeline_version.clone(),
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
                runtime_parameters: expand(&self.spec.runtime_parameters, remainder.runtime_parameters),
                artifacts: remainder.artifacts,
                schedule: restore_schedule(&self.spec.schedule, remainder.schedule),
            },
            status,
        })
    }

    fn convert_from(hub: &hub::RunSchedule, ctx: &ConversionContext) -> Result<Self> {
        let (runtime_parameters, stored_parameters) =
            collapse(&hub.spec.runtime_parameters, "spec.runtimeParameters")?;
        let (schedule, stored_schedule) = reduce_schedule(&hub.spec.schedule);
        let (resource, status) = ResourceConversionRemainder::pack(&hub.spec.provider, &hub.status, ctx);
        let remainder = RunScheduleConversionRemainder {
            resource,
            runtime_parameters: stored_parameters,
            artifacts: hub.spec.artifacts.clone(),
            schedule: stored_schedule,
        };
        Ok(Self {
            metadata: remainder::attach(&hub.metadata, &remainder)?,
            spec: RunScheduleSpec {
                pipeline: hub.spec.pipeline.clone(),
                experiment_name: hub.spec.experiment_name.clone(),
                runtime_parameters,
                schedule,
            },
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apis::{ObjectMeta, PipelineIdentifier, Resource, RunConfigurationRef, ValueFrom};
    use crate::remainder::annotation_key;
    use chrono::TimeZone;

    fn ctx() -> ConversionContext {
        ConversionContext::new(NamespacedName::new("kfp-operator-system", "default"))
    }

    fn map(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn spoke_pipeline() -> Pipeline {
        Pipeline {
            metadata: ObjectMeta::new("ns", "pipeline"),
            spec: PipelineSpec {
                image: "image:1".into(),
                tfx_components: "pipeline.create_components".into(),
                env: map(&[("a", "b")]),
                beam_args: map(&[("key", "value")]),
            },
            status: Status {
                kfp_id: "12345".into(),
                synchronization_state: crate::apis::SynchronizationState::Succeeded,
                version: "1-abcdef".into(),
                observed_generation: 2,
            },
        }
    }

    fn hub_run_configuration(schedules: Vec<Schedule>) -> hub::RunConfiguration {
        hub::RunConfiguration {
            metadata: ObjectMeta::new("ns", "rc"),
            spec: hub::RunConfigurationSpec {
                run: hub::RunSpec {
                    provider: ctx().default_provider,
                    pipeline: PipelineIdentifier::new("pipeline", "1"),
                    ..hub::RunSpec::default()
                },
                triggers: hub::Triggers {
                    schedules,
                    ..hub::Triggers::default()
                },
            },
            status: hub::RunConfigurationStatus::default(),
        }
    }

    #[test]
    fn test_pipeline_round_trip_needs_no_remainder() {
        let spoke = spoke_pipeline();
        let hub = spoke.convert_to(&ctx()).unwrap();
        assert_eq!(hub.status.provider.name, ctx().default_provider);
        assert_eq!(hub.spec.env, vec![NamedValue::new("a", "b")]);

        let back = Pipeline::convert_from(&hub, &ctx()).unwrap();
        assert_eq!(back, spoke);
        assert_eq!(back.metadata.annotations, None);
    }

    #[test]
    fn test_duplicate_env_is_kept_in_remainder() {
        let mut hub = spoke_pipeline().convert_to(&ctx()).unwrap();
        hub.spec.env = vec![NamedValue::new("a", "1"), NamedValue::new("a", "2")];

        let spoke = Pipeline::convert_from(&hub, &ctx()).unwrap();
        assert_eq!(spoke.spec.env, map(&[("a", "1")]));
        assert!(spoke.metadata.annotation(&annotation_key("v1alpha5")).is_some());
        assert_eq!(spoke.convert_to(&ctx()).unwrap(), hub);
    }

    #[test]
    fn test_edited_env_wins_over_remainder() {
        let mut hub = spoke_pipeline().convert_to(&ctx()).unwrap();
        hub.spec.env = vec![NamedValue::new("a", "1"), NamedValue::new("a", "2")];

        let mut spoke = Pipeline::convert_from(&hub, &ctx()).unwrap();
        spoke.spec.env = map(&[("a", "3")]);
        let edited = spoke.convert_to(&ctx()).unwrap();
        assert_eq!(edited.spec.env, vec![NamedValue::new("a", "3")]);
    }

    #[test]
    fn test_status_provider_without_id_is_stored() {
        let mut hub = spoke_pipeline().convert_to(&ctx()).unwrap();
        hub.status.provider = hub::ProviderAndId {
            name: NamespacedName::new("team", "vai"),
            id: String::new(),
        };
        let spoke = Pipeline::convert_from(&hub, &ctx()).unwrap();
        assert_eq!(spoke.convert_to(&ctx()).unwrap(), hub);
    }

    #[test]
    fn test_pipeline_version_matches_hub() {
        let spoke = spoke_pipeline();
        let hub = spoke.convert_to(&ctx()).unwrap();
        assert_eq!(spoke.compute_version(), hub.compute_version());
    }

    #[test]
    fn test_referenced_parameters_are_kept() {
        let hub = hub::Run {
            metadata: ObjectMeta::new("ns", "run"),
            spec: hub::RunSpec {
                provider: ctx().default_provider,
                pipeline: PipelineIdentifier::new("pipeline", "1"),
                experiment_name: "exp".into(),
                runtime_parameters: vec![
                    RuntimeParameter::literal("a", "1"),
                    RuntimeParameter {
                        name: "b".into(),
                        value: String::new(),
                        value_from: Some(ValueFrom {
                            run_configuration_ref: RunConfigurationRef {
                                name: "upstream".into(),
                                output_artifact: "model".into(),
                            },
                        }),
                    },
                ],
                artifacts: vec![OutputArtifact {
                    name: "model".into(),
                    path: "Trainer:model".into(),
                }],
            },
            status: hub::RunStatus {
                marked_completed_at: Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()),
                ..hub::RunStatus::default()
            },
        };
        let spoke = Run::convert_from(&hub, &ctx()).unwrap();
        assert_eq!(spoke.spec.runtime_parameters, map(&[("a", "1"), ("b", "")]));
        assert_eq!(spoke.convert_to(&ctx()).unwrap(), hub);
    }

    #[test]
    fn test_single_unbounded_schedule_fits_the_slot() {
        let hub = hub_run_configuration(vec![Schedule::cron("0 * * * *")]);
        let spoke = RunConfiguration::convert_from(&hub, &ctx()).unwrap();
        assert_eq!(spoke.spec.schedule, "0 * * * *");
        assert_eq!(spoke.metadata.annotations, None);
        assert_eq!(spoke.convert_to(&ctx()).unwrap(), hub);
    }

    #[test]
    fn test_multiple_schedules_are_kept() {
        let hub = hub_run_configuration(vec![Schedule::cron("0 * * * *"), Schedule::cron("30 * * * *")]);
        let spoke = RunConfiguration::convert_from(&hub, &ctx()).unwrap();
        assert_eq!(spoke.spec.schedule, "0 * * * *");
        assert_eq!(spoke.convert_to(&ctx()).unwrap(), hub);
    }

    #[test]
    fn test_no_schedule_is_empty_slot() {
        let hub = hub_run_configuration(vec![]);
        let spoke = RunConfiguration::convert_from(&hub, &ctx()).unwrap();
        assert_eq!(spoke.spec.schedule, "");
        assert!(spoke.convert_to(&ctx()).unwrap().spec.triggers.schedules.is_empty());
    }

    #[test]
    fn test_empty_first_cron_is_unrepresentable() {
        let hub = hub_run_configuration(vec![Schedule::cron(""), Schedule::cron("0 * * * *")]);
        assert!(matches!(
            RunConfiguration::convert_from(&hub, &ctx()),
            Err(ConversionError::UnrepresentableTrigger { .. })
        ));
    }

    #[test]
    fn test_edited_schedule_drops_stored_list() {
        let hub = hub_run_configuration(vec![Schedule::cron("0 * * * *"), Schedule::cron("30 * * * *")]);
        let mut spoke = RunConfiguration::convert_from(&hub, &ctx()).unwrap();
        spoke.spec.schedule = "15 * * * *".into();
        let edited = spoke.convert_to(&ctx()).unwrap();
        assert_eq!(edited.spec.triggers.schedules, vec![Schedule::cron("15 * * * *")]);
    }

    #[test]
    fn test_run_schedule_bounds_are_kept() {
        let hub = hub::RunSchedule {
            metadata: ObjectMeta::new("ns", "rs"),
            spec: hub::RunScheduleSpec {
                provider: NamespacedName::new("team", "vai"),
                pipeline: PipelineIdentifier::new("pipeline", "1"),
                experiment_name: "exp".into(),
                runtime_parameters: vec![NamedValue::new("b", "2"), NamedValue::new("a", "1")],
                artifacts: vec![],
                schedule: Schedule {
                    cron_expression: "0 * * * *".into(),
                    start_time: None,
                    end_time: Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()),
                },
            },
            status: hub::Status::default(),
        };
        let spoke = RunSchedule::convert_from(&hub, &ctx()).unwrap();
        assert_eq!(spoke.spec.schedule, "0 * * * *");
        assert_eq!(spoke.convert_to(&ctx()).unwrap(), hub);
    }
}
