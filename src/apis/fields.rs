//! Canonical hash write sequences
//!
//! Every schema version funnels its representation of a kind through the
//! same writer so that equivalent resources hash identically whatever version
//! they were authored in. Versions lacking a field pass the hub's default.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use std::collections::BTreeMap;

use super::framework::{TfxParameters, DEFAULT_FRAMEWORK};
use super::{NamedValue, OnChangeType, OutputArtifact, PipelineIdentifier, RuntimeParameter, Schedule};
use crate::hash::ObjectHasher;

/// A pipeline framework as it contributes to the hash
#[derive(Debug, Clone, PartialEq)]
pub enum FrameworkFields {
    /// `tfx` with well-formed legacy parameters
    Tfx(TfxParameters),
    Generic {
        name: String,
        parameters: BTreeMap<String, Value>,
    },
}

impl FrameworkFields {
    /// Classify a named framework; malformed `tfx` parameters hash generically
    pub fn from_framework(name: &str, parameters: &BTreeMap<String, Value>) -> Self {
        if name == DEFAULT_FRAMEWORK {
            if let Ok(tfx) = TfxParameters::extract(parameters) {
                return FrameworkFields::Tfx(tfx);
            }
        }
        FrameworkFields::Generic {
            name: name.to_string(),
            parameters: parameters.clone(),
        }
    }

    /// The legacy field pair of versions without a framework field
    pub fn legacy(components: &str, beam_args: &[NamedValue]) -> Self {
        FrameworkFields::Tfx(TfxParameters {
            components: components.to_string(),
            beam_args: beam_args.to_vec(),
            others: BTreeMap::new(),
        })
    }
}

pub fn write_pipeline_fields(oh: &mut ObjectHasher, image: &str, env: &[NamedValue], framework: &FrameworkFields) {
    oh.write_string_field(image);
    oh.write_named_values(env);
    match framework {
        FrameworkFields::Tfx(tfx) => {
            oh.write_string_field(DEFAULT_FRAMEWORK);
            oh.write_string_field(&tfx.components);
            oh.write_named_values(&tfx.beam_args);
            oh.write_json_map_field(&tfx.others);
        }
        FrameworkFields::Generic { name, parameters } => {
            oh.write_string_field(name);
            oh.write_json_map_field(parameters);
        }
    }
}

pub fn write_experiment_fields(oh: &mut ObjectHasher, description: &str) {
    oh.write_string_field(description);
}

/// Runtime parameters split into literal values and references
fn write_runtime_parameters(oh: &mut ObjectHasher, parameters: &[RuntimeParameter]) {
    let (referenced, literal): (Vec<&RuntimeParameter>, Vec<&RuntimeParameter>) =
        parameters.iter().partition(|p| p.value_from.is_some());

    let literal: Vec<NamedValue> = literal
        .into_iter()
        .map(|p| NamedValue::new(p.name.clone(), p.value.clone()))
        .collect();
    oh.write_named_values(&literal);

    let referenced: Vec<RuntimeParameter> = referenced.into_iter().cloned().collect();
    oh.write_list_field(&referenced, RuntimeParameter::cmp, |oh, p| {
        oh.write_string_field(&p.name);
        oh.write_string_field(&p.value);
        let reference = p
            .value_from
            .as_ref()
            .map(|from| &from.run_configuration_ref);
        oh.write_string_field(reference.map(|r| r.name.as_str()).unwrap_or_default());
        oh.write_string_field(reference.map(|r| r.output_artifact.as_str()).unwrap_or_default());
    });
}

fn write_artifacts(oh: &mut ObjectHasher, artifacts: &[OutputArtifact]) {
    oh.write_list_field(artifacts, OutputArtifact::cmp, |oh, a| {
        oh.write_string_field(&a.name);
        oh.write_string_field(&a.path);
    });
}

pub fn write_run_fields(
    oh: &mut ObjectHasher,
    pipeline: &PipelineIdentifier,
    experiment_name: &str,
    runtime_parameters: &[RuntimeParameter],
    artifacts: &[OutputArtifact],
) {
    oh.write_string_field(&pipeline.to_string());
    oh.write_string_field(experiment_name);
    write_runtime_parameters(oh, runtime_parameters);
    write_artifacts(oh, artifacts);
}

fn timestamp(time: &Option<DateTime<Utc>>) -> String {
    time.map(|t| t.to_rfc3339_opts(SecondsFormat::AutoSi, true))
        .unwrap_or_default()
}

fn write_schedule(oh: &mut ObjectHasher, schedule: &Schedule) {
    oh.write_string_field(&schedule.cron_expression);
    oh.write_string_field(&timestamp(&schedule.start_time));
    oh.write_string_field(&timestamp(&schedule.end_time));
}

pub fn write_trigger_fields(
    oh: &mut ObjectHasher,
    schedules: &[Schedule],
    on_change: &[OnChangeType],
    run_configurations: &[String],
) {
    oh.write_list_field(schedules, Schedule::cmp, write_schedule);
    oh.write_list_field(on_change, OnChangeType::cmp, |oh, t| oh.write_string_field(t.as_str()));
    oh.write_string_list(run_configurations);
}

pub fn write_run_schedule_fields(
    oh: &mut ObjectHasher,
    pipeline: &PipelineIdentifier,
    experiment_name: &str,
    runtime_parameters: &[NamedValue],
    artifacts: &[OutputArtifact],
    schedule: &Schedule,
) {
    oh.write_string_field(&pipeline.to_string());
    oh.write_string_field(experiment_name);
    oh.write_named_values(runtime_parameters);
    write_artifacts(oh, artifacts);
    write_schedule(oh, schedule);
}

/// Semantic fields of a provider
pub struct ProviderFields<'a> {
    pub service_image: &'a str,
    pub execution_mode: &'a str,
    pub service_account: &'a str,
    pub pipeline_root_storage: &'a str,
    pub default_beam_args: &'a [NamedValue],
    pub parameters: &'a BTreeMap<String, Value>,
    /// Framework name/image pairs
    pub frameworks: &'a [(String, String)],
    pub allowed_namespaces: &'a [String],
}

pub fn write_provider_fields(oh: &mut ObjectHasher, provider: &ProviderFields<'_>) {
    oh.write_string_field(provider.service_image);
    oh.write_string_field(provider.execution_mode);
    oh.write_string_field(provider.service_account);
    oh.write_string_field(provider.pipeline_root_storage);
    oh.write_named_values(provider.default_beam_args);
    oh.write_json_map_field(provider.parameters);
    oh.write_list_field(provider.frameworks, <(String, String)>::cmp, |oh, (name, image)| {
        oh.write_string_field(name);
        oh.write_string_field(image);
    });
    oh.write_string_list(provider.allowed_namespaces);
}
