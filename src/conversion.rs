//! Hub-and-spoke conversion
//!
//! Each spoke version converts to and from the hub only. Converting between
//! two spokes goes through the hub, so adding a version never touches the
//! converters of the others.

use crate::apis::{NamespacedName, Schedule};
use crate::config::ConversionConfig;
use crate::error::Result;

/// Settings conversions depend on, passed explicitly into every call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionContext {
    /// Provider assumed for versions that do not record one
    pub default_provider: NamespacedName,
}

impl Default for ConversionContext {
    fn default() -> Self {
        ConversionConfig::default().context()
    }
}

impl ConversionContext {
    pub fn new(default_provider: NamespacedName) -> Self {
        Self { default_provider }
    }

    /// Namespace assumed for a bare provider name
    pub fn inferred_namespace(&self, name: &str) -> String {
        if name.is_empty() {
            String::new()
        } else {
            self.default_provider.namespace.clone()
        }
    }

    /// Qualify a bare provider name, preferring a stored namespace
    pub fn qualify(&self, name: &str, stored_namespace: Option<String>) -> NamespacedName {
        NamespacedName {
            name: name.to_string(),
            namespace: stored_namespace.unwrap_or_else(|| self.inferred_namespace(name)),
        }
    }

    /// The namespace to store when reducing `provider` to its bare name
    pub fn namespace_to_store(&self, provider: &NamespacedName) -> Option<String> {
        (provider.namespace != self.inferred_namespace(&provider.name)).then(|| provider.namespace.clone())
    }

    /// The spec provider of a version without one
    pub fn spec_provider(&self, stored: Option<NamespacedName>) -> NamespacedName {
        stored.unwrap_or_else(|| self.default_provider.clone())
    }

    /// The spec provider to store when the spoke cannot hold it
    pub fn provider_to_store(&self, provider: &NamespacedName) -> Option<NamespacedName> {
        (*provider != self.default_provider).then(|| provider.clone())
    }

    /// The status provider of a version that only records the provider's id
    pub fn status_provider(&self, id: &str, stored: Option<NamespacedName>) -> NamespacedName {
        stored.unwrap_or_else(|| {
            if id.is_empty() {
                NamespacedName::default()
            } else {
                self.default_provider.clone()
            }
        })
    }

    /// The status provider to store for a version that only records the id
    pub fn status_provider_to_store(&self, id: &str, provider: &NamespacedName) -> Option<NamespacedName> {
        (self.status_provider(id, None) != *provider).then(|| provider.clone())
    }
}

/// A spoke resource convertible to and from its hub representation
pub trait Convertible: Sized {
    type Hub;

    /// Convert to the hub, recovering fields stored in this version's remainder
    fn convert_to(&self, ctx: &ConversionContext) -> Result<Self::Hub>;

    /// Convert from the hub, storing what this version cannot express
    fn convert_from(hub: &Self::Hub, ctx: &ConversionContext) -> Result<Self>;
}

/// Convert between two spokes of the same kind through their hub
pub fn convert<S, D>(source: &S, ctx: &ConversionContext) -> Result<D>
where
    S: Convertible,
    D: Convertible<Hub = S::Hub>,
{
    let hub = source.convert_to(ctx)?;
    D::convert_from(&hub, ctx)
}

/// Prefer a stored value while it still agrees with what the spoke holds
pub(crate) fn restore<T>(stored: Option<T>, derived: T, agrees: impl FnOnce(&T) -> bool) -> T {
    match stored {
        Some(value) if agrees(&value) => value,
        _ => derived,
    }
}

/// Cron expressions of `schedules`, plus the schedules when bounds would be lost
pub fn reduce_schedules(schedules: &[Schedule]) -> (Vec<String>, Option<Vec<Schedule>>) {
    let crons: Vec<String> = schedules.iter().map(|s| s.cron_expression.clone()).collect();
    let lossless = schedules.iter().all(Schedule::is_unbounded);
    (crons, (!lossless).then(|| schedules.to_vec()))
}

/// Inverse of [`reduce_schedules`], ignoring stored schedules whose crons were edited
pub fn restore_schedules(crons: &[String], stored: Option<Vec<Schedule>>) -> Vec<Schedule> {
    restore(stored, crons.iter().map(Schedule::cron).collect(), |schedules| {
        schedules.iter().map(|s| &s.cron_expression).eq(crons.iter())
    })
}

/// Reduce a schedule to its cron, plus the schedule when bounds would be lost
pub fn reduce_schedule(schedule: &Schedule) -> (String, Option<Schedule>) {
    (
        schedule.cron_expression.clone(),
        (!schedule.is_unbounded()).then(|| schedule.clone()),
    )
}

pub fn restore_schedule(cron: &str, stored: Option<Schedule>) -> Schedule {
    restore(stored, Schedule::cron(cron), |s| s.cron_expression == cron)
}
