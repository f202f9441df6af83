use std::time::Duration;

use reqwest::Url;

use crate::catalog::{DEFAULT_NAME_PREFIX, FlowCatalog};
use crate::error::{AppError, AppResult, ConfigError, ValidationError};
use crate::manifest::{DEFAULT_REGION, StorageTarget};
use crate::schedule::parse_schedule;

use super::parse::{parse_delay_value, parse_duration_value};
use super::types::{
    ConfigFile, DurationValue, FlowsConfig, GeneratorConfig, ProvisioningConfig, ScheduleValue,
    StorageConfig, VariationConfig, VariationOverrides,
};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct GeneratorSettings {
    pub location: String,
    pub insecure: bool,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct ProvisioningSettings {
    pub base_url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct VariationSettings {
    /// Absent until a run needs it; single-flow commands work without one.
    pub schedule: Option<Vec<usize>>,
    pub interval: Duration,
    pub initial_delay: Duration,
    pub metrics_interval: Option<Duration>,
}

/// Fully resolved configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    pub generator: GeneratorSettings,
    pub provisioning: ProvisioningSettings,
    pub catalog: FlowCatalog,
    pub variation: VariationSettings,
    pub storage: Option<StorageTarget>,
}

impl Settings {
    /// # Errors
    ///
    /// Returns `MissingField` when neither the file nor the CLI gave a
    /// schedule.
    pub fn require_schedule(&self) -> AppResult<Vec<usize>> {
        self.variation
            .schedule
            .clone()
            .ok_or_else(|| {
                AppError::config(ConfigError::MissingField {
                    field: "variation.schedule",
                })
            })
    }
}

/// Resolves a loaded file plus CLI overrides into [`Settings`].
///
/// # Errors
///
/// Returns a configuration error for missing required sections, invalid URLs
/// or durations, and conflicting flow definitions; a validation error for an
/// empty catalog or malformed schedule.
pub fn apply_config(config: ConfigFile, overrides: &VariationOverrides) -> AppResult<Settings> {
    let generator = resolve_generator(config.generator.unwrap_or_default())?;
    let provisioning = resolve_provisioning(config.provisioning.unwrap_or_default())?;
    let catalog = resolve_catalog(config.flows.unwrap_or_default())?;
    let variation = resolve_variation(config.variation.unwrap_or_default(), overrides)?;
    let storage = config.storage.map(resolve_storage).transpose()?;
    Ok(Settings {
        generator,
        provisioning,
        catalog,
        variation,
        storage,
    })
}

fn resolve_generator(section: GeneratorConfig) -> AppResult<GeneratorSettings> {
    let location = required_url(section.location, "generator.location")?;
    Ok(GeneratorSettings {
        location,
        insecure: section.insecure.unwrap_or(false),
        timeout: optional_duration(section.timeout.as_ref(), "generator.timeout")?
            .unwrap_or(DEFAULT_TIMEOUT),
    })
}

fn resolve_provisioning(section: ProvisioningConfig) -> AppResult<ProvisioningSettings> {
    let base_url = required_url(section.base_url, "provisioning.base_url")?;
    Ok(ProvisioningSettings {
        base_url,
        timeout: optional_duration(section.timeout.as_ref(), "provisioning.timeout")?
            .unwrap_or(DEFAULT_TIMEOUT),
    })
}

fn resolve_catalog(section: FlowsConfig) -> AppResult<FlowCatalog> {
    match (section.destinations, section.definitions) {
        (Some(_), Some(_)) => Err(AppError::config(ConfigError::Conflict {
            left: "flows.destinations",
            right: "flows.definitions",
        })),
        (Some(destinations), None) => {
            let prefix = section
                .name_prefix
                .unwrap_or_else(|| DEFAULT_NAME_PREFIX.to_owned());
            FlowCatalog::from_destinations(&prefix, &destinations)
        }
        (None, Some(definitions)) => FlowCatalog::new(definitions),
        (None, None) => Err(AppError::config(ConfigError::MissingField {
            field: "flows.destinations",
        })),
    }
}

fn resolve_variation(
    section: VariationConfig,
    overrides: &VariationOverrides,
) -> AppResult<VariationSettings> {
    let schedule = match (&overrides.schedule, section.schedule) {
        (Some(counts), _) => Some(counts.clone()),
        (None, Some(ScheduleValue::Counts(counts))) => Some(counts),
        (None, Some(ScheduleValue::Text(text))) => {
            Some(parse_schedule(&text).map_err(AppError::validation)?)
        }
        (None, None) => None,
    };
    let interval = match overrides.interval {
        Some(interval) => interval,
        None => optional_duration(section.interval.as_ref(), "variation.interval")?
            .unwrap_or(DEFAULT_INTERVAL),
    };
    let initial_delay = match overrides.initial_delay {
        Some(delay) => delay,
        None => section
            .initial_delay
            .as_ref()
            .map(|raw| delay_value(raw, "variation.initial_delay"))
            .transpose()?
            .unwrap_or(Duration::ZERO),
    };
    let metrics_interval = match overrides.metrics_interval {
        Some(every) => Some(every),
        None => optional_duration(
            section.metrics_interval.as_ref(),
            "variation.metrics_interval",
        )?,
    };
    Ok(VariationSettings {
        schedule,
        interval,
        initial_delay,
        metrics_interval,
    })
}

fn resolve_storage(section: StorageConfig) -> AppResult<StorageTarget> {
    Ok(StorageTarget {
        endpoint: required_url(section.endpoint, "storage.endpoint")?,
        bucket: required(section.bucket, "storage.bucket")?,
        access_key: required(section.access_key, "storage.access_key")?,
        secret_key: required(section.secret_key, "storage.secret_key")?,
        region: section
            .region
            .unwrap_or_else(|| DEFAULT_REGION.to_owned()),
        prefix: section.prefix.unwrap_or_default(),
    })
}

fn required(value: Option<String>, field: &'static str) -> AppResult<String> {
    value
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| AppError::config(ConfigError::MissingField { field }))
}

fn required_url(value: Option<String>, field: &'static str) -> AppResult<String> {
    let value = required(value, field)?;
    Url::parse(&value).map_err(|err| {
        AppError::config(ConfigError::InvalidUrl {
            field,
            url: value.clone(),
            source: err,
        })
    })?;
    Ok(value)
}

fn optional_duration(
    value: Option<&DurationValue>,
    field: &'static str,
) -> AppResult<Option<Duration>> {
    value
        .map(|raw| match raw {
            DurationValue::Seconds(0) => Err(invalid_duration(
                field,
                ValidationError::DurationZero,
            )),
            DurationValue::Seconds(secs) => Ok(Duration::from_secs(*secs)),
            DurationValue::Text(text) => {
                parse_duration_value(text).map_err(|err| invalid_duration(field, err))
            }
        })
        .transpose()
}

fn delay_value(value: &DurationValue, field: &'static str) -> AppResult<Duration> {
    match value {
        DurationValue::Seconds(secs) => Ok(Duration::from_secs(*secs)),
        DurationValue::Text(text) => {
            parse_delay_value(text).map_err(|err| invalid_duration(field, err))
        }
    }
}

fn invalid_duration(field: &'static str, source: ValidationError) -> AppError {
    AppError::config(ConfigError::InvalidDuration { field, source })
}
