use serde::Deserialize;

use crate::catalog::FlowDefinition;

/// Raw config file contents; every field optional until resolved.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub generator: Option<GeneratorConfig>,
    pub provisioning: Option<ProvisioningConfig>,
    pub flows: Option<FlowsConfig>,
    pub variation: Option<VariationConfig>,
    pub storage: Option<StorageConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GeneratorConfig {
    pub location: Option<String>,
    pub insecure: Option<bool>,
    pub timeout: Option<DurationValue>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProvisioningConfig {
    pub base_url: Option<String>,
    pub timeout: Option<DurationValue>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FlowsConfig {
    pub name_prefix: Option<String>,
    pub destinations: Option<Vec<String>>,
    pub definitions: Option<Vec<FlowDefinition>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct VariationConfig {
    pub schedule: Option<ScheduleValue>,
    pub interval: Option<DurationValue>,
    pub initial_delay: Option<DurationValue>,
    pub metrics_interval: Option<DurationValue>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StorageConfig {
    pub endpoint: Option<String>,
    pub bucket: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub region: Option<String>,
    pub prefix: Option<String>,
}

/// `schedule = [3, 5, 2, 0]` or `schedule = "3,5,2,0"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ScheduleValue {
    Counts(Vec<usize>),
    Text(String),
}

/// Whole seconds or a string with a unit (`ms`, `s`, `m`, `h`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

/// Values given on the command line; they win over the file.
#[derive(Debug, Clone, Default)]
pub struct VariationOverrides {
    pub schedule: Option<Vec<usize>>,
    pub interval: Option<std::time::Duration>,
    pub initial_delay: Option<std::time::Duration>,
    pub metrics_interval: Option<std::time::Duration>,
}
