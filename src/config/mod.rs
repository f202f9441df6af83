//! Configuration loading and resolution.
mod apply;
mod loader;
mod parse;
pub mod types;


pub use apply::{
    DEFAULT_INTERVAL, DEFAULT_TIMEOUT, GeneratorSettings, ProvisioningSettings, Settings,
    VariationSettings, apply_config,
};
pub use loader::{load_config, load_config_file};
pub use parse::{parse_delay_value, parse_duration_value};
