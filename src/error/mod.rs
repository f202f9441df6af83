mod app;
mod config;
mod remote;
mod storage;
mod validation;

#[cfg(test)]
mod test_support;

pub use app::{AppError, AppResult};
pub use config::ConfigError;
pub use remote::{Endpoint, RemoteError};
pub use storage::StorageError;
pub use validation::ValidationError;
