use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Schedule must contain at least one interval.")]
    ScheduleEmpty,
    #[error("Flow catalog must contain at least one flow.")]
    CatalogEmpty,
    #[error(
        "Schedule interval {index} asks for {value} flows but the catalog only has {catalog_len}."
    )]
    ScheduleExceedsCatalog {
        index: usize,
        value: usize,
        catalog_len: usize,
    },
    #[error("Invalid schedule '{value}'. Expected comma-separated flow counts (e.g. 3,5,2,0).")]
    InvalidSchedule { value: String },
    #[error("Invalid schedule entry '{value}': {source}")]
    InvalidScheduleEntry {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Variation interval must be > 0.")]
    IntervalZero,
    #[error("Schedule end time overflows at interval {index}.")]
    ScheduleOverflow { index: usize },
    #[error("Variations must be started from inside a tokio runtime: {source}")]
    NoRuntime {
        #[source]
        source: tokio::runtime::TryCurrentError,
    },
    #[error("A variation is already running on this session.")]
    AlreadyRunning,
    #[error("Flow {position} does not exist; the catalog has {catalog_len} flows (1-based).")]
    FlowPositionOutOfRange { position: usize, catalog_len: usize },
    #[error("Duration must not be empty.")]
    DurationEmpty,
    #[error("Invalid duration '{value}'.")]
    InvalidDurationFormat { value: String },
    #[error("Invalid duration '{value}': {source}")]
    InvalidDurationNumber {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Duration overflow.")]
    DurationOverflow,
    #[error("Invalid duration unit '{unit}'.")]
    InvalidDurationUnit { unit: String },
    #[error("Duration must be > 0.")]
    DurationZero,
    #[error("Initial delay overflows the run clock.")]
    InitialDelayOverflow,
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
