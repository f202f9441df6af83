use std::time::Duration;

use crate::config::{parse_delay_value, parse_duration_value};
use crate::error::ValidationError;
use crate::schedule::parse_schedule;

pub(crate) fn parse_schedule_arg(s: &str) -> Result<Vec<usize>, ValidationError> {
    parse_schedule(s)
}

pub(crate) fn parse_duration_arg(s: &str) -> Result<Duration, ValidationError> {
    parse_duration_value(s)
}

pub(crate) fn parse_delay_arg(s: &str) -> Result<Duration, ValidationError> {
    parse_delay_value(s)
}
