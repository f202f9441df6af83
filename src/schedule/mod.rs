//! Flow-count schedules and the per-interval transitions between them.
use std::ops::Range;
use std::time::Duration;

use crate::catalog::FlowCatalog;
use crate::error::{AppError, AppResult, ValidationError};

/// Desired number of active flows per interval, validated against a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    counts: Vec<usize>,
}

impl Schedule {
    /// Validates `counts` against `catalog`.
    ///
    /// # Errors
    ///
    /// Returns `ScheduleEmpty` for an empty schedule and
    /// `ScheduleExceedsCatalog` for the first entry above the catalog size.
    pub fn new(counts: Vec<usize>, catalog: &FlowCatalog) -> AppResult<Self> {
        if counts.is_empty() {
            return Err(AppError::validation(ValidationError::ScheduleEmpty));
        }
        let catalog_len = catalog.len();
        if let Some((index, value)) = counts
            .iter()
            .copied()
            .enumerate()
            .find(|(_, value)| *value > catalog_len)
        {
            return Err(AppError::validation(
                ValidationError::ScheduleExceedsCatalog {
                    index,
                    value,
                    catalog_len,
                },
            ));
        }
        Ok(Self { counts })
    }

    #[must_use]
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Count for the first interval. Schedules are never empty.
    #[must_use]
    pub fn initial(&self) -> usize {
        self.counts.first().copied().unwrap_or_default()
    }

    #[must_use]
    pub fn get(&self, interval: usize) -> Option<usize> {
        self.counts.get(interval).copied()
    }

    /// Total wall time covered, `interval * len`.
    #[must_use]
    pub fn total_duration(&self, interval: Duration) -> Option<Duration> {
        u32::try_from(self.counts.len())
            .ok()
            .and_then(|len| interval.checked_mul(len))
    }
}

/// Parses a comma-separated list of flow counts such as `3,5,2,0`.
///
/// # Errors
///
/// Returns an error for an empty list or a non-numeric entry.
pub fn parse_schedule(value: &str) -> Result<Vec<usize>, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::InvalidSchedule {
            value: value.to_owned(),
        });
    }
    trimmed
        .split(',')
        .map(str::trim)
        .map(|entry| {
            entry
                .parse::<usize>()
                .map_err(|err| ValidationError::InvalidScheduleEntry {
                    value: entry.to_owned(),
                    source: err,
                })
        })
        .collect()
}

/// What must change between two consecutive intervals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Hold,
    Start(Range<usize>),
    Stop(Range<usize>),
}

impl Transition {
    /// Minimal change from `current` to `target` active flows.
    #[must_use]
    pub const fn between(current: usize, target: usize) -> Self {
        if target > current {
            Transition::Start(current..target)
        } else if target < current {
            Transition::Stop(target..current)
        } else {
            Transition::Hold
        }
    }
}
