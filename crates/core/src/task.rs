//! Task selection and lookback window.

use crate::error::{Error, Result};
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;
use time::{Duration, OffsetDateTime};

/// A named unit of work the binary can be asked to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Short-link reconciliation followed by active-flag reconciliation.
    FixResources,
}

impl Task {
    /// Every task the binary accepts.
    pub const ALL: &'static [Task] = &[Task::FixResources];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FixResources => "fixResources",
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Task {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|task| task.as_str() == s)
            .ok_or_else(|| Error::InvalidTask(s.to_string()))
    }
}

/// Parse a comma-separated task list.
///
/// Spaces are removed before splitting. An empty list means "no tasks";
/// an empty entry inside a non-empty list is rejected like any unknown name.
pub fn parse_tasks(csv: &str) -> Result<Vec<Task>> {
    let compact: String = csv.chars().filter(|c| *c != ' ').collect();
    if compact.is_empty() {
        return Ok(Vec::new());
    }
    compact.split(',').map(Task::from_str).collect()
}

/// How far back the change scan looks, in whole days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookbackDays(NonZeroU32);

impl LookbackDays {
    pub const DEFAULT: LookbackDays = LookbackDays(NonZeroU32::MIN);

    pub fn new(days: i64) -> Result<Self> {
        u32::try_from(days)
            .ok()
            .and_then(NonZeroU32::new)
            .map(Self)
            .ok_or(Error::InvalidLookback(days))
    }

    pub fn days(&self) -> u32 {
        self.0.get()
    }

    /// Earliest `updated_at` included in a scan started at `now`.
    pub fn cutoff(&self, now: OffsetDateTime) -> OffsetDateTime {
        now - Duration::days(i64::from(self.days()))
    }
}

impl Default for LookbackDays {
    fn default() -> Self {
        Self::DEFAULT
    }
}
