use std::path::PathBuf;

use chrono::NaiveDate;

use thiserror::Error;

use crate::model::ItemId;

/// Errors raised while loading configuration or validating host input.
#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid timeline configuration")]
    Config(#[from] serde_json::Error),
    #[error("range start {start} is after its end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Caller errors reported by [`InteractionController`](crate::interaction::InteractionController).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InteractionError {
    #[error("a gesture on item {active} is already in progress")]
    GestureInProgress { active: ItemId },
    #[error("item {0} has no dates to drag")]
    Unscheduled(ItemId),
    #[error("item {0} is already scheduled")]
    AlreadyScheduled(ItemId),
}
