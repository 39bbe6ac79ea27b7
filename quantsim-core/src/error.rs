//! Fatal engine errors.
//!
//! These abort the run: a data-integrity failure or a backward-moving
//! timestamp means the results cannot be trusted and no partial equity curve
//! is claimed valid. Expected business outcomes (risk vetoes, compliance
//! rejections, unfillable orders) are not errors; they are recorded on the
//! run result and the simulation continues.

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// A symbol's historical series is not strictly increasing in time.
    #[error("non-monotonic timestamp in series for '{symbol}' at {timestamp}")]
    DataGap {
        symbol: String,
        timestamp: DateTime<Utc>,
    },

    /// No symbol has any data at the start of the simulation.
    #[error("no market data available for any symbol")]
    EmptySeries,

    /// The queue handed the driver an event older than the one before it.
    /// Always a bug in a collaborator, never corrected silently.
    #[error("event timestamp went backward: {offending} after {previous}")]
    InvalidEventOrdering {
        previous: DateTime<Utc>,
        offending: DateTime<Utc>,
    },
}
