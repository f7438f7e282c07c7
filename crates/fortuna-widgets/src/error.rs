//! Errors surfaced by widget operations.

use thiserror::Error;

/// Rejected wheel operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WheelError {
    /// No settled selection is pending
    #[error("no prize is selected")]
    NoSelection,

    /// The recorded selection no longer points into the option list
    #[error("selected index {index} is out of range for {len} option(s)")]
    StaleSelection {
        /// Recorded index
        index: usize,
        /// Current option count
        len: usize,
    },

    /// No wheel has this id
    #[error("no wheel with id {id}")]
    UnknownWheel {
        /// Requested id
        id: usize,
    },
}

/// Rejected slot machine operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotError {
    /// Range end is not above range start
    #[error("the end number ({end}) must be greater than the start number ({start})")]
    InvalidRange {
        /// Range start
        start: i32,
        /// Range end
        end: i32,
    },

    /// A range field held a number outside what can be drawn from
    #[error("'{input}' is out of range: numbers must lie between {min} and {max}", min = i32::MIN, max = i32::MAX)]
    BoundOutOfRange {
        /// Raw field text
        input: String,
    },
}
