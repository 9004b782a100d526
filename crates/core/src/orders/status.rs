//! Order Statuses

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

/// Primary fulfilment stage of an order.
///
/// External subsystems (QC, outbound) write values this crate does not
/// originate, so unknown strings are preserved in [`ProcessingStatus::Other`]
/// rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProcessingStatus {
    /// Waiting for a picker.
    ReadyToPick,
    /// A picker is collecting the lines.
    PickingProcess,
    /// Picking was paused and the order returned to the pool.
    PendingPicking,
    /// All lines were collected.
    PickingComplete,
    /// Under quality control.
    QcProcess,
    /// Quality control finished.
    QcComplete,
    /// Handed over to the carrier.
    Completed,
    /// A status written by another subsystem.
    Other(String),
}

impl ProcessingStatus {
    /// Stored representation.
    pub fn as_str(&self) -> &str {
        match self {
            Self::ReadyToPick => "ready to pick",
            Self::PickingProcess => "picking process",
            Self::PendingPicking => "pending picking",
            Self::PickingComplete => "picking complete",
            Self::QcProcess => "qc process",
            Self::QcComplete => "qc complete",
            Self::Completed => "completed",
            Self::Other(status) => status,
        }
    }

    /// Statuses that must not be disturbed by edits: work is in flight.
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::PickingProcess | Self::QcProcess)
    }
}

impl From<&str> for ProcessingStatus {
    fn from(value: &str) -> Self {
        match value {
            "ready to pick" => Self::ReadyToPick,
            "picking process" => Self::PickingProcess,
            "pending picking" => Self::PendingPicking,
            "picking complete" => Self::PickingComplete,
            "qc process" => Self::QcProcess,
            "qc complete" => Self::QcComplete,
            "completed" => Self::Completed,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for ProcessingStatus {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<ProcessingStatus> for String {
    fn from(value: ProcessingStatus) -> Self {
        match value {
            ProcessingStatus::Other(status) => status,
            known => known.as_str().to_string(),
        }
    }
}

impl Display for ProcessingStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Audit annotation orthogonal to [`ProcessingStatus`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventStatus {
    /// Header or details were edited.
    Changed,
    /// Created as a copy of another order.
    Duplicated,
    /// Terminal; only reads and the complained flag are allowed afterwards.
    Cancelled,
    /// An annotation written by another subsystem.
    Other(String),
}

impl EventStatus {
    /// Stored representation.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Changed => "changed",
            Self::Duplicated => "duplicated",
            Self::Cancelled => "cancelled",
            Self::Other(status) => status,
        }
    }
}

impl From<&str> for EventStatus {
    fn from(value: &str) -> Self {
        match value {
            "changed" => Self::Changed,
            "duplicated" => Self::Duplicated,
            "cancelled" => Self::Cancelled,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for EventStatus {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<EventStatus> for String {
    fn from(value: EventStatus) -> Self {
        match value {
            EventStatus::Other(status) => status,
            known => known.as_str().to_string(),
        }
    }
}

impl Display for EventStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}
