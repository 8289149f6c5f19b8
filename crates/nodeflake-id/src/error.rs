use jiff::Timestamp;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by generator construction, identifier generation and parsing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    /// The operating system could not provide seed material. Proceeding would
    /// mean a predictable random field, so construction is refused.
    #[error("entropy source unavailable: {0}")]
    EntropyUnavailable(String),
    #[error("{field} value {value:#x} does not fit in {bits} bits")]
    FieldOverflow {
        field: &'static str,
        value: u64,
        bits: u32,
    },
    #[error("invalid node id {node_id}; expected 0..={max_node_id}")]
    InvalidNodeId { node_id: u32, max_node_id: u16 },
    #[error("epoch is ahead of current clock time: epoch={epoch}, now={now}")]
    EpochAhead { epoch: Timestamp, now: Timestamp },
    #[error("invalid identifier: {0}")]
    InvalidFormat(String),
    #[error("generator state lock is poisoned")]
    StatePoisoned,
}
