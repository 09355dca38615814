use thiserror::Error;

/// Why a checked [Reader](crate::Reader) operation could not produce an event.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadError{
    /// Every submitted event has already been consumed by this reader.
    #[error("no unconsumed event is ready for this reader")]
    NotReady,

    /// The reader was unsubscribed.
    #[error("reader used after unsubscribe")]
    Retired,

    /// A bounded wait elapsed before an event arrived.
    #[error("timed out waiting for an event")]
    Timeout,
}

impl ReadError{
    /// Short stable label (snake_case) for logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            ReadError::NotReady => "read_not_ready",
            ReadError::Retired  => "read_retired",
            ReadError::Timeout  => "read_timeout",
        }
    }
}
