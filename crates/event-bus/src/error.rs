use thiserror::Error;

/// Errors that can occur when handing an event to the dispatcher.
///
/// The domain services only log these; they never change the outcome of
/// the operation that produced the event.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The transport refused or dropped the event.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The event could not be encoded for the transport.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for dispatcher operations.
pub type Result<T> = std::result::Result<T, DispatchError>;
