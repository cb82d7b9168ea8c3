use thiserror::Error;

/// Errors reported by a transport implementation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The payload could not be handed to the channel
    #[error("Failed to send payload: {reason}")]
    SendFailed { reason: String },

    /// The channel failed while receiving
    #[error("Failed to receive payload: {reason}")]
    ReceiveFailed { reason: String },

    /// The remote end closed the channel
    #[error("Transport is disconnected")]
    Disconnected,
}
