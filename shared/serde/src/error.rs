use thiserror::Error;

/// The payload ended early or contained a value that cannot be decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("malformed payload")]
pub struct SerdeErr;
