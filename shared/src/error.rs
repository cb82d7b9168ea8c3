use thiserror::Error;

use crate::{
    frames::FrameError, lists::ListError, registry::RegistryError,
    transport::error::TransportError,
};

/// How the host should react to a `ReplicationError`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Peers disagree on schema or the host misconfigured itself: abort startup
    Setup,
    /// The remote sent something this host cannot follow: drop the session
    Protocol,
    /// The host misused an object, such as destroying it twice
    ObjectLogic,
}

/// Every error the replication crates can return
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplicationError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    List(#[from] ListError),

    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The peers speak different protocol or schema versions
    #[error("Version mismatch: local protocol {local_protocol} schema {local_schema}, remote protocol {remote_protocol} schema {remote_schema}")]
    VersionMismatch {
        local_protocol: u16,
        local_schema: u32,
        remote_protocol: u16,
        remote_schema: u32,
    },

    /// A frame history cannot hold a reference frame and the frame being built
    #[error("History capacity {capacity} is below the minimum of {minimum}")]
    HistoryCapacity { capacity: usize, minimum: usize },
}

impl ReplicationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReplicationError::List(ListError::ObjectAlreadyDestroyed { .. })
            | ReplicationError::List(ListError::ObjectNotFound { .. })
            | ReplicationError::List(ListError::InvalidHandle { .. })
            | ReplicationError::List(ListError::HandleInUse { .. }) => ErrorKind::ObjectLogic,
            ReplicationError::Frame(_) | ReplicationError::Transport(_) => ErrorKind::Protocol,
            ReplicationError::Registry(_)
            | ReplicationError::List(_)
            | ReplicationError::VersionMismatch { .. }
            | ReplicationError::HistoryCapacity { .. } => ErrorKind::Setup,
        }
    }
}
