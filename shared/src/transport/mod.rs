//! Contract for the reliable, ordered channel that carries replication
//! messages. Loss and reordering must be handled below this layer.

pub mod error;

use error::TransportError;

pub trait PacketSender<D>: Send + Sync {
    /// Sends a payload to one destination
    fn send(&self, destination: &D, payload: &[u8]) -> Result<(), TransportError>;
}

pub trait PacketReceiver: Send + Sync {
    /// Receives the next payload, if one is waiting
    fn receive(&mut self) -> Result<Option<Vec<u8>>, TransportError>;
}
