//! In-memory transport for E2E testing
//! Routes payloads from the transmitter to each connected receiver without network I/O

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use netlist_server::TransmitterKey;
use netlist_shared::{PacketReceiver, PacketSender, TransportError};

type Queue = Arc<Mutex<VecDeque<Vec<u8>>>>;

fn lock(queue: &Queue) -> Result<MutexGuard<'_, VecDeque<Vec<u8>>>, TransportError> {
    queue.lock().map_err(|_| TransportError::SendFailed {
        reason: "queue lock poisoned".to_string(),
    })
}

/// Transmitter side of the local transport, with one queue per connected
/// destination
#[derive(Clone, Default)]
pub struct LocalSocketPair {
    queues: Arc<Mutex<HashMap<TransmitterKey, Queue>>>,
}

impl LocalSocketPair {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a queue for `key` and returns the receiving end
    pub fn connect(&self, key: TransmitterKey) -> Result<LocalReceiver, TransportError> {
        let queue: Queue = Arc::new(Mutex::new(VecDeque::new()));
        self.queues
            .lock()
            .map_err(|_| TransportError::Disconnected)?
            .insert(key, queue.clone());
        Ok(LocalReceiver { queue })
    }

    /// Drops the queue for `key`. Later sends to it fail.
    pub fn disconnect(&self, key: &TransmitterKey) -> bool {
        match self.queues.lock() {
            Ok(mut queues) => queues.remove(key).is_some(),
            Err(_) => false,
        }
    }
}

impl PacketSender<TransmitterKey> for LocalSocketPair {
    fn send(&self, destination: &TransmitterKey, payload: &[u8]) -> Result<(), TransportError> {
        let queue = {
            let queues = self.queues.lock().map_err(|_| TransportError::Disconnected)?;
            queues
                .get(destination)
                .cloned()
                .ok_or(TransportError::Disconnected)?
        };
        lock(&queue)?.push_back(payload.to_vec());
        Ok(())
    }
}

/// Receiving end for a single destination
pub struct LocalReceiver {
    queue: Queue,
}

impl LocalReceiver {
    pub fn pending(&self) -> usize {
        self.queue.lock().map(|queue| queue.len()).unwrap_or(0)
    }
}

impl PacketReceiver for LocalReceiver {
    fn receive(&mut self) -> Result<Option<Vec<u8>>, TransportError> {
        let mut queue = self.queue.lock().map_err(|_| TransportError::ReceiveFailed {
            reason: "queue lock poisoned".to_string(),
        })?;
        Ok(queue.pop_front())
    }
}
