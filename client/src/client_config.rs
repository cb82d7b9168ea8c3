use std::default::Default;

use netlist_shared::DEFAULT_HISTORY_CAPACITY;

/// Contains Config properties which will be used by the Receiver
#[derive(Clone)]
pub struct ClientConfig {
    /// Number of received frame lists kept for decoding deltas. Must be at
    /// least 2.
    pub history_capacity: usize,
    /// Host-defined schema version, compared during the handshake
    pub schema: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            schema: 0,
        }
    }
}
