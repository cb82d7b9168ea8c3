use std::default::Default;

use netlist_shared::DEFAULT_HISTORY_CAPACITY;

/// Which earlier frame list deltas are encoded against
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ReferenceMode {
    /// The previous frame list sent to the destination. Requires a reliable
    /// ordered channel, which the transport contract guarantees.
    #[default]
    LastSent,
    /// The newest frame list the destination acknowledged
    LastAcknowledged,
}

/// Contains Config properties which will be used by the Transmitter
#[derive(Clone)]
pub struct ServerConfig {
    /// Number of frame lists kept per destination. Must be at least 2.
    pub history_capacity: usize,
    /// Used to pick the reference frame list for delta updates
    pub reference_mode: ReferenceMode,
    /// Host-defined schema version, compared during the handshake
    pub schema: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            reference_mode: ReferenceMode::default(),
            schema: 0,
        }
    }
}
