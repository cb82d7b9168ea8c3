use netlist_shared::{NetworkObject, NetworkObjectList};

/// Per-destination hooks consulted while frames are built
pub trait TransmitterListener: Send {
    /// Destinations that cannot transmit are skipped for this tick
    fn can_transmit(&self) -> bool {
        true
    }

    /// Called once per live object per frame. Excluded objects are omitted
    /// from the frame without being destroyed on the destination.
    fn filter(&mut self, _list: &NetworkObjectList, _object: &NetworkObject) -> bool {
        true
    }

    fn on_begin_process_list(&mut self, _list: &NetworkObjectList) {}

    fn on_end_process_list(&mut self, _list: &NetworkObjectList) {}
}

/// Transmits every object to a destination that can always receive
pub struct TransmitAll;

impl TransmitterListener for TransmitAll {}
