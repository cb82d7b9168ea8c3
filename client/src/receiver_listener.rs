use netlist_shared::{NetworkObject, NetworkObjectList};

/// Notifications raised while a frame list is applied.
///
/// For each frame: `on_begin_process_list`, then every destruction, then
/// for every update `on_object_created` (new objects only),
/// `on_begin_update` and `on_end_update`, and finally `on_end_process_list`.
pub trait ReceiverListener: Send {
    fn on_begin_process_list(&mut self, _list: &NetworkObjectList) {}

    fn on_end_process_list(&mut self, _list: &NetworkObjectList) {}

    fn on_object_created(&mut self, _list: &NetworkObjectList, _object: &NetworkObject) {}

    /// The object is still reachable; it is removed once the whole frame list
    /// has been applied
    fn on_object_destroyed(&mut self, _list: &NetworkObjectList, _object: &NetworkObject) {}

    fn on_begin_update(&mut self, _list: &NetworkObjectList, _object: &NetworkObject) {}

    fn on_end_update(&mut self, _list: &NetworkObjectList, _object: &NetworkObject) {}
}

/// Ignores every notification
pub struct NoopListener;

impl ReceiverListener for NoopListener {}
