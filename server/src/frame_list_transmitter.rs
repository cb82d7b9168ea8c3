use std::collections::{HashMap, HashSet};

use log::{debug, trace, warn};

use netlist_shared::{
    sequence_greater_than, ChangeMask, Frame, FrameHistory, FrameList, FrameListUpdate,
    FrameSequence, ListId, ListManager, NetworkObject, NetworkObjectList, ObjectHandle, ObjectId,
    ObjectUpdate, ReplicationError, Snapshot,
};

use crate::{server_config::ReferenceMode, transmitter_listener::TransmitterListener};

/// What one destination holds of one list
#[derive(Default)]
struct DestinationList {
    /// Snapshot of the last update sent for every object the destination holds
    sent: HashMap<ObjectHandle, Snapshot>,
    /// Ids of held objects swept while no frame was built for the destination
    pending_destroyed: Vec<ObjectId>,
    /// Change notifications raised while a held object was not sent
    pending_changes: HashMap<ObjectHandle, ChangeMask>,
}

impl DestinationList {
    fn forget(&mut self, handle: &ObjectHandle) -> bool {
        self.pending_changes.remove(handle);
        self.sent.remove(handle).is_some()
    }

    fn record_changes(&mut self, object: &NetworkObject) {
        let handle = object.handle();
        if !object.has_pending_changes() || !self.sent.contains_key(&handle) {
            return;
        }
        self.pending_changes
            .entry(handle)
            .and_modify(|pending| pending.or(object.change_mask()))
            .or_insert_with(|| object.change_mask().clone());
    }
}

/// Frame state for one destination: its history, the objects it has been
/// sent, and the serialized frame list waiting to go out.
pub struct FrameListTransmitter {
    listener: Box<dyn TransmitterListener>,
    history: FrameHistory,
    lists: HashMap<ListId, DestinationList>,
    next_sequence: FrameSequence,
    last_acknowledged: Option<FrameSequence>,
    current: Option<FrameListUpdate>,
}

impl FrameListTransmitter {
    pub fn new(listener: Box<dyn TransmitterListener>, history_capacity: usize) -> Self {
        Self {
            listener,
            history: FrameHistory::new(history_capacity),
            lists: HashMap::new(),
            next_sequence: 0,
            last_acknowledged: None,
            current: None,
        }
    }

    pub fn history(&self) -> &FrameHistory {
        &self.history
    }

    pub fn last_acknowledged(&self) -> Option<FrameSequence> {
        self.last_acknowledged
    }

    pub fn knows_object(&self, list_id: ListId, handle: &ObjectHandle) -> bool {
        self.lists
            .get(&list_id)
            .is_some_and(|list| list.sent.contains_key(handle))
    }

    pub fn acknowledge(&mut self, sequence: FrameSequence) {
        let newer = match self.last_acknowledged {
            Some(last) => sequence_greater_than(sequence, last),
            None => true,
        };
        if newer {
            self.last_acknowledged = Some(sequence);
        }
    }

    pub fn take_current(&mut self) -> Option<FrameListUpdate> {
        self.current.take()
    }

    pub fn current(&self) -> Option<&FrameListUpdate> {
        self.current.as_ref()
    }

    /// Builds and serializes this tick's frame list, unless the listener
    /// reports that the destination cannot transmit. A skipped destination
    /// keeps the destroy notices and change notifications of this tick for
    /// its next frame list.
    pub fn create_frame_list(
        &mut self,
        lists: &ListManager,
        reference_mode: ReferenceMode,
    ) -> Result<(), ReplicationError> {
        if !self.listener.can_transmit() {
            trace!("skipping destination that cannot transmit");
            self.record_skipped_frame(lists);
            return Ok(());
        }

        let reference_sequence = self.reference_sequence(reference_mode);
        let reference = reference_sequence.and_then(|sequence| self.history.get(sequence));

        let mut frames = Vec::with_capacity(lists.list_count());
        for list in lists.lists() {
            self.listener.on_begin_process_list(list);
            let destination = self.lists.entry(list.id()).or_default();
            let frame = create_frame(
                list,
                reference.and_then(|frame_list| frame_list.frame(list.id())),
                destination,
                self.listener.as_mut(),
            )?;
            self.listener.on_end_process_list(list);
            frames.push(frame);
        }

        let frame_list = FrameList::new(self.next_sequence, reference_sequence, frames);
        let message = frame_list.to_message(reference)?;

        debug!(
            "created frame list {} against {:?} with {} frames",
            frame_list.sequence(),
            reference_sequence,
            frame_list.frames().len()
        );

        self.history.push(frame_list);
        self.current = Some(message);
        self.next_sequence = self.next_sequence.wrapping_add(1);

        Ok(())
    }

    fn record_skipped_frame(&mut self, lists: &ListManager) {
        for list in lists.lists() {
            let destination = self.lists.entry(list.id()).or_default();
            for object in list.objects() {
                if !object.is_destroyed() {
                    destination.record_changes(object);
                } else if destination.forget(&object.handle()) {
                    destination.pending_destroyed.push(object.handle().id());
                }
            }
        }
    }

    fn reference_sequence(&self, reference_mode: ReferenceMode) -> Option<FrameSequence> {
        match reference_mode {
            ReferenceMode::LastSent => self.history.latest().map(FrameList::sequence),
            ReferenceMode::LastAcknowledged => {
                let sequence = self.last_acknowledged?;
                if self.history.retains_after_push(sequence) {
                    Some(sequence)
                } else {
                    warn!(
                        "acknowledged frame list {} left the history, sending full updates",
                        sequence
                    );
                    None
                }
            }
        }
    }
}

fn create_frame(
    list: &NetworkObjectList,
    reference: Option<&Frame>,
    destination: &mut DestinationList,
    listener: &mut dyn TransmitterListener,
) -> Result<Frame, ReplicationError> {
    let mut frame = Frame::new(list.id());

    // an id destroyed in a skipped frame may already be reused, and the
    // new object waits until the destroy notice has been applied
    let flushed: HashSet<ObjectId> = destination.pending_destroyed.iter().copied().collect();
    for object_id in destination.pending_destroyed.drain(..) {
        frame.push_destroyed(object_id);
    }

    for object in list.objects() {
        let handle = object.handle();

        if object.is_destroyed() {
            if destination.forget(&handle) {
                frame.push_destroyed(handle.id());
            }
            continue;
        }

        if flushed.contains(&handle.id()) {
            trace!("list {} object {}: waiting for destroy notice", list.name(), handle);
            continue;
        }

        if !listener.filter(list, object) {
            destination.record_changes(object);
            continue;
        }

        let reference_update = reference
            .and_then(|frame| frame.find_update(&handle))
            .filter(|update| update.is_reference_for(&handle, object.net_type_id()));
        let pending = destination.pending_changes.remove(&handle);
        let update = ObjectUpdate::from_sent_object(
            object,
            reference_update,
            destination.sent.get(&handle),
            pending.as_ref(),
        )?;

        trace!(
            "list {} object {}: {} update",
            list.name(),
            handle,
            if update.is_delta() { "delta" } else { "full" }
        );

        destination.sent.insert(handle, update.snapshot().clone());
        frame.push_update(update);
    }

    Ok(frame)
}
