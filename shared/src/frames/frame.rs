use std::collections::{HashMap, HashSet};

use netlist_serde::{BitReader, BitWriter};

use super::{error::FrameError, frame_list::FrameList, object_update::ObjectUpdate};
use crate::{
    handle::ObjectHandle,
    messages::{read_count, write_varint, FrameMessage},
    registry::RemoteTypeMap,
    types::{FrameSequence, ListId, ObjectId},
};

/// One list's destruction notices and object updates for one tick.
///
/// The destroyed ids and the updated ids of a frame never overlap.
#[derive(Clone, Debug)]
pub struct Frame {
    list_id: ListId,
    destroyed_object_ids: Vec<ObjectId>,
    updates: Vec<ObjectUpdate>,
    update_index: HashMap<ObjectHandle, usize>,
}

impl Frame {
    pub fn new(list_id: ListId) -> Self {
        Self {
            list_id,
            destroyed_object_ids: Vec::new(),
            updates: Vec::new(),
            update_index: HashMap::new(),
        }
    }

    pub fn list_id(&self) -> ListId {
        self.list_id
    }

    pub fn destroyed_object_ids(&self) -> &[ObjectId] {
        &self.destroyed_object_ids
    }

    pub fn updates(&self) -> &[ObjectUpdate] {
        &self.updates
    }

    pub fn is_empty(&self) -> bool {
        self.destroyed_object_ids.is_empty() && self.updates.is_empty()
    }

    pub fn find_update(&self, handle: &ObjectHandle) -> Option<&ObjectUpdate> {
        self.update_index
            .get(handle)
            .and_then(|index| self.updates.get(*index))
    }

    pub fn push_destroyed(&mut self, object_id: ObjectId) {
        self.destroyed_object_ids.push(object_id);
    }

    pub fn push_update(&mut self, update: ObjectUpdate) {
        self.update_index.insert(update.handle(), self.updates.len());
        self.updates.push(update);
    }

    /// Encodes the frame. Delta updates are written against the matching
    /// updates of `reference`, the frame list the deltas were built from.
    pub fn to_message(&self, reference: Option<&FrameList>) -> Result<FrameMessage, FrameError> {
        let reference_frame = reference.and_then(|frame_list| frame_list.frame(self.list_id));

        let mut writer = BitWriter::new();
        write_varint(self.updates.len() as u64, &mut writer);
        for update in &self.updates {
            let reference_update = reference_frame
                .and_then(|frame| frame.find_update(&update.handle()))
                .filter(|previous| previous.is_reference_for(&update.handle(), update.net_type_id()));
            update
                .write(reference_update, &mut writer)
                .map_err(|error| match error {
                    FrameError::MissingReference { .. } => FrameError::MissingReference {
                        reference: reference.map(FrameList::sequence),
                    },
                    other => other,
                })?;
        }

        Ok(FrameMessage {
            list_id: self.list_id,
            destroyed_object_ids: self.destroyed_object_ids.clone(),
            updates: writer.to_bytes(),
        })
    }

    /// Decodes a frame received from a transmitter
    pub fn from_message(
        message: &FrameMessage,
        types: &RemoteTypeMap,
        reference_sequence: Option<FrameSequence>,
        reference: Option<&FrameList>,
    ) -> Result<Self, FrameError> {
        let reference_frame = reference.and_then(|frame_list| frame_list.frame(message.list_id));

        let mut frame = Self::new(message.list_id);
        frame.destroyed_object_ids = message.destroyed_object_ids.clone();
        let destroyed: HashSet<ObjectId> = message.destroyed_object_ids.iter().copied().collect();

        let mut reader = BitReader::new(&message.updates);
        let count = read_count(&mut reader)?;
        frame.updates.reserve(count);
        for _ in 0..count {
            let update = ObjectUpdate::read(&mut reader, types, reference_sequence, reference_frame)?;
            if destroyed.contains(&update.handle().id()) {
                return Err(FrameError::DestroyedAndUpdated {
                    list_id: message.list_id,
                    object_id: update.handle().id(),
                });
            }
            frame.push_update(update);
        }

        Ok(frame)
    }
}
