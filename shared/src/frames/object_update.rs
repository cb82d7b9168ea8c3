use std::sync::Arc;

use log::trace;
use netlist_serde::{BitReader, BitWrite, Serde};

use super::error::FrameError;
use crate::{
    converters::Snapshot,
    handle::ObjectHandle,
    lists::{ChangeMask, NetworkObject},
    messages::{read_varint_u16, write_varint},
    registry::{RegistryError, RemoteTypeMap, TypeMetaData},
    types::{FrameSequence, NetTypeId},
};

/// One object's state within a frame, full or relative to the update for
/// the same object in the reference frame.
#[derive(Clone, Debug)]
pub struct ObjectUpdate {
    handle: ObjectHandle,
    meta_data: Arc<TypeMetaData>,
    is_delta: bool,
    snapshot: Snapshot,
    suppressed: Vec<usize>,
}

impl ObjectUpdate {
    /// Snapshots `object`. With a reference update the result is a delta,
    /// and change-notifying members that were not flagged keep the
    /// reference value so the stored snapshot matches what the receiver holds.
    pub fn from_object(
        object: &NetworkObject,
        reference: Option<&ObjectUpdate>,
    ) -> Result<Self, RegistryError> {
        Self::from_sent_object(object, reference, reference.map(ObjectUpdate::snapshot), None)
    }

    /// Snapshots `object` for a destination whose last update for it
    /// carried `sent`.
    ///
    /// Change-notifying members flagged neither on the object nor in
    /// `pending` keep their `sent` value, and are written as unchanged when
    /// that value equals the reference value.
    pub fn from_sent_object(
        object: &NetworkObject,
        reference: Option<&ObjectUpdate>,
        sent: Option<&Snapshot>,
        pending: Option<&ChangeMask>,
    ) -> Result<Self, RegistryError> {
        let mut snapshot = object.take_snapshot()?;
        let mut suppressed = Vec::new();

        if let Some(sent) = sent {
            for (index, value) in snapshot.iter_mut().enumerate() {
                if object.is_changed_or_pending(index, pending) {
                    continue;
                }
                let Some(sent_value) = sent.get(index) else {
                    continue;
                };
                *value = sent_value.clone();
                if reference.and_then(|reference| reference.snapshot.get(index)) == Some(sent_value) {
                    suppressed.push(index);
                }
            }
        }

        Ok(Self {
            handle: object.handle(),
            meta_data: Arc::clone(object.meta_data()),
            is_delta: reference.is_some(),
            snapshot,
            suppressed,
        })
    }

    pub fn handle(&self) -> ObjectHandle {
        self.handle
    }

    pub fn net_type_id(&self) -> NetTypeId {
        self.meta_data.net_type_id()
    }

    pub fn meta_data(&self) -> &Arc<TypeMetaData> {
        &self.meta_data
    }

    pub fn is_delta(&self) -> bool {
        self.is_delta
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Whether a later update for `handle` with `type_id` may be encoded
    /// against this one
    pub fn is_reference_for(&self, handle: &ObjectHandle, type_id: NetTypeId) -> bool {
        self.handle == *handle && self.net_type_id() == type_id
    }

    /// Writes the update header and the tagged member stream. `reference`
    /// must be the update this one was built against when it is a delta.
    pub fn write(
        &self,
        reference: Option<&ObjectUpdate>,
        writer: &mut dyn BitWrite,
    ) -> Result<(), FrameError> {
        let reference = match (self.is_delta, reference) {
            (true, Some(reference)) => Some(reference),
            (true, None) => return Err(FrameError::MissingReference { reference: None }),
            (false, _) => None,
        };

        self.handle.ser(writer);
        write_varint(u64::from(self.net_type_id()), writer);
        self.is_delta.ser(writer);

        let mut changed_members = 0;
        for (index, (member, value)) in self
            .meta_data
            .members()
            .iter()
            .zip(&self.snapshot)
            .enumerate()
        {
            let converter = member.converter();
            if self.suppressed.contains(&index) {
                converter.write_unchanged(writer);
                continue;
            }
            let changed = match reference.and_then(|reference| reference.snapshot.get(index)) {
                Some(previous) => converter.write(value, previous, writer),
                None => converter.write(value, &converter.default_value(), writer),
            };
            if changed {
                changed_members += 1;
            }
        }

        trace!(
            "wrote {} update for {} with {} changed members",
            if self.is_delta { "delta" } else { "full" },
            self.handle,
            changed_members
        );

        Ok(())
    }

    /// Reads one update. Deltas are decoded against the update for the same
    /// handle and type in `reference_frame`.
    pub fn read(
        reader: &mut BitReader,
        types: &RemoteTypeMap,
        reference_sequence: Option<FrameSequence>,
        reference_frame: Option<&super::Frame>,
    ) -> Result<Self, FrameError> {
        let handle = ObjectHandle::de(reader)?;
        let remote_type_id = read_varint_u16(reader)?;
        let is_delta = bool::de(reader)?;

        let meta_data = types
            .find(remote_type_id)
            .map_err(|_| FrameError::UnknownTypeId {
                type_id: remote_type_id,
            })?;

        let reference = if is_delta {
            let Some(reference) = reference_frame
                .and_then(|frame| frame.find_update(&handle))
                .filter(|update| update.is_reference_for(&handle, meta_data.net_type_id()))
            else {
                return Err(FrameError::MissingReference {
                    reference: reference_sequence,
                });
            };
            Some(reference)
        } else {
            None
        };

        let mut snapshot = Vec::with_capacity(meta_data.member_count());
        for (index, member) in meta_data.members().iter().enumerate() {
            let converter = member.converter();
            let (_, value) = match reference.and_then(|reference| reference.snapshot.get(index)) {
                Some(previous) => converter.read(reader, previous)?,
                None => converter.read(reader, &converter.default_value())?,
            };
            snapshot.push(value);
        }

        Ok(Self {
            handle,
            meta_data: Arc::clone(meta_data),
            is_delta,
            snapshot,
            suppressed: Vec::new(),
        })
    }
}
