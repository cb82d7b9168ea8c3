use std::{any::Any, fmt, sync::Arc};

use super::change_mask::ChangeMask;
use crate::{
    converters::Snapshot,
    handle::ObjectHandle,
    registry::{RegistryError, TypeMetaData},
    types::NetTypeId,
};

/// Binds one live, exclusively owned object instance to its schema.
///
/// Transmitters create these explicitly; receivers create them when an
/// update references an id they have not seen. A destroyed object stays
/// reachable until its list's post-frame sweep.
pub struct NetworkObject {
    handle: ObjectHandle,
    meta_data: Arc<TypeMetaData>,
    instance: Box<dyn Any + Send>,
    change_mask: ChangeMask,
    destroyed: bool,
}

impl NetworkObject {
    pub(crate) fn new(
        handle: ObjectHandle,
        meta_data: Arc<TypeMetaData>,
        instance: Box<dyn Any + Send>,
    ) -> Self {
        let change_mask = ChangeMask::new(meta_data.change_notification_count());
        Self {
            handle,
            meta_data,
            instance,
            change_mask,
            destroyed: false,
        }
    }

    pub fn handle(&self) -> ObjectHandle {
        self.handle
    }

    pub fn meta_data(&self) -> &Arc<TypeMetaData> {
        &self.meta_data
    }

    pub fn net_type_id(&self) -> NetTypeId {
        self.meta_data.net_type_id()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn instance<T: Any>(&self) -> Option<&T> {
        (*self.instance).downcast_ref::<T>()
    }

    pub fn instance_mut<T: Any>(&mut self) -> Option<&mut T> {
        (*self.instance).downcast_mut::<T>()
    }

    pub fn instance_any(&self) -> &dyn Any {
        &*self.instance
    }

    /// Flags a change-notifying member so the next frame diffs it
    pub fn on_change(&mut self, member_name: &str) -> Result<(), RegistryError> {
        let Some((_, member)) = self.meta_data.find_member(member_name) else {
            return Err(RegistryError::UnknownMember {
                type_name: self.meta_data.name().to_string(),
                member: member_name.to_string(),
            });
        };
        let Some(index) = member.change_notification_index() else {
            return Err(RegistryError::MemberWithoutNotification {
                type_name: self.meta_data.name().to_string(),
                member: member_name.to_string(),
            });
        };
        self.change_mask.set_bit(index, true);
        Ok(())
    }

    /// Whether the member at `member_index` should be diffed this frame.
    /// Members without change notification are always diffed.
    pub fn is_changed(&self, member_index: usize) -> bool {
        self.is_changed_or_pending(member_index, None)
    }

    /// Same as `is_changed`, also counting the bits of `pending`: changes
    /// flagged in earlier frames that a destination has not been sent yet
    pub fn is_changed_or_pending(&self, member_index: usize, pending: Option<&ChangeMask>) -> bool {
        match self
            .meta_data
            .members()
            .get(member_index)
            .and_then(|member| member.change_notification_index())
        {
            Some(index) => {
                self.change_mask.bit(index) || pending.is_some_and(|pending| pending.bit(index))
            }
            None => true,
        }
    }

    pub fn has_pending_changes(&self) -> bool {
        !self.change_mask.is_clear()
    }

    pub fn change_mask(&self) -> &ChangeMask {
        &self.change_mask
    }

    /// Copies every member of the live instance, in member order
    pub fn take_snapshot(&self) -> Result<Snapshot, RegistryError> {
        let mut snapshot = Vec::with_capacity(self.meta_data.member_count());

        for member in self.meta_data.members() {
            let Some(value) = member.get(self.instance_any()) else {
                return Err(RegistryError::UnregisteredType {
                    type_name: self.meta_data.name().to_string(),
                });
            };
            if !member.converter().accepts(&value) {
                return Err(RegistryError::ValueTypeMismatch {
                    type_name: self.meta_data.name().to_string(),
                    member: member.name().to_string(),
                    found: value.kind_name(),
                });
            }
            snapshot.push(member.converter().copy(&value));
        }

        Ok(snapshot)
    }

    /// Assigns every member of the live instance from `snapshot`
    pub fn apply_snapshot(&mut self, snapshot: &Snapshot) -> Result<(), RegistryError> {
        if snapshot.len() != self.meta_data.member_count() {
            return Err(RegistryError::SnapshotSizeMismatch {
                type_name: self.meta_data.name().to_string(),
                expected: self.meta_data.member_count(),
                actual: snapshot.len(),
            });
        }

        for (member, value) in self.meta_data.members().iter().zip(snapshot) {
            let value = member.converter().create_instance(value);
            if !member.set(&mut *self.instance, &value) {
                return Err(RegistryError::ValueTypeMismatch {
                    type_name: self.meta_data.name().to_string(),
                    member: member.name().to_string(),
                    found: value.kind_name(),
                });
            }
        }

        Ok(())
    }

    pub(crate) fn mark_destroyed(&mut self) {
        self.destroyed = true;
    }

    pub(crate) fn clear_changes(&mut self) {
        self.change_mask.clear();
    }
}

impl fmt::Debug for NetworkObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetworkObject")
            .field("handle", &self.handle)
            .field("type", &self.meta_data.name())
            .field("destroyed", &self.destroyed)
            .finish()
    }
}
