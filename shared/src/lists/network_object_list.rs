use std::{any::Any, collections::BTreeSet, sync::Arc};

use log::trace;

use super::{error::ListError, network_object::NetworkObject};
use crate::{
    constants::MAX_SUPPORTED_OBJECTS,
    handle::ObjectHandle,
    registry::TypeMetaData,
    types::{ListId, ObjectId},
};

/// A named set of network objects, iterated in ascending id order.
///
/// Each id slot carries a serial number that advances whenever the slot is
/// freed, so handles to removed objects never match a later occupant.
pub struct NetworkObjectList {
    id: ListId,
    name: String,
    slots: Vec<Option<NetworkObject>>,
    serials: Vec<u16>,
    free_ids: BTreeSet<ObjectId>,
    live_count: usize,
}

impl NetworkObjectList {
    pub(crate) fn new(id: ListId, name: String) -> Self {
        Self {
            id,
            name,
            slots: Vec::new(),
            serials: Vec::new(),
            free_ids: BTreeSet::new(),
            live_count: 0,
        }
    }

    pub fn id(&self) -> ListId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Objects in the list, including destroyed ones awaiting the sweep
    pub fn len(&self) -> usize {
        self.live_count
    }

    pub fn is_empty(&self) -> bool {
        self.live_count == 0
    }

    pub fn get(&self, handle: &ObjectHandle) -> Option<&NetworkObject> {
        self.get_by_id(handle.id())
            .filter(|object| object.handle() == *handle)
    }

    pub fn get_mut(&mut self, handle: &ObjectHandle) -> Option<&mut NetworkObject> {
        self.get_mut_by_id(handle.id())
            .filter(|object| object.handle() == *handle)
    }

    pub fn get_by_id(&self, id: ObjectId) -> Option<&NetworkObject> {
        self.slots.get(id as usize).and_then(Option::as_ref)
    }

    pub fn get_mut_by_id(&mut self, id: ObjectId) -> Option<&mut NetworkObject> {
        self.slots.get_mut(id as usize).and_then(Option::as_mut)
    }

    pub fn objects(&self) -> impl Iterator<Item = &NetworkObject> {
        self.slots.iter().flatten()
    }

    pub fn objects_mut(&mut self) -> impl Iterator<Item = &mut NetworkObject> {
        self.slots.iter_mut().flatten()
    }

    pub fn contains(&self, handle: &ObjectHandle) -> bool {
        self.get(handle).is_some()
    }

    /// Adds an object under `handle`, or under the lowest free id when no
    /// handle is supplied
    pub(crate) fn insert(
        &mut self,
        handle: Option<ObjectHandle>,
        meta_data: Arc<TypeMetaData>,
        instance: Box<dyn Any + Send>,
    ) -> Result<ObjectHandle, ListError> {
        let handle = match handle {
            Some(handle) => self.claim(handle)?,
            None => self.allocate()?,
        };

        let index = handle.id() as usize;
        if self.slots.len() <= index {
            self.slots.resize_with(index + 1, || None);
        }
        self.serials[index] = handle.serial_number();
        self.slots[index] = Some(NetworkObject::new(handle, meta_data, instance));
        self.live_count += 1;

        trace!("list {} added object {}", self.name, handle);

        Ok(handle)
    }

    pub(crate) fn destroy(&mut self, handle: &ObjectHandle) -> Result<(), ListError> {
        let name = &self.name;
        let Some(object) = self
            .slots
            .get_mut(handle.id() as usize)
            .and_then(Option::as_mut)
            .filter(|object| object.handle() == *handle)
        else {
            return Err(ListError::ObjectNotFound {
                name: name.clone(),
                handle: *handle,
            });
        };
        if object.is_destroyed() {
            return Err(ListError::ObjectAlreadyDestroyed { handle: *handle });
        }
        object.mark_destroyed();

        trace!("list {} destroyed object {}", name, handle);

        Ok(())
    }

    /// Transmitter sweep: removes destroyed objects and clears change
    /// notifications once every destination has built its frame
    pub fn post_frames_created(&mut self) {
        self.remove_destroyed();
        for object in self.objects_mut() {
            object.clear_changes();
        }
    }

    /// Receiver sweep: removes objects destroyed by the applied frame
    pub fn post_frames_received(&mut self) {
        self.remove_destroyed();
    }

    fn remove_destroyed(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if !slot.as_ref().is_some_and(NetworkObject::is_destroyed) {
                continue;
            }
            *slot = None;
            self.serials[index] = self.serials[index].wrapping_add(1);
            self.live_count -= 1;
            if let Ok(id) = ObjectId::try_from(index) {
                self.free_ids.insert(id);
            }
        }
    }

    fn allocate(&mut self) -> Result<ObjectHandle, ListError> {
        let id = match self.free_ids.pop_first() {
            Some(id) => id,
            None => {
                if self.serials.len() >= MAX_SUPPORTED_OBJECTS {
                    return Err(ListError::TooManyObjects {
                        name: self.name.clone(),
                        max: MAX_SUPPORTED_OBJECTS,
                    });
                }
                let Ok(id) = ObjectId::try_from(self.serials.len()) else {
                    return Err(ListError::TooManyObjects {
                        name: self.name.clone(),
                        max: MAX_SUPPORTED_OBJECTS,
                    });
                };
                self.serials.push(0);
                id
            }
        };
        Ok(ObjectHandle::new(id, self.serials[id as usize]))
    }

    fn claim(&mut self, handle: ObjectHandle) -> Result<ObjectHandle, ListError> {
        if !handle.is_valid() {
            return Err(ListError::InvalidHandle { handle });
        }
        let index = handle.id() as usize;
        if index >= MAX_SUPPORTED_OBJECTS {
            return Err(ListError::TooManyObjects {
                name: self.name.clone(),
                max: MAX_SUPPORTED_OBJECTS,
            });
        }
        if self.get_by_id(handle.id()).is_some() {
            return Err(ListError::HandleInUse {
                name: self.name.clone(),
                handle,
            });
        }

        while self.serials.len() <= index {
            if let Ok(id) = ObjectId::try_from(self.serials.len()) {
                self.free_ids.insert(id);
            }
            self.serials.push(0);
        }
        self.free_ids.remove(&handle.id());

        Ok(handle)
    }
}
