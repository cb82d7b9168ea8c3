use std::{
    any::{type_name, Any},
    collections::HashMap,
    sync::Arc,
};

use log::{debug, info};

use super::{error::ListError, network_object_list::NetworkObjectList};
use crate::{
    error::ReplicationError,
    handle::ObjectHandle,
    messages::{ListMetaDataEntry, ListMetaDataList},
    registry::{RegistryError, TypeMetaData, TypeRegistry},
    types::{HostType, ListId},
};

/// Owns the lists of one host. List ids are assigned in creation order and
/// names are unique, so both hosts can agree on lists by name.
pub struct ListManager {
    host_type: HostType,
    registry: Arc<TypeRegistry>,
    lists: Vec<NetworkObjectList>,
    by_name: HashMap<String, ListId>,
}

impl ListManager {
    pub fn new(host_type: HostType, registry: Arc<TypeRegistry>) -> Self {
        Self {
            host_type,
            registry,
            lists: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    pub fn host_type(&self) -> HostType {
        self.host_type
    }

    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    pub fn create_list(&mut self, name: &str) -> Result<ListId, ListError> {
        if name.trim().is_empty() {
            return Err(ListError::BlankListName);
        }
        if self.by_name.contains_key(name) {
            return Err(ListError::DuplicateListName {
                name: name.to_string(),
            });
        }
        let Ok(list_id) = ListId::try_from(self.lists.len()) else {
            return Err(ListError::TooManyLists {
                max: ListId::MAX as usize,
            });
        };

        self.lists.push(NetworkObjectList::new(list_id, name.to_string()));
        self.by_name.insert(name.to_string(), list_id);

        debug!("{:?} created list {} with id {}", self.host_type, name, list_id);

        Ok(list_id)
    }

    pub fn find_list_by_name(&self, name: &str) -> Option<&NetworkObjectList> {
        self.by_name
            .get(name)
            .and_then(|list_id| self.list(*list_id))
    }

    pub fn list(&self, list_id: ListId) -> Option<&NetworkObjectList> {
        self.lists.get(list_id as usize)
    }

    pub fn list_mut(&mut self, list_id: ListId) -> Option<&mut NetworkObjectList> {
        self.lists.get_mut(list_id as usize)
    }

    pub fn try_list(&self, list_id: ListId) -> Result<&NetworkObjectList, ListError> {
        self.list(list_id).ok_or(ListError::UnknownListId { list_id })
    }

    pub fn try_list_mut(&mut self, list_id: ListId) -> Result<&mut NetworkObjectList, ListError> {
        self.list_mut(list_id).ok_or(ListError::UnknownListId { list_id })
    }

    pub fn lists(&self) -> impl Iterator<Item = &NetworkObjectList> {
        self.lists.iter()
    }

    pub fn lists_mut(&mut self) -> impl Iterator<Item = &mut NetworkObjectList> {
        self.lists.iter_mut()
    }

    pub fn list_count(&self) -> usize {
        self.lists.len()
    }

    /// Adds `instance` to a list. The type of `T` must be registered.
    pub fn create_object<T: Any + Send>(
        &mut self,
        list_id: ListId,
        instance: T,
        handle: Option<ObjectHandle>,
    ) -> Result<ObjectHandle, ReplicationError> {
        let Some(meta_data) = self.registry.find_by_type::<T>() else {
            return Err(RegistryError::UnregisteredType {
                type_name: type_name::<T>().to_string(),
            }
            .into());
        };
        let meta_data = Arc::clone(meta_data);
        let handle = self.create_dyn_object(list_id, handle, meta_data, Box::new(instance))?;
        Ok(handle)
    }

    pub fn create_dyn_object(
        &mut self,
        list_id: ListId,
        handle: Option<ObjectHandle>,
        meta_data: Arc<TypeMetaData>,
        instance: Box<dyn Any + Send>,
    ) -> Result<ObjectHandle, ListError> {
        self.try_list_mut(list_id)?
            .insert(handle, meta_data, instance)
    }

    /// Marks an object destroyed. It is removed by the next post-frame sweep.
    pub fn destroy_object(&mut self, list_id: ListId, handle: &ObjectHandle) -> Result<(), ListError> {
        self.try_list_mut(list_id)?.destroy(handle)
    }

    pub fn serialize_list_meta_data(&self) -> ListMetaDataList {
        ListMetaDataList {
            entries: self
                .lists
                .iter()
                .map(|list| ListMetaDataEntry {
                    list_id: list.id(),
                    name: list.name().to_string(),
                })
                .collect(),
        }
    }

    /// Creates the lists advertised by the transmitter, with the
    /// transmitter's ids. Only valid before any list exists.
    pub fn deserialize_list_meta_data(&mut self, meta_data: &ListMetaDataList) -> Result<(), ListError> {
        if !self.lists.is_empty() {
            return Err(ListError::ListsAlreadyCreated);
        }

        let mut entries: Vec<&ListMetaDataEntry> = meta_data.entries.iter().collect();
        entries.sort_by_key(|entry| entry.list_id);

        for pair in entries.windows(2) {
            if pair[0].list_id == pair[1].list_id {
                return Err(ListError::DuplicateListMetaData {
                    list_id: pair[1].list_id,
                    name: pair[1].name.clone(),
                });
            }
        }
        for (index, entry) in entries.iter().enumerate() {
            if entry.list_id as usize != index {
                return Err(ListError::UnknownListId {
                    list_id: entry.list_id,
                });
            }
        }

        for entry in entries {
            if let Err(error) = self.create_list(&entry.name) {
                self.lists.clear();
                self.by_name.clear();
                return Err(match error {
                    ListError::DuplicateListName { name } => ListError::DuplicateListMetaData {
                        list_id: entry.list_id,
                        name,
                    },
                    other => other,
                });
            }
        }

        info!("{:?} received {} lists", self.host_type, self.lists.len());

        Ok(())
    }

    pub fn post_frames_created(&mut self) {
        for list in &mut self.lists {
            list.post_frames_created();
        }
    }

    pub fn post_frames_received(&mut self) {
        for list in &mut self.lists {
            list.post_frames_received();
        }
    }
}
