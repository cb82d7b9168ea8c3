use std::{
    any::{Any, TypeId},
    collections::HashMap,
    sync::Arc,
};

use log::info;

use super::{error::RegistryError, type_meta_data::TypeMetaData};
use crate::{
    messages::{TypeMetaDataEntry, TypeMetaDataList},
    types::NetTypeId,
};

/// Immutable set of registered networkable types, shared by every
/// transmitter and receiver through an `Arc`.
pub struct TypeRegistry {
    types: Vec<Arc<TypeMetaData>>,
    by_rust_type: HashMap<TypeId, NetTypeId>,
    by_name: HashMap<String, NetTypeId>,
    by_maps_from: HashMap<String, NetTypeId>,
}

impl TypeRegistry {
    pub(crate) fn new(
        types: Vec<Arc<TypeMetaData>>,
        by_rust_type: HashMap<TypeId, NetTypeId>,
        by_name: HashMap<String, NetTypeId>,
        by_maps_from: HashMap<String, NetTypeId>,
    ) -> Self {
        Self {
            types,
            by_rust_type,
            by_name,
            by_maps_from,
        }
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<TypeMetaData>> {
        self.types.iter()
    }

    pub fn find_by_id(&self, type_id: NetTypeId) -> Option<&Arc<TypeMetaData>> {
        self.types.get(type_id as usize)
    }

    pub fn try_find_by_id(&self, type_id: NetTypeId) -> Result<&Arc<TypeMetaData>, RegistryError> {
        self.find_by_id(type_id)
            .ok_or(RegistryError::UnknownTypeId { type_id })
    }

    pub fn find_by_type<T: Any>(&self) -> Option<&Arc<TypeMetaData>> {
        self.find_by_rust_type(TypeId::of::<T>())
    }

    pub fn find_by_rust_type(&self, rust_type: TypeId) -> Option<&Arc<TypeMetaData>> {
        self.by_rust_type
            .get(&rust_type)
            .and_then(|type_id| self.find_by_id(*type_id))
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Arc<TypeMetaData>> {
        self.by_name
            .get(name)
            .and_then(|type_id| self.find_by_id(*type_id))
    }

    /// Describes every registered type for the type metadata handshake
    pub fn serialize_type_meta_data(&self) -> TypeMetaDataList {
        TypeMetaDataList {
            entries: self
                .types
                .iter()
                .map(|meta_data| TypeMetaDataEntry {
                    type_id: meta_data.net_type_id(),
                    type_name: meta_data.name().to_string(),
                    member_count: meta_data.member_count() as u32,
                })
                .collect(),
        }
    }

    /// Maps every advertised transmitter type to a local type, first by a
    /// local type's `maps_from` name, then by its own name.
    pub fn map_transmitter_types(
        &self,
        list: &TypeMetaDataList,
    ) -> Result<RemoteTypeMap, RegistryError> {
        let mut by_remote_id = HashMap::with_capacity(list.entries.len());

        for entry in &list.entries {
            let local_id = self
                .by_maps_from
                .get(&entry.type_name)
                .or_else(|| self.by_name.get(&entry.type_name));
            let Some(meta_data) = local_id.and_then(|type_id| self.find_by_id(*type_id)) else {
                return Err(RegistryError::UnmappedTransmitterType {
                    type_name: entry.type_name.clone(),
                });
            };
            if meta_data.member_count() != entry.member_count as usize {
                return Err(RegistryError::MemberCountMismatch {
                    type_name: entry.type_name.clone(),
                    expected: meta_data.member_count(),
                    actual: entry.member_count as usize,
                });
            }
            by_remote_id.insert(entry.type_id, meta_data.clone());
        }

        info!("mapped {} transmitter types", by_remote_id.len());

        Ok(RemoteTypeMap { by_remote_id })
    }

    /// Transmitter type ids are local type ids: both sides registered the
    /// same types in the same order
    pub fn identity_map(&self) -> RemoteTypeMap {
        RemoteTypeMap {
            by_remote_id: self
                .types
                .iter()
                .map(|meta_data| (meta_data.net_type_id(), meta_data.clone()))
                .collect(),
        }
    }
}

/// Resolves type ids written by a transmitter to local type metadata
#[derive(Clone, Default)]
pub struct RemoteTypeMap {
    by_remote_id: HashMap<NetTypeId, Arc<TypeMetaData>>,
}

impl RemoteTypeMap {
    pub fn find(&self, remote_id: NetTypeId) -> Result<&Arc<TypeMetaData>, RegistryError> {
        self.by_remote_id
            .get(&remote_id)
            .ok_or(RegistryError::UnknownTypeId { type_id: remote_id })
    }

    pub fn len(&self) -> usize {
        self.by_remote_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_remote_id.is_empty()
    }
}
