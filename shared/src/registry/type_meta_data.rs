use std::{
    any::{Any, TypeId},
    fmt,
    sync::Arc,
};

use super::{error::RegistryError, member::Member};
use crate::{converters::Snapshot, types::NetTypeId};

pub(crate) type Factory = Arc<dyn Fn() -> Box<dyn Any + Send> + Send + Sync>;

/// Schema of one networkable type.
///
/// Member order is fixed at registration and is the implicit wire schema:
/// no member names are ever sent.
pub struct TypeMetaData {
    type_id: NetTypeId,
    name: String,
    maps_from: Option<String>,
    rust_type: TypeId,
    members: Vec<Member>,
    change_notification_count: usize,
    factory: Option<Factory>,
}

impl TypeMetaData {
    pub(crate) fn new(
        type_id: NetTypeId,
        name: String,
        maps_from: Option<String>,
        rust_type: TypeId,
        members: Vec<Member>,
        change_notification_count: usize,
        factory: Option<Factory>,
    ) -> Self {
        Self {
            type_id,
            name,
            maps_from,
            rust_type,
            members,
            change_notification_count,
            factory,
        }
    }

    pub fn net_type_id(&self) -> NetTypeId {
        self.type_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the transmitter-side type this type receives, if it differs
    pub fn maps_from(&self) -> Option<&str> {
        self.maps_from.as_deref()
    }

    pub fn rust_type(&self) -> TypeId {
        self.rust_type
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn change_notification_count(&self) -> usize {
        self.change_notification_count
    }

    pub fn find_member(&self, name: &str) -> Option<(usize, &Member)> {
        self.members
            .iter()
            .enumerate()
            .find(|(_, member)| member.name() == name)
    }

    pub fn has_factory(&self) -> bool {
        self.factory.is_some()
    }

    pub fn create_instance(&self) -> Result<Box<dyn Any + Send>, RegistryError> {
        let Some(factory) = &self.factory else {
            return Err(RegistryError::MissingFactory {
                type_name: self.name.clone(),
            });
        };
        Ok(factory())
    }

    /// Every member at its converter default. Full updates are encoded against this.
    pub fn default_snapshot(&self) -> Snapshot {
        self.members
            .iter()
            .map(|member| member.converter().default_value())
            .collect()
    }
}

impl fmt::Debug for TypeMetaData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeMetaData")
            .field("type_id", &self.type_id)
            .field("name", &self.name)
            .field("maps_from", &self.maps_from)
            .field("members", &self.members)
            .finish()
    }
}
