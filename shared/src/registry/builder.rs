use std::{
    any::{type_name, Any, TypeId},
    collections::HashMap,
    marker::PhantomData,
    sync::Arc,
};

use log::debug;

use super::{
    error::RegistryError,
    member::Member,
    type_meta_data::{Factory, TypeMetaData},
    type_registry::TypeRegistry,
};
use crate::{
    converters::{NetValue, TypeConverter, Value},
    types::NetTypeId,
};

/// Collects type registrations. Type ids are assigned in registration
/// order, so transmitter and receiver must register in the same order
/// unless they exchange type metadata.
#[derive(Default)]
pub struct TypeRegistryBuilder {
    types: Vec<Arc<TypeMetaData>>,
    by_rust_type: HashMap<TypeId, NetTypeId>,
    by_name: HashMap<String, NetTypeId>,
    by_maps_from: HashMap<String, NetTypeId>,
}

impl TypeRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<T: Any + Send>(&mut self) -> TypeMetaDataBuilder<'_, T> {
        TypeMetaDataBuilder::new(self)
    }

    pub fn build(self) -> TypeRegistry {
        TypeRegistry::new(self.types, self.by_rust_type, self.by_name, self.by_maps_from)
    }

    fn insert(&mut self, meta_data: PendingType) -> Result<NetTypeId, RegistryError> {
        if self.by_rust_type.contains_key(&meta_data.rust_type) {
            return Err(RegistryError::DuplicateType {
                type_name: meta_data.rust_type_name.to_string(),
            });
        }
        if self.by_name.contains_key(&meta_data.name) {
            return Err(RegistryError::DuplicateTypeName {
                type_name: meta_data.name,
            });
        }
        if let Some(maps_from) = &meta_data.maps_from {
            if let Some(existing) = self.by_maps_from.get(maps_from) {
                return Err(RegistryError::MapsFromConflict {
                    type_name: meta_data.name,
                    maps_from: maps_from.clone(),
                    existing: self.types[*existing as usize].name().to_string(),
                });
            }
        }
        let Ok(type_id) = NetTypeId::try_from(self.types.len()) else {
            return Err(RegistryError::TooManyTypes {
                max: NetTypeId::MAX as usize,
            });
        };

        debug!(
            "registered type {} with id {} and {} members",
            meta_data.name,
            type_id,
            meta_data.members.len()
        );

        self.by_rust_type.insert(meta_data.rust_type, type_id);
        self.by_name.insert(meta_data.name.clone(), type_id);
        if let Some(maps_from) = &meta_data.maps_from {
            self.by_maps_from.insert(maps_from.clone(), type_id);
        }
        self.types.push(Arc::new(TypeMetaData::new(
            type_id,
            meta_data.name,
            meta_data.maps_from,
            meta_data.rust_type,
            meta_data.members,
            meta_data.change_notification_count,
            meta_data.factory,
        )));

        Ok(type_id)
    }
}

struct PendingType {
    name: String,
    rust_type_name: &'static str,
    maps_from: Option<String>,
    rust_type: TypeId,
    members: Vec<Member>,
    change_notification_count: usize,
    factory: Option<Factory>,
}

/// Describes the networked members of `T`.
///
/// Errors are collected while chaining and reported by `build`.
pub struct TypeMetaDataBuilder<'r, T: Any + Send> {
    registry: &'r mut TypeRegistryBuilder,
    pending: PendingType,
    error: Option<RegistryError>,
    phantom_t: PhantomData<fn() -> T>,
}

impl<'r, T: Any + Send> TypeMetaDataBuilder<'r, T> {
    fn new(registry: &'r mut TypeRegistryBuilder) -> Self {
        Self {
            registry,
            pending: PendingType {
                name: type_name::<T>().to_string(),
                rust_type_name: type_name::<T>(),
                maps_from: None,
                rust_type: TypeId::of::<T>(),
                members: Vec::new(),
                change_notification_count: 0,
                factory: None,
            },
            error: None,
            phantom_t: PhantomData,
        }
    }

    /// Adds a networked member, read through `get` and written through `get_mut`
    pub fn field<F, C, G, M>(mut self, name: &str, converter: C, get: G, get_mut: M) -> Self
    where
        F: NetValue + 'static,
        C: TypeConverter + 'static,
        G: Fn(&T) -> &F + Send + Sync + 'static,
        M: Fn(&mut T) -> &mut F + Send + Sync + 'static,
    {
        if self.error.is_some() {
            return self;
        }
        if self.pending.members.iter().any(|member| member.name() == name) {
            self.error = Some(RegistryError::DuplicateMember {
                type_name: self.pending.name.clone(),
                member: name.to_string(),
            });
            return self;
        }

        let getter = Arc::new(move |instance: &dyn Any| {
            instance
                .downcast_ref::<T>()
                .map(|instance| get(instance).to_value())
        });
        let setter = Arc::new(move |instance: &mut dyn Any, value: &Value| {
            let (Some(instance), Some(value)) = (instance.downcast_mut::<T>(), F::from_value(value))
            else {
                return false;
            };
            *get_mut(instance) = value;
            true
        });

        self.pending.members.push(Member::new(
            name.to_string(),
            Arc::new(converter),
            getter,
            setter,
        ));
        self
    }

    /// The most recently added member is only diffed after
    /// `NetworkObject::on_change` has been called for it
    pub fn notify_on_change(mut self) -> Self {
        if self.error.is_some() {
            return self;
        }
        let index = self.pending.change_notification_count;
        let Some(member) = self.pending.members.last_mut() else {
            self.error = Some(RegistryError::NoMemberToNotify {
                type_name: self.pending.name.clone(),
            });
            return self;
        };
        if member.change_notification_index().is_none() {
            member.set_change_notification_index(index);
            self.pending.change_notification_count += 1;
        }
        self
    }

    /// Name sent in type metadata. Defaults to `std::any::type_name::<T>()`.
    pub fn with_name(mut self, name: &str) -> Self {
        self.pending.name = name.to_string();
        self
    }

    /// Receive updates for the transmitter type named `name` into `T`
    pub fn maps_from(mut self, name: &str) -> Self {
        self.pending.maps_from = Some(name.to_string());
        self
    }

    pub fn with_factory<Fa>(mut self, factory: Fa) -> Self
    where
        Fa: Fn() -> T + Send + Sync + 'static,
    {
        self.pending.factory = Some(Arc::new(move || Box::new(factory()) as Box<dyn Any + Send>));
        self
    }

    pub fn with_default_factory(self) -> Self
    where
        T: Default,
    {
        self.with_factory(T::default)
    }

    pub fn build(self) -> Result<NetTypeId, RegistryError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        self.registry.insert(self.pending)
    }
}
