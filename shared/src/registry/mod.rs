mod builder;
mod error;
mod member;
mod type_meta_data;
mod type_registry;

pub use builder::{TypeMetaDataBuilder, TypeRegistryBuilder};
pub use error::RegistryError;
pub use member::Member;
pub use type_meta_data::TypeMetaData;
pub use type_registry::{RemoteTypeMap, TypeRegistry};
