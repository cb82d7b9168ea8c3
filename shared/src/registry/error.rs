use thiserror::Error;

use crate::types::NetTypeId;

/// Errors raised while building or consulting the type registry.
///
/// All of these describe schema drift or misuse at setup time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The same Rust type was registered twice
    #[error("Type {type_name} is already registered")]
    DuplicateType { type_name: String },

    /// Two registered types share a network name
    #[error("A type named {type_name} is already registered")]
    DuplicateTypeName { type_name: String },

    /// A member name was added twice to one type
    #[error("Type {type_name} already has a member named {member}")]
    DuplicateMember { type_name: String, member: String },

    /// No member with the given name exists on the type
    #[error("No such member {member} in type {type_name}")]
    UnknownMember { type_name: String, member: String },

    /// Change notification was requested for a member that does not use it
    #[error("Member {member} in type {type_name} does not use change notifications")]
    MemberWithoutNotification { type_name: String, member: String },

    /// `notify_on_change` was called before any member was added
    #[error("Type {type_name} has no member to mark for change notification")]
    NoMemberToNotify { type_name: String },

    /// An instance had to be created but the type has no factory
    #[error("Type {type_name} has no factory and cannot be created on reception")]
    MissingFactory { type_name: String },

    /// Two local types claim to map from the same transmitter type
    #[error("Type {type_name} maps from {maps_from}, which is already mapped by {existing}")]
    MapsFromConflict {
        type_name: String,
        maps_from: String,
        existing: String,
    },

    /// The transmitter advertised a type that nothing local maps to
    #[error("Transmitter type {type_name} has no local counterpart")]
    UnmappedTransmitterType { type_name: String },

    /// Local and transmitter schemas disagree on the number of members
    #[error("Type {type_name} has {expected} members locally but the transmitter sent {actual}")]
    MemberCountMismatch {
        type_name: String,
        expected: usize,
        actual: usize,
    },

    /// A type id was used that was never registered or advertised
    #[error("No type with id {type_id}")]
    UnknownTypeId { type_id: NetTypeId },

    /// A snapshot does not have one value per member
    #[error("Snapshot for type {type_name} has the wrong size (got {actual}, expected {expected})")]
    SnapshotSizeMismatch {
        type_name: String,
        expected: usize,
        actual: usize,
    },

    /// A member value does not have the shape its converter or field expects
    #[error("Member {member} in type {type_name} cannot hold a {found} value")]
    ValueTypeMismatch {
        type_name: String,
        member: String,
        found: &'static str,
    },

    /// An instance of a type that was never registered was handed to a list
    #[error("Type {type_name} has not been registered to be networked")]
    UnregisteredType { type_name: String },

    /// More types were registered than a type id can address
    #[error("Cannot register more than {max} types")]
    TooManyTypes { max: usize },
}
