//! # Netlist Shared
//! Common functionality shared between netlist-server & netlist-client crates:
//! object handles, the type registry and converters, network object lists,
//! frames and their history, wire messages and the transport contract.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub use netlist_serde::{
    BitReader, BitWrite, BitWriter, NumberCoding, Serde, SerdeErr, SignedVariableInteger,
    UnsignedVariableInteger,
};

mod constants;
mod error;
mod handle;
mod types;
mod wrapping_number;

pub mod converters;
pub mod frames;
pub mod lists;
pub mod messages;
pub mod registry;
pub mod transport;

pub use constants::{
    DEFAULT_HISTORY_CAPACITY, INVALID_ID, MAX_SUPPORTED_OBJECTS, MIN_HISTORY_CAPACITY,
    PROTOCOL_VERSION,
};
pub use converters::{
    BitOptions, BoolConverter, DoubleConverter, FloatConverter, HandleConverter, IntegerConverter,
    ListConverter, NetInteger, NetValue, QuantizedDoubleConverter, QuantizedFloatConverter,
    Snapshot, StringConverter, TypeConverter, Value, Vector2Converter, Vector3Converter,
};
pub use error::{ErrorKind, ReplicationError};
pub use frames::{Frame, FrameError, FrameHistory, FrameList, ObjectUpdate};
pub use handle::ObjectHandle;
pub use lists::{ChangeMask, ListError, ListManager, NetworkObject, NetworkObjectList};
pub use messages::{
    FrameAck, FrameListUpdate, FrameMessage, ListMetaDataList, Message, MessageKind,
    SchemaVersion, TypeMetaDataList,
};
pub use registry::{
    Member, RegistryError, RemoteTypeMap, TypeMetaData, TypeMetaDataBuilder, TypeRegistry,
    TypeRegistryBuilder,
};
pub use transport::{error::TransportError, PacketReceiver, PacketSender};
pub use types::{FrameSequence, HostType, ListId, NetTypeId, ObjectId};
pub use wrapping_number::{sequence_distance, sequence_greater_than, sequence_less_than};

/// Checks a configured frame history capacity
pub fn check_history_capacity(capacity: usize) -> Result<(), ReplicationError> {
    if capacity < MIN_HISTORY_CAPACITY {
        return Err(ReplicationError::HistoryCapacity {
            capacity,
            minimum: MIN_HISTORY_CAPACITY,
        });
    }
    Ok(())
}

/// Compares a received `SchemaVersion` against this host's
pub fn check_schema_version(local: &SchemaVersion, remote: &SchemaVersion) -> Result<(), ReplicationError> {
    if local != remote {
        return Err(ReplicationError::VersionMismatch {
            local_protocol: local.protocol,
            local_schema: local.schema,
            remote_protocol: remote.protocol,
            remote_schema: remote.schema,
        });
    }
    Ok(())
}
