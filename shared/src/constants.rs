use crate::types::ObjectId;

/// Version of the wire protocol spoken by this crate. Sent in the
/// `SchemaVersion` handshake message and compared by the receiver.
pub const PROTOCOL_VERSION: u16 = 1;

/// Frame history kept per destination and per receiver unless configured otherwise
pub const DEFAULT_HISTORY_CAPACITY: usize = 8;
/// A delta needs the frame being built plus at least one reference
pub const MIN_HISTORY_CAPACITY: usize = 2;

/// Stored handle index meaning "no object"
pub const INVALID_ID: ObjectId = ObjectId::MAX;
/// Maximum number of live objects in a single list
pub const MAX_SUPPORTED_OBJECTS: usize = (ObjectId::MAX - 1) as usize;
