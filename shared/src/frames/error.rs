use netlist_serde::SerdeErr;
use thiserror::Error;

use crate::{
    handle::ObjectHandle,
    types::{FrameSequence, ListId, NetTypeId, ObjectId},
};

/// Errors raised while decoding or applying frames.
///
/// All of these are protocol violations: the session that produced them
/// should be dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    /// A delta was encoded against a frame list or object update this host no longer has
    #[error("Delta update references frame {reference:?}, which is not in the history")]
    MissingReference { reference: Option<FrameSequence> },

    /// A frame names a list this host does not have
    #[error("Frame for unknown list {list_id}")]
    UnknownList { list_id: ListId },

    /// A destroy notice names an object this host does not have
    #[error("Object {object_id} in list {list_id} does not exist")]
    UnknownObject { list_id: ListId, object_id: ObjectId },

    /// An update names a live id with a different serial number
    #[error("Update for {received} conflicts with existing object {existing}")]
    SerialMismatch {
        existing: ObjectHandle,
        received: ObjectHandle,
    },

    /// An update changes the type of a live object
    #[error("Update for {handle} has type {received} but the object has type {existing}")]
    TypeMismatch {
        handle: ObjectHandle,
        existing: NetTypeId,
        received: NetTypeId,
    },

    /// One frame both destroys and updates the same object
    #[error("Object {object_id} in list {list_id} is both destroyed and updated in one frame")]
    DestroyedAndUpdated { list_id: ListId, object_id: ObjectId },

    /// A frame list was requested from a history that holds none
    #[error("Frame history is empty")]
    EmptyHistory,

    /// A message or update blob could not be decoded
    #[error("Malformed frame payload")]
    Malformed(#[from] SerdeErr),

    /// A message kind arrived that this host does not accept
    #[error("Unexpected message kind {kind}")]
    UnexpectedMessageKind { kind: u8 },

    /// An update uses a type id the type map cannot resolve
    #[error("Update uses unknown type id {type_id}")]
    UnknownTypeId { type_id: NetTypeId },
}
