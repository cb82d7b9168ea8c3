use thiserror::Error;

use crate::{handle::ObjectHandle, types::ListId};

/// Errors raised by list and object bookkeeping
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListError {
    /// List names identify lists across hosts and cannot be empty
    #[error("List names must not be blank")]
    BlankListName,

    /// Another list already uses this name
    #[error("A list named {name} already exists")]
    DuplicateListName { name: String },

    /// Every list id is in use
    #[error("Cannot create more than {max} lists")]
    TooManyLists { max: usize },

    /// No list with the given name exists, or it was never advertised
    #[error("No list named {name}")]
    UnknownListName { name: String },

    /// No list with the given id exists
    #[error("No list with id {list_id}")]
    UnknownListId { list_id: ListId },

    /// List metadata can only be received before any list is created
    #[error("Lists have already been created")]
    ListsAlreadyCreated,

    /// The same list id or name appeared twice in list metadata
    #[error("List metadata contains {name} with id {list_id} more than once")]
    DuplicateListMetaData { list_id: ListId, name: String },

    /// Every object id in the list is in use
    #[error("List {name} cannot hold more than {max} objects")]
    TooManyObjects { name: String, max: usize },

    /// The handle does not address any object slot
    #[error("Handle {handle} is not valid")]
    InvalidHandle { handle: ObjectHandle },

    /// A caller-supplied handle points at an occupied slot
    #[error("Handle {handle} is already in use in list {name}")]
    HandleInUse { name: String, handle: ObjectHandle },

    /// The object was destroyed earlier and is awaiting the post-frame sweep
    #[error("Object {handle} has already been destroyed")]
    ObjectAlreadyDestroyed { handle: ObjectHandle },

    /// No live object matches the handle
    #[error("No object with handle {handle} in list {name}")]
    ObjectNotFound { name: String, handle: ObjectHandle },
}
