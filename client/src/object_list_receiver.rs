use std::sync::Arc;

use log::{debug, info, trace};

use netlist_shared::{
    check_history_capacity, check_schema_version, Frame, FrameAck, FrameError, FrameHistory,
    FrameList, FrameListUpdate, HostType, ListError, ListId, ListManager, ListMetaDataList,
    Message, MessageKind, NetworkObject, NetworkObjectList, ObjectHandle, ObjectUpdate, RemoteTypeMap,
    ReplicationError, SchemaVersion, TypeMetaDataList, TypeRegistry, PROTOCOL_VERSION,
};

use crate::{client_config::ClientConfig, receiver_listener::ReceiverListener};

/// Owns the receiving side of every network object list: deserializes
/// frame lists against its own history and applies them to the objects.
pub struct ObjectListReceiver {
    config: ClientConfig,
    lists: ListManager,
    listener: Box<dyn ReceiverListener>,
    history: FrameHistory,
    types: RemoteTypeMap,
}

impl ObjectListReceiver {
    pub fn new(
        registry: Arc<TypeRegistry>,
        config: ClientConfig,
        listener: Box<dyn ReceiverListener>,
    ) -> Result<Self, ReplicationError> {
        check_history_capacity(config.history_capacity)?;

        Ok(Self {
            history: FrameHistory::new(config.history_capacity),
            types: registry.identity_map(),
            lists: ListManager::new(HostType::Receiver, registry),
            listener,
            config,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<TypeRegistry> {
        self.lists.registry()
    }

    pub fn history(&self) -> &FrameHistory {
        &self.history
    }

    pub fn listener(&self) -> &dyn ReceiverListener {
        self.listener.as_ref()
    }

    // Handshake

    pub fn schema_version(&self) -> SchemaVersion {
        SchemaVersion {
            protocol: PROTOCOL_VERSION,
            schema: self.config.schema,
        }
    }

    pub fn check_schema_version(&self, remote: &SchemaVersion) -> Result<(), ReplicationError> {
        check_schema_version(&self.schema_version(), remote)
    }

    /// Creates every list the transmitter advertised
    pub fn deserialize_list_meta_data(
        &mut self,
        meta_data: &ListMetaDataList,
    ) -> Result<(), ReplicationError> {
        Ok(self.lists.deserialize_list_meta_data(meta_data)?)
    }

    /// Maps transmitter type ids onto local types. Without this the
    /// transmitter's ids are used as local ids.
    pub fn deserialize_type_meta_data(
        &mut self,
        meta_data: &TypeMetaDataList,
    ) -> Result<(), ReplicationError> {
        self.types = self.lists.registry().map_transmitter_types(meta_data)?;
        Ok(())
    }

    // Lists

    /// Looks up a list the transmitter advertised
    pub fn bind_list(&self, name: &str) -> Result<ListId, ReplicationError> {
        match self.lists.find_list_by_name(name) {
            Some(list) => Ok(list.id()),
            None => Err(ListError::UnknownListName {
                name: name.to_string(),
            }
            .into()),
        }
    }

    pub fn list(&self, list_id: ListId) -> Option<&NetworkObjectList> {
        self.lists.list(list_id)
    }

    pub fn find_list_by_name(&self, name: &str) -> Option<&NetworkObjectList> {
        self.lists.find_list_by_name(name)
    }

    pub fn object(&self, list_id: ListId, handle: &ObjectHandle) -> Option<&NetworkObject> {
        self.lists.list(list_id)?.get(handle)
    }

    // Frames

    /// Decodes a frame list against the frame list named in its header and
    /// stores it as the current frame list
    pub fn deserialize_frame_list(
        &mut self,
        update: &FrameListUpdate,
    ) -> Result<FrameAck, ReplicationError> {
        if let Some(message) = update
            .frames
            .iter()
            .find(|message| self.lists.list(message.list_id).is_none())
        {
            return Err(FrameError::UnknownList {
                list_id: message.list_id,
            }
            .into());
        }

        let reference = update
            .reference
            .and_then(|sequence| self.history.get(sequence));
        let frame_list = FrameList::from_message(update, &self.types, reference)?;

        debug!(
            "received frame list {} against {:?} with {} frames",
            frame_list.sequence(),
            frame_list.reference(),
            frame_list.frames().len()
        );

        self.history.push(frame_list);

        Ok(FrameAck {
            sequence: update.sequence,
        })
    }

    /// Applies the most recently deserialized frame list to the objects.
    /// Destroyed objects are swept once every frame has been applied.
    pub fn apply_current_frame(&mut self) -> Result<(), ReplicationError> {
        let frame_list = self.history.try_latest()?;

        for frame in frame_list.frames() {
            apply_frame(&mut self.lists, self.listener.as_mut(), frame)?;
        }
        self.lists.post_frames_received();

        Ok(())
    }

    /// Handles one message from the transmitter. Applying a frame list
    /// produces the acknowledgement to send back.
    pub fn receive(&mut self, bytes: &[u8]) -> Result<Option<Vec<u8>>, ReplicationError> {
        match Message::from_bytes(bytes)? {
            Message::SchemaVersion(version) => {
                self.check_schema_version(&version)?;
                info!("schema version {} verified", version.schema);
                Ok(None)
            }
            Message::ListMetaData(meta_data) => {
                self.deserialize_list_meta_data(&meta_data)?;
                Ok(None)
            }
            Message::TypeMetaData(meta_data) => {
                self.deserialize_type_meta_data(&meta_data)?;
                Ok(None)
            }
            Message::FrameListUpdate(update) => {
                let ack = self.deserialize_frame_list(&update)?;
                self.apply_current_frame()?;
                Ok(Some(Message::FrameAck(ack).to_bytes()))
            }
            Message::FrameAck(_) => Err(FrameError::UnexpectedMessageKind {
                kind: MessageKind::FrameAck.to_u8(),
            }
            .into()),
        }
    }
}

fn apply_frame(
    lists: &mut ListManager,
    listener: &mut dyn ReceiverListener,
    frame: &Frame,
) -> Result<(), ReplicationError> {
    let list_id = frame.list_id();
    let unknown_list = || FrameError::UnknownList { list_id };

    listener.on_begin_process_list(lists.list(list_id).ok_or_else(unknown_list)?);

    for object_id in frame.destroyed_object_ids() {
        let list = lists.list(list_id).ok_or_else(unknown_list)?;
        let Some(object) = list.get_by_id(*object_id) else {
            return Err(FrameError::UnknownObject {
                list_id,
                object_id: *object_id,
            }
            .into());
        };
        let handle = object.handle();
        listener.on_object_destroyed(list, object);
        lists.destroy_object(list_id, &handle)?;

        trace!("list {} destroyed object {}", list_id, handle);
    }

    for update in frame.updates() {
        apply_update(lists, listener, list_id, update)?;
    }

    listener.on_end_process_list(lists.list(list_id).ok_or_else(unknown_list)?);

    Ok(())
}

fn apply_update(
    lists: &mut ListManager,
    listener: &mut dyn ReceiverListener,
    list_id: ListId,
    update: &ObjectUpdate,
) -> Result<(), ReplicationError> {
    let unknown_list = || FrameError::UnknownList { list_id };
    let handle = update.handle();

    let existing = lists
        .list(list_id)
        .ok_or_else(unknown_list)?
        .get_by_id(handle.id())
        .map(|object| (object.handle(), object.net_type_id()));

    match existing {
        Some((existing, _)) if existing != handle => {
            return Err(FrameError::SerialMismatch {
                existing,
                received: handle,
            }
            .into());
        }
        Some((_, type_id)) if type_id != update.net_type_id() => {
            return Err(FrameError::TypeMismatch {
                handle,
                existing: type_id,
                received: update.net_type_id(),
            }
            .into());
        }
        Some(_) => {}
        None => {
            let instance = update.meta_data().create_instance()?;
            lists.create_dyn_object(
                list_id,
                Some(handle),
                Arc::clone(update.meta_data()),
                instance,
            )?;
            let list = lists.list(list_id).ok_or_else(unknown_list)?;
            if let Some(object) = list.get(&handle) {
                listener.on_object_created(list, object);
            }

            trace!("list {} created object {}", list_id, handle);
        }
    }

    {
        let list = lists.list(list_id).ok_or_else(unknown_list)?;
        if let Some(object) = list.get(&handle) {
            listener.on_begin_update(list, object);
        }
    }

    lists
        .list_mut(list_id)
        .and_then(|list| list.get_mut(&handle))
        .ok_or_else(unknown_list)?
        .apply_snapshot(update.snapshot())?;

    let list = lists.list(list_id).ok_or_else(unknown_list)?;
    if let Some(object) = list.get(&handle) {
        listener.on_end_update(list, object);
    }

    Ok(())
}
