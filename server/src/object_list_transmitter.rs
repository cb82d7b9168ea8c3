use std::{any::Any, collections::BTreeMap, sync::Arc};

use log::{debug, info};

use netlist_shared::{
    check_history_capacity, FrameError, FrameListUpdate, FrameSequence, HostType, ListError,
    ListId, ListManager, Message, NetworkObject, NetworkObjectList, ObjectHandle, PacketSender,
    ReplicationError, SchemaVersion, TypeRegistry, PROTOCOL_VERSION,
};

use crate::{
    frame_list_transmitter::FrameListTransmitter, server_config::ServerConfig,
    transmitter_key::TransmitterKey, transmitter_listener::TransmitterListener,
};

/// Owns the transmitting side of every network object list, and one
/// `FrameListTransmitter` per destination
pub struct ObjectListTransmitter {
    config: ServerConfig,
    lists: ListManager,
    transmitters: BTreeMap<TransmitterKey, FrameListTransmitter>,
    next_key: u64,
}

impl ObjectListTransmitter {
    pub fn new(registry: Arc<TypeRegistry>, config: ServerConfig) -> Result<Self, ReplicationError> {
        check_history_capacity(config.history_capacity)?;

        Ok(Self {
            config,
            lists: ListManager::new(HostType::Transmitter, registry),
            transmitters: BTreeMap::new(),
            next_key: 0,
        })
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<TypeRegistry> {
        self.lists.registry()
    }

    // Lists

    pub fn create_list(&mut self, name: &str) -> Result<ListId, ReplicationError> {
        Ok(self.lists.create_list(name)?)
    }

    pub fn find_list_by_name(&self, name: &str) -> Option<&NetworkObjectList> {
        self.lists.find_list_by_name(name)
    }

    pub fn list(&self, list_id: ListId) -> Option<&NetworkObjectList> {
        self.lists.list(list_id)
    }

    // Objects

    /// Adds `instance` to a list under a newly allocated handle
    pub fn create_object<T: Any + Send>(
        &mut self,
        list_id: ListId,
        instance: T,
    ) -> Result<ObjectHandle, ReplicationError> {
        self.lists.create_object(list_id, instance, None)
    }

    /// Adds `instance` to a list under a handle chosen by the host
    pub fn create_object_with_handle<T: Any + Send>(
        &mut self,
        list_id: ListId,
        handle: ObjectHandle,
        instance: T,
    ) -> Result<ObjectHandle, ReplicationError> {
        self.lists.create_object(list_id, instance, Some(handle))
    }

    /// Marks an object destroyed. Destinations that were sent the object
    /// receive a destroy notice in the next frame.
    pub fn destroy_object(
        &mut self,
        list_id: ListId,
        handle: &ObjectHandle,
    ) -> Result<(), ReplicationError> {
        Ok(self.lists.destroy_object(list_id, handle)?)
    }

    pub fn object(&self, list_id: ListId, handle: &ObjectHandle) -> Option<&NetworkObject> {
        self.lists.list(list_id)?.get(handle)
    }

    pub fn object_mut(&mut self, list_id: ListId, handle: &ObjectHandle) -> Option<&mut NetworkObject> {
        self.lists.list_mut(list_id)?.get_mut(handle)
    }

    pub fn try_object_mut(
        &mut self,
        list_id: ListId,
        handle: &ObjectHandle,
    ) -> Result<&mut NetworkObject, ReplicationError> {
        let list = self.lists.try_list_mut(list_id)?;
        let name = list.name().to_string();
        list.get_mut(handle).ok_or_else(|| {
            ListError::ObjectNotFound {
                name,
                handle: *handle,
            }
            .into()
        })
    }

    // Transmitters

    pub fn create_transmitter(&mut self, listener: Box<dyn TransmitterListener>) -> TransmitterKey {
        let key = TransmitterKey::new(self.next_key);
        self.next_key += 1;
        self.transmitters.insert(
            key,
            FrameListTransmitter::new(listener, self.config.history_capacity),
        );

        info!("created {}", key);

        key
    }

    pub fn destroy_transmitter(&mut self, key: &TransmitterKey) -> bool {
        let removed = self.transmitters.remove(key).is_some();
        if removed {
            info!("destroyed {}", key);
        }
        removed
    }

    pub fn transmitter(&self, key: &TransmitterKey) -> Option<&FrameListTransmitter> {
        self.transmitters.get(key)
    }

    pub fn transmitter_keys(&self) -> impl Iterator<Item = &TransmitterKey> {
        self.transmitters.keys()
    }

    // Frames

    /// Builds this tick's frame list for every destination, then sweeps
    /// destroyed objects and clears change notifications
    pub fn create_frames_for_transmitters(&mut self) -> Result<(), ReplicationError> {
        let reference_mode = self.config.reference_mode;
        for transmitter in self.transmitters.values_mut() {
            transmitter.create_frame_list(&self.lists, reference_mode)?;
        }
        self.lists.post_frames_created();

        debug!(
            "created frames for {} transmitters",
            self.transmitters.len()
        );

        Ok(())
    }

    /// Takes the frame list built for `key` by the last call to
    /// `create_frames_for_transmitters`
    pub fn serialize_current_frame_list(&mut self, key: &TransmitterKey) -> Option<FrameListUpdate> {
        self.transmitters.get_mut(key)?.take_current()
    }

    /// Same as `serialize_current_frame_list`, as message bytes
    pub fn write_current_frame_list(&mut self, key: &TransmitterKey) -> Option<Vec<u8>> {
        self.serialize_current_frame_list(key)
            .map(|update| Message::FrameListUpdate(update).to_bytes())
    }

    pub fn send_current_frame_lists<S: PacketSender<TransmitterKey>>(
        &mut self,
        sender: &S,
    ) -> Result<(), ReplicationError> {
        for (key, transmitter) in self.transmitters.iter_mut() {
            if let Some(update) = transmitter.take_current() {
                sender.send(key, &Message::FrameListUpdate(update).to_bytes())?;
            }
        }
        Ok(())
    }

    pub fn acknowledge(&mut self, key: &TransmitterKey, sequence: FrameSequence) {
        if let Some(transmitter) = self.transmitters.get_mut(key) {
            transmitter.acknowledge(sequence);
        }
    }

    /// Handles a message sent back by the receiver behind `key`
    pub fn receive(&mut self, key: &TransmitterKey, bytes: &[u8]) -> Result<(), ReplicationError> {
        match Message::from_bytes(bytes)? {
            Message::FrameAck(ack) => {
                self.acknowledge(key, ack.sequence);
                Ok(())
            }
            other => Err(FrameError::UnexpectedMessageKind {
                kind: other.kind().to_u8(),
            }
            .into()),
        }
    }

    // Handshake

    pub fn schema_version(&self) -> SchemaVersion {
        SchemaVersion {
            protocol: PROTOCOL_VERSION,
            schema: self.config.schema,
        }
    }

    /// Messages a receiver needs before the first frame list: the schema
    /// version, the list metadata, then the type metadata
    pub fn handshake_messages(&self) -> Vec<Message> {
        vec![
            Message::SchemaVersion(self.schema_version()),
            Message::ListMetaData(self.lists.serialize_list_meta_data()),
            Message::TypeMetaData(self.registry().serialize_type_meta_data()),
        ]
    }

    pub fn send_handshake<S: PacketSender<TransmitterKey>>(
        &self,
        key: &TransmitterKey,
        sender: &S,
    ) -> Result<(), ReplicationError> {
        for message in self.handshake_messages() {
            sender.send(key, &message.to_bytes())?;
        }
        Ok(())
    }
}
