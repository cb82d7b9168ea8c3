use netlist_serde::{BitReader, BitWriter, Serde};

use super::{
    FrameAck, FrameListUpdate, ListMetaDataList, MessageKind, SchemaVersion, TypeMetaDataList,
};
use crate::frames::FrameError;

/// Every message exchanged between a transmitter and a receiver
#[derive(Clone, Debug, PartialEq)]
pub enum Message {
    SchemaVersion(SchemaVersion),
    ListMetaData(ListMetaDataList),
    TypeMetaData(TypeMetaDataList),
    FrameListUpdate(FrameListUpdate),
    FrameAck(FrameAck),
}

impl Message {
    pub fn kind(&self) -> MessageKind {
        match self {
            Message::SchemaVersion(_) => MessageKind::SchemaVersion,
            Message::ListMetaData(_) => MessageKind::ListMetaData,
            Message::TypeMetaData(_) => MessageKind::TypeMetaData,
            Message::FrameListUpdate(_) => MessageKind::FrameListUpdate,
            Message::FrameAck(_) => MessageKind::FrameAck,
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = BitWriter::new();
        self.kind().to_u8().ser(&mut writer);
        match self {
            Message::SchemaVersion(message) => message.ser(&mut writer),
            Message::ListMetaData(message) => message.ser(&mut writer),
            Message::TypeMetaData(message) => message.ser(&mut writer),
            Message::FrameListUpdate(message) => message.ser(&mut writer),
            Message::FrameAck(message) => message.ser(&mut writer),
        }
        writer.to_bytes()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FrameError> {
        let mut reader = BitReader::new(bytes);
        let kind = u8::de(&mut reader)?;
        let kind = MessageKind::try_from(kind)
            .map_err(|kind| FrameError::UnexpectedMessageKind { kind })?;

        let message = match kind {
            MessageKind::SchemaVersion => Message::SchemaVersion(SchemaVersion::de(&mut reader)?),
            MessageKind::ListMetaData => Message::ListMetaData(ListMetaDataList::de(&mut reader)?),
            MessageKind::TypeMetaData => Message::TypeMetaData(TypeMetaDataList::de(&mut reader)?),
            MessageKind::FrameListUpdate => {
                Message::FrameListUpdate(FrameListUpdate::de(&mut reader)?)
            }
            MessageKind::FrameAck => Message::FrameAck(FrameAck::de(&mut reader)?),
        };
        Ok(message)
    }
}
