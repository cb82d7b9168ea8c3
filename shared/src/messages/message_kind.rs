/// Discriminant written at the start of every message.
///
/// Values are part of the wire protocol: changing one requires bumping
/// `PROTOCOL_VERSION`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MessageKind {
    SchemaVersion = 0,
    ListMetaData = 1,
    TypeMetaData = 2,
    FrameListUpdate = 3,
    FrameAck = 4,
}

impl MessageKind {
    pub fn to_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for MessageKind {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(MessageKind::SchemaVersion),
            1 => Ok(MessageKind::ListMetaData),
            2 => Ok(MessageKind::TypeMetaData),
            3 => Ok(MessageKind::FrameListUpdate),
            4 => Ok(MessageKind::FrameAck),
            other => Err(other),
        }
    }
}
