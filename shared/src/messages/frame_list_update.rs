use netlist_serde::{BitReader, BitWrite, Serde, SerdeErr};

use super::{read_count, read_varint_u16, write_varint};
use crate::types::{FrameSequence, ListId, ObjectId};

/// One list's frame as it travels on the wire. Updates stay an opaque blob
/// until the receiver decodes them against its own history.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct FrameMessage {
    pub list_id: ListId,
    pub destroyed_object_ids: Vec<ObjectId>,
    pub updates: Vec<u8>,
}

impl Serde for FrameMessage {
    fn ser(&self, writer: &mut dyn BitWrite) {
        write_varint(u64::from(self.list_id), writer);
        write_varint(self.destroyed_object_ids.len() as u64, writer);
        for id in &self.destroyed_object_ids {
            write_varint(u64::from(*id), writer);
        }
        self.updates.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let list_id = read_varint_u16(reader)?;
        let count = read_count(reader)?;
        let mut destroyed_object_ids = Vec::with_capacity(count);
        for _ in 0..count {
            destroyed_object_ids.push(read_varint_u16(reader)?);
        }
        Ok(Self {
            list_id,
            destroyed_object_ids,
            updates: Vec::<u8>::de(reader)?,
        })
    }
}

/// All frames built for one destination in one tick
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct FrameListUpdate {
    pub sequence: FrameSequence,
    /// Sequence of the frame list deltas were encoded against
    pub reference: Option<FrameSequence>,
    pub frames: Vec<FrameMessage>,
}

impl Serde for FrameListUpdate {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.sequence.ser(writer);
        self.reference.ser(writer);
        write_varint(self.frames.len() as u64, writer);
        for frame in &self.frames {
            frame.ser(writer);
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let sequence = u16::de(reader)?;
        let reference = Option::<u16>::de(reader)?;
        let count = read_count(reader)?;
        let mut frames = Vec::with_capacity(count);
        for _ in 0..count {
            frames.push(FrameMessage::de(reader)?);
        }
        Ok(Self {
            sequence,
            reference,
            frames,
        })
    }
}
