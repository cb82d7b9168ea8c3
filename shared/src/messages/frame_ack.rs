use netlist_serde::{BitReader, BitWrite, Serde, SerdeErr};

use crate::types::FrameSequence;

/// Sent by a receiver once it has applied a frame list
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameAck {
    pub sequence: FrameSequence,
}

impl Serde for FrameAck {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.sequence.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            sequence: u16::de(reader)?,
        })
    }
}
