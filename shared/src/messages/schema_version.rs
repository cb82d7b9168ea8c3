use netlist_serde::{BitReader, BitWrite, Serde, SerdeErr};

/// First handshake message. Both values must match on both hosts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SchemaVersion {
    /// Wire protocol version of the crate, `PROTOCOL_VERSION`
    pub protocol: u16,
    /// Host-defined version of the registered types and lists
    pub schema: u32,
}

impl Serde for SchemaVersion {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.protocol.ser(writer);
        self.schema.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            protocol: u16::de(reader)?,
            schema: u32::de(reader)?,
        })
    }
}
