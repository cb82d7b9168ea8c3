use netlist_serde::{BitReader, BitWrite, Serde, SerdeErr};

use super::{read_count, read_varint_u16, read_varint_u32, write_varint};
use crate::types::NetTypeId;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeMetaDataEntry {
    pub type_id: NetTypeId,
    pub type_name: String,
    pub member_count: u32,
}

/// Every type the transmitter registered, so the receiver can map
/// transmitter type ids onto its own types
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct TypeMetaDataList {
    pub entries: Vec<TypeMetaDataEntry>,
}

impl Serde for TypeMetaDataList {
    fn ser(&self, writer: &mut dyn BitWrite) {
        write_varint(self.entries.len() as u64, writer);
        for entry in &self.entries {
            write_varint(u64::from(entry.type_id), writer);
            entry.type_name.ser(writer);
            write_varint(u64::from(entry.member_count), writer);
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let count = read_count(reader)?;
        let mut entries = Vec::with_capacity(count);
        for _ in 0..count {
            entries.push(TypeMetaDataEntry {
                type_id: read_varint_u16(reader)?,
                type_name: String::de(reader)?,
                member_count: read_varint_u32(reader)?,
            });
        }
        Ok(Self { entries })
    }
}
