use netlist_serde::{BitReader, BitWrite, Serde, SerdeErr};

use super::{read_count, read_varint_u16, write_varint};
use crate::types::ListId;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListMetaDataEntry {
    pub list_id: ListId,
    pub name: String,
}

/// Every list the transmitter created, sent before any frame
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ListMetaDataList {
    pub entries: Vec<ListMetaDataEntry>,
}

impl Serde for ListMetaDataList {
    fn ser(&self, writer: &mut dyn BitWrite) {
        write_varint(self.entries.len() as u64, writer);
        for entry in &self.entries {
            write_varint(u64::from(entry.list_id), writer);
            entry.name.ser(writer);
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let count = read_count(reader)?;
        let mut entries = Vec::with_capacity(count);
        for _ in 0..count {
            entries.push(ListMetaDataEntry {
                list_id: read_varint_u16(reader)?,
                name: String::de(reader)?,
            });
        }
        Ok(Self { entries })
    }
}
