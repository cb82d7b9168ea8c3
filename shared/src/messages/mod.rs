mod frame_ack;
mod frame_list_update;
mod list_meta_data;
mod message;
mod message_kind;
mod schema_version;
mod type_meta_data;

pub use frame_ack::FrameAck;
pub use frame_list_update::{FrameListUpdate, FrameMessage};
pub use list_meta_data::{ListMetaDataEntry, ListMetaDataList};
pub use message::Message;
pub use message_kind::MessageKind;
pub use schema_version::SchemaVersion;
pub use type_meta_data::{TypeMetaDataEntry, TypeMetaDataList};

use netlist_serde::{BitReader, BitWrite, Serde, SerdeErr, UnsignedVariableInteger};

// Ids and counts share one varint layout across every message

pub(crate) fn write_varint(value: u64, writer: &mut dyn BitWrite) {
    UnsignedVariableInteger::<7>::new(value).ser(writer);
}

pub(crate) fn read_varint_u16(reader: &mut BitReader) -> Result<u16, SerdeErr> {
    let value = UnsignedVariableInteger::<7>::de(reader)?;
    u16::try_from(value.get()).map_err(|_| SerdeErr)
}

pub(crate) fn read_varint_u32(reader: &mut BitReader) -> Result<u32, SerdeErr> {
    let value = UnsignedVariableInteger::<7>::de(reader)?;
    u32::try_from(value.get()).map_err(|_| SerdeErr)
}

/// Reads an element count, rejecting counts that cannot fit in what is left
pub(crate) fn read_count(reader: &mut BitReader) -> Result<usize, SerdeErr> {
    let value = UnsignedVariableInteger::<7>::de(reader)?;
    let count = usize::try_from(value.get()).map_err(|_| SerdeErr)?;
    if count > reader.bits_remaining() {
        return Err(SerdeErr);
    }
    Ok(count)
}
