use std::fmt;

use netlist_serde::{BitReader, BitWrite, Serde, SerdeErr, UnsignedVariableInteger};

use crate::{constants::INVALID_ID, types::ObjectId};

/// Identity of a network object: its index within a list plus a serial
/// number that changes every time the index is reused.
///
/// The index is stored offset by one so that the zeroed default handle is
/// always invalid.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectHandle {
    stored_id: u16,
    serial_number: u16,
}

impl ObjectHandle {
    pub const INVALID: ObjectHandle = ObjectHandle {
        stored_id: 0,
        serial_number: 0,
    };

    pub fn new(id: ObjectId, serial_number: u16) -> Self {
        Self {
            stored_id: id.wrapping_add(1),
            serial_number,
        }
    }

    pub fn id(&self) -> ObjectId {
        self.stored_id.wrapping_sub(1)
    }

    pub fn serial_number(&self) -> u16 {
        self.serial_number
    }

    pub fn is_valid(&self) -> bool {
        self.id() != INVALID_ID
    }

    pub(crate) fn from_stored(stored_id: u16, serial_number: u16) -> Self {
        Self {
            stored_id,
            serial_number,
        }
    }
}

impl Default for ObjectHandle {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "{}:{}", self.id(), self.serial_number)
        } else {
            write!(f, "invalid:{}", self.serial_number)
        }
    }
}

impl fmt::Debug for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectHandle({})", self)
    }
}

// The stored form goes on the wire, so an invalid handle costs a single chunk
impl Serde for ObjectHandle {
    fn ser(&self, writer: &mut dyn BitWrite) {
        UnsignedVariableInteger::<7>::new(self.stored_id).ser(writer);
        UnsignedVariableInteger::<7>::new(self.serial_number).ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let stored_id = UnsignedVariableInteger::<7>::de(reader)?;
        let serial_number = UnsignedVariableInteger::<7>::de(reader)?;
        Ok(Self::from_stored(
            u16::try_from(stored_id.get()).map_err(|_| SerdeErr)?,
            u16::try_from(serial_number.get()).map_err(|_| SerdeErr)?,
        ))
    }
}
