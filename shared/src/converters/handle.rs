use netlist_serde::{BitReader, BitWrite, Serde, SerdeErr};

use super::{type_converter::TypeConverter, value::Value};
use crate::handle::ObjectHandle;

/// References to other network objects, sent as index and serial number
#[derive(Clone, Copy, Debug, Default)]
pub struct HandleConverter;

impl TypeConverter for HandleConverter {
    fn name(&self) -> &'static str {
        "Handle"
    }

    fn default_value(&self) -> Value {
        Value::Handle(ObjectHandle::INVALID)
    }

    fn accepts(&self, value: &Value) -> bool {
        matches!(value, Value::Handle(_))
    }

    fn write(&self, value: &Value, previous: &Value, writer: &mut dyn BitWrite) -> bool {
        let Value::Handle(handle) = value else {
            writer.write_bit(false);
            return false;
        };
        if !self.changed(value, previous) {
            writer.write_bit(false);
            return false;
        }
        writer.write_bit(true);
        handle.ser(writer);
        true
    }

    fn read(&self, reader: &mut BitReader, previous: &Value) -> Result<(bool, Value), SerdeErr> {
        if !bool::de(reader)? {
            return Ok((false, previous.clone()));
        }
        Ok((true, Value::Handle(ObjectHandle::de(reader)?)))
    }
}
