use netlist_serde::{BitReader, BitWrite, Serde, SerdeErr};

use super::{type_converter::TypeConverter, value::Value};

/// Optional strings: a presence bit, then the length-prefixed UTF-8 bytes
#[derive(Clone, Copy, Debug, Default)]
pub struct StringConverter;

impl TypeConverter for StringConverter {
    fn name(&self) -> &'static str {
        "String"
    }

    fn default_value(&self) -> Value {
        Value::String(None)
    }

    fn accepts(&self, value: &Value) -> bool {
        matches!(value, Value::String(_))
    }

    fn write(&self, value: &Value, previous: &Value, writer: &mut dyn BitWrite) -> bool {
        let Value::String(string) = value else {
            writer.write_bit(false);
            return false;
        };
        if !self.changed(value, previous) {
            writer.write_bit(false);
            return false;
        }
        writer.write_bit(true);
        string.ser(writer);
        true
    }

    fn read(&self, reader: &mut BitReader, previous: &Value) -> Result<(bool, Value), SerdeErr> {
        if !bool::de(reader)? {
            return Ok((false, previous.clone()));
        }
        Ok((true, Value::String(Option::<String>::de(reader)?)))
    }
}
