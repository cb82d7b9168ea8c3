use std::marker::PhantomData;

use netlist_serde::{BitReader, BitWrite, NumberCoding, Serde, SerdeErr};

use super::{net_value::NetValue, type_converter::TypeConverter, value::Value};

// Bool

#[derive(Clone, Copy, Debug, Default)]
pub struct BoolConverter;

impl TypeConverter for BoolConverter {
    fn name(&self) -> &'static str {
        "Bool"
    }

    fn default_value(&self) -> Value {
        Value::Bool(false)
    }

    fn accepts(&self, value: &Value) -> bool {
        matches!(value, Value::Bool(_))
    }

    fn write(&self, value: &Value, previous: &Value, writer: &mut dyn BitWrite) -> bool {
        let Value::Bool(value) = value else {
            writer.write_bit(false);
            return false;
        };
        if Value::Bool(*value) == *previous {
            writer.write_bit(false);
            return false;
        }
        writer.write_bit(true);
        value.ser(writer);
        true
    }

    fn read(&self, reader: &mut BitReader, previous: &Value) -> Result<(bool, Value), SerdeErr> {
        if !bool::de(reader)? {
            return Ok((false, previous.clone()));
        }
        Ok((true, Value::Bool(bool::de(reader)?)))
    }
}

// Integers

/// Integer types that are delta encoded: the difference to the previous
/// value, computed with wrapping arithmetic in the type's own width, is sent
/// as a signed variable-length number.
pub trait NetInteger: NetValue + Copy + PartialEq + Default + Send + Sync + 'static {
    const NAME: &'static str;

    fn delta(self, previous: Self) -> i128;
    fn apply_delta(previous: Self, delta: i128) -> Self;
}

macro_rules! impl_signed_net_integer {
    ($impl_type:ty, $name:expr) => {
        impl NetInteger for $impl_type {
            const NAME: &'static str = $name;

            fn delta(self, previous: Self) -> i128 {
                i128::from(self.wrapping_sub(previous))
            }

            fn apply_delta(previous: Self, delta: i128) -> Self {
                previous.wrapping_add(delta as $impl_type)
            }
        }
    };
}

macro_rules! impl_unsigned_net_integer {
    ($impl_type:ty, $signed_type:ty, $name:expr) => {
        impl NetInteger for $impl_type {
            const NAME: &'static str = $name;

            fn delta(self, previous: Self) -> i128 {
                i128::from(self.wrapping_sub(previous) as $signed_type)
            }

            fn apply_delta(previous: Self, delta: i128) -> Self {
                previous.wrapping_add(delta as $impl_type)
            }
        }
    };
}

impl_signed_net_integer!(i8, "I8");
impl_signed_net_integer!(i16, "I16");
impl_signed_net_integer!(i32, "I32");
impl_signed_net_integer!(i64, "I64");
impl_unsigned_net_integer!(u8, i8, "U8");
impl_unsigned_net_integer!(u16, i16, "U16");
impl_unsigned_net_integer!(u32, i32, "U32");
impl_unsigned_net_integer!(u64, i64, "U64");

const DELTA_CODING: NumberCoding = NumberCoding::variable(true, 7);

pub struct IntegerConverter<T: NetInteger> {
    phantom_t: PhantomData<fn() -> T>,
}

impl<T: NetInteger> IntegerConverter<T> {
    pub fn new() -> Self {
        Self {
            phantom_t: PhantomData,
        }
    }
}

impl<T: NetInteger> Default for IntegerConverter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: NetInteger> TypeConverter for IntegerConverter<T> {
    fn name(&self) -> &'static str {
        T::NAME
    }

    fn default_value(&self) -> Value {
        T::default().to_value()
    }

    fn accepts(&self, value: &Value) -> bool {
        T::from_value(value).is_some()
    }

    fn write(&self, value: &Value, previous: &Value, writer: &mut dyn BitWrite) -> bool {
        let Some(value) = T::from_value(value) else {
            writer.write_bit(false);
            return false;
        };
        let previous = T::from_value(previous).unwrap_or_default();
        let delta = value.delta(previous);
        if delta == 0 {
            writer.write_bit(false);
            return false;
        }
        writer.write_bit(true);
        DELTA_CODING.ser(delta, writer);
        true
    }

    fn read(&self, reader: &mut BitReader, previous: &Value) -> Result<(bool, Value), SerdeErr> {
        if !bool::de(reader)? {
            return Ok((false, previous.clone()));
        }
        let delta = DELTA_CODING.de(reader)?;
        let previous = T::from_value(previous).unwrap_or_default();
        Ok((true, T::apply_delta(previous, delta).to_value()))
    }
}

// Floats
//
// Floats are sent raw rather than as arithmetic deltas so precision never
// drifts between both ends.

#[derive(Clone, Copy, Debug, Default)]
pub struct FloatConverter;

impl TypeConverter for FloatConverter {
    fn name(&self) -> &'static str {
        "F32"
    }

    fn default_value(&self) -> Value {
        Value::F32(0.0)
    }

    fn accepts(&self, value: &Value) -> bool {
        matches!(value, Value::F32(_))
    }

    fn changed(&self, value: &Value, previous: &Value) -> bool {
        match (value, previous) {
            (Value::F32(value), Value::F32(previous)) => value.to_bits() != previous.to_bits(),
            _ => true,
        }
    }

    fn write(&self, value: &Value, previous: &Value, writer: &mut dyn BitWrite) -> bool {
        let Value::F32(float) = value else {
            writer.write_bit(false);
            return false;
        };
        if !self.changed(value, previous) {
            writer.write_bit(false);
            return false;
        }
        writer.write_bit(true);
        float.ser(writer);
        true
    }

    fn read(&self, reader: &mut BitReader, previous: &Value) -> Result<(bool, Value), SerdeErr> {
        if !bool::de(reader)? {
            return Ok((false, previous.clone()));
        }
        Ok((true, Value::F32(f32::de(reader)?)))
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct DoubleConverter;

impl TypeConverter for DoubleConverter {
    fn name(&self) -> &'static str {
        "F64"
    }

    fn default_value(&self) -> Value {
        Value::F64(0.0)
    }

    fn accepts(&self, value: &Value) -> bool {
        matches!(value, Value::F64(_))
    }

    fn changed(&self, value: &Value, previous: &Value) -> bool {
        match (value, previous) {
            (Value::F64(value), Value::F64(previous)) => value.to_bits() != previous.to_bits(),
            _ => true,
        }
    }

    fn write(&self, value: &Value, previous: &Value, writer: &mut dyn BitWrite) -> bool {
        let Value::F64(double) = value else {
            writer.write_bit(false);
            return false;
        };
        if !self.changed(value, previous) {
            writer.write_bit(false);
            return false;
        }
        writer.write_bit(true);
        double.ser(writer);
        true
    }

    fn read(&self, reader: &mut BitReader, previous: &Value) -> Result<(bool, Value), SerdeErr> {
        if !bool::de(reader)? {
            return Ok((false, previous.clone()));
        }
        Ok((true, Value::F64(f64::de(reader)?)))
    }
}
