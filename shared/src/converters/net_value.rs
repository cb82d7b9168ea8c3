use super::value::Value;
use crate::handle::ObjectHandle;

/// Conversion between a live field type and its snapshot `Value`.
///
/// `from_value` returns `None` when the value has the wrong shape for the
/// field. Enums are networked by implementing this trait against one of the
/// integer variants and registering the field with the matching
/// `IntegerConverter`.
pub trait NetValue: Sized {
    fn to_value(&self) -> Value;
    fn from_value(value: &Value) -> Option<Self>;
}

macro_rules! impl_net_value {
    ($impl_type:ty, $variant:ident) => {
        impl NetValue for $impl_type {
            fn to_value(&self) -> Value {
                Value::$variant(*self)
            }

            fn from_value(value: &Value) -> Option<Self> {
                match value {
                    Value::$variant(inner) => Some(*inner),
                    _ => None,
                }
            }
        }
    };
}

impl_net_value!(bool, Bool);
impl_net_value!(i8, I8);
impl_net_value!(i16, I16);
impl_net_value!(i32, I32);
impl_net_value!(i64, I64);
impl_net_value!(u8, U8);
impl_net_value!(u16, U16);
impl_net_value!(u32, U32);
impl_net_value!(u64, U64);
impl_net_value!(f32, F32);
impl_net_value!(f64, F64);
impl_net_value!([f32; 2], Vec2);
impl_net_value!([f32; 3], Vec3);
impl_net_value!(ObjectHandle, Handle);

// Strings

impl NetValue for String {
    fn to_value(&self) -> Value {
        Value::String(Some(self.clone()))
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(inner) => Some(inner.clone().unwrap_or_default()),
            _ => None,
        }
    }
}

impl NetValue for Option<String> {
    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(inner) => Some(inner.clone()),
            _ => None,
        }
    }
}

// Lists
//
// Every collection shape reads from the same `Value::List`, so a list
// snapshot can be applied to a `Vec<T>`, a `Box<[T]>` or an `Option<Vec<T>>`.

fn elements_from_value<T: NetValue>(value: &Value) -> Option<Option<Vec<T>>> {
    match value {
        Value::List(None) => Some(None),
        Value::List(Some(elements)) => {
            let mut output = Vec::with_capacity(elements.len());
            for element in elements {
                output.push(T::from_value(element)?);
            }
            Some(Some(output))
        }
        _ => None,
    }
}

impl<T: NetValue> NetValue for Vec<T> {
    fn to_value(&self) -> Value {
        Value::List(Some(self.iter().map(NetValue::to_value).collect()))
    }

    fn from_value(value: &Value) -> Option<Self> {
        elements_from_value(value).map(Option::unwrap_or_default)
    }
}

impl<T: NetValue> NetValue for Box<[T]> {
    fn to_value(&self) -> Value {
        Value::List(Some(self.iter().map(NetValue::to_value).collect()))
    }

    fn from_value(value: &Value) -> Option<Self> {
        elements_from_value(value).map(|elements| elements.unwrap_or_default().into_boxed_slice())
    }
}

impl<T: NetValue> NetValue for Option<Vec<T>> {
    fn to_value(&self) -> Value {
        Value::List(
            self.as_ref()
                .map(|elements| elements.iter().map(NetValue::to_value).collect()),
        )
    }

    fn from_value(value: &Value) -> Option<Self> {
        elements_from_value(value)
    }
}
