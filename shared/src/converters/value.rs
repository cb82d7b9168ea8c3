use crate::handle::ObjectHandle;

/// One member's value inside a snapshot.
///
/// Snapshots own their values, so mutating the live object never changes a
/// snapshot that was already taken.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    String(Option<String>),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    List(Option<Vec<Value>>),
    Handle(ObjectHandle),
}

impl Value {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "Bool",
            Value::I8(_) => "I8",
            Value::I16(_) => "I16",
            Value::I32(_) => "I32",
            Value::I64(_) => "I64",
            Value::U8(_) => "U8",
            Value::U16(_) => "U16",
            Value::U32(_) => "U32",
            Value::U64(_) => "U64",
            Value::F32(_) => "F32",
            Value::F64(_) => "F64",
            Value::String(_) => "String",
            Value::Vec2(_) => "Vec2",
            Value::Vec3(_) => "Vec3",
            Value::List(_) => "List",
            Value::Handle(_) => "Handle",
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Value::F32(value) => Some(*value),
            _ => None,
        }
    }
}

/// Per-member values of one object at one point in time, in member order
pub type Snapshot = Vec<Value>;
