mod handle;
mod list;
mod net_value;
mod primitives;
mod quantized;
mod string;
mod type_converter;
mod value;
mod vector;

pub use handle::HandleConverter;
pub use list::ListConverter;
pub use net_value::NetValue;
pub use primitives::{BoolConverter, DoubleConverter, FloatConverter, IntegerConverter, NetInteger};
pub use quantized::{
    BitOptions, QuantizedDoubleConverter, QuantizedFloatConverter, MULTIPLIER_EPSILON,
};
pub use string::StringConverter;
pub use type_converter::TypeConverter;
pub use value::{Snapshot, Value};
pub use vector::{Vector2Converter, Vector3Converter};
