use std::sync::Arc;

use netlist_serde::{BitReader, BitWrite, SerdeErr};

use super::{primitives::FloatConverter, type_converter::TypeConverter, value::Value};

fn write_components(
    element: &dyn TypeConverter,
    components: &[f32],
    previous: &[f32],
    writer: &mut dyn BitWrite,
) -> bool {
    let mut changed = false;
    for (component, previous) in components.iter().zip(previous) {
        changed = element.write(&Value::F32(*component), &Value::F32(*previous), writer) || changed;
    }
    changed
}

fn read_components<const N: usize>(
    element: &dyn TypeConverter,
    reader: &mut BitReader,
    previous: [f32; N],
) -> Result<(bool, [f32; N]), SerdeErr> {
    let mut output = previous;
    let mut changed = false;
    for (component, previous) in output.iter_mut().zip(previous) {
        let (component_changed, value) = element.read(reader, &Value::F32(previous))?;
        *component = value.as_f32().ok_or(SerdeErr)?;
        changed = changed || component_changed;
    }
    Ok((changed, output))
}

/// Two floats, each tagged independently through an element converter
#[derive(Clone)]
pub struct Vector2Converter {
    element: Arc<dyn TypeConverter>,
}

impl Vector2Converter {
    pub fn new() -> Self {
        Self::with_element(FloatConverter)
    }

    /// `element` must encode `Value::F32`, e.g. a `QuantizedFloatConverter`
    pub fn with_element<C: TypeConverter + 'static>(element: C) -> Self {
        Self {
            element: Arc::new(element),
        }
    }
}

impl Default for Vector2Converter {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeConverter for Vector2Converter {
    fn name(&self) -> &'static str {
        "Vec2"
    }

    fn default_value(&self) -> Value {
        Value::Vec2([0.0; 2])
    }

    fn member_count(&self) -> usize {
        2
    }

    fn accepts(&self, value: &Value) -> bool {
        matches!(value, Value::Vec2(_))
    }

    fn write(&self, value: &Value, previous: &Value, writer: &mut dyn BitWrite) -> bool {
        let (Value::Vec2(value), Value::Vec2(previous)) = (value, previous) else {
            self.write_unchanged(writer);
            return false;
        };
        write_components(self.element.as_ref(), value, previous, writer)
    }

    fn read(&self, reader: &mut BitReader, previous: &Value) -> Result<(bool, Value), SerdeErr> {
        let previous = match previous {
            Value::Vec2(previous) => *previous,
            _ => [0.0; 2],
        };
        let (changed, output) = read_components(self.element.as_ref(), reader, previous)?;
        Ok((changed, Value::Vec2(output)))
    }
}

/// Three floats, each tagged independently through an element converter
#[derive(Clone)]
pub struct Vector3Converter {
    element: Arc<dyn TypeConverter>,
}

impl Vector3Converter {
    pub fn new() -> Self {
        Self::with_element(FloatConverter)
    }

    /// `element` must encode `Value::F32`, e.g. a `QuantizedFloatConverter`
    pub fn with_element<C: TypeConverter + 'static>(element: C) -> Self {
        Self {
            element: Arc::new(element),
        }
    }
}

impl Default for Vector3Converter {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeConverter for Vector3Converter {
    fn name(&self) -> &'static str {
        "Vec3"
    }

    fn default_value(&self) -> Value {
        Value::Vec3([0.0; 3])
    }

    fn member_count(&self) -> usize {
        3
    }

    fn accepts(&self, value: &Value) -> bool {
        matches!(value, Value::Vec3(_))
    }

    fn write(&self, value: &Value, previous: &Value, writer: &mut dyn BitWrite) -> bool {
        let (Value::Vec3(value), Value::Vec3(previous)) = (value, previous) else {
            self.write_unchanged(writer);
            return false;
        };
        write_components(self.element.as_ref(), value, previous, writer)
    }

    fn read(&self, reader: &mut BitReader, previous: &Value) -> Result<(bool, Value), SerdeErr> {
        let previous = match previous {
            Value::Vec3(previous) => *previous,
            _ => [0.0; 3],
        };
        let (changed, output) = read_components(self.element.as_ref(), reader, previous)?;
        Ok((changed, Value::Vec3(output)))
    }
}
