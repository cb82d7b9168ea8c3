use std::sync::Arc;

use netlist_serde::{BitReader, BitWrite, Serde, SerdeErr, UnsignedVariableInteger};

use super::{type_converter::TypeConverter, value::Value};

/// A nullable list of elements sharing one element converter.
///
/// Wire layout when changed: a non-null bit, then a "resend entire list" bit
/// which is set when there is no reference list or the length differs. An
/// entire list is a count followed by every element written against the
/// element default. Otherwise each element is preceded by a `true`
/// continuation bit and written as a delta against the reference element,
/// and the run ends with a `false`.
#[derive(Clone)]
pub struct ListConverter {
    element: Arc<dyn TypeConverter>,
}

impl ListConverter {
    pub fn new<C: TypeConverter + 'static>(element: C) -> Self {
        Self {
            element: Arc::new(element),
        }
    }

    pub fn element(&self) -> &dyn TypeConverter {
        self.element.as_ref()
    }
}

impl TypeConverter for ListConverter {
    fn name(&self) -> &'static str {
        "List"
    }

    fn default_value(&self) -> Value {
        Value::List(None)
    }

    fn accepts(&self, value: &Value) -> bool {
        match value {
            Value::List(None) => true,
            Value::List(Some(elements)) => elements.iter().all(|element| self.element.accepts(element)),
            _ => false,
        }
    }

    fn copy(&self, value: &Value) -> Value {
        match value {
            Value::List(Some(elements)) => Value::List(Some(
                elements.iter().map(|element| self.element.copy(element)).collect(),
            )),
            other => other.clone(),
        }
    }

    fn create_instance(&self, value: &Value) -> Value {
        match value {
            Value::List(Some(elements)) => Value::List(Some(
                elements
                    .iter()
                    .map(|element| self.element.create_instance(element))
                    .collect(),
            )),
            other => other.clone(),
        }
    }

    fn changed(&self, value: &Value, previous: &Value) -> bool {
        !matches!(
            (value, previous),
            (Value::List(None), Value::List(None))
        )
    }

    fn write(&self, value: &Value, previous: &Value, writer: &mut dyn BitWrite) -> bool {
        let Value::List(elements) = value else {
            writer.write_bit(false);
            return false;
        };
        if !self.changed(value, previous) {
            writer.write_bit(false);
            return false;
        }
        writer.write_bit(true);

        let Some(elements) = elements else {
            // non-null
            writer.write_bit(false);
            return true;
        };
        writer.write_bit(true);

        let reference = match previous {
            Value::List(Some(reference)) if reference.len() == elements.len() => Some(reference),
            _ => None,
        };

        match reference {
            None => {
                // resend entire list
                writer.write_bit(true);
                UnsignedVariableInteger::<5>::new(elements.len() as u64).ser(writer);
                let default = self.element.default_value();
                for element in elements {
                    self.element.write(element, &default, writer);
                }
            }
            Some(reference) => {
                writer.write_bit(false);
                for (element, previous) in elements.iter().zip(reference) {
                    writer.write_bit(true);
                    self.element.write(element, previous, writer);
                }
                writer.write_bit(false);
            }
        }
        true
    }

    fn read(&self, reader: &mut BitReader, previous: &Value) -> Result<(bool, Value), SerdeErr> {
        if !bool::de(reader)? {
            return Ok((false, previous.clone()));
        }
        if !bool::de(reader)? {
            return Ok((true, Value::List(None)));
        }

        let resend_entire = bool::de(reader)?;
        if resend_entire {
            let count = UnsignedVariableInteger::<5>::de(reader)?;
            let count = usize::try_from(count.get()).map_err(|_| SerdeErr)?;
            // every element carries at least one tag bit
            if count > reader.bits_remaining() {
                return Err(SerdeErr);
            }
            let default = self.element.default_value();
            let mut elements = Vec::with_capacity(count);
            for _ in 0..count {
                let (_, element) = self.element.read(reader, &default)?;
                elements.push(element);
            }
            return Ok((true, Value::List(Some(elements))));
        }

        let Value::List(Some(reference)) = previous else {
            return Err(SerdeErr);
        };
        let mut elements = Vec::with_capacity(reference.len());
        while bool::de(reader)? {
            let previous = reference.get(elements.len()).ok_or(SerdeErr)?;
            let (_, element) = self.element.read(reader, previous)?;
            elements.push(element);
        }
        if elements.len() != reference.len() {
            return Err(SerdeErr);
        }
        Ok((true, Value::List(Some(elements))))
    }
}
