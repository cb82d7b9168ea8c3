use netlist_serde::{BitReader, BitWrite, SerdeErr};

use super::value::Value;

/// Copy, compare, encode and decode strategy for one member.
///
/// Every independently tagged sub-value is prefixed by a "changed" bit, so
/// an unchanged scalar costs exactly one bit on the wire. `write` and `read`
/// always operate against a previous value: the reference snapshot for a
/// delta update, or `default_value` for a full update.
pub trait TypeConverter: Send + Sync {
    fn name(&self) -> &'static str;

    /// Baseline used when there is no prior snapshot
    fn default_value(&self) -> Value;

    /// Number of independently tagged sub-values
    fn member_count(&self) -> usize {
        1
    }

    /// Whether `value` has the shape this converter encodes
    fn accepts(&self, value: &Value) -> bool;

    /// Freeze the current value for later diffing
    fn copy(&self, value: &Value) -> Value {
        value.clone()
    }

    /// Convert a snapshot value into the value assigned back to the live field
    fn create_instance(&self, value: &Value) -> Value {
        value.clone()
    }

    fn changed(&self, value: &Value, previous: &Value) -> bool {
        value != previous
    }

    /// Writes `value` relative to `previous`. Returns whether any sub-value
    /// was written as changed.
    fn write(&self, value: &Value, previous: &Value, writer: &mut dyn BitWrite) -> bool;

    /// Reads a value relative to `previous`. Unchanged sub-values reuse the
    /// previous value.
    fn read(&self, reader: &mut BitReader, previous: &Value) -> Result<(bool, Value), SerdeErr>;

    fn write_unchanged(&self, writer: &mut dyn BitWrite) {
        for _ in 0..self.member_count() {
            writer.write_bit(false);
        }
    }
}
