use log::warn;

use netlist_serde::{BitReader, BitWrite, NumberCoding, Serde, SerdeErr};

use super::{type_converter::TypeConverter, value::Value};

/// Multipliers within this distance of 1.0 are not applied
pub const MULTIPLIER_EPSILON: f32 = 0.001;

fn should_multiply(multiplier: f32) -> bool {
    multiplier < (1.0 - MULTIPLIER_EPSILON) || (1.0 + MULTIPLIER_EPSILON) < multiplier
}

/// Fixed-point layout of a quantized float
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BitOptions {
    /// Total bits sent, including the sign bit when `signed` is set
    pub bits: u8,
    /// Applied before sending, divided out after reception
    pub multiplier: f32,
    /// Applied after reception only
    pub post_multiplier: f32,
    pub signed: bool,
}

impl BitOptions {
    pub fn new(bits: u8) -> Self {
        Self {
            bits,
            multiplier: 1.0,
            post_multiplier: 1.0,
            signed: false,
        }
    }

    pub fn signed(bits: u8) -> Self {
        Self {
            signed: true,
            ..Self::new(bits)
        }
    }

    pub fn with_multiplier(mut self, multiplier: f32) -> Self {
        self.multiplier = multiplier;
        self
    }

    pub fn with_post_multiplier(mut self, post_multiplier: f32) -> Self {
        self.post_multiplier = post_multiplier;
        self
    }

    fn coding(&self) -> NumberCoding {
        let magnitude_bits = if self.signed {
            self.bits.saturating_sub(1)
        } else {
            self.bits
        };
        NumberCoding::fixed(self.signed, magnitude_bits.clamp(1, 63))
    }

    fn quantize(&self, coding: &NumberCoding, value: f64) -> i128 {
        let mut scaled = if self.signed { value } else { value.max(0.0) };
        if should_multiply(self.multiplier) {
            scaled *= f64::from(self.multiplier);
        }
        let mut quantized = scaled.round() as i128;

        if !coding.fits(quantized) {
            let max = coding.max_magnitude().unwrap_or(0) as i128;
            warn!(
                "value {} does not fit in {} bits, clamping to {}",
                value,
                self.bits,
                max * quantized.signum()
            );
            quantized = quantized.clamp(-max, max);
        }
        if value < 0.0 && !self.signed {
            warn!("negative value {} sent through an unsigned quantized converter", value);
        }
        quantized
    }

    fn dequantize(&self, quantized: i128) -> f64 {
        let mut value = quantized as f64;
        if should_multiply(self.multiplier) {
            value /= f64::from(self.multiplier);
        }
        if should_multiply(self.post_multiplier) {
            value *= f64::from(self.post_multiplier);
        }
        value
    }
}

macro_rules! impl_quantized_converter {
    ($converter:ident, $variant:ident, $name:expr, $narrow:expr) => {
        impl $converter {
            pub fn new(options: BitOptions) -> Self {
                Self {
                    options,
                    coding: options.coding(),
                }
            }

            pub fn options(&self) -> &BitOptions {
                &self.options
            }
        }

        impl TypeConverter for $converter {
            fn name(&self) -> &'static str {
                $name
            }

            fn default_value(&self) -> Value {
                Value::$variant(0.0)
            }

            fn accepts(&self, value: &Value) -> bool {
                matches!(value, Value::$variant(_))
            }

            fn changed(&self, value: &Value, previous: &Value) -> bool {
                match (value, previous) {
                    (Value::$variant(value), Value::$variant(previous)) => {
                        value.to_bits() != previous.to_bits()
                    }
                    _ => true,
                }
            }

            fn write(&self, value: &Value, previous: &Value, writer: &mut dyn BitWrite) -> bool {
                let Value::$variant(float) = value else {
                    writer.write_bit(false);
                    return false;
                };
                if !self.changed(value, previous) {
                    writer.write_bit(false);
                    return false;
                }
                writer.write_bit(true);
                let quantized = self.options.quantize(&self.coding, f64::from(*float));
                self.coding.ser(quantized, writer);
                true
            }

            fn read(
                &self,
                reader: &mut BitReader,
                previous: &Value,
            ) -> Result<(bool, Value), SerdeErr> {
                if !bool::de(reader)? {
                    return Ok((false, previous.clone()));
                }
                let quantized = self.coding.de(reader)?;
                let value = $narrow(self.options.dequantize(quantized));
                Ok((true, Value::$variant(value)))
            }
        }
    };
}

/// Sends an `f32` as a fixed-point integer. Values are not delta encoded:
/// a changed value is sent whole. Magnitudes that do not fit are clamped.
#[derive(Clone, Copy, Debug)]
pub struct QuantizedFloatConverter {
    options: BitOptions,
    coding: NumberCoding,
}

impl_quantized_converter!(
    QuantizedFloatConverter,
    F32,
    "QuantizedF32",
    |value: f64| value as f32
);

/// `QuantizedFloatConverter` for `f64` members
#[derive(Clone, Copy, Debug)]
pub struct QuantizedDoubleConverter {
    options: BitOptions,
    coding: NumberCoding,
}

impl_quantized_converter!(QuantizedDoubleConverter, F64, "QuantizedF64", |value: f64| value);
