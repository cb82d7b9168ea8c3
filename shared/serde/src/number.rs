use crate::{bit_reader::BitReader, bit_writer::BitWrite, error::SerdeErr, serde::Serde, ConstBitLength};

// Runtime coding

/// Describes how an integer magnitude is laid out on the wire.
///
/// Signed numbers carry a leading sign bit followed by the magnitude. Fixed
/// numbers always write `bits` magnitude bits. Variable numbers write the
/// magnitude in `bits`-sized chunks, each preceded by a "proceed" bit.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct NumberCoding {
    signed: bool,
    variable: bool,
    bits: u8,
}

impl NumberCoding {
    pub const fn new(signed: bool, variable: bool, bits: u8) -> Self {
        Self {
            signed,
            variable,
            bits,
        }
    }

    pub const fn fixed(signed: bool, bits: u8) -> Self {
        Self::new(signed, false, bits)
    }

    pub const fn variable(signed: bool, bits: u8) -> Self {
        Self::new(signed, true, bits)
    }

    pub fn is_signed(&self) -> bool {
        self.signed
    }

    pub fn is_variable(&self) -> bool {
        self.variable
    }

    pub fn bits(&self) -> u8 {
        self.bits
    }

    /// Largest magnitude a fixed coding can hold. Variable codings are unbounded.
    pub fn max_magnitude(&self) -> Option<u128> {
        if self.variable {
            return None;
        }
        if self.bits >= 127 {
            return Some(i128::MAX as u128);
        }
        Some((1_u128 << self.bits) - 1)
    }

    /// Whether `value` can be written with this coding without losing bits
    pub fn fits(&self, value: i128) -> bool {
        if !self.signed && value < 0 {
            return false;
        }
        match self.max_magnitude() {
            Some(max) => value.unsigned_abs() <= max,
            None => true,
        }
    }

    pub fn ser(&self, value: i128, writer: &mut dyn BitWrite) {
        let negative = value < 0;
        let mut magnitude = value.unsigned_abs();

        if self.signed {
            writer.write_bit(negative);
        }

        if self.variable {
            loop {
                let proceed = self.bits < 128 && magnitude >= (1_u128 << self.bits);
                writer.write_bit(proceed);
                for _ in 0..self.bits {
                    writer.write_bit(magnitude & 1 != 0);
                    magnitude >>= 1;
                }
                if !proceed {
                    return;
                }
            }
        } else {
            for _ in 0..self.bits {
                writer.write_bit(magnitude & 1 != 0);
                magnitude >>= 1;
            }
        }
    }

    pub fn de(&self, reader: &mut BitReader) -> Result<i128, SerdeErr> {
        let mut negative = false;
        if self.signed {
            negative = reader.read_bit()?;
        }

        let mut output: u128 = 0;
        let mut total_bits: u32 = 0;

        if self.variable {
            loop {
                let proceed = reader.read_bit()?;
                for _ in 0..self.bits {
                    let bit = reader.read_bit()?;
                    if total_bits >= 127 {
                        if bit {
                            return Err(SerdeErr);
                        }
                    } else if bit {
                        output |= 1_u128 << total_bits;
                    }
                    total_bits += 1;
                }
                if !proceed {
                    break;
                }
            }
        } else {
            for _ in 0..self.bits {
                if reader.read_bit()? && total_bits < 127 {
                    output |= 1_u128 << total_bits;
                }
                total_bits += 1;
            }
        }

        let value = output as i128;
        if negative {
            Ok(-value)
        } else {
            Ok(value)
        }
    }

    pub fn bit_length(&self, value: i128) -> u32 {
        let mut output: u32 = 0;

        if self.signed {
            output += 1; // sign bit
        }

        if self.variable {
            let mut magnitude = value.unsigned_abs();
            loop {
                let proceed = self.bits < 128 && magnitude >= (1_u128 << self.bits);
                output += 1 + self.bits as u32;
                magnitude >>= self.bits;
                if !proceed {
                    break;
                }
            }
        } else {
            output += self.bits as u32;
        }
        output
    }

    fn check(&self, value: i128) {
        if self.bits == 0 {
            panic!("can't create a number with 0 bits...");
        }
        if self.bits > 127 {
            panic!("can't create a number with more than 127 bits...");
        }
        if !self.signed && value < 0 {
            panic!("can't encode a negative number with an Unsigned type!");
        }
        if !self.fits(value) {
            panic!(
                "value `{}` is out of range! (with `{}` bits, can't encode a magnitude greater than `{}`)",
                value,
                self.bits,
                self.max_magnitude().unwrap_or_default()
            );
        }
    }
}

// Integers

pub type UnsignedInteger<const BITS: u8> = SerdeInteger<false, false, BITS>;
pub type SignedInteger<const BITS: u8> = SerdeInteger<true, false, BITS>;
pub type UnsignedVariableInteger<const BITS: u8> = SerdeInteger<false, true, BITS>;
pub type SignedVariableInteger<const BITS: u8> = SerdeInteger<true, true, BITS>;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct SerdeInteger<const SIGNED: bool, const VARIABLE: bool, const BITS: u8> {
    value: i128,
}

impl<const SIGNED: bool, const VARIABLE: bool, const BITS: u8> SerdeInteger<SIGNED, VARIABLE, BITS> {
    const CODING: NumberCoding = NumberCoding::new(SIGNED, VARIABLE, BITS);

    pub fn new<T: Into<i128>>(value: T) -> Self {
        let value = value.into();
        Self::CODING.check(value);
        Self { value }
    }

    pub fn get(&self) -> i128 {
        self.value
    }

    pub fn set<T: Into<i128>>(&mut self, value: T) {
        let value = value.into();
        Self::CODING.check(value);
        self.value = value;
    }
}

impl<const SIGNED: bool, const VARIABLE: bool, const BITS: u8> Serde for SerdeInteger<SIGNED, VARIABLE, BITS> {
    fn ser(&self, writer: &mut dyn BitWrite) {
        Self::CODING.ser(self.value, writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let value = Self::CODING.de(reader)?;
        Ok(Self { value })
    }

    fn bit_length(&self) -> u32 {
        Self::CODING.bit_length(self.value)
    }
}

impl<const SIGNED: bool, const BITS: u8> ConstBitLength for SerdeInteger<SIGNED, false, BITS> {
    fn const_bit_length() -> u32 {
        let mut output: u32 = 0;
        if SIGNED {
            output += 1;
        }
        output + BITS as u32
    }
}

// Tests
