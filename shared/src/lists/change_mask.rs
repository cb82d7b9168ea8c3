/// One bit per change-notifying member of an object
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ChangeMask {
    mask: Vec<u8>,
}

impl ChangeMask {
    pub fn new(bit_count: usize) -> Self {
        Self {
            mask: vec![0; bit_count.div_ceil(8)],
        }
    }

    pub fn bit(&self, index: usize) -> bool {
        self.mask
            .get(index / 8)
            .is_some_and(|byte| byte & (1_u8 << (index % 8)) != 0)
    }

    pub fn set_bit(&mut self, index: usize, value: bool) {
        let Some(byte) = self.mask.get_mut(index / 8) else {
            return;
        };
        if value {
            *byte |= 1_u8 << (index % 8);
        } else {
            *byte &= !(1_u8 << (index % 8));
        }
    }

    pub fn clear(&mut self) {
        self.mask.fill(0);
    }

    pub fn is_clear(&self) -> bool {
        self.mask.iter().all(|byte| *byte == 0)
    }

    /// Sets every bit that is set in `other`
    pub fn or(&mut self, other: &ChangeMask) {
        if self.mask.len() < other.mask.len() {
            self.mask.resize(other.mask.len(), 0);
        }
        for (byte, other_byte) in self.mask.iter_mut().zip(&other.mask) {
            *byte |= *other_byte;
        }
    }
}
