use crate::types::FrameSequence;

/// Returns whether or not a wrapping sequence is greater than another
/// sequence_greater_than(2,1) will return true
/// sequence_greater_than(1,2) will return false
/// sequence_greater_than(1,1) will return false
pub fn sequence_greater_than(s1: FrameSequence, s2: FrameSequence) -> bool {
    ((s1 > s2) && (s1 - s2 <= 32768)) || ((s1 < s2) && (s2 - s1 > 32768))
}

/// Returns whether or not a wrapping sequence is less than another
/// sequence_less_than(1,2) will return true
/// sequence_less_than(2,1) will return false
/// sequence_less_than(1,1) will return false
pub fn sequence_less_than(s1: FrameSequence, s2: FrameSequence) -> bool {
    sequence_greater_than(s2, s1)
}

/// Number of steps forward from `from` to reach `to`, wrapping at `u16::MAX`
pub fn sequence_distance(from: FrameSequence, to: FrameSequence) -> u16 {
    to.wrapping_sub(from)
}
