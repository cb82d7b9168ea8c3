use std::collections::VecDeque;

use super::{error::FrameError, frame_list::FrameList};
use crate::types::FrameSequence;

/// Bounded ring of the most recent frame lists, oldest first. Pushing into
/// a full ring evicts the oldest entry.
pub struct FrameHistory {
    capacity: usize,
    frame_lists: VecDeque<FrameList>,
}

impl FrameHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            frame_lists: VecDeque::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.frame_lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frame_lists.is_empty()
    }

    pub fn push(&mut self, frame_list: FrameList) {
        if self.frame_lists.len() >= self.capacity {
            self.frame_lists.pop_front();
        }
        self.frame_lists.push_back(frame_list);
    }

    pub fn latest(&self) -> Option<&FrameList> {
        self.frame_lists.back()
    }

    pub fn try_latest(&self) -> Result<&FrameList, FrameError> {
        self.latest().ok_or(FrameError::EmptyHistory)
    }

    pub fn get(&self, sequence: FrameSequence) -> Option<&FrameList> {
        self.frame_lists
            .iter()
            .rev()
            .find(|frame_list| frame_list.sequence() == sequence)
    }

    pub fn contains(&self, sequence: FrameSequence) -> bool {
        self.get(sequence).is_some()
    }

    /// Whether `sequence` would still be held after one more push
    pub fn retains_after_push(&self, sequence: FrameSequence) -> bool {
        if !self.contains(sequence) {
            return false;
        }
        if self.frame_lists.len() < self.capacity {
            return true;
        }
        self.frame_lists
            .front()
            .is_some_and(|oldest| oldest.sequence() != sequence)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FrameList> {
        self.frame_lists.iter()
    }

    pub fn clear(&mut self) {
        self.frame_lists.clear();
    }
}
