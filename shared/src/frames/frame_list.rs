use super::{error::FrameError, frame::Frame};
use crate::{
    messages::FrameListUpdate,
    registry::RemoteTypeMap,
    types::{FrameSequence, ListId},
};

/// Every list's frame for one network tick
#[derive(Clone, Debug)]
pub struct FrameList {
    sequence: FrameSequence,
    reference: Option<FrameSequence>,
    frames: Vec<Frame>,
}

impl FrameList {
    pub fn new(sequence: FrameSequence, reference: Option<FrameSequence>, frames: Vec<Frame>) -> Self {
        Self {
            sequence,
            reference,
            frames,
        }
    }

    pub fn sequence(&self) -> FrameSequence {
        self.sequence
    }

    /// Sequence of the frame list deltas in this one were built against
    pub fn reference(&self) -> Option<FrameSequence> {
        self.reference
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn frame(&self, list_id: ListId) -> Option<&Frame> {
        self.frames.iter().find(|frame| frame.list_id() == list_id)
    }

    pub fn to_message(&self, reference: Option<&FrameList>) -> Result<FrameListUpdate, FrameError> {
        let frames = self
            .frames
            .iter()
            .map(|frame| frame.to_message(reference))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FrameListUpdate {
            sequence: self.sequence,
            reference: self.reference,
            frames,
        })
    }

    /// Decodes every frame of `update`. `reference` is the local frame list
    /// with the sequence named in the update header, if it is still held.
    pub fn from_message(
        update: &FrameListUpdate,
        types: &RemoteTypeMap,
        reference: Option<&FrameList>,
    ) -> Result<Self, FrameError> {
        let frames = update
            .frames
            .iter()
            .map(|message| Frame::from_message(message, types, update.reference, reference))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            sequence: update.sequence,
            reference: update.reference,
            frames,
        })
    }
}
