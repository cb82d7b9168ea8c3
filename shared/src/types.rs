/// Index of a `NetworkObjectList`, assigned in creation order
pub type ListId = u16;
/// Wire id of a registered networkable type, assigned in registration order
pub type NetTypeId = u16;
/// Index of a network object within its list
pub type ObjectId = u16;
/// Wrapping sequence number of a `FrameList`
pub type FrameSequence = u16;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HostType {
    Transmitter,
    Receiver,
}

impl HostType {
    pub fn invert(self) -> Self {
        match self {
            HostType::Transmitter => HostType::Receiver,
            HostType::Receiver => HostType::Transmitter,
        }
    }
}
