mod error;
mod frame;
mod frame_history;
mod frame_list;
mod object_update;

pub use error::FrameError;
pub use frame::Frame;
pub use frame_history::FrameHistory;
pub use frame_list::FrameList;
pub use object_update::ObjectUpdate;
