mod change_mask;
mod error;
mod list_manager;
mod network_object;
mod network_object_list;

pub use change_mask::ChangeMask;
pub use error::ListError;
pub use list_manager::ListManager;
pub use network_object::NetworkObject;
pub use network_object_list::NetworkObjectList;
