pub mod local_socket;
pub mod test_protocol;

pub use helpers::*;
pub use local_socket::{LocalReceiver, LocalSocketPair};
pub use test_protocol::{client_registry, registry, Player, Point, RemotePlayer, Team};
