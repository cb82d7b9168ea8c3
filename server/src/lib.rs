//! # Netlist Server
//! Transmits registered network object lists to any number of receivers.
//! Each destination keeps its own frame history, so deltas are encoded
//! against the last frame relevant to that destination.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod shared {
    pub use netlist_shared::{
        BitReader, BitWrite, BitWriter, Serde, SerdeErr, SignedVariableInteger,
        UnsignedVariableInteger,
    };
}

mod frame_list_transmitter;
mod object_list_transmitter;
mod server_config;
mod transmitter_key;
mod transmitter_listener;

pub use frame_list_transmitter::FrameListTransmitter;
pub use object_list_transmitter::ObjectListTransmitter;
pub use server_config::{ReferenceMode, ServerConfig};
pub use transmitter_key::TransmitterKey;
pub use transmitter_listener::{TransmitAll, TransmitterListener};
