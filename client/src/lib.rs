//! # Netlist Client
//! Receives network object lists from a transmitter, reconstructing every
//! object from full and delta updates and notifying a listener.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub mod shared {
    pub use netlist_shared::{
        BitReader, BitWrite, BitWriter, Serde, SerdeErr, SignedVariableInteger,
        UnsignedVariableInteger,
    };
}

mod client_config;
mod object_list_receiver;
mod receiver_listener;

pub use client_config::ClientConfig;
pub use object_list_receiver::ObjectListReceiver;
pub use receiver_listener::{NoopListener, ReceiverListener};
