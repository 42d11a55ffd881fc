#![no_std]

pub mod address;
pub mod sender;

pub use address::Address;
pub use sender::MidiSender;
