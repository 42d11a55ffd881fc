#![no_std]

use tactus_midi::MidiSender;

pub mod bank;
pub mod encoder;
pub mod selector;

pub use bank::{Bank, BankConfig, BankTarget};
pub use encoder::{PositionRead, RotaryEncoder};
pub use selector::IncrementSelector;

/// Rejected surface configurations. All of these are fatal at
/// construction; once an element exists, every `update` path is total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// `pulses_per_step` or `speed_multiply` of zero.
    InvalidQuantization,
    /// A bank with zero settings.
    InvalidSettingCount,
    /// An initial setting at or beyond the setting count.
    OutOfRangeSetting,
}

/// A MIDI output element driven by the polling loop.
///
/// The host calls [`update`](OutputElement::update) on every element once
/// per tick, in a stable order, never re-entered. Each element performs at
/// most one send per tick.
pub trait OutputElement<M: MidiSender> {
    fn begin(&mut self) {}

    fn update(&mut self, midi: &mut M);
}
