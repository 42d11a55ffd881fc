use crate::address::Address;

/// Capability for transmitting relative MIDI events, implemented by the
/// host's transport (USB, serial, a test buffer, ...).
///
/// Callers in this workspace guarantee at most one call per output element
/// per polling tick, and that `delta` is never zero.
pub trait MidiSender {
    fn send_relative(&mut self, delta: i32, address: Address);
}
