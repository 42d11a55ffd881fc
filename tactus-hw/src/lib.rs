#![no_std]

use core::cell::RefCell;
use core::convert::Infallible;

use embedded_hal::digital::v2::InputPin;

pub mod debouncer;
pub mod increment_button;
pub mod shift_register;

pub use debouncer::{DebounceError, Debouncer};
pub use increment_button::{IncrementButton, IncrementEvent, IncrementRead};
pub use shift_register::{Cd74hc165, ShiftRegisterIn};

/// A multi-line digital input source that captures all of its lines in one
/// snapshot per polling cycle.
///
/// Buffered reads index into the last completed snapshot and never start a
/// hardware transaction, so every line queried within one cycle sees a
/// consistent view.
pub trait InputPort {
    /// Capture a fresh snapshot of all input lines. Called once per
    /// polling cycle; the whole snapshot is replaced, never patched.
    fn update_buffered_inputs(&mut self);

    /// Level of `line` in the last captured snapshot.
    fn digital_read_buffered(&self, line: u8) -> bool;

    /// Also a snapshot read: buffered ports never sample the wire on
    /// demand, so this is the same bit `digital_read_buffered` returns.
    fn digital_read(&self, line: u8) -> bool {
        self.digital_read_buffered(line)
    }

    /// Digital-only ports have no analog inputs, so this always returns 0.
    /// Safe to call, documented contract rather than an error.
    fn analog_read_buffered(&self, _line: u8) -> u16 {
        0
    }

    /// Same constant-0 contract as `analog_read_buffered`.
    fn analog_read(&self, line: u8) -> u16 {
        self.analog_read_buffered(line)
    }

    /// Number of addressable lines on this port.
    fn lines(&self) -> u8;
}

/// One line of a shared [`InputPort`], exposed as an `embedded-hal` input
/// pin so port-backed lines and raw GPIO lines are interchangeable at the
/// button seam.
///
/// The port sits behind a `RefCell` because its owner re-captures the
/// snapshot each cycle while line adapters keep reading it; in a
/// multi-threaded host this boundary becomes a mutex instead.
pub struct PortLine<'a, P: InputPort> {
    port: &'a RefCell<P>,
    line: u8,
}

impl<'a, P: InputPort> PortLine<'a, P> {
    pub fn new(port: &'a RefCell<P>, line: u8) -> Self {
        Self { port, line }
    }
}

impl<P: InputPort> InputPin for PortLine<'_, P> {
    type Error = Infallible;

    fn is_high(&self) -> Result<bool, Infallible> {
        Ok(self.port.borrow().digital_read_buffered(self.line))
    }

    fn is_low(&self) -> Result<bool, Infallible> {
        Ok(!self.port.borrow().digital_read_buffered(self.line))
    }
}
