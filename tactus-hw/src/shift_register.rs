use core::fmt::Debug;

use embedded_hal::digital::v2::{InputPin, OutputPin};
use log::trace;

use crate::InputPort;

/// Reader for a parallel-in/serial-out shift register (CD74HC165 and
/// friends): `N` digital inputs multiplexed onto a single data pin, read
/// out bit by bit under clock control.
///
/// Line levels are captured once per polling cycle by
/// [`InputPort::update_buffered_inputs`]; all reads go against that
/// snapshot.
pub struct ShiftRegisterIn<const N: usize, Data, Clock, ClockEnable, Load> {
    data: Data,
    clock: Clock,
    clock_enable: ClockEnable,
    load: Load,
    buffer: u8,
}

/// The CD74HC165 serializes eight inputs.
pub type Cd74hc165<Data, Clock, ClockEnable, Load> =
    ShiftRegisterIn<8, Data, Clock, ClockEnable, Load>;

impl<const N: usize, Data, Clock, ClockEnable, Load>
    ShiftRegisterIn<N, Data, Clock, ClockEnable, Load>
where
    Data: InputPin,
    Data::Error: Debug,
    Clock: OutputPin,
    Clock::Error: Debug,
    ClockEnable: OutputPin,
    ClockEnable::Error: Debug,
    Load: OutputPin,
    Load::Error: Debug,
{
    pub fn new(data: Data, clock: Clock, clock_enable: ClockEnable, load: Load) -> Self {
        assert!(N > 0 && N <= 8, "shift register width must be 1..=8");

        Self {
            data,
            clock,
            clock_enable,
            load,
            buffer: 0,
        }
    }

    /// Drive the control lines to their idle levels. Call once before the
    /// first polling cycle.
    pub fn begin(&mut self) {
        self.clock.set_low().unwrap();
        self.load.set_high().unwrap();
        self.clock_enable.set_high().unwrap();
    }

    /// Pulse the load line to latch the parallel inputs, then open the
    /// clock-enable window for shifting.
    fn prepare_reading(&mut self) {
        self.load.set_low().unwrap();
        self.load.set_high().unwrap();
        self.clock_enable.set_low().unwrap();
    }

    /// Close the clock-enable window, protecting the bus until the next
    /// cycle.
    fn after_reading(&mut self) {
        self.clock_enable.set_high().unwrap();
    }

    /// Clock in `N` bits, least significant first: raise the clock, sample
    /// the data line, drop the clock.
    fn shift_in(&mut self) -> u8 {
        let mut value = 0;
        for bit in 0..N {
            self.clock.set_high().unwrap();
            if self.data.is_high().unwrap() {
                value |= 1 << bit;
            }
            self.clock.set_low().unwrap();
        }
        value
    }
}

impl<const N: usize, Data, Clock, ClockEnable, Load> InputPort
    for ShiftRegisterIn<N, Data, Clock, ClockEnable, Load>
where
    Data: InputPin,
    Data::Error: Debug,
    Clock: OutputPin,
    Clock::Error: Debug,
    ClockEnable: OutputPin,
    ClockEnable::Error: Debug,
    Load: OutputPin,
    Load::Error: Debug,
{
    /// Latch, shift, release. The three phases must stay in this order:
    /// the chip only presents serial data after its inputs were latched
    /// and while clock-enable is held low.
    fn update_buffered_inputs(&mut self) {
        self.prepare_reading();
        self.buffer = self.shift_in();
        self.after_reading();

        trace!("shift register snapshot {:#010b}", self.buffer);
    }

    /// Lines beyond the register's width have no input behind them and
    /// always read low.
    fn digital_read_buffered(&self, line: u8) -> bool {
        if line >= N as u8 {
            return false;
        }
        (self.buffer >> line) & 1 == 1
    }

    fn lines(&self) -> u8 {
        N as u8
    }
}
