use core::fmt::Debug;

use embedded_hal::digital::v2::InputPin;

use crate::debouncer::Debouncer;

/// What an increment-input source reports for one polling cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IncrementEvent {
    /// One press edge was detected this cycle.
    Increment,
    /// No edge this cycle.
    Nothing,
}

/// An input source that yields at most one increment per polling cycle.
/// Queried exactly once per cycle by its selector.
pub trait IncrementRead {
    fn read_increment(&mut self) -> IncrementEvent;
}

/// A debounced momentary button wired active-low (pull-up input): a stable
/// falling edge is a press and produces exactly one [`IncrementEvent::Increment`].
pub struct IncrementButton<P> {
    pin: P,
    debouncer: Debouncer,
}

impl<P> IncrementButton<P>
where
    P: InputPin,
    P::Error: Debug,
{
    /// `stable_cycles` is the number of polling cycles the raw level must
    /// hold before an edge counts, see [`Debouncer`].
    pub fn new(pin: P, stable_cycles: u32) -> Self {
        Self {
            pin,
            debouncer: Debouncer::new(stable_cycles),
        }
    }
}

impl<P> IncrementRead for IncrementButton<P>
where
    P: InputPin,
    P::Error: Debug,
{
    fn read_increment(&mut self) -> IncrementEvent {
        self.debouncer.update(self.pin.is_high().unwrap());

        if self.debouncer.stable_falling_edge() {
            IncrementEvent::Increment
        } else {
            IncrementEvent::Nothing
        }
    }
}
