use log::trace;
use tactus_midi::{Address, MidiSender};

use crate::bank::BankConfig;
use crate::{ConfigError, OutputElement};

/// Raw quadrature position source for a rotary encoder. The source
/// accumulates pulses monotonically; this crate never resets it.
pub trait PositionRead {
    fn read_position(&mut self) -> i32;
}

/// A bankable rotary encoder that sends relative MIDI deltas.
///
/// Raw pulses are quantized into whole steps of `pulses_per_step`; a
/// cycle that completes no whole step emits nothing and changes nothing,
/// so sub-step jitter never reaches the wire. The tracked previous
/// position only ever advances by whole steps, which defers (never
/// drops) any sub-step remainder.
pub struct RotaryEncoder<'a, E> {
    config: BankConfig<'a>,
    source: E,
    address: Address,
    speed_multiply: u8,
    pulses_per_step: u8,
    previous_position: i32,
}

impl<'a, E: PositionRead> RotaryEncoder<'a, E> {
    pub fn new(
        config: BankConfig<'a>,
        source: E,
        address: Address,
        speed_multiply: u8,
        pulses_per_step: u8,
    ) -> Result<Self, ConfigError> {
        if pulses_per_step == 0 || speed_multiply == 0 {
            return Err(ConfigError::InvalidQuantization);
        }

        Ok(Self {
            config,
            source,
            address,
            speed_multiply,
            pulses_per_step,
            previous_position: 0,
        })
    }
}

impl<'a, E: PositionRead, M: MidiSender> OutputElement<M> for RotaryEncoder<'a, E> {
    fn update(&mut self, midi: &mut M) {
        let send_address = self.config.resolve(self.address);
        let current_position = self.source.read_position();

        // Truncating division: only whole steps count, in either direction.
        let difference =
            (current_position - self.previous_position) / self.pulses_per_step as i32;
        if difference != 0 {
            trace!(
                "encoder delta {} -> {:?}",
                difference * self.speed_multiply as i32,
                send_address
            );
            midi.send_relative(difference * self.speed_multiply as i32, send_address);
            self.previous_position += difference * self.pulses_per_step as i32;
        }
    }
}
