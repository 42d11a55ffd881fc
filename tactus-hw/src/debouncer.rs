/// Debounces a digital level by counting polling cycles: a level only
/// becomes the stable state after it has been observed unchanged for the
/// configured number of consecutive updates.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Debouncer {
    stable_cycles: u32,
    run_length: u32,
    last_raw: bool,
    stable: bool,
    previous_stable: bool,
}

impl Debouncer {
    pub fn new(stable_cycles: u32) -> Self {
        Self {
            stable_cycles,
            run_length: 0,
            last_raw: false,
            stable: false,
            previous_stable: false,
        }
    }

    /// Feed one raw sample, once per polling cycle.
    pub fn update(&mut self, raw: bool) {
        if raw != self.last_raw {
            self.run_length = 0;
        } else {
            self.run_length += 1;
        }

        self.previous_stable = self.stable;
        if self.run_length >= self.stable_cycles {
            self.stable = raw;
        }

        self.last_raw = raw;
    }

    /// True for exactly the one cycle in which the stable state went low
    /// to high.
    pub fn stable_rising_edge(&self) -> bool {
        self.stable && !self.previous_stable
    }

    /// True for exactly the one cycle in which the stable state went high
    /// to low.
    pub fn stable_falling_edge(&self) -> bool {
        !self.stable && self.previous_stable
    }

    pub fn is_high(&self) -> Result<bool, DebounceError> {
        if self.run_length >= self.stable_cycles {
            Ok(self.last_raw)
        } else {
            Err(DebounceError::NotStable(
                self.stable_cycles - self.run_length,
            ))
        }
    }

    pub fn is_low(&self) -> Result<bool, DebounceError> {
        self.is_high().map(|level| !level)
    }
}

/// The level has not been constant for long enough yet; carries the number
/// of cycles still needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DebounceError {
    NotStable(u32),
}
