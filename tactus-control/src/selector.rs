use tactus_hw::{IncrementEvent, IncrementRead};

use crate::bank::Bank;

/// Advances a bank's setting on button presses, with or without
/// wraparound at the last setting.
///
/// The selector queries its increment source exactly once per polling
/// cycle; any cycle without an increment edge leaves the bank untouched.
/// State is fully visible after one `update` call.
pub struct IncrementSelector<'a, B> {
    bank: &'a Bank,
    button: B,
    wrap: bool,
}

impl<'a, B: IncrementRead> IncrementSelector<'a, B> {
    pub fn new(bank: &'a Bank, button: B, wrap: bool) -> Self {
        Self { bank, button, wrap }
    }

    /// Input-setup hook, called once before the first polling cycle. A
    /// debounced button source needs no configuration, so this does
    /// nothing; it exists so selectors share the lifecycle of the output
    /// elements they sit next to.
    pub fn begin(&mut self) {}

    pub fn update(&mut self) {
        if self.button.read_increment() == IncrementEvent::Increment {
            self.increment();
        }
    }

    pub fn increment(&self) {
        let mut setting = self.bank.setting() + 1;
        if setting == self.bank.num_settings() {
            setting = if self.wrap { 0 } else { setting - 1 };
        }
        self.bank.set(setting);
    }
}
