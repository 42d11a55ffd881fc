use core::cell::Cell;

use log::debug;
use tactus_midi::Address;

use crate::ConfigError;

/// Shared bank state: the currently selected setting, written by one
/// selector and read by every element subscribed to the bank.
///
/// The whole surface runs on one logical thread, so a `Cell` is enough;
/// a multi-threaded host must put each shared `Bank` behind a single
/// mutual-exclusion boundary held for a full `update` call.
#[derive(Debug)]
pub struct Bank {
    num_settings: u8,
    setting: Cell<u8>,
}

impl Bank {
    /// A bank with `num_settings` settings, starting at setting 0.
    pub fn new(num_settings: u8) -> Result<Self, ConfigError> {
        Self::with_initial_setting(num_settings, 0)
    }

    pub fn with_initial_setting(num_settings: u8, setting: u8) -> Result<Self, ConfigError> {
        if num_settings == 0 {
            return Err(ConfigError::InvalidSettingCount);
        }
        if setting >= num_settings {
            return Err(ConfigError::OutOfRangeSetting);
        }

        Ok(Self {
            num_settings,
            setting: Cell::new(setting),
        })
    }

    pub fn setting(&self) -> u8 {
        self.setting.get()
    }

    pub fn num_settings(&self) -> u8 {
        self.num_settings
    }

    pub(crate) fn set(&self, setting: u8) {
        debug!("bank setting {} -> {}", self.setting.get(), setting);
        self.setting.set(setting);
    }
}

/// Which address field a bank offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BankTarget {
    /// Offset the controller/note number.
    Index,
    /// Offset the channel.
    Channel,
    /// Offset the cable number.
    Cable,
}

/// An element's subscription to a bank: which bank, how many tracks one
/// bank step offsets by, and which address field the offset lands in.
/// Read-only after construction.
#[derive(Clone, Copy)]
pub struct BankConfig<'a> {
    bank: &'a Bank,
    tracks: u8,
    target: BankTarget,
}

impl<'a> BankConfig<'a> {
    /// Subscribe with the common case: offset the controller/note number.
    pub fn new(bank: &'a Bank, tracks: u8) -> Self {
        Self::with_target(bank, tracks, BankTarget::Index)
    }

    pub fn with_target(bank: &'a Bank, tracks: u8, target: BankTarget) -> Self {
        Self {
            bank,
            tracks,
            target,
        }
    }

    /// The effective address for this cycle. Pure in the bank's current
    /// setting; recomputed every cycle because the bank may change between
    /// cycles.
    pub fn resolve(&self, base: Address) -> Address {
        let offset = self.bank.setting().wrapping_mul(self.tracks);

        base + match self.target {
            BankTarget::Index => Address::new(offset, 0, 0),
            BankTarget::Channel => Address::new(0, offset, 0),
            BankTarget::Cable => Address::new(0, 0, offset),
        }
    }
}
