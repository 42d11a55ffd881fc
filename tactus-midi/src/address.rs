use core::ops::Add;

/// A MIDI destination: controller or note number, channel, and USB cable
/// number. Immutable once constructed.
///
/// Construction truncates every field into its valid range (7-bit number,
/// 4-bit channel and cable); passing out-of-range values is a caller
/// contract violation, not a runtime error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Address {
    index: u8,
    channel: u8,
    cable: u8,
}

impl Address {
    const INDEX_MASK: u8 = 0x7f;
    const CHANNEL_MASK: u8 = 0x0f;
    const CABLE_MASK: u8 = 0x0f;

    pub const fn new(index: u8, channel: u8, cable: u8) -> Self {
        Self {
            index: index & Self::INDEX_MASK,
            channel: channel & Self::CHANNEL_MASK,
            cable: cable & Self::CABLE_MASK,
        }
    }

    /// The controller or note number.
    pub const fn index(&self) -> u8 {
        self.index
    }

    pub const fn channel(&self) -> u8 {
        self.channel
    }

    pub const fn cable(&self) -> u8 {
        self.cable
    }
}

/// Element-wise addition, each sum truncated back into its field's valid
/// range. This is how bank offsets are applied to a base address.
impl Add for Address {
    type Output = Address;

    fn add(self, rhs: Address) -> Address {
        Address::new(
            self.index.wrapping_add(rhs.index),
            self.channel.wrapping_add(rhs.channel),
            self.cable.wrapping_add(rhs.cable),
        )
    }
}
