use std::cell::{Cell, RefCell};
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::digital::v2::{InputPin, OutputPin};
use env_logger::{Builder, Env};
use log::{info, LevelFilter};
use tactus_control::{
    Bank, BankConfig, BankTarget, IncrementSelector, OutputElement, PositionRead, RotaryEncoder,
};
use tactus_hw::{Cd74hc165, IncrementButton, InputPort, PortLine, ShiftRegisterIn};
use tactus_midi::{Address, MidiSender};

/// Behavioral model of a CD74HC165: eight parallel inputs latched on the
/// load pulse, shifted out one bit per clock while clock-enable is low.
///
/// Shifts on the falling clock edge so a sample taken at clock-high sees
/// the pre-shift bit, matching the reader's LSB-first sampling window.
struct Hc165 {
    inputs: u8,
    stage: u8,
    clock: bool,
    clock_enable: bool,
}

impl Hc165 {
    fn new() -> Self {
        Self {
            inputs: 0,
            stage: 0,
            clock: false,
            clock_enable: true,
        }
    }

    fn set_input(&mut self, line: u8, level: bool) {
        if level {
            self.inputs |= 1 << line;
        } else {
            self.inputs &= !(1 << line);
        }
    }

    fn drive_load(&mut self, level: bool) {
        // Transparent while the load line is held low.
        if !level {
            self.stage = self.inputs;
        }
    }

    fn drive_clock_enable(&mut self, level: bool) {
        self.clock_enable = level;
    }

    fn drive_clock(&mut self, level: bool) {
        if self.clock && !level && !self.clock_enable {
            self.stage >>= 1;
        }
        self.clock = level;
    }

    fn data_out(&self) -> bool {
        self.stage & 1 == 1
    }
}

#[derive(Clone, Copy)]
enum ChipWire {
    Clock,
    ClockEnable,
    Load,
}

/// One control line of the simulated chip, driven by the reader.
struct ChipControlPin {
    chip: Rc<RefCell<Hc165>>,
    wire: ChipWire,
}

impl ChipControlPin {
    fn drive(&mut self, level: bool) {
        let mut chip = self.chip.borrow_mut();
        match self.wire {
            ChipWire::Clock => chip.drive_clock(level),
            ChipWire::ClockEnable => chip.drive_clock_enable(level),
            ChipWire::Load => chip.drive_load(level),
        }
    }
}

impl OutputPin for ChipControlPin {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Infallible> {
        self.drive(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.drive(true);
        Ok(())
    }
}

/// The chip's serial data output.
struct ChipDataPin {
    chip: Rc<RefCell<Hc165>>,
}

impl InputPin for ChipDataPin {
    type Error = Infallible;

    fn is_high(&self) -> Result<bool, Infallible> {
        Ok(self.chip.borrow().data_out())
    }

    fn is_low(&self) -> Result<bool, Infallible> {
        Ok(!self.chip.borrow().data_out())
    }
}

/// A quadrature source the script twists by writing the shared position.
struct SimEncoder {
    position: Rc<Cell<i32>>,
}

impl PositionRead for SimEncoder {
    fn read_position(&mut self) -> i32 {
        self.position.get()
    }
}

/// Stand-in transport: logs every relative event instead of framing MIDI.
struct LogSender {
    sent: u32,
}

impl MidiSender for LogSender {
    fn send_relative(&mut self, delta: i32, address: Address) {
        self.sent += 1;
        info!(
            "midi: relative {:+} -> number {} channel {} cable {}",
            delta,
            address.index(),
            address.channel(),
            address.cable()
        );
    }
}

fn main() {
    Builder::from_env(Env::default().default_filter_or(LevelFilter::Debug.to_string())).init();

    let chip = Rc::new(RefCell::new(Hc165::new()));

    let register: Cd74hc165<_, _, _, _> = ShiftRegisterIn::new(
        ChipDataPin {
            chip: Rc::clone(&chip),
        },
        ChipControlPin {
            chip: Rc::clone(&chip),
            wire: ChipWire::Clock,
        },
        ChipControlPin {
            chip: Rc::clone(&chip),
            wire: ChipWire::ClockEnable,
        },
        ChipControlPin {
            chip: Rc::clone(&chip),
            wire: ChipWire::Load,
        },
    );
    let port = RefCell::new(register);
    port.borrow_mut().begin();

    // Bank-increment button on shift register line 0, pull-up wiring.
    chip.borrow_mut().set_input(0, true);
    let button = IncrementButton::new(PortLine::new(&port, 0), 1);

    let bank = Bank::new(4).unwrap();
    let mut selector = IncrementSelector::new(&bank, button, true);
    selector.begin();

    // A volume encoder banked across four tracks of eight controllers,
    // and a coarse filter encoder banked across channels.
    let volume_position = Rc::new(Cell::new(0));
    let mut volume = RotaryEncoder::new(
        BankConfig::new(&bank, 8),
        SimEncoder {
            position: Rc::clone(&volume_position),
        },
        Address::new(16, 0, 0),
        1,
        4,
    )
    .unwrap();

    let filter_position = Rc::new(Cell::new(0));
    let mut filter = RotaryEncoder::new(
        BankConfig::with_target(&bank, 1, BankTarget::Channel),
        SimEncoder {
            position: Rc::clone(&filter_position),
        },
        Address::new(74, 0, 0),
        2,
        2,
    )
    .unwrap();

    let mut midi = LogSender { sent: 0 };

    let press = |down: bool| chip.borrow_mut().set_input(0, !down);

    for tick in 0..40u32 {
        // Scripted user input.
        match tick {
            4 => volume_position.set(4),   // one detent clockwise
            5 => volume_position.set(5),   // sub-step jitter, no event
            7 => volume_position.set(9),   // deferred pulse completes a step
            10 => press(true),             // bank 0 -> 1
            14 => press(false),
            16 => volume_position.set(13), // same knob, next bank's track
            20 => filter_position.set(-4), // counter-clockwise, channel bank
            24 => press(true),             // bank 1 -> 2
            28 => press(false),
            30 => filter_position.set(0),
            _ => {}
        }

        // One polling cycle: snapshot the port, then update the selector
        // and every output element in a stable order.
        port.borrow_mut().update_buffered_inputs();
        selector.update();
        volume.update(&mut midi);
        filter.update(&mut midi);
    }

    info!(
        "done: {} relative events, bank left at setting {}",
        midi.sent,
        bank.setting()
    );
}
