use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;
use std::sync::Once;

use embedded_hal::digital::v2::{InputPin, OutputPin};
use tactus_hw::{
    DebounceError, Debouncer, IncrementButton, IncrementEvent, IncrementRead, InputPort, PortLine,
    ShiftRegisterIn,
};

static INIT: Once = Once::new();

fn init_logger() {
    INIT.call_once(|| {
        env_logger::init();
    });
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Wire {
    Clock,
    ClockEnable,
    Load,
}

/// Everything the driver does on the bus, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BusEvent {
    Write(Wire, bool),
    SampleData,
}

type BusLog = Rc<RefCell<Vec<BusEvent>>>;

struct LogPin {
    wire: Wire,
    log: BusLog,
}

impl OutputPin for LogPin {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Infallible> {
        self.log.borrow_mut().push(BusEvent::Write(self.wire, false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.log.borrow_mut().push(BusEvent::Write(self.wire, true));
        Ok(())
    }
}

/// Serves a scripted bit stream, one bit per sample, and logs each sample.
struct ScriptedDataPin {
    bits: Rc<RefCell<VecDeque<bool>>>,
    log: BusLog,
}

impl InputPin for ScriptedDataPin {
    type Error = Infallible;

    fn is_high(&self) -> Result<bool, Infallible> {
        self.log.borrow_mut().push(BusEvent::SampleData);
        Ok(self.bits.borrow_mut().pop_front().unwrap_or(false))
    }

    fn is_low(&self) -> Result<bool, Infallible> {
        self.is_high().map(|level| !level)
    }
}

fn scripted_register<const N: usize>(
    bits: &[bool],
) -> (
    ShiftRegisterIn<N, ScriptedDataPin, LogPin, LogPin, LogPin>,
    Rc<RefCell<VecDeque<bool>>>,
    BusLog,
) {
    let log: BusLog = Rc::new(RefCell::new(Vec::new()));
    let stream = Rc::new(RefCell::new(VecDeque::from_iter(bits.iter().copied())));

    let data = ScriptedDataPin {
        bits: Rc::clone(&stream),
        log: Rc::clone(&log),
    };
    let clock = LogPin {
        wire: Wire::Clock,
        log: Rc::clone(&log),
    };
    let clock_enable = LogPin {
        wire: Wire::ClockEnable,
        log: Rc::clone(&log),
    };
    let load = LogPin {
        wire: Wire::Load,
        log: Rc::clone(&log),
    };

    (
        ShiftRegisterIn::new(data, clock, clock_enable, load),
        stream,
        log,
    )
}

#[test]
fn test_begin_drives_idle_levels() {
    init_logger();

    let (mut register, _, log) = scripted_register::<8>(&[]);
    register.begin();

    assert_eq!(
        *log.borrow(),
        vec![
            BusEvent::Write(Wire::Clock, false),
            BusEvent::Write(Wire::Load, true),
            BusEvent::Write(Wire::ClockEnable, true),
        ]
    );
}

#[test]
fn test_update_sequences_load_shift_release() {
    init_logger();

    let (mut register, _, log) = scripted_register::<2>(&[true, false]);
    register.begin();
    log.borrow_mut().clear();

    register.update_buffered_inputs();

    // Latch pulse, clock-enable window, two clocked samples, release.
    // Reordering any of this breaks the chip protocol.
    assert_eq!(
        *log.borrow(),
        vec![
            BusEvent::Write(Wire::Load, false),
            BusEvent::Write(Wire::Load, true),
            BusEvent::Write(Wire::ClockEnable, false),
            BusEvent::Write(Wire::Clock, true),
            BusEvent::SampleData,
            BusEvent::Write(Wire::Clock, false),
            BusEvent::Write(Wire::Clock, true),
            BusEvent::SampleData,
            BusEvent::Write(Wire::Clock, false),
            BusEvent::Write(Wire::ClockEnable, true),
        ]
    );
}

#[test]
fn test_bits_assemble_least_significant_first() {
    init_logger();

    // First sampled bit lands on line 0.
    let (mut register, _, _) = scripted_register::<8>(&[
        true, false, true, true, false, false, false, true,
    ]);
    register.begin();
    register.update_buffered_inputs();

    assert!(register.digital_read_buffered(0));
    assert!(!register.digital_read_buffered(1));
    assert!(register.digital_read_buffered(2));
    assert!(register.digital_read_buffered(3));
    assert!(register.digital_read_buffered(7));
    assert_eq!(register.lines(), 8);
}

#[test]
fn test_reads_are_against_the_snapshot_not_the_wire() {
    init_logger();

    let (mut register, stream, log) = scripted_register::<4>(&[true, true, false, false]);
    register.begin();
    register.update_buffered_inputs();

    // New levels arrive on the wire but no cycle has captured them yet.
    stream
        .borrow_mut()
        .extend([false, false, true, true]);
    log.borrow_mut().clear();

    for _ in 0..3 {
        assert!(register.digital_read_buffered(0));
        assert!(register.digital_read_buffered(1));
        assert!(!register.digital_read_buffered(2));
    }
    // Repeated reads caused no bus traffic at all.
    assert!(log.borrow().is_empty());

    // The next cycle picks up the new snapshot wholesale.
    register.update_buffered_inputs();
    assert!(!register.digital_read_buffered(0));
    assert!(register.digital_read_buffered(2));
    assert!(register.digital_read_buffered(3));
}

#[test]
fn test_lines_beyond_the_width_read_low() {
    init_logger();

    let (mut register, _, _) = scripted_register::<4>(&[true; 4]);
    register.begin();
    register.update_buffered_inputs();

    assert!(register.digital_read_buffered(3));
    for line in [4, 7, 8, 255] {
        assert!(!register.digital_read_buffered(line));
    }
}

#[test]
fn test_analog_read_is_a_documented_zero() {
    init_logger();

    let (mut register, _, _) = scripted_register::<8>(&[true; 8]);
    register.begin();
    register.update_buffered_inputs();

    for line in 0..8 {
        assert_eq!(register.analog_read_buffered(line), 0);
    }
}

#[test]
fn test_port_line_reads_one_buffered_line() {
    init_logger();

    let (mut register, _, _) = scripted_register::<4>(&[false, true, false, true]);
    register.begin();
    register.update_buffered_inputs();

    let port = RefCell::new(register);
    let line1 = PortLine::new(&port, 1);
    let line2 = PortLine::new(&port, 2);

    assert!(line1.is_high().unwrap());
    assert!(line2.is_low().unwrap());
}

#[test]
fn test_debouncer_ignores_short_glitches() {
    init_logger();

    let mut debouncer = Debouncer::new(3);
    for _ in 0..10 {
        debouncer.update(false);
    }

    // A two-cycle spike never becomes stable.
    debouncer.update(true);
    debouncer.update(true);
    debouncer.update(false);
    for _ in 0..5 {
        debouncer.update(false);
    }

    assert!(!debouncer.stable_rising_edge());
    assert_eq!(debouncer.is_high(), Ok(false));
}

#[test]
fn test_debouncer_edges_fire_exactly_once() {
    init_logger();

    let mut debouncer = Debouncer::new(2);
    for _ in 0..5 {
        debouncer.update(false);
    }

    let mut rising = 0;
    for _ in 0..6 {
        debouncer.update(true);
        if debouncer.stable_rising_edge() {
            rising += 1;
        }
    }
    assert_eq!(rising, 1);

    let mut falling = 0;
    for _ in 0..6 {
        debouncer.update(false);
        if debouncer.stable_falling_edge() {
            falling += 1;
        }
    }
    assert_eq!(falling, 1);
}

#[test]
fn test_debouncer_reports_remaining_cycles() {
    init_logger();

    let mut debouncer = Debouncer::new(4);
    debouncer.update(true);

    match debouncer.is_high() {
        Err(DebounceError::NotStable(remaining)) => assert!(remaining > 0),
        other => panic!("expected NotStable, got {other:?}"),
    }
}

#[derive(Clone)]
struct LevelPin {
    level: Rc<Cell<bool>>,
}

impl InputPin for LevelPin {
    type Error = Infallible;

    fn is_high(&self) -> Result<bool, Infallible> {
        Ok(self.level.get())
    }

    fn is_low(&self) -> Result<bool, Infallible> {
        Ok(!self.level.get())
    }
}

#[test]
fn test_increment_button_is_one_shot_per_press() {
    init_logger();

    let level = Rc::new(Cell::new(true)); // idle high, pull-up wiring
    let mut button = IncrementButton::new(
        LevelPin {
            level: Rc::clone(&level),
        },
        2,
    );

    // Settle the idle level first.
    for _ in 0..5 {
        assert_eq!(button.read_increment(), IncrementEvent::Nothing);
    }

    // One held press yields exactly one increment.
    level.set(false);
    let mut increments = 0;
    for _ in 0..6 {
        if button.read_increment() == IncrementEvent::Increment {
            increments += 1;
        }
    }
    assert_eq!(increments, 1);

    // Release produces nothing.
    level.set(true);
    for _ in 0..6 {
        assert_eq!(button.read_increment(), IncrementEvent::Nothing);
    }
}
