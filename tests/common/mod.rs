//! Shared test infrastructure for rgb-cube integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use core::cell::Cell;

use embedded_hal::digital::{ErrorType, InputPin};
use rgb_cube::storage::STORAGE_LEN;
use rgb_cube::{
    Button, ChannelColor, Cube, CubeConfig, Cycle, LinkError, NvStore, PowerControl, SerialLink,
    Tick, TickSource, WakeLatch,
};

// ============================================================================
// Simulated Clock
// ============================================================================

/// Tick source that advances one tick on every read.
///
/// Busy-waits in the crate poll `now()`, so simulated time moves forward
/// exactly as fast as the code under test looks at it.
pub struct SimClock {
    current: Cell<u32>,
}

impl SimClock {
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    pub fn starting_at(tick: u32) -> Self {
        Self {
            current: Cell::new(tick),
        }
    }

    /// Current time without advancing.
    pub fn peek(&self) -> u32 {
        self.current.get()
    }

    pub fn set(&self, tick: u32) {
        self.current.set(tick);
    }
}

impl TickSource for SimClock {
    fn now(&self) -> Tick {
        let tick = self.current.get();
        self.current.set(tick.wrapping_add(1));
        Tick(tick)
    }
}

// ============================================================================
// Scripted Button
// ============================================================================

/// Button input that reads high during scripted `[start, end)` tick spans.
///
/// Every read takes one tick, so loops that only poll the button still move
/// simulated time forward.
pub struct ScriptedButton<'a> {
    clock: &'a SimClock,
    presses: Vec<(u32, u32)>,
}

impl<'a> ScriptedButton<'a> {
    pub fn new(clock: &'a SimClock, presses: &[(u32, u32)]) -> Self {
        Self {
            clock,
            presses: presses.to_vec(),
        }
    }
}

impl ErrorType for ScriptedButton<'_> {
    type Error = core::convert::Infallible;
}

impl InputPin for ScriptedButton<'_> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        let now = self.clock.now().0;
        Ok(self
            .presses
            .iter()
            .any(|&(start, end)| start <= now && now < end))
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

// ============================================================================
// Recording Link
// ============================================================================

/// Serial link that records every write.
///
/// `fail_writes` fails every write on an enabled link; `fail_every` fails
/// each n-th write attempt. Failed writes are counted, not recorded.
#[derive(Default)]
pub struct RecordingLink {
    pub writes: Vec<Vec<u8>>,
    pub enabled: bool,
    pub abort_on_enable: bool,
    pub enable_calls: usize,
    pub disable_calls: usize,
    pub fail_writes: bool,
    pub fail_every: Option<usize>,
    pub attempts: usize,
    pub failed_writes: usize,
}

impl RecordingLink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn aborting() -> Self {
        Self {
            abort_on_enable: true,
            ..Self::default()
        }
    }

    pub fn last_write(&self) -> Option<&[u8]> {
        self.writes.last().map(Vec::as_slice)
    }

    /// Index of the first recorded update whose frame for `channel` is `frame`.
    pub fn position_of(&self, channel: usize, frame: [u8; 4]) -> Option<usize> {
        self.writes
            .iter()
            .position(|write| write.len() == 12 && channel_frame(write, channel) == frame)
    }
}

impl SerialLink for RecordingLink {
    fn enable(&mut self) -> Result<(), LinkError> {
        self.enable_calls += 1;
        if self.abort_on_enable {
            return Err(LinkError::MasterAbort);
        }
        self.enabled = true;
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), LinkError> {
        if !self.enabled {
            return Err(LinkError::Disabled);
        }
        self.attempts += 1;
        let scheduled = self.fail_every.is_some_and(|every| self.attempts % every == 0);
        if self.fail_writes || scheduled {
            self.failed_writes += 1;
            return Err(LinkError::Bus);
        }
        self.writes.push(bytes.to_vec());
        Ok(())
    }

    fn disable(&mut self) {
        self.disable_calls += 1;
        self.enabled = false;
    }
}

/// The frame for `channel` inside a single update.
pub fn channel_frame(update: &[u8], channel: usize) -> [u8; 4] {
    let start = 4 + 4 * channel;
    [
        update[start],
        update[start + 1],
        update[start + 2],
        update[start + 3],
    ]
}

// ============================================================================
// Memory Store
// ============================================================================

/// Erased-EEPROM stand-in that logs writes.
pub struct MemStore {
    pub bytes: [u8; STORAGE_LEN],
    pub writes: Vec<(usize, Vec<u8>)>,
    pub fail_writes: bool,
}

impl MemStore {
    pub fn erased() -> Self {
        Self {
            bytes: [0xFF; STORAGE_LEN],
            writes: Vec::new(),
            fail_writes: false,
        }
    }

    /// A store holding `left` and `right` records.
    pub fn with_records(left: ChannelColor, right: ChannelColor) -> Self {
        let mut store = Self::erased();
        store.bytes[rgb_cube::storage::LEFT_RECORD_OFFSET..][..4].copy_from_slice(&left.to_record());
        store.bytes[rgb_cube::storage::RIGHT_RECORD_OFFSET..][..4].copy_from_slice(&right.to_record());
        store
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct StoreFault;

impl NvStore for MemStore {
    type Error = StoreFault;

    fn read(&mut self, offset: usize, buf: &mut [u8]) -> Result<(), StoreFault> {
        let end = offset + buf.len();
        buf.copy_from_slice(self.bytes.get(offset..end).ok_or(StoreFault)?);
        Ok(())
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), StoreFault> {
        if self.fail_writes {
            return Err(StoreFault);
        }
        let end = offset + data.len();
        self.bytes
            .get_mut(offset..end)
            .ok_or(StoreFault)?
            .copy_from_slice(data);
        self.writes.push((offset, data.to_vec()));
        Ok(())
    }
}

// ============================================================================
// Mock Power
// ============================================================================

/// Power controls that log each call and wake immediately.
#[derive(Default)]
pub struct MockPower {
    pub calls: Vec<&'static str>,
    pub armed_at_sleep: bool,
}

impl PowerControl for MockPower {
    fn park_peripherals(&mut self) {
        self.calls.push("park");
    }

    fn arm_wake(&mut self) {
        self.calls.push("arm_wake");
    }

    fn sleep(&mut self, wake: &WakeLatch) {
        self.calls.push("sleep");
        self.armed_at_sleep = wake.is_armed();
        // the button edge that ends the sleep
        wake.notify();
        while !wake.is_woken() {}
    }

    fn restart(&mut self) {
        self.calls.push("restart");
    }
}

// ============================================================================
// Cube Assembly
// ============================================================================

pub type TestCube<'a> = Cube<'a, RecordingLink, ScriptedButton<'a>, MemStore, MockPower, SimClock>;

/// Tick by which `startup` has finished with the default configuration.
pub const AFTER_STARTUP: u32 = 2000;

pub fn build_cube<'a>(
    config: CubeConfig,
    clock: &'a SimClock,
    wake: &'a WakeLatch,
    presses: &[(u32, u32)],
    store: MemStore,
) -> TestCube<'a> {
    Cube::new(
        config,
        RecordingLink::new(),
        Button::new(ScriptedButton::new(clock, presses)),
        store,
        MockPower::default(),
        clock,
        wake,
    )
    .unwrap()
}

/// Builds a cube with the default configuration and erased storage, and
/// runs startup.
pub fn started_cube<'a>(clock: &'a SimClock, wake: &'a WakeLatch, presses: &[(u32, u32)]) -> TestCube<'a> {
    let mut cube = build_cube(CubeConfig::default(), clock, wake, presses, MemStore::erased());
    cube.startup(&mut || rgb_cube::BatteryStatus::Ok).unwrap();
    assert!(clock.peek() < AFTER_STARTUP);
    cube
}

/// Steps the cube until something other than idling or counting happens.
pub fn step_until_dispatch(cube: &mut TestCube<'_>, clock: &SimClock) -> Cycle {
    while clock.peek() < 1_000_000 {
        match cube.step() {
            Cycle::Idle | Cycle::Counted(_) => {}
            other => return other,
        }
    }
    panic!("no dispatch within the simulated time limit");
}

/// `count` short presses starting at `start`, `gap` ticks apart.
pub fn clicks(start: u32, count: u32, gap: u32) -> Vec<(u32, u32)> {
    (0..count)
        .map(|index| {
            let at = start + index * gap;
            (at, at + 50)
        })
        .collect()
}
