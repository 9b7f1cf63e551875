//! The cube's control loop.
//!
//! Provides [`Cube`], which owns every peripheral seam and turns button
//! activity into displayed colours. The loop is single-threaded and polled:
//! each [`Cube::step`] renders the current colours, handles at most one press
//! and dispatches at most one gesture.
//!
//! LED write failures never stop input handling. They are logged, counted in
//! [`Cube::led_faults`] and the step carries on.

use embedded_hal::digital::InputPin;

use crate::battery::{BatteryMonitor, BatteryStatus};
use crate::blink;
use crate::colors::status_color;
use crate::config::{ConfigError, CubeConfig};
use crate::display::Display;
use crate::frame::CHANNEL_COUNT;
use crate::gesture::{Gesture, GestureDecoder};
use crate::input::Button;
use crate::link::{LinkError, SerialLink};
use crate::power::{PowerControl, PowerSequencer, PowerState, WakeLatch};
use crate::session::Session;
use crate::storage::{NvStore, Persistence, StorageError};
use crate::time::{TickSource, Ticks};
use crate::types::{Attribute, Channel, ChannelColor, Status};
use crate::wait::{wait_for, wait_ticks, wait_until};

/// Settle time after a press edge before sampling for the release.
pub const DEBOUNCE_MS: u32 = 10;

/// What one [`Cube::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Cycle {
    /// Nothing happened beyond rendering.
    Idle,
    /// A press was released before the long hold; holds the running count.
    Counted(u32),
    /// The command window closed on a count that maps to nothing.
    UnknownGesture(u32),
    /// A command session ran to completion.
    Session(SessionReport),
    /// The shutdown sequence ran and the restart request returned.
    Restarted,
}

/// Result of a completed command session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SessionReport {
    pub attribute: Attribute,
    pub channel: Channel,
    pub color: ChannelColor,
    /// Adjustment steps applied before the confirming press.
    pub steps: u32,
    /// True if the colour reached non-volatile storage.
    pub saved: bool,
}

/// The light cube.
///
/// # Type Parameters
/// * `'t` - Lifetime of the tick source and wake latch
/// * `L` - LED serial link
/// * `B` - Button input pin
/// * `S` - Non-volatile store
/// * `P` - Power controls
/// * `T` - Tick source
pub struct Cube<'t, L, B, S, P, T>
where
    L: SerialLink,
    B: InputPin,
    S: NvStore,
    P: PowerControl,
    T: TickSource,
{
    config: CubeConfig,
    display: Display<'t, L, T>,
    button: Button<B>,
    storage: Persistence<S>,
    power: P,
    sequencer: PowerSequencer,
    wake: &'t WakeLatch,
    ticks: &'t T,
    decoder: GestureDecoder,
    colors: [ChannelColor; CHANNEL_COUNT],
    last_channel: Channel,
    led_faults: u32,
}

impl<'t, L, B, S, P, T> Cube<'t, L, B, S, P, T>
where
    L: SerialLink,
    B: InputPin,
    S: NvStore,
    P: PowerControl,
    T: TickSource,
{
    /// Assembles a cube. Nothing is sent or read until [`Cube::startup`].
    ///
    /// # Errors
    /// Returns the first [`ConfigError`] found in `config`.
    pub fn new(
        config: CubeConfig,
        link: L,
        button: Button<B>,
        store: S,
        power: P,
        ticks: &'t T,
        wake: &'t WakeLatch,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            display: Display::new(link, ticks, config.tick_period_us),
            button,
            storage: Persistence::new(store, config.persistence_enabled),
            power,
            sequencer: PowerSequencer::new(config.intensity_min),
            wake,
            ticks,
            decoder: GestureDecoder::new(&config),
            colors: [ChannelColor::OFF; CHANNEL_COUNT],
            last_channel: Channel::Left,
            led_faults: 0,
            config,
        })
    }

    /// Brings the cube up.
    ///
    /// Enables the link, blinks the battery status and loads the stored
    /// colours. A master abort on the link is returned before anything else
    /// happens.
    pub fn startup<M: BatteryMonitor>(&mut self, battery: &mut M) -> Result<BatteryStatus, LinkError> {
        self.display.init()?;

        let status = battery.status();
        if !status.is_ok() {
            warn!("battery fault at startup");
        }
        let shown = self
            .display
            .blink(&blink::startup(status.is_ok(), self.config.intensity_min));
        self.led_result(shown);

        let (left, right) = self.storage.load();
        self.colors = [left, right];
        info!("started: left {}, right {}", left, right);
        Ok(status)
    }

    /// Runs one iteration of the control loop.
    pub fn step(&mut self) -> Cycle {
        let rendered = self.display.update(&self.colors);
        self.led_result(rendered);

        if self.button.is_pressed() {
            return self.handle_press();
        }

        match self.decoder.poll(self.ticks.now()) {
            None => Cycle::Idle,
            Some(Gesture::Unknown(clicks)) => {
                warn!("unknown gesture: {} clicks", clicks);
                let shown = self
                    .display
                    .blink(&blink::unknown_gesture(self.config.intensity_min));
                self.led_result(shown);
                Cycle::UnknownGesture(clicks)
            }
            Some(Gesture::Command(attribute)) => {
                let report = self.run_session(attribute);
                self.decoder.end_session();
                Cycle::Session(report)
            }
        }
    }

    /// Runs the control loop until a restart request returns.
    ///
    /// On hardware the restart never returns, so neither does this.
    pub fn run(&mut self) {
        while self.step() != Cycle::Restarted {}
    }

    fn handle_press(&mut self) -> Cycle {
        let pressed_at = self.ticks.now();
        self.decoder.press(pressed_at);
        let shown = self
            .display
            .blink(&blink::press_ack(self.config.intensity_min));
        self.led_result(shown);

        let remaining = self.decoder.hold_remaining(pressed_at, self.ticks.now());
        let button = &mut self.button;
        let released = wait_until(self.ticks, remaining, || !button.is_pressed());
        if !released.is_satisfied() {
            self.power_down();
            return Cycle::Restarted;
        }
        Cycle::Counted(self.decoder.gesture().click_count)
    }

    fn power_down(&mut self) {
        self.decoder.reset();
        self.sequencer
            .shutdown(&mut self.display, &mut self.power, self.wake);
    }

    fn run_session(&mut self, attribute: Attribute) -> SessionReport {
        let mut session = Session::new(attribute, self.last_channel);
        info!("session: {} on {}", attribute, session.channel());

        self.select_channel(&mut session);
        self.last_channel = session.channel();

        session.begin_adjusting();
        self.adjust(&mut session);

        session.commit();
        let channel = session.channel();
        let color = self.colors[channel.index()];
        let saved = match self.storage.save(channel, color) {
            Ok(()) => true,
            Err(StorageError::Disabled) => false,
            Err(err) => {
                warn!("{} not saved: {}", channel, err);
                false
            }
        };

        let shown = self.display.blink(&blink::confirmation(channel, color));
        self.led_result(shown);
        let button = &mut self.button;
        wait_for(|| !button.is_pressed());

        SessionReport {
            attribute,
            channel,
            color,
            steps: session.steps(),
            saved,
        }
    }

    /// Shows the target channel and lets presses toggle it. Each press
    /// restarts the command window; the window closing fixes the channel.
    fn select_channel(&mut self, session: &mut Session) {
        let window = self.config.command_window();
        let marker = status_color(Status::Ready, self.config.intensity_min);
        loop {
            let shown = self.display.show(session.channel().into(), marker);
            self.led_result(shown);
            let button = &mut self.button;
            if !wait_until(self.ticks, window, || button.is_pressed()).is_satisfied() {
                return;
            }
            session.toggle_channel();
            trace!("channel toggled to {}", session.channel());
            self.wait_release();
        }
    }

    /// Steps the attribute until a press arrives. The press may land in the
    /// middle of a step delay.
    fn adjust(&mut self, session: &mut Session) {
        let delay = session.step_delay(&self.config);
        loop {
            if self.button.is_pressed() {
                return;
            }
            let color = session.step(&mut self.colors, &self.config);
            let shown = self.display.show(session.channel().into(), color);
            self.led_result(shown);
            let button = &mut self.button;
            wait_until(self.ticks, delay, || button.is_pressed());
        }
    }

    fn wait_release(&mut self) {
        wait_ticks(self.ticks, self.debounce());
        let button = &mut self.button;
        wait_for(|| !button.is_pressed());
    }

    fn debounce(&self) -> Ticks {
        self.config.ticks(DEBOUNCE_MS)
    }

    fn led_result(&mut self, result: Result<(), LinkError>) {
        if let Err(err) = result {
            self.led_faults = self.led_faults.wrapping_add(1);
            warn!("led write failed: {}", err);
        }
    }

    /// Current colour of both channels.
    pub fn colors(&self) -> &[ChannelColor; CHANNEL_COUNT] {
        &self.colors
    }

    pub fn config(&self) -> &CubeConfig {
        &self.config
    }

    /// Channel the next session starts its selection on.
    pub fn last_channel(&self) -> Channel {
        self.last_channel
    }

    pub fn power_state(&self) -> PowerState {
        self.sequencer.state()
    }

    pub fn decoder(&self) -> &GestureDecoder {
        &self.decoder
    }

    pub fn display(&self) -> &Display<'t, L, T> {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut Display<'t, L, T> {
        &mut self.display
    }

    /// LED writes that failed since the cube was assembled.
    pub fn led_faults(&self) -> u32 {
        self.led_faults
    }

    pub fn storage(&self) -> &Persistence<S> {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut Persistence<S> {
        &mut self.storage
    }

    pub fn power(&self) -> &P {
        &self.power
    }
}
