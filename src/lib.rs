#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`Cube`**: The control loop; owns every peripheral seam
//! - **`GestureDecoder`**: Counts clicks inside the command window and maps them to attributes
//! - **`Session`**: One interactive adjustment of a single channel attribute
//! - **`Display`**: Renders channel colours and blinks as frame updates on a `SerialLink`
//! - **`Persistence`**: Loads and saves channel records on an `NvStore`
//! - **`PowerSequencer`**: Countdown, driver sleep, deep sleep and restart
//! - **`TickSource`**, **`SerialLink`**, **`NvStore`**, **`PowerControl`**, **`BatteryMonitor`**:
//!   Traits to implement for your board
//!
//! Colours are `Srgb<u8>` raw channel values plus a 6-bit intensity.

#[macro_use]
mod fmt;

pub use palette::Srgb;

pub mod battery;
pub mod blink;
pub mod colors;
pub mod config;
pub mod controller;
pub mod display;
pub mod frame;
pub mod gesture;
pub mod input;
pub mod link;
pub mod power;
pub mod session;
pub mod storage;
pub mod time;
pub mod types;
pub mod wait;

pub use battery::{BatteryMonitor, BatteryStatus};
pub use blink::BlinkSequence;
pub use config::{ConfigError, CubeConfig, CubeConfigBuilder};
pub use controller::{Cube, Cycle, SessionReport};
pub use display::Display;
pub use frame::FrameError;
pub use gesture::{DecoderState, Gesture, GestureDecoder, GestureState};
pub use input::{ActiveLevel, Button};
pub use link::{LinkError, SerialLink, SpiLink};
pub use power::{PowerControl, PowerSequencer, PowerState, WakeLatch};
pub use session::{Session, SessionPhase};
pub use storage::{NvStore, Persistence, StorageError};
pub use time::{SystemTick, Tick, TickSource, Ticks};
pub use types::{
    Attribute, BlinkPattern, BlinkTarget, Channel, ChannelColor, ChannelSet, SequenceError, Status,
};
