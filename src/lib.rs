#![cfg_attr(not(test), no_std)]
#![doc = include_str!("../README.md")]

#[macro_use]
mod log;

mod error;

pub mod config;
pub mod device;
pub mod interface;
pub mod magnetometer;
pub mod params;
pub mod registers;
pub mod sample;

pub use crate::config::Config;
pub use crate::device::{Bmx160, DevicePhase, StatusSnapshot};
pub use crate::error::{Error, Result};
pub use crate::interface::{Bmx160Interface, i2c::I2cInterface};
pub use crate::params::{AccelRange, Command, GyroRange, PowerState};
pub use crate::sample::{RawSample, Sample};
