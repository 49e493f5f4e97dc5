//! Strongly typed parameter enumerations for the BMX160 driver.
//!
//! Range enums carry the datasheet register encoding as their discriminant and
//! know their LSB-to-unit scale factor. The integer selectors accepted by
//! [`Bmx160::set_accel_range`](crate::Bmx160::set_accel_range) and
//! [`Bmx160::set_gyro_range`](crate::Bmx160::set_gyro_range) are a separate
//! numbering, mapped by [`AccelRange::from_code`] and [`GyroRange::from_code`].
//!
//! # Examples
//!
//! ```rust
//! use bmx160::params::{AccelRange, GyroRange};
//!
//! assert_eq!(AccelRange::from_code(2), Some(AccelRange::G8));
//! assert_eq!(GyroRange::from_code(0), Some(GyroRange::Dps125));
//! assert_eq!(GyroRange::from_code(99), None);
//! ```

use modular_bitfield::prelude::Specifier;

use crate::registers::{
    CMD_FIFO_FLUSH, CMD_INT_RESET, CMD_PROG_NVM, CMD_SOFT_RESET, CMD_START_FOC,
    CMD_STEP_CNT_CLR,
};

/// Magnetometer resolution in µT per LSB.
pub const MAG_UT_PER_LSB: f64 = 0.30;

/// Conversion factor from g to m/s² applied to accelerometer output.
pub const GRAVITY: f64 = 9.8;

/// Accelerometer g-range selections encoded in `ACC_RANGE[3:0]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 4]
pub enum AccelRange {
    /// ±2 g.
    #[default]
    G2 = 0b0011,
    /// ±4 g.
    G4 = 0b0101,
    /// ±8 g.
    G8 = 0b1000,
    /// ±16 g.
    G16 = 0b1100,
}

impl AccelRange {
    /// Maps the integer range selector (0 = ±2 g … 3 = ±16 g).
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::G2),
            1 => Some(Self::G4),
            2 => Some(Self::G8),
            3 => Some(Self::G16),
            _ => None,
        }
    }

    /// Returns the resolution in g per LSB.
    pub const fn g_per_lsb(self) -> f64 {
        match self {
            Self::G2 => 0.000_061_035_16,
            Self::G4 => 0.000_122_070_31,
            Self::G8 => 0.000_244_140_62,
            Self::G16 => 0.000_488_281_25,
        }
    }

    /// Returns the full-scale magnitude in g.
    pub const fn full_scale_g(self) -> u8 {
        match self {
            Self::G2 => 2,
            Self::G4 => 4,
            Self::G8 => 8,
            Self::G16 => 16,
        }
    }
}

/// Gyroscope angular-rate ranges encoded in `GYR_RANGE[2:0]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 3]
pub enum GyroRange {
    /// ±2000 °/s.
    Dps2000 = 0b000,
    /// ±1000 °/s.
    Dps1000 = 0b001,
    /// ±500 °/s.
    Dps500 = 0b010,
    /// ±250 °/s.
    #[default]
    Dps250 = 0b011,
    /// ±125 °/s.
    Dps125 = 0b100,
}

impl GyroRange {
    /// Maps the integer range selector (0 = ±125 °/s … 4 = ±2000 °/s).
    ///
    /// The selector counts upwards in range and is unrelated to the register
    /// encoding, which counts downwards.
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Dps125),
            1 => Some(Self::Dps250),
            2 => Some(Self::Dps500),
            3 => Some(Self::Dps1000),
            4 => Some(Self::Dps2000),
            _ => None,
        }
    }

    /// Returns the resolution in °/s per LSB.
    pub const fn dps_per_lsb(self) -> f64 {
        match self {
            Self::Dps125 => 0.003_811_097_5,
            Self::Dps250 => 0.007_621_951_2,
            Self::Dps500 => 0.015_243_902_4,
            Self::Dps1000 => 0.030_487_804_8,
            Self::Dps2000 => 0.060_975_609_7,
        }
    }
}

/// Power state of one sensor as reported by `PMU_STATUS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerState {
    /// Suspended.
    Suspend,
    /// Normal operation.
    Normal,
    /// Low-power operation (accelerometer and magnetometer interface only).
    LowPower,
    /// Fast start-up (gyroscope only).
    FastStartUp,
    /// Encoding marked reserved for this sensor.
    Reserved(u8),
}

impl PowerState {
    /// Decodes the accelerometer `acc_pmu_status` field.
    pub const fn from_accel_bits(bits: u8) -> Self {
        match bits {
            0b00 => Self::Suspend,
            0b01 => Self::Normal,
            0b10 => Self::LowPower,
            other => Self::Reserved(other),
        }
    }

    /// Decodes the gyroscope `gyr_pmu_status` field.
    pub const fn from_gyro_bits(bits: u8) -> Self {
        match bits {
            0b00 => Self::Suspend,
            0b01 => Self::Normal,
            0b11 => Self::FastStartUp,
            other => Self::Reserved(other),
        }
    }

    /// Decodes the magnetometer interface `mag_pmu_status` field.
    pub const fn from_mag_bits(bits: u8) -> Self {
        // Same layout as the accelerometer field.
        Self::from_accel_bits(bits)
    }
}

/// Non-mode commands accepted by the `CMD` register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Start fast offset compensation.
    StartFoc,
    /// Write the NVM backed registers into NVM.
    ProgramNvm,
    /// Clear FIFO content.
    FifoFlush,
    /// Reset the interrupt engine.
    InterruptReset,
    /// Clear the step counter.
    StepCounterClear,
    /// Soft reset; all user configuration is lost.
    SoftReset,
}

impl Command {
    /// Returns the byte written to `CMD`.
    pub const fn code(self) -> u8 {
        match self {
            Self::StartFoc => CMD_START_FOC,
            Self::ProgramNvm => CMD_PROG_NVM,
            Self::FifoFlush => CMD_FIFO_FLUSH,
            Self::InterruptReset => CMD_INT_RESET,
            Self::StepCounterClear => CMD_STEP_CNT_CLR,
            Self::SoftReset => CMD_SOFT_RESET,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accel_codes_map_to_datasheet_scales() {
        let expected = [
            (0, AccelRange::G2, 0.000_061_035_16),
            (1, AccelRange::G4, 0.000_122_070_31),
            (2, AccelRange::G8, 0.000_244_140_62),
            (3, AccelRange::G16, 0.000_488_281_25),
        ];

        for (code, range, scale) in expected {
            assert_eq!(AccelRange::from_code(code), Some(range));
            assert_eq!(range.g_per_lsb(), scale);
            let lsb_per_g = 32_768.0 / range.full_scale_g() as f64;
            assert!((range.g_per_lsb() * lsb_per_g - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn gyro_codes_count_up_in_range() {
        let expected = [
            (0, GyroRange::Dps125, 0.003_811_097_5),
            (1, GyroRange::Dps250, 0.007_621_951_2),
            (2, GyroRange::Dps500, 0.015_243_902_4),
            (3, GyroRange::Dps1000, 0.030_487_804_8),
            (4, GyroRange::Dps2000, 0.060_975_609_7),
        ];

        for (code, range, scale) in expected {
            assert_eq!(GyroRange::from_code(code), Some(range));
            assert_eq!(range.dps_per_lsb(), scale);
        }
    }

    #[test]
    fn unknown_codes_are_rejected() {
        assert_eq!(AccelRange::from_code(4), None);
        assert_eq!(AccelRange::from_code(99), None);
        assert_eq!(GyroRange::from_code(5), None);
        assert_eq!(GyroRange::from_code(-1), None);
    }

    #[test]
    fn out_of_byte_codes_are_rejected() {
        // 259 and 260 alias 3 and 4 once truncated to a byte.
        assert_eq!(AccelRange::from_code(259), None);
        assert_eq!(GyroRange::from_code(260), None);
        assert_eq!(AccelRange::from_code(i32::MIN), None);
        assert_eq!(GyroRange::from_code(i32::MAX), None);
    }

    #[test]
    fn scale_factors_keep_full_double_precision() {
        assert_eq!(GyroRange::Dps250.dps_per_lsb().to_bits(), 0.007_621_951_2_f64.to_bits());
        assert_eq!(GyroRange::Dps2000.dps_per_lsb().to_bits(), 0.060_975_609_7_f64.to_bits());
        assert_eq!(AccelRange::G4.g_per_lsb().to_bits(), 0.000_122_070_31_f64.to_bits());
        assert_eq!(MAG_UT_PER_LSB.to_bits(), 0.30_f64.to_bits());
        assert_eq!(GRAVITY.to_bits(), 9.8_f64.to_bits());
    }

    #[test]
    fn defaults_are_2g_and_250dps() {
        assert_eq!(AccelRange::default(), AccelRange::G2);
        assert_eq!(GyroRange::default(), GyroRange::Dps250);
    }

    #[test]
    fn register_encodings_follow_datasheet() {
        assert_eq!(AccelRange::G2 as u8, 0x03);
        assert_eq!(AccelRange::G16 as u8, 0x0C);
        assert_eq!(GyroRange::Dps2000 as u8, 0x00);
        assert_eq!(GyroRange::Dps125 as u8, 0x04);
    }

    #[test]
    fn pmu_fields_decode_per_sensor() {
        assert_eq!(PowerState::from_accel_bits(0b10), PowerState::LowPower);
        assert_eq!(PowerState::from_gyro_bits(0b10), PowerState::Reserved(0b10));
        assert_eq!(PowerState::from_gyro_bits(0b11), PowerState::FastStartUp);
        assert_eq!(PowerState::from_mag_bits(0b01), PowerState::Normal);
    }

    #[test]
    fn command_codes() {
        assert_eq!(Command::StartFoc.code(), 0x03);
        assert_eq!(Command::ProgramNvm.code(), 0xA0);
        assert_eq!(Command::FifoFlush.code(), 0xB0);
        assert_eq!(Command::InterruptReset.code(), 0xB1);
        assert_eq!(Command::StepCounterClear.code(), 0xB2);
        assert_eq!(Command::SoftReset.code(), 0xB6);
    }
}
