//! Sensor data block decoding.
//!
//! One burst read starting at `DATA_MAG_X` returns 20 bytes:
//!
//! | offset | content                          |
//! |--------|----------------------------------|
//! | 0..6   | magnetometer X, Y, Z             |
//! | 6..8   | hall resistance (`RHALL`)        |
//! | 8..14  | gyroscope X, Y, Z                |
//! | 14..20 | accelerometer X, Y, Z            |
//!
//! Every word is little-endian; sensor words are two's complement.

use crate::params::{AccelRange, GRAVITY, GyroRange, MAG_UT_PER_LSB};

/// Length of the sensor data block read by [`Bmx160::read_all`](crate::Bmx160::read_all).
pub const DATA_BLOCK_LEN: usize = 20;

const MAG_OFFSET: usize = 0;
const RHALL_OFFSET: usize = 6;
const GYRO_OFFSET: usize = 8;
const ACCEL_OFFSET: usize = 14;

/// Combines a little-endian byte pair into a signed 16-bit count.
///
/// Equivalent to `((high << 8) | low) - 65536` whenever bit 7 of `high` is set.
#[inline]
pub const fn decode_word(low: u8, high: u8) -> i16 {
    i16::from_le_bytes([low, high])
}

/// Undecoded sensor counts from one data block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawSample {
    /// Magnetometer X, Y, Z counts.
    pub mag: [i16; 3],
    /// Hall resistance count.
    pub rhall: u16,
    /// Gyroscope X, Y, Z counts.
    pub gyro: [i16; 3],
    /// Accelerometer X, Y, Z counts.
    pub accel: [i16; 3],
}

impl RawSample {
    /// Splits a data block into its per-sensor counts.
    pub fn from_block(block: &[u8; DATA_BLOCK_LEN]) -> Self {
        Self {
            mag: triplet(block, MAG_OFFSET),
            rhall: u16::from_le_bytes([block[RHALL_OFFSET], block[RHALL_OFFSET + 1]]),
            gyro: triplet(block, GYRO_OFFSET),
            accel: triplet(block, ACCEL_OFFSET),
        }
    }

    /// Converts counts to physical units with the given ranges.
    ///
    /// Magnetometer counts use the fixed 0.30 µT/LSB resolution; accelerometer
    /// output is reported in m/s² using g = 9.8.
    pub fn to_physical(&self, accel_range: AccelRange, gyro_range: GyroRange) -> Sample {
        let gyro_scale = gyro_range.dps_per_lsb();
        let accel_scale = accel_range.g_per_lsb() * GRAVITY;

        Sample {
            mag: self.mag.map(|count| f64::from(count) * MAG_UT_PER_LSB),
            gyro: self.gyro.map(|count| f64::from(count) * gyro_scale),
            accel: self.accel.map(|count| f64::from(count) * accel_scale),
        }
    }
}

fn triplet(block: &[u8; DATA_BLOCK_LEN], offset: usize) -> [i16; 3] {
    let axis = |n: usize| decode_word(block[offset + 2 * n], block[offset + 2 * n + 1]);
    [axis(0), axis(1), axis(2)]
}

/// A reading in physical units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sample {
    /// Magnetic field X, Y, Z in µT.
    pub mag: [f64; 3],
    /// Angular rate X, Y, Z in °/s.
    pub gyro: [f64; 3],
    /// Acceleration X, Y, Z in m/s².
    pub accel: [f64; 3],
}

impl Sample {
    /// Flattens the reading as `[magX, magY, magZ, gyroX, gyroY, gyroZ, accelX, accelY, accelZ]`.
    pub fn to_array(&self) -> [f64; 9] {
        let [mx, my, mz] = self.mag;
        let [gx, gy, gz] = self.gyro;
        let [ax, ay, az] = self.accel;
        [mx, my, mz, gx, gy, gz, ax, ay, az]
    }
}

impl From<Sample> for [f64; 9] {
    fn from(sample: Sample) -> Self {
        sample.to_array()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subtraction_rule(low: u8, high: u8) -> i32 {
        let combined = ((high as i32) << 8) | low as i32;
        if high & 0x80 != 0 { combined - 65_536 } else { combined }
    }

    #[test]
    fn decode_word_boundaries() {
        assert_eq!(decode_word(0x00, 0x00), 0);
        assert_eq!(decode_word(0x00, 0x80), -32_768);
        assert_eq!(decode_word(0xFF, 0x7F), 32_767);
        assert_eq!(decode_word(0xFF, 0xFF), -1);
    }

    #[test]
    fn decode_word_matches_subtraction_rule_for_every_pattern() {
        for high in 0..=u8::MAX {
            for low in 0..=u8::MAX {
                assert_eq!(decode_word(low, high) as i32, subtraction_rule(low, high));
            }
        }
    }

    #[test]
    fn block_offsets_skip_hall_resistance() {
        let mut block = [0u8; DATA_BLOCK_LEN];
        for (i, byte) in block.iter_mut().enumerate() {
            *byte = i as u8;
        }

        let raw = RawSample::from_block(&block);
        assert_eq!(raw.mag, [0x0100, 0x0302, 0x0504]);
        assert_eq!(raw.rhall, 0x0706);
        assert_eq!(raw.gyro, [0x0908, 0x0B0A, 0x0D0C]);
        assert_eq!(raw.accel, [0x0F0E, 0x1110, 0x1312]);
    }

    #[test]
    fn physical_scaling_uses_ranges() {
        let raw = RawSample {
            mag: [10, -10, 0],
            rhall: 0,
            gyro: [131, 0, -131],
            accel: [16_384, 0, -4_096],
        };

        let sample = raw.to_physical(AccelRange::G2, GyroRange::Dps250);
        assert_eq!(sample.mag[0], 10.0 * 0.30);
        assert_eq!(sample.mag[1], -10.0 * 0.30);
        assert_eq!(sample.gyro[0], 131.0 * 0.007_621_951_2);
        assert_eq!(sample.gyro[2], -131.0 * 0.007_621_951_2);
        assert_eq!(sample.accel[0], 16_384.0 * (0.000_061_035_16 * 9.8));
        assert_eq!(sample.accel[2], -4_096.0 * (0.000_061_035_16 * 9.8));
    }

    #[test]
    fn extreme_counts_scale_in_double_precision() {
        let raw = RawSample {
            mag: [i16::MIN, i16::MAX, 0],
            rhall: 0,
            gyro: [i16::MAX, i16::MIN, 0],
            accel: [i16::MAX, i16::MIN, 0],
        };

        let sample = raw.to_physical(AccelRange::G2, GyroRange::Dps250);
        assert_eq!(sample.mag[0], -32_768.0 * 0.30);
        assert_eq!(sample.mag[1], 32_767.0 * 0.30);
        assert_eq!(sample.gyro[0], 32_767.0 * 0.007_621_951_2);
        assert_eq!(sample.gyro[1], -32_768.0 * 0.007_621_951_2);
        assert_eq!(sample.accel[0], 32_767.0 * (0.000_061_035_16 * 9.8));
        assert_eq!(sample.accel[1], -32_768.0 * (0.000_061_035_16 * 9.8));
    }

    #[test]
    fn flattening_keeps_sensor_order() {
        let sample = Sample {
            mag: [1.0, 2.0, 3.0],
            gyro: [4.0, 5.0, 6.0],
            accel: [7.0, 8.0, 9.0],
        };

        let flat: [f64; 9] = sample.into();
        assert_eq!(flat, [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
    }
}
