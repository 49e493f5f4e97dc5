//! Register map definitions for the BMX160.
//!
//! Addresses and command codes follow the BMX160 datasheet (BST-BMX160-DS000).
#![allow(unused_parens)]

use modular_bitfield::prelude::*;

use crate::params::{AccelRange, GyroRange};

/// Default 7-bit I²C address (SDO pulled to GND).
pub const I2C_ADDRESS_PRIMARY: u8 = 0x68;
/// Alternative 7-bit I²C address (SDO pulled to VDDIO).
pub const I2C_ADDRESS_SECONDARY: u8 = 0x69;

/// Value reported by `CHIP_ID`.
pub const EXPECTED_CHIP_ID: u8 = 0xD8;

/// Register address of `CHIP_ID`.
pub const REG_CHIP_ID: u8 = 0x00;
/// Register address of `ERR_REG`.
pub const REG_ERROR: u8 = 0x02;
/// Register address of `PMU_STATUS`.
pub const REG_PMU_STATUS: u8 = 0x03;
/// Register address of `DATA_MAG_X` LSB, start of the sensor data block.
pub const REG_DATA_MAG: u8 = 0x04;
/// Register address of `DATA_GYR_X` LSB.
pub const REG_DATA_GYR: u8 = 0x0C;
/// Register address of `DATA_ACC_X` LSB.
pub const REG_DATA_ACC: u8 = 0x12;
/// Register address of `SENSORTIME_0`.
pub const REG_SENSORTIME: u8 = 0x18;
/// Register address of `STATUS`.
pub const REG_STATUS: u8 = 0x1B;
/// Register address of `INT_STATUS_0`.
pub const REG_INT_STATUS_0: u8 = 0x1C;
/// Register address of `INT_STATUS_1`.
pub const REG_INT_STATUS_1: u8 = 0x1D;
/// Register address of `INT_STATUS_2`.
pub const REG_INT_STATUS_2: u8 = 0x1E;
/// Register address of `INT_STATUS_3`.
pub const REG_INT_STATUS_3: u8 = 0x1F;
/// Register address of `TEMPERATURE_0`.
pub const REG_TEMPERATURE: u8 = 0x20;
/// Register address of `FIFO_LENGTH_0`.
pub const REG_FIFO_LENGTH: u8 = 0x22;
/// Register address of `FIFO_DATA`.
pub const REG_FIFO_DATA: u8 = 0x24;
/// Register address of `ACC_CONF`.
pub const REG_ACC_CONF: u8 = 0x40;
/// Register address of `ACC_RANGE`.
pub const REG_ACC_RANGE: u8 = 0x41;
/// Register address of `GYR_CONF`.
pub const REG_GYR_CONF: u8 = 0x42;
/// Register address of `GYR_RANGE`.
pub const REG_GYR_RANGE: u8 = 0x43;
/// Register address of `MAG_CONF`.
pub const REG_MAG_CONF: u8 = 0x44;
/// Register address of `FIFO_DOWNS`.
pub const REG_FIFO_DOWNS: u8 = 0x45;
/// Register address of `FIFO_CONFIG_0`.
pub const REG_FIFO_CONFIG_0: u8 = 0x46;
/// Register address of `FIFO_CONFIG_1`.
pub const REG_FIFO_CONFIG_1: u8 = 0x47;
/// Register address of `MAG_IF_0`.
pub const REG_MAG_IF_0: u8 = 0x4C;
/// Register address of `MAG_IF_1`.
pub const REG_MAG_IF_1: u8 = 0x4D;
/// Register address of `MAG_IF_2`.
pub const REG_MAG_IF_2: u8 = 0x4E;
/// Register address of `MAG_IF_3`.
pub const REG_MAG_IF_3: u8 = 0x4F;
/// Register address of `INT_EN_0`.
pub const REG_INT_EN_0: u8 = 0x50;
/// Register address of `INT_EN_1`.
pub const REG_INT_EN_1: u8 = 0x51;
/// Register address of `INT_EN_2`.
pub const REG_INT_EN_2: u8 = 0x52;
/// Register address of `INT_OUT_CTRL`.
pub const REG_INT_OUT_CTRL: u8 = 0x53;
/// Register address of `INT_LATCH`.
pub const REG_INT_LATCH: u8 = 0x54;
/// Register address of `INT_MAP_0`.
pub const REG_INT_MAP_0: u8 = 0x55;
/// Register address of `INT_MAP_1`.
pub const REG_INT_MAP_1: u8 = 0x56;
/// Register address of `INT_MAP_2`.
pub const REG_INT_MAP_2: u8 = 0x57;
/// Register address of `INT_DATA_0`.
pub const REG_INT_DATA_0: u8 = 0x58;
/// Register address of `INT_DATA_1`.
pub const REG_INT_DATA_1: u8 = 0x59;
/// Register address of `INT_LOWHIGH_0`.
pub const REG_INT_LOWHIGH_0: u8 = 0x5A;
/// Register address of `INT_LOWHIGH_1`.
pub const REG_INT_LOWHIGH_1: u8 = 0x5B;
/// Register address of `INT_LOWHIGH_2`.
pub const REG_INT_LOWHIGH_2: u8 = 0x5C;
/// Register address of `INT_LOWHIGH_3`.
pub const REG_INT_LOWHIGH_3: u8 = 0x5D;
/// Register address of `INT_LOWHIGH_4`.
pub const REG_INT_LOWHIGH_4: u8 = 0x5E;
/// Register address of `INT_MOTION_0`.
pub const REG_INT_MOTION_0: u8 = 0x5F;
/// Register address of `INT_MOTION_1`.
pub const REG_INT_MOTION_1: u8 = 0x60;
/// Register address of `INT_MOTION_2`.
pub const REG_INT_MOTION_2: u8 = 0x61;
/// Register address of `INT_MOTION_3`.
pub const REG_INT_MOTION_3: u8 = 0x62;
/// Register address of `INT_TAP_0`.
pub const REG_INT_TAP_0: u8 = 0x63;
/// Register address of `INT_TAP_1`.
pub const REG_INT_TAP_1: u8 = 0x64;
/// Register address of `INT_ORIENT_0`.
pub const REG_INT_ORIENT_0: u8 = 0x65;
/// Register address of `INT_ORIENT_1`.
pub const REG_INT_ORIENT_1: u8 = 0x66;
/// Register address of `INT_FLAT_0`.
pub const REG_INT_FLAT_0: u8 = 0x67;
/// Register address of `INT_FLAT_1`.
pub const REG_INT_FLAT_1: u8 = 0x68;
/// Register address of `FOC_CONF`.
pub const REG_FOC_CONF: u8 = 0x69;
/// Register address of `CONF`.
pub const REG_CONF: u8 = 0x6A;
/// Register address of `IF_CONF`.
pub const REG_IF_CONF: u8 = 0x6B;
/// Register address of `PMU_TRIGGER`.
pub const REG_PMU_TRIGGER: u8 = 0x6C;
/// Register address of `SELF_TEST`.
pub const REG_SELF_TEST: u8 = 0x6D;
/// Register address of `NV_CONF`.
pub const REG_NV_CONF: u8 = 0x70;
/// Register address of `OFFSET_0`.
pub const REG_OFFSET_0: u8 = 0x71;
/// Register address of `OFFSET_1`.
pub const REG_OFFSET_1: u8 = 0x72;
/// Register address of `OFFSET_2`.
pub const REG_OFFSET_2: u8 = 0x73;
/// Register address of `OFFSET_3`.
pub const REG_OFFSET_3: u8 = 0x74;
/// Register address of `OFFSET_4`.
pub const REG_OFFSET_4: u8 = 0x75;
/// Register address of `OFFSET_5`.
pub const REG_OFFSET_5: u8 = 0x76;
/// Register address of `OFFSET_6`.
pub const REG_OFFSET_6: u8 = 0x77;
/// Register address of `STEP_CNT_0`.
pub const REG_STEP_CNT_0: u8 = 0x78;
/// Register address of `STEP_CNT_1`.
pub const REG_STEP_CNT_1: u8 = 0x79;
/// Register address of `STEP_CONF_0`.
pub const REG_STEP_CONF_0: u8 = 0x7A;
/// Register address of `STEP_CONF_1`.
pub const REG_STEP_CONF_1: u8 = 0x7B;
/// Register address of `CMD`.
pub const REG_CMD: u8 = 0x7E;

/// `CMD`: start fast offset compensation.
pub const CMD_START_FOC: u8 = 0x03;
/// `CMD`: program NVM.
pub const CMD_PROG_NVM: u8 = 0xA0;
/// `CMD`: flush FIFO.
pub const CMD_FIFO_FLUSH: u8 = 0xB0;
/// `CMD`: reset interrupt engine.
pub const CMD_INT_RESET: u8 = 0xB1;
/// `CMD`: clear step counter.
pub const CMD_STEP_CNT_CLR: u8 = 0xB2;
/// `CMD`: soft reset.
pub const CMD_SOFT_RESET: u8 = 0xB6;

/// `CMD`: accelerometer to normal mode.
pub const CMD_ACC_NORMAL: u8 = 0x11;
/// `CMD`: accelerometer to low-power mode.
pub const CMD_ACC_LOW_POWER: u8 = 0x12;
/// `CMD`: gyroscope to normal mode.
pub const CMD_GYR_NORMAL: u8 = 0x15;
/// `CMD`: gyroscope to suspend mode.
pub const CMD_GYR_SUSPEND: u8 = 0x17;
/// `CMD`: magnetometer interface to normal mode.
pub const CMD_MAG_NORMAL: u8 = 0x19;
/// `CMD`: magnetometer interface to low-power mode.
pub const CMD_MAG_LOW_POWER: u8 = 0x1B;

/// Minimal metadata exposed by every register value type.
pub trait Register {
    /// Register address as documented in the datasheet.
    const ADDRESS: u8;
    /// Power-on value defined by the datasheet.
    const RESET_VALUE: u8;
}

/// Bitfield representation of `ERR_REG` (address `0x02`).
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorRegister {
    // Chip not operable (bit 0).
    pub fatal_err: bool,
    // Error code (bits 4:1).
    pub err_code: B4,
    // Auxiliary I²C bus failure (bit 5).
    pub i2c_fail_err: bool,
    // Command dropped (bit 6).
    pub drop_cmd_err: bool,
    // Magnetometer data ready interrupt error (bit 7).
    pub mag_drdy_err: bool,
}

impl From<u8> for ErrorRegister {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<ErrorRegister> for u8 {
    fn from(value: ErrorRegister) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of `PMU_STATUS` (address `0x03`).
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PmuStatus {
    // Magnetometer interface power mode (bits 1:0).
    pub mag_pmu_status: B2,
    // Gyroscope power mode (bits 3:2).
    pub gyr_pmu_status: B2,
    // Accelerometer power mode (bits 5:4).
    pub acc_pmu_status: B2,
    #[skip]
    __: B2,
}

impl From<u8> for PmuStatus {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<PmuStatus> for u8 {
    fn from(value: PmuStatus) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of `ACC_RANGE` (address `0x41`).
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccRange {
    // g-range selection (bits 3:0).
    pub range: AccelRange,
    #[skip]
    __: B4,
}

impl From<AccRange> for u8 {
    fn from(value: AccRange) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of `GYR_RANGE` (address `0x43`).
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GyrRange {
    // Angular rate range selection (bits 2:0).
    pub range: GyroRange,
    #[skip]
    __: B5,
}

impl From<GyrRange> for u8 {
    fn from(value: GyrRange) -> Self {
        value.into_bytes()[0]
    }
}

impl Register for ErrorRegister {
    const ADDRESS: u8 = REG_ERROR;
    const RESET_VALUE: u8 = 0x00;
}

impl Register for PmuStatus {
    const ADDRESS: u8 = REG_PMU_STATUS;
    const RESET_VALUE: u8 = 0x00;
}

impl Register for AccRange {
    const ADDRESS: u8 = REG_ACC_RANGE;
    const RESET_VALUE: u8 = 0x03;
}

impl Register for GyrRange {
    const ADDRESS: u8 = REG_GYR_RANGE;
    const RESET_VALUE: u8 = 0x00;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_block_addresses_are_contiguous() {
        // mag (6) + rhall (2) precede gyro, gyro (6) precedes accel.
        assert_eq!(REG_DATA_GYR - REG_DATA_MAG, 8);
        assert_eq!(REG_DATA_ACC - REG_DATA_GYR, 6);
        assert_eq!(REG_SENSORTIME - REG_DATA_MAG, 20);
    }

    #[test]
    fn error_register_layout_matches_datasheet() {
        let err = ErrorRegister::from(0b1100_0101);
        assert!(err.fatal_err());
        assert_eq!(err.err_code(), 0b0010);
        assert!(!err.i2c_fail_err());
        assert!(err.drop_cmd_err());
        assert!(err.mag_drdy_err());
    }

    #[test]
    fn pmu_status_layout_matches_datasheet() {
        let pmu = PmuStatus::from(0b0001_0110);
        assert_eq!(pmu.acc_pmu_status(), 0b01);
        assert_eq!(pmu.gyr_pmu_status(), 0b01);
        assert_eq!(pmu.mag_pmu_status(), 0b10);
    }

    #[test]
    fn range_registers_encode_selection() {
        assert_eq!(u8::from(AccRange::new().with_range(AccelRange::G8)), 0x08);
        assert_eq!(u8::from(AccRange::new().with_range(AccelRange::G2)), AccRange::RESET_VALUE);
        assert_eq!(u8::from(GyrRange::new().with_range(GyroRange::Dps125)), 0x04);
        assert_eq!(u8::from(GyrRange::new().with_range(GyroRange::Dps2000)), GyrRange::RESET_VALUE);
    }
}
