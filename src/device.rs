//! High-level BMX160 device driver implementation.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::interface::i2c::I2cInterface;
use crate::interface::Bmx160Interface;
use crate::magnetometer::configure_magnetometer;
use crate::params::{AccelRange, Command, GyroRange, PowerState};
use crate::registers::{
    AccRange, ErrorRegister, GyrRange, PmuStatus, Register, CMD_ACC_LOW_POWER, CMD_ACC_NORMAL,
    CMD_GYR_NORMAL, CMD_GYR_SUSPEND, CMD_MAG_LOW_POWER, CMD_MAG_NORMAL, CMD_SOFT_RESET,
    EXPECTED_CHIP_ID, REG_CHIP_ID, REG_CMD, REG_DATA_MAG, REG_ERROR,
};
use crate::sample::{RawSample, Sample, DATA_BLOCK_LEN};
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

// Soft reset to register access (milliseconds).
const SOFT_RESET_SETTLE_MS: u32 = 15;
// Power-up settle after each normal-mode command issued by `begin`.
const ACC_NORMAL_SETTLE_MS: u32 = 50;
const GYR_NORMAL_SETTLE_MS: u32 = 100;
const MAG_NORMAL_SETTLE_MS: u32 = 10;
// Settle after every step of a low-power or wake-up transition.
const TRANSITION_SETTLE_MS: u32 = 100;

const LOW_POWER_MODES: [u8; 3] = [CMD_ACC_LOW_POWER, CMD_GYR_SUSPEND, CMD_MAG_LOW_POWER];
const NORMAL_MODES: [u8; 3] = [CMD_ACC_NORMAL, CMD_GYR_NORMAL, CMD_MAG_NORMAL];

/// Power phase as last driven by this driver.
///
/// Tracked in memory only; use [`Bmx160::read_status`] for what the device reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DevicePhase {
    /// Nothing issued yet.
    #[default]
    Unknown,
    /// Soft reset issued; sensors suspended.
    Reset,
    /// All three sensors commanded to normal mode.
    Normal,
    /// Accelerometer low power, gyroscope suspended, magnetometer low power.
    LowPower,
}

/// High-level synchronous driver for the BMX160.
pub struct Bmx160<IFACE> {
    interface: IFACE,
    config: Config,
    phase: DevicePhase,
}

/// Combined view of the `ERR_REG` and `PMU_STATUS` registers with explicit flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusSnapshot {
    /// ERR_REG[0] fatal_err.
    pub fatal_error: bool,
    /// ERR_REG[4:1] err_code.
    pub error_code: u8,
    /// ERR_REG[5] i2c_fail_err.
    pub aux_i2c_fail: bool,
    /// ERR_REG[6] drop_cmd_err.
    pub command_dropped: bool,
    /// ERR_REG[7] mag_drdy_err.
    pub mag_data_ready_error: bool,
    /// PMU_STATUS[5:4].
    pub accel: PowerState,
    /// PMU_STATUS[3:2].
    pub gyro: PowerState,
    /// PMU_STATUS[1:0].
    pub mag: PowerState,
}

impl StatusSnapshot {
    /// Builds a snapshot from the raw ERR_REG and PMU_STATUS bitfields.
    pub fn from_registers(error: ErrorRegister, pmu: PmuStatus) -> Self {
        Self {
            fatal_error: error.fatal_err(),
            error_code: error.err_code(),
            aux_i2c_fail: error.i2c_fail_err(),
            command_dropped: error.drop_cmd_err(),
            mag_data_ready_error: error.mag_drdy_err(),
            accel: PowerState::from_accel_bits(pmu.acc_pmu_status()),
            gyro: PowerState::from_gyro_bits(pmu.gyr_pmu_status()),
            mag: PowerState::from_mag_bits(pmu.mag_pmu_status()),
        }
    }
}

impl<IFACE> Bmx160<IFACE> {
    // ==================================================================
    // == Driver Construction & Ownership ===============================
    // ==================================================================
    /// Creates a new driver with ±2 g / ±250 °/s decoding.
    pub fn new(interface: IFACE) -> Self {
        Self::with_config(interface, Config::default())
    }

    /// Creates a new driver decoding with the provided ranges.
    pub fn with_config(interface: IFACE, config: Config) -> Self {
        Self {
            interface,
            config,
            phase: DevicePhase::Unknown,
        }
    }

    /// Consumes the driver and returns the owned interface.
    pub fn release(self) -> (IFACE, Config) {
        (self.interface, self.config)
    }

    /// Provides mutable access to the underlying interface.
    pub fn interface_mut(&mut self) -> &mut IFACE {
        &mut self.interface
    }

    /// Returns the phase last driven by a lifecycle operation.
    pub fn phase(&self) -> DevicePhase {
        self.phase
    }

    // ==================================================================
    // == Range Selection ================================================
    // ==================================================================
    /// Returns a shared reference to the active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the accelerometer range used for decoding.
    pub fn accel_range(&self) -> AccelRange {
        self.config.accel_range
    }

    /// Returns the gyroscope range used for decoding.
    pub fn gyro_range(&self) -> GyroRange {
        self.config.gyro_range
    }

    /// Selects the accelerometer decode scale from an integer selector.
    ///
    /// `0` = ±2 g, `1` = ±4 g, `2` = ±8 g, `3` = ±16 g. Any other value selects
    /// ±2 g. The device register is left untouched; see [`Self::program_ranges`].
    pub fn set_accel_range(&mut self, code: i32) {
        let range = AccelRange::from_code(code).unwrap_or_else(|| {
            log_debug!("unknown accel range code {}, using default", code);
            AccelRange::default()
        });
        self.select_accel_range(range);
    }

    /// Selects the gyroscope decode scale from an integer selector.
    ///
    /// `0` = ±125, `1` = ±250, `2` = ±500, `3` = ±1000, `4` = ±2000 °/s. Any
    /// other value selects ±250 °/s. The device register is left untouched.
    pub fn set_gyro_range(&mut self, code: i32) {
        let range = GyroRange::from_code(code).unwrap_or_else(|| {
            log_debug!("unknown gyro range code {}, using default", code);
            GyroRange::default()
        });
        self.select_gyro_range(range);
    }

    /// Selects the accelerometer decode scale.
    pub fn select_accel_range(&mut self, range: AccelRange) {
        self.config.accel_range = range;
    }

    /// Selects the gyroscope decode scale.
    pub fn select_gyro_range(&mut self, range: GyroRange) {
        self.config.gyro_range = range;
    }
}

impl<I2C> Bmx160<I2cInterface<I2C>>
where
    I2C: I2c,
{
    // ==================================================================
    // == I²C Convenience Constructors ==================================
    // ==================================================================
    /// Convenience constructor for an I²C bus at address `0x68`.
    pub fn new_i2c(i2c: I2C) -> Self {
        Self::new(I2cInterface::new(i2c))
    }

    /// Releases the driver, returning the I²C bus and configuration.
    pub fn release_i2c(self) -> (I2C, Config) {
        let (iface, config) = self.release();
        (iface.release(), config)
    }
}

impl<IFACE, CommE> Bmx160<IFACE>
where
    IFACE: Bmx160Interface<Error = CommE>,
{
    // ==================================================================
    // == Presence & Lifecycle ==========================================
    // ==================================================================
    /// Checks whether anything acknowledges at the device address.
    ///
    /// Bus errors are logged and reported as `false`.
    pub fn probe(&mut self) -> bool {
        match self.interface.probe() {
            Ok(()) => true,
            Err(_) => {
                log_warn!("I2C probe failed, no BMX160 present");
                false
            }
        }
    }

    /// Brings the device from power-on to all sensors in normal mode.
    ///
    /// Returns [`Error::NotPresent`] without touching any register when
    /// [`Self::probe`] fails. Otherwise soft-resets, powers the accelerometer,
    /// gyroscope and magnetometer interface up with their datasheet settle
    /// times, and configures the magnetometer.
    pub fn begin(&mut self, delay: &mut impl DelayNs) -> Result<(), CommE> {
        if !self.probe() {
            return Err(Error::NotPresent);
        }

        self.soft_reset(delay)?;

        self.write_command(CMD_ACC_NORMAL)?;
        delay.delay_ms(ACC_NORMAL_SETTLE_MS);
        self.write_command(CMD_GYR_NORMAL)?;
        delay.delay_ms(GYR_NORMAL_SETTLE_MS);
        self.write_command(CMD_MAG_NORMAL)?;
        delay.delay_ms(MAG_NORMAL_SETTLE_MS);

        configure_magnetometer(self, delay)?;

        self.phase = DevicePhase::Normal;
        log_info!("BMX160 ready");
        Ok(())
    }

    /// Issues a soft reset and waits for the device to accept commands again.
    ///
    /// Nothing is read back to confirm the reset took place.
    pub fn soft_reset(&mut self, delay: &mut impl DelayNs) -> Result<(), CommE> {
        self.write_command(CMD_SOFT_RESET)?;
        delay.delay_ms(SOFT_RESET_SETTLE_MS);
        self.phase = DevicePhase::Reset;
        Ok(())
    }

    /// Resets and reconfigures the device, leaving the accelerometer in low
    /// power, the gyroscope suspended and the magnetometer interface in low power.
    pub fn set_low_power(&mut self, delay: &mut impl DelayNs) -> Result<(), CommE> {
        self.reset_into(delay, LOW_POWER_MODES)?;
        self.phase = DevicePhase::LowPower;
        Ok(())
    }

    /// Resets and reconfigures the device with all sensors in normal mode.
    pub fn wake_up(&mut self, delay: &mut impl DelayNs) -> Result<(), CommE> {
        self.reset_into(delay, NORMAL_MODES)?;
        self.phase = DevicePhase::Normal;
        Ok(())
    }

    /// Writes an arbitrary command to `CMD` without checking its outcome.
    pub fn send_command(&mut self, command: Command) -> Result<(), CommE> {
        self.write_command(command.code())
    }

    // ==================================================================
    // == Identification & Status =======================================
    // ==================================================================
    /// Reads `CHIP_ID`.
    pub fn chip_id(&mut self) -> Result<u8, CommE> {
        Ok(self.interface.read_register(REG_CHIP_ID)?)
    }

    /// Verifies `CHIP_ID` against the BMX160 identifier.
    pub fn check_chip_id(&mut self) -> Result<(), CommE> {
        let id = self.chip_id()?;
        if id != EXPECTED_CHIP_ID {
            return Err(Error::ChipIdMismatch(id));
        }

        Ok(())
    }

    /// Returns a snapshot of the `ERR_REG` and `PMU_STATUS` registers.
    pub fn read_status(&mut self) -> Result<StatusSnapshot, CommE> {
        let mut raw = [0u8; 2];
        self.interface.read_many(REG_ERROR, &mut raw)?;

        Ok(StatusSnapshot::from_registers(
            ErrorRegister::from(raw[0]),
            PmuStatus::from(raw[1]),
        ))
    }

    // ==================================================================
    // == Range Programming =============================================
    // ==================================================================
    /// Writes the selected ranges to `ACC_RANGE` and `GYR_RANGE`.
    ///
    /// The range setters only change how samples are decoded. Call this to
    /// make the device measure with the same ranges.
    pub fn program_ranges(&mut self) -> Result<(), CommE> {
        let acc = AccRange::new().with_range(self.config.accel_range);
        let gyr = GyrRange::new().with_range(self.config.gyro_range);

        self.interface.write_register(AccRange::ADDRESS, acc.into())?;
        self.interface.write_register(GyrRange::ADDRESS, gyr.into())?;
        Ok(())
    }

    // ==================================================================
    // == Data Acquisition ==============================================
    // ==================================================================
    /// Reads the magnetometer, gyroscope and accelerometer counts in one burst.
    pub fn read_all_raw(&mut self) -> Result<RawSample, CommE> {
        let mut block = [0u8; DATA_BLOCK_LEN];
        self.interface.read_many(REG_DATA_MAG, &mut block)?;

        let raw = RawSample::from_block(&block);
        log_trace!("raw sample {}", raw);
        Ok(raw)
    }

    /// Reads all nine axes and converts them to µT, °/s and m/s².
    pub fn read_all(&mut self) -> Result<Sample, CommE> {
        let raw = self.read_all_raw()?;
        Ok(raw.to_physical(self.config.accel_range, self.config.gyro_range))
    }

    // ==================================================================
    // == Internal Helpers ==============================================
    // ==================================================================
    fn write_command(&mut self, code: u8) -> Result<(), CommE> {
        log_debug!("CMD <- {=u8:#x}", code);
        Ok(self.interface.write_register(REG_CMD, code)?)
    }

    fn reset_into(&mut self, delay: &mut impl DelayNs, modes: [u8; 3]) -> Result<(), CommE> {
        self.soft_reset(delay)?;
        delay.delay_ms(TRANSITION_SETTLE_MS);
        configure_magnetometer(self, delay)?;
        delay.delay_ms(TRANSITION_SETTLE_MS);

        for mode in modes {
            self.write_command(mode)?;
            delay.delay_ms(TRANSITION_SETTLE_MS);
        }

        Ok(())
    }
}
