//! Magnetometer bring-up through the auxiliary interface.
//!
//! The BMM150 die sits behind the BMX160's `MAG_IF_*` registers. This
//! sequence enables setup mode, puts the magnetometer into sleep, selects
//! the regular repetition preset, points the data read at `DATA_X`, and
//! returns the interface to data mode at 100 Hz.

use embedded_hal::delay::DelayNs;

use crate::device::Bmx160;
use crate::error::Result;
use crate::interface::Bmx160Interface;
use crate::registers::{REG_MAG_CONF, REG_MAG_IF_0, REG_MAG_IF_1, REG_MAG_IF_2, REG_MAG_IF_3};

/// Settle time after entering and after leaving setup mode (milliseconds).
pub const MAG_SETTLE_MS: u32 = 50;

/// `MAG_IF_0` value enabling manual (setup) mode.
const MAG_IF_SETUP_MODE: u8 = 0x80;

/// Register writes issued between the two settle delays, in order.
pub const MAG_IF_SEQUENCE: [(u8, u8); 11] = [
    // BMM150 power control: sleep mode.
    (REG_MAG_IF_3, 0x01),
    (REG_MAG_IF_2, 0x4B),
    // REPXY: 9 repetitions (regular preset).
    (REG_MAG_IF_3, 0x04),
    (REG_MAG_IF_2, 0x51),
    // REPZ: 15 repetitions.
    (REG_MAG_IF_3, 0x0E),
    (REG_MAG_IF_2, 0x52),
    // Forced mode, read burst starts at BMM150 DATA_X.
    (REG_MAG_IF_3, 0x02),
    (REG_MAG_IF_2, 0x4C),
    (REG_MAG_IF_1, 0x42),
    // 100 Hz read-out rate.
    (REG_MAG_CONF, 0x08),
    // Data mode, 8-byte burst.
    (REG_MAG_IF_0, 0x03),
];

/// Runs the magnetometer interface configuration sequence.
pub fn configure_magnetometer<IFACE, CommE>(
    device: &mut Bmx160<IFACE>,
    delay: &mut impl DelayNs,
) -> Result<(), CommE>
where
    IFACE: Bmx160Interface<Error = CommE>,
{
    let interface = device.interface_mut();

    interface.write_register(REG_MAG_IF_0, MAG_IF_SETUP_MODE)?;
    delay.delay_ms(MAG_SETTLE_MS);

    for (register, value) in MAG_IF_SEQUENCE {
        interface.write_register(register, value)?;
    }
    delay.delay_ms(MAG_SETTLE_MS);

    log_debug!("magnetometer interface configured");
    Ok(())
}
