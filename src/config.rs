//! Configurable constants

use core::include;

include!(concat!(env!("OUT_DIR"), "/userconfig.rs"));

// These will never change so they're here instead of in the Config.toml:
/// Number of keys (and LEDs) on the pad; fixed by the PCB (4x4)
pub const KEY_COUNT: usize = 16;
/// Milliseconds of uptime per scan cycle (build.rs rejects scan rates that
/// don't divide into whole ms)
pub const MS_PER_SCAN: u32 = 1_000 / KEYBOARD_SCAN_RATE;
/// Most symbols one chord can hold (one HID report: 6 keys + modifiers)
pub const MAX_CHORD: usize = 8;

/* Brightness notes:
 * At 32 the whole pad draws ~120mA with every LED lit
 * At 64 it's ~210mA
 * At 128 it creeps toward the 500mA we ask the host for, so the
 * default stays conservative. Black Pill without LEDs: 32mA
*/
