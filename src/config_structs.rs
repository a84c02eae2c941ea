/// Configuration structs; separate from config.rs so we can use them in build.rs without having to duplicate them

use serde::{Serialize, Deserialize};
use num_format::{Buffer, CustomFormat};

// This lets us generate a userconfig.rs from inside build.rs that gets include!(concat!()) inside config.rs:
macro_rules! add_const_gen {
    (
        $(#[$meta:meta])*
        pub struct $struct_name:ident {
        $(
            $(#[$field_meta:meta])*
            $field_vis:vis $field_name:ident : $field_type:ty
        ),*$(,)+
        }
    ) => {
        $(#[$meta])*
        pub struct $struct_name {
            $(
                $(#[$field_meta])*
                pub $field_name : $field_type,
            )*
        }

        impl $struct_name {
            #[allow(dead_code)]
            fn field_names() -> &'static [&'static str] {
                static NAMES: &'static [&'static str] = &[$(stringify!($field_name)),*];
                NAMES
            }

            #[allow(dead_code)]
            fn gen_meta_tuple(&self, field: &'static str) -> (&str, &str, &str, Buffer) {
                let rust_format = CustomFormat::builder()
                    .separator("_")
                    .build().unwrap();
                match field {
                    $(stringify!($field_name) => {
                        let mut buf = Buffer::default();
                        buf.write_formatted(&self.$field_name, &rust_format);
                        (
                            stringify!($struct_name),
                            stringify!($field_name),
                            stringify!($field_type),
                            buf
                        )
                    }),*
                    _ => ("","","",Buffer::default())
                }
            }
        }
    }
}

add_const_gen!{
/// Configuration items related to scanning and the USB identity
#[derive(Debug, Serialize, Deserialize)]
pub struct KeyboardConfig {
    /// Rate (Hz) at which the keys are scanned (also drives USB FS polling)
    pub scan_rate: u32,
    /// The USB VID the keypad will identify itself with
    pub usb_vid: u16,
    /// The USB PID the keypad will identify itself with
    pub usb_pid: u16,
}
}

impl KeyboardConfig {
    /// Whole milliseconds of uptime per scan cycle; None when scan_rate is
    /// zero or doesn't divide 1000 evenly (fractional ms would skew every
    /// hold/repeat timing and past 1000Hz the clock couldn't advance at all)
    pub fn ms_per_scan(&self) -> Option<u32> {
        if self.scan_rate == 0 || 1_000 % self.scan_rate != 0 {
            return None;
        }
        Some(1_000 / self.scan_rate)
    }
}

add_const_gen!{
/// Configuration items related to the key switches themselves
#[derive(Debug, Serialize, Deserialize)]
pub struct KeysConfig {
    /// Scan cycles a switch must read the same before we believe it (debounce)
    pub debounce_ticks: u8,
    /// How long (ms) a key must stay down before it counts as held
    pub hold_ms: u32,
}
}

add_const_gen!{
/// Configuration items related to auto-repeat of held keys
#[derive(Debug, Serialize, Deserialize)]
pub struct RepeatConfig {
    /// Minimum time (ms) between fires of a held key's chord
    pub fire_interval_ms: u32,
}
}

add_const_gen!{
/// Configuration items related to the WS2812B-B RGB LEDs
#[derive(Debug, Serialize, Deserialize)]
pub struct LedsConfig {
    /// Brightness of the LEDs (0-255)
    pub brightness: u8,
}
}

add_const_gen!{
/// Configuration items related to development stuff
#[derive(Debug, Serialize, Deserialize)]
pub struct DevConfig {
    /// Log every key event (press/hold/fire/release) to the debugger (0 or 1)
    pub debug_keys: u8,
    /// Minimum amount of time to wait before sending debug messages to the debugger
    pub debug_refresh_interval: u16,
}
}

/// Central location for referencing and updating runtime settings
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Keyboard configuration items
    pub keyboard: KeyboardConfig,
    /// Key switch configuration items
    pub keys: KeysConfig,
    /// Auto-repeat configuration items
    pub repeat: RepeatConfig,
    /// LED configuration items
    pub leds: LedsConfig,
    /// Development configuration items (e.g. debug stuff)
    pub dev: DevConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyboard(scan_rate: u32) -> KeyboardConfig {
        KeyboardConfig {
            scan_rate,
            usb_vid: 0x16c0,
            usb_pid: 0x27db,
        }
    }

    #[test]
    fn even_scan_rates_make_a_whole_ms_clock() {
        assert_eq!(keyboard(1000).ms_per_scan(), Some(1));
        assert_eq!(keyboard(500).ms_per_scan(), Some(2));
        assert_eq!(keyboard(125).ms_per_scan(), Some(8));
        assert_eq!(keyboard(1).ms_per_scan(), Some(1000));
    }

    #[test]
    fn skewed_and_frozen_scan_rates_are_rejected() {
        // 1000/300 isn't a whole ms and at 1500Hz the clock would never move
        assert_eq!(keyboard(300).ms_per_scan(), None);
        assert_eq!(keyboard(1500).ms_per_scan(), None);
        assert_eq!(keyboard(0).ms_per_scan(), None);
    }
}
