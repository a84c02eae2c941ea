//! Riskeypad 16: the hardware-independent half of the firmware.  The keymap,
//! debouncing, chord building, and auto-repeat logic all live here so the
//! host can chew on them with a plain `cargo test`; main.rs wires them up to
//! the actual pad.

#![cfg_attr(not(test), no_std)]

pub mod bindings;
pub mod config;
pub mod config_structs;
pub mod dispatch;
pub mod keycodes;
pub mod keys;
pub mod repeat;
