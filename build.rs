//! Reads our Config.toml and generates userconfig.rs by converting the values to constants

use std::env;
use std::fs;
use std::path::Path;
use core::include;

// So we can use the build date for the serial number
use chrono::{DateTime, Utc};

use toml;

// A little hack so we can use our structs from config.rs without having to duplicate them here:
include!(concat!(env!("CARGO_MANIFEST_DIR"), "/src/config_structs.rs"));
// NOTE: config_structs.rs includes the serde import so we don't need it here

fn main() {
    let now: DateTime<Utc> = Utc::now();
    println!("cargo:rustc-env=SERIALNOW={}", now.timestamp()); // Used with the firmware serial number
    let out_dir = env::var_os("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("userconfig.rs");
    let mut out = String::new();
    let contents = fs::read_to_string(concat!(env!("CARGO_MANIFEST_DIR"), "/Config.toml")).unwrap();
    let decoded: Config = toml::from_str(&contents[..]).unwrap();
    // The uptime clock needs a whole (nonzero) number of ms per scan:
    if decoded.keyboard.ms_per_scan().is_none() {
        panic!(
            "Config.toml: [keyboard] scan_rate must evenly divide 1000 (got {})",
            decoded.keyboard.scan_rate
        );
    }
    // TODO: Figure out a way to iterate over configurable items instead of having them hard coded like this
    for fname in KeyboardConfig::field_names().iter() {
        let meta = &decoded.keyboard.gen_meta_tuple(fname);
        let const_out = format!(
            "pub const {}_{}: {} = {};\n",
            meta.0.to_uppercase().split("CONFIG").next().unwrap(),
            meta.1.to_uppercase(),
            meta.2,
            meta.3);
        out.push_str(&const_out);
    }
    for fname in KeysConfig::field_names().iter() {
        let meta = &decoded.keys.gen_meta_tuple(fname);
        let const_out = format!(
            "pub const {}_{}: {} = {};\n",
            meta.0.to_uppercase().split("CONFIG").next().unwrap(),
            meta.1.to_uppercase(),
            meta.2,
            meta.3);
        out.push_str(&const_out);
    }
    for fname in RepeatConfig::field_names().iter() {
        let meta = &decoded.repeat.gen_meta_tuple(fname);
        let const_out = format!(
            "pub const {}_{}: {} = {};\n",
            meta.0.to_uppercase().split("CONFIG").next().unwrap(),
            meta.1.to_uppercase(),
            meta.2,
            meta.3);
        out.push_str(&const_out);
    }
    for fname in LedsConfig::field_names().iter() {
        let meta = &decoded.leds.gen_meta_tuple(fname);
        let const_out = format!(
            "pub const {}_{}: {} = {};\n",
            meta.0.to_uppercase().split("CONFIG").next().unwrap(),
            meta.1.to_uppercase(),
            meta.2,
            meta.3);
        out.push_str(&const_out);
    }
    for fname in DevConfig::field_names().iter() {
        let meta = &decoded.dev.gen_meta_tuple(fname);
        let const_out = format!(
            "pub const {}_{}: {} = {};\n",
            meta.0.to_uppercase().split("CONFIG").next().unwrap(),
            meta.1.to_uppercase(),
            meta.2,
            meta.3);
        out.push_str(&const_out);
    }
    fs::write(&dest_path, out).unwrap();
    println!("cargo:rerun-if-changed=Config.toml");
    println!("cargo:rerun-if-changed=build.rs");
}
