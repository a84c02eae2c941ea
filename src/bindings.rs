//! Holds the per-key chord and color tables (what each of the 16 keys does)

use smart_leds::{colors, RGB8};

use crate::config;
use crate::keycodes::Symbol::{self, *};

/// The keycodes one key sends, all together in a single report
pub type Chord = &'static [Symbol];

/// How many regular (non-modifier) keycodes fit in one HID boot report
pub const REPORT_KEYS: usize = 6;

/// What gets sent when each key is pressed (and re-sent while it's held).
/// An empty chord is a valid "does nothing" key.
pub static KEYMAP: [Chord; config::KEY_COUNT] = [
    &[F9],         // 0
    &[Delete],     // 1
    &[Command, Y], // 2 (redo)
    &[Command, Z], // 3 (undo)
    &[Left, F11],  // 4
    &[Grave],      // 5
    &[Left],       // 6
    &[Tab],        // 7
    &[Shift, F12], // 8
    &[Insert],     // 9
    &[Down],       // 10
    &[Up],         // 11
    &[],           // 12 (spare)
    &[Backspace],  // 13
    &[Right],      // 14
    &[Space],      // 15
];

/// The static color each key's LED gets at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Off,
    Yellow,
    Green,
    Blue,
}

// NOTE: colors::GREEN is the half-bright HTML one (0,128,0) so we define our
// own full green here.  "Yellow" runs green at half power to warm it up a bit.
const RED: RGB8 = colors::RED;
const OFF: RGB8 = colors::BLACK;
const YELLOW: RGB8 = RGB8 { r: 255, g: 127, b: 0 };
const GREEN: RGB8 = RGB8 { r: 0, g: 255, b: 0 };
const BLUE: RGB8 = colors::BLUE;

impl Color {
    pub const fn rgb(self) -> RGB8 {
        match self {
            Color::Red => RED,
            Color::Off => OFF,
            Color::Yellow => YELLOW,
            Color::Green => GREEN,
            Color::Blue => BLUE,
        }
    }
}

/// Which color goes on which key (same indexing as KEYMAP)
pub static RGB_MAP: [Color; config::KEY_COUNT] = [
    Color::Red, Color::Off, Color::Yellow, Color::Yellow, // keys 0-3
    Color::Off, Color::Green, Color::Blue, Color::Off, // keys 4-7
    Color::Off, Color::Green, Color::Blue, Color::Blue, // keys 8-11
    Color::Red, Color::Off, Color::Blue, Color::Off, // keys 12-15
];

/// RGB_MAP resolved to raw RGB values, ready to write to the LED strip
pub fn led_colors() -> [RGB8; config::KEY_COUNT] {
    let mut out = [RGB8::default(); config::KEY_COUNT];
    for (i, color) in RGB_MAP.iter().enumerate() {
        out[i] = color.rgb();
    }
    out
}

/// Ways a chord can be structurally broken
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// More symbols than the fixed chord capacity
    ChordTooLong { key: usize, len: usize },
    /// More regular keycodes than one HID report can carry
    TooManyKeys { key: usize, count: usize },
    /// The same symbol twice in one chord
    DuplicateSymbol { key: usize, symbol: Symbol },
}

/// Checks a single chord for structural problems
pub fn validate_chord(key: usize, chord: Chord) -> Result<(), ConfigError> {
    if chord.len() > config::MAX_CHORD {
        return Err(ConfigError::ChordTooLong {
            key,
            len: chord.len(),
        });
    }
    let count = chord.iter().filter(|symbol| !symbol.is_modifier()).count();
    if count > REPORT_KEYS {
        return Err(ConfigError::TooManyKeys { key, count });
    }
    for (i, symbol) in chord.iter().enumerate() {
        if chord[..i].contains(symbol) {
            return Err(ConfigError::DuplicateSymbol {
                key,
                symbol: *symbol,
            });
        }
    }
    Ok(())
}

/// Checks every key's chord.  Runs once in init() before the scan timer
/// starts; a bad table is fatal (there's no sensible way to run with one).
pub fn validate() -> Result<(), ConfigError> {
    for (key, chord) in KEYMAP.iter().enumerate() {
        validate_chord(key, *chord)?;
    }
    Ok(())
}
