//! The equivalent of Keyberon's matrix.rs but for direct-wired switches
//! (every key gets its own GPIO so there's no matrix to walk)

use core::ops::{Index, IndexMut};

use crate::config;

/// A debounced state change on one key, in the order the scan found them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    /// The key went down (debounced)
    Press(u8),
    /// The key has been down long enough to start auto-repeating
    Hold(u8),
    /// The key came back up (debounced)
    Release(u8),
}

/// Everything one scan cycle can produce (a key can emit at most Press+Hold)
pub type EventQueue = heapless::Vec<KeyEvent, { 2 * config::KEY_COUNT }>;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct KeyState {
    pub pressed: bool,
    /// Consecutive same-reading scan counter (0 = solidly up)
    pub integrator: u8,
    /// Uptime (ms) when the debounced press registered
    pub pressed_at: u32,
    /// Whether we already told the repeat engine about this press's hold
    pub hold_sent: bool,
}

impl KeyState {
    /// Marks the key down and restarts hold tracking
    pub fn press(&mut self, now_ms: u32) {
        self.pressed = true;
        self.pressed_at = now_ms;
        self.hold_sent = false;
    }

    /// Marks the key up
    pub fn release(&mut self) {
        self.pressed = false;
    }
}

/// Struct for storing the state of each key and pretty-printing it via rprintln
#[derive(Debug, Default, Clone)]
pub struct KeyStates {
    pub states: [KeyState; config::KEY_COUNT],
    pub pressed: usize, // Records how many keys are currently pressed
}

impl KeyStates {
    pub fn press(&mut self, key: usize, now_ms: u32) {
        self.states[key].press(now_ms);
        self.pressed_add();
    }
    pub fn release(&mut self, key: usize) {
        self.states[key].release();
        self.pressed_sub();
    }
    pub fn pressed_add(&mut self) {
        self.pressed += 1;
    }
    pub fn pressed_sub(&mut self) {
        self.pressed -= 1;
    }

    /// Feeds one raw sample for one key into the debouncer, pushing whatever
    /// events the new reading produces.  The integrator has to fill
    /// (*debounce_ticks* consecutive down samples) before a press registers
    /// and fully drain before the release does, so bounces shorter than the
    /// window disappear.  Hold fires once per press at *hold_ms*.
    pub fn update(
        &mut self,
        key: usize,
        down: bool,
        now_ms: u32,
        debounce_ticks: u8,
        hold_ms: u32,
        events: &mut EventQueue,
    ) {
        if down {
            if self.states[key].integrator < debounce_ticks {
                self.states[key].integrator += 1;
                if self.states[key].integrator == debounce_ticks && !self.states[key].pressed {
                    self.press(key, now_ms);
                    let _ = events.push(KeyEvent::Press(key as u8));
                }
            }
        } else if self.states[key].integrator > 0 {
            self.states[key].integrator -= 1;
            if self.states[key].integrator == 0 && self.states[key].pressed {
                self.release(key);
                let _ = events.push(KeyEvent::Release(key as u8));
            }
        }
        if self.states[key].pressed
            && !self.states[key].hold_sent
            && now_ms.wrapping_sub(self.states[key].pressed_at) >= hold_ms
        {
            self.states[key].hold_sent = true;
            let _ = events.push(KeyEvent::Hold(key as u8));
        }
    }
}

impl Index<usize> for KeyStates {
    type Output = KeyState;

    fn index(&self, i: usize) -> &KeyState {
        &self.states[i]
    }
}

impl IndexMut<usize> for KeyStates {
    fn index_mut<'a>(&'a mut self, i: usize) -> &'a mut KeyState {
        &mut self.states[i]
    }
}

// impl our super user-friendly terminal view into the whole pad
impl core::fmt::Display for KeyStates {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let _ = f.write_str("Key states ('.'=up 'v'=down 'h'=held):\n");
        for row in 0..4 {
            for col in 0..4 {
                let i = row * 4 + col;
                let marker = if self.states[i].pressed && self.states[i].hold_sent {
                    'h'
                } else if self.states[i].pressed {
                    'v'
                } else {
                    '.'
                };
                let _ = f.write_fmt(format_args!("{:>2}:{}  ", i, marker));
            }
            let _ = f.write_str("\n");
        }
        Ok(())
    }
}
