//! Every keycode symbol the binding tables are allowed to reference

use keyberon::key_code::KeyCode;

/// The pad's keycode vocabulary.  Chords are built from these instead of raw
/// HID usage IDs so the binding tables stay readable and can't name a code
/// that doesn't exist (the mapping below is total; there's no lookup to fail
/// at runtime).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    Backspace,
    /// The GUI/Super key (⌘ on Macs, the "Windows key" elsewhere)
    Command,
    Control,
    Delete,
    Down,
    F9,
    F11,
    F12,
    /// The ` key
    Grave,
    Insert,
    Left,
    Right,
    Shift,
    Space,
    Tab,
    Up,
    Y,
    Z,
}

impl Symbol {
    /// The HID keycode this symbol resolves to (left-hand variants for modifiers)
    pub const fn key_code(self) -> KeyCode {
        match self {
            Symbol::Backspace => KeyCode::BSpace,
            Symbol::Command => KeyCode::LGui,
            Symbol::Control => KeyCode::LCtrl,
            Symbol::Delete => KeyCode::Delete,
            Symbol::Down => KeyCode::Down,
            Symbol::F9 => KeyCode::F9,
            Symbol::F11 => KeyCode::F11,
            Symbol::F12 => KeyCode::F12,
            Symbol::Grave => KeyCode::Grave,
            Symbol::Insert => KeyCode::Insert,
            Symbol::Left => KeyCode::Left,
            Symbol::Right => KeyCode::Right,
            Symbol::Shift => KeyCode::LShift,
            Symbol::Space => KeyCode::Space,
            Symbol::Tab => KeyCode::Tab,
            Symbol::Up => KeyCode::Up,
            Symbol::Y => KeyCode::Y,
            Symbol::Z => KeyCode::Z,
        }
    }

    /// Whether this symbol lands in the modifier byte of a HID report
    /// (modifiers don't count against the 6-key report limit)
    pub const fn is_modifier(self) -> bool {
        matches!(self, Symbol::Command | Symbol::Control | Symbol::Shift)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifiers_map_to_left_hand_codes() {
        assert_eq!(Symbol::Command.key_code(), KeyCode::LGui);
        assert_eq!(Symbol::Control.key_code(), KeyCode::LCtrl);
        assert_eq!(Symbol::Shift.key_code(), KeyCode::LShift);
    }

    #[test]
    fn plain_keys_map_straight_through() {
        assert_eq!(Symbol::Y.key_code(), KeyCode::Y);
        assert_eq!(Symbol::Z.key_code(), KeyCode::Z);
        assert_eq!(Symbol::Backspace.key_code(), KeyCode::BSpace);
        assert_eq!(Symbol::Grave.key_code(), KeyCode::Grave);
        assert_eq!(Symbol::F9.key_code(), KeyCode::F9);
    }

    #[test]
    fn only_command_control_shift_are_modifiers() {
        let modifiers = [Symbol::Command, Symbol::Control, Symbol::Shift];
        for symbol in modifiers.iter() {
            assert!(symbol.is_modifier(), "{:?} should be a modifier", symbol);
        }
        let plain = [
            Symbol::Backspace,
            Symbol::Delete,
            Symbol::Down,
            Symbol::F9,
            Symbol::F11,
            Symbol::F12,
            Symbol::Grave,
            Symbol::Insert,
            Symbol::Left,
            Symbol::Right,
            Symbol::Space,
            Symbol::Tab,
            Symbol::Up,
            Symbol::Y,
            Symbol::Z,
        ];
        for symbol in plain.iter() {
            assert!(!symbol.is_modifier(), "{:?} should not be a modifier", symbol);
        }
    }
}
