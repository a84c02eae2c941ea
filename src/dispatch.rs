//! Turns chords into HID reports and hands them to whatever sink is
//! listening (the USB keyboard class on hardware, a buffer in tests)

use core::fmt::Write;

use keyberon::key_code::{KbHidReport, KeyCode};

use crate::bindings;
use crate::config;

/// Where finished chord reports go
pub trait ChordSink {
    /// Submits the full chord report followed by the all-released report so
    /// the host sees one discrete press+release
    fn tap(&mut self, report: KbHidReport);
}

/// Collects every KeyCode in the key's chord into a single report; the whole
/// chord (modifiers included) reaches the host at once
pub fn chord_report(key: usize) -> KbHidReport {
    bindings::KEYMAP[key].iter().map(|s| s.key_code()).collect()
}

/// Writes the `{event} {key} {chord} {codes} {uptime}` diagnostic line,
/// assuming the debug_keys config flag is on
pub fn log_event<W: Write>(
    event: &str,
    key: usize,
    now_ms: u32,
    debug_keys: bool,
    debug: &mut W,
) {
    if !debug_keys {
        return;
    }
    let chord = bindings::KEYMAP[key];
    let codes: heapless::Vec<KeyCode, { config::MAX_CHORD }> =
        chord.iter().map(|s| s.key_code()).collect();
    let _ = writeln!(debug, "{} {} {:?} {:?} {}", event, key, chord, codes, now_ms);
}

/// Logs the event and taps the key's chord at the sink.  Keys bound to the
/// empty chord log but generate no USB traffic.
pub fn send_chord<S: ChordSink, W: Write>(
    event: &str,
    key: usize,
    now_ms: u32,
    debug_keys: bool,
    sink: &mut S,
    debug: &mut W,
) {
    log_event(event, key, now_ms, debug_keys, debug);
    if bindings::KEYMAP[key].is_empty() {
        return;
    }
    sink.tap(chord_report(key));
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestSink {
        taps: Vec<KbHidReport>,
    }

    impl TestSink {
        fn new() -> Self {
            Self { taps: Vec::new() }
        }
    }

    impl ChordSink for TestSink {
        fn tap(&mut self, report: KbHidReport) {
            self.taps.push(report);
        }
    }

    #[test]
    fn report_collects_the_whole_chord() {
        // Key 2 is redo: Command+Y in one report
        let expected: KbHidReport = [KeyCode::LGui, KeyCode::Y].iter().copied().collect();
        assert_eq!(chord_report(2), expected);
    }

    #[test]
    fn empty_chord_report_is_all_released() {
        assert_eq!(chord_report(12), KbHidReport::default());
    }

    #[test]
    fn noop_key_logs_but_taps_nothing() {
        let mut sink = TestSink::new();
        let mut log = String::new();
        send_chord("press", 12, 42, true, &mut sink, &mut log);
        assert!(sink.taps.is_empty());
        assert_eq!(log, "press 12 [] [] 42\n");
    }

    #[test]
    fn log_line_has_the_event_key_chord_codes_and_uptime() {
        let mut sink = TestSink::new();
        let mut log = String::new();
        send_chord("press", 2, 1234, true, &mut sink, &mut log);
        assert_eq!(log, "press 2 [Command, Y] [LGui, Y] 1234\n");
        assert_eq!(sink.taps.as_slice(), &[chord_report(2)]);
    }

    #[test]
    fn disabling_debug_keys_silences_the_log_but_not_the_send() {
        let mut sink = TestSink::new();
        let mut log = String::new();
        send_chord("press", 2, 1234, false, &mut sink, &mut log);
        assert!(log.is_empty());
        assert_eq!(sink.taps.len(), 1);
    }
}
