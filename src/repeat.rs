//! The auto-repeat engine: a key held past the hold threshold re-fires its
//! chord on a fixed interval until it comes back up

use core::fmt::Write;

use crate::config;
use crate::dispatch::{self, ChordSink};
use crate::keys::KeyEvent;

pub struct RepeatEngine {
    /// Uptime (ms) each key's chord last fired; None means not repeating
    last_fired: [Option<u32>; config::KEY_COUNT],
    /// How many keys are repeating right now (lets tick bail early)
    active: usize,
}

impl RepeatEngine {
    pub const fn new() -> Self {
        Self {
            last_fired: [None; config::KEY_COUNT],
            active: 0,
        }
    }

    /// The single place every debounced key event lands
    pub fn handle_event<S: ChordSink, W: Write>(
        &mut self,
        event: KeyEvent,
        now_ms: u32,
        debug_keys: bool,
        sink: &mut S,
        debug: &mut W,
    ) {
        match event {
            KeyEvent::Press(key) => {
                // One tap right away; repeating doesn't start until hold
                dispatch::send_chord("press", key as usize, now_ms, debug_keys, sink, debug);
            }
            KeyEvent::Hold(key) => {
                let key = key as usize;
                if self.last_fired[key].is_none() {
                    self.active += 1;
                }
                self.last_fired[key] = Some(now_ms);
                dispatch::log_event("hold", key, now_ms, debug_keys, debug);
            }
            KeyEvent::Release(key) => {
                let key = key as usize;
                if self.last_fired[key].take().is_some() {
                    self.active -= 1;
                }
                dispatch::log_event("release", key, now_ms, debug_keys, debug);
            }
        }
    }

    /// Fires every due chord at most once, re-basing each key's reference on
    /// the now we actually observed (a stalled scan loop resumes on the
    /// normal cadence instead of bursting to catch up)
    pub fn tick<S: ChordSink, W: Write>(
        &mut self,
        now_ms: u32,
        fire_interval_ms: u32,
        debug_keys: bool,
        sink: &mut S,
        debug: &mut W,
    ) {
        if self.active == 0 {
            return;
        }
        for key in 0..config::KEY_COUNT {
            if let Some(last) = self.last_fired[key] {
                if now_ms.wrapping_sub(last) > fire_interval_ms {
                    self.last_fired[key] = Some(now_ms);
                    dispatch::send_chord("fire", key, now_ms, debug_keys, sink, debug);
                }
            }
        }
    }

    /// Whether the key's chord is currently auto-repeating
    pub fn is_repeating(&self, key: usize) -> bool {
        self.last_fired[key].is_some()
    }

    /// How many keys are repeating
    pub fn active(&self) -> usize {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::chord_report;
    use keyberon::key_code::KbHidReport;

    const INTERVAL: u32 = 100;

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

    fn tick(engine: &mut RepeatEngine, now_ms: u32, sink: &mut TestSink) {
        engine.tick(now_ms, INTERVAL, false, sink, &mut String::new());
    }

    fn event(engine: &mut RepeatEngine, ev: KeyEvent, now_ms: u32, sink: &mut TestSink) {
        engine.handle_event(ev, now_ms, false, sink, &mut String::new());
    }

    #[test]
    fn press_taps_once_and_does_not_touch_repeat_state() {
        let mut engine = RepeatEngine::new();
        let mut sink = TestSink::new();
        event(&mut engine, KeyEvent::Press(2), 0, &mut sink);
        assert_eq!(sink.taps.as_slice(), &[chord_report(2)]);
        assert!(!engine.is_repeating(2));
        assert_eq!(engine.active(), 0);
    }

    #[test]
    fn hold_seeds_the_reference_without_sending() {
        let mut engine = RepeatEngine::new();
        let mut sink = TestSink::new();
        event(&mut engine, KeyEvent::Hold(2), 50, &mut sink);
        assert!(sink.taps.is_empty());
        assert!(engine.is_repeating(2));
        assert_eq!(engine.active(), 1);
        // A re-delivered hold re-seeds but never double-counts
        event(&mut engine, KeyEvent::Hold(2), 60, &mut sink);
        assert_eq!(engine.active(), 1);
    }

    #[test]
    fn press_hold_fire_release_reference_timeline() {
        let mut engine = RepeatEngine::new();
        let mut sink = TestSink::new();
        // Press key 2 (redo) at t=0: one tap straight away
        event(&mut engine, KeyEvent::Press(2), 0, &mut sink);
        assert_eq!(sink.taps.len(), 1);
        // Hold observed at t=50: no tap
        event(&mut engine, KeyEvent::Hold(2), 50, &mut sink);
        assert_eq!(sink.taps.len(), 1);
        // t=160: 110ms since the seed, past the interval, fires
        tick(&mut engine, 160, &mut sink);
        assert_eq!(sink.taps.len(), 2);
        // t=200: only 40ms since the fire, nothing
        tick(&mut engine, 200, &mut sink);
        assert_eq!(sink.taps.len(), 2);
        // Release at t=220 stops the repeat
        event(&mut engine, KeyEvent::Release(2), 220, &mut sink);
        assert!(!engine.is_repeating(2));
        tick(&mut engine, 400, &mut sink);
        assert_eq!(sink.taps.len(), 2);
        // Every tap was the full Command+Y chord
        assert!(sink.taps.iter().all(|r| *r == chord_report(2)));
    }

    #[test]
    fn boundary_tick_does_not_fire() {
        let mut engine = RepeatEngine::new();
        let mut sink = TestSink::new();
        event(&mut engine, KeyEvent::Hold(4), 100, &mut sink);
        // Exactly one interval since the seed is not yet due
        tick(&mut engine, 100 + INTERVAL, &mut sink);
        assert!(sink.taps.is_empty());
        // One more millisecond is
        tick(&mut engine, 101 + INTERVAL, &mut sink);
        assert_eq!(sink.taps.len(), 1);
    }

    #[test]
    fn stall_does_not_burst() {
        let mut engine = RepeatEngine::new();
        let mut sink = TestSink::new();
        event(&mut engine, KeyEvent::Hold(4), 0, &mut sink);
        // The scan loop stalls for ten intervals; the first tick afterwards
        // fires once, not ten times
        tick(&mut engine, 1000, &mut sink);
        assert_eq!(sink.taps.len(), 1);
        // And the reference moved to the observed now
        tick(&mut engine, 1050, &mut sink);
        assert_eq!(sink.taps.len(), 1);
        tick(&mut engine, 1101, &mut sink);
        assert_eq!(sink.taps.len(), 2);
    }

    #[test]
    fn repeat_survives_uptime_wraparound() {
        let mut engine = RepeatEngine::new();
        let mut sink = TestSink::new();
        event(&mut engine, KeyEvent::Hold(5), u32::MAX - 50, &mut sink);
        // 111ms elapsed across the wrap
        tick(&mut engine, 60, &mut sink);
        assert_eq!(sink.taps.len(), 1);
    }

    #[test]
    fn keys_repeat_independently() {
        let mut engine = RepeatEngine::new();
        let mut sink = TestSink::new();
        event(&mut engine, KeyEvent::Hold(1), 0, &mut sink);
        event(&mut engine, KeyEvent::Hold(3), 60, &mut sink);
        assert_eq!(engine.active(), 2);
        tick(&mut engine, 110, &mut sink);
        assert_eq!(sink.taps.as_slice(), &[chord_report(1)]);
        tick(&mut engine, 170, &mut sink);
        assert_eq!(sink.taps.as_slice(), &[chord_report(1), chord_report(3)]);
    }

    #[test]
    fn release_is_idempotent() {
        let mut engine = RepeatEngine::new();
        let mut sink = TestSink::new();
        event(&mut engine, KeyEvent::Hold(2), 0, &mut sink);
        event(&mut engine, KeyEvent::Release(2), 10, &mut sink);
        event(&mut engine, KeyEvent::Release(2), 20, &mut sink);
        assert_eq!(engine.active(), 0);
        assert!(!engine.is_repeating(2));
        // Releasing a key that was never held is just as harmless
        event(&mut engine, KeyEvent::Release(6), 30, &mut sink);
        assert_eq!(engine.active(), 0);
    }

    #[test]
    fn noop_key_repeats_silently() {
        let mut engine = RepeatEngine::new();
        let mut sink = TestSink::new();
        // Key 12 is bound to the empty chord: it tracks state but never taps
        event(&mut engine, KeyEvent::Press(12), 0, &mut sink);
        event(&mut engine, KeyEvent::Hold(12), 750, &mut sink);
        tick(&mut engine, 900, &mut sink);
        assert!(engine.is_repeating(12));
        assert!(sink.taps.is_empty());
    }
}
