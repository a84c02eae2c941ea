// #![deny(unsafe_code)]
#![no_main]
#![no_std]

//! **NOTE:** To debug this firmware you need your STM32 board connected
//! to an ST-LINK debugger and [probe-run](1).  A `.cargo/config` file is
//! included and configured with `runner = "probe-run --chip STM32F401CC"`.
//!
//! This Riskey macro pad firmware is based on Keyberon.  Sixteen ordinary
//! switches wired straight to GPIOs (no matrix, no diodes), one WS2812B-B
//! LED per key, and every key bound to a full chord that taps on press and
//! auto-repeats while held.
//!
//! You'll also need to change the pins to whatever pins you're using with
//! your own board.  The default configuration uses:
//!
//! * `PA0-PA7`: Keys 0-7 (top two rows)
//! * `PB0, PB1, PB10, PB12`: Keys 8-11
//! * `PB13, PB14, PB15, PA8`: Keys 12-15
//! * `PB5`: WS2812B-B data line (SPI3 MOSI)
//!
//! **NOTE:** Key pins use the internal pull-ups; run the other side of
//! every switch to ground.
//!
//! [1]: https://github.com/knurling-rs/probe-run

extern crate panic_halt;

use core::fmt::Write;
use core::hint::spin_loop;

// Generic embedded stuff
use embedded_hal::digital::v2::InputPin;
use rtic::app;
use rtt_target::{rtt_init, UpChannel};
use stm32f4xx_hal::otg_fs::{UsbBusType, USB};
use stm32f4xx_hal::prelude::*;
use stm32f4xx_hal::spi::{NoMiso, NoSck, Spi};
use stm32f4xx_hal::{stm32, timer};
use usb_device::bus::UsbBusAllocator;
use usb_device::class::UsbClass; // Needed for keyboard.poll() to work
use usb_device::prelude::*;

// Keyboard-specific stuff
use keyberon::key_code::KbHidReport;

// Our own stuff
mod aliases;
use riskeypad16::dispatch::ChordSink;
use riskeypad16::keys::{EventQueue, KeyStates};
use riskeypad16::repeat::RepeatEngine;
use riskeypad16::{bindings, config, config_structs};

// WS2812/smart-leds stuff
use crate::ws2812::Ws2812;
use smart_leds::{brightness, SmartLedsWrite};
use ws2812_spi as ws2812;

type UsbKeyClass = keyberon::Class<'static, UsbBusType, Leds>;

// The per-key RGBs are painted once at startup and never change, so none of
// the lock indicators get wired up to anything:
pub struct Leds;
impl keyberon::keyboard::Leds for Leds {}

/// All sixteen switch pins in one bundle so tick() can walk them by index
pub struct KeyPins {
    k0: aliases::K0,
    k1: aliases::K1,
    k2: aliases::K2,
    k3: aliases::K3,
    k4: aliases::K4,
    k5: aliases::K5,
    k6: aliases::K6,
    k7: aliases::K7,
    k8: aliases::K8,
    k9: aliases::K9,
    k10: aliases::K10,
    k11: aliases::K11,
    k12: aliases::K12,
    k13: aliases::K13,
    k14: aliases::K14,
    k15: aliases::K15,
}

impl KeyPins {
    /// True when the key's switch is closed (pulled-up pins read low on press)
    fn is_down(&self, key: usize) -> bool {
        // This was the best I could do for iteration rather than repetition :(
        let reading = match key {
            0 => self.k0.is_low(),
            1 => self.k1.is_low(),
            2 => self.k2.is_low(),
            3 => self.k3.is_low(),
            4 => self.k4.is_low(),
            5 => self.k5.is_low(),
            6 => self.k6.is_low(),
            7 => self.k7.is_low(),
            8 => self.k8.is_low(),
            9 => self.k9.is_low(),
            10 => self.k10.is_low(),
            11 => self.k11.is_low(),
            12 => self.k12.is_low(),
            13 => self.k13.is_low(),
            14 => self.k14.is_low(),
            15 => self.k15.is_low(),
            _ => Ok(false), // The PCB only has 16 keys
        };
        reading.unwrap()
    }
}

#[app(device = stm32f4xx_hal::stm32, peripherals = true)]
const APP: () = {
    struct Resources {
        config: config_structs::Config,
        debug_ch0: UpChannel,
        debug_ch1: UpChannel,
        usb_key_dev: aliases::UsbKeyDevice,
        usb_keyboard: UsbKeyClass,
        timer: timer::Timer<stm32::TIM3>,
        // Held so the SPI3/PB5 claim outlives init() even though the colors
        // are only ever painted once:
        ws: aliases::SPIWS2812B,
        key_pins: KeyPins,
        key_states: KeyStates,
        repeat: RepeatEngine,
        uptime_ms: u32,
        debug_msg_counter: u16,
    }

    // This idle loop fixes a bug that prevents flashing without the reset pin connected to the ST-LINK:
    #[idle]
    fn idle(_: idle::Context) -> ! {
        loop {
            spin_loop();
        }
    }

    #[init]
    fn init(c: init::Context) -> init::LateResources {
        // Static stuff
        static mut EP_MEMORY: [u32; 1024] = [0; 1024];
        static mut USB_BUS: Option<UsbBusAllocator<UsbBusType>> = None;

        let keyboard_config = config_structs::KeyboardConfig {
            scan_rate: config::KEYBOARD_SCAN_RATE,
            usb_vid: config::KEYBOARD_USB_VID,
            usb_pid: config::KEYBOARD_USB_PID,
        };
        let keys_config = config_structs::KeysConfig {
            debounce_ticks: config::KEYS_DEBOUNCE_TICKS,
            hold_ms: config::KEYS_HOLD_MS,
        };
        let repeat_config = config_structs::RepeatConfig {
            fire_interval_ms: config::REPEAT_FIRE_INTERVAL_MS,
        };
        let leds_config = config_structs::LedsConfig {
            brightness: config::LEDS_BRIGHTNESS,
        };
        let dev_config = config_structs::DevConfig {
            debug_keys: config::DEV_DEBUG_KEYS,
            debug_refresh_interval: config::DEV_DEBUG_REFRESH_INTERVAL,
        };
        // Load our user-configured default Config
        let config = config_structs::Config {
            keyboard: keyboard_config,
            keys: keys_config,
            repeat: repeat_config,
            leds: leds_config,
            dev: dev_config,
        };

        // Boilerplate for setting up the board
        let rcc = c.device.RCC.constrain();
        let clocks = rcc
            .cfgr
            .use_hse(25.mhz())
            .sysclk(84.mhz())
            .require_pll48clk()
            .freeze();

        // Setup a 1000Hz timer for the key scan (it also paces hold/repeat timing)
        let mut keys_timer =
            timer::Timer::tim3(c.device.TIM3, config::KEYBOARD_SCAN_RATE.hz(), clocks);
        keys_timer.listen(timer::Event::TimeOut);

        // So we can use GPIOs...
        let gpioa = c.device.GPIOA.split();
        let gpiob = c.device.GPIOB.split();

        // One pull-up input per switch; the keymap index order is baked in here
        let key_pins = KeyPins {
            k0: gpioa.pa0.into_pull_up_input(),
            k1: gpioa.pa1.into_pull_up_input(),
            k2: gpioa.pa2.into_pull_up_input(),
            k3: gpioa.pa3.into_pull_up_input(),
            k4: gpioa.pa4.into_pull_up_input(),
            k5: gpioa.pa5.into_pull_up_input(),
            k6: gpioa.pa6.into_pull_up_input(),
            k7: gpioa.pa7.into_pull_up_input(),
            k8: gpiob.pb0.into_pull_up_input(),
            k9: gpiob.pb1.into_pull_up_input(),
            k10: gpiob.pb10.into_pull_up_input(),
            k11: gpiob.pb12.into_pull_up_input(),
            k12: gpiob.pb13.into_pull_up_input(),
            k13: gpiob.pb14.into_pull_up_input(),
            k14: gpiob.pb15.into_pull_up_input(),
            k15: gpioa.pa8.into_pull_up_input(),
        };

        // Setup WS2812B-B SPI output
        let mosi = gpiob
            .pb5
            .into_alternate_af6()
            .set_speed(stm32f4xx_hal::gpio::Speed::VeryHigh);
        // Configure SPI with 3Mhz rate
        let spi = Spi::spi3(
            c.device.SPI3,
            (NoSck, NoMiso, mosi),
            ws2812::MODE,
            3_000_000.hz(),
            clocks,
        );
        let mut ws = Ws2812::new(spi);
        // The key colors are static: paint them once and let the LEDs latch
        let led_data = bindings::led_colors();
        ws.write(brightness(
            led_data.iter().cloned(),
            config::LEDS_BRIGHTNESS,
        ))
        .unwrap();

        // USB Stuff
        let usb = USB {
            // FULL SPEEEEEEEEEEEED! (aka FS)
            usb_global: c.device.OTG_FS_GLOBAL,
            usb_device: c.device.OTG_FS_DEVICE,
            usb_pwrclk: c.device.OTG_FS_PWRCLK,
            pin_dm: gpioa.pa11.into_alternate_af10(),
            pin_dp: gpioa.pa12.into_alternate_af10(),
            hclk: clocks.hclk(), // stm32f4xx_hal version 0.9+ requires this
        };
        *USB_BUS = Some(UsbBusType::new(usb, EP_MEMORY));
        let usb_bus = USB_BUS.as_ref().unwrap();

        // Setup the rest of the USB stuff
        let usb_keyboard = keyberon::new_class(usb_bus, Leds);
        let usb_vid_pid = UsbVidPid(config::KEYBOARD_USB_VID, config::KEYBOARD_USB_PID);
        let usb_key_dev = UsbDeviceBuilder::new(usb_bus, usb_vid_pid)
            .manufacturer("Riskable")
            .product("Riskeypad 16")
            .serial_number(concat!(env!("CARGO_PKG_VERSION"), "+", env!("SERIALNOW")))
            .max_power(500) // Pull out as much as we can (for now)!
            .build();

        // Keep track of debounce/hold state and what's currently auto-repeating
        let key_states: KeyStates = Default::default();
        let repeat = RepeatEngine::new();
        let uptime_ms: u32 = 0;
        let debug_msg_counter: u16 = 0;

        // Setup some rtt-target debugging:
        let rtt_channels = rtt_init! { // NOTE: DO NOT MOVE THIS HIGHER
            up: {
                0: {
                    size: 512
                    name: "Main"
                }
                1: {
                    size: 512
                    name: "Keys"
                }
            }
        };
        let mut debug_ch0: UpChannel = rtt_channels.up.0;
        let debug_ch1: UpChannel = rtt_channels.up.1;
        let _ = writeln!(debug_ch0, "init()");
        // A broken keymap means a broken build; refuse to come up as a
        // half-working keyboard
        if let Err(err) = bindings::validate() {
            let _ = writeln!(debug_ch0, "Keymap validation failed: {:?}", err);
            panic!("keymap validation failed");
        }

        init::LateResources {
            config,
            debug_ch0,
            debug_ch1,
            usb_key_dev,
            usb_keyboard,
            timer: keys_timer,
            ws,
            key_pins,
            key_states,
            repeat,
            uptime_ms,
            debug_msg_counter,
        }
    }

    #[task(binds = TIM3, priority = 2, resources = [
        config, debug_msg_counter, usb_keyboard, key_pins, key_states, repeat,
        uptime_ms, debug_ch0, debug_ch1, timer])]
    fn tick(mut c: tick::Context) {
        c.resources.timer.clear_interrupt(timer::Event::TimeOut);
        // Shortcuts:
        let debug_ch0 = c.resources.debug_ch0;
        let key_pins = c.resources.key_pins;
        let key_states = c.resources.key_states;
        let repeat = c.resources.repeat;
        let debug_msg_counter = c.resources.debug_msg_counter;
        // tick() is the only task that touches the config so no locks here
        let debounce_ticks = c.resources.config.keys.debounce_ticks;
        let hold_ms = c.resources.config.keys.hold_ms;
        let fire_interval_ms = c.resources.config.repeat.fire_interval_ms;
        let debug_keys = c.resources.config.dev.debug_keys == 1;
        let debug_refresh_interval = c.resources.config.dev.debug_refresh_interval;
        // Our one and only clock: milliseconds since boot, wrapping
        *c.resources.uptime_ms = c.resources.uptime_ms.wrapping_add(config::MS_PER_SCAN);
        let now_ms = *c.resources.uptime_ms;

        // Sample every switch and run it through the debouncer
        let mut events = EventQueue::new();
        for key in 0..config::KEY_COUNT {
            key_states.update(
                key,
                key_pins.is_down(key),
                now_ms,
                debounce_ticks,
                hold_ms,
                &mut events,
            );
        }
        // Feed the events and then the clock to the repeat engine
        let mut sink = UsbSink {
            usb_keyboard: &mut c.resources.usb_keyboard,
        };
        for event in events {
            repeat.handle_event(event, now_ms, debug_keys, &mut sink, debug_ch0);
        }
        repeat.tick(now_ms, fire_interval_ms, debug_keys, &mut sink, debug_ch0);
        // Only post these debug messages as fast as DEBUG_REFRESH_INTERVAL because if we don't
        // they'll come in every 1ms and can you say, "insane screen flicker"? Cuz I can!
        if *debug_msg_counter > debug_refresh_interval {
            let _ = writeln!(c.resources.debug_ch1, "{}", key_states);
            *debug_msg_counter = 0;
        } else {
            *debug_msg_counter = debug_msg_counter.saturating_add(1);
        }
    }

    #[task(binds = OTG_FS, priority = 3, resources = [usb_key_dev, usb_keyboard])]
    fn usb_tx(mut c: usb_tx::Context) {
        usb_poll(&mut c.resources.usb_key_dev, &mut c.resources.usb_keyboard);
    }

    #[task(binds = OTG_FS_WKUP, priority = 3, resources = [usb_key_dev, usb_keyboard])]
    fn usb_rx(mut c: usb_rx::Context) {
        usb_poll(&mut c.resources.usb_key_dev, &mut c.resources.usb_keyboard);
    }
};

/// Glue between the repeat engine and the Keyberon USB class.  Each tap is
/// the full chord report followed by the all-released report so the host
/// registers one discrete press+release (and its own typematic repeat never
/// gets a chance to kick in).
struct UsbSink<'a, 'b> {
    usb_keyboard: &'a mut resources::usb_keyboard<'b>,
}

impl ChordSink for UsbSink<'_, '_> {
    fn tap(&mut self, report: KbHidReport) {
        send_keyboard_report(&report, self.usb_keyboard);
        send_keyboard_report(&KbHidReport::default(), self.usb_keyboard);
    }
}

fn send_keyboard_report(report: &KbHidReport, usb_keyboard: &mut resources::usb_keyboard<'_>) {
    use rtic::Mutex;
    if usb_keyboard.lock(|k| k.device_mut().set_keyboard_report(report.clone())) {
        while let Ok(0) = usb_keyboard.lock(|k| k.write(report.as_bytes())) {}
    }
}

fn usb_poll(usb_dev: &mut aliases::UsbKeyDevice, keyboard: &mut UsbKeyClass) {
    if usb_dev.poll(&mut [keyboard]) {
        keyboard.poll();
    }
}
