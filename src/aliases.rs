//! A collection of type aliases to cut down on code clutter

use crate::stm32::SPI3;
use crate::ws2812::Ws2812;
use stm32f4xx_hal::gpio::gpioa::{PA0, PA1, PA2, PA3, PA4, PA5, PA6, PA7, PA8};
use stm32f4xx_hal::gpio::gpiob::{PB0, PB1, PB5, PB10, PB12, PB13, PB14, PB15};
use stm32f4xx_hal::gpio::{Alternate, Input, PullUp, AF6};
use stm32f4xx_hal::otg_fs::UsbBusType;
use stm32f4xx_hal::spi::{NoMiso, NoSck, Spi};
use usb_device::device::UsbDevice;

pub type UsbKeyDevice = UsbDevice<'static, UsbBusType>;

// WS2812B-B LEDs
pub type SPIWS2812B = Ws2812<Spi<SPI3, (NoSck, NoMiso, PB5<Alternate<AF6>>)>>;

// One GPIO per key switch, all pulled up (a press reads low).  K<n> matches
// the key's index in the keymap: left to right, top row first.  PB5 is taken
// by the LED data line and PA11/PA12 by USB so the bottom row hops around.
pub type K0 = PA0<Input<PullUp>>;
pub type K1 = PA1<Input<PullUp>>;
pub type K2 = PA2<Input<PullUp>>;
pub type K3 = PA3<Input<PullUp>>;
pub type K4 = PA4<Input<PullUp>>;
pub type K5 = PA5<Input<PullUp>>;
pub type K6 = PA6<Input<PullUp>>;
pub type K7 = PA7<Input<PullUp>>;
pub type K8 = PB0<Input<PullUp>>;
pub type K9 = PB1<Input<PullUp>>;
pub type K10 = PB10<Input<PullUp>>;
pub type K11 = PB12<Input<PullUp>>;
pub type K12 = PB13<Input<PullUp>>;
pub type K13 = PB14<Input<PullUp>>;
pub type K14 = PB15<Input<PullUp>>;
pub type K15 = PA8<Input<PullUp>>;
