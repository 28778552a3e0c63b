#![cfg_attr(not(test), no_std)]
#![cfg_attr(not(test), no_main)]

mod i2c_drv;
mod util;

#[cfg(not(test))]
use panic_semihosting as _;

pub const CPU_FREQ: u32 = 168_000_000;

// bus address the slave answers on
const SLAVE_ADDRESS: u8 = 0x50;

#[cfg(not(test))]
#[rtic::app(device = stm32f4xx_hal::stm32, peripherals = true)]
mod app {
  use core::fmt::Write;

  use cortex_m::asm;
  use heapless::consts::U64;
  use heapless::String;
  use rtic_core::prelude::*;
  use stm32f4xx_hal::prelude::*;
  use stm32f4xx_hal::stm32;

  use crate::i2c_drv::i2c1;
  use crate::i2c_drv::BUFFER_SIZE;
  use crate::util::debugger;
  use crate::{CPU_FREQ, SLAVE_ADDRESS};

  #[resources]
  struct Resources {
    twi: i2c1::Slave,
  }

  #[init]
  fn init(cx: init::Context) -> init::LateResources {
    debugger::init();
    debugger::print(format_args!("init\n"));

    // device specific peripherals
    let device: stm32::Peripherals = cx.device;

    // SCL on PB6, SDA on PB7, open drain with external pull-ups
    let gpiob = device.GPIOB.split();
    let _scl = gpiob.pb6.into_alternate_af4().set_open_drain();
    let _sda = gpiob.pb7.into_alternate_af4().set_open_drain();

    let rcc = device.RCC.constrain();
    let clocks = rcc.cfgr.sysclk(168.mhz()).freeze();

    let mut twi = i2c1::init(device.I2C1, SLAVE_ADDRESS, &clocks);

    // fill the buffer so master reads return something recognizable
    for (index, slot) in twi.buffer_mut().iter_mut().enumerate() {
      *slot = index as u8;
    }

    init::LateResources { twi }
  }

  #[task(binds = I2C1_EV, resources = [twi])]
  fn i2c1_ev(cx: i2c1_ev::Context) {
    let mut twi = cx.resources.twi;

    twi.lock(|twi| i2c1::on_event(twi));
  }

  #[task(binds = I2C1_ER, resources = [twi])]
  fn i2c1_er(cx: i2c1_er::Context) {
    let mut twi = cx.resources.twi;

    twi.lock(|twi| i2c1::on_error(twi));
  }

  #[idle(resources = [twi])]
  fn idle(cx: idle::Context) -> ! {
    let mut twi = cx.resources.twi;
    let mut snapshot = [0u8; BUFFER_SIZE];

    loop {
      // copy the buffer out under the lock so the dump stays consistent
      // even when a transaction lands in the middle of it
      twi.lock(|twi| snapshot.copy_from_slice(twi.buffer()));

      let mut line: String<U64> = String::new();
      for byte in snapshot.iter() {
        write!(&mut line, "{:02X} ", byte).unwrap();
      }
      debugger::print(format_args!("{}\n", line));

      asm::delay(CPU_FREQ);
    }
  }
}
