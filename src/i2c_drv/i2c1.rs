use stm32f4xx_hal::rcc::Clocks;
use stm32f4xx_hal::stm32;

use crate::i2c_drv::slave::Data;
use crate::i2c_drv::{Action, Event, BUFFER_SIZE};

pub type Slave = Data<stm32::I2C1, BUFFER_SIZE>;

// arms I2C1 as a slave on the given 7 bit address; call again through
// set_address whenever the address has to change
pub fn init(i2c: stm32::I2C1, address: u8, clocks: &Clocks) -> Slave {
  // the RCC block is owned by the clock setup by now, reach the enable
  // bit directly
  unsafe { &(*stm32::RCC::ptr()) }
    .apb1enr
    .modify(|_, w| w.i2c1en().set_bit());

  i2c.cr1.modify(|_, w| {
    w.pe().clear_bit().start().clear_bit().stop().clear_bit()
  });

  // the peripheral derives its bus timings from the APB1 clock
  let pclk1_mhz = clocks.pclk1().0 / 1_000_000;
  i2c.cr2.write(|w| unsafe { w.freq().bits(pclk1_mhz as u8) });

  own_address(&i2c, address);

  i2c.cr1.modify(|_, w| w.pe().set_bit());
  i2c.cr1.modify(|_, w| w.ack().set_bit());
  i2c.cr2.modify(|_, w| {
    w.itevten().set_bit().itbufen().set_bit().iterren().set_bit()
  });

  Data::new(i2c)
}

pub fn set_address(twi: &mut Slave, address: u8) {
  own_address(&twi.i2c, address);
  twi.reset_cursor();
}

fn own_address(i2c: &stm32::I2C1, address: u8) {
  // 7 bit addressing, bit 14 has to stay set per the reference manual
  i2c.oar1.write(|w| unsafe {
    w.bits((1 << 14) | (u32::from(address) << 1))
  });
}

// I2C1_EV interrupt body
pub fn on_event(twi: &mut Slave) {
  let event = read_event(&twi.i2c);
  let action = twi.handle(&event);
  apply(&twi.i2c, &action);
}

// I2C1_ER interrupt body; a master nack lands here as an ack failure
pub fn on_error(twi: &mut Slave) {
  let event = if twi.i2c.sr1.read().af().bit_is_set() {
    Event::MasterNack
  } else {
    Event::Unrecognized
  };
  let action = twi.handle(&event);
  apply(&twi.i2c, &action);
}

fn read_event(i2c: &stm32::I2C1) -> Event {
  let sr1 = i2c.sr1.read();

  if sr1.addr().bit_is_set() {
    // reading SR2 after SR1 clears the ADDR flag, TRA tells us the
    // direction the master asked for
    let sr2 = i2c.sr2.read();
    if sr2.tra().bit_is_set() {
      Event::AddressedRead
    } else {
      Event::AddressedWrite
    }
  } else if sr1.rx_ne().bit_is_set() {
    Event::ByteReceived(i2c.dr.read().dr().bits())
  } else if sr1.stopf().bit_is_set() {
    Event::Stop
  } else if sr1.tx_e().bit_is_set() {
    Event::ByteRequested
  } else {
    Event::Unrecognized
  }
}

fn apply(i2c: &stm32::I2C1, action: &Action) {
  match action {
    Action::Ack => {
      // the CR1 write after the SR1 read also finishes clearing STOPF
      i2c.cr1.modify(|_, w| w.ack().set_bit());
    }
    Action::Nack => {
      i2c.cr1.modify(|_, w| w.ack().clear_bit());
    }
    Action::Transmit(byte) => {
      i2c.dr.write(|w| unsafe { w.dr().bits(*byte) });
      i2c.cr1.modify(|_, w| w.ack().set_bit());
    }
    Action::Reset => {
      // drop the transaction and stay armed for the next start condition
      i2c.sr1.modify(|_, w| w.af().clear_bit().berr().clear_bit());
      i2c.cr1.modify(|_, w| w.ack().set_bit());
    }
  }
}
