// I2C slave exposing a small register file, addressed like an I2C EEPROM:
// the master writes a buffer position first, then data bytes which store and
// auto-increment. A read streams bytes from the last written position (or
// from 0 when none was set). The application reads and writes the same
// buffer directly between transactions.

pub mod i2c1;
pub mod slave;

// size of the exposed buffer in bytes, must stay within 2..=254
pub const BUFFER_SIZE: usize = 16;

#[derive(Debug, Clone, Copy)]
pub enum Event {
  AddressedWrite,
  AddressedRead,
  ByteReceived(u8),
  ByteRequested,
  Stop,
  MasterNack,
  Unrecognized,
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Action {
  Ack,
  Nack,
  Transmit(u8),
  Reset,
}
