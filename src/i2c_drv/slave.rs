use crate::i2c_drv::{Action, Event};

// Buffer position for the current transaction. Undefined until the master
// has sent an address byte; a read with no prior address byte starts at 0.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Cursor {
  Undefined,
  At(u8),
}

pub struct Data<T, const N: usize> {
  pub i2c: T,
  buffer: [u8; N],
  cursor: Cursor,
  limit: u8,
}

impl Cursor {
  pub fn next(self, event: &Event, buffer: &mut [u8], limit: u8) -> (Cursor, Action) {
    match (self, event) {
      (_, Event::AddressedWrite) => {
        // fresh write sequence, the next byte selects the buffer position
        (Cursor::Undefined, Action::Ack)
      }
      (Cursor::Undefined, Event::ByteReceived(data)) => {
        if *data < limit {
          (Cursor::At(*data), Action::Ack)
        } else {
          // invalid position, clamp to the start of the buffer
          (Cursor::At(0), Action::Ack)
        }
      }
      (Cursor::At(pos), Event::ByteReceived(data)) => {
        if pos < limit {
          if let Some(slot) = buffer.get_mut(usize::from(pos)) {
            *slot = *data;
          }
        }
        // the position advances even when the byte was dropped
        (Cursor::At(pos.wrapping_add(1)), Action::Ack)
      }
      // a read may start without an address byte, so being addressed as
      // transmitter is handled exactly like a data request
      (_, Event::AddressedRead) | (_, Event::ByteRequested) => {
        let pos = match self {
          Cursor::Undefined => 0,
          Cursor::At(pos) => pos,
        };

        if pos < limit {
          let data = buffer.get(usize::from(pos)).copied().unwrap_or(0);
          (Cursor::At(pos.wrapping_add(1)), Action::Transmit(data))
        } else {
          // nothing left in the buffer, pad with zeros
          (Cursor::At(pos), Action::Transmit(0))
        }
      }
      (s, Event::Stop) => (s, Action::Ack),
      (s, _e) => {
        // master nack or an unexpected status, drop the transaction and
        // go back to unaddressed listening
        (s, Action::Reset)
      }
    }
  }
}

impl<T, const N: usize> Data<T, N> {
  // buffer sizes outside 2..=254 refuse to compile
  const SIZE_CHECK: () = assert!(N >= 2 && N <= 254, "buffer size must be within 2..=254");

  pub fn new(i2c: T) -> Self {
    // position checks accept one slot past the end of the buffer; writes
    // there are dropped and reads return zero
    Self::with_limit(i2c, (N + 1) as u8)
  }

  pub fn with_limit(i2c: T, limit: u8) -> Self {
    let _ = Self::SIZE_CHECK;

    Data {
      i2c,
      buffer: [0; N],
      cursor: Cursor::Undefined,
      limit,
    }
  }

  pub fn handle(&mut self, event: &Event) -> Action {
    let action;
    (self.cursor, action) = self.cursor.next(event, &mut self.buffer, self.limit);
    action
  }

  pub fn buffer(&self) -> &[u8; N] {
    &self.buffer
  }

  pub fn buffer_mut(&mut self) -> &mut [u8; N] {
    &mut self.buffer
  }

  pub(crate) fn reset_cursor(&mut self) {
    self.cursor = Cursor::Undefined;
  }
}
