#![allow(dead_code)]

use std::collections::VecDeque;
use std::convert::Infallible;

use embedded_hal_nb::serial::{self, ErrorKind, ErrorType, Read, Write};

/// Host stand-in for a UART: bytes queued in `incoming` arrive one per
/// `read`, writes land in `outgoing`.
#[derive(Debug, Default)]
pub struct MockSerial {
    pub incoming: VecDeque<u8>,
    pub outgoing: Vec<u8>,
}

impl MockSerial {
    pub fn new() -> MockSerial {
        MockSerial::default()
    }

    pub fn feed(&mut self, data: &[u8]) {
        self.incoming.extend(data.iter().copied());
    }
}

impl ErrorType for MockSerial {
    type Error = Infallible;
}

impl Read for MockSerial {
    fn read(&mut self) -> nb::Result<u8, Self::Error> {
        self.incoming.pop_front().ok_or(nb::Error::WouldBlock)
    }
}

impl Write for MockSerial {
    fn write(&mut self, word: u8) -> nb::Result<(), Self::Error> {
        self.outgoing.push(word);
        Ok(())
    }

    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineFault;

impl serial::Error for LineFault {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Noise
    }
}

/// UART whose transmitter is stuck for `busy` polls before failing, and
/// whose receiver reports a fault once its queue runs dry.
#[derive(Debug, Default)]
pub struct FaultySerial {
    pub incoming: VecDeque<u8>,
    pub busy: usize,
}

impl ErrorType for FaultySerial {
    type Error = LineFault;
}

impl Read for FaultySerial {
    fn read(&mut self) -> nb::Result<u8, Self::Error> {
        self.incoming.pop_front().ok_or(nb::Error::Other(LineFault))
    }
}

impl Write for FaultySerial {
    fn write(&mut self, _word: u8) -> nb::Result<(), Self::Error> {
        if self.busy > 0 {
            self.busy -= 1;
            return Err(nb::Error::WouldBlock);
        }
        Err(nb::Error::Other(LineFault))
    }

    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        Ok(())
    }
}

/// `embedded-io` port with the same queue semantics as [`MockSerial`].
#[derive(Debug, Default)]
pub struct MockIo {
    pub incoming: VecDeque<u8>,
    pub outgoing: Vec<u8>,
}

impl embedded_io::ErrorType for MockIo {
    type Error = Infallible;
}

impl embedded_io::Read for MockIo {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let n = buf.len().min(self.incoming.len());
        for (slot, byte) in buf.iter_mut().zip(self.incoming.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }
}

impl embedded_io::ReadReady for MockIo {
    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.incoming.is_empty())
    }
}

impl embedded_io::Write for MockIo {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.outgoing.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
