use embedded_hal_nb::serial::{Read, Write};
use embedded_io::{Read as IoRead, ReadReady, Write as IoWrite};
use heapless::Deque;
use log::warn;

use crate::packet::MAX_FRAME_SIZE;
use crate::stream::{ByteSource, ByteStream};

/// Receive ring in front of an `embedded-hal-nb` serial port.
///
/// HAL serial ports only hand out one byte at a time with no way to ask
/// how many are waiting, so incoming bytes are pulled into a ring of `N`
/// bytes which the framer then inspects. Transmit goes straight to the
/// port.
///
/// `N` must be at least [`MAX_FRAME_SIZE`]; a smaller ring could never hold
/// a full frame and is rejected at compile time.
#[derive(Debug)]
pub struct BufferedSerial<S, const N: usize> {
    serial: S,
    rx: Deque<u8, N>,
}

impl<S, const N: usize> BufferedSerial<S, N>
where
    S: Read + Write,
{
    /// Takes a port that the HAL has already configured and powered up.
    pub fn new(serial: S) -> BufferedSerial<S, N> {
        const { assert!(N >= MAX_FRAME_SIZE, "rx ring smaller than MAX_FRAME_SIZE") }
        BufferedSerial {
            serial,
            rx: Deque::new(),
        }
    }

    /// Give the port back. Buffered input is dropped.
    pub fn release(self) -> S {
        self.serial
    }

    pub fn get_ref(&self) -> &S {
        &self.serial
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.serial
    }

    /// Load as much as we can from the port into the ring. Stops when the
    /// port would block or the ring is full; in the latter case the rest
    /// stays in the peripheral.
    pub fn fill(&mut self) -> Result<usize, S::Error> {
        let mut pulled = 0;
        while !self.rx.is_full() {
            match Read::read(&mut self.serial) {
                Ok(byte) => {
                    let _ = self.rx.push_back(byte);
                    pulled += 1;
                }
                Err(nb::Error::WouldBlock) => return Ok(pulled),
                Err(nb::Error::Other(e)) => return Err(e),
            }
        }
        warn!("rx ring full at {} bytes", N);
        Ok(pulled)
    }

    /// Drop everything currently buffered.
    pub fn clear(&mut self) {
        self.rx.clear();
    }
}

impl<S, const N: usize> ByteSource for BufferedSerial<S, N>
where
    S: Read + Write,
{
    fn available(&self) -> usize {
        self.rx.len()
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.rx.pop_front()
    }

    fn peek_byte(&self) -> Option<u8> {
        self.rx.front().copied()
    }
}

impl<S, const N: usize> ByteStream for BufferedSerial<S, N>
where
    S: Read + Write,
{
    type Error = S::Error;

    fn poll(&mut self) -> Result<(), Self::Error> {
        self.fill().map(|_| ())
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        nb::block!(Write::write(&mut self.serial, byte))
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        nb::block!(Write::flush(&mut self.serial))
    }
}

/// Chunk size for draining an `embedded-io` reader.
const IO_CHUNK: usize = 16;

/// Receive ring in front of a blocking `embedded-io` port. Reads only
/// happen while the port reports [`ReadReady`], so polling never blocks.
///
/// As with [`BufferedSerial`], `N` must be at least [`MAX_FRAME_SIZE`].
#[derive(Debug)]
pub struct IoSerial<T, const N: usize> {
    io: T,
    rx: Deque<u8, N>,
}

impl<T, const N: usize> IoSerial<T, N>
where
    T: IoRead + ReadReady + IoWrite,
{
    pub fn new(io: T) -> IoSerial<T, N> {
        const { assert!(N >= MAX_FRAME_SIZE, "rx ring smaller than MAX_FRAME_SIZE") }
        IoSerial { io, rx: Deque::new() }
    }

    pub fn release(self) -> T {
        self.io
    }

    pub fn get_ref(&self) -> &T {
        &self.io
    }

    pub fn get_mut(&mut self) -> &mut T {
        &mut self.io
    }

    /// Read from the port while it has data ready and the ring has room.
    pub fn fill(&mut self) -> Result<usize, T::Error> {
        let mut pulled = 0;
        let mut chunk = [0u8; IO_CHUNK];
        loop {
            let room = N - self.rx.len();
            if room == 0 {
                warn!("rx ring full at {} bytes", N);
                return Ok(pulled);
            }
            if !ReadReady::read_ready(&mut self.io)? {
                return Ok(pulled);
            }
            let want = room.min(IO_CHUNK);
            let n = IoRead::read(&mut self.io, &mut chunk[..want])?;
            if n == 0 {
                return Ok(pulled);
            }
            for byte in &chunk[..n] {
                let _ = self.rx.push_back(*byte);
            }
            pulled += n;
        }
    }

    pub fn clear(&mut self) {
        self.rx.clear();
    }
}

impl<T, const N: usize> ByteSource for IoSerial<T, N>
where
    T: IoRead + ReadReady + IoWrite,
{
    fn available(&self) -> usize {
        self.rx.len()
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.rx.pop_front()
    }

    fn peek_byte(&self) -> Option<u8> {
        self.rx.front().copied()
    }
}

impl<T, const N: usize> ByteStream for IoSerial<T, N>
where
    T: IoRead + ReadReady + IoWrite,
{
    type Error = T::Error;

    fn poll(&mut self) -> Result<(), Self::Error> {
        self.fill().map(|_| ())
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        IoWrite::write_all(&mut self.io, &[byte])
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        IoWrite::flush(&mut self.io)
    }
}
