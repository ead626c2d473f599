/// Receive side of a serial link as the framer sees it: a buffer of bytes
/// that have already arrived.
///
/// None of these calls may block.
pub trait ByteSource {
    /// Number of bytes that can be read right now.
    fn available(&self) -> usize;

    /// Consume the next byte, `None` when nothing is buffered.
    fn read_byte(&mut self) -> Option<u8>;

    /// Look at the next byte without consuming it.
    fn peek_byte(&self) -> Option<u8>;
}

/// Full duplex link: buffered receive plus byte-wise transmit.
pub trait ByteStream: ByteSource {
    type Error;

    /// Move whatever the transport has ready into the receive buffer.
    fn poll(&mut self) -> Result<(), Self::Error>;

    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error>;

    fn flush(&mut self) -> Result<(), Self::Error>;
}

impl<T: ByteSource + ?Sized> ByteSource for &mut T {
    fn available(&self) -> usize {
        (**self).available()
    }

    fn read_byte(&mut self) -> Option<u8> {
        (**self).read_byte()
    }

    fn peek_byte(&self) -> Option<u8> {
        (**self).peek_byte()
    }
}

impl<T: ByteStream + ?Sized> ByteStream for &mut T {
    type Error = T::Error;

    fn poll(&mut self) -> Result<(), Self::Error> {
        (**self).poll()
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        (**self).write_byte(byte)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        (**self).flush()
    }
}

/// Reads bytes off the front of a borrowed slice.
#[derive(Debug, Clone)]
pub struct SliceReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceReader<'a> {
    pub fn new(data: &'a [u8]) -> SliceReader<'a> {
        SliceReader { data, pos: 0 }
    }

    /// How many bytes have been read so far.
    pub fn consumed(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }
}

impl ByteSource for SliceReader<'_> {
    fn available(&self) -> usize {
        self.data.len() - self.pos
    }

    fn read_byte(&mut self) -> Option<u8> {
        let byte = self.peek_byte()?;
        self.pos += 1;
        Some(byte)
    }

    fn peek_byte(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_reader_tracks_position() {
        let data = [1, 2, 3];
        let mut r = SliceReader::new(&data);
        assert_eq!(r.available(), 3);
        assert_eq!(r.peek_byte(), Some(1));
        assert_eq!(r.read_byte(), Some(1));
        assert_eq!(r.read_byte(), Some(2));
        assert_eq!(r.consumed(), 2);
        assert_eq!(r.remaining(), &[3]);
        assert_eq!(r.read_byte(), Some(3));
        assert_eq!(r.available(), 0);
        assert_eq!(r.read_byte(), None);
        assert_eq!(r.peek_byte(), None);
    }

    #[test]
    fn mutable_reference_forwards() {
        let data = [7];
        let mut r = SliceReader::new(&data);
        let mut by_ref = &mut r;
        assert_eq!(ByteSource::read_byte(&mut by_ref), Some(7));
        assert_eq!(r.consumed(), 1);
    }
}
