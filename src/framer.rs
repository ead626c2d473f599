use log::{debug, trace, warn};

use crate::codec::checksum;
use crate::error::{FrameError, LinkError};
use crate::packet::{CR, LF, MAX_PAYLOAD_SIZE, MIN_FRAME_SIZE, PACKET_HEADER, Packet};
use crate::stream::{ByteSource, ByteStream, SliceReader};
use crate::Decode;

/// What to do with bytes in front of a frame that are not a header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderPolicy {
    /// Consume exactly one byte and fail with `HeaderMismatch`. The
    /// stream is assumed to be frame aligned; a stray byte costs one
    /// failed receive.
    #[default]
    Discard,
    /// Drop buffered bytes until the next header before parsing.
    Resync,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FramerConfig {
    pub header_policy: HeaderPolicy,
}

impl FramerConfig {
    pub fn with_header_policy(mut self, header_policy: HeaderPolicy) -> FramerConfig {
        self.header_policy = header_policy;
        self
    }
}

/// Sends and receives packets over one stream.
///
/// Nothing here waits: `receive` works on whatever is buffered and
/// fails immediately otherwise, so the owner calls it once per loop tick.
#[derive(Debug)]
pub struct Framer<S> {
    stream: S,
    config: FramerConfig,
}

impl<S: ByteStream> Framer<S> {
    pub fn new(stream: S) -> Framer<S> {
        Framer::with_config(stream, FramerConfig::default())
    }

    pub fn with_config(stream: S, config: FramerConfig) -> Framer<S> {
        Framer { stream, config }
    }

    pub fn config(&self) -> &FramerConfig {
        &self.config
    }

    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    pub fn into_inner(self) -> S {
        self.stream
    }

    /// Write one frame. No acknowledgement, no retry.
    pub fn send(&mut self, packet: &Packet) -> Result<(), LinkError<S::Error>> {
        write_packet(&mut self.stream, packet).map_err(LinkError::Io)
    }

    /// One parse attempt over the bytes buffered after polling the
    /// transport.
    ///
    /// A transport error from the poll does not stop the parse: a frame
    /// already buffered is still returned, and the error is reported only
    /// when no packet comes out. Bytes consumed by a failed attempt are
    /// not restored, including a partially read frame.
    pub fn receive(&mut self) -> Result<Packet, LinkError<S::Error>> {
        let polled = self.stream.poll();
        let parsed = read_packet(&mut self.stream, self.config.header_policy);
        match (parsed, polled) {
            (Ok(packet), _) => Ok(packet),
            (Err(e), Err(io)) => {
                debug!("receive: transport error, parse gave {}", e);
                Err(LinkError::Io(io))
            }
            (Err(e), Ok(())) => {
                if e.is_incomplete() {
                    trace!("receive: {}", e);
                } else {
                    debug!("receive rejected frame: {}", e);
                }
                Err(LinkError::Frame(e))
            }
        }
    }

    /// Receive once and keep the packet only if it matches. A valid packet
    /// for someone else is dropped and reported as `Ok(None)`.
    pub fn receive_matching(
        &mut self,
        sender: impl Into<u8>,
        receiver: impl Into<u8>,
        message_type: impl Into<u8>,
    ) -> Result<Option<Packet>, LinkError<S::Error>> {
        let packet = self.receive()?;
        if packet.matches(sender, receiver, message_type) {
            Ok(Some(packet))
        } else {
            debug!(
                "discarding packet {:#04x} -> {:#04x} type {:#04x}",
                packet.sender(),
                packet.receiver(),
                packet.message_type()
            );
            Ok(None)
        }
    }
}

/// Write `packet` as header, fields, payload, fresh checksum, CR, LF, then
/// flush.
pub fn write_packet<W: ByteStream + ?Sized>(tx: &mut W, packet: &Packet) -> Result<(), W::Error> {
    for byte in packet.frame_bytes() {
        tx.write_byte(byte)?;
    }
    tx.flush()?;
    trace!(
        "sent {} byte frame type {:#04x}",
        packet.wire_len() + 2,
        packet.message_type()
    );
    Ok(())
}

/// Parse one frame from the buffered bytes of `rx`.
pub fn read_packet<R: ByteSource + ?Sized>(
    rx: &mut R,
    policy: HeaderPolicy,
) -> Result<Packet, FrameError> {
    if policy == HeaderPolicy::Resync {
        resync(rx);
    }

    let available = rx.available();
    if available < MIN_FRAME_SIZE {
        return Err(FrameError::InsufficientData { available });
    }

    let header = next(rx)?;
    if header != PACKET_HEADER {
        return Err(FrameError::HeaderMismatch { found: header });
    }

    let mut packet = Packet::empty();
    packet.sender = next(rx)?;
    packet.receiver = next(rx)?;
    packet.message_type = next(rx)?;
    packet.payload_length = next(rx)?;

    let length = packet.payload_length as usize;
    if length > MAX_PAYLOAD_SIZE {
        return Err(FrameError::PayloadTooLarge {
            length: packet.payload_length,
        });
    }

    for slot in packet.payload[..length].iter_mut() {
        *slot = next(rx)?;
    }

    packet.checksum = next(rx)?;

    // Terminators are optional; never consume anything else
    if rx.peek_byte() == Some(CR) {
        rx.read_byte();
    }
    if rx.peek_byte() == Some(LF) {
        rx.read_byte();
    }

    let calculated = checksum(&packet);
    if calculated != packet.checksum {
        return Err(FrameError::ChecksumMismatch {
            calculated,
            found: packet.checksum,
        });
    }

    trace!("received {} byte frame type {:#04x}", packet.wire_len(), packet.message_type);
    Ok(packet)
}

fn next<R: ByteSource + ?Sized>(rx: &mut R) -> Result<u8, FrameError> {
    rx.read_byte()
        .ok_or(FrameError::InsufficientData { available: 0 })
}

fn resync<R: ByteSource + ?Sized>(rx: &mut R) {
    let mut dropped = 0usize;
    while let Some(byte) = rx.peek_byte() {
        if byte == PACKET_HEADER {
            break;
        }
        rx.read_byte();
        dropped += 1;
    }
    if dropped > 0 {
        warn!("resync dropped {} bytes before header", dropped);
    }
}

impl<'a> Decode<'a> for Packet {
    type Error = FrameError;

    /// Parse the frame at the start of `data` exactly as a receive with
    /// [`HeaderPolicy::Discard`] would. Trailing bytes are ignored.
    fn decode(data: &'a [u8]) -> Result<Self, Self::Error> {
        read_packet(&mut SliceReader::new(data), HeaderPolicy::Discard)
    }
}
