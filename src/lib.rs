//! Packet framing for small command/status messages between devices on a
//! Twelite-style serial radio link.
//!
//! ```text
//! ┌──────┬────────┬──────────┬──────┬─────┬─────────────┬─────┬─────────┐
//! │ 0xA5 │ SENDER │ RECEIVER │ TYPE │ LEN │ PAYLOAD     │ XOR │ [CR LF] │
//! │ 1B   │ 1B     │ 1B       │ 1B   │ 1B  │ 0-32B       │ 1B  │ 0-2B    │
//! └──────┴────────┴──────────┴──────┴─────┴─────────────┴─────┴─────────┘
//! ```
//!
//! The checksum is the XOR of every byte between the header and itself.
//! Receiving is a non-blocking poll: [`Framer::receive`] parses whatever
//! is buffered and fails straight away when a frame is not complete.
#![no_std]

mod codec;
mod error;
mod framer;
mod packet;
mod serial;
mod stream;

pub trait Encode {
    type Error;

    /// Write into `buffer`, returning the number of bytes used.
    fn encode(&self, buffer: &mut [u8]) -> Result<usize, Self::Error>;
}

pub trait Decode<'a>
where
    Self: Sized,
{
    type Error;

    fn decode(data: &'a [u8]) -> Result<Self, Self::Error>;
}

pub use codec::checksum;
pub use error::{FrameError, IdError, LinkError, PacketError};
pub use framer::{Framer, FramerConfig, HeaderPolicy, read_packet, write_packet};
pub use packet::{
    CR, DeviceId, LF, MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE, MIN_FRAME_SIZE, MessageType,
    PACKET_HEADER, Packet, matches,
};
pub use serial::{BufferedSerial, IoSerial};
pub use stream::{ByteSource, ByteStream, SliceReader};
