use crate::error::PacketError;
use crate::packet::{CR, LF, MAX_FRAME_SIZE, PACKET_HEADER, Packet};
use crate::Encode;

/// XOR of sender, receiver, message type, payload length and the
/// meaningful payload bytes.
///
/// Only odd numbers of flipped bits per bit position are caught; two
/// corrupted bytes can cancel out.
pub fn checksum(packet: &Packet) -> u8 {
    packet.payload().iter().fold(
        packet.sender ^ packet.receiver ^ packet.message_type ^ packet.payload_length,
        |sum, byte| sum ^ byte,
    )
}

impl Packet {
    /// Wire bytes of this packet, header through terminator. The header and
    /// checksum are always regenerated rather than taken from the fields.
    pub fn frame_bytes(&self) -> impl Iterator<Item = u8> + '_ {
        let head = [
            PACKET_HEADER,
            self.sender,
            self.receiver,
            self.message_type,
            self.payload_length,
        ];
        let tail = [checksum(self), CR, LF];
        head.into_iter()
            .chain(self.payload().iter().copied())
            .chain(tail)
    }

    /// Encode into a stack buffer.
    pub fn to_frame(&self) -> heapless::Vec<u8, MAX_FRAME_SIZE> {
        // Never exceeds MAX_FRAME_SIZE since payload_length is bounded.
        self.frame_bytes().collect()
    }
}

impl Encode for Packet {
    type Error = PacketError;

    fn encode(&self, buffer: &mut [u8]) -> Result<usize, Self::Error> {
        // Header .. Checksum, then CR LF
        let size = self.wire_len() + 2;
        if buffer.len() < size {
            return Err(PacketError::EncodeBufferTooSmall {
                expected: size,
                found: buffer.len(),
            });
        }
        for (slot, byte) in buffer.iter_mut().zip(self.frame_bytes()) {
            *slot = byte;
        }
        Ok(size)
    }
}
