use crate::codec::checksum;
use crate::error::{IdError, PacketError};

/// Start-of-frame byte.
pub const PACKET_HEADER: u8 = 0xA5;
/// Capacity of the payload buffer carried by every packet.
pub const MAX_PAYLOAD_SIZE: usize = 32;
/// Optional terminator bytes appended after the checksum.
pub const CR: u8 = b'\r';
pub const LF: u8 = b'\n';
/// Header: 1, Sender: 1, Receiver: 1, Type: 1, Length: 1, Checksum: 1
pub const MIN_FRAME_SIZE: usize = 6;
/// Largest frame on the wire, terminator included.
pub const MAX_FRAME_SIZE: usize = MIN_FRAME_SIZE + MAX_PAYLOAD_SIZE + 2;

/// Devices sharing the radio link.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceId {
    AParts = 0x01,
    BParts = 0x02,
    CParts = 0x03,
    /// Every device. Only meaningful as a receiver.
    Broadcast = 0xFF,
}

impl TryFrom<u8> for DeviceId {
    type Error = IdError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x01 => Ok(DeviceId::AParts),
            0x02 => Ok(DeviceId::BParts),
            0x03 => Ok(DeviceId::CParts),
            0xFF => Ok(DeviceId::Broadcast),
            other => Err(IdError::UnknownDeviceId(other)),
        }
    }
}

impl From<DeviceId> for u8 {
    fn from(value: DeviceId) -> Self {
        value as u8
    }
}

/// Application message kinds. The framer does not reject values outside
/// this list, see [`Packet::kind`].
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    DeployComplete = 0x01,
    /// Cleared for takeoff.
    ReadyForCapture = 0x02,
    ReadyForCaptureAck = 0x03,
    TurnSignal = 0x04,
    MovementDirection = 0x05,
}

impl TryFrom<u8> for MessageType {
    type Error = IdError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x01 => Ok(MessageType::DeployComplete),
            0x02 => Ok(MessageType::ReadyForCapture),
            0x03 => Ok(MessageType::ReadyForCaptureAck),
            0x04 => Ok(MessageType::TurnSignal),
            0x05 => Ok(MessageType::MovementDirection),
            other => Err(IdError::UnknownMessageType(other)),
        }
    }
}

impl From<MessageType> for u8 {
    fn from(value: MessageType) -> Self {
        value as u8
    }
}

/// One command/status message.
///
/// Fields hold the raw wire bytes so that IDs from newer firmware survive
/// a receive. The payload lives inline; only the first `payload_length`
/// bytes are meaningful and `payload_length` never exceeds
/// [`MAX_PAYLOAD_SIZE`].
#[derive(Debug, Clone, Copy)]
pub struct Packet {
    pub(crate) header: u8,
    pub(crate) sender: u8,
    pub(crate) receiver: u8,
    pub(crate) message_type: u8,
    pub(crate) payload_length: u8,
    pub(crate) payload: [u8; MAX_PAYLOAD_SIZE],
    pub(crate) checksum: u8,
}

impl Packet {
    /// Build a packet from typed or raw fields.
    ///
    /// With `Some(source)` and a non-zero length, exactly `payload_length`
    /// bytes are copied out of `source`. With `None` or a zero length the
    /// payload is zeroed. Header and checksum are filled in here and again
    /// whenever the packet is sent.
    pub fn make(
        sender: impl Into<u8>,
        receiver: impl Into<u8>,
        message_type: impl Into<u8>,
        payload_length: u8,
        payload: Option<&[u8]>,
    ) -> Result<Packet, PacketError> {
        let length = payload_length as usize;
        if length > MAX_PAYLOAD_SIZE {
            return Err(PacketError::PayloadTooLarge { length });
        }

        let mut packet = Packet::empty();
        packet.sender = sender.into();
        packet.receiver = receiver.into();
        packet.message_type = message_type.into();
        packet.payload_length = payload_length;

        if let Some(source) = payload {
            if length > 0 {
                if source.len() < length {
                    return Err(PacketError::PayloadSourceTooShort {
                        expected: length,
                        found: source.len(),
                    });
                }
                packet.payload[..length].copy_from_slice(&source[..length]);
            }
        }

        packet.checksum = checksum(&packet);
        Ok(packet)
    }

    /// Like [`Packet::make`] with the length taken from `payload`.
    pub fn new(
        sender: impl Into<u8>,
        receiver: impl Into<u8>,
        message_type: impl Into<u8>,
        payload: &[u8],
    ) -> Result<Packet, PacketError> {
        if payload.len() > MAX_PAYLOAD_SIZE {
            return Err(PacketError::PayloadTooLarge {
                length: payload.len(),
            });
        }
        Packet::make(
            sender,
            receiver,
            message_type,
            payload.len() as u8,
            Some(payload),
        )
    }

    pub(crate) fn empty() -> Packet {
        Packet {
            header: PACKET_HEADER,
            sender: 0,
            receiver: 0,
            message_type: 0,
            payload_length: 0,
            payload: [0; MAX_PAYLOAD_SIZE],
            checksum: 0,
        }
    }

    pub fn header(&self) -> u8 {
        self.header
    }

    pub fn sender(&self) -> u8 {
        self.sender
    }

    pub fn receiver(&self) -> u8 {
        self.receiver
    }

    pub fn message_type(&self) -> u8 {
        self.message_type
    }

    pub fn payload_length(&self) -> u8 {
        self.payload_length
    }

    /// The meaningful payload bytes.
    pub fn payload(&self) -> &[u8] {
        &self.payload[..self.payload_length as usize]
    }

    /// Checksum as carried by this packet: computed for packets built
    /// locally, read off the wire (and verified) for received ones.
    pub fn checksum(&self) -> u8 {
        self.checksum
    }

    pub fn sender_id(&self) -> Result<DeviceId, IdError> {
        DeviceId::try_from(self.sender)
    }

    pub fn receiver_id(&self) -> Result<DeviceId, IdError> {
        DeviceId::try_from(self.receiver)
    }

    pub fn kind(&self) -> Result<MessageType, IdError> {
        MessageType::try_from(self.message_type)
    }

    /// Frame length on the wire without the CR LF terminator.
    pub fn wire_len(&self) -> usize {
        MIN_FRAME_SIZE + self.payload_length as usize
    }

    /// True when sender, receiver and message type all equal the expected
    /// values. There is no wildcard.
    pub fn matches(
        &self,
        sender: impl Into<u8>,
        receiver: impl Into<u8>,
        message_type: impl Into<u8>,
    ) -> bool {
        self.sender == sender.into()
            && self.receiver == receiver.into()
            && self.message_type == message_type.into()
    }
}

impl PartialEq for Packet {
    fn eq(&self, other: &Self) -> bool {
        self.header == other.header
            && self.sender == other.sender
            && self.receiver == other.receiver
            && self.message_type == other.message_type
            && self.payload() == other.payload()
            && self.checksum == other.checksum
    }
}

impl Eq for Packet {}

/// Free-function form of [`Packet::matches`].
pub fn matches(
    packet: &Packet,
    sender: impl Into<u8>,
    receiver: impl Into<u8>,
    message_type: impl Into<u8>,
) -> bool {
    packet.matches(sender, receiver, message_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn make_copies_only_declared_length() {
        let source = [1u8, 2, 3, 4, 5];
        let p = Packet::make(
            DeviceId::AParts,
            DeviceId::BParts,
            MessageType::TurnSignal,
            3,
            Some(&source),
        )
        .unwrap();
        assert_eq!(p.payload(), &[1, 2, 3]);
        assert_eq!(p.payload[3..], [0; MAX_PAYLOAD_SIZE - 3]);
        assert_eq!(p.header(), PACKET_HEADER);
    }

    #[test]
    fn make_without_source_zeroes_payload() {
        let p = Packet::make(
            DeviceId::CParts,
            DeviceId::Broadcast,
            MessageType::DeployComplete,
            4,
            None,
        )
        .unwrap();
        assert_eq!(p.payload(), &[0, 0, 0, 0]);
        assert_eq!(p.payload_length(), 4);
    }

    #[test]
    fn make_rejects_oversized_length() {
        let err = Packet::make(
            DeviceId::AParts,
            DeviceId::BParts,
            MessageType::TurnSignal,
            33,
            None,
        )
        .unwrap_err();
        assert_eq!(err, PacketError::PayloadTooLarge { length: 33 });
    }

    #[test]
    fn make_rejects_short_source() {
        let err = Packet::make(
            DeviceId::AParts,
            DeviceId::BParts,
            MessageType::TurnSignal,
            4,
            Some(&[1, 2]),
        )
        .unwrap_err();
        assert_eq!(
            err,
            PacketError::PayloadSourceTooShort {
                expected: 4,
                found: 2
            }
        );
    }

    #[test]
    fn new_rejects_oversized_slice() {
        let data = [0u8; MAX_PAYLOAD_SIZE + 1];
        assert!(matches!(
            Packet::new(DeviceId::AParts, DeviceId::BParts, MessageType::TurnSignal, &data),
            Err(PacketError::PayloadTooLarge { length: 33 })
        ));
    }

    #[test]
    fn equality_ignores_dead_payload_bytes() {
        let a = Packet::make(1u8, 2u8, 4u8, 1, Some(&[9, 1, 1])).unwrap();
        let b = Packet::make(1u8, 2u8, 4u8, 1, Some(&[9, 2, 2])).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn matches_requires_all_three_fields() {
        let p = Packet::new(
            DeviceId::AParts,
            DeviceId::BParts,
            MessageType::ReadyForCapture,
            &[],
        )
        .unwrap();
        assert!(p.matches(DeviceId::AParts, DeviceId::BParts, MessageType::ReadyForCapture));
        assert!(matches(&p, DeviceId::AParts, DeviceId::BParts, MessageType::ReadyForCapture));
        assert!(!p.matches(DeviceId::CParts, DeviceId::BParts, MessageType::ReadyForCapture));
        assert!(!p.matches(DeviceId::AParts, DeviceId::Broadcast, MessageType::ReadyForCapture));
        assert!(!p.matches(DeviceId::AParts, DeviceId::BParts, MessageType::ReadyForCaptureAck));
    }

    #[test]
    fn unknown_ids_pass_through() {
        let p = Packet::make(0x42u8, DeviceId::AParts, 0x7Eu8, 0, None).unwrap();
        assert_eq!(p.sender_id(), Err(IdError::UnknownDeviceId(0x42)));
        assert_eq!(p.receiver_id(), Ok(DeviceId::AParts));
        assert_eq!(p.kind(), Err(IdError::UnknownMessageType(0x7E)));
        assert_eq!(p.message_type(), 0x7E);
    }

    #[test]
    fn id_conversions() {
        for id in [DeviceId::AParts, DeviceId::BParts, DeviceId::CParts, DeviceId::Broadcast] {
            assert_eq!(DeviceId::try_from(u8::from(id)), Ok(id));
        }
        assert_eq!(u8::from(MessageType::MovementDirection), 0x05);
        assert_eq!(MessageType::try_from(0x00), Err(IdError::UnknownMessageType(0x00)));
    }
}
