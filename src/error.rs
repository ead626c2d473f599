use core::fmt;

/// Reasons a receive attempt rejected the bytes in front of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// Not enough bytes buffered to finish the current step. Bytes
    /// consumed before the shortfall are gone.
    InsufficientData { available: usize },
    /// First byte of the attempt was not `PACKET_HEADER`. The byte is consumed.
    HeaderMismatch { found: u8 },
    /// Declared payload length is larger than `MAX_PAYLOAD_SIZE`.
    PayloadTooLarge { length: u8 },
    ChecksumMismatch { calculated: u8, found: u8 },
}

impl FrameError {
    /// True when retrying on a later poll tick may succeed.
    pub fn is_incomplete(&self) -> bool {
        matches!(self, FrameError::InsufficientData { .. })
    }
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::InsufficientData { available } => {
                write!(f, "insufficient data ({available} bytes buffered)")
            }
            FrameError::HeaderMismatch { found } => {
                write!(f, "header mismatch (found {found:#04x})")
            }
            FrameError::PayloadTooLarge { length } => {
                write!(f, "payload length {length} exceeds maximum")
            }
            FrameError::ChecksumMismatch { calculated, found } => write!(
                f,
                "checksum mismatch (calculated {calculated:#04x}, found {found:#04x})"
            ),
        }
    }
}

/// Errors building or encoding a packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketError {
    PayloadTooLarge { length: usize },
    /// The payload source holds fewer bytes than the declared length.
    PayloadSourceTooShort { expected: usize, found: usize },
    EncodeBufferTooSmall { expected: usize, found: usize },
}

impl fmt::Display for PacketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PacketError::PayloadTooLarge { length } => {
                write!(f, "payload length {length} exceeds maximum")
            }
            PacketError::PayloadSourceTooShort { expected, found } => write!(
                f,
                "payload source too short (expected {expected} bytes, found {found})"
            ),
            PacketError::EncodeBufferTooSmall { expected, found } => write!(
                f,
                "encode buffer too small (expected {expected} bytes, found {found})"
            ),
        }
    }
}

/// A byte that does not name a known device or message kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdError {
    UnknownDeviceId(u8),
    UnknownMessageType(u8),
}

impl fmt::Display for IdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdError::UnknownDeviceId(b) => write!(f, "unknown device id {b:#04x}"),
            IdError::UnknownMessageType(b) => write!(f, "unknown message type {b:#04x}"),
        }
    }
}

/// Error from a framer operation: either the frame was bad or the
/// transport underneath failed.
#[derive(Debug)]
pub enum LinkError<E> {
    Frame(FrameError),
    Io(E),
}

impl<E> LinkError<E> {
    /// The frame-level error, if this is one.
    pub fn frame(&self) -> Option<FrameError> {
        match self {
            LinkError::Frame(e) => Some(*e),
            LinkError::Io(_) => None,
        }
    }
}

impl<E> From<FrameError> for LinkError<E> {
    fn from(value: FrameError) -> Self {
        LinkError::Frame(value)
    }
}

impl<E: fmt::Debug> fmt::Display for LinkError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkError::Frame(e) => write!(f, "frame error: {e}"),
            LinkError::Io(e) => write!(f, "transport error: {e:?}"),
        }
    }
}
