use bytes::{Bytes, BytesMut};

use crate::error::{FrameError, Result};

/// A protocol message: type id, declared payload length, and a sequential
/// payload buffer consumed from the front and appended at the back.
///
/// The codec trusts [`len`](Self::len) to match the readable payload at pack
/// time. Receive pipelines build an [`empty`](Self::empty) message, append
/// raw bytes with [`write`](Self::write), and let
/// [`unpack_message`](crate::codec::unpack_message) fill in the header
/// fields.
#[derive(Debug, Clone, Default)]
pub struct Message {
    id: u32,
    length: u32,
    buf: BytesMut,
}

impl Message {
    /// Create a message whose declared length matches the payload.
    pub fn new(id: u32, payload: impl AsRef<[u8]>) -> Self {
        let payload = payload.as_ref();
        Self {
            id,
            length: payload.len() as u32,
            buf: BytesMut::from(payload),
        }
    }

    /// An empty message awaiting header decode.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Message-type id from the header.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Declared payload length from the header, not the buffered byte count.
    pub fn len(&self) -> u32 {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Unread payload bytes.
    pub fn content(&self) -> &[u8] {
        &self.buf
    }

    pub fn set_id(&mut self, id: u32) {
        self.id = id;
    }

    pub fn set_len(&mut self, length: u32) {
        self.length = length;
    }

    /// Consume `n` bytes from the front of the buffer.
    pub fn read(&mut self, n: usize) -> Result<Bytes> {
        if self.buf.len() < n {
            return Err(FrameError::Truncated {
                needed: n,
                available: self.buf.len(),
            });
        }
        Ok(self.buf.split_to(n).freeze())
    }

    /// Append bytes at the back of the buffer.
    pub fn write(&mut self, src: &[u8]) {
        self.buf.extend_from_slice(src);
    }
}
