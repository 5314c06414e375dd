use std::io::{ErrorKind, Read};

use bytes::{Buf, BytesMut};
use tracing::trace;

use crate::codec::{unpack_slice, HEADER_SIZE};
use crate::error::{FrameError, Result};
use crate::limit::PackageLimit;
use crate::message::Message;

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;
const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Reads complete frames from any `Read` stream.
///
/// Handles partial reads internally — callers always get complete messages.
/// The size limit handle is shared: reconfiguring it elsewhere takes effect
/// on the next header decode.
pub struct FrameReader<T> {
    inner: T,
    buf: BytesMut,
    limit: PackageLimit,
}

impl<T: Read> FrameReader<T> {
    /// Create a frame reader with the default 512-byte package limit.
    pub fn new(inner: T) -> Self {
        Self::with_limit(inner, PackageLimit::default())
    }

    /// Create a frame reader sharing an existing limit handle.
    pub fn with_limit(inner: T, limit: PackageLimit) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            limit,
        }
    }

    /// Read the next complete frame (blocking).
    ///
    /// Returns `Err(FrameError::ConnectionClosed)` when EOF is reached.
    pub fn read_frame(&mut self) -> Result<Message> {
        loop {
            if let Some(msg) = self.try_decode()? {
                return Ok(msg);
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            };

            if read == 0 {
                return Err(FrameError::ConnectionClosed);
            }

            self.buf.extend_from_slice(&chunk[..read]);
        }
    }

    /// Decode one frame from the accumulation buffer, if complete.
    fn try_decode(&mut self) -> Result<Option<Message>> {
        if self.buf.len() < HEADER_SIZE {
            return Ok(None); // Need more data
        }

        // Non-consuming peek: the guard fires as soon as the header is in,
        // without waiting for an oversized payload to arrive.
        let header = unpack_slice(&self.buf, &self.limit)?;

        if self.buf.len() < header.wire_size() {
            return Ok(None); // Need more data
        }

        self.buf.advance(HEADER_SIZE);
        let payload = self.buf.split_to(header.length as usize);
        trace!(id = header.id, length = header.length, "decoded frame");
        Ok(Some(Message::new(header.id, payload)))
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// The shared package size limit consulted on every decode.
    pub fn limit(&self) -> &PackageLimit {
        &self.limit
    }
}
