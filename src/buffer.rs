//! Bounded read/write capabilities over the buffer kinds the codec packs
//! into and unpacks from.
//!
//! One pack algorithm and one unpack algorithm cover every destination and
//! source; each concrete buffer kind implements the capability once.

use std::io::{ErrorKind, Read, Write};

use bytes::{BufMut, BytesMut};

use crate::error::{FrameError, Result};

/// Bounded-write destination for packing.
pub trait ByteSink {
    /// Append all of `src`, or fail without writing out of bounds.
    fn write_bytes(&mut self, src: &[u8]) -> Result<()>;
}

/// Bounded, consuming read source for unpacking.
pub trait ByteSource {
    /// Fill all of `dst`, advancing the cursor by exactly `dst.len()` bytes.
    fn read_bytes(&mut self, dst: &mut [u8]) -> Result<()>;
}

/// Checked write cursor over a caller-supplied fixed-capacity buffer.
#[derive(Debug)]
pub struct FixedBuf<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> FixedBuf<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Number of bytes written so far.
    pub fn written(&self) -> usize {
        self.pos
    }
}

impl ByteSink for FixedBuf<'_> {
    fn write_bytes(&mut self, src: &[u8]) -> Result<()> {
        let end = self.pos + src.len();
        if end > self.buf.len() {
            return Err(FrameError::InsufficientCapacity {
                needed: end,
                capacity: self.buf.len(),
            });
        }
        self.buf[self.pos..end].copy_from_slice(src);
        self.pos = end;
        Ok(())
    }
}

impl ByteSink for BytesMut {
    fn write_bytes(&mut self, src: &[u8]) -> Result<()> {
        self.put_slice(src);
        Ok(())
    }
}

impl ByteSink for Vec<u8> {
    fn write_bytes(&mut self, src: &[u8]) -> Result<()> {
        self.extend_from_slice(src);
        Ok(())
    }
}

/// Streaming destination. Blocking behavior belongs to the inner writer, not
/// to the codec.
#[derive(Debug)]
pub struct IoSink<W>(pub W);

impl<W: Write> ByteSink for IoSink<W> {
    fn write_bytes(&mut self, src: &[u8]) -> Result<()> {
        self.0.write_all(src)?;
        Ok(())
    }
}

impl ByteSource for &[u8] {
    fn read_bytes(&mut self, dst: &mut [u8]) -> Result<()> {
        if self.len() < dst.len() {
            return Err(FrameError::Truncated {
                needed: dst.len(),
                available: self.len(),
            });
        }
        let (head, tail) = self.split_at(dst.len());
        dst.copy_from_slice(head);
        *self = tail;
        Ok(())
    }
}

/// Streaming source. A short read surfaces as [`FrameError::Truncated`]
/// rather than a silently incomplete fill.
#[derive(Debug)]
pub struct IoSource<R>(pub R);

impl<R: Read> ByteSource for IoSource<R> {
    fn read_bytes(&mut self, dst: &mut [u8]) -> Result<()> {
        let mut filled = 0;
        while filled < dst.len() {
            match self.0.read(&mut dst[filled..]) {
                Ok(0) => {
                    return Err(FrameError::Truncated {
                        needed: dst.len(),
                        available: filled,
                    });
                }
                Ok(n) => filled += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
        Ok(())
    }
}
