use std::io::{Read, Write};

use bytes::BytesMut;

use crate::buffer::{ByteSink, ByteSource, FixedBuf, IoSink, IoSource};
use crate::error::{FrameError, Result};
use crate::limit::PackageLimit;
use crate::message::Message;

/// Frame header: length (4) + id (4) = 8 bytes, both big-endian.
pub const HEADER_SIZE: usize = 8;

/// Header width accessor so callers never hard-code the constant.
pub const fn head_len() -> usize {
    HEADER_SIZE
}

/// Decoded frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Number of payload bytes that follow.
    pub length: u32,
    /// Message-type discriminator, consumer-defined meaning.
    pub id: u32,
}

impl Header {
    pub fn new(length: u32, id: u32) -> Self {
        Self { length, id }
    }

    /// Encode to the canonical wire layout.
    ///
    /// Wire format:
    /// ```text
    /// ┌────────────┬────────────┬──────────────────┐
    /// │ Length     │ Id         │ Payload          │
    /// │ (4B BE)    │ (4B BE)    │ (Length bytes)   │
    /// └────────────┴────────────┴──────────────────┘
    /// ```
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        buf[0..4].copy_from_slice(&self.length.to_be_bytes());
        buf[4..8].copy_from_slice(&self.id.to_be_bytes());
        buf
    }

    /// Total wire size of the frame this header describes.
    pub fn wire_size(&self) -> usize {
        HEADER_SIZE + self.length as usize
    }
}

/// Write header then payload through a sink: length, id, payload, no
/// interleaving. The single pack algorithm; the public variants below only
/// choose the destination.
pub fn pack_into<S: ByteSink>(sink: &mut S, header: Header, payload: &[u8]) -> Result<()> {
    sink.write_bytes(&header.encode())?;
    sink.write_bytes(payload)
}

/// Read and validate a header from a consuming source.
///
/// The cursor advances by exactly [`HEADER_SIZE`] bytes whether or not the
/// size check passes; no other state is committed on failure.
pub fn unpack_from<S: ByteSource>(source: &mut S, limit: &PackageLimit) -> Result<Header> {
    let mut head = [0u8; HEADER_SIZE];
    source.read_bytes(&mut head)?;
    let header = Header {
        length: u32::from_be_bytes(head[0..4].try_into().unwrap()),
        id: u32::from_be_bytes(head[4..8].try_into().unwrap()),
    };
    limit.check(header.length)?;
    Ok(header)
}

/// Pack into a caller-supplied fixed-capacity buffer.
///
/// Returns the number of bytes written. Fails with
/// [`FrameError::InsufficientCapacity`] when `dst` holds fewer than
/// `8 + msg.len()` bytes; nothing is ever written out of bounds.
pub fn pack_slice(msg: &Message, dst: &mut [u8]) -> Result<usize> {
    let header = Header::new(msg.len(), msg.id());
    if dst.len() < header.wire_size() {
        return Err(FrameError::InsufficientCapacity {
            needed: header.wire_size(),
            capacity: dst.len(),
        });
    }
    let mut sink = FixedBuf::new(dst);
    pack_into(&mut sink, header, msg.content())?;
    Ok(sink.written())
}

/// Pack by appending to a growable buffer.
///
/// Capacity is reserved up front as an optimization, not a correctness
/// requirement.
pub fn pack_bytes(msg: &Message, dst: &mut BytesMut) -> Result<()> {
    let header = Header::new(msg.len(), msg.id());
    dst.reserve(header.wire_size());
    pack_into(dst, header, msg.content())
}

/// Pack through a sequential writer, which may be backed by live I/O.
pub fn pack_writer<W: Write>(msg: &Message, dst: W) -> Result<()> {
    let mut sink = IoSink(dst);
    pack_into(&mut sink, Header::new(msg.len(), msg.id()), msg.content())
}

/// Pack a message by draining `msg.len()` payload bytes out of its own
/// internal buffer, after the header. The message's read cursor advances
/// past the payload; no intermediate copy beyond what the destination
/// requires.
pub fn pack_message<S: ByteSink>(msg: &mut Message, sink: &mut S) -> Result<()> {
    let header = Header::new(msg.len(), msg.id());
    sink.write_bytes(&header.encode())?;
    let payload = msg.read(header.length as usize)?;
    sink.write_bytes(&payload)
}

/// Decode a header from a fixed byte span without consuming it.
///
/// Pure: decoding the same span twice yields identical results.
pub fn unpack_slice(src: &[u8], limit: &PackageLimit) -> Result<Header> {
    let mut view = src;
    unpack_from(&mut view, limit)
}

/// Decode a header from a consuming source, advancing it by exactly 8 bytes.
pub fn unpack_source<S: ByteSource>(source: &mut S, limit: &PackageLimit) -> Result<Header> {
    unpack_from(source, limit)
}

/// Decode a header from a sequential reader, which may be backed by live I/O.
pub fn unpack_reader<R: Read>(src: R, limit: &PackageLimit) -> Result<Header> {
    let mut source = IoSource(src);
    unpack_from(&mut source, limit)
}

/// Decode a header out of a message's own buffer and store it back onto the
/// message.
///
/// Mutates in place: the buffer cursor advances 8 bytes and the message's
/// `len`/`id` are overwritten with the decoded values. Meant for receive
/// pipelines that accumulate raw bytes into the message first. On failure
/// the header fields are left untouched.
pub fn unpack_message(msg: &mut Message, limit: &PackageLimit) -> Result<Header> {
    let head = msg.read(HEADER_SIZE)?;
    let header = unpack_slice(&head, limit)?;
    msg.set_len(header.length);
    msg.set_id(header.id);
    Ok(header)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_roundtrip() {
        let limit = PackageLimit::default();
        let msg = Message::new(42, b"hello, frame!");
        let mut wire = BytesMut::new();
        pack_bytes(&msg, &mut wire).unwrap();

        let header = unpack_slice(&wire, &limit).unwrap();
        assert_eq!(header.length, 13);
        assert_eq!(header.id, 42);
        assert_eq!(wire.len(), header.wire_size());
    }

    #[test]
    fn head_len_is_always_8() {
        assert_eq!(head_len(), 8);
        assert_eq!(Header::new(0, 0).encode().len(), 8);
        assert_eq!(Header::new(u32::MAX, u32::MAX).encode().len(), 8);
    }

    #[test]
    fn big_endian_byte_order() {
        let header = Header::new(300, 7);
        assert_eq!(
            header.encode(),
            [0x00, 0x00, 0x01, 0x2C, 0x00, 0x00, 0x00, 0x07]
        );
    }

    #[test]
    fn all_pack_variants_byte_identical() {
        let payload = b"same bytes everywhere";

        let mut fixed = vec![0u8; HEADER_SIZE + payload.len()];
        let written = pack_slice(&Message::new(9, payload), &mut fixed).unwrap();
        assert_eq!(written, fixed.len());

        let mut grown = BytesMut::new();
        pack_bytes(&Message::new(9, payload), &mut grown).unwrap();

        let mut streamed = Vec::new();
        pack_writer(&Message::new(9, payload), &mut streamed).unwrap();

        let mut drained = Vec::new();
        pack_message(&mut Message::new(9, payload), &mut drained).unwrap();

        assert_eq!(fixed.as_slice(), grown.as_ref());
        assert_eq!(fixed.as_slice(), streamed.as_slice());
        assert_eq!(fixed.as_slice(), drained.as_slice());
    }

    #[test]
    fn pack_slice_one_byte_short() {
        let payload = b"short by one";
        let msg = Message::new(1, payload);
        let mut dst = vec![0xEEu8; HEADER_SIZE + payload.len() - 1];
        let err = pack_slice(&msg, &mut dst).unwrap_err();
        assert!(matches!(err, FrameError::InsufficientCapacity { .. }));
        // Destination untouched on failure.
        assert!(dst.iter().all(|&b| b == 0xEE));
    }

    #[test]
    fn pack_empty_payload() {
        let mut wire = BytesMut::new();
        pack_bytes(&Message::new(5, b""), &mut wire).unwrap();
        assert_eq!(wire.len(), HEADER_SIZE);

        let header = unpack_slice(&wire, &PackageLimit::default()).unwrap();
        assert_eq!(header.length, 0);
        assert_eq!(header.id, 5);
    }

    #[test]
    fn pack_message_drains_payload() {
        let mut msg = Message::new(2, b"drain me");
        let mut wire = BytesMut::new();
        pack_message(&mut msg, &mut wire).unwrap();
        assert_eq!(wire.len(), HEADER_SIZE + 8);
        assert!(msg.content().is_empty());
    }

    #[test]
    fn pack_message_short_buffer() {
        // Declared length trusted but unbacked by buffered bytes.
        let mut msg = Message::new(2, b"abcd");
        msg.set_len(10);
        let mut wire = BytesMut::new();
        let err = pack_message(&mut msg, &mut wire).unwrap_err();
        assert!(matches!(
            err,
            FrameError::Truncated { needed: 10, available: 4 }
        ));
    }

    #[test]
    fn guard_enforced_at_boundary() {
        let limit = PackageLimit::new(512);

        let ok = unpack_slice(&Header::new(512, 1).encode(), &limit).unwrap();
        assert_eq!(ok.length, 512);

        let zero = unpack_slice(&Header::new(0, 1).encode(), &limit).unwrap();
        assert_eq!(zero.length, 0);

        let err = unpack_slice(&Header::new(513, 1).encode(), &limit).unwrap_err();
        assert!(matches!(
            err,
            FrameError::PackageTooLarge { length: 513, max: 512 }
        ));
    }

    #[test]
    fn unlimited_accepts_any_length() {
        let limit = PackageLimit::unlimited();
        let header = unpack_slice(&Header::new(u32::MAX, 3).encode(), &limit).unwrap();
        assert_eq!(header.length, u32::MAX);
    }

    #[test]
    fn unpack_slice_is_idempotent() {
        let limit = PackageLimit::default();
        let wire = Header::new(300, 7).encode();
        let first = unpack_slice(&wire, &limit).unwrap();
        let second = unpack_slice(&wire, &limit).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn unpack_source_consumes_exactly_8() {
        let limit = PackageLimit::default();
        let mut wire = Vec::new();
        wire.extend_from_slice(&Header::new(4, 6).encode());
        wire.extend_from_slice(b"tail");

        let mut src: &[u8] = &wire;
        let header = unpack_source(&mut src, &limit).unwrap();
        assert_eq!((header.length, header.id), (4, 6));
        assert_eq!(src, b"tail");
    }

    #[test]
    fn unpack_source_advances_on_guard_failure() {
        let limit = PackageLimit::new(16);
        let mut wire = Vec::new();
        wire.extend_from_slice(&Header::new(9999, 1).encode());
        wire.extend_from_slice(b"rest");

        let mut src: &[u8] = &wire;
        let err = unpack_source(&mut src, &limit).unwrap_err();
        assert!(matches!(err, FrameError::PackageTooLarge { .. }));
        // Header bytes were consumed, nothing more.
        assert_eq!(src, b"rest");
    }

    #[test]
    fn unpack_truncated_header() {
        let limit = PackageLimit::default();
        let err = unpack_slice(&[0u8; 7], &limit).unwrap_err();
        assert!(matches!(
            err,
            FrameError::Truncated { needed: 8, available: 7 }
        ));
    }

    #[test]
    fn unpack_reader_over_stream() {
        let limit = PackageLimit::default();
        let wire = Header::new(16, 0xDEAD).encode();
        let header = unpack_reader(std::io::Cursor::new(wire.to_vec()), &limit).unwrap();
        assert_eq!((header.length, header.id), (16, 0xDEAD));
    }

    #[test]
    fn unpack_message_stores_header_and_advances() {
        let limit = PackageLimit::default();
        let mut msg = Message::empty();
        msg.write(&Header::new(3, 77).encode());
        msg.write(b"xyz");

        let header = unpack_message(&mut msg, &limit).unwrap();
        assert_eq!((header.length, header.id), (3, 77));
        assert_eq!(msg.len(), 3);
        assert_eq!(msg.id(), 77);
        assert_eq!(msg.content(), b"xyz");
    }

    #[test]
    fn unpack_message_guard_failure_leaves_fields() {
        let limit = PackageLimit::new(2);
        let mut msg = Message::empty();
        msg.write(&Header::new(100, 77).encode());

        let err = unpack_message(&mut msg, &limit).unwrap_err();
        assert!(matches!(err, FrameError::PackageTooLarge { .. }));
        // Header fields untouched, cursor advanced by exactly 8.
        assert_eq!(msg.len(), 0);
        assert_eq!(msg.id(), 0);
        assert!(msg.content().is_empty());
    }

    #[test]
    fn roundtrip_through_message_pipeline() {
        let limit = PackageLimit::default();
        let mut wire = BytesMut::new();
        pack_bytes(&Message::new(11, b"ping"), &mut wire).unwrap();

        let mut received = Message::empty();
        received.write(&wire);
        let header = unpack_message(&mut received, &limit).unwrap();
        let payload = received.read(header.length as usize).unwrap();

        assert_eq!(received.id(), 11);
        assert_eq!(payload.as_ref(), b"ping");
    }
}
