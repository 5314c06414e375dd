//! Length-prefixed message framing for TCP protocols.
//!
//! Every message on the wire is an 8-byte header followed by its payload:
//! - A 4-byte big-endian payload length
//! - A 4-byte big-endian message-type id
//! - `length` payload bytes, opaque to the codec
//!
//! Packing and unpacking are each a single algorithm parameterized over small
//! sink/source capabilities, so fixed buffers, growable buffers, streaming
//! writers, and message-internal buffers all produce byte-identical frames.
//! A shared [`PackageLimit`] caps the payload length accepted on every unpack
//! path (default 512 bytes, 0 = unlimited).

pub mod buffer;
pub mod codec;
pub mod error;
pub mod limit;
pub mod message;
pub mod reader;
pub mod writer;

pub use buffer::{ByteSink, ByteSource, FixedBuf, IoSink, IoSource};
pub use codec::{
    head_len, pack_bytes, pack_into, pack_message, pack_slice, pack_writer, unpack_from,
    unpack_message, unpack_reader, unpack_slice, unpack_source, Header, HEADER_SIZE,
};
pub use error::{FrameError, Result};
pub use limit::{PackageLimit, DEFAULT_MAX_PACKAGE_SIZE, UNLIMITED};
pub use message::Message;
pub use reader::FrameReader;
pub use writer::FrameWriter;
