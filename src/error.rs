/// Errors that can occur during frame packing/unpacking.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The declared payload length exceeds the configured maximum.
    #[error("package too large ({length} bytes, max {max})")]
    PackageTooLarge { length: u32, max: u32 },

    /// A fixed-capacity destination cannot hold the frame.
    #[error("insufficient capacity (need {needed} bytes, have {capacity})")]
    InsufficientCapacity { needed: usize, capacity: usize },

    /// The source ran out of bytes mid-header or mid-payload.
    #[error("truncated input (need {needed} bytes, have {available})")]
    Truncated { needed: usize, available: usize },

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The connection was closed before a complete frame was received.
    #[error("connection closed (incomplete frame)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, FrameError>;
