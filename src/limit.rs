use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use crate::error::{FrameError, Result};

/// Default maximum payload size: 512 bytes.
pub const DEFAULT_MAX_PACKAGE_SIZE: u32 = 512;

/// Limit value meaning "no limit".
pub const UNLIMITED: u32 = 0;

/// Shared, reconfigurable maximum package size.
///
/// Clones share one atomic cell: setup code keeps a handle and may call
/// [`set`](Self::set) at any time, while connection workers consult theirs on
/// every unpack. A value of 0 disables the check entirely.
#[derive(Debug, Clone)]
pub struct PackageLimit(Arc<AtomicU32>);

impl PackageLimit {
    /// Create a limit handle with an explicit maximum.
    pub fn new(max: u32) -> Self {
        Self(Arc::new(AtomicU32::new(max)))
    }

    /// Create a limit handle that accepts any payload length.
    pub fn unlimited() -> Self {
        Self::new(UNLIMITED)
    }

    /// Replace the maximum for all subsequent unpack calls on any clone.
    pub fn set(&self, max: u32) {
        self.0.store(max, Ordering::Relaxed);
    }

    /// Current maximum (0 = unlimited).
    pub fn get(&self) -> u32 {
        self.0.load(Ordering::Relaxed)
    }

    /// Validate a declared payload length against the current maximum.
    pub fn check(&self, length: u32) -> Result<()> {
        let max = self.get();
        if max != UNLIMITED && length > max {
            return Err(FrameError::PackageTooLarge { length, max });
        }
        Ok(())
    }
}

impl Default for PackageLimit {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PACKAGE_SIZE)
    }
}
