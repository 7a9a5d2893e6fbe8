use std::{alloc::Layout, cell::Cell, mem, ptr, slice, str};

use bumpalo::Bump;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::VmError;

/// Initial chunk size handed to the bump allocator when nothing else is configured.
pub const DEFAULT_ARENA_CAPACITY: usize = 16 * 1024;

/// Sizing knobs for the per-run arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Bytes reserved up front.
    pub capacity: usize,
    /// Hard ceiling on payload bytes handed out during a run; `None` means unbounded.
    pub limit: Option<usize>,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_ARENA_CAPACITY,
            limit: None,
        }
    }
}

/// Bump arena backing every value of a single run.
///
/// Nothing allocated here is ever freed on its own. The whole region goes away when the
/// arena is dropped, which happens exactly once at the end of a run. Destructors of
/// allocated payloads never run, so payloads must be plain `Copy` data.
#[derive(Debug)]
pub struct Arena {
    bump: Bump,
    used: Cell<usize>,
    limit: Option<usize>,
}

impl Arena {
    pub fn new(config: ArenaConfig) -> Self {
        let capacity = match config.limit {
            Some(limit) => config.capacity.min(limit),
            None => config.capacity,
        };
        Self {
            bump: Bump::with_capacity(capacity),
            used: Cell::new(0),
            limit: config.limit,
        }
    }

    /// Payload bytes handed out so far. Never decreases, so this is also the high-water mark.
    #[inline]
    pub fn used_bytes(&self) -> usize {
        self.used.get()
    }

    /// Bytes the underlying allocator has reserved from the system, including slack.
    pub fn reserved_bytes(&self) -> usize {
        self.bump.allocated_bytes()
    }

    /// Fail with `AllocationFailed` unless `bytes` more payload bytes fit under the limit.
    ///
    /// The limit counts payload bytes, not chunk slack, so it holds regardless of how large
    /// a first chunk the allocator reserved.
    pub fn ensure_room(&self, bytes: usize) -> Result<(), VmError> {
        match self.limit {
            Some(limit) if self.used.get().saturating_add(bytes) > limit => {
                trace!(
                    target: "pyrite::vm::alloc",
                    bytes,
                    used_bytes = self.used.get(),
                    limit,
                    "arena.limit_exceeded"
                );
                Err(VmError::AllocationFailed { bytes })
            }
            _ => Ok(()),
        }
    }

    /// Move `value` into the arena.
    pub fn alloc<T: Copy>(&self, value: T) -> Result<&T, VmError> {
        let bytes = mem::size_of::<T>();
        self.ensure_room(bytes)?;
        let slot = self
            .bump
            .try_alloc(value)
            .map_err(|_| VmError::AllocationFailed { bytes })?;
        self.record(bytes);
        Ok(slot)
    }

    /// Copy `src` into the arena and return the arena-owned copy.
    pub fn alloc_slice_copy<T: Copy>(&self, src: &[T]) -> Result<&[T], VmError> {
        if src.is_empty() {
            return Ok(&[]);
        }
        let layout = Layout::for_value(src);
        self.ensure_room(layout.size())?;
        let dst = self
            .bump
            .try_alloc_layout(layout)
            .map_err(|_| VmError::AllocationFailed { bytes: layout.size() })?;
        self.record(layout.size());
        // SAFETY: `dst` was just allocated with the size and alignment of `src`, does not
        // overlap it, and `T: Copy` so a bitwise copy yields valid values.
        unsafe {
            let dst = dst.as_ptr().cast::<T>();
            ptr::copy_nonoverlapping(src.as_ptr(), dst, src.len());
            Ok(slice::from_raw_parts(dst, src.len()))
        }
    }

    pub fn alloc_str(&self, src: &str) -> Result<&str, VmError> {
        let bytes = self.alloc_slice_copy(src.as_bytes())?;
        // SAFETY: the bytes were copied verbatim from a valid `str`.
        Ok(unsafe { str::from_utf8_unchecked(bytes) })
    }

    fn record(&self, bytes: usize) {
        let total = self.used.get() + bytes;
        self.used.set(total);
        trace!(
            target: "pyrite::vm::alloc",
            bytes,
            total_bytes = total,
            "arena.alloc"
        );
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(ArenaConfig::default())
    }
}
