use std::alloc::Layout;
use std::fmt;
use std::ptr::NonNull;

use tracing::debug;

use crate::allocator::{Global, RecordAllocator};
use crate::error::RecordError;
use crate::layout::{Lengths, RecordLayout};

// ─── ResizableRecord ────────────────────────────────────────────────────────

/// A record whose fixed and array fields share one contiguous, aligned
/// buffer.
///
/// The record owns its buffer and allocator and borrows its layout. Field
/// offsets are never stored; they are recomputed from `lengths` on every
/// access. Views returned by `get*` borrow the record, so the borrow checker
/// ends them before any `resize` or drop.
///
/// | Operation              | Allocations | Cost                  |
/// |------------------------|-------------|-----------------------|
/// | `get*` / `set*`        | 0           | O(fields)             |
/// | `resize` (same lengths)| 0           | O(fields)             |
/// | `resize` (changed)     | 1 + 1 free  | O(fields + bytes)     |
pub struct ResizableRecord<'l, A: RecordAllocator = Global> {
    pub(crate) layout: &'l RecordLayout,
    pub(crate) ptr: NonNull<u8>,
    /// Size and alignment of the current buffer. `size == calc_size(lengths)`.
    pub(crate) buf_layout: Layout,
    pub(crate) lengths: Lengths,
    pub(crate) alloc: A,
}

// SAFETY: the record exclusively owns its buffer; shared access only reads
// and every mutation goes through `&mut self`.
unsafe impl<A: RecordAllocator + Send> Send for ResizableRecord<'_, A> {}
unsafe impl<A: RecordAllocator + Sync> Sync for ResizableRecord<'_, A> {}

#[inline]
pub(crate) fn buffer_layout(size: usize, align: usize) -> Result<Layout, RecordError> {
    Layout::from_size_align(size, align).map_err(|_| RecordError::SizeOverflow)
}

impl<'l> ResizableRecord<'l, Global> {
    /// Allocate a record from the global allocator.
    pub fn new(layout: &'l RecordLayout, lengths: Lengths) -> Result<Self, RecordError> {
        Self::init(layout, lengths, Global)
    }
}

impl<'l, A: RecordAllocator> ResizableRecord<'l, A> {
    // ════════════════════════════════════════════════════════════════════════
    // Lifecycle
    // ════════════════════════════════════════════════════════════════════════

    /// Allocate a buffer of `layout.calc_size(&lengths)` bytes aligned to
    /// `layout.overall_align()`.
    ///
    /// The engine does not fill the buffer: field contents are whatever the
    /// allocator returned until written.
    pub fn init(layout: &'l RecordLayout, lengths: Lengths, alloc: A) -> Result<Self, RecordError> {
        let size = layout.calc_size(&lengths)?;
        let align = layout.overall_align();
        let buf_layout = buffer_layout(size, align)?;
        let ptr = alloc
            .allocate(buf_layout)
            .map_err(|_| RecordError::OutOfMemory { size, align })?;

        debug!(size, align, "allocated record buffer");
        Ok(Self {
            layout,
            ptr,
            buf_layout,
            lengths,
            alloc,
        })
    }

    /// Release the buffer. Same as dropping the record.
    #[inline]
    pub fn deinit(self) {
        drop(self)
    }

    // ════════════════════════════════════════════════════════════════════════
    // Buffer access
    // ════════════════════════════════════════════════════════════════════════

    #[inline]
    pub fn layout(&self) -> &'l RecordLayout {
        self.layout
    }

    /// Current array lengths. Clone and edit this to build the argument of
    /// `resize` when only some arrays change.
    #[inline]
    pub fn lengths(&self) -> &Lengths {
        &self.lengths
    }

    /// Element count of array field `name`.
    pub fn len_of(&self, name: &str) -> Result<usize, RecordError> {
        self.lengths.get(self.layout, name)
    }

    /// Total buffer size in bytes.
    #[inline]
    pub fn byte_len(&self) -> usize {
        self.buf_layout.size()
    }

    /// Start of the buffer. Changes only when `resize` reallocates.
    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        self.ptr.as_ptr()
    }

    #[inline]
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: the allocator contract guarantees `size` initialized bytes
        // (or an aligned dangling pointer for size 0).
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.buf_layout.size()) }
    }

    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        // SAFETY: as above; `&mut self` guarantees exclusive access.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.buf_layout.size()) }
    }
}

impl<A: RecordAllocator> Drop for ResizableRecord<'_, A> {
    fn drop(&mut self) {
        debug!(size = self.buf_layout.size(), "released record buffer");
        // SAFETY: `ptr` came from `alloc.allocate(buf_layout)` and is not
        // used after this point.
        unsafe { self.alloc.deallocate(self.ptr, self.buf_layout) }
    }
}

impl<A: RecordAllocator> fmt::Debug for ResizableRecord<'_, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResizableRecord")
            .field("size", &self.buf_layout.size())
            .field("align", &self.buf_layout.align())
            .field("lengths", &self.lengths.as_slice())
            .finish()
    }
}
