use std::mem;

use tracing::{debug, trace};

use super::ResizableRecord;
use super::resizable::buffer_layout;
use crate::allocator::RecordAllocator;
use crate::error::RecordError;
use crate::layout::Lengths;

impl<A: RecordAllocator> ResizableRecord<'_, A> {
    /// Change the lengths of the array fields.
    ///
    /// `new_lengths` replaces the current lengths entirely: an array field
    /// left at 0 in `new_lengths` is truncated to 0 even if it was not meant
    /// to change. Build it from `self.lengths().clone()` to keep the others.
    ///
    /// Strategy: allocate a new buffer, copy the surviving prefix of every
    /// field into its new position, free the old buffer. Grown tails hold
    /// whatever the allocator returned; shrunk tails are gone for good.
    ///
    /// Identical lengths return immediately without touching the buffer.
    /// On failure the record is left exactly as it was.
    pub fn resize(&mut self, new_lengths: Lengths) -> Result<(), RecordError> {
        let layout = self.layout;
        layout.check(&new_lengths)?;

        if new_lengths == self.lengths {
            trace!("resize with unchanged lengths");
            return Ok(());
        }

        let old_spans = layout.spans(&self.lengths)?;
        let new_spans = layout.spans(&new_lengths)?;
        let new_size = layout.calc_size(&new_lengths)?;
        let align = layout.overall_align();
        let new_buf_layout = buffer_layout(new_size, align)?;

        let new_ptr = self
            .alloc
            .allocate(new_buf_layout)
            .map_err(|_| RecordError::OutOfMemory {
                size: new_size,
                align,
            })?;

        // SAFETY: fresh allocation of `new_size` initialized bytes, disjoint
        // from the current buffer.
        let dst = unsafe { std::slice::from_raw_parts_mut(new_ptr.as_ptr(), new_size) };
        let src = self.as_bytes();
        for (old, new) in old_spans.iter().zip(&new_spans) {
            let n = old.size.min(new.size);
            dst[new.offset..new.offset + n].copy_from_slice(&src[old.offset..old.offset + n]);
        }

        let old_ptr = mem::replace(&mut self.ptr, new_ptr);
        let old_buf_layout = mem::replace(&mut self.buf_layout, new_buf_layout);
        self.lengths = new_lengths;

        // SAFETY: old_ptr came from `allocate(old_buf_layout)` and nothing
        // borrows it anymore (`&mut self`).
        unsafe { self.alloc.deallocate(old_ptr, old_buf_layout) };

        debug!(
            old_size = old_buf_layout.size(),
            new_size, "resized record buffer"
        );
        Ok(())
    }
}
