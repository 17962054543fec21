//! Buffer allocation capability used by records.
//!
//! A record never grows its buffer in place: every resize allocates a new
//! buffer, copies, then frees the old one. Allocators therefore only need
//! `allocate` and `deallocate`.

use std::alloc::Layout;
use std::cell::Cell;
use std::ptr::NonNull;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("memory allocation failed")]
pub struct AllocError;

// ─── RecordAllocator Trait ──────────────────────────────────────────────────

/// Source of aligned record buffers.
///
/// # Safety
///
/// `allocate` must return a pointer to `layout.size()` bytes aligned to
/// `layout.align()`, valid until passed to `deallocate`, and every byte must
/// be initialized (the values are unspecified). For a zero-size layout the
/// pointer may be dangling but must still be aligned. `deallocate` is only
/// called with a pointer and layout previously returned/passed by
/// `allocate` on the same allocator.
pub unsafe trait RecordAllocator {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError>;

    /// # Safety
    ///
    /// `ptr` must come from `allocate` on this allocator with this `layout`
    /// and must not be used afterwards.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);
}

unsafe impl<A: RecordAllocator + ?Sized> RecordAllocator for &A {
    #[inline]
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        (**self).allocate(layout)
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: forwarded contract.
        unsafe { (**self).deallocate(ptr, layout) }
    }
}

#[inline]
fn dangling(layout: Layout) -> NonNull<u8> {
    // A nonzero power of two is a valid, aligned, non-null address.
    NonNull::new(std::ptr::without_provenance_mut(layout.align())).unwrap_or(NonNull::dangling())
}

// ─── Global ─────────────────────────────────────────────────────────────────

/// The process-wide Rust allocator. Buffers come back zeroed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Global;

unsafe impl RecordAllocator for Global {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        if layout.size() == 0 {
            return Ok(dangling(layout));
        }
        // SAFETY: size is nonzero.
        let ptr = unsafe { std::alloc::alloc_zeroed(layout) };
        NonNull::new(ptr).ok_or(AllocError)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        if layout.size() == 0 {
            return;
        }
        // SAFETY: caller guarantees ptr came from `allocate` with this layout.
        unsafe { std::alloc::dealloc(ptr.as_ptr(), layout) }
    }
}

// ─── BudgetAllocator ────────────────────────────────────────────────────────

/// Wraps another allocator and refuses requests that would push live bytes
/// past a fixed budget. Keeps simple counters for leak checks.
///
/// Not thread-safe: counters use `Cell`.
#[derive(Debug)]
pub struct BudgetAllocator<A: RecordAllocator = Global> {
    inner: A,
    budget: Cell<usize>,
    live_bytes: Cell<usize>,
    allocations: Cell<usize>,
    frees: Cell<usize>,
}

impl BudgetAllocator<Global> {
    pub fn new(budget: usize) -> Self {
        Self::with_inner(Global, budget)
    }
}

impl<A: RecordAllocator> BudgetAllocator<A> {
    pub fn with_inner(inner: A, budget: usize) -> Self {
        Self {
            inner,
            budget: Cell::new(budget),
            live_bytes: Cell::new(0),
            allocations: Cell::new(0),
            frees: Cell::new(0),
        }
    }

    /// Change the budget. Existing allocations are unaffected.
    pub fn set_budget(&self, budget: usize) {
        self.budget.set(budget);
    }

    #[inline]
    pub fn budget(&self) -> usize {
        self.budget.get()
    }

    /// Bytes currently handed out and not yet freed.
    #[inline]
    pub fn live_bytes(&self) -> usize {
        self.live_bytes.get()
    }

    /// Successful `allocate` calls.
    #[inline]
    pub fn allocations(&self) -> usize {
        self.allocations.get()
    }

    #[inline]
    pub fn frees(&self) -> usize {
        self.frees.get()
    }
}

unsafe impl<A: RecordAllocator> RecordAllocator for BudgetAllocator<A> {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        let live = self.live_bytes.get();
        match live.checked_add(layout.size()) {
            Some(total) if total <= self.budget.get() => {}
            _ => return Err(AllocError),
        }
        let ptr = self.inner.allocate(layout)?;
        self.live_bytes.set(live + layout.size());
        self.allocations.set(self.allocations.get() + 1);
        Ok(ptr)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: forwarded contract.
        unsafe { self.inner.deallocate(ptr, layout) };
        self.live_bytes.set(self.live_bytes.get() - layout.size());
        self.frees.set(self.frees.get() + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_zero_size_is_aligned() {
        let layout = Layout::from_size_align(0, 16).unwrap();
        let ptr = Global.allocate(layout).unwrap();
        assert_eq!(ptr.as_ptr() as usize % 16, 0);
        unsafe { Global.deallocate(ptr, layout) };
    }

    #[test]
    fn test_global_alignment() {
        let layout = Layout::from_size_align(40, 64).unwrap();
        let ptr = Global.allocate(layout).unwrap();
        assert_eq!(ptr.as_ptr() as usize % 64, 0);
        unsafe { Global.deallocate(ptr, layout) };
    }

    #[test]
    fn test_budget_refuses_over_limit() {
        let alloc = BudgetAllocator::new(64);
        let small = Layout::from_size_align(48, 8).unwrap();
        let big = Layout::from_size_align(32, 8).unwrap();

        let p = alloc.allocate(small).unwrap();
        assert_eq!(alloc.live_bytes(), 48);
        assert_eq!(alloc.allocate(big), Err(AllocError));
        assert_eq!(alloc.allocations(), 1);

        unsafe { alloc.deallocate(p, small) };
        assert_eq!(alloc.live_bytes(), 0);
        assert_eq!(alloc.frees(), 1);

        let p = alloc.allocate(big).unwrap();
        unsafe { alloc.deallocate(p, big) };
        assert_eq!(alloc.allocations(), alloc.frees());
    }

    #[test]
    fn test_budget_through_reference() {
        let alloc = BudgetAllocator::new(16);
        let by_ref = &alloc;
        let layout = Layout::from_size_align(16, 4).unwrap();
        let p = by_ref.allocate(layout).unwrap();
        assert_eq!(alloc.live_bytes(), 16);
        unsafe { by_ref.deallocate(p, layout) };
        assert_eq!(alloc.live_bytes(), 0);
    }
}
