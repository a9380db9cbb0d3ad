use std::ptr::NonNull;
use std::slice;

use crate::duckly::{duckdb_free, duckdb_malloc};
use crate::error::{Error, Result};

/// The allocate/free pair used for every buffer that crosses the host boundary.
///
/// Memory handed to the host must come from the same allocator the host later
/// frees with, so implementations must never fall back to the Rust heap.
pub trait HostAllocator {
    /// Allocates `size` bytes, returning null when the request cannot be satisfied.
    fn allocate(&self, size: usize) -> *mut u8;

    /// Releases a buffer obtained from [`HostAllocator::allocate`].
    ///
    /// # Safety
    /// `ptr` must come from `allocate` on this allocator and not be freed twice.
    unsafe fn free(&self, ptr: *mut u8);
}

/// DuckDB's own allocator (`duckdb_malloc` / `duckdb_free`).
#[derive(Debug, Default, Clone, Copy)]
pub struct DuckDbAllocator;

impl HostAllocator for DuckDbAllocator {
    fn allocate(&self, size: usize) -> *mut u8 {
        unsafe { duckdb_malloc(size).cast() }
    }

    unsafe fn free(&self, ptr: *mut u8) {
        duckdb_free(ptr.cast());
    }
}

/// A host-allocated byte buffer released when dropped.
pub struct HostBuffer<'a, A: HostAllocator + ?Sized> {
    allocator: &'a A,
    ptr: NonNull<u8>,
    len: usize,
}

impl<'a, A: HostAllocator + ?Sized> HostBuffer<'a, A> {
    /// Allocates exactly `len` bytes from `allocator`.
    pub fn allocate(allocator: &'a A, len: usize) -> Result<Self> {
        let ptr = NonNull::new(allocator.allocate(len)).ok_or(Error::AllocationFailure { size: len })?;
        Ok(Self { allocator, ptr, len })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[u8] {
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl<A: HostAllocator + ?Sized> Drop for HostBuffer<'_, A> {
    fn drop(&mut self) {
        unsafe { self.allocator.free(self.ptr.as_ptr()) };
    }
}
