//! Allocates and manages raw, aligned bytes.
use alloc::collections::TryReserveError;
use alloc::vec::Vec;
use core::mem;

use crate::layout::LayoutError;

/// The allocation chunk, sized and aligned for the widest supported texel.
pub(crate) type MaxAligned = u64;

/// Allocates and manages raw bytes, aligned for any supported texel.
///
/// Since the elements are larger than single bytes the storage will **not**
/// have exact sizes as one would be used to from a `Vec` of bytes; the byte
/// capacity is rounded up to a whole number of chunks. Keeping track of the
/// exact wanted byte length is the obligation of the caller, usually by pairing
/// the buffer with a layout that describes it.
#[derive(Clone, Debug, Default)]
pub struct Buffer {
    /// The backing memory.
    inner: Vec<MaxAligned>,
}

impl Buffer {
    const ELEMENT: MaxAligned = 0;

    /// Allocate a zero-filled buffer of at least `length` bytes.
    ///
    /// Panics when the allocator refuses the request, use [`Self::try_new`]
    /// to observe the failure instead.
    pub fn new(length: usize) -> Self {
        let alloc_len = Self::alloc_len(length);
        let inner = alloc::vec![Self::ELEMENT; alloc_len];

        Buffer { inner }
    }

    /// Allocate a zero-filled buffer of at least `length` bytes, reporting
    /// failure.
    pub fn try_new(length: usize) -> Result<Self, LayoutError> {
        let alloc_len = Self::alloc_len(length);

        let mut inner = Vec::new();
        inner.try_reserve_exact(alloc_len)?;
        inner.resize(alloc_len, Self::ELEMENT);

        Ok(Buffer { inner })
    }

    /// Allocate a buffer of at least `length` bytes with unspecified contents.
    ///
    /// Callers must overwrite before relying on any byte. Safe code can not
    /// hand out uninitialized memory so the bytes happen to be zero today,
    /// that is not part of the contract.
    pub fn try_new_unzeroed(length: usize) -> Result<Self, LayoutError> {
        Self::try_new(length)
    }

    /// Retrieve the byte capacity of the allocated storage.
    pub fn capacity(&self) -> usize {
        self.inner.len() * mem::size_of::<MaxAligned>()
    }

    /// View the whole storage as bytes.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.inner.as_slice())
    }

    /// View the whole storage as mutable bytes.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        bytemuck::cast_slice_mut(self.inner.as_mut_slice())
    }

    /// Calculates the number of elements to have a byte buffer of requested
    /// length.
    fn alloc_len(length: usize) -> usize {
        const CHUNK_SIZE: usize = mem::size_of::<MaxAligned>();

        // We allocate enough chunks for at least the length. Can not overflow.
        length / CHUNK_SIZE + usize::from(length % CHUNK_SIZE != 0)
    }
}

impl From<TryReserveError> for LayoutError {
    fn from(_: TryReserveError) -> Self {
        LayoutError::ALLOCATION
    }
}

#[test]
fn buffer_is_aligned_and_zeroed() {
    let buffer = Buffer::new(13);

    assert!(buffer.capacity() >= 13);
    assert_eq!(buffer.capacity() % mem::size_of::<MaxAligned>(), 0);
    assert_eq!(buffer.as_bytes().as_ptr() as usize % mem::align_of::<MaxAligned>(), 0);
    assert!(buffer.as_bytes().iter().all(|&b| b == 0));
}

#[test]
fn zero_length_buffer() {
    let buffer = Buffer::new(0);
    assert_eq!(buffer.capacity(), 0);
    assert!(buffer.as_bytes().is_empty());
}

#[test]
fn fallible_allocation() {
    let buffer = Buffer::try_new(64).expect("small request succeeds");
    assert_eq!(buffer.capacity(), 64);

    // The chunk count overflows the possible allocation size, the reservation
    // fails before any memory is requested.
    let err = Buffer::try_new(usize::MAX).unwrap_err();
    assert!(err.is_allocation_failure());
    assert!(!err.is_invalid_dimension());
}
