//! Shared, non-owning handle over a mutable buffer.
//!
//! The coordinator owns the working image and the grid; workers receive a
//! `SharedBuffer` pointing into them. Every accessor is `unsafe`: the caller
//! promises that, for the duration of the access, no other worker writes the
//! same indices. The pipeline upholds that with [`Partition`] ranges inside
//! a phase and with the barrier between phases.
//!
//! [`Partition`]: crate::partition::Partition

use std::marker::PhantomData;
use std::ops::Range;
use std::ptr::NonNull;

pub(crate) struct SharedBuffer<'a, T> {
    ptr: NonNull<T>,
    len: usize,
    _marker: PhantomData<&'a mut [T]>,
}

// SAFETY: the handle only hands out access under the disjointness contract
// documented on each accessor; with that contract it behaves like a set of
// `&mut [T]` sub-slices split across threads.
unsafe impl<T: Send> Send for SharedBuffer<'_, T> {}
unsafe impl<T: Send + Sync> Sync for SharedBuffer<'_, T> {}

impl<'a, T: Copy> SharedBuffer<'a, T> {
    pub(crate) fn new(data: &'a mut [T]) -> Self {
        Self {
            len: data.len(),
            ptr: NonNull::from(data).cast(),
            _marker: PhantomData,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Mutable view of `range`.
    ///
    /// # Safety
    /// No other access to any index in `range` may happen while the returned
    /// slice is alive.
    pub(crate) unsafe fn slice_mut(&self, range: Range<usize>) -> &mut [T] {
        assert!(
            range.start <= range.end && range.end <= self.len,
            "range {:?} out of bounds for length {}",
            range,
            self.len
        );
        std::slice::from_raw_parts_mut(self.ptr.as_ptr().add(range.start), range.end - range.start)
    }

    /// Read-only view of the whole buffer.
    ///
    /// # Safety
    /// Nobody may write to the buffer while the returned slice is alive.
    pub(crate) unsafe fn as_slice(&self) -> &[T] {
        std::slice::from_raw_parts(self.ptr.as_ptr(), self.len)
    }

    /// Store one element.
    ///
    /// # Safety
    /// No other access to `index` may happen concurrently.
    pub(crate) unsafe fn write(&self, index: usize, value: T) {
        assert!(index < self.len, "index {} out of bounds for length {}", index, self.len);
        self.ptr.as_ptr().add(index).write(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::partition_all;

    #[test]
    fn test_disjoint_bands_written_from_threads() {
        let mut data = vec![0u32; 1000];
        {
            let shared = SharedBuffer::new(&mut data);
            let parts = partition_all(7, shared.len());
            std::thread::scope(|s| {
                for (id, part) in parts.iter().enumerate() {
                    let shared = &shared;
                    s.spawn(move || {
                        // SAFETY: partitions are pairwise disjoint.
                        let band = unsafe { shared.slice_mut(part.range()) };
                        for (offset, slot) in band.iter_mut().enumerate() {
                            *slot = (id * 10_000 + part.start + offset) as u32;
                        }
                    });
                }
            });
        }

        let parts = partition_all(7, 1000);
        for (id, part) in parts.iter().enumerate() {
            for i in part.range() {
                assert_eq!(data[i], (id * 10_000 + i) as u32);
            }
        }
    }

    #[test]
    fn test_single_writes_then_read_back() {
        let mut data = vec![0u8; 4];
        let shared = SharedBuffer::new(&mut data);
        unsafe {
            shared.write(1, 5);
            shared.write(3, 9);
            assert_eq!(shared.as_slice(), &[0, 5, 0, 9]);
        }
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_write_out_of_bounds_panics() {
        let mut data = vec![0u8; 2];
        let shared = SharedBuffer::new(&mut data);
        unsafe { shared.write(2, 1) };
    }
}
