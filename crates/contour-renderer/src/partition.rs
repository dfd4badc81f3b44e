//! Static range partitioning of work across a fixed worker pool.
//!
//! Worker `id` of `workers` owns `[floor(id * extent / workers),
//! floor((id + 1) * extent / workers))`. Consecutive ranges share their
//! boundary, so the ranges tile `[0, extent)` with no gaps and no overlap for
//! any worker count, including `extent < workers` where some ranges are empty.

use std::ops::Range;

/// A half-open index range owned by one worker for one phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Partition {
    pub start: usize,
    pub end: usize,
}

impl Partition {
    /// The range worker `id` owns out of `workers` over `extent` indices.
    ///
    /// # Panics
    /// Panics if `workers == 0` or `id >= workers`.
    pub fn for_worker(id: usize, workers: usize, extent: usize) -> Self {
        assert!(workers > 0, "partitioning requires at least one worker");
        assert!(id < workers, "worker id {id} out of range for {workers} workers");

        Self {
            start: split_point(id, workers, extent),
            end: split_point(id + 1, workers, extent),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        (self.start..self.end).contains(&index)
    }

    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Scale the range by `factor`, e.g. from grid cell rows to pixel rows.
    #[inline]
    pub fn scaled(&self, factor: usize) -> Self {
        Self {
            start: self.start * factor,
            end: self.end * factor,
        }
    }

    /// Whether two ranges share at least one index.
    pub fn overlaps(&self, other: &Partition) -> bool {
        !self.is_empty() && !other.is_empty() && self.start < other.end && other.start < self.end
    }
}

/// `floor(k * extent / workers)` without intermediate overflow.
#[inline]
fn split_point(k: usize, workers: usize, extent: usize) -> usize {
    ((k as u128 * extent as u128) / workers as u128) as usize
}

/// Every worker's range, in worker id order.
pub fn partition_all(workers: usize, extent: usize) -> Vec<Partition> {
    (0..workers)
        .map(|id| Partition::for_worker(id, workers, extent))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_tiles(workers: usize, extent: usize) {
        let parts = partition_all(workers, extent);
        assert_eq!(parts.len(), workers);
        assert_eq!(parts[0].start, 0);
        assert_eq!(parts[workers - 1].end, extent);

        for pair in parts.windows(2) {
            assert_eq!(pair[0].end, pair[1].start, "gap or overlap at {:?}", pair);
        }

        let mut covered = vec![0u32; extent];
        for part in &parts {
            for i in part.range() {
                covered[i] += 1;
            }
        }
        assert!(
            covered.iter().all(|&c| c == 1),
            "extent={} workers={} coverage={:?}",
            extent,
            workers,
            covered
        );
    }

    #[test]
    fn test_partitions_tile_extent_exactly() {
        for workers in 1..=17 {
            for extent in 0..=70 {
                assert_tiles(workers, extent);
            }
        }
    }

    #[test]
    fn test_partition_sizes_are_balanced() {
        for workers in 1..=9 {
            for extent in [0usize, 1, 7, 64, 255, 256, 1000] {
                let sizes: Vec<usize> = partition_all(workers, extent).iter().map(|p| p.len()).collect();
                let min = *sizes.iter().min().unwrap();
                let max = *sizes.iter().max().unwrap();
                assert!(max - min <= 1, "sizes {:?}", sizes);
            }
        }
    }

    #[test]
    fn test_fewer_indices_than_workers() {
        let parts = partition_all(4, 2);
        assert_eq!(parts.iter().filter(|p| p.is_empty()).count(), 2);
        assert_eq!(parts.iter().map(|p| p.len()).sum::<usize>(), 2);
    }

    #[test]
    fn test_single_worker_owns_everything() {
        assert_eq!(Partition::for_worker(0, 1, 256), Partition { start: 0, end: 256 });
    }

    #[test]
    fn test_reference_split_for_256_over_3() {
        let parts = partition_all(3, 256);
        assert_eq!(parts[0].range(), 0..85);
        assert_eq!(parts[1].range(), 85..170);
        assert_eq!(parts[2].range(), 170..256);
    }

    #[test]
    fn test_overlaps_and_scaled() {
        let a = Partition { start: 0, end: 4 };
        let b = Partition { start: 4, end: 8 };
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&Partition { start: 3, end: 5 }));
        assert!(!a.overlaps(&Partition { start: 2, end: 2 }));
        assert_eq!(b.scaled(8).range(), 32..64);
    }

    #[test]
    fn test_huge_extent_does_not_overflow() {
        let p = Partition::for_worker(3, 4, usize::MAX);
        assert_eq!(p.end, usize::MAX);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_worker_id_out_of_range_panics() {
        Partition::for_worker(4, 4, 10);
    }
}
