//! Distribution of an assembled system into per-process triple lists.
//!
//! The downstream distributed factorization consumes the global matrix
//! as local `(row, col, value)` coordinate triples, 1-based, with each
//! process owning a contiguous near-equal-by-nonzero-count range of the
//! global triple list.  This module provides the count-then-partition
//! range math and the local triple container; producing the global
//! triple stream itself (block-ordered, nonzero-exact) is the caller's
//! side of the boundary.

use crate::algebra::{CsrMatrix, FloatT};
use crate::comm::ProcessGroup;
use std::ops::Range;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The contiguous range of global nonzero ordinals owned by `rank` when
/// `total_nnz` entries are split across `nranks` processes.
///
/// Counts differ by at most one across ranks: the remainder of the
/// division is spread over the lowest ranks.  The ranges of all ranks
/// tile `0..total_nnz` exactly.
///
/// # Panics
/// Panics if `nranks` is zero or `rank` is out of range.
pub fn nnz_owned_range(total_nnz: usize, rank: usize, nranks: usize) -> Range<usize> {
    assert!(nranks > 0);
    assert!(rank < nranks);

    let per_rank = total_nnz / nranks;
    let remainder = total_nnz - nranks * per_rank;

    let start = rank * per_rank + rank.min(remainder);
    let end = (rank + 1) * per_rank + (rank + 1).min(remainder);
    start..end
}

/// One process's slice of the global coordinate-triple list.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LocalTriples<T: FloatT> {
    /// global square matrix dimension
    pub n: usize,
    /// global nonzero total across all ranks
    pub global_nnz: usize,
    /// local row indices, 0-based until [`convert_to_one_based`](LocalTriples::convert_to_one_based)
    pub rows: Vec<usize>,
    /// local column indices
    pub cols: Vec<usize>,
    /// local values
    pub vals: Vec<T>,
    one_based: bool,
}

impl<T: FloatT> LocalTriples<T> {
    pub fn new(n: usize, global_nnz: usize) -> Self {
        Self {
            n,
            global_nnz,
            rows: Vec::new(),
            cols: Vec::new(),
            vals: Vec::new(),
            one_based: false,
        }
    }

    /// Retain the `range` slice of a global triple stream.
    ///
    /// `triples` must enumerate the global nonzeros in the same
    /// deterministic order on every rank; each rank keeps only the
    /// entries whose ordinal falls inside its own range.
    pub fn from_stream<I>(n: usize, global_nnz: usize, range: Range<usize>, triples: I) -> Self
    where
        I: IntoIterator<Item = (usize, usize, T)>,
    {
        let mut local = Self::new(n, global_nnz);
        local.rows.reserve(range.len());
        local.cols.reserve(range.len());
        local.vals.reserve(range.len());

        for (ordinal, (row, col, val)) in triples.into_iter().enumerate() {
            if range.contains(&ordinal) {
                local.rows.push(row);
                local.cols.push(col);
                local.vals.push(val);
            }
        }
        assert_eq!(local.len(), range.len());
        local
    }

    /// local nonzero count
    pub fn len(&self) -> usize {
        self.vals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vals.is_empty()
    }

    /// true once indices have been shifted to 1-based
    pub fn is_one_based(&self) -> bool {
        self.one_based
    }

    /// Shift all row and column indices to the 1-based convention of
    /// Fortran-facing factorization engines.  Idempotent.
    pub fn convert_to_one_based(&mut self) {
        if self.one_based {
            return;
        }
        for i in self.rows.iter_mut() {
            *i += 1;
        }
        for j in self.cols.iter_mut() {
            *j += 1;
        }
        self.one_based = true;
    }
}

/// Split a global triple stream across the whole process group, keeping
/// the calling rank's near-equal contiguous share.
pub fn distribute_triples<T, I>(
    n: usize,
    global_nnz: usize,
    triples: I,
    group: &dyn ProcessGroup,
) -> LocalTriples<T>
where
    T: FloatT,
    I: IntoIterator<Item = (usize, usize, T)>,
{
    let range = nnz_owned_range(global_nnz, group.rank(), group.size());
    LocalTriples::from_stream(n, global_nnz, range, triples)
}

/// Triples of a sparse block placed at `(row_offset, col_offset)`
/// within the global matrix, in row-major order.
pub fn offset_triples<T: FloatT>(
    mat: &CsrMatrix<T>,
    row_offset: usize,
    col_offset: usize,
) -> impl Iterator<Item = (usize, usize, T)> + '_ {
    mat.triples()
        .map(move |(i, j, v)| (i + row_offset, j + col_offset, v))
}

// ------------------
// testing

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nnz_owned_range_tiles_exactly() {
        for &(nnz, nranks) in &[(10usize, 3usize), (7, 7), (5, 8), (0, 4), (100, 1)] {
            let mut covered = 0;
            let mut next = 0;
            for rank in 0..nranks {
                let rng = nnz_owned_range(nnz, rank, nranks);
                assert_eq!(rng.start, next);
                next = rng.end;
                covered += rng.len();
            }
            assert_eq!(covered, nnz);
            assert_eq!(next, nnz);
        }
    }

    #[test]
    fn test_nnz_owned_range_near_equal() {
        let sizes: Vec<_> = (0..4).map(|r| nnz_owned_range(10, r, 4).len()).collect();
        assert_eq!(sizes, vec![3, 3, 2, 2]);
    }

    #[test]
    fn test_from_stream_keeps_owned_slice() {
        let triples = vec![(0, 0, 1.0), (1, 0, 2.0), (1, 1, 3.0), (2, 2, 4.0)];
        let local = LocalTriples::from_stream(3, 4, 1..3, triples);
        assert_eq!(local.rows, vec![1, 1]);
        assert_eq!(local.cols, vec![0, 1]);
        assert_eq!(local.vals, vec![2.0, 3.0]);
        assert_eq!(local.global_nnz, 4);
    }

    #[test]
    fn test_convert_to_one_based_once() {
        let triples = vec![(0usize, 1usize, 5.0f64)];
        let mut local = LocalTriples::from_stream(2, 1, 0..1, triples);
        local.convert_to_one_based();
        assert_eq!((local.rows[0], local.cols[0]), (1, 2));

        // already converted; a second call must not shift again
        local.convert_to_one_based();
        assert_eq!((local.rows[0], local.cols[0]), (1, 2));
        assert!(local.is_one_based());
    }

    #[test]
    fn test_offset_triples() {
        let mat: crate::algebra::CsrMatrix<f64> =
            crate::algebra::CsrMatrix::new(2, 2, vec![0, 1, 2], vec![0, 1], vec![1., 2.]);
        let t: Vec<_> = offset_triples(&mat, 10, 20).collect();
        assert_eq!(t, vec![(10, 20, 1.), (11, 21, 2.)]);
    }
}
