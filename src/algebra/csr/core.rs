use crate::algebra::{FloatT, SparseFormatError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Sparse matrix in Compressed Sparse Row (CSR) format
///
/// __Example usage__ : To construct the 3 x 3 matrix
/// ```text
/// A = [1.  3.  5.]
///     [2.  0.  6.]
///     [0.  4.  7.]
/// ```
///
/// ```no_run
/// use arrowhead::algebra::CsrMatrix;
///
/// let A : CsrMatrix<f64> = CsrMatrix::new(
///    3,                                // m
///    3,                                // n
///    vec![0, 3, 5, 7],                 // rowptr
///    vec![0, 1, 2, 0, 2, 1, 2],        // colval
///    vec![1., 3., 5., 2., 6., 4., 7.], // nzval
///  );
///
/// // optional correctness check
/// assert!(A.check_format().is_ok());
/// ```
///
/// Row-major storage is used throughout the assembly core because the
/// downstream block containers and the row partitioning primitives all
/// operate on whole constraint rows.

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CsrMatrix<T = f64> {
    /// number of rows
    pub m: usize,
    /// number of columns
    pub n: usize,
    /// CSR format row pointer.
    ///
    /// This field should have length `m+1`. The last entry corresponds
    /// to the number of nonzeros and should agree with the lengths
    /// of the `colval` and `nzval` fields.
    pub rowptr: Vec<usize>,
    /// vector of column indices
    pub colval: Vec<usize>,
    /// vector of non-zero matrix elements
    pub nzval: Vec<T>,
}

impl<T> CsrMatrix<T>
where
    T: FloatT,
{
    /// `CsrMatrix` constructor.
    ///
    /// # Panics
    /// Makes rudimentary dimensional compatibility checks and panics on
    /// failure.  This constructor does __not__ ensure that column indices
    /// are all in bounds or that entries within each row appear in order
    /// of increasing column index.  Responsibility for ensuring these
    /// conditions hold is left to the caller.
    pub fn new(m: usize, n: usize, rowptr: Vec<usize>, colval: Vec<usize>, nzval: Vec<T>) -> Self {
        assert_eq!(colval.len(), nzval.len());
        assert_eq!(rowptr.len(), m + 1);
        assert_eq!(rowptr[m], colval.len());
        CsrMatrix {
            m,
            n,
            rowptr,
            colval,
            nzval,
        }
    }

    /// allocate space for a sparse matrix with `nnz` elements
    ///
    /// Entries are zero filled and column indices all zero, with the
    /// declared nonzero total recorded in the final row pointer.  The
    /// caller is expected to populate the matrix in a single pass.
    pub fn spalloc(m: usize, n: usize, nnz: usize) -> Self {
        let mut rowptr = vec![0; m + 1];
        let colval = vec![0; nnz];
        let nzval = vec![T::zero(); nnz];
        rowptr[m] = nnz;

        CsrMatrix::new(m, n, rowptr, colval, nzval)
    }

    /// an `m` x `n` matrix with no nonzero entries
    pub fn zeros(m: usize, n: usize) -> Self {
        CsrMatrix::spalloc(m, n, 0)
    }

    /// Identity matrix of size `n`
    pub fn identity(n: usize) -> Self {
        let rowptr = (0usize..=n).collect();
        let colval = (0usize..n).collect();
        let nzval = vec![T::one(); n];

        CsrMatrix::new(n, n, rowptr, colval, nzval)
    }

    /// number of rows
    pub fn nrows(&self) -> usize {
        self.m
    }

    /// number of columns
    pub fn ncols(&self) -> usize {
        self.n
    }

    /// number of nonzeros
    pub fn nnz(&self) -> usize {
        self.rowptr[self.m]
    }

    /// number of nonzeros in row `i`
    ///
    /// # Panics
    /// Panics if `i` is out of bounds.
    pub fn row_nnz(&self, i: usize) -> usize {
        self.rowptr[i + 1] - self.rowptr[i]
    }

    /// column indices and values of row `i`
    ///
    /// # Panics
    /// Panics if `i` is out of bounds.
    pub fn row(&self, i: usize) -> (&[usize], &[T]) {
        let rng = self.rowptr[i]..self.rowptr[i + 1];
        (&self.colval[rng.clone()], &self.nzval[rng])
    }

    /// iterator over `(row, col, value)` triples in row-major order
    pub fn triples(&self) -> impl Iterator<Item = (usize, usize, T)> + '_ {
        (0..self.m).flat_map(move |i| {
            let (cols, vals) = self.row(i);
            std::iter::zip(cols, vals).map(move |(&j, &v)| (i, j, v))
        })
    }

    /// Check that matrix data is correctly formatted.
    ///
    /// A matrix passing this check is gap free: every declared nonzero is
    /// materialized in `colval`/`nzval`, with none implicit.
    pub fn check_format(&self) -> Result<(), SparseFormatError> {
        if self.colval.len() != self.nzval.len() {
            return Err(SparseFormatError::IncompatibleDimension);
        }

        if self.rowptr.is_empty()
            || (self.rowptr.len() - 1) != self.m
            || self.rowptr[self.m] != self.colval.len()
        {
            return Err(SparseFormatError::IncompatibleDimension);
        }

        //check for rowptr monotonicity
        if self.rowptr.windows(2).any(|c| c[0] > c[1]) {
            return Err(SparseFormatError::BadRowptr);
        }

        //check for colval monotonicity within each row
        for row in 0..self.m {
            let rng = self.rowptr[row]..self.rowptr[row + 1];
            if self.colval[rng].windows(2).any(|c| c[0] >= c[1]) {
                return Err(SparseFormatError::BadColOrdering);
            }
        }
        //check for column values out of bounds
        if !self.colval.iter().all(|c| c < &self.n) {
            return Err(SparseFormatError::BadColval);
        }

        Ok(())
    }

    /// Returns the value at the given (row,col) index as an Option.
    /// Returns None if the given index is not a structural nonzero.
    ///
    /// # Panics
    /// Panics if the given index is out of bounds.
    pub fn get_entry(&self, idx: (usize, usize)) -> Option<T> {
        let (row, col) = idx;
        assert!(row < self.m && col < self.n);

        let first = self.rowptr[row];
        let cols_in_this_row = self.row(row).0;
        match cols_in_this_row.binary_search(&col) {
            Ok(idx) => Some(self.nzval[first + idx]),
            Err(_) => None,
        }
    }
}

// ------------------
// testing

#[test]
fn test_csr_get_entry() {
    // A =
    //[ ⋅   4.0    ⋅  ]
    //[1.0  5.0    ⋅  ]
    //[ ⋅   6.0  13.0 ]
    //[2.0  7.0  10.0 ]

    let A = CsrMatrix::new(
        4,                                         // m
        3,                                         // n
        vec![0, 1, 3, 5, 8],                       // rowptr
        vec![1, 0, 1, 1, 2, 0, 1, 2],              // colval
        vec![4., 1., 5., 6., 13., 2., 7., 10.],    // nzval
    );
    assert!(A.check_format().is_ok());

    assert_eq!(A.get_entry((0, 1)).unwrap(), 4.);
    assert_eq!(A.get_entry((1, 0)).unwrap(), 1.);
    assert_eq!(A.get_entry((2, 2)).unwrap(), 13.);
    assert_eq!(A.get_entry((3, 1)).unwrap(), 7.);

    assert!(A.get_entry((0, 0)).is_none());
    assert!(A.get_entry((1, 2)).is_none());
    assert!(A.get_entry((2, 0)).is_none());
}

#[test]
fn test_csr_check_format() {
    let mut A: CsrMatrix<f64> = CsrMatrix::new(
        2,
        2,
        vec![0, 1, 2],
        vec![0, 1],
        vec![1., 2.], //
    );
    assert!(A.check_format().is_ok());

    // column index out of bounds
    A.colval[1] = 2;
    assert!(matches!(
        A.check_format(),
        Err(SparseFormatError::BadColval)
    ));

    // non-monotone rowptr
    let B: CsrMatrix<f64> = CsrMatrix {
        m: 2,
        n: 2,
        rowptr: vec![0, 2, 2],
        colval: vec![0, 1],
        nzval: vec![1., 2.],
    };
    assert!(B.check_format().is_ok());
    let B = CsrMatrix {
        rowptr: vec![2, 0, 2],
        ..B
    };
    assert!(matches!(B.check_format(), Err(SparseFormatError::BadRowptr)));
}

#[test]
fn test_csr_triples() {
    let A: CsrMatrix<f64> = CsrMatrix::new(
        2,
        3,
        vec![0, 2, 3],
        vec![0, 2, 1],
        vec![1., 2., 3.], //
    );
    let t: Vec<_> = A.triples().collect();
    assert_eq!(t, vec![(0, 0, 1.), (0, 2, 2.), (1, 1, 3.)]);
}
