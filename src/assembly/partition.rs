use crate::algebra::{CsrMatrix, FloatT};
use crate::assembly::utils::PositionAll;
use itertools::izip;

/// Classifies a constraint row by its lower/upper bound pair.
///
/// A row with identical bounds is an equality constraint; anything else
/// is an inequality.  The comparison is exact floating point equality of
/// the stored bounds, with no tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowClass {
    /// rows with `lb == ub`
    Equality,
    /// rows with `lb != ub`
    Inequality,
}

impl RowClass {
    /// true if the bound pair `(lb,ub)` belongs to this row class
    #[inline]
    pub fn selects<T: FloatT>(&self, lb: T, ub: T) -> bool {
        match self {
            RowClass::Equality => lb == ub,
            RowClass::Inequality => lb != ub,
        }
    }
}

/// Count the rows whose bound pair satisfies the given row class.
pub fn count_rows<T: FloatT>(lb: &[T], ub: &[T], class: RowClass) -> usize {
    assert_eq!(lb.len(), ub.len());
    izip!(lb, ub).filter(|(&l, &u)| class.selects(l, u)).count()
}

/// Count the nonzeros in the rows of `mat` whose bound pair satisfies
/// the given row class.
///
/// Together with [`count_rows`] this provides the exact sizing required
/// by [`extract_rows_into`].
pub fn count_nonzeros<T: FloatT>(
    mat: &CsrMatrix<T>,
    lb: &[T],
    ub: &[T],
    class: RowClass,
) -> usize {
    assert_eq!(lb.len(), ub.len());
    assert_eq!(lb.len(), mat.nrows());

    izip!(0..mat.nrows(), lb, ub)
        .filter(|(_, &l, &u)| class.selects(l, u))
        .map(|(i, _, _)| mat.row_nnz(i))
        .sum()
}

/// Extract the rows of `mat` satisfying the given row class into the
/// caller's preallocated buffers, preserving original row order.
///
/// The output is a row-compressed submatrix with no implicit zero fill.
/// Buffers must be sized exactly from a prior counting pass: `rowptr`
/// with `count_rows(..) + 1` entries and `colval`/`nzval` with
/// `count_nonzeros(..)` entries each.  Zero selected rows is valid and
/// yields a single `rowptr` entry of 0.
///
/// # Panics
/// Panics if the buffers are mis-sized or if the bound slices do not
/// match the matrix row count.  These are caller contract violations;
/// the downstream factorization cannot detect truncated sparse
/// structure, so assembly must abort here rather than continue.
pub fn extract_rows_into<T: FloatT>(
    mat: &CsrMatrix<T>,
    lb: &[T],
    ub: &[T],
    class: RowClass,
    rowptr: &mut [usize],
    colval: &mut [usize],
    nzval: &mut [T],
) {
    assert_eq!(lb.len(), ub.len());
    assert_eq!(lb.len(), mat.nrows());

    let rows = izip!(lb, ub).position_all(|(&l, &u)| class.selects(l, u));

    assert_eq!(rowptr.len(), rows.len() + 1);
    assert_eq!(colval.len(), nzval.len());

    rowptr[0] = 0;
    let mut ptr = 0;
    for (out, &i) in rows.iter().enumerate() {
        let (cols, vals) = mat.row(i);
        colval[ptr..ptr + cols.len()].copy_from_slice(cols);
        nzval[ptr..ptr + vals.len()].copy_from_slice(vals);
        ptr += cols.len();
        rowptr[out + 1] = ptr;
    }
    assert_eq!(ptr, nzval.len());
}

/// Two-pass convenience wrapper around [`count_rows`], [`count_nonzeros`]
/// and [`extract_rows_into`], returning the selected-row submatrix as a
/// new exactly sized matrix with the source's column dimension.
pub fn extract_rows<T: FloatT>(
    mat: &CsrMatrix<T>,
    lb: &[T],
    ub: &[T],
    class: RowClass,
) -> CsrMatrix<T> {
    let nrows = count_rows(lb, ub, class);
    let nnz = count_nonzeros(mat, lb, ub, class);

    let mut sub = CsrMatrix::spalloc(nrows, mat.ncols(), nnz);
    extract_rows_into(
        mat,
        lb,
        ub,
        class,
        &mut sub.rowptr,
        &mut sub.colval,
        &mut sub.nzval,
    );
    sub
}

// ------------------
// testing

#[cfg(test)]
mod tests {
    use super::*;

    fn three_row_matrix() -> (CsrMatrix<f64>, Vec<f64>, Vec<f64>) {
        // rows 0 and 2 are inequalities, row 1 is an equality
        let mat = CsrMatrix::new(
            3,
            4,
            vec![0, 2, 5, 6],
            vec![0, 2, 0, 1, 3, 3],
            vec![1., 2., 3., 4., 5., 6.],
        );
        let lb = vec![0., 7., -1.];
        let ub = vec![1., 7., 0.];
        (mat, lb, ub)
    }

    #[test]
    fn test_row_class_selects() {
        assert!(RowClass::Equality.selects(2.0, 2.0));
        assert!(!RowClass::Equality.selects(2.0, 3.0));
        assert!(RowClass::Inequality.selects(2.0, 3.0));
        assert!(!RowClass::Inequality.selects(2.0, 2.0));
    }

    #[test]
    fn test_counts_partition_the_matrix() {
        let (mat, lb, ub) = three_row_matrix();

        // every row is in exactly one class
        assert_eq!(
            count_rows(&lb, &ub, RowClass::Equality)
                + count_rows(&lb, &ub, RowClass::Inequality),
            mat.nrows()
        );
        assert_eq!(
            count_nonzeros(&mat, &lb, &ub, RowClass::Equality)
                + count_nonzeros(&mat, &lb, &ub, RowClass::Inequality),
            mat.nnz()
        );
    }

    #[test]
    fn test_extract_preserves_row_order() {
        let (mat, lb, ub) = three_row_matrix();

        let eq = extract_rows(&mat, &lb, &ub, RowClass::Equality);
        assert_eq!(eq.nrows(), 1);
        assert_eq!(eq.rowptr, vec![0, 3]);
        assert_eq!(eq.colval, vec![0, 1, 3]);
        assert_eq!(eq.nzval, vec![3., 4., 5.]);

        let ineq = extract_rows(&mat, &lb, &ub, RowClass::Inequality);
        assert_eq!(ineq.nrows(), 2);
        assert_eq!(ineq.rowptr, vec![0, 2, 3]);
        assert_eq!(ineq.colval, vec![0, 2, 3]);
        assert_eq!(ineq.nzval, vec![1., 2., 6.]);
    }

    #[test]
    fn test_extract_round_trip() {
        // re-concatenating the equality and inequality submatrices
        // recovers the original nonzero multiset exactly
        let (mat, lb, ub) = three_row_matrix();

        let eq = extract_rows(&mat, &lb, &ub, RowClass::Equality);
        let ineq = extract_rows(&mat, &lb, &ub, RowClass::Inequality);

        let mut extracted: Vec<_> = eq
            .nzval
            .iter()
            .chain(ineq.nzval.iter())
            .copied()
            .collect();
        let mut original = mat.nzval.clone();
        extracted.sort_by(f64::total_cmp);
        original.sort_by(f64::total_cmp);
        assert_eq!(extracted, original);
    }

    #[test]
    fn test_extract_zero_selected_rows() {
        let (mat, _, _) = three_row_matrix();
        let lb = vec![0.; 3];
        let ub = vec![1.; 3];

        let eq = extract_rows(&mat, &lb, &ub, RowClass::Equality);
        assert_eq!(eq.nrows(), 0);
        assert_eq!(eq.rowptr, vec![0]);
        assert!(eq.colval.is_empty());
        assert!(eq.nzval.is_empty());
    }

    #[test]
    #[should_panic]
    fn test_extract_undersized_buffers() {
        let (mat, lb, ub) = three_row_matrix();

        let mut rowptr = vec![0; 2];
        let mut colval = vec![0; 1]; // too small for row 0 + row 2
        let mut nzval = vec![0.; 1];
        extract_rows_into(
            &mat,
            &lb,
            &ub,
            RowClass::Inequality,
            &mut rowptr,
            &mut colval,
            &mut nzval,
        );
    }
}
