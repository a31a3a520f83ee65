use thiserror::Error;

/// Error type returned by sparse matrix format checks.
#[derive(Error, Debug)]
pub enum SparseFormatError {
    /// Matrix dimension fields and/or array lengths are incompatible
    #[error("Matrix dimension fields and/or array lengths are incompatible")]
    IncompatibleDimension,
    /// Data is not sorted by column index within each row
    #[error("Data is not sorted by column index within each row")]
    BadColOrdering,
    /// Column value exceeds the matrix column dimension
    #[error("Column value exceeds the matrix column dimension")]
    BadColval,
    /// Matrix row pointer values are defective
    #[error("Bad row pointer values")]
    BadRowptr,
}
