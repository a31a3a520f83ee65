use super::{BlockInfo, VirtualBlock};
use crate::algebra::{CsrMatrix, FloatT};
use enum_dispatch::enum_dispatch;

/// Local payload of a general (Jacobian) block matrix.
///
/// Up to three sub-blocks: `amat` couples this node's constraints to the
/// parent's variables (absent at the root), `bmat` covers the node's own
/// variables, and `cmat` holds rows of cross-scenario linking
/// constraints when the problem has any.
#[derive(Debug, Clone, PartialEq)]
pub struct GenBlockData<T: FloatT> {
    /// scenario tree node id
    pub id: usize,
    /// problem-wide constraint total of this family (equality or
    /// inequality), for the declared global row dimension
    pub global_rows: usize,
    /// problem-wide variable total, for the declared global column
    /// dimension
    pub global_cols: usize,
    /// coupling to the parent's variables; absent at the root
    pub amat: Option<CsrMatrix<T>>,
    /// this node's own constraint rows over its own variables
    pub bmat: CsrMatrix<T>,
    /// direct cross-scenario linking rows; present only when the
    /// problem declares linking constraints of this family
    pub cmat: Option<CsrMatrix<T>>,
    /// child blocks in traversal order
    pub children: Vec<GenBlockMatrix<T>>,
}

impl<T: FloatT> GenBlockData<T> {
    /// # Panics
    /// Panics if `amat` is present with a row count different from
    /// `bmat`'s.
    pub fn new(
        id: usize,
        global_rows: usize,
        global_cols: usize,
        amat: Option<CsrMatrix<T>>,
        bmat: CsrMatrix<T>,
        cmat: Option<CsrMatrix<T>>,
    ) -> Self {
        if let Some(amat) = &amat {
            assert_eq!(amat.nrows(), bmat.nrows());
        }
        Self {
            id,
            global_rows,
            global_cols,
            amat,
            bmat,
            cmat,
            children: Vec::new(),
        }
    }
}

impl<T: FloatT> BlockInfo for GenBlockData<T> {
    fn is_virtual(&self) -> bool {
        false
    }
    fn local_count(&self) -> usize {
        self.amat.as_ref().map_or(0, CsrMatrix::nnz)
            + self.bmat.nnz()
            + self.cmat.as_ref().map_or(0, CsrMatrix::nnz)
    }
}

/// Recursive general block matrix produced by the Jacobian traversals.
#[enum_dispatch(BlockInfo)]
#[derive(Debug, Clone, PartialEq)]
pub enum GenBlockMatrix<T: FloatT> {
    Active(GenBlockData<T>),
    Virtual(VirtualBlock<GenBlockMatrix<T>>),
}

impl<T: FloatT> GenBlockMatrix<T> {
    /// append a child block, preserving traversal order
    pub fn attach_child(&mut self, child: GenBlockMatrix<T>) {
        match self {
            GenBlockMatrix::Active(data) => data.children.push(child),
            GenBlockMatrix::Virtual(data) => data.children.push(child),
        }
    }

    /// child blocks in traversal order
    pub fn children(&self) -> &[GenBlockMatrix<T>] {
        match self {
            GenBlockMatrix::Active(data) => &data.children,
            GenBlockMatrix::Virtual(data) => &data.children,
        }
    }

    /// scenario tree node id of this block
    pub fn id(&self) -> usize {
        match self {
            GenBlockMatrix::Active(data) => data.id,
            GenBlockMatrix::Virtual(data) => data.id,
        }
    }

    /// the local payload, or None for virtual blocks
    pub fn as_active(&self) -> Option<&GenBlockData<T>> {
        match self {
            GenBlockMatrix::Active(data) => Some(data),
            GenBlockMatrix::Virtual(_) => None,
        }
    }

    /// number of local constraint rows, children excluded
    pub fn local_rows(&self) -> usize {
        match self {
            GenBlockMatrix::Active(data) => data.bmat.nrows(),
            GenBlockMatrix::Virtual(_) => 0,
        }
    }

    /// total nonzeros stored on this process for the whole subtree
    pub fn total_count(&self) -> usize {
        self.local_count()
            + self
                .children()
                .iter()
                .map(GenBlockMatrix::total_count)
                .sum::<usize>()
    }
}
