use super::{BlockInfo, VirtualBlock};
use crate::algebra::{CsrMatrix, FloatT};
use enum_dispatch::enum_dispatch;

/// Local payload of a symmetric block matrix (one Hessian contribution).
///
/// Holds the node's diagonal block and, for scenario nodes, the
/// rectangular border block coupling this node's variables to its
/// parent's.
#[derive(Debug, Clone, PartialEq)]
pub struct SymBlockData<T: FloatT> {
    /// scenario tree node id
    pub id: usize,
    /// problem-wide variable total, for the declared global dimension
    pub global_dim: usize,
    /// square diagonal block over this node's own variables (row-major)
    pub diag: CsrMatrix<T>,
    /// cross term against the parent's variables; absent at the root
    pub border: Option<CsrMatrix<T>>,
    /// child blocks in traversal order
    pub children: Vec<SymBlockMatrix<T>>,
}

impl<T: FloatT> SymBlockData<T> {
    /// Root payload: diagonal block only.
    ///
    /// # Panics
    /// Panics if `diag` is not square.
    pub fn new_root(id: usize, global_dim: usize, diag: CsrMatrix<T>) -> Self {
        assert_eq!(diag.nrows(), diag.ncols());
        Self {
            id,
            global_dim,
            diag,
            border: None,
            children: Vec::new(),
        }
    }

    /// Scenario payload: diagonal block plus the border block coupling
    /// to `parent_dim` parent variables.
    ///
    /// # Panics
    /// Panics if `diag` is not square or `border` is not
    /// `diag.nrows()` x `parent_dim`.
    pub fn new_scenario(
        id: usize,
        global_dim: usize,
        diag: CsrMatrix<T>,
        border: CsrMatrix<T>,
        parent_dim: usize,
    ) -> Self {
        assert_eq!(diag.nrows(), diag.ncols());
        assert_eq!(border.nrows(), diag.nrows());
        assert_eq!(border.ncols(), parent_dim);
        Self {
            id,
            global_dim,
            diag,
            border: Some(border),
            children: Vec::new(),
        }
    }
}

impl<T: FloatT> BlockInfo for SymBlockData<T> {
    fn is_virtual(&self) -> bool {
        false
    }
    fn local_count(&self) -> usize {
        self.diag.nnz() + self.border.as_ref().map_or(0, CsrMatrix::nnz)
    }
}

/// Recursive symmetric block matrix produced by the Hessian traversal.
#[enum_dispatch(BlockInfo)]
#[derive(Debug, Clone, PartialEq)]
pub enum SymBlockMatrix<T: FloatT> {
    Active(SymBlockData<T>),
    Virtual(VirtualBlock<SymBlockMatrix<T>>),
}

impl<T: FloatT> SymBlockMatrix<T> {
    /// append a child block, preserving traversal order
    pub fn attach_child(&mut self, child: SymBlockMatrix<T>) {
        match self {
            SymBlockMatrix::Active(data) => data.children.push(child),
            SymBlockMatrix::Virtual(data) => data.children.push(child),
        }
    }

    /// child blocks in traversal order
    pub fn children(&self) -> &[SymBlockMatrix<T>] {
        match self {
            SymBlockMatrix::Active(data) => &data.children,
            SymBlockMatrix::Virtual(data) => &data.children,
        }
    }

    /// scenario tree node id of this block
    pub fn id(&self) -> usize {
        match self {
            SymBlockMatrix::Active(data) => data.id,
            SymBlockMatrix::Virtual(data) => data.id,
        }
    }

    /// the local payload, or None for virtual blocks
    pub fn as_active(&self) -> Option<&SymBlockData<T>> {
        match self {
            SymBlockMatrix::Active(data) => Some(data),
            SymBlockMatrix::Virtual(_) => None,
        }
    }

    /// total nonzeros stored on this process for the whole subtree
    pub fn total_count(&self) -> usize {
        self.local_count()
            + self
                .children()
                .iter()
                .map(SymBlockMatrix::total_count)
                .sum::<usize>()
    }
}
