use super::{BlockInfo, VirtualBlock};
use crate::algebra::FloatT;
use enum_dispatch::enum_dispatch;

/// Local payload of a block vector: one dense segment for this node.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockVectorData<T: FloatT> {
    /// scenario tree node id
    pub id: usize,
    /// this node's dense segment
    pub vec: Vec<T>,
    /// child segments in traversal order
    pub children: Vec<BlockVector<T>>,
}

impl<T: FloatT> BlockVectorData<T> {
    pub fn new(id: usize, vec: Vec<T>) -> Self {
        Self {
            id,
            vec,
            children: Vec::new(),
        }
    }
}

impl<T: FloatT> BlockInfo for BlockVectorData<T> {
    fn is_virtual(&self) -> bool {
        false
    }
    fn local_count(&self) -> usize {
        self.vec.len()
    }
}

/// Recursive dense vector produced by the objective, RHS and bound
/// traversals.
#[enum_dispatch(BlockInfo)]
#[derive(Debug, Clone, PartialEq)]
pub enum BlockVector<T: FloatT> {
    Active(BlockVectorData<T>),
    Virtual(VirtualBlock<BlockVector<T>>),
}

impl<T: FloatT> BlockVector<T> {
    /// append a child segment, preserving traversal order
    pub fn attach_child(&mut self, child: BlockVector<T>) {
        match self {
            BlockVector::Active(data) => data.children.push(child),
            BlockVector::Virtual(data) => data.children.push(child),
        }
    }

    /// child segments in traversal order
    pub fn children(&self) -> &[BlockVector<T>] {
        match self {
            BlockVector::Active(data) => &data.children,
            BlockVector::Virtual(data) => &data.children,
        }
    }

    /// scenario tree node id of this segment
    pub fn id(&self) -> usize {
        match self {
            BlockVector::Active(data) => data.id,
            BlockVector::Virtual(data) => data.id,
        }
    }

    /// the local payload, or None for virtual blocks
    pub fn as_active(&self) -> Option<&BlockVectorData<T>> {
        match self {
            BlockVector::Active(data) => Some(data),
            BlockVector::Virtual(_) => None,
        }
    }

    /// the local dense segment, empty for virtual blocks
    pub fn local_segment(&self) -> &[T] {
        match self {
            BlockVector::Active(data) => &data.vec,
            BlockVector::Virtual(_) => &[],
        }
    }

    /// total element count stored on this process for the whole subtree
    pub fn total_count(&self) -> usize {
        self.local_count()
            + self
                .children()
                .iter()
                .map(BlockVector::total_count)
                .sum::<usize>()
    }
}
