//! Recursive block containers for the assembled system.
//!
//! Each container mirrors the scenario tree: a node's local contribution
//! plus one child container per scenario, attached in provider enumeration
//! order.  Containers come in two variants.  `Active` blocks hold real
//! data for nodes whose execution group includes the calling process;
//! `Virtual` blocks are zero-footprint placeholders for nodes owned by
//! other processes, and remain structurally valid so that composition can
//! still attach them as children.

use crate::algebra::FloatT;
use enum_dispatch::enum_dispatch;

mod general;
mod symmetric;
mod vector;

pub use general::*;
pub use symmetric::*;
pub use vector::*;

/// Variant-independent queries shared by all block containers.
#[enum_dispatch]
pub trait BlockInfo {
    /// true for placeholder blocks owned by other processes
    fn is_virtual(&self) -> bool;
    /// locally stored entry count (matrix nonzeros or vector elements),
    /// children excluded.  Always 0 for virtual blocks.
    fn local_count(&self) -> usize;
}

/// Placeholder payload for nodes that are dead ends on the calling
/// process.  Carries no problem data; children are kept because other
/// processes in the group may own parts of the subtree.
#[derive(Debug, Clone, PartialEq)]
pub struct VirtualBlock<B> {
    /// scenario tree node id this placeholder stands in for
    pub id: usize,
    /// child containers in traversal order
    pub children: Vec<B>,
}

impl<B> VirtualBlock<B> {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            children: Vec::new(),
        }
    }
}

impl<B> BlockInfo for VirtualBlock<B> {
    fn is_virtual(&self) -> bool {
        true
    }
    fn local_count(&self) -> usize {
        0
    }
}
