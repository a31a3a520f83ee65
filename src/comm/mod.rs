//! Explicit process-group context for distributed assembly.
//!
//! Assembly runs as multiple cooperating OS processes communicating only
//! through collectives.  Instead of ambient rank/size globals, every
//! operation that needs the execution context receives a [`ProcessGroup`]
//! reference, initialized once at startup by the surrounding driver.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The cooperating process group and its collective operations.
///
/// Implementations wrap whatever transport the driver uses (an MPI
/// communicator in production).  The collectives are synchronous: every
/// member of the group must make the matching call or the group
/// deadlocks.  There is no timeout or retry.
pub trait ProcessGroup {
    /// rank of the calling process within the group
    fn rank(&self) -> usize;
    /// number of processes in the group
    fn size(&self) -> usize;
    /// Elementwise sum reduction over all group members, with the result
    /// delivered to every member.  Collective.
    fn sum_all(&self, local: &[i64]) -> Vec<i64>;
    /// Synchronization barrier.  Collective; used only to serialize
    /// diagnostic output order.
    fn barrier(&self) {}
}

/// Trivial single-process group: rank 0 of 1, reductions are the
/// identity and the barrier is a no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialGroup;

impl ProcessGroup for SerialGroup {
    fn rank(&self) -> usize {
        0
    }
    fn size(&self) -> usize {
        1
    }
    fn sum_all(&self, local: &[i64]) -> Vec<i64> {
        local.to_vec()
    }
}

/// The subset of processes responsible for one scenario tree node.
///
/// Assigned once by an external process-to-subtree mapping and read-only
/// afterward.  A group that does not contain the calling rank makes the
/// node a dead end for that process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExecutionGroup {
    ranks: Vec<usize>,
}

impl ExecutionGroup {
    /// group over an explicit rank set
    pub fn new(mut ranks: Vec<usize>) -> Self {
        ranks.sort_unstable();
        ranks.dedup();
        Self { ranks }
    }

    /// group containing every rank of a `size`-process group
    pub fn all(size: usize) -> Self {
        Self {
            ranks: (0..size).collect(),
        }
    }

    /// group containing a single rank
    pub fn single(rank: usize) -> Self {
        Self { ranks: vec![rank] }
    }

    /// the empty group: the node is a dead end for every process
    pub fn empty() -> Self {
        Self::default()
    }

    /// true if `rank` participates in this node
    pub fn contains(&self, rank: usize) -> bool {
        self.ranks.binary_search(&rank).is_ok()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    /// member ranks in ascending order
    pub fn ranks(&self) -> &[usize] {
        &self.ranks
    }
}

// ------------------
// testing
