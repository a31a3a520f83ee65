//! The scenario-tree assembly core.
//!
//! Builds, per scenario tree node, the node's local contribution to each
//! global block matrix and vector of the KKT system, partitions every
//! stage's constraints into equality and inequality families, and
//! aggregates problem-wide dimensions across the cooperating process
//! group.  The produced containers have block-angular (arrowhead)
//! structure: each scenario block couples only to the root through its
//! border/parent-coupling sub-blocks, with optional direct
//! cross-scenario linking rows.

mod blocks;
mod partition;
mod settings;
mod tree;
pub(crate) mod utils;

pub use blocks::*;
pub use partition::*;
pub use settings::*;
pub use tree::*;

pub use utils::infbounds::{default_infinity, get_infinity, set_infinity};

/// provider convention for "no finite bound on this side"
pub(crate) const _INFINITY_DEFAULT: f64 = 1e20;
