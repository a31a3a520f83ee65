//! __arrowhead__ assembles the algebraic building blocks of a two-stage
//! stochastic program for an interior point method: the Hessian, the
//! equality and inequality constraint Jacobians, and the bound,
//! objective and right-hand-side vectors, organized as a block-angular
//! (arrowhead) system whose shape a parallel direct or iterative
//! factorization consumes bit-for-bit.
//!
//! The problem has one first-stage decision shared by all scenarios and
//! a tree of recourse scenarios, each contributing its own variables and
//! constraints and optionally coupled to the others through direct
//! linking constraints.  Assembly is distributed: cooperating processes
//! each own a subset of the scenario tree, build real blocks for their
//! own nodes and zero-footprint placeholders for everyone else's, and
//! agree on problem-wide dimensions through a single collective
//! reduction.
//!
//! A typical single-process assembly:
//!
//! ```no_run
//! use arrowhead::assembly::{AssemblySettings, ScenarioTree};
//! use arrowhead::comm::{ExecutionGroup, SerialGroup};
//! # use arrowhead::problem::{InMemoryProblem, StageData};
//! # fn problem() -> InMemoryProblem<f64> { unimplemented!() }
//!
//! let provider = problem();
//! let group = SerialGroup;
//! let settings = AssemblySettings::default();
//!
//! let mut tree = ScenarioTree::new(&provider, &group, &settings);
//! tree.assign_processes(&mut |_id| ExecutionGroup::single(0));
//! tree.load_local_sizes(&provider, &group);
//! tree.compute_global_sizes(&group);
//!
//! let hessian = tree.create_hessian(&provider, &group);
//! let jac_eq = tree.create_eq_jacobian(&provider, &group);
//! let jac_ineq = tree.create_ineq_jacobian(&provider, &group);
//! let objective = tree.create_objective(&provider, &group, &settings);
//! ```

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// crate version string
pub fn version() -> &'static str {
    VERSION
}

pub mod algebra;
pub mod assembly;
pub mod comm;
pub mod dist;
pub mod io;
pub mod problem;
