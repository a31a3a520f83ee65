//! Abstract per-stage problem data provider.

use crate::algebra::{CsrMatrix, FloatT};

mod inmemory;
pub use inmemory::*;

/// Per-stage data source for a two-stage stochastic program.
///
/// The provider is the external owner of all raw problem data.  It is
/// read-only during assembly and may be queried concurrently by
/// different tree nodes in the same process.  All matrices are returned
/// row-major and gap free: every declared nonzero is materialized, none
/// implicit.  Violating that is a fatal precondition failure in the
/// assembly routines, not a recoverable error.
///
/// Scenario indices run `0..num_scenarios()`, i.e. a tree node with id
/// `k > 0` reads scenario `k - 1`.
pub trait ScenarioProblem<T: FloatT> {
    /// number of scenarios below the root
    fn num_scenarios(&self) -> usize;
    /// number of decision stages; two for the problems handled here
    fn num_stages(&self) -> usize {
        2
    }

    // ---- first stage ----

    /// first-stage decision variable count
    fn first_stage_vars(&self) -> usize;
    /// first-stage constraint row count
    fn first_stage_cons(&self) -> usize;
    /// first-stage objective coefficients, length `first_stage_vars()`
    fn first_stage_objective(&self) -> Vec<T>;
    /// first-stage Hessian, `first_stage_vars()` square
    fn first_stage_hessian(&self) -> CsrMatrix<T>;
    /// first-stage constraint matrix, all rows in one matrix
    fn first_stage_constraints(&self) -> CsrMatrix<T>;
    /// first-stage constraint row lower bounds
    fn first_stage_row_lb(&self) -> Vec<T>;
    /// first-stage constraint row upper bounds
    fn first_stage_row_ub(&self) -> Vec<T>;
    /// first-stage variable lower bounds
    fn first_stage_col_lb(&self) -> Vec<T>;
    /// first-stage variable upper bounds
    fn first_stage_col_ub(&self) -> Vec<T>;

    // ---- second stage, indexed by scenario ----

    /// scenario decision variable count
    fn second_stage_vars(&self, scen: usize) -> usize;
    /// scenario constraint row count
    fn second_stage_cons(&self, scen: usize) -> usize;
    /// scenario objective coefficients
    fn second_stage_objective(&self, scen: usize) -> Vec<T>;
    /// scenario Hessian over the scenario's own variables
    fn second_stage_hessian(&self, scen: usize) -> CsrMatrix<T>;
    /// cross Hessian term: scenario variables against first-stage
    /// variables, `second_stage_vars(scen)` x `first_stage_vars()`
    fn second_stage_cross_hessian(&self, scen: usize) -> CsrMatrix<T>;
    /// scenario constraint rows over the scenario's own variables
    fn second_stage_constraints(&self, scen: usize) -> CsrMatrix<T>;
    /// the same constraint rows over the first-stage variables
    fn parent_coupling_constraints(&self, scen: usize) -> CsrMatrix<T>;
    /// scenario constraint row lower bounds
    fn second_stage_row_lb(&self, scen: usize) -> Vec<T>;
    /// scenario constraint row upper bounds
    fn second_stage_row_ub(&self, scen: usize) -> Vec<T>;
    /// scenario variable lower bounds
    fn second_stage_col_lb(&self, scen: usize) -> Vec<T>;
    /// scenario variable upper bounds
    fn second_stage_col_ub(&self, scen: usize) -> Vec<T>;

    // ---- cross-scenario linking constraints ----

    /// number of equality rows among the linking constraints
    fn num_link_eq(&self) -> usize;
    /// number of inequality rows among the linking constraints
    fn num_link_ineq(&self) -> usize;
    /// linking constraint rows over node `id`'s own variables, where
    /// id 0 is the root and 1..=S the scenarios.  Only queried when the
    /// problem declares linking constraints.
    fn link_matrix(&self, id: usize) -> CsrMatrix<T>;
    /// linking constraint row lower bounds
    fn link_row_lb(&self) -> Vec<T>;
    /// linking constraint row upper bounds
    fn link_row_ub(&self) -> Vec<T>;
}
