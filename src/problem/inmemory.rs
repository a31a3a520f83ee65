use super::ScenarioProblem;
use crate::algebra::{CsrMatrix, FloatT, SparseFormatError};
use crate::assembly::{count_rows, RowClass};

/// Raw data for one stage of an [`InMemoryProblem`].
///
/// The coupling and cross-Hessian fields are only meaningful for
/// scenario stages and ignored on the first stage; the linking rows are
/// optional on every stage.
#[derive(Debug, Clone, PartialEq)]
pub struct StageData<T: FloatT> {
    pub objective: Vec<T>,
    pub hessian: CsrMatrix<T>,
    /// cross term against first-stage variables (scenario stages only)
    pub cross_hessian: Option<CsrMatrix<T>>,
    /// constraint rows over this stage's own variables
    pub constraints: CsrMatrix<T>,
    /// the same rows over first-stage variables (scenario stages only)
    pub coupling: Option<CsrMatrix<T>>,
    /// linking constraint rows over this stage's own variables
    pub link_rows: Option<CsrMatrix<T>>,
    pub row_lb: Vec<T>,
    pub row_ub: Vec<T>,
    pub col_lb: Vec<T>,
    pub col_ub: Vec<T>,
}

impl<T: FloatT> StageData<T> {
    /// A stage with the given constraint system and bounds, zero
    /// objective and zero Hessian.  Convenient starting point for tests
    /// and examples; fill in the remaining fields directly.
    pub fn from_constraints(
        constraints: CsrMatrix<T>,
        row_lb: Vec<T>,
        row_ub: Vec<T>,
        col_lb: Vec<T>,
        col_ub: Vec<T>,
    ) -> Self {
        let nvars = col_lb.len();
        Self {
            objective: vec![T::zero(); nvars],
            hessian: CsrMatrix::zeros(nvars, nvars),
            cross_hessian: None,
            constraints,
            coupling: None,
            link_rows: None,
            row_lb,
            row_ub,
            col_lb,
            col_ub,
        }
    }

    fn nvars(&self) -> usize {
        self.col_lb.len()
    }
    fn ncons(&self) -> usize {
        self.row_lb.len()
    }

    fn check_format(&self) -> Result<(), SparseFormatError> {
        self.hessian.check_format()?;
        self.constraints.check_format()?;
        for mat in [&self.cross_hessian, &self.coupling, &self.link_rows]
            .into_iter()
            .flatten()
        {
            mat.check_format()?;
        }
        if self.row_lb.len() != self.row_ub.len()
            || self.col_lb.len() != self.col_ub.len()
            || self.objective.len() != self.nvars()
            || self.constraints.nrows() != self.ncons()
            || self.constraints.ncols() != self.nvars()
            || self.hessian.nrows() != self.nvars()
        {
            return Err(SparseFormatError::IncompatibleDimension);
        }
        Ok(())
    }
}

/// Owned-data [`ScenarioProblem`] implementation.
///
/// Holds all stage data in memory; accessors hand out copies the way an
/// external reader-backed provider would.  Linking-constraint counts are
/// derived from the linking row bounds by the same equality rule the
/// tree applies to stage constraints.
#[derive(Debug, Clone, PartialEq)]
pub struct InMemoryProblem<T: FloatT> {
    pub first: StageData<T>,
    pub scenarios: Vec<StageData<T>>,
    pub link_row_lb: Vec<T>,
    pub link_row_ub: Vec<T>,
}

impl<T: FloatT> InMemoryProblem<T> {
    /// A problem with no cross-scenario linking constraints.
    pub fn new(first: StageData<T>, scenarios: Vec<StageData<T>>) -> Self {
        Self {
            first,
            scenarios,
            link_row_lb: Vec::new(),
            link_row_ub: Vec::new(),
        }
    }

    /// Check all held matrices and dimension fields for consistency.
    pub fn check_format(&self) -> Result<(), SparseFormatError> {
        self.first.check_format()?;
        for scen in &self.scenarios {
            scen.check_format()?;
        }
        if self.link_row_lb.len() != self.link_row_ub.len() {
            return Err(SparseFormatError::IncompatibleDimension);
        }
        Ok(())
    }

    fn stage(&self, id: usize) -> &StageData<T> {
        if id == 0 {
            &self.first
        } else {
            &self.scenarios[id - 1]
        }
    }
}

impl<T: FloatT> ScenarioProblem<T> for InMemoryProblem<T> {
    fn num_scenarios(&self) -> usize {
        self.scenarios.len()
    }

    fn first_stage_vars(&self) -> usize {
        self.first.nvars()
    }
    fn first_stage_cons(&self) -> usize {
        self.first.ncons()
    }
    fn first_stage_objective(&self) -> Vec<T> {
        self.first.objective.clone()
    }
    fn first_stage_hessian(&self) -> CsrMatrix<T> {
        self.first.hessian.clone()
    }
    fn first_stage_constraints(&self) -> CsrMatrix<T> {
        self.first.constraints.clone()
    }
    fn first_stage_row_lb(&self) -> Vec<T> {
        self.first.row_lb.clone()
    }
    fn first_stage_row_ub(&self) -> Vec<T> {
        self.first.row_ub.clone()
    }
    fn first_stage_col_lb(&self) -> Vec<T> {
        self.first.col_lb.clone()
    }
    fn first_stage_col_ub(&self) -> Vec<T> {
        self.first.col_ub.clone()
    }

    fn second_stage_vars(&self, scen: usize) -> usize {
        self.scenarios[scen].nvars()
    }
    fn second_stage_cons(&self, scen: usize) -> usize {
        self.scenarios[scen].ncons()
    }
    fn second_stage_objective(&self, scen: usize) -> Vec<T> {
        self.scenarios[scen].objective.clone()
    }
    fn second_stage_hessian(&self, scen: usize) -> CsrMatrix<T> {
        self.scenarios[scen].hessian.clone()
    }
    fn second_stage_cross_hessian(&self, scen: usize) -> CsrMatrix<T> {
        let stage = &self.scenarios[scen];
        stage
            .cross_hessian
            .clone()
            .unwrap_or_else(|| CsrMatrix::zeros(stage.nvars(), self.first.nvars()))
    }
    fn second_stage_constraints(&self, scen: usize) -> CsrMatrix<T> {
        self.scenarios[scen].constraints.clone()
    }
    fn parent_coupling_constraints(&self, scen: usize) -> CsrMatrix<T> {
        let stage = &self.scenarios[scen];
        stage
            .coupling
            .clone()
            .unwrap_or_else(|| CsrMatrix::zeros(stage.ncons(), self.first.nvars()))
    }
    fn second_stage_row_lb(&self, scen: usize) -> Vec<T> {
        self.scenarios[scen].row_lb.clone()
    }
    fn second_stage_row_ub(&self, scen: usize) -> Vec<T> {
        self.scenarios[scen].row_ub.clone()
    }
    fn second_stage_col_lb(&self, scen: usize) -> Vec<T> {
        self.scenarios[scen].col_lb.clone()
    }
    fn second_stage_col_ub(&self, scen: usize) -> Vec<T> {
        self.scenarios[scen].col_ub.clone()
    }

    fn num_link_eq(&self) -> usize {
        count_rows(&self.link_row_lb, &self.link_row_ub, RowClass::Equality)
    }
    fn num_link_ineq(&self) -> usize {
        count_rows(&self.link_row_lb, &self.link_row_ub, RowClass::Inequality)
    }
    fn link_matrix(&self, id: usize) -> CsrMatrix<T> {
        let stage = self.stage(id);
        stage
            .link_rows
            .clone()
            .unwrap_or_else(|| CsrMatrix::zeros(self.link_row_lb.len(), stage.nvars()))
    }
    fn link_row_lb(&self) -> Vec<T> {
        self.link_row_lb.clone()
    }
    fn link_row_ub(&self) -> Vec<T> {
        self.link_row_ub.clone()
    }
}
