use crate::algebra::{AsFloatT, FloatT};
use crate::assembly::blocks::{
    BlockVector, BlockVectorData, GenBlockData, GenBlockMatrix, SymBlockData, SymBlockMatrix,
    VirtualBlock,
};
use crate::assembly::partition::{count_rows, extract_rows, RowClass};
use crate::assembly::settings::AssemblySettings;
use crate::assembly::utils::infbounds::get_infinity;
use crate::comm::{ExecutionGroup, ProcessGroup};
use crate::problem::ScenarioProblem;
use itertools::izip;

/// which side of an interval bound an operation reads
#[derive(Clone, Copy)]
enum BoundSide {
    Lower,
    Upper,
}

/// whether a bound traversal emits the bound value or the finiteness mask
#[derive(Clone, Copy)]
enum BoundKind {
    Value,
    Mask,
}

/// One node of the scenario tree: the root (first stage, id 0) or a
/// scenario (id 1..=S).  Each node owns its children exclusively;
/// dropping a node drops its whole subtree.
///
/// The intended call order per problem instance is
/// [`new`](ScenarioTree::new), then
/// [`assign_processes`](ScenarioTree::assign_processes), then
/// [`load_local_sizes`](ScenarioTree::load_local_sizes), then
/// [`compute_global_sizes`](ScenarioTree::compute_global_sizes), and
/// only then the `create_*` block traversals.  The create operations all
/// visit children in scenario-index order, so block ordering is
/// identical across every produced container.
#[derive(Debug, Clone)]
pub struct ScenarioTree {
    id: usize,
    nx: usize,
    my: usize,
    mz: usize,
    mle: usize,
    mli: usize,
    exec: ExecutionGroup,
    children: Vec<ScenarioTree>,
    // process-wide totals, valid only after compute_global_sizes
    nx_global: usize,
    my_global: usize,
    mz_global: usize,
}

impl ScenarioTree {
    /// Build the tree from the provider's scenario count: the root with
    /// its own sizes computed from first-stage data, plus one child per
    /// scenario with sizes deferred to
    /// [`load_local_sizes`](ScenarioTree::load_local_sizes) (scenario
    /// sizes depend on which process subgroup owns them).
    ///
    /// The root is initially assigned to every rank of `group`;
    /// scenario nodes start with empty execution groups until
    /// [`assign_processes`](ScenarioTree::assign_processes) installs
    /// the external mapping.
    ///
    /// # Panics
    /// Panics if the provider's first-stage row bounds disagree with its
    /// declared first-stage constraint count.
    pub fn new<T: FloatT, P: ScenarioProblem<T>>(
        provider: &P,
        group: &dyn ProcessGroup,
        settings: &AssemblySettings<T>,
    ) -> Self {
        let nx = provider.first_stage_vars();
        let row_lb = provider.first_stage_row_lb();
        let row_ub = provider.first_stage_row_ub();
        assert_eq!(row_lb.len(), provider.first_stage_cons());

        let my = count_rows(&row_lb, &row_ub, RowClass::Equality);
        let mz = provider.first_stage_cons() - my;
        let mle = provider.num_link_eq();
        let mli = provider.num_link_ineq();

        let nscen = provider.num_scenarios();
        let children = (0..nscen)
            .map(|scen| ScenarioTree {
                id: scen + 1,
                nx: 0,
                my: 0,
                mz: 0,
                mle,
                mli,
                exec: ExecutionGroup::empty(),
                children: Vec::new(),
                nx_global: 0,
                my_global: 0,
                mz_global: 0,
            })
            .collect();

        if settings.verbose && group.rank() == 0 {
            println!("[arrowhead] {} scenarios on {} ranks", nscen, group.size());
        }

        ScenarioTree {
            id: 0,
            nx,
            my,
            mz,
            mle,
            mli,
            exec: ExecutionGroup::all(group.size()),
            children,
            nx_global: 0,
            my_global: 0,
            mz_global: 0,
        }
    }

    /// Install the externally decided process-to-subtree mapping,
    /// calling `assign` once per node id in depth-first order.  The
    /// assignment policy itself lives outside this crate; the tree only
    /// reads the groups.
    pub fn assign_processes<F>(&mut self, assign: &mut F)
    where
        F: FnMut(usize) -> ExecutionGroup,
    {
        self.exec = assign(self.id);
        for child in &mut self.children {
            child.assign_processes(assign);
        }
    }

    /// Fetch scenario variable counts and constraint bounds for every
    /// node whose execution group contains the calling rank, computing
    /// `my` by the equality-bound rule and `mz` as the remainder.
    ///
    /// Must run after [`assign_processes`](ScenarioTree::assign_processes).
    /// Recurses unconditionally: children may belong to different
    /// subgroups than their parent.
    pub fn load_local_sizes<T: FloatT, P: ScenarioProblem<T>>(
        &mut self,
        provider: &P,
        group: &dyn ProcessGroup,
    ) {
        // root sizes already loaded at construction
        if self.id > 0 && self.exec.contains(group.rank()) {
            let scen = self.id - 1;
            let row_lb = provider.second_stage_row_lb(scen);
            let row_ub = provider.second_stage_row_ub(scen);
            assert_eq!(row_lb.len(), provider.second_stage_cons(scen));

            self.my = count_rows(&row_lb, &row_ub, RowClass::Equality);
            self.nx = provider.second_stage_vars(scen);
            self.mz = provider.second_stage_cons(scen) - self.my;
        }
        for child in &mut self.children {
            child.load_local_sizes(provider, group);
        }
    }

    /// Reduce per-node local sizes into problem-wide totals `N`, `MY`,
    /// `MZ` and record them on every node of the subtree.
    ///
    /// Collective: every rank of `group` must call this, including ranks
    /// for which parts of the tree are dead ends (their contribution is
    /// zero but skipping the call deadlocks the reduction).  Subtotals
    /// are recomputed from scratch on each call, so calling again with
    /// unchanged local sizes returns identical totals.
    ///
    /// Correct totals require that each scenario node's sizes enter the
    /// reduction exactly once, i.e. that scenario execution groups are
    /// single-rank (or that only one member loads sizes).  Assigning a
    /// scenario to several loading ranks overcounts; that is a caller
    /// precondition, not checked here.
    pub fn compute_global_sizes(&mut self, group: &dyn ProcessGroup) {
        let mut local = [0i64; 3];
        for child in &self.children {
            local[0] += child.nx as i64;
            local[1] += child.my as i64;
            local[2] += child.mz as i64;
        }

        let total = group.sum_all(&local);

        // this node's own contribution is known identically on every
        // rank, so it is added after the reduction
        let nx_global = total[0] as usize + self.nx;
        let my_global = total[1] as usize + self.my;
        let mz_global = total[2] as usize + self.mz;
        self.store_global_sizes(nx_global, my_global, mz_global);
    }

    fn store_global_sizes(&mut self, nx_global: usize, my_global: usize, mz_global: usize) {
        self.nx_global = nx_global;
        self.my_global = my_global;
        self.mz_global = mz_global;
        for child in &mut self.children {
            child.store_global_sizes(nx_global, my_global, mz_global);
        }
    }

    // ---- size and topology accessors ----

    /// node id: 0 for the root, 1..=S for scenarios
    pub fn id(&self) -> usize {
        self.id
    }
    /// this node's own decision variable count
    pub fn nx(&self) -> usize {
        self.nx
    }
    /// this node's own equality constraint count
    pub fn my(&self) -> usize {
        self.my
    }
    /// this node's own inequality constraint count
    pub fn mz(&self) -> usize {
        self.mz
    }
    /// equality rows among the cross-scenario linking constraints
    pub fn mle(&self) -> usize {
        self.mle
    }
    /// inequality rows among the cross-scenario linking constraints
    pub fn mli(&self) -> usize {
        self.mli
    }
    /// problem-wide variable total; valid after
    /// [`compute_global_sizes`](ScenarioTree::compute_global_sizes)
    pub fn nx_global(&self) -> usize {
        self.nx_global
    }
    /// problem-wide equality constraint total
    pub fn my_global(&self) -> usize {
        self.my_global
    }
    /// problem-wide inequality constraint total
    pub fn mz_global(&self) -> usize {
        self.mz_global
    }
    /// the processes responsible for this node
    pub fn execution_group(&self) -> &ExecutionGroup {
        &self.exec
    }
    /// child nodes in scenario-index order
    pub fn children(&self) -> &[ScenarioTree] {
        &self.children
    }
    /// true if the calling rank holds no data for this node
    pub fn is_dead_end(&self, rank: usize) -> bool {
        !self.exec.contains(rank)
    }

    // ---- block assembly traversals ----

    /// Assemble the Hessian: per node, the stage Hessian as the diagonal
    /// block and, for scenarios, the cross term against the parent's
    /// variables as the border block.
    pub fn create_hessian<T: FloatT, P: ScenarioProblem<T>>(
        &self,
        provider: &P,
        group: &dyn ProcessGroup,
    ) -> SymBlockMatrix<T> {
        self.hessian_block(provider, group, None)
    }

    fn hessian_block<T: FloatT, P: ScenarioProblem<T>>(
        &self,
        provider: &P,
        group: &dyn ProcessGroup,
        parent_nx: Option<usize>,
    ) -> SymBlockMatrix<T> {
        let mut block = if self.is_dead_end(group.rank()) {
            SymBlockMatrix::Virtual(VirtualBlock::new(self.id))
        } else if self.id == 0 {
            let diag = provider.first_stage_hessian();
            assert_eq!(diag.nrows(), self.nx);
            SymBlockMatrix::Active(SymBlockData::new_root(self.id, self.nx_global, diag))
        } else {
            let scen = self.id - 1;
            let diag = provider.second_stage_hessian(scen);
            let border = provider.second_stage_cross_hessian(scen);
            assert_eq!(diag.nrows(), self.nx);
            let parent_nx = parent_nx.expect("scenario node assembled without parent sizes");
            SymBlockMatrix::Active(SymBlockData::new_scenario(
                self.id,
                self.nx_global,
                diag,
                border,
                parent_nx,
            ))
        };

        for child in &self.children {
            block.attach_child(child.hessian_block(provider, group, Some(self.nx)));
        }
        block
    }

    /// Assemble the linear objective: per node, the stage coefficients
    /// scaled by `settings.objective_rescale`.
    pub fn create_objective<T: FloatT, P: ScenarioProblem<T>>(
        &self,
        provider: &P,
        group: &dyn ProcessGroup,
        settings: &AssemblySettings<T>,
    ) -> BlockVector<T> {
        let mut block = if self.is_dead_end(group.rank()) {
            BlockVector::Virtual(VirtualBlock::new(self.id))
        } else {
            let mut vec = if self.id == 0 {
                provider.first_stage_objective()
            } else {
                provider.second_stage_objective(self.id - 1)
            };
            assert_eq!(vec.len(), self.nx);

            let scale = settings.objective_rescale;
            for v in vec.iter_mut() {
                *v = *v * scale;
            }
            BlockVector::Active(BlockVectorData::new(self.id, vec))
        };

        for child in &self.children {
            block.attach_child(child.create_objective(provider, group, settings));
        }
        block
    }

    /// Assemble the equality right-hand side: per node, the shared bound
    /// value of every row with `lb == ub`, in row order.
    pub fn create_eq_rhs<T: FloatT, P: ScenarioProblem<T>>(
        &self,
        provider: &P,
        group: &dyn ProcessGroup,
    ) -> BlockVector<T> {
        let mut block = if self.is_dead_end(group.rank()) {
            BlockVector::Virtual(VirtualBlock::new(self.id))
        } else {
            let (lb, ub) = self.stage_row_bounds(provider);

            let mut vec = Vec::with_capacity(self.my);
            for (&l, &u) in izip!(&lb, &ub) {
                if RowClass::Equality.selects(l, u) {
                    vec.push(l);
                }
            }
            assert_eq!(vec.len(), self.my);
            BlockVector::Active(BlockVectorData::new(self.id, vec))
        };

        for child in &self.children {
            block.attach_child(child.create_eq_rhs(provider, group));
        }
        block
    }

    /// Assemble the equality-constraint Jacobian: per node, the equality
    /// rows of the parent-coupling matrix (scenarios only), of the
    /// node's own constraint matrix, and of the cross-scenario linking
    /// matrix when the problem has equality linking rows.
    pub fn create_eq_jacobian<T: FloatT, P: ScenarioProblem<T>>(
        &self,
        provider: &P,
        group: &dyn ProcessGroup,
    ) -> GenBlockMatrix<T> {
        self.jacobian_block(provider, group, RowClass::Equality, None)
    }

    /// Assemble the inequality-constraint Jacobian: identical shape to
    /// the equality Jacobian, selecting rows with `lb != ub` instead.
    pub fn create_ineq_jacobian<T: FloatT, P: ScenarioProblem<T>>(
        &self,
        provider: &P,
        group: &dyn ProcessGroup,
    ) -> GenBlockMatrix<T> {
        self.jacobian_block(provider, group, RowClass::Inequality, None)
    }

    fn jacobian_block<T: FloatT, P: ScenarioProblem<T>>(
        &self,
        provider: &P,
        group: &dyn ProcessGroup,
        class: RowClass,
        parent_nx: Option<usize>,
    ) -> GenBlockMatrix<T> {
        let (global_rows, local_rows, nlink) = match class {
            RowClass::Equality => (self.my_global, self.my, self.mle),
            RowClass::Inequality => (self.mz_global, self.mz, self.mli),
        };

        let mut block = if self.is_dead_end(group.rank()) {
            GenBlockMatrix::Virtual(VirtualBlock::new(self.id))
        } else {
            let (lb, ub) = self.stage_row_bounds(provider);

            let amat = if self.id == 0 {
                // the root couples to no parent
                None
            } else {
                let raw = provider.parent_coupling_constraints(self.id - 1);
                let amat = extract_rows(&raw, &lb, &ub, class);
                let parent_nx = parent_nx.expect("scenario node assembled without parent sizes");
                assert_eq!(amat.ncols(), parent_nx);
                Some(amat)
            };

            let raw = if self.id == 0 {
                provider.first_stage_constraints()
            } else {
                provider.second_stage_constraints(self.id - 1)
            };
            let bmat = extract_rows(&raw, &lb, &ub, class);
            assert_eq!(bmat.nrows(), local_rows);
            assert_eq!(bmat.ncols(), self.nx);

            let cmat = if nlink > 0 {
                let raw = provider.link_matrix(self.id);
                let link_lb = provider.link_row_lb();
                let link_ub = provider.link_row_ub();
                let cmat = extract_rows(&raw, &link_lb, &link_ub, class);
                assert_eq!(cmat.nrows(), nlink);
                Some(cmat)
            } else {
                None
            };

            GenBlockMatrix::Active(GenBlockData::new(
                self.id,
                global_rows,
                self.nx_global,
                amat,
                bmat,
                cmat,
            ))
        };

        for child in &self.children {
            block.attach_child(child.jacobian_block(provider, group, class, Some(self.nx)));
        }
        block
    }

    /// Assemble the variable lower bounds: finite bounds verbatim,
    /// bounds at or beyond the negative infinity sentinel as 0.0.
    pub fn create_var_lower<T: FloatT, P: ScenarioProblem<T>>(
        &self,
        provider: &P,
        group: &dyn ProcessGroup,
    ) -> BlockVector<T> {
        self.variable_bound_block(provider, group, BoundSide::Lower, BoundKind::Value)
    }

    /// Assemble the variable upper bounds (same sentinel handling).
    pub fn create_var_upper<T: FloatT, P: ScenarioProblem<T>>(
        &self,
        provider: &P,
        group: &dyn ProcessGroup,
    ) -> BlockVector<T> {
        self.variable_bound_block(provider, group, BoundSide::Upper, BoundKind::Value)
    }

    /// Assemble the variable lower bound indicators: 1.0 where the bound
    /// is finite, 0.0 where it is not.
    pub fn create_var_lower_mask<T: FloatT, P: ScenarioProblem<T>>(
        &self,
        provider: &P,
        group: &dyn ProcessGroup,
    ) -> BlockVector<T> {
        self.variable_bound_block(provider, group, BoundSide::Lower, BoundKind::Mask)
    }

    /// Assemble the variable upper bound indicators.
    pub fn create_var_upper_mask<T: FloatT, P: ScenarioProblem<T>>(
        &self,
        provider: &P,
        group: &dyn ProcessGroup,
    ) -> BlockVector<T> {
        self.variable_bound_block(provider, group, BoundSide::Upper, BoundKind::Mask)
    }

    fn variable_bound_block<T: FloatT, P: ScenarioProblem<T>>(
        &self,
        provider: &P,
        group: &dyn ProcessGroup,
        side: BoundSide,
        kind: BoundKind,
    ) -> BlockVector<T> {
        let mut block = if self.is_dead_end(group.rank()) {
            BlockVector::Virtual(VirtualBlock::new(self.id))
        } else {
            let bounds = match (self.id, side) {
                (0, BoundSide::Lower) => provider.first_stage_col_lb(),
                (0, BoundSide::Upper) => provider.first_stage_col_ub(),
                (id, BoundSide::Lower) => provider.second_stage_col_lb(id - 1),
                (id, BoundSide::Upper) => provider.second_stage_col_ub(id - 1),
            };
            assert_eq!(bounds.len(), self.nx);

            let vec = bounds
                .iter()
                .map(|&v| emit_bound(v, side, kind))
                .collect();
            BlockVector::Active(BlockVectorData::new(self.id, vec))
        };

        for child in &self.children {
            block.attach_child(child.variable_bound_block(provider, group, side, kind));
        }
        block
    }

    /// Assemble the inequality-row lower bounds: rows with `lb != ub` in
    /// order, each finite bound verbatim and each infinite one as 0.0.
    pub fn create_ineq_lower<T: FloatT, P: ScenarioProblem<T>>(
        &self,
        provider: &P,
        group: &dyn ProcessGroup,
    ) -> BlockVector<T> {
        self.ineq_bound_block(provider, group, BoundSide::Lower, BoundKind::Value)
    }

    /// Assemble the inequality-row upper bounds.
    pub fn create_ineq_upper<T: FloatT, P: ScenarioProblem<T>>(
        &self,
        provider: &P,
        group: &dyn ProcessGroup,
    ) -> BlockVector<T> {
        self.ineq_bound_block(provider, group, BoundSide::Upper, BoundKind::Value)
    }

    /// Assemble the inequality-row lower bound indicators.
    pub fn create_ineq_lower_mask<T: FloatT, P: ScenarioProblem<T>>(
        &self,
        provider: &P,
        group: &dyn ProcessGroup,
    ) -> BlockVector<T> {
        self.ineq_bound_block(provider, group, BoundSide::Lower, BoundKind::Mask)
    }

    /// Assemble the inequality-row upper bound indicators.
    pub fn create_ineq_upper_mask<T: FloatT, P: ScenarioProblem<T>>(
        &self,
        provider: &P,
        group: &dyn ProcessGroup,
    ) -> BlockVector<T> {
        self.ineq_bound_block(provider, group, BoundSide::Upper, BoundKind::Mask)
    }

    fn ineq_bound_block<T: FloatT, P: ScenarioProblem<T>>(
        &self,
        provider: &P,
        group: &dyn ProcessGroup,
        side: BoundSide,
        kind: BoundKind,
    ) -> BlockVector<T> {
        let mut block = if self.is_dead_end(group.rank()) {
            BlockVector::Virtual(VirtualBlock::new(self.id))
        } else {
            let (lb, ub) = self.stage_row_bounds(provider);

            let mut vec = Vec::with_capacity(self.mz);
            for (&l, &u) in izip!(&lb, &ub) {
                if RowClass::Inequality.selects(l, u) {
                    let bound = match side {
                        BoundSide::Lower => l,
                        BoundSide::Upper => u,
                    };
                    vec.push(emit_bound(bound, side, kind));
                }
            }
            assert_eq!(vec.len(), self.mz);
            BlockVector::Active(BlockVectorData::new(self.id, vec))
        };

        for child in &self.children {
            block.attach_child(child.ineq_bound_block(provider, group, side, kind));
        }
        block
    }

    /// Print each rank's local sizes, one rank at a time.
    ///
    /// Collective: uses a barrier purely to serialize the output order
    /// across ranks.
    pub fn print_local_sizes(&self, group: &dyn ProcessGroup) {
        for turn in 0..group.size() {
            group.barrier();
            if turn != group.rank() {
                continue;
            }
            println!(
                "[arrowhead] rank {}: N={} MY={} MZ={}",
                group.rank(),
                self.nx_global,
                self.my_global,
                self.mz_global
            );
            self.print_node_sizes(group.rank());
        }
    }

    fn print_node_sizes(&self, rank: usize) {
        if !self.is_dead_end(rank) {
            println!(
                "  node {}: nx={} my={} mz={}",
                self.id, self.nx, self.my, self.mz
            );
        }
        for child in &self.children {
            child.print_node_sizes(rank);
        }
    }

    fn stage_row_bounds<T: FloatT, P: ScenarioProblem<T>>(&self, provider: &P) -> (Vec<T>, Vec<T>) {
        if self.id == 0 {
            (provider.first_stage_row_lb(), provider.first_stage_row_ub())
        } else {
            (
                provider.second_stage_row_lb(self.id - 1),
                provider.second_stage_row_ub(self.id - 1),
            )
        }
    }
}

/// Sentinel-aware bound emission: the literal bound (or 1.0 for masks)
/// when strictly inside the infinity sentinel, 0.0 otherwise.
fn emit_bound<T: FloatT>(bound: T, side: BoundSide, kind: BoundKind) -> T {
    let infbound: T = get_infinity().as_T();
    let finite = match side {
        BoundSide::Lower => bound > -infbound,
        BoundSide::Upper => bound < infbound,
    };
    match (finite, kind) {
        (true, BoundKind::Value) => bound,
        (true, BoundKind::Mask) => T::one(),
        (false, _) => T::zero(),
    }
}
