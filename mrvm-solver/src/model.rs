use crate::{
    BidderPartialMip, ConfigurationError, ModelError, WorldPartialMip, allocation::extract,
    bidder::linker_for, scaling_factor,
};
use mrvm_core::{
    models::{
        Allocation, Bidder, BidderId, Constraint, Map, Mip, MipSolution, ModelSettings,
        SolveStatus, VarId, Variable,
    },
    ports::MipSolver,
};
use std::{sync::Arc, time::Duration};
use tracing::{Level, event, span};

/// The winner determination program of an MRVM economy, ready to be solved.
///
/// The program is composed once, upon construction: the scaling factor is
/// computed, the world fragment is appended, and every bidder's fragment is
/// appended and linked according to the bidder's kind. The instance is then
/// consumed by [`MrvmMip::solve`]; use [`MrvmMip::copy_of`] or
/// [`MrvmMip::without`] to obtain fresh programs over the same bidders.
#[derive(Clone, Debug)]
pub struct MrvmMip {
    bidders: Vec<Arc<Bidder>>,
    settings: ModelSettings,
    scaling_factor: f64,
    mip: Mip,
    world_partial_mip: WorldPartialMip,
    bidder_partial_mips: Map<BidderId, BidderPartialMip>,
}

impl MrvmMip {
    /// Composes the program for the given bidders with default settings
    pub fn new(bidders: impl IntoIterator<Item = Arc<Bidder>>) -> Result<Self, ConfigurationError> {
        Self::with_settings(bidders, ModelSettings::default())
    }

    /// Composes the program for the given bidders
    pub fn with_settings(
        bidders: impl IntoIterator<Item = Arc<Bidder>>,
        settings: ModelSettings,
    ) -> Result<Self, ConfigurationError> {
        let bidders = bidders.into_iter().collect::<Vec<_>>();
        let scaling_factor = scaling_factor(&bidders, &settings.scaling)?;

        let mut mip = Mip::new();
        let world_partial_mip =
            WorldPartialMip::new(&mut mip, &bidders, scaling_factor, settings.epsilon)?;

        let mut bidder_partial_mips = Map::default();
        let mut linkers = Vec::with_capacity(bidders.len());
        for bidder in &bidders {
            let partial =
                BidderPartialMip::new(&mut mip, bidder.clone(), &world_partial_mip, scaling_factor);
            let linker = linker_for(bidder.kind());
            linker.link(&partial, &world_partial_mip, &mut mip);
            bidder_partial_mips.insert(bidder.id(), partial);
            linkers.push(linker);
        }
        for (linker, partial) in linkers.iter().zip(bidder_partial_mips.values()) {
            linker.adjust(partial, &world_partial_mip, &mut mip);
        }

        event!(
            Level::DEBUG,
            bidders = bidders.len(),
            scaling_factor,
            variables = mip.num_variables(),
            constraints = mip.constraints().len(),
            "composed winner determination program"
        );

        Ok(Self {
            bidders,
            settings,
            scaling_factor,
            mip,
            world_partial_mip,
            bidder_partial_mips,
        })
    }

    /// A freshly composed program over the same bidders with the same settings.
    ///
    /// Extensions added through [`MrvmMip::add_variable`] and friends are not
    /// carried over.
    pub fn copy_of(&self) -> Result<Self, ConfigurationError> {
        Self::with_settings(self.bidders.iter().cloned(), self.settings.clone())
    }

    /// A freshly composed program over every bidder but `bidder`
    pub fn without(&self, bidder: BidderId) -> Result<Self, ConfigurationError> {
        if !self.bidder_partial_mips.contains_key(&bidder) {
            return Err(ConfigurationError::UnknownBidder(bidder));
        }
        Self::with_settings(
            self.bidders
                .iter()
                .filter(|other| other.id() != bidder)
                .cloned(),
            self.settings.clone(),
        )
    }

    /// Limit the wall-clock time of the solve
    pub fn set_time_limit(&mut self, time_limit: Duration) {
        self.settings.params.time_limit = Some(time_limit);
    }

    /// Whether to accept the best solution found when the time limit is hit
    pub fn set_accept_suboptimal(&mut self, accept: bool) {
        self.settings.params.accept_suboptimal = accept;
    }

    /// Set the objective penalty per allocated license
    pub fn set_epsilon(&mut self, epsilon: f64) {
        self.settings.epsilon = epsilon;
        self.world_partial_mip.set_epsilon(&mut self.mip, epsilon);
    }

    /// Add a variable to the program
    pub fn add_variable(&mut self, variable: Variable) -> VarId {
        self.mip.add_variable(variable)
    }

    /// Add a constraint to the program
    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.mip.add_constraint(constraint);
    }

    /// Add a term to the (maximized) objective
    pub fn add_objective_term(&mut self, coefficient: f64, var: VarId) {
        self.mip.add_objective_term(coefficient, var);
    }

    /// The composed program
    pub fn mip(&self) -> &Mip {
        &self.mip
    }

    /// The variables an allocation is read from: every quantity variable
    pub fn x_variables(&self) -> impl Iterator<Item = VarId> + '_ {
        self.world_partial_mip.all_x_variables()
    }

    /// The bidders of the economy
    pub fn bidders(&self) -> &[Arc<Bidder>] {
        &self.bidders
    }

    /// The settings the program was composed with
    pub fn settings(&self) -> &ModelSettings {
        &self.settings
    }

    /// The factor every value in the program is divided by
    pub fn scaling_factor(&self) -> f64 {
        self.scaling_factor
    }

    /// The world-level fragment
    pub fn world_partial_mip(&self) -> &WorldPartialMip {
        &self.world_partial_mip
    }

    /// The bidder-level fragments
    pub fn bidder_partial_mips(&self) -> &Map<BidderId, BidderPartialMip> {
        &self.bidder_partial_mips
    }

    /// Hand the program to the solver.
    ///
    /// Fails if the solver does, if the program is infeasible, or if the time
    /// limit was hit without suboptimal solutions being accepted.
    pub fn solve<S: MipSolver>(self, solver: &S) -> Result<SolvedMrvmMip, ModelError> {
        let span = span!(
            Level::INFO,
            "winner determination",
            bidders = self.bidders.len(),
            scaling_factor = self.scaling_factor
        );
        let _guard = span.enter();

        let solution = solver
            .solve(&self.mip, &self.settings.params)
            .map_err(|err| ModelError::Solver(Box::new(err)))?;

        match solution.status() {
            SolveStatus::Optimal => {}
            SolveStatus::TimeLimit if self.settings.params.accept_suboptimal => {
                event!(
                    Level::WARN,
                    objective = solution.objective(),
                    "time limit reached, accepting a possibly suboptimal solution"
                );
            }
            SolveStatus::TimeLimit => {
                let limit = self
                    .settings
                    .params
                    .time_limit
                    .unwrap_or(solution.solve_time());
                event!(Level::ERROR, ?limit, "time limit reached");
                return Err(ModelError::SolveTimeout(limit));
            }
            SolveStatus::Infeasible => {
                event!(Level::ERROR, "solver reports an infeasible program");
                return Err(ModelError::Infeasible);
            }
        }

        event!(
            Level::DEBUG,
            objective = solution.objective(),
            solve_time = ?solution.solve_time(),
            values = ?solution.values(),
            "raw solution"
        );

        Ok(SolvedMrvmMip {
            model: self,
            solution,
        })
    }

    /// Solve the program and extract the allocation
    pub fn allocation<S: MipSolver>(self, solver: &S) -> Result<Allocation, ModelError> {
        self.solve(solver)?.allocation()
    }
}

/// A program together with the solver's answer, ready for extraction.
#[derive(Clone, Debug)]
pub struct SolvedMrvmMip {
    model: MrvmMip,
    solution: MipSolution,
}

impl SolvedMrvmMip {
    /// The program that was solved
    pub fn model(&self) -> &MrvmMip {
        &self.model
    }

    /// The solver's raw answer
    pub fn solution(&self) -> &MipSolution {
        &self.solution
    }

    /// A freshly composed copy of the program that was solved
    pub fn copy_of(&self) -> Result<MrvmMip, ConfigurationError> {
        self.model.copy_of()
    }

    /// A freshly composed program without `bidder`
    pub fn without(&self, bidder: BidderId) -> Result<MrvmMip, ConfigurationError> {
        self.model.without(bidder)
    }

    /// Turn the solution into an allocation, checking it against the bidders'
    /// true valuations.
    pub fn allocation(self) -> Result<Allocation, ModelError> {
        Ok(extract(&self.model, &self.solution)?)
    }
}
