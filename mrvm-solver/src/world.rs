use crate::{ConfigurationError, float, scaling::biggest_unscaled_value};
use mrvm_core::models::{
    Bidder, BidderId, BidderKind, CompareType, Constraint, GenericGood, Map, Mip, RegionId, VarId,
    Variable, World,
};
use rustc_hash::FxHashSet;
use std::sync::Arc;

/// The part of the program shared by all bidders.
///
/// For every bidder `b` it creates (exactly once):
/// - the value variable `v_b`,
/// - one omega variable `ω_{b,r}` per region, holding the bidder's scaled,
///   undiscounted sub-value of the region,
/// - one integer quantity variable `x_{b,r,band}` per generic good.
///
/// It also adds the supply constraints (no good is allocated beyond the number
/// of its licenses) and the objective `Σ_b v_b - ε Σ x`.
#[derive(Clone, Debug)]
pub struct WorldPartialMip {
    world: Arc<World>,
    scaling_factor: f64,
    biggest_possible_value: f64,
    epsilon: f64,
    value_variables: Map<BidderId, VarId>,
    omega_variables: Map<(BidderId, RegionId), VarId>,
    x_variables: Map<(BidderId, GenericGood), VarId>,
}

impl WorldPartialMip {
    /// Appends the world-level variables and constraints for `bidders` to `mip`.
    pub fn new(
        mip: &mut Mip,
        bidders: &[Arc<Bidder>],
        scaling_factor: f64,
        epsilon: f64,
    ) -> Result<Self, ConfigurationError> {
        let world = validate(bidders)?;
        let biggest_possible_value = float(biggest_unscaled_value(bidders)) / scaling_factor;

        let mut value_variables = Map::default();
        let mut omega_variables = Map::default();
        let mut x_variables = Map::default();

        for bidder in bidders {
            let id = bidder.id();
            let v = mip.add_variable(Variable::continuous(
                format!("v_{id}"),
                0.0,
                biggest_possible_value,
            ));
            mip.add_objective_term(1.0, v);
            value_variables.insert(id, v);

            for region in world.regions() {
                let r = region.id;
                let omega = mip.add_variable(Variable::continuous(
                    format!("omega_{id}_{r}"),
                    0.0,
                    biggest_possible_value,
                ));
                omega_variables.insert((id, r), omega);

                for band in world.bands() {
                    let x = mip.add_variable(Variable::integer(
                        format!("x_{id}_{r}_{band}", band = band.id),
                        0.0,
                        band.licenses as f64,
                    ));
                    mip.add_objective_term(-epsilon, x);
                    x_variables.insert(
                        (
                            id,
                            GenericGood {
                                region: r,
                                band: band.id,
                            },
                        ),
                        x,
                    );
                }
            }
        }

        // Supply: Σ_b x_{b,r,band} <= licenses
        for good in world.goods() {
            let licenses = world.capacity(good).unwrap_or_default();
            let mut supply = Constraint::new(
                format!("supply_{}_{}", good.region, good.band),
                CompareType::Leq,
                licenses as f64,
            );
            for bidder in bidders {
                if let Some(&x) = x_variables.get(&(bidder.id(), good)) {
                    supply.add_term(1.0, x);
                }
            }
            mip.add_constraint(supply);
        }

        Ok(Self {
            world,
            scaling_factor,
            biggest_possible_value,
            epsilon,
            value_variables,
            omega_variables,
            x_variables,
        })
    }

    /// The world all bidders live in
    pub fn world(&self) -> &Arc<World> {
        &self.world
    }

    /// The factor every value in the program is divided by
    pub fn scaling_factor(&self) -> f64 {
        self.scaling_factor
    }

    /// The (scaled) upper bound of every value variable
    pub fn biggest_possible_value(&self) -> f64 {
        self.biggest_possible_value
    }

    /// The objective penalty per allocated license
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Re-prices every quantity variable in the objective
    pub fn set_epsilon(&mut self, mip: &mut Mip, epsilon: f64) {
        self.epsilon = epsilon;
        for &x in self.x_variables.values() {
            mip.set_objective_coefficient(x, -epsilon);
        }
    }

    /// The value variable `v_b`
    pub fn value_variable(&self, bidder: BidderId) -> Option<VarId> {
        self.value_variables.get(&bidder).copied()
    }

    /// The omega variable `ω_{b,r}`
    pub fn omega_variable(&self, bidder: BidderId, region: RegionId) -> Option<VarId> {
        self.omega_variables.get(&(bidder, region)).copied()
    }

    /// The quantity variable `x_{b,r,band}`
    pub fn x_variable(&self, bidder: BidderId, good: GenericGood) -> Option<VarId> {
        self.x_variables.get(&(bidder, good)).copied()
    }

    /// The quantity variables of one bidder, by good
    pub fn x_variables(&self, bidder: BidderId) -> impl Iterator<Item = (GenericGood, VarId)> + '_ {
        self.x_variables
            .iter()
            .filter(move |((id, _), _)| *id == bidder)
            .map(|((_, good), x)| (*good, *x))
    }

    /// Every quantity variable of the program
    pub fn all_x_variables(&self) -> impl Iterator<Item = VarId> + '_ {
        self.x_variables.values().copied()
    }
}

/// Checks that the bidders form a valid economy and returns their common world.
fn validate(bidders: &[Arc<Bidder>]) -> Result<Arc<World>, ConfigurationError> {
    let Some(first) = bidders.first() else {
        return Err(ConfigurationError::NoBidders);
    };
    let world = first.world().clone();

    let mut seen = FxHashSet::default();
    for bidder in bidders {
        let id = bidder.id();
        if !seen.insert(id) {
            return Err(ConfigurationError::DuplicateBidder(id));
        }
        if !Arc::ptr_eq(bidder.world(), &world) && **bidder.world() != *world {
            return Err(ConfigurationError::ForeignWorld(id));
        }

        let referenced: &[RegionId] = match bidder.kind() {
            BidderKind::Regional { home, .. } => std::slice::from_ref(home),
            BidderKind::National { .. } => &[],
            BidderKind::Local {
                regions_of_interest,
            } => regions_of_interest,
        };
        if let Some(&region) = referenced
            .iter()
            .find(|region| !world.regions_map().contains(**region))
        {
            return Err(ConfigurationError::UnknownRegion { bidder: id, region });
        }
    }

    Ok(world)
}
