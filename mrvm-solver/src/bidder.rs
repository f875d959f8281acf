use crate::{WorldPartialMip, float};
use mrvm_core::models::{
    Bidder, BidderId, BidderKind, CompareType, Constraint, GenericGood, Map, Mip, RegionId, VarId,
    Variable,
};
use rust_decimal::Decimal;
use std::sync::Arc;

mod local;
mod national;
mod regional;

pub use local::LocalLinker;
pub use national::NationalLinker;
pub use regional::RegionalLinker;

/// Ties a bidder's value variable `v_b` to its omega variables.
///
/// Every kind of bidder discounts its regional sub-values differently, so each
/// kind has its own linker. Whatever the linearization, for any feasible
/// assignment of the quantity variables the (unscaled) value variable must
/// equal the bidder's valuation of the corresponding bundle.
pub trait ValueLinker {
    /// Appends the constraints defining `v_b` to `mip`.
    fn link(&self, partial: &BidderPartialMip, world: &WorldPartialMip, mip: &mut Mip);

    /// Invoked once every bidder of the program has been linked. Does nothing
    /// unless the kind of bidder needs to restrict the program further.
    fn adjust(&self, _partial: &BidderPartialMip, _world: &WorldPartialMip, _mip: &mut Mip) {}
}

/// Select the linker for a kind of bidder
pub(crate) fn linker_for(kind: &BidderKind) -> Box<dyn ValueLinker> {
    match kind {
        BidderKind::Regional {
            home,
            distance_discounts,
        } => Box::new(RegionalLinker::new(*home, distance_discounts.clone())),
        BidderKind::National {
            uncovered_discounts,
        } => Box::new(NationalLinker::new(uncovered_discounts.clone())),
        BidderKind::Local {
            regions_of_interest,
        } => Box::new(LocalLinker::new(regions_of_interest.clone())),
    }
}

/// The part of the program every bidder has, regardless of its kind: the
/// linearization of `ω_{b,r} = sv_{b,r}(c_{b,r}) / s`.
///
/// The regional capacity `c_{b,r}` is the sum of the capacities the bidder
/// holds in each band. For a linear band that is simply `base * x`; for bands
/// with synergies, binary selectors `y_{b,r,band,q}` pick the quantity held,
/// and the capacity is read off the selected quantity.
///
/// The sub-value function is linearized with the incremental formulation:
/// each linear piece gets a fill variable `δ_k`, and binary ordering variables
/// ensure that a piece is only used once its predecessors are full. A flat
/// piece extends the function up to the region's maximum capacity.
#[derive(Clone, Debug)]
pub struct BidderPartialMip {
    bidder: Arc<Bidder>,
    scaling_factor: f64,
    capacity_variables: Map<RegionId, VarId>,
    selector_variables: Map<(GenericGood, u32), VarId>,
    segment_variables: Map<RegionId, Vec<VarId>>,
}

impl BidderPartialMip {
    /// Appends the shared part of the bidder's program to `mip`.
    ///
    /// The bidder must be one of the bidders `world` was built for; goods and
    /// regions without world-level variables are skipped.
    pub fn new(
        mip: &mut Mip,
        bidder: Arc<Bidder>,
        world: &WorldPartialMip,
        scaling_factor: f64,
    ) -> Self {
        let id = bidder.id();
        let mut partial = Self {
            bidder,
            scaling_factor,
            capacity_variables: Map::default(),
            selector_variables: Map::default(),
            segment_variables: Map::default(),
        };

        let regions = world.world().regions().map(|r| r.id).collect::<Vec<_>>();
        for region in regions {
            partial.add_capacity(mip, world, id, region);
            partial.add_sub_value(mip, world, id, region);
        }
        partial
    }

    /// c_{b,r} = Σ_band cap(x_{b,r,band})
    fn add_capacity(&mut self, mip: &mut Mip, world: &WorldPartialMip, id: BidderId, region: RegionId) {
        let max_capacity = float(world.world().max_regional_capacity(region));
        let c = mip.add_variable(Variable::continuous(
            format!("c_{id}_{region}"),
            0.0,
            max_capacity,
        ));
        self.capacity_variables.insert(region, c);

        let mut capacity = Constraint::new(format!("capacity_{id}_{region}"), CompareType::Eq, 0.0)
            .with_term(1.0, c);

        for band in world.world().bands() {
            let good = GenericGood {
                region,
                band: band.id,
            };
            let Some(x) = world.x_variable(id, good) else {
                continue;
            };

            if band.is_linear() {
                capacity.add_term(-float(band.base_capacity), x);
                continue;
            }

            let mut one = Constraint::new(
                format!("select_{id}_{region}_{band}", band = band.id),
                CompareType::Leq,
                1.0,
            );
            let mut quantity = Constraint::new(
                format!("quantity_{id}_{region}_{band}", band = band.id),
                CompareType::Eq,
                0.0,
            )
            .with_term(1.0, x);

            for q in 1..=band.licenses {
                let y = mip.add_variable(Variable::binary(format!(
                    "y_{id}_{region}_{band}_{q}",
                    band = band.id
                )));
                self.selector_variables.insert((good, q), y);
                one.add_term(1.0, y);
                quantity.add_term(-(q as f64), y);
                capacity.add_term(-float(band.capacity(q)), y);
            }

            mip.add_constraint(one);
            mip.add_constraint(quantity);
        }

        mip.add_constraint(capacity);
    }

    /// ω_{b,r} = sv_{b,r}(c_{b,r}) / s
    fn add_sub_value(&mut self, mip: &mut Mip, world: &WorldPartialMip, id: BidderId, region: RegionId) {
        let Some(omega) = world.omega_variable(id, region) else {
            return;
        };
        let Some(sv) = self.bidder.sv_function(region) else {
            // The region is worth nothing to the bidder
            mip.set_upper_bound(omega, 0.0);
            return;
        };
        let c = self.capacity_variables[&region];

        let max_capacity = world.world().max_regional_capacity(region);
        let mut segments = sv.segments().collect::<Vec<_>>();
        if sv.max_capacity() < max_capacity {
            segments.push((max_capacity - sv.max_capacity(), Decimal::ZERO));
        }

        let mut fill = Constraint::new(format!("fill_{id}_{region}"), CompareType::Eq, 0.0)
            .with_term(1.0, c);
        let mut value = Constraint::new(format!("sv_{id}_{region}"), CompareType::Eq, 0.0)
            .with_term(1.0, omega);

        let mut deltas = Vec::with_capacity(segments.len());
        for (k, &(length, slope)) in segments.iter().enumerate() {
            let delta = mip.add_variable(Variable::continuous(
                format!("delta_{id}_{region}_{k}"),
                0.0,
                float(length),
            ));
            fill.add_term(-1.0, delta);
            value.add_term(-float(slope) / self.scaling_factor, delta);
            deltas.push(delta);
        }

        // A piece may only be used once the previous one is full:
        // δ_k >= L_k w_k and δ_{k+1} <= L_{k+1} w_k
        for k in 0..segments.len().saturating_sub(1) {
            let w = mip.add_variable(Variable::binary(format!("w_{id}_{region}_{k}")));
            mip.add_constraint(
                Constraint::new(format!("full_{id}_{region}_{k}"), CompareType::Geq, 0.0)
                    .with_term(1.0, deltas[k])
                    .with_term(-float(segments[k].0), w),
            );
            mip.add_constraint(
                Constraint::new(format!("next_{id}_{region}_{k}"), CompareType::Leq, 0.0)
                    .with_term(1.0, deltas[k + 1])
                    .with_term(-float(segments[k + 1].0), w),
            );
        }

        mip.add_constraint(fill);
        mip.add_constraint(value);
        self.segment_variables.insert(region, deltas);
    }

    /// The bidder this fragment belongs to
    pub fn bidder(&self) -> &Arc<Bidder> {
        &self.bidder
    }

    /// The factor every value in the program is divided by
    pub fn scaling_factor(&self) -> f64 {
        self.scaling_factor
    }

    /// The regional capacity variable `c_{b,r}`
    pub fn capacity_variable(&self, region: RegionId) -> Option<VarId> {
        self.capacity_variables.get(&region).copied()
    }

    /// The binary selecting quantity `q` of a non-linear good
    pub fn selector_variable(&self, good: GenericGood, quantity: u32) -> Option<VarId> {
        self.selector_variables.get(&(good, quantity)).copied()
    }

    /// The fill variables of the pieces of the sub-value function of a region
    pub fn segment_variables(&self, region: RegionId) -> &[VarId] {
        self.segment_variables
            .get(&region)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mrvm_core::models::{Band, BandId, Breakpoint, Region, RegionsMap, SvFunction, World};
    use rust_decimal_macros::dec;

    #[test]
    fn test_synergy_selectors_and_flat_extension() {
        let regions = RegionsMap::new(
            [Region {
                id: RegionId(0),
                name: "north".into(),
                population: 100,
            }],
            [],
        )
        .unwrap();
        let bands = [
            Band {
                id: BandId(0),
                name: "A".into(),
                licenses: 2,
                base_capacity: dec!(20),
                synergies: vec![dec!(1), dec!(1.2)],
            },
            Band {
                id: BandId(1),
                name: "B".into(),
                licenses: 1,
                base_capacity: dec!(10),
                synergies: vec![],
            },
        ];
        let world = Arc::new(World::new(regions, bands).unwrap());

        // two pieces ending at capacity 40, short of the maximum of 58
        let sv = SvFunction::new(vec![
            Breakpoint {
                capacity: dec!(0),
                value: dec!(0),
            },
            Breakpoint {
                capacity: dec!(20),
                value: dec!(10),
            },
            Breakpoint {
                capacity: dec!(40),
                value: dec!(50),
            },
        ])
        .unwrap();
        let bidder = Arc::new(
            Bidder::new(
                BidderId(4),
                world.clone(),
                BidderKind::Local {
                    regions_of_interest: vec![RegionId(0)],
                },
                [(RegionId(0), sv)],
            )
            .unwrap(),
        );

        let mut mip = Mip::new();
        let world_mip = WorldPartialMip::new(&mut mip, &[bidder.clone()], 1.0, 0.0).unwrap();
        let partial = BidderPartialMip::new(&mut mip, bidder, &world_mip, 1.0);

        let good = GenericGood {
            region: RegionId(0),
            band: BandId(0),
        };
        assert!(partial.selector_variable(good, 1).is_some());
        assert!(partial.selector_variable(good, 2).is_some());
        assert!(partial.selector_variable(good, 3).is_none());

        // the capacity of holding both licenses of the synergetic band
        let capacity = mip
            .constraints()
            .iter()
            .find(|c| c.name() == "capacity_4_0")
            .unwrap();
        let y2 = partial.selector_variable(good, 2).unwrap();
        assert!(capacity.terms().contains(&(y2, -48.0)));

        let deltas = partial.segment_variables(RegionId(0));
        assert_eq!(deltas.len(), 3);
        assert_eq!(mip.variable(deltas[2]).upper, 18.0);
        assert_eq!(
            mip.variables()
                .filter(|(_, v)| v.name.starts_with("w_4_0_"))
                .count(),
            2
        );
    }
}
