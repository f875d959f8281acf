use super::{BidderPartialMip, ValueLinker};
use crate::WorldPartialMip;
use mrvm_core::models::{CompareType, Constraint, Mip, RegionId};

/// `v_b = Σ_{r ∈ interest} ω_{b,r}`.
///
/// Local bidders have no use for licenses outside their regions of interest,
/// so [`ValueLinker::adjust`] fixes those quantities to zero.
#[derive(Clone, Debug)]
pub struct LocalLinker {
    regions_of_interest: Vec<RegionId>,
}

impl LocalLinker {
    /// A linker for a bidder interested in the given regions only
    pub fn new(regions_of_interest: Vec<RegionId>) -> Self {
        Self {
            regions_of_interest,
        }
    }
}

impl ValueLinker for LocalLinker {
    fn link(&self, partial: &BidderPartialMip, world: &WorldPartialMip, mip: &mut Mip) {
        let id = partial.bidder().id();
        let Some(v) = world.value_variable(id) else {
            return;
        };

        let mut value =
            Constraint::new(format!("value_{id}"), CompareType::Eq, 0.0).with_term(1.0, v);
        for &region in &self.regions_of_interest {
            if let Some(omega) = world.omega_variable(id, region) {
                value.add_term(-1.0, omega);
            }
        }
        mip.add_constraint(value);
    }

    fn adjust(&self, partial: &BidderPartialMip, world: &WorldPartialMip, mip: &mut Mip) {
        for (good, x) in world.x_variables(partial.bidder().id()) {
            if !self.regions_of_interest.contains(&good.region) {
                mip.set_upper_bound(x, 0.0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mrvm_core::models::{
        Band, BandId, Bidder, BidderId, BidderKind, GenericGood, Region, RegionsMap, SvFunction,
        World,
    };
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    #[test]
    fn test_quantities_outside_interest_are_fixed() {
        let regions = RegionsMap::new(
            (0..3).map(|id| Region {
                id: RegionId(id),
                name: format!("region {id}"),
                population: 100,
            }),
            [],
        )
        .unwrap();
        let band = Band {
            id: BandId(0),
            name: "A".into(),
            licenses: 4,
            base_capacity: dec!(5),
            synergies: vec![],
        };
        let world = Arc::new(World::new(regions, [band]).unwrap());

        let interest = vec![RegionId(0), RegionId(2)];
        let sv = SvFunction::sigmoid(dec!(80), dec!(20), dec!(0.2), dec!(0.6)).unwrap();
        let bidder = Arc::new(
            Bidder::new(
                BidderId(9),
                world,
                BidderKind::Local {
                    regions_of_interest: interest.clone(),
                },
                (0..3).map(|id| (RegionId(id), sv.clone())),
            )
            .unwrap(),
        );

        let mut mip = Mip::new();
        let world_mip = WorldPartialMip::new(&mut mip, &[bidder.clone()], 1.0, 0.0).unwrap();
        let partial = BidderPartialMip::new(&mut mip, bidder, &world_mip, 1.0);
        let linker = LocalLinker::new(interest);
        linker.link(&partial, &world_mip, &mut mip);
        linker.adjust(&partial, &world_mip, &mut mip);

        let upper = |region| {
            let good = GenericGood {
                region: RegionId(region),
                band: BandId(0),
            };
            mip.variable(world_mip.x_variable(BidderId(9), good).unwrap())
                .upper
        };
        assert_eq!(upper(0), 4.0);
        assert_eq!(upper(1), 0.0);
        assert_eq!(upper(2), 4.0);

        let value = mip
            .constraints()
            .iter()
            .find(|c| c.name() == "value_9")
            .unwrap();
        assert_eq!(value.terms().len(), 3);
    }
}
