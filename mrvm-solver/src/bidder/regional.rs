use super::{BidderPartialMip, ValueLinker};
use crate::{WorldPartialMip, float};
use mrvm_core::models::{CompareType, Constraint, Mip, RegionId, World};
use rust_decimal::Decimal;

/// `v_b = Σ_r γ_r ω_{b,r}`, with `γ_r` the discount for the distance between
/// the bidder's home and `r`.
///
/// The discounts do not depend on the bundle, so the value is linear in the
/// omega variables.
#[derive(Clone, Debug)]
pub struct RegionalLinker {
    home: RegionId,
    distance_discounts: Vec<Decimal>,
}

impl RegionalLinker {
    /// A linker for a bidder living in `home`
    pub fn new(home: RegionId, distance_discounts: Vec<Decimal>) -> Self {
        Self {
            home,
            distance_discounts,
        }
    }

    /// The discount applied to `region`
    pub fn gamma(&self, world: &World, region: RegionId) -> Decimal {
        world
            .regions_map()
            .distance(self.home, region)
            .and_then(|distance| self.distance_discounts.get(distance as usize))
            .copied()
            .unwrap_or_default()
    }
}

impl ValueLinker for RegionalLinker {
    fn link(&self, partial: &BidderPartialMip, world: &WorldPartialMip, mip: &mut Mip) {
        let id = partial.bidder().id();
        let Some(v) = world.value_variable(id) else {
            return;
        };

        let mut value =
            Constraint::new(format!("value_{id}"), CompareType::Eq, 0.0).with_term(1.0, v);
        for region in world.world().regions() {
            if let Some(omega) = world.omega_variable(id, region.id) {
                value.add_term(-float(self.gamma(world.world(), region.id)), omega);
            }
        }
        mip.add_constraint(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mrvm_core::models::{
        Band, BandId, Bidder, BidderId, BidderKind, Bundle, Region, RegionsMap, SvFunction,
    };
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    #[test]
    fn test_discounts_follow_distance() {
        // a line of three regions: 0 - 1 - 2
        let regions = RegionsMap::new(
            (0..3).map(|id| Region {
                id: RegionId(id),
                name: format!("region {id}"),
                population: 100,
            }),
            [(RegionId(0), RegionId(1)), (RegionId(1), RegionId(2))],
        )
        .unwrap();
        let band = Band {
            id: BandId(0),
            name: "A".into(),
            licenses: 2,
            base_capacity: dec!(10),
            synergies: vec![],
        };
        let world = Arc::new(World::new(regions, [band]).unwrap());

        let kind = BidderKind::Regional {
            home: RegionId(0),
            distance_discounts: vec![dec!(1), dec!(0.5)],
        };
        let sv = SvFunction::sigmoid(dec!(100), dec!(20), dec!(0.25), dec!(0.75)).unwrap();
        let bidder = Arc::new(
            Bidder::new(
                BidderId(0),
                world.clone(),
                kind,
                (0..3).map(|id| (RegionId(id), sv.clone())),
            )
            .unwrap(),
        );

        let linker = RegionalLinker::new(RegionId(0), vec![dec!(1), dec!(0.5)]);
        for region in world.regions() {
            assert_eq!(
                linker.gamma(&world, region.id),
                bidder.gamma(region.id, &Bundle::empty())
            );
        }
        assert_eq!(linker.gamma(&world, RegionId(2)), dec!(0));

        let mut mip = Mip::new();
        let world_mip = WorldPartialMip::new(&mut mip, &[bidder.clone()], 1.0, 0.0).unwrap();
        let partial = BidderPartialMip::new(&mut mip, bidder, &world_mip, 1.0);
        linker.link(&partial, &world_mip, &mut mip);

        let value = mip.constraints().last().unwrap();
        assert_eq!(value.name(), "value_0");
        // the zero discount of the far region drops out
        assert_eq!(value.terms().len(), 3);
        let omega = world_mip.omega_variable(BidderId(0), RegionId(1)).unwrap();
        assert!(value.terms().contains(&(omega, -0.5)));
    }
}
