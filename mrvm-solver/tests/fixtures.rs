#![allow(dead_code)]
use mrvm_core::models::{
    Band, BandId, Bidder, BidderId, BidderKind, Breakpoint, Region, RegionId, RegionsMap,
    SvFunction, World,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

/// A world with `regions` regions, the given adjacencies, and one linear band
/// per `(licenses, base_capacity)` pair.
pub fn world(regions: u32, adjacencies: &[(u32, u32)], bands: &[(u32, Decimal)]) -> Arc<World> {
    let regions = RegionsMap::new(
        (0..regions).map(|id| Region {
            id: RegionId(id),
            name: format!("region {id}"),
            population: 1000,
        }),
        adjacencies
            .iter()
            .map(|&(a, b)| (RegionId(a), RegionId(b))),
    )
    .unwrap();
    let bands = bands
        .iter()
        .enumerate()
        .map(|(id, &(licenses, base_capacity))| Band {
            id: BandId(id as u32),
            name: format!("band {id}"),
            licenses,
            base_capacity,
            synergies: vec![],
        });
    Arc::new(World::new(regions, bands).unwrap())
}

/// A world of one region and a single band with the given synergies
pub fn synergy_world(licenses: u32, base_capacity: Decimal, synergies: Vec<Decimal>) -> Arc<World> {
    let regions = RegionsMap::new(
        [Region {
            id: RegionId(0),
            name: "region 0".into(),
            population: 1000,
        }],
        [],
    )
    .unwrap();
    let band = Band {
        id: BandId(0),
        name: "band 0".into(),
        licenses,
        base_capacity,
        synergies,
    };
    Arc::new(World::new(regions, [band]).unwrap())
}

/// A local bidder interested in region 0 only, valuing it along the given
/// `(capacity, value)` breakpoints
pub fn local_with(id: u64, world: &Arc<World>, breakpoints: &[(Decimal, Decimal)]) -> Arc<Bidder> {
    let sv = SvFunction::new(
        breakpoints
            .iter()
            .map(|&(capacity, value)| Breakpoint { capacity, value })
            .collect(),
    )
    .unwrap();
    let kind = BidderKind::Local {
        regions_of_interest: vec![RegionId(0)],
    };
    Arc::new(Bidder::new(BidderId(id), world.clone(), kind, [(RegionId(0), sv)]).unwrap())
}

/// Sub-value functions reaching `scale` at each region's maximum capacity
fn sv_functions(world: &World, scale: Decimal) -> Vec<(RegionId, SvFunction)> {
    world
        .regions()
        .map(|region| {
            let max_capacity = world.max_regional_capacity(region.id);
            let sv = SvFunction::sigmoid(scale, max_capacity, dec!(0.25), dec!(0.75)).unwrap();
            (region.id, sv)
        })
        .collect()
}

pub fn regional(
    id: u64,
    world: &Arc<World>,
    home: u32,
    distance_discounts: Vec<Decimal>,
    scale: Decimal,
) -> Arc<Bidder> {
    let kind = BidderKind::Regional {
        home: RegionId(home),
        distance_discounts,
    };
    Arc::new(Bidder::new(BidderId(id), world.clone(), kind, sv_functions(world, scale)).unwrap())
}

pub fn national(
    id: u64,
    world: &Arc<World>,
    uncovered_discounts: Vec<Decimal>,
    scale: Decimal,
) -> Arc<Bidder> {
    let kind = BidderKind::National {
        uncovered_discounts,
    };
    Arc::new(Bidder::new(BidderId(id), world.clone(), kind, sv_functions(world, scale)).unwrap())
}

pub fn local(id: u64, world: &Arc<World>, interest: &[u32], scale: Decimal) -> Arc<Bidder> {
    let kind = BidderKind::Local {
        regions_of_interest: interest.iter().map(|&r| RegionId(r)).collect(),
    };
    Arc::new(Bidder::new(BidderId(id), world.clone(), kind, sv_functions(world, scale)).unwrap())
}
