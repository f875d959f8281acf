use super::{BidderId, Bundle, Map, RegionId, SvFunction, World};
use rust_decimal::Decimal;
use rustc_hash::FxHashSet;
use std::sync::Arc;

/// The kinds of bidders, each discounting its regional sub-values differently.
#[derive(Clone, Debug, PartialEq)]
pub enum BidderKind {
    /// A bidder anchored in a home region, whose interest decays with distance.
    Regional {
        /// The bidder's home region
        home: RegionId,
        /// `distance_discounts[d]` is the discount applied to regions at
        /// distance `d` from home. Regions beyond the table, or disconnected
        /// from home, are worth nothing.
        distance_discounts: Vec<Decimal>,
    },
    /// A bidder that wants nationwide coverage.
    National {
        /// `uncovered_discounts[k]` is the discount applied to every region
        /// when the bundle holds no license in `k` of the regions. More
        /// uncovered regions than the table covers are worth nothing.
        uncovered_discounts: Vec<Decimal>,
    },
    /// A bidder that values a fixed set of regions only.
    Local {
        /// The regions the bidder values (undiscounted)
        regions_of_interest: Vec<RegionId>,
    },
}

/// A bidder together with its (true) valuation function.
///
/// A bidder is immutable once constructed, and its valuation is a pure
/// function of the bundle: it may be evaluated any number of times.
#[derive(Clone, Debug)]
pub struct Bidder {
    id: BidderId,
    world: Arc<World>,
    sv_functions: Map<RegionId, SvFunction>,
    kind: BidderKind,
}

impl Bidder {
    /// Creates a bidder, validating that everything it references exists in
    /// `world` and that its discounts lie within [0, 1].
    ///
    /// Regions without a sub-value function are worth nothing to the bidder.
    pub fn new(
        id: BidderId,
        world: Arc<World>,
        kind: BidderKind,
        sv_functions: impl IntoIterator<Item = (RegionId, SvFunction)>,
    ) -> Result<Self, BidderError> {
        let sv_functions = sv_functions.into_iter().collect::<Map<_, _>>();
        let regions = world.regions_map();

        if let Some(region) = sv_functions.keys().find(|r| !regions.contains(**r)) {
            return Err(BidderError::UnknownRegion(*region));
        }

        let discounts: &[Decimal] = match &kind {
            BidderKind::Regional {
                home,
                distance_discounts,
            } => {
                if !regions.contains(*home) {
                    return Err(BidderError::UnknownRegion(*home));
                }
                distance_discounts.as_slice()
            }
            BidderKind::National {
                uncovered_discounts,
            } => uncovered_discounts.as_slice(),
            BidderKind::Local {
                regions_of_interest,
            } => {
                if let Some(region) = regions_of_interest.iter().find(|r| !regions.contains(**r)) {
                    return Err(BidderError::UnknownRegion(*region));
                }
                let mut seen = FxHashSet::default();
                if let Some(region) = regions_of_interest.iter().find(|r| !seen.insert(**r)) {
                    return Err(BidderError::DuplicateRegion(*region));
                }
                &[]
            }
        };
        if let Some(discount) = discounts
            .iter()
            .find(|d| d.is_sign_negative() || **d > Decimal::ONE)
        {
            return Err(BidderError::DiscountOutOfRange(*discount));
        }

        Ok(Self {
            id,
            world,
            sv_functions,
            kind,
        })
    }

    /// The bidder's identifier
    pub fn id(&self) -> BidderId {
        self.id
    }

    /// The world the bidder lives in
    pub fn world(&self) -> &Arc<World> {
        &self.world
    }

    /// The bidder's kind
    pub fn kind(&self) -> &BidderKind {
        &self.kind
    }

    /// The bidder's sub-value function for `region`, if it values the region at all
    pub fn sv_function(&self, region: RegionId) -> Option<&SvFunction> {
        self.sv_functions.get(&region)
    }

    /// The undiscounted value of holding `capacity` in `region`
    pub fn sv(&self, region: RegionId, capacity: Decimal) -> Decimal {
        self.sv_function(region)
            .map(|f| f.value(capacity))
            .unwrap_or_default()
    }

    /// The number of regions in which `bundle` holds no license
    pub fn uncovered_regions(&self, bundle: &Bundle) -> usize {
        self.world
            .regions()
            .filter(|region| !bundle.covers(region.id))
            .count()
    }

    /// The discount in [0, 1] the bidder applies to `region`.
    ///
    /// Only national bidders depend on the bundle; the others ignore it.
    pub fn gamma(&self, region: RegionId, bundle: &Bundle) -> Decimal {
        match &self.kind {
            BidderKind::Regional {
                home,
                distance_discounts,
            } => self
                .world
                .regions_map()
                .distance(*home, region)
                .and_then(|d| distance_discounts.get(d as usize))
                .copied()
                .unwrap_or_default(),
            BidderKind::National {
                uncovered_discounts,
            } => uncovered_discounts
                .get(self.uncovered_regions(bundle))
                .copied()
                .unwrap_or_default(),
            BidderKind::Local {
                regions_of_interest,
            } => {
                if regions_of_interest.contains(&region) {
                    Decimal::ONE
                } else {
                    Decimal::ZERO
                }
            }
        }
    }

    /// The bidder's true value of a bundle
    pub fn value(&self, bundle: &Bundle) -> Decimal {
        self.world
            .regions()
            .map(|region| {
                let capacity = self.world.regional_capacity(region.id, bundle);
                self.gamma(region.id, bundle) * self.sv(region.id, capacity)
            })
            .sum()
    }

    /// The sum of the bidder's sub-values when holding every license of the
    /// world. Since discounts never exceed one and sub-values are monotone,
    /// this bounds every value the bidder can have.
    pub fn max_undiscounted_value(&self) -> Decimal {
        self.world
            .regions()
            .map(|region| self.sv(region.id, self.world.max_regional_capacity(region.id)))
            .sum()
    }
}

/// Errors that can occur when creating a bidder
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum BidderError {
    /// The bidder references a region its world does not have
    #[error("unknown region {0}")]
    UnknownRegion(RegionId),
    /// A discount outside of [0, 1]
    #[error("discount {0} is outside of [0, 1]")]
    DiscountOutOfRange(Decimal),
    /// A region of interest listed more than once
    #[error("region {0} is listed more than once")]
    DuplicateRegion(RegionId),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Band, BandId, Breakpoint, GenericGood, Region, RegionsMap};
    use rust_decimal_macros::dec;

    // A line of three regions, a single linear band of two licenses
    fn world() -> Arc<World> {
        let regions = (0..3).map(|id| Region {
            id: RegionId(id),
            name: format!("region {id}"),
            population: 100,
        });
        let map = RegionsMap::new(
            regions,
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
        Arc::new(World::new(map, [band]).unwrap())
    }

    fn linear() -> SvFunction {
        SvFunction::new(vec![
            Breakpoint {
                capacity: dec!(0),
                value: dec!(0),
            },
            Breakpoint {
                capacity: dec!(20),
                value: dec!(100),
            },
        ])
        .unwrap()
    }

    fn good(region: u32) -> GenericGood {
        GenericGood {
            region: RegionId(region),
            band: BandId(0),
        }
    }

    fn all_regions() -> impl Iterator<Item = (RegionId, SvFunction)> {
        (0..3).map(|r| (RegionId(r), linear()))
    }

    #[test]
    fn test_regional_value() {
        let bidder = Bidder::new(
            BidderId(1),
            world(),
            BidderKind::Regional {
                home: RegionId(0),
                distance_discounts: vec![dec!(1), dec!(0.5)],
            },
            all_regions(),
        )
        .unwrap();

        let bundle = [(good(0), 1), (good(1), 2), (good(2), 2)]
            .into_iter()
            .collect::<Bundle>();

        // 50 at home, 0.5 * 100 next door, nothing two hops away
        assert_eq!(bidder.value(&bundle), dec!(100));
        assert_eq!(bidder.gamma(RegionId(2), &bundle), dec!(0));
        assert_eq!(bidder.max_undiscounted_value(), dec!(300));
    }

    #[test]
    fn test_national_value() {
        let bidder = Bidder::new(
            BidderId(1),
            world(),
            BidderKind::National {
                uncovered_discounts: vec![dec!(1), dec!(0.4)],
            },
            all_regions(),
        )
        .unwrap();

        let full = [(good(0), 2), (good(1), 2), (good(2), 2)]
            .into_iter()
            .collect::<Bundle>();
        let one_missing = [(good(0), 2), (good(1), 2)]
            .into_iter()
            .collect::<Bundle>();
        let two_missing = [(good(0), 2)].into_iter().collect::<Bundle>();

        assert_eq!(bidder.value(&full), dec!(300));
        assert_eq!(bidder.value(&one_missing), dec!(80));
        assert_eq!(bidder.value(&two_missing), dec!(0));
        assert_eq!(bidder.value(&Bundle::empty()), dec!(0));
    }

    #[test]
    fn test_local_value() {
        let bidder = Bidder::new(
            BidderId(1),
            world(),
            BidderKind::Local {
                regions_of_interest: vec![RegionId(2)],
            },
            all_regions(),
        )
        .unwrap();

        let bundle = [(good(0), 2), (good(2), 1)].into_iter().collect::<Bundle>();
        assert_eq!(bidder.value(&bundle), dec!(50));
    }

    #[test]
    fn test_validation() {
        assert_eq!(
            Bidder::new(
                BidderId(1),
                world(),
                BidderKind::Local {
                    regions_of_interest: vec![RegionId(5)],
                },
                all_regions(),
            )
            .unwrap_err(),
            BidderError::UnknownRegion(RegionId(5))
        );
        assert_eq!(
            Bidder::new(
                BidderId(1),
                world(),
                BidderKind::National {
                    uncovered_discounts: vec![dec!(1.5)],
                },
                all_regions(),
            )
            .unwrap_err(),
            BidderError::DiscountOutOfRange(dec!(1.5))
        );
        assert_eq!(
            Bidder::new(
                BidderId(1),
                world(),
                BidderKind::Local {
                    regions_of_interest: vec![RegionId(0), RegionId(2), RegionId(0)],
                },
                all_regions(),
            )
            .unwrap_err(),
            BidderError::DuplicateRegion(RegionId(0))
        );
    }
}
