use super::{BidderId, Bundle, GenericGood, Map, SolveStatus};
use rust_decimal::Decimal;
use std::time::Duration;

/// What a single winning bidder receives
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BidderAllocation {
    /// The licenses allocated to the bidder (never empty)
    pub bundle: Bundle,
    /// The bidder's true value of the bundle
    pub value: Decimal,
}

/// Bookkeeping about how an allocation was computed
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetaInfo {
    /// How many programs were solved to compute the allocation
    pub number_of_mips: u32,
    /// The total time spent in the solver
    #[cfg_attr(feature = "serde", serde(with = "humantime_serde"))]
    pub mip_solve_time: Duration,
    /// How the (last) solve terminated
    pub status: SolveStatus,
}

/// The result of winner determination: the winning bidders and their bundles.
///
/// Bidders that receive nothing do not participate in the allocation; asking
/// for their bundle yields the empty bundle.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Allocation {
    winners: Map<BidderId, BidderAllocation>,
    meta: MetaInfo,
}

impl Allocation {
    /// Creates an allocation, discarding any bidder with an empty bundle
    pub fn new(
        winners: impl IntoIterator<Item = (BidderId, BidderAllocation)>,
        meta: MetaInfo,
    ) -> Self {
        Self {
            winners: winners
                .into_iter()
                .filter(|(_, allocation)| !allocation.bundle.is_empty())
                .collect(),
            meta,
        }
    }

    /// The allocation of a winning bidder
    pub fn get(&self, bidder: BidderId) -> Option<&BidderAllocation> {
        self.winners.get(&bidder)
    }

    /// Whether the bidder receives anything at all
    pub fn is_winner(&self, bidder: BidderId) -> bool {
        self.winners.contains_key(&bidder)
    }

    /// The bundle allocated to a bidder (empty for non-winners)
    pub fn bundle_of(&self, bidder: BidderId) -> Bundle {
        self.get(bidder)
            .map(|allocation| allocation.bundle.clone())
            .unwrap_or_default()
    }

    /// Iterate over the winners and what they receive
    pub fn winners(&self) -> impl Iterator<Item = (BidderId, &BidderAllocation)> {
        self.winners.iter().map(|(id, allocation)| (*id, allocation))
    }

    /// The number of winners
    pub fn len(&self) -> usize {
        self.winners.len()
    }

    /// Whether nobody receives anything
    pub fn is_empty(&self) -> bool {
        self.winners.is_empty()
    }

    /// The social welfare of the allocation
    pub fn total_value(&self) -> Decimal {
        self.winners.values().map(|allocation| allocation.value).sum()
    }

    /// The number of licenses of `good` handed out across all winners
    pub fn allocated_quantity(&self, good: GenericGood) -> u32 {
        self.winners
            .values()
            .map(|allocation| allocation.bundle.quantity(good))
            .sum()
    }

    /// How the allocation was computed
    pub fn meta(&self) -> &MetaInfo {
        &self.meta
    }
}
