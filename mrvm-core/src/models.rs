mod allocation;
mod bidder;
mod bundle;
mod config;
mod map;
mod mip;
mod sv;
mod world;

pub use allocation::{Allocation, BidderAllocation, MetaInfo};
pub use bidder::{Bidder, BidderError, BidderKind};
pub use bundle::{Bundle, BundleEntry};
pub use config::{ModelSettings, ScalingSettings, SolveParams};
pub use map::Map;
pub use mip::{CompareType, Constraint, Mip, MipSolution, SolveStatus, VarId, VarType, Variable};
pub use sv::{Breakpoint, SvFunction, SvFunctionError};
pub use world::{Band, GenericGood, Region, RegionsMap, World, WorldDto, WorldError};

macro_rules! id_wrapper {
    ($struct:ident, $inner:ty) => {
        #[doc = concat!("An integer identifier newtype for a ", stringify!($struct), ".")]
        #[derive(Debug, Hash, PartialEq, Eq, Clone, Copy, PartialOrd, Ord)]
        #[cfg_attr(
            feature = "serde",
            derive(serde::Serialize, serde::Deserialize),
            serde(transparent)
        )]
        #[repr(transparent)]
        pub struct $struct(pub $inner);

        impl From<$inner> for $struct {
            fn from(value: $inner) -> Self {
                Self(value)
            }
        }

        impl std::fmt::Display for $struct {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

id_wrapper!(BidderId, u64);
id_wrapper!(RegionId, u32);
id_wrapper!(BandId, u32);
