use super::{BandId, Bundle, Map, RegionId};
use rust_decimal::Decimal;
use std::collections::VecDeque;

/// A geographic region in which licenses are sold.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Region {
    /// The identifier of the region, unique within a world
    pub id: RegionId,
    /// A human-readable name
    pub name: String,
    /// The population of the region
    pub population: u64,
}

/// The regions of a world, their adjacency, and the hop distance between
/// every pair of connected regions.
///
/// Distances are computed once, upon construction, by a breadth-first search
/// from every region. A pair of regions without a path between them has no
/// distance at all (see [`RegionsMap::distance`]).
#[derive(Clone, Debug, PartialEq)]
pub struct RegionsMap {
    regions: Map<RegionId, Region>,
    adjacencies: Vec<(RegionId, RegionId)>,
    distances: Map<RegionId, Map<RegionId, u32>>,
}

impl RegionsMap {
    /// Creates the map from its regions and undirected adjacencies.
    pub fn new(
        regions: impl IntoIterator<Item = Region>,
        adjacencies: impl IntoIterator<Item = (RegionId, RegionId)>,
    ) -> Result<Self, WorldError> {
        let mut map = Map::default();
        for region in regions {
            if map.contains_key(&region.id) {
                return Err(WorldError::DuplicateRegion(region.id));
            }
            map.insert(region.id, region);
        }
        if map.is_empty() {
            return Err(WorldError::NoRegions);
        }

        let adjacencies = adjacencies.into_iter().collect::<Vec<_>>();
        let mut neighbors: Map<RegionId, Vec<RegionId>> =
            map.keys().map(|id| (*id, Vec::new())).collect();
        for &(a, b) in adjacencies.iter() {
            for id in [a, b] {
                if !map.contains_key(&id) {
                    return Err(WorldError::UnknownRegion(id));
                }
            }
            if a != b {
                neighbors[&a].push(b);
                neighbors[&b].push(a);
            }
        }

        let distances = map
            .keys()
            .map(|&from| (from, Self::bfs(from, &neighbors)))
            .collect();

        Ok(Self {
            regions: map,
            adjacencies,
            distances,
        })
    }

    fn bfs(from: RegionId, neighbors: &Map<RegionId, Vec<RegionId>>) -> Map<RegionId, u32> {
        let mut distances = Map::default();
        distances.insert(from, 0);
        let mut queue = VecDeque::from([from]);
        while let Some(current) = queue.pop_front() {
            let next = distances[&current] + 1;
            for neighbor in neighbors[&current].iter() {
                if !distances.contains_key(neighbor) {
                    distances.insert(*neighbor, next);
                    queue.push_back(*neighbor);
                }
            }
        }
        distances
    }

    /// Iterate over the regions in their canonical order
    pub fn regions(&self) -> impl Iterator<Item = &Region> {
        self.regions.values()
    }

    /// Look up a region by its id
    pub fn region(&self, id: RegionId) -> Option<&Region> {
        self.regions.get(&id)
    }

    /// Whether the region is part of this map
    pub fn contains(&self, id: RegionId) -> bool {
        self.regions.contains_key(&id)
    }

    /// The number of regions
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Always false, since a map requires at least one region
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// The undirected adjacencies the map was built from
    pub fn adjacencies(&self) -> &[(RegionId, RegionId)] {
        &self.adjacencies
    }

    /// The number of hops on a shortest path between two regions, or `None`
    /// if the regions are disconnected (or unknown).
    pub fn distance(&self, from: RegionId, to: RegionId) -> Option<u32> {
        self.distances.get(&from)?.get(&to).copied()
    }

    /// The largest finite distance from `from` to any other region.
    pub fn longest_shortest_path(&self, from: RegionId) -> u32 {
        self.distances
            .get(&from)
            .and_then(|distances| distances.values().max().copied())
            .unwrap_or_default()
    }
}

/// A band of spectrum, sold as a number of identical licenses in every region.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Band {
    /// The identifier of the band, unique within a world
    pub id: BandId,
    /// A human-readable name
    pub name: String,
    /// How many licenses of this band are available in each region
    pub licenses: u32,
    /// The capacity a single license provides
    pub base_capacity: Decimal,
    /// `synergies[q - 1]` is the synergy factor for holding `q` licenses;
    /// quantities without an entry have a factor of one.
    #[cfg_attr(feature = "serde", serde(default))]
    pub synergies: Vec<Decimal>,
}

impl Band {
    /// The synergy factor for holding `quantity` licenses of this band in one region
    pub fn synergy(&self, quantity: u32) -> Decimal {
        match quantity {
            0 => Decimal::ONE,
            q => self
                .synergies
                .get(q as usize - 1)
                .copied()
                .unwrap_or(Decimal::ONE),
        }
    }

    /// The capacity provided by `quantity` licenses of this band in one region
    pub fn capacity(&self, quantity: u32) -> Decimal {
        self.base_capacity * Decimal::from(quantity) * self.synergy(quantity)
    }

    /// A band is linear if its capacity is proportional to the number of licenses
    pub fn is_linear(&self) -> bool {
        self.synergies.iter().all(|s| *s == Decimal::ONE)
    }
}

/// A generic good: "some licenses of `band` in `region`". Licenses of the
/// same generic good are interchangeable.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenericGood {
    /// The region of the licenses
    pub region: RegionId,
    /// The band of the licenses
    pub band: BandId,
}

impl std::fmt::Display for GenericGood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "r{}b{}", self.region, self.band)
    }
}

/// The immutable description of an auction's world.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "WorldDto", into = "WorldDto")
)]
pub struct World {
    regions_map: RegionsMap,
    bands: Map<BandId, Band>,
}

impl World {
    /// Creates a world, validating every band.
    pub fn new(
        regions_map: RegionsMap,
        bands: impl IntoIterator<Item = Band>,
    ) -> Result<Self, WorldError> {
        let mut map = Map::default();
        for band in bands {
            if map.contains_key(&band.id) {
                return Err(WorldError::DuplicateBand(band.id));
            }
            if band.licenses == 0 {
                return Err(WorldError::NoLicenses(band.id));
            }
            if band.base_capacity <= Decimal::ZERO {
                return Err(WorldError::NonPositiveCapacity(band.id));
            }
            if band.synergies.iter().any(|s| s.is_sign_negative()) {
                return Err(WorldError::NegativeSynergy(band.id));
            }
            if band.synergies.len() > band.licenses as usize {
                return Err(WorldError::TooManySynergies(band.id));
            }
            // Past the last synergy factor the capacity grows linearly
            let last = band.licenses.min(band.synergies.len() as u32 + 1);
            if (1..=last).any(|q| band.capacity(q) < band.capacity(q - 1)) {
                return Err(WorldError::DecreasingCapacity(band.id));
            }
            map.insert(band.id, band);
        }
        if map.is_empty() {
            return Err(WorldError::NoBands);
        }
        Ok(Self {
            regions_map,
            bands: map,
        })
    }

    /// The regions and their distances
    pub fn regions_map(&self) -> &RegionsMap {
        &self.regions_map
    }

    /// Iterate over the regions in their canonical order
    pub fn regions(&self) -> impl Iterator<Item = &Region> {
        self.regions_map.regions()
    }

    /// Iterate over the bands in their canonical order
    pub fn bands(&self) -> impl Iterator<Item = &Band> {
        self.bands.values()
    }

    /// Look up a band by its id
    pub fn band(&self, id: BandId) -> Option<&Band> {
        self.bands.get(&id)
    }

    /// Every generic good of the world, region-major
    pub fn goods(&self) -> impl Iterator<Item = GenericGood> + '_ {
        self.regions().flat_map(move |region| {
            let region = region.id;
            self.bands
                .keys()
                .map(move |&band| GenericGood { region, band })
        })
    }

    /// Whether the good exists in this world
    pub fn contains(&self, good: GenericGood) -> bool {
        self.regions_map.contains(good.region) && self.bands.contains_key(&good.band)
    }

    /// The number of licenses available for a generic good
    pub fn capacity(&self, good: GenericGood) -> Option<u32> {
        if self.regions_map.contains(good.region) {
            self.bands.get(&good.band).map(|band| band.licenses)
        } else {
            None
        }
    }

    /// The total capacity a bundle provides in one region
    pub fn regional_capacity(&self, region: RegionId, bundle: &Bundle) -> Decimal {
        self.bands()
            .map(|band| {
                band.capacity(bundle.quantity(GenericGood {
                    region,
                    band: band.id,
                }))
            })
            .sum()
    }

    /// The capacity provided by holding every license of a region
    pub fn max_regional_capacity(&self, region: RegionId) -> Decimal {
        if !self.regions_map.contains(region) {
            return Decimal::ZERO;
        }
        self.bands().map(|band| band.capacity(band.licenses)).sum()
    }

    /// The bundle containing every license of the world
    pub fn full_bundle(&self) -> Bundle {
        self.goods()
            .map(|good| (good, self.bands[&good.band].licenses))
            .collect()
    }
}

/// DTO to ensure that we always validate when we deserialize a world
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug)]
pub struct WorldDto {
    /// The regions of the world
    pub regions: Vec<Region>,
    /// Undirected adjacencies between regions
    #[cfg_attr(feature = "serde", serde(default))]
    pub adjacencies: Vec<(RegionId, RegionId)>,
    /// The bands of the world
    pub bands: Vec<Band>,
}

impl TryFrom<WorldDto> for World {
    type Error = WorldError;

    fn try_from(value: WorldDto) -> Result<Self, Self::Error> {
        let regions_map = RegionsMap::new(value.regions, value.adjacencies)?;
        World::new(regions_map, value.bands)
    }
}

impl From<World> for WorldDto {
    fn from(value: World) -> Self {
        let World { regions_map, bands } = value;
        let RegionsMap {
            regions,
            adjacencies,
            ..
        } = regions_map;
        Self {
            regions: regions.into_iter().map(|(_, region)| region).collect(),
            adjacencies,
            bands: bands.into_iter().map(|(_, band)| band).collect(),
        }
    }
}

/// Errors that can occur when constructing a world
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum WorldError {
    /// A world needs at least one region
    #[error("no regions provided")]
    NoRegions,
    /// A world needs at least one band
    #[error("no bands provided")]
    NoBands,
    /// Two regions share an id
    #[error("duplicate region {0}")]
    DuplicateRegion(RegionId),
    /// An adjacency references a region that does not exist
    #[error("unknown region {0}")]
    UnknownRegion(RegionId),
    /// Two bands share an id
    #[error("duplicate band {0}")]
    DuplicateBand(BandId),
    /// A band without licenses
    #[error("band {0} has no licenses")]
    NoLicenses(BandId),
    /// A band whose licenses provide no capacity
    #[error("band {0} has a non-positive base capacity")]
    NonPositiveCapacity(BandId),
    /// A band with a negative synergy factor
    #[error("band {0} has a negative synergy")]
    NegativeSynergy(BandId),
    /// A band defines synergies for more licenses than it has
    #[error("band {0} defines synergies beyond its number of licenses")]
    TooManySynergies(BandId),
    /// A band whose capacity shrinks when more of its licenses are held
    #[error("band {0} loses capacity as licenses are added")]
    DecreasingCapacity(BandId),
}
