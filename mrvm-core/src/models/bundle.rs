use super::{GenericGood, Map, RegionId};

/// A multiset of generic goods, i.e. a quantity of licenses per generic good.
///
/// Entries with a quantity of zero are never stored, so two bundles holding
/// the same licenses compare equal regardless of how they were built.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "Vec<BundleEntry>", into = "Vec<BundleEntry>")
)]
pub struct Bundle(Map<GenericGood, u32>);

impl Bundle {
    /// The bundle without any licenses
    pub fn empty() -> Self {
        Self::default()
    }

    /// The number of licenses of `good` in this bundle
    pub fn quantity(&self, good: GenericGood) -> u32 {
        self.0.get(&good).copied().unwrap_or_default()
    }

    /// Adds `quantity` licenses of `good` to the bundle
    pub fn add(&mut self, good: GenericGood, quantity: u32) {
        if quantity > 0 {
            *self.0.entry(good).or_default() += quantity;
        }
    }

    /// Whether the bundle holds no licenses at all
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The number of distinct generic goods in the bundle
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The total number of licenses in the bundle
    pub fn total_quantity(&self) -> u32 {
        self.0.values().sum()
    }

    /// Whether the bundle holds at least one license in `region`
    pub fn covers(&self, region: RegionId) -> bool {
        self.0.keys().any(|good| good.region == region)
    }

    /// Iterate over the goods and their (non-zero) quantities
    pub fn iter(&self) -> impl Iterator<Item = (GenericGood, u32)> + '_ {
        self.0.iter().map(|(good, quantity)| (*good, *quantity))
    }
}

impl FromIterator<(GenericGood, u32)> for Bundle {
    fn from_iter<I: IntoIterator<Item = (GenericGood, u32)>>(iter: I) -> Self {
        let mut bundle = Self::default();
        for (good, quantity) in iter {
            bundle.add(good, quantity);
        }
        bundle
    }
}

/// A single entry of a bundle, used for (de)serialization
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BundleEntry {
    /// The generic good
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub good: GenericGood,
    /// How many licenses of the good
    pub quantity: u32,
}

impl From<Vec<BundleEntry>> for Bundle {
    fn from(value: Vec<BundleEntry>) -> Self {
        value
            .into_iter()
            .map(|entry| (entry.good, entry.quantity))
            .collect()
    }
}

impl From<Bundle> for Vec<BundleEntry> {
    fn from(value: Bundle) -> Self {
        value
            .iter()
            .map(|(good, quantity)| BundleEntry { good, quantity })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BandId;

    fn good(region: u32, band: u32) -> GenericGood {
        GenericGood {
            region: RegionId(region),
            band: BandId(band),
        }
    }

    #[test]
    fn test_zero_entries_are_dropped() {
        let bundle = [(good(0, 0), 0), (good(1, 0), 2), (good(1, 0), 1)]
            .into_iter()
            .collect::<Bundle>();

        assert_eq!(bundle.len(), 1);
        assert_eq!(bundle.quantity(good(1, 0)), 3);
        assert_eq!(bundle.quantity(good(0, 0)), 0);
        assert!(bundle.covers(RegionId(1)));
        assert!(!bundle.covers(RegionId(0)));
        assert!([(good(0, 0), 0)].into_iter().collect::<Bundle>().is_empty());
    }

    #[test]
    fn test_equality_ignores_order() {
        let a = [(good(0, 0), 1), (good(1, 1), 2)]
            .into_iter()
            .collect::<Bundle>();
        let b = [(good(1, 1), 2), (good(0, 0), 1)]
            .into_iter()
            .collect::<Bundle>();
        assert_eq!(a, b);
    }

    #[test]
    fn test_serialize_entries() {
        let bundle = [(good(2, 1), 3)].into_iter().collect::<Bundle>();
        let json = serde_json::to_value(&bundle).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{ "region": 2, "band": 1, "quantity": 3 }])
        );
        assert_eq!(serde_json::from_value::<Bundle>(json).unwrap(), bundle);
    }
}
