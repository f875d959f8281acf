use crate::{ConfigurationError, float};
use mrvm_core::models::{Bidder, ScalingSettings};
use rust_decimal::Decimal;
use std::sync::Arc;

/// The largest value any of the bidders can possibly have.
pub(crate) fn biggest_unscaled_value(bidders: &[Arc<Bidder>]) -> Decimal {
    bidders
        .iter()
        .map(|bidder| bidder.max_undiscounted_value())
        .max()
        .unwrap_or_default()
}

/// The factor every value in the program is divided by.
///
/// It is one as long as the largest possible value stays below the safe
/// ceiling `max_value - safety_gap`; otherwise values are scaled down so that
/// the largest one lands exactly on the ceiling.
///
/// Fails if the settings leave no positive, finite ceiling.
pub fn scaling_factor(
    bidders: &[Arc<Bidder>],
    settings: &ScalingSettings,
) -> Result<f64, ConfigurationError> {
    let ceiling = settings.ceiling();
    if !(ceiling.is_finite() && ceiling > 0.0) {
        return Err(ConfigurationError::InvalidScaling {
            max_value: settings.max_value,
            safety_gap: settings.safety_gap,
        });
    }

    let biggest = float(biggest_unscaled_value(bidders));
    if biggest < ceiling {
        Ok(1.0)
    } else {
        Ok(biggest / ceiling)
    }
}
