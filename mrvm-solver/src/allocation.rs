use crate::{MrvmMip, SolutionInconsistency, float};
use mrvm_core::models::{Allocation, BidderAllocation, Bundle, MetaInfo, MipSolution};
use tracing::{Level, event};

/// Quantities further than this from an integer are rejected
const INTEGRALITY_TOLERANCE: f64 = 1e-5;

/// The largest accepted gap between the program's value and the true valuation
const VALUE_TOLERANCE: f64 = 1e-3;

/// Decode a solution of `model` into an allocation.
///
/// Every bidder's bundle is read off its quantity variables; its value in the
/// program is unscaled and compared with the bidder's valuation of that
/// bundle. Bidders that receive nothing are left out.
pub(crate) fn extract(
    model: &MrvmMip,
    solution: &MipSolution,
) -> Result<Allocation, SolutionInconsistency> {
    let world_mip = model.world_partial_mip();
    let scaling_factor = model.scaling_factor();
    let mut winners = Vec::with_capacity(model.bidders().len());

    for bidder in model.bidders() {
        let id = bidder.id();

        let mut bundle = Bundle::empty();
        for (good, x) in world_mip.x_variables(id) {
            let value = solution.value(x);
            let quantity = value.round();
            if (value - quantity).abs() > INTEGRALITY_TOLERANCE || quantity < 0.0 {
                let err = SolutionInconsistency::FractionalQuantity {
                    bidder: id,
                    good,
                    value,
                };
                event!(Level::ERROR, error = %err);
                return Err(err);
            }
            bundle.add(good, quantity as u32);
        }

        let actual = world_mip
            .value_variable(id)
            .map(|v| solution.value(v))
            .unwrap_or_default()
            * scaling_factor;
        let expected = bidder.value(&bundle);
        if (actual - float(expected)).abs() > VALUE_TOLERANCE {
            let err = SolutionInconsistency::ValueMismatch {
                bidder: id,
                expected,
                actual,
            };
            event!(Level::ERROR, error = %err);
            return Err(err);
        }

        winners.push((
            id,
            BidderAllocation {
                bundle,
                value: expected,
            },
        ));
    }

    Ok(Allocation::new(
        winners,
        MetaInfo {
            number_of_mips: 1,
            mip_solve_time: solution.solve_time(),
            status: solution.status(),
        },
    ))
}
