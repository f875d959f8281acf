use super::{BidderPartialMip, ValueLinker};
use crate::{WorldPartialMip, float};
use mrvm_core::models::{CompareType, Constraint, Mip, Variable};
use rust_decimal::Decimal;

/// `v_b = d_k Σ_r ω_{b,r}`, with `k` the number of regions the bundle leaves
/// uncovered.
///
/// The discount depends on the bundle, so the product of the discount and the
/// omega sum is linearized:
/// - a binary `cov_r` per region is one exactly if the bidder holds a license
///   in `r`,
/// - a one-hot selector `u_k` (`k = 0..=R`) encodes the number of uncovered
///   regions `R - Σ_r cov_r`,
/// - big-M product terms `W_k` equal `Σ_r ω_{b,r}` if `u_k` is set and zero
///   otherwise, so that `v_b = Σ_k d_k W_k`.
#[derive(Clone, Debug)]
pub struct NationalLinker {
    uncovered_discounts: Vec<Decimal>,
}

impl NationalLinker {
    /// A linker for a bidder with the given discounts per number of uncovered regions
    pub fn new(uncovered_discounts: Vec<Decimal>) -> Self {
        Self {
            uncovered_discounts,
        }
    }

    /// The discount applied when `uncovered` regions hold no license
    pub fn discount(&self, uncovered: usize) -> Decimal {
        self.uncovered_discounts
            .get(uncovered)
            .copied()
            .unwrap_or_default()
    }
}

impl ValueLinker for NationalLinker {
    fn link(&self, partial: &BidderPartialMip, world: &WorldPartialMip, mip: &mut Mip) {
        let id = partial.bidder().id();
        let Some(v) = world.value_variable(id) else {
            return;
        };
        let big_m = world.biggest_possible_value();
        let regions = world.world().regions().map(|r| r.id).collect::<Vec<_>>();
        let total_licenses = world
            .world()
            .bands()
            .map(|band| band.licenses as f64)
            .sum::<f64>();

        // Coverage: cov_r <= Σ_band x_{r,band} <= (Σ_band licenses) cov_r
        let mut uncovered = Constraint::new(
            format!("uncovered_{id}"),
            CompareType::Eq,
            regions.len() as f64,
        );
        for &region in &regions {
            let cov = mip.add_variable(Variable::binary(format!("cov_{id}_{region}")));
            uncovered.add_term(1.0, cov);

            let mut lower =
                Constraint::new(format!("cov_lo_{id}_{region}"), CompareType::Leq, 0.0)
                    .with_term(1.0, cov);
            let mut upper =
                Constraint::new(format!("cov_hi_{id}_{region}"), CompareType::Leq, 0.0)
                    .with_term(-total_licenses, cov);
            for (good, x) in world.x_variables(id) {
                if good.region == region {
                    lower.add_term(-1.0, x);
                    upper.add_term(1.0, x);
                }
            }
            mip.add_constraint(lower);
            mip.add_constraint(upper);
        }

        let omegas = regions
            .iter()
            .filter_map(|&region| world.omega_variable(id, region))
            .collect::<Vec<_>>();

        let mut one_hot = Constraint::new(format!("one_hot_{id}"), CompareType::Eq, 1.0);
        let mut value =
            Constraint::new(format!("value_{id}"), CompareType::Eq, 0.0).with_term(1.0, v);

        for k in 0..=regions.len() {
            let u = mip.add_variable(Variable::binary(format!("u_{id}_{k}")));
            one_hot.add_term(1.0, u);
            uncovered.add_term(k as f64, u);

            let product = mip.add_variable(Variable::continuous(
                format!("W_{id}_{k}"),
                0.0,
                big_m,
            ));
            value.add_term(-float(self.discount(k)), product);

            // W_k <= M u_k
            mip.add_constraint(
                Constraint::new(format!("W_sel_{id}_{k}"), CompareType::Leq, 0.0)
                    .with_term(1.0, product)
                    .with_term(-big_m, u),
            );

            // W_k <= Σω and W_k >= Σω - M (1 - u_k)
            let mut below = Constraint::new(format!("W_ub_{id}_{k}"), CompareType::Leq, 0.0)
                .with_term(1.0, product);
            let mut above = Constraint::new(format!("W_lb_{id}_{k}"), CompareType::Geq, -big_m)
                .with_term(1.0, product)
                .with_term(-big_m, u);
            for &omega in &omegas {
                below.add_term(-1.0, omega);
                above.add_term(-1.0, omega);
            }
            mip.add_constraint(below);
            mip.add_constraint(above);
        }

        mip.add_constraint(uncovered);
        mip.add_constraint(one_hot);
        mip.add_constraint(value);
    }
}
