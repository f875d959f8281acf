use crate::{ModelError, MrvmMip};
use mrvm_core::{
    models::{BidderId, Map},
    ports::MipSolver,
};
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{Level, event};

/// The total value of every marginal economy: for each bidder, the welfare of
/// the optimal allocation among all the *other* bidders.
///
/// Each marginal economy is an independent program, composed here and then
/// solved on its own blocking worker. A bidder that is alone in the economy
/// leaves nothing behind, so its marginal economy is worth zero.
pub async fn marginal_economies<S>(
    model: &MrvmMip,
    solver: Arc<S>,
) -> Result<Map<BidderId, Decimal>, ModelError>
where
    S: MipSolver + Send + Sync + 'static,
{
    let mut welfare = model
        .bidders()
        .iter()
        .map(|bidder| (bidder.id(), Decimal::ZERO))
        .collect::<Map<_, _>>();
    if model.bidders().len() < 2 {
        return Ok(welfare);
    }

    let mut workers = JoinSet::new();
    for bidder in model.bidders() {
        let id = bidder.id();
        let marginal = model.without(id)?;
        let solver = solver.clone();
        workers.spawn_blocking(move || {
            marginal
                .allocation(solver.as_ref())
                .map(|allocation| (id, allocation.total_value()))
        });
    }

    while let Some(result) = workers.join_next().await {
        let (id, value) = result??;
        event!(Level::DEBUG, bidder = %id, %value, "solved marginal economy");
        welfare.insert(id, value);
    }

    Ok(welfare)
}
