//! Background task advancing every event's read-by counter.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::errors::AppError;
use crate::state::{Action, SharedState};

/// Largest step a single tick can add to a counter.
pub const MAX_STEP: u32 = 10;

/// One random step in `1..=MAX_STEP` per event.
pub fn random_steps(rng: &mut impl Rng, count: usize) -> Vec<u32> {
    (0..count).map(|_| rng.gen_range(1..=MAX_STEP)).collect()
}

/// Apply a single tick: draw steps for the current events and persist.
pub async fn tick(shared: &SharedState) -> Result<i64, AppError> {
    let dispatched = shared
        .dispatch_with(|team| {
            let count = team.document().events.data.len();
            Action::TickReadBy(random_steps(&mut rand::thread_rng(), count))
        })
        .await?;
    Ok(dispatched.revision_id)
}

/// Run [`tick`] every `period` until the runtime shuts down.
pub fn spawn(shared: Arc<SharedState>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // the first tick completes immediately
        interval.tick().await;

        loop {
            interval.tick().await;
            match tick(&shared).await {
                Ok(revision_id) => {
                    tracing::debug!("Read-by tick stored as revision {}", revision_id)
                }
                Err(e) => tracing::warn!("Read-by tick failed: {}", e),
            }
        }
    })
}
