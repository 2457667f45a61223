use std::{future::Future, time::Duration};

use tracing::{debug, info, warn};

/// Calls `on_tick` immediately and then once per `period` until `shutdown`
/// resolves. Returns the number of ticks run.
pub async fn run_every<S, F>(period: Duration, shutdown: S, mut on_tick: F) -> usize
where
    S: Future<Output = ()>,
    F: FnMut(),
{
    info!("refreshing every {:?}", period);

    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    tokio::pin!(shutdown);

    let mut ticks = 0;
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("refresh stopped after {} ticks", ticks);
                break;
            }
            _ = interval.tick() => {
                ticks += 1;
                debug!("tick {}", ticks);
                on_tick();
            }
        }
    }

    ticks
}

/// Resolves on Ctrl-C.
pub async fn ctrl_c() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("cannot listen for Ctrl-C: {}", err);
        std::future::pending::<()>().await;
    }
}
