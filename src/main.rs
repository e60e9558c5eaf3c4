use dotenv::dotenv;
use goldwatch::WatchContext;
use tokio::time::{MissedTickBehavior, interval};

extern crate env_logger;
extern crate log;

use log::LevelFilter;

use log::{error, info};

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .init();

    let context = match WatchContext::new() {
        Ok(context) => context,
        Err(e) => {
            error!("could not build watch context: {e:#}");
            std::process::exit(1);
        }
    };

    info!(
        "schedule started: capturing {} every {} minutes, appending at {}",
        context.config.page_url,
        context.config.interval.as_secs() / 60,
        context.config.initial_range
    );

    // The first firing happens immediately, so the watcher captures once on
    // startup and then settles into the fixed period.
    let mut timer = interval(context.config.interval);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        timer.tick().await;
        let orchestrator = context.orchestrator.clone();
        // Each firing runs in its own task; a capture that outlives the
        // period leaves the next trigger to be dropped by the orchestrator
        // instead of queueing behind the lock.
        tokio::spawn(async move {
            let outcome = orchestrator.trigger().await;
            match serde_json::to_string(&outcome.into_envelope()) {
                Ok(body) => info!("tick outcome: {body}"),
                Err(e) => error!("could not encode tick outcome: {e}"),
            }
        });
    }
}
