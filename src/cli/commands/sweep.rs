use std::sync::Arc;

use crate::config::Config;
use crate::scheduler::Scheduler;
use crate::state::SharedState;

/// Runs the reminder and retention jobs once from the CLI, mostly useful
/// when the daemon's scheduler is disabled and an external cron drives it.
pub async fn cmd_sweep(config: &Config) -> anyhow::Result<()> {
    let scheduler_config = config.scheduler.clone();
    let state = Arc::new(SharedState::new(config.clone()).await?);

    let scheduler = Scheduler::new(state, scheduler_config);
    scheduler.run_once().await?;

    println!("✓ Sweep complete.");
    Ok(())
}
