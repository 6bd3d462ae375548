//! Background jobs: approval reminders and retention pruning.

use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::{Duration, interval};
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{debug, error, info, warn};

use crate::config::SchedulerConfig;
use crate::domain::events::NotificationEvent;
use crate::domain::permissions::LEAVES_APPROVE;
use crate::state::SharedState;

pub struct Scheduler {
    state: Arc<SharedState>,
    config: SchedulerConfig,
    running: Arc<RwLock<bool>>,
}

impl Scheduler {
    #[must_use]
    pub fn new(state: Arc<SharedState>, config: SchedulerConfig) -> Self {
        Self {
            state,
            config,
            running: Arc::new(RwLock::new(false)),
        }
    }

    pub async fn start(&self) -> Result<()> {
        if !self.config.enabled {
            info!("Scheduler is disabled in config");
            return Ok(());
        }

        *self.running.write().await = true;
        info!("Starting background scheduler");

        if let Some(cron_expr) = &self.config.cron_expression {
            self.run_with_cron(cron_expr).await
        } else {
            self.run_with_interval().await
        }
    }

    async fn run_with_cron(&self, cron_expr: &str) -> Result<()> {
        let mut sched = JobScheduler::new().await?;

        let state = Arc::clone(&self.state);
        let running = Arc::clone(&self.running);
        let leave_age_days = self.config.pending_leave_max_age_days;
        let review_days = self.config.review_overdue_days;

        let reminder_job = Job::new_async(cron_expr, move |_uuid, _lock| {
            let state = Arc::clone(&state);
            let running = Arc::clone(&running);
            Box::pin(async move {
                if !*running.read().await {
                    return;
                }
                if let Err(e) = remind_pending_leaves(Arc::clone(&state), leave_age_days).await {
                    error!("Scheduled leave reminder sweep failed: {}", e);
                }
                if let Err(e) = remind_overdue_reviews(state, review_days).await {
                    error!("Scheduled review reminder sweep failed: {}", e);
                }
            })
        })?;

        let prune_state = Arc::clone(&self.state);
        let prune_running = Arc::clone(&self.running);
        let audit_days = self.config.audit_retention_days;
        let notification_days = self.config.notification_retention_days;

        // Retention runs nightly regardless of the reminder cadence.
        let prune_job = Job::new_async("0 0 3 * * *", move |_uuid, _lock| {
            let state = Arc::clone(&prune_state);
            let running = Arc::clone(&prune_running);
            Box::pin(async move {
                if !*running.read().await {
                    return;
                }
                if let Err(e) = prune_old_records(state, audit_days, notification_days).await {
                    error!("Scheduled retention prune failed: {}", e);
                }
            })
        })?;

        sched.add(reminder_job).await?;
        sched.add(prune_job).await?;
        sched.start().await?;

        info!("Scheduler running with cron: {}", cron_expr);

        loop {
            if !*self.running.read().await {
                break;
            }
            tokio::time::sleep(Duration::from_secs(1)).await;
        }

        sched.shutdown().await?;
        Ok(())
    }

    async fn run_with_interval(&self) -> Result<()> {
        let interval_hours = self.config.reminder_interval_hours;

        info!("Scheduler running every {} hour(s)", interval_hours);

        let mut reminder_interval =
            interval(Duration::from_secs(u64::from(interval_hours) * 60 * 60));

        let mut prune_interval = interval(Duration::from_secs(24 * 60 * 60));

        loop {
            tokio::select! {
                _ = reminder_interval.tick() => {
                    if !*self.running.read().await {
                        break;
                    }
                    info!("Running reminder sweep...");
                    if let Err(e) = remind_pending_leaves(
                        Arc::clone(&self.state),
                        self.config.pending_leave_max_age_days,
                    )
                    .await
                    {
                        error!("Leave reminder sweep failed: {}", e);
                    }
                    if let Err(e) = remind_overdue_reviews(
                        Arc::clone(&self.state),
                        self.config.review_overdue_days,
                    )
                    .await
                    {
                        error!("Review reminder sweep failed: {}", e);
                    }
                }
                _ = prune_interval.tick() => {
                    if !*self.running.read().await {
                        break;
                    }
                    if let Err(e) = prune_old_records(
                        Arc::clone(&self.state),
                        self.config.audit_retention_days,
                        self.config.notification_retention_days,
                    )
                    .await
                    {
                        error!("Retention prune failed: {}", e);
                    }
                }
            }
        }

        Ok(())
    }

    pub async fn stop(&self) {
        info!("Stopping scheduler...");
        *self.running.write().await = false;
    }

    pub async fn is_running(&self) -> bool {
        *self.running.read().await
    }

    pub async fn run_once(&self) -> Result<()> {
        info!("Running manual sweep...");

        remind_pending_leaves(
            Arc::clone(&self.state),
            self.config.pending_leave_max_age_days,
        )
        .await?;

        remind_overdue_reviews(Arc::clone(&self.state), self.config.review_overdue_days).await?;

        prune_old_records(
            Arc::clone(&self.state),
            self.config.audit_retention_days,
            self.config.notification_retention_days,
        )
        .await?;

        Ok(())
    }
}

fn cutoff_days_ago(days: u32) -> String {
    (Utc::now() - chrono::Duration::days(i64::from(days))).to_rfc3339()
}

/// Nudges everyone who can approve leaves about requests that have sat
/// pending past the configured age.
async fn remind_pending_leaves(state: Arc<SharedState>, max_age_days: u32) -> Result<()> {
    let cutoff = cutoff_days_ago(max_age_days);
    let stale = state.store.list_pending_leave_requests_before(&cutoff).await?;

    if stale.is_empty() {
        debug!("No leave requests pending longer than {} day(s)", max_age_days);
        return Ok(());
    }

    info!(
        "Reminding approvers about {} stale leave request(s)",
        stale.len()
    );

    let mut notified = 0;
    for request in &stale {
        let message = format!(
            "Leave request #{} ({} to {}) has been waiting for more than {} day(s)",
            request.id, request.start_date, request.end_date, max_age_days
        );

        match state
            .notifier
            .notify_holders(
                LEAVES_APPROVE,
                "leave_reminder",
                &message,
                Some("leave_request"),
                Some(request.id),
            )
            .await
        {
            Ok(count) => notified += count as i32,
            Err(e) => warn!(
                "Failed to notify approvers about leave request {}: {}",
                request.id, e
            ),
        }
    }

    state.notifier.broadcast(NotificationEvent::ReminderRun {
        job: "pending_leaves".to_string(),
        notified,
    });

    Ok(())
}

/// Reminds employees about submitted reviews they still have not acknowledged.
async fn remind_overdue_reviews(state: Arc<SharedState>, overdue_days: u32) -> Result<()> {
    let cutoff = cutoff_days_ago(overdue_days);
    let overdue = state.store.list_submitted_reviews_before(&cutoff).await?;

    if overdue.is_empty() {
        debug!(
            "No reviews awaiting acknowledgement past {} day(s)",
            overdue_days
        );
        return Ok(());
    }

    info!("Nudging {} unacknowledged review(s)", overdue.len());

    let mut notified = 0;
    for review in &overdue {
        let message = format!(
            "Your {} performance review is still waiting for your acknowledgement",
            review.period
        );

        match state
            .notifier
            .notify_user(
                review.employee_id,
                "review_reminder",
                &message,
                Some("performance_review"),
                Some(review.id),
            )
            .await
        {
            Ok(()) => notified += 1,
            Err(e) => warn!(
                "Failed to remind employee {} about review {}: {}",
                review.employee_id, review.id, e
            ),
        }
    }

    state.notifier.broadcast(NotificationEvent::ReminderRun {
        job: "overdue_reviews".to_string(),
        notified,
    });

    Ok(())
}

/// Drops audit entries and read notifications past their retention windows.
async fn prune_old_records(
    state: Arc<SharedState>,
    audit_days: u32,
    notification_days: u32,
) -> Result<()> {
    let pruned = state
        .store
        .prune_audit_entries_before(&cutoff_days_ago(audit_days))
        .await?;
    if pruned > 0 {
        info!(
            "Pruned {} audit entries older than {} day(s)",
            pruned, audit_days
        );
    }

    let pruned = state
        .store
        .prune_read_notifications_before(&cutoff_days_ago(notification_days))
        .await?;
    if pruned > 0 {
        info!(
            "Pruned {} read notifications older than {} day(s)",
            pruned, notification_days
        );
    }

    Ok(())
}
