use tm_core::RefreshInterval;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

/// Repeating refresh timer.
///
/// The first tick fires one full period after creation. Changing the period
/// drops the pending deadline and restarts the countdown from the moment of
/// the change.
#[derive(Debug)]
pub struct RefreshScheduler {
    period: RefreshInterval,
    ticker: Interval,
}

impl RefreshScheduler {
    pub fn new(period: RefreshInterval) -> Self {
        Self {
            period,
            ticker: ticker(period),
        }
    }

    pub fn period(&self) -> RefreshInterval {
        self.period
    }

    /// Cancel the pending tick and reschedule with `period`.
    pub fn set_period(&mut self, period: RefreshInterval) {
        self.period = period;
        self.ticker = ticker(period);
        tracing::debug!("Refresh period set to {period}");
    }

    /// Wait for the next tick. Cancel-safe, so it can sit in `tokio::select!`.
    pub async fn tick(&mut self) -> Instant {
        self.ticker.tick().await
    }
}

fn ticker(period: RefreshInterval) -> Interval {
    let every = period.as_duration();
    let mut ticker = interval_at(Instant::now() + every, every);
    // A tick that overruns pushes the next one back instead of bursting.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}
