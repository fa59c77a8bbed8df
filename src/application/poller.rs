//! Toggleable polling loop.
//!
//! The poller is either idle or polling. While polling, a schedule task fires
//! once per period and each tick spawns an independent fetch. Fetches may
//! overlap; whichever one resolves last owns `data`.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::domain::{self, DashboardState, PollConfig, Timestamp};

pub struct Poller<Fetcher> {
    fetcher: Arc<Fetcher>,
    resource: Arc<str>,
    period: Duration,
    timer: Option<JoinHandle<()>>,
    state: Arc<watch::Sender<DashboardState>>,
}

impl<Fetcher> Poller<Fetcher>
where
    Fetcher: domain::Fetcher + Send + Sync + 'static,
{
    /// Idle poller with no data.
    pub fn new(fetcher: Fetcher, config: PollConfig) -> Self {
        let PollConfig { resource, period } = config;
        let (state, _) = watch::channel(DashboardState::default());

        Self {
            fetcher: Arc::new(fetcher),
            resource: resource.into(),
            period,
            timer: None,
            state: Arc::new(state),
        }
    }

    /// Poller that is already polling. The first fetch happens one period
    /// from now.
    pub fn start(fetcher: Fetcher, config: PollConfig) -> Self {
        let mut poller = Self::new(fetcher, config);
        poller.toggle();
        poller
    }

    pub fn is_active(&self) -> bool {
        self.timer.is_some()
    }

    pub fn state(&self) -> DashboardState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.state.subscribe()
    }

    /// Switches between idle and polling and returns the new `active` value.
    ///
    /// Switching off stops future ticks only. Fetches already issued still
    /// complete and still replace `data`.
    pub fn toggle(&mut self) -> bool {
        match self.timer.take() {
            Some(timer) => {
                timer.abort();
                info!("polling stopped.");
            }
            None => {
                self.timer = Some(self.spawn_schedule());
                info!(
                    "polling '{}' every {} ms.",
                    self.resource,
                    self.period.as_millis()
                );
            }
        }

        let active = self.is_active();
        self.state.send_modify(|x| x.active = active);
        active
    }

    /// Issues one fetch without waiting for it.
    ///
    /// The handle resolves to whether `data` was replaced. Errors never reach
    /// the caller; they are logged and `data` is left as it was.
    pub fn fetch_once(&self) -> JoinHandle<bool> {
        let fetcher = self.fetcher.clone();
        let resource = self.resource.clone();
        let state = self.state.clone();
        tokio::spawn(async move { refresh(&*fetcher, &resource, &state).await })
    }

    fn spawn_schedule(&self) -> JoinHandle<()> {
        let fetcher = self.fetcher.clone();
        let resource = self.resource.clone();
        let state = self.state.clone();
        let period = self.period;

        tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            let mut ticks: u64 = 0;
            loop {
                let _ = interval.tick().await;
                ticks += 1;
                debug!("tick #{ticks}");

                let fetcher = fetcher.clone();
                let resource = resource.clone();
                let state = state.clone();
                tokio::spawn(async move { refresh(&*fetcher, &resource, &state).await });
            }
        })
    }
}

impl<Fetcher> Drop for Poller<Fetcher> {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

async fn refresh<Fetcher: domain::Fetcher>(
    fetcher: &Fetcher,
    resource: &str,
    state: &watch::Sender<DashboardState>,
) -> bool {
    match fetcher.fetch(resource).await {
        Ok(records) => {
            info!("[{resource}]: fetched {} records.", records.len());
            let now = Timestamp::now();
            state.send_modify(|x| {
                x.data = records;
                x.last_updated = Some(now);
            });
            true
        }
        Err(why) => {
            warn!("[{resource}]: {why}");
            false
        }
    }
}
