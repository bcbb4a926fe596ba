use std::time::Duration;

use crate::classify::{classify, EditCounts, Transaction};
use crate::dates::{today_key, Clock};
use crate::debounce::Debouncer;
use crate::error::Result;
use crate::filter::is_allowed;
use crate::persist::Storage;
use crate::render::Dashboard;
use crate::settings::Settings;
use crate::stats::Summary;
use crate::store::{Record, StatsStore};

/// Quiet periods for the three delayed effects of an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebouncePeriods {
    pub save: Duration,
    pub status: Duration,
    pub dashboard: Duration,
}

impl Default for DebouncePeriods {
    fn default() -> Self {
        DebouncePeriods {
            save: Duration::from_millis(2000),
            status: Duration::from_millis(300),
            dashboard: Duration::from_millis(1000),
        }
    }
}

/// Something the host should do (or that `tick` already did).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Stats and settings were written to storage.
    Persist,
    /// The status line should be redrawn.
    StatusRefresh,
    /// Open dashboards should be redrawn.
    DashboardRefresh,
}

/// Owns the stats, the settings and everything needed to keep them saved.
///
/// The host feeds it edit transactions and calls `tick` from its event
/// loop. Counters change synchronously inside `record`; only the saving
/// and redrawing wait for their quiet periods.
pub struct Tracker<S: Storage, C: Clock> {
    record: Record,
    storage: S,
    clock: C,
    save: Debouncer,
    status: Debouncer,
    dashboard: Debouncer,
}

impl<S: Storage, C: Clock> Tracker<S, C> {
    /// Loads the persisted record once, merged over the defaults.
    pub fn new(storage: S, clock: C, periods: DebouncePeriods) -> Result<Self> {
        let record = match storage.load()? {
            Some(value) => Record::from_value(&value),
            None => Record::default(),
        };
        log::debug!("loaded stats for {} days", record.days.len());

        Ok(Tracker {
            record,
            storage,
            clock,
            save: Debouncer::new(periods.save),
            status: Debouncer::new(periods.status),
            dashboard: Debouncer::new(periods.dashboard),
        })
    }

    pub fn store(&self) -> &StatsStore {
        &self.record.days
    }

    pub fn settings(&self) -> &Settings {
        &self.record.settings
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Counts one edit transaction against today.
    ///
    /// `path` is the active document, if any. Returns the words added, or
    /// `None` when the edit was ignored or contained no words.
    pub fn record(&mut self, path: Option<&str>, tx: &Transaction) -> Option<EditCounts> {
        if !tx.doc_changed {
            return None;
        }
        let path = path?;
        if !is_allowed(path, &self.record.settings) {
            log::debug!("ignoring edit to filtered path {}", path);
            return None;
        }

        let counts = classify(tx)?;
        let key = today_key(&self.clock);
        self.record.days.increment(&key, counts.typed, counts.pasted);

        let now = self.clock.instant();
        self.save.trigger(now);
        self.status.trigger(now);
        self.dashboard.trigger(now);

        Some(counts)
    }

    /// Runs whatever effects have finished their quiet period.
    ///
    /// Saving happens here; the returned list tells the host which views
    /// to redraw. A failed save stays pending and is retried later.
    pub fn tick(&mut self) -> Result<Vec<Effect>> {
        let now = self.clock.instant();
        let mut effects = Vec::new();

        if self.save.poll(now) {
            if let Err(e) = self.persist() {
                // Keep the save pending so the next quiet period retries it
                self.save.trigger(now);
                return Err(e);
            }
            effects.push(Effect::Persist);
        }
        if self.status.poll(now) {
            effects.push(Effect::StatusRefresh);
        }
        if self.dashboard.poll(now) {
            effects.push(Effect::DashboardRefresh);
        }

        Ok(effects)
    }

    pub fn has_pending(&self) -> bool {
        self.save.is_pending() || self.status.is_pending() || self.dashboard.is_pending()
    }

    /// Applies a settings edit, then saves and asks for redraws right away.
    /// An invalid value is rejected and nothing is saved.
    pub fn update_setting(&mut self, name: &str, value: &str) -> Result<Vec<Effect>> {
        let mut settings = self.record.settings.clone();
        settings.apply(name, value)?;
        self.record.settings = settings;

        // This save covers anything the pending debounces would have done
        self.save.cancel();
        self.status.cancel();
        self.dashboard.cancel();
        self.persist()?;

        Ok(vec![Effect::Persist, Effect::StatusRefresh, Effect::DashboardRefresh])
    }

    pub fn summary(&self) -> Summary {
        Summary::compute(&self.record.days, &self.clock, &self.record.settings)
    }

    pub fn dashboard(&self) -> Dashboard {
        Dashboard::compute(&self.record.days, &self.clock, &self.record.settings)
    }

    /// Final save, skipping any pending quiet period.
    ///
    /// Always writes, even when nothing is pending. Hands the storage back
    /// so the caller can inspect or reuse it.
    pub fn shutdown(mut self) -> Result<S> {
        self.save.cancel();
        self.status.cancel();
        self.dashboard.cancel();
        self.persist()?;
        log::debug!("final save done");
        Ok(self.storage)
    }

    fn persist(&mut self) -> Result<()> {
        self.storage.save(&self.record.to_value())
    }
}
