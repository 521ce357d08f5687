//! Debounced persistence of grid layout changes.
//!
//! Drag-resize libraries report layout on every pointer move; persisting
//! each one would hammer the store. The scheduler holds the latest snapshot
//! until the grid has been quiet for the debounce window, then writes only
//! the entries that actually differ from the last saved baseline.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::layout::mapper;
use crate::model::layout::LayoutEntry;
use crate::store::StoreError;

pub const DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug)]
enum State {
    Idle,
    Pending { due: Instant, layout: Vec<LayoutEntry> },
}

#[derive(Debug)]
pub struct LayoutScheduler {
    last_saved: Option<Vec<LayoutEntry>>,
    state: State,
    debounce: Duration,
}

impl Default for LayoutScheduler {
    fn default() -> LayoutScheduler {
        LayoutScheduler::new()
    }
}

impl LayoutScheduler {
    pub fn new() -> LayoutScheduler {
        LayoutScheduler::with_debounce(DEBOUNCE)
    }

    pub fn with_debounce(debounce: Duration) -> LayoutScheduler {
        LayoutScheduler {
            last_saved: None,
            state: State::Idle,
            debounce,
        }
    }

    /// Adopt `layout` as the saved baseline without persisting it. Used
    /// after a fresh load, when the store is already the source of truth.
    pub fn set_baseline(&mut self, layout: Vec<LayoutEntry>) {
        self.last_saved = Some(layout);
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, State::Pending { .. })
    }

    pub fn due(&self, now: Instant) -> bool {
        matches!(&self.state, State::Pending { due, .. } if *due <= now)
    }

    /// Offer a layout snapshot. A newer snapshot always replaces a pending
    /// one, restarting the quiet window. Snapshots that cannot represent a
    /// user move are absorbed into the baseline instead:
    /// the first snapshot ever seen, and any whose item set size differs
    /// from the baseline (items were added or removed, not dragged).
    pub fn schedule_save(&mut self, layout: Vec<LayoutEntry>, now: Instant) {
        self.state = State::Idle;

        let Some(known) = &self.last_saved else {
            debug!(items = layout.len(), "adopting first layout snapshot");
            self.last_saved = Some(layout);
            return;
        };
        if known.len() != layout.len() {
            debug!(
                known = known.len(),
                incoming = layout.len(),
                "item count changed, re-baselining layout"
            );
            self.last_saved = Some(layout);
            return;
        }
        if !mapper::has_position_change(&layout, known) {
            return;
        }

        self.state = State::Pending {
            due: now + self.debounce,
            layout,
        };
    }

    /// Drop any pending save. Owners call this on teardown.
    pub fn cancel(&mut self) {
        self.state = State::Idle;
    }

    /// Persist a due pending layout through `persist`, one entry at a time
    /// in list order. The diff is recomputed against the baseline at commit
    /// time, so a snapshot superseded back to the baseline writes nothing.
    /// The baseline advances to the committed snapshot whether or not every
    /// entry persisted, so a failed entry is not retried forever.
    pub fn commit_due<F>(&mut self, now: Instant, mut persist: F) -> Vec<(String, StoreError)>
    where
        F: FnMut(&LayoutEntry) -> Result<(), StoreError>,
    {
        if !self.due(now) {
            return Vec::new();
        }
        let State::Pending { layout, .. } = std::mem::replace(&mut self.state, State::Idle) else {
            return Vec::new();
        };

        let changed = match &self.last_saved {
            Some(known) => mapper::changed_entries(&layout, known),
            None => layout.clone(),
        };

        let mut failures = Vec::new();
        for entry in &changed {
            if let Err(err) = persist(entry) {
                warn!(widget = %entry.id, %err, "failed to save widget layout");
                failures.push((entry.id.clone(), err));
            }
        }
        debug!(
            saved = changed.len() - failures.len(),
            failed = failures.len(),
            "layout save committed"
        );
        self.last_saved = Some(layout);
        failures
    }
}
