//! Stateful drag-and-drop interpreter for one task list.
//!
//! Consumes the discrete gesture events the pointer layer produces, resolves
//! them against the current flattened view, and turns at most one of them
//! into a persistence call. Time is passed in explicitly; the owner calls
//! [`DragList::tick`] from its event loop, so nothing here blocks or spawns.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::model::flat::{ExpansionState, FlatTask};
use crate::model::task::Task;
use crate::ops::flatten::{flatten, flatten_visible};
use crate::ops::resolve::{
    DropTarget, DropZone, Rejection, ReorderIntent, ensure_no_cycle, resolve_drop_target,
    resolve_level_change,
};
use crate::store::{ReorderTaskInput, StoreError, TaskStore};

/// Pause between a drop landing and the mutation going out, so a burst of
/// rapid pointer events coalesces into one call.
pub const SETTLE_DELAY: Duration = Duration::from_millis(100);

/// A user-facing error message produced by a settled persistence call.
/// Rejected gestures never produce one; they are logged and dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
}

#[derive(Debug)]
struct PendingReorder {
    due: Instant,
    intent: ReorderIntent,
}

/// Drag state for one rendered task list: the forest snapshot, expansion
/// state, the active gesture, and the single in-flight reorder slot.
#[derive(Debug)]
pub struct DragList {
    tasks: Vec<Task>,
    expansion: ExpansionState,
    active_task_id: Option<String>,
    active_over: Option<DropTarget>,
    pending: Option<PendingReorder>,
    is_reordering: bool,
    settle: Duration,
    notices: Vec<Notice>,
}

impl DragList {
    pub fn new(tasks: Vec<Task>) -> DragList {
        DragList {
            tasks,
            expansion: ExpansionState::new(),
            active_task_id: None,
            active_over: None,
            pending: None,
            is_reordering: false,
            settle: SETTLE_DELAY,
            notices: Vec::new(),
        }
    }

    /// Replace the forest after a hierarchy refetch. An active gesture keeps
    /// going against the new snapshot.
    pub fn set_tasks(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn tasks_mut(&mut self) -> &mut Vec<Task> {
        &mut self.tasks
    }

    pub fn expansion(&self) -> &ExpansionState {
        &self.expansion
    }

    pub fn drag_active(&self) -> bool {
        self.active_task_id.is_some()
    }

    pub fn is_reordering(&self) -> bool {
        self.is_reordering
    }

    /// The flattened, visibility-filtered rows the list renders.
    pub fn visible_tasks(&self) -> Vec<FlatTask<'_>> {
        flatten_visible(&self.tasks, &self.expansion)
    }

    /// Toggle a subtree open or closed. Ignored mid-drag: collapsing rows
    /// under the pointer would reshuffle the flattened view the gesture is
    /// being resolved against.
    pub fn toggle_expanded(&mut self, id: &str) {
        if self.drag_active() {
            debug!(task = id, "toggle suppressed during drag");
            return;
        }
        self.expansion.toggle(id);
    }

    /// Messages accumulated by settled persistence calls, draining them.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Which task would become the parent if the pointer dropped right now.
    /// Render-layer feedback only.
    pub fn potential_parent_id(&self) -> Option<String> {
        self.active_task_id.as_ref()?;
        let target = self.active_over.as_ref()?;
        match target.zone {
            DropZone::Child => Some(target.task_id.clone()),
            _ => {
                let flat = flatten(&self.tasks, &self.expansion);
                flat.iter()
                    .find(|t| t.id() == target.task_id)
                    .and_then(|t| t.parent_id.map(str::to_string))
            }
        }
    }

    // --- gesture events ---

    pub fn on_drag_start(&mut self, task_id: &str) {
        self.active_task_id = Some(task_id.to_string());
        self.active_over = None;
    }

    pub fn on_drag_over(&mut self, target: Option<DropTarget>) {
        if self.drag_active() {
            self.active_over = target;
        }
    }

    /// End the gesture. A valid drop schedules one reorder after the settle
    /// delay; everything else is dropped on the floor with a debug log.
    pub fn on_drag_end(&mut self, target: Option<DropTarget>, now: Instant) {
        let Some(active_id) = self.active_task_id.take() else {
            return;
        };
        self.active_over = None;

        let Some(target) = target else {
            debug!(task = %active_id, "drag ended with no drop target");
            return;
        };
        // Coarse self-drop guard: the droppable id embeds the task id, so a
        // textual hit means the pointer never left the dragged subtree's row.
        if target.zone_id().contains(active_id.as_str()) {
            debug!(task = %active_id, "dropped on own drop zone, ignoring");
            return;
        }

        let resolved = {
            let flat = flatten(&self.tasks, &self.expansion);
            Self::resolve_gesture(&flat, &active_id, &target)
        };
        match resolved {
            Ok(intent) => {
                if self.is_reordering {
                    debug!(task = %active_id, "reorder in flight, gesture dropped");
                    return;
                }
                // Last drop wins: supersede any still-settling gesture.
                self.pending = Some(PendingReorder {
                    due: now + self.settle,
                    intent,
                });
            }
            Err(rejection) => debug!(task = %active_id, %rejection, "drop rejected"),
        }
    }

    fn resolve_gesture(
        flat: &[FlatTask<'_>],
        active_id: &str,
        target: &DropTarget,
    ) -> Result<ReorderIntent, Rejection> {
        ensure_no_cycle(flat, active_id, target)?;
        let intent = resolve_drop_target(flat, active_id, target)?;

        // Checked present by resolve_drop_target.
        let current = flat
            .iter()
            .find(|t| t.id() == active_id)
            .ok_or_else(|| Rejection::UnknownTask(active_id.to_string()))?;
        let parent_changed = current.parent_id != intent.new_parent_id.as_deref();
        let order_changed = intent.new_display_order != current.display_order();
        if !parent_changed && !order_changed {
            return Err(Rejection::NoChange);
        }
        Ok(intent)
    }

    // --- dispatch ---

    /// Claim a settled reorder for dispatch. Marks the list in flight and
    /// applies the move locally (optimistic; a remote failure will not roll
    /// it back). Callers must pair this with [`DragList::finish_reorder`].
    pub fn begin_reorder(&mut self, now: Instant) -> Option<ReorderIntent> {
        if self.is_reordering {
            return None;
        }
        if self.pending.as_ref().is_none_or(|p| p.due > now) {
            return None;
        }
        let pending = self.pending.take()?;
        self.is_reordering = true;
        super::task_ops::apply_reorder(
            &mut self.tasks,
            &pending.intent.task_id,
            pending.intent.new_display_order,
            pending.intent.new_parent_id.as_deref(),
        );
        Some(pending.intent)
    }

    /// Settle the in-flight call. Always clears the in-flight flag; a
    /// failure becomes a notice, never a rollback.
    pub fn finish_reorder(&mut self, result: Result<Task, StoreError>) {
        self.is_reordering = false;
        match result {
            Ok(task) => debug!(task = %task.id, "reorder persisted"),
            Err(err) => {
                warn!(%err, "failed to reorder task");
                self.notices.push(Notice {
                    message: format!("Failed to reorder task: {err}"),
                });
            }
        }
    }

    /// Drive the settle timer: dispatch a due reorder through `store`.
    /// Call once per event-loop tick.
    pub fn tick(&mut self, now: Instant, store: &mut dyn TaskStore) {
        if let Some(intent) = self.begin_reorder(now) {
            let result = store.reorder_task(ReorderTaskInput {
                task_id: intent.task_id,
                new_display_order: intent.new_display_order,
                new_parent_task_id: intent.new_parent_id,
            });
            self.finish_reorder(result);
        }
    }

    /// Promote/demote a task to `new_level` via the level buttons. Resolves
    /// against the visible rows, keeps the task's visible index as its new
    /// display order, and dispatches immediately (no settle delay; button
    /// presses are already discrete).
    pub fn change_level(&mut self, store: &mut dyn TaskStore, task_id: &str, new_level: usize) {
        let resolved = {
            let flat = self.visible_tasks();
            let index = flat.iter().position(|t| t.id() == task_id);
            match index {
                Some(index) => {
                    resolve_level_change(&flat, task_id, new_level).map(|parent| (index, parent))
                }
                None => Err(Rejection::UnknownTask(task_id.to_string())),
            }
        };
        let (index, new_parent) = match resolved {
            Ok(ok) => ok,
            Err(rejection) => {
                debug!(task = task_id, new_level, %rejection, "level change rejected");
                return;
            }
        };

        debug!(task = task_id, new_level, parent = ?new_parent, "changing task level");
        super::task_ops::apply_reorder(
            &mut self.tasks,
            task_id,
            index as i32,
            new_parent.as_deref(),
        );
        let result = store.reorder_task(ReorderTaskInput {
            task_id: task_id.to_string(),
            new_display_order: index as i32,
            new_parent_task_id: new_parent,
        });
        if let Err(err) = result {
            warn!(%err, "failed to change task level");
            self.notices.push(Notice {
                message: format!("Failed to change task level: {err}"),
            });
        }
    }

    /// Drop any still-settling gesture. Owners call this on teardown so no
    /// persistence call races a view that no longer exists.
    pub fn cancel_pending(&mut self) {
        self.pending = None;
    }
}
