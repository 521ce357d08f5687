use crate::model::flat::FlatTask;
use crate::ops::flatten::descendant_ids;

/// One of the three drop targets around a rendered task row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropZone {
    Above,
    Child,
    Below,
}

impl DropZone {
    pub fn as_str(self) -> &'static str {
        match self {
            DropZone::Above => "above",
            DropZone::Child => "child",
            DropZone::Below => "below",
        }
    }

    pub fn from_str(s: &str) -> Option<DropZone> {
        match s {
            "above" => Some(DropZone::Above),
            "child" => Some(DropZone::Child),
            "below" => Some(DropZone::Below),
            _ => None,
        }
    }
}

/// A decoded drop zone: which task the pointer is over and on which side.
/// Constructed once at the UI boundary so the resolver never parses strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropTarget {
    pub task_id: String,
    pub zone: DropZone,
}

impl DropTarget {
    pub fn new(task_id: impl Into<String>, zone: DropZone) -> DropTarget {
        DropTarget {
            task_id: task_id.into(),
            zone,
        }
    }

    /// Decode a droppable element id of the form `task-<id>-<zone>`.
    pub fn parse(zone_id: &str) -> Option<DropTarget> {
        let rest = zone_id.strip_prefix("task-")?;
        let (task_id, zone) = rest.rsplit_once('-')?;
        if task_id.is_empty() {
            return None;
        }
        Some(DropTarget::new(task_id, DropZone::from_str(zone)?))
    }

    /// The droppable element id this target renders as.
    pub fn zone_id(&self) -> String {
        format!("task-{}-{}", self.task_id, self.zone.as_str())
    }
}

/// Why a gesture was dropped on the floor. All of these are expected
/// user-gesture noise: logged, never surfaced, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("task not found: {0}")]
    UnknownTask(String),
    #[error("no parent available at level {0}")]
    NoParentAtLevel(usize),
    #[error("drop target is the dragged task itself")]
    SelfDrop,
    #[error("cannot nest a task under its own descendant")]
    DropOnDescendant,
    #[error("position unchanged")]
    NoChange,
    #[error("another reorder is still in flight")]
    ReorderInFlight,
}

/// The single mutation a resolved gesture boils down to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderIntent {
    pub task_id: String,
    pub new_display_order: i32,
    pub new_parent_id: Option<String>,
}

/// Resolve a promote/demote to `new_level` for `task_id`.
///
/// Walks backward from the task's position looking for the nearest preceding
/// entry at `new_level - 1`; that entry becomes the parent. The walk stops
/// early once it passes an entry at a shallower level; beyond that point no
/// valid parent context exists and the change is rejected. Level 0 clears
/// the parent unconditionally.
pub fn resolve_level_change(
    flat: &[FlatTask<'_>],
    task_id: &str,
    new_level: usize,
) -> Result<Option<String>, Rejection> {
    let index = flat
        .iter()
        .position(|t| t.id() == task_id)
        .ok_or_else(|| Rejection::UnknownTask(task_id.to_string()))?;

    if new_level == 0 {
        return Ok(None);
    }

    for candidate in flat[..index].iter().rev() {
        if candidate.level == new_level - 1 {
            return Ok(Some(candidate.id().to_string()));
        }
        if candidate.level < new_level - 1 {
            break;
        }
    }
    Err(Rejection::NoParentAtLevel(new_level - 1))
}

/// Resolve what dropping `active_id` on `target` means: the new parent and
/// the `display_order` slot among the new siblings.
pub fn resolve_drop_target(
    flat: &[FlatTask<'_>],
    active_id: &str,
    target: &DropTarget,
) -> Result<ReorderIntent, Rejection> {
    let target_task = flat
        .iter()
        .find(|t| t.id() == target.task_id)
        .ok_or_else(|| Rejection::UnknownTask(target.task_id.clone()))?;
    flat.iter()
        .find(|t| t.id() == active_id)
        .ok_or_else(|| Rejection::UnknownTask(active_id.to_string()))?;

    let intent = match target.zone {
        DropZone::Above => {
            let new_parent = target_task.parent_id;
            // Target's current siblings, without the task being moved.
            let mut siblings: Vec<&FlatTask<'_>> = flat
                .iter()
                .filter(|t| t.parent_id == new_parent && t.id() != active_id)
                .collect();
            siblings.sort_by_key(|t| t.display_order());

            let target_index = siblings.iter().position(|t| t.id() == target.task_id);
            let new_display_order = match target_index {
                // Target leads its sibling group: slot in just before it.
                None | Some(0) => (target_task.display_order() - 1).max(0),
                Some(i) => siblings[i - 1].display_order() + 1,
            };
            ReorderIntent {
                task_id: active_id.to_string(),
                new_display_order,
                new_parent_id: new_parent.map(str::to_string),
            }
        }
        DropZone::Child => {
            let max_child_order = flat
                .iter()
                .filter(|t| t.parent_id == Some(target.task_id.as_str()))
                .map(|t| t.display_order())
                .max();
            ReorderIntent {
                task_id: active_id.to_string(),
                new_display_order: max_child_order.map_or(0, |o| o + 1),
                new_parent_id: Some(target.task_id.clone()),
            }
        }
        DropZone::Below => ReorderIntent {
            task_id: active_id.to_string(),
            new_display_order: target_task.display_order() + 1,
            new_parent_id: target_task.parent_id.map(str::to_string),
        },
    };
    Ok(intent)
}

/// Reject self-drops and child-drops that would make a task its own
/// ancestor. Descendants come from the full flattened tree, never the
/// visible slice.
pub fn ensure_no_cycle(
    flat: &[FlatTask<'_>],
    active_id: &str,
    target: &DropTarget,
) -> Result<(), Rejection> {
    if active_id == target.task_id {
        return Err(Rejection::SelfDrop);
    }
    if target.zone == DropZone::Child
        && descendant_ids(flat, active_id)
            .iter()
            .any(|d| d == &target.task_id)
    {
        return Err(Rejection::DropOnDescendant);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::flat::ExpansionState;
    use crate::model::task::Task;
    use crate::ops::flatten::flatten;

    fn t(id: &str, order: i32) -> Task {
        let mut task = Task::new(id, format!("task {id}"));
        task.display_order = order;
        task
    }

    fn with_child(mut parent: Task, mut child: Task) -> Task {
        child.parent_task_id = Some(parent.id.clone());
        parent.sub_tasks.push(child);
        parent
    }

    /// A(0)[B(0), C(1)[D(0)]], E(1), F(2)
    fn sample_forest() -> Vec<Task> {
        let c = with_child(t("C", 1), t("D", 0));
        let a = with_child(with_child(t("A", 0), t("B", 0)), c);
        vec![a, t("E", 1), t("F", 2)]
    }

    // --- drop zone codec ---

    #[test]
    fn test_parse_zone_id() {
        assert_eq!(
            DropTarget::parse("task-42-above"),
            Some(DropTarget::new("42", DropZone::Above))
        );
        assert_eq!(
            DropTarget::parse("task-7-child"),
            Some(DropTarget::new("7", DropZone::Child))
        );
        assert_eq!(DropTarget::parse("task-7-sideways"), None);
        assert_eq!(DropTarget::parse("note-7-above"), None);
        assert_eq!(DropTarget::parse("task--below"), None);
    }

    #[test]
    fn test_zone_id_round_trip() {
        let target = DropTarget::new("13", DropZone::Below);
        assert_eq!(DropTarget::parse(&target.zone_id()), Some(target));
    }

    // --- level changes ---

    #[test]
    fn test_level_change_to_root_clears_parent() {
        let forest = sample_forest();
        let flat = flatten(&forest, &ExpansionState::new());
        assert_eq!(resolve_level_change(&flat, "D", 0), Ok(None));
    }

    #[test]
    fn test_level_change_finds_nearest_preceding_parent() {
        let forest = sample_forest();
        let flat = flatten(&forest, &ExpansionState::new());
        // B to level 1: nearest preceding level-0 entry is A.
        assert_eq!(
            resolve_level_change(&flat, "B", 1),
            Ok(Some("A".to_string()))
        );
        // D to level 2 keeps C as parent.
        assert_eq!(
            resolve_level_change(&flat, "D", 2),
            Ok(Some("C".to_string()))
        );
    }

    #[test]
    fn test_level_change_rejects_orphaned_promotion() {
        let forest = sample_forest();
        let flat = flatten(&forest, &ExpansionState::new());
        assert_eq!(
            resolve_level_change(&flat, "D", 5),
            Err(Rejection::NoParentAtLevel(4))
        );
    }

    #[test]
    fn test_level_change_stops_at_shallower_entry() {
        let forest = sample_forest();
        let flat = flatten(&forest, &ExpansionState::new());
        // F is preceded by E (level 0); demoting F to level 2 would need a
        // level-1 parent, but the walk hits level 0 first and gives up.
        assert_eq!(
            resolve_level_change(&flat, "F", 2),
            Err(Rejection::NoParentAtLevel(1))
        );
    }

    #[test]
    fn test_level_change_unknown_task() {
        let forest = sample_forest();
        let flat = flatten(&forest, &ExpansionState::new());
        assert_eq!(
            resolve_level_change(&flat, "nope", 1),
            Err(Rejection::UnknownTask("nope".to_string()))
        );
    }

    // --- drop targets ---

    #[test]
    fn test_drop_above_first_sibling() {
        let forest = sample_forest();
        let flat = flatten(&forest, &ExpansionState::new());
        // E dropped above B (first child of A).
        let intent =
            resolve_drop_target(&flat, "E", &DropTarget::new("B", DropZone::Above)).unwrap();
        assert_eq!(intent.new_parent_id, Some("A".to_string()));
        // First sibling: max(0, 0 - 1) = 0.
        assert_eq!(intent.new_display_order, 0);
    }

    #[test]
    fn test_drop_above_later_sibling_lands_after_previous() {
        let forest = sample_forest();
        let flat = flatten(&forest, &ExpansionState::new());
        // E dropped above C: previous sibling is B(order 0) -> order 1.
        let intent =
            resolve_drop_target(&flat, "E", &DropTarget::new("C", DropZone::Above)).unwrap();
        assert_eq!(intent.new_parent_id, Some("A".to_string()));
        assert_eq!(intent.new_display_order, 1);
    }

    #[test]
    fn test_drop_above_excludes_the_active_task_from_siblings() {
        let forest = sample_forest();
        let flat = flatten(&forest, &ExpansionState::new());
        // B dropped above C: with B excluded, C leads the group, so the
        // slot is max(0, C.order - 1) = 0.
        let intent =
            resolve_drop_target(&flat, "B", &DropTarget::new("C", DropZone::Above)).unwrap();
        assert_eq!(intent.new_display_order, 0);
    }

    #[test]
    fn test_drop_as_child_appends_after_existing_children() {
        let forest = sample_forest();
        let flat = flatten(&forest, &ExpansionState::new());
        let intent =
            resolve_drop_target(&flat, "E", &DropTarget::new("A", DropZone::Child)).unwrap();
        assert_eq!(intent.new_parent_id, Some("A".to_string()));
        // Children B(0), C(1) -> next slot is 2.
        assert_eq!(intent.new_display_order, 2);
    }

    #[test]
    fn test_drop_as_child_of_leaf_starts_at_zero() {
        let forest = sample_forest();
        let flat = flatten(&forest, &ExpansionState::new());
        let intent =
            resolve_drop_target(&flat, "E", &DropTarget::new("D", DropZone::Child)).unwrap();
        assert_eq!(intent.new_parent_id, Some("D".to_string()));
        assert_eq!(intent.new_display_order, 0);
    }

    #[test]
    fn test_drop_below_takes_target_order_plus_one() {
        let forest = sample_forest();
        let flat = flatten(&forest, &ExpansionState::new());
        let intent =
            resolve_drop_target(&flat, "E", &DropTarget::new("B", DropZone::Below)).unwrap();
        assert_eq!(intent.new_parent_id, Some("A".to_string()));
        assert_eq!(intent.new_display_order, 1);
    }

    #[test]
    fn test_drop_on_unknown_target_is_rejected() {
        let forest = sample_forest();
        let flat = flatten(&forest, &ExpansionState::new());
        assert_eq!(
            resolve_drop_target(&flat, "E", &DropTarget::new("zz", DropZone::Below)),
            Err(Rejection::UnknownTask("zz".to_string()))
        );
    }

    // --- cycle guard ---

    #[test]
    fn test_cycle_guard_rejects_self_drop() {
        let forest = sample_forest();
        let flat = flatten(&forest, &ExpansionState::new());
        assert_eq!(
            ensure_no_cycle(&flat, "A", &DropTarget::new("A", DropZone::Child)),
            Err(Rejection::SelfDrop)
        );
    }

    #[test]
    fn test_cycle_guard_rejects_descendants_at_any_depth() {
        let forest = sample_forest();
        let flat = flatten(&forest, &ExpansionState::new());
        for descendant in ["B", "C", "D"] {
            assert_eq!(
                ensure_no_cycle(&flat, "A", &DropTarget::new(descendant, DropZone::Child)),
                Err(Rejection::DropOnDescendant),
                "A as child of {descendant}"
            );
        }
    }

    #[test]
    fn test_cycle_guard_allows_above_and_below_on_descendants() {
        // The guard only blocks the child zone. An above/below drop inside
        // one's own subtree still resolves; the local apply degrades it to a
        // root placement and the store rejects it as circular.
        let forest = sample_forest();
        let flat = flatten(&forest, &ExpansionState::new());
        assert_eq!(
            ensure_no_cycle(&flat, "A", &DropTarget::new("B", DropZone::Above)),
            Ok(())
        );
        assert_eq!(
            ensure_no_cycle(&flat, "A", &DropTarget::new("D", DropZone::Below)),
            Ok(())
        );
    }
}
