use crate::model::flat::{ExpansionState, FlatTask};
use crate::model::task::Task;

/// Flatten a task forest into pre-order DFS sequence, annotating each node
/// with its depth, parent, and visibility under `expansion`.
///
/// Sibling order is emitted exactly as given; sorting by `display_order` is
/// the caller's job before flattening. The unfiltered sequence is what level
/// and descendant computations consume; use [`flatten_visible`] for display.
pub fn flatten<'a>(roots: &'a [Task], expansion: &ExpansionState) -> Vec<FlatTask<'a>> {
    let mut out = Vec::new();
    walk(roots, 0, None, true, expansion, &mut out);
    out
}

/// The visible slice of [`flatten`]: only entries whose ancestors are all
/// expanded.
pub fn flatten_visible<'a>(roots: &'a [Task], expansion: &ExpansionState) -> Vec<FlatTask<'a>> {
    flatten(roots, expansion)
        .into_iter()
        .filter(|t| t.is_visible)
        .collect()
}

fn walk<'a>(
    tasks: &'a [Task],
    level: usize,
    parent: Option<&'a Task>,
    ancestors_expanded: bool,
    expansion: &ExpansionState,
    out: &mut Vec<FlatTask<'a>>,
) {
    for task in tasks {
        out.push(FlatTask {
            task,
            level,
            parent_id: parent.map(|p| p.id.as_str()),
            is_visible: ancestors_expanded,
        });
        if !task.sub_tasks.is_empty() {
            let children_visible = ancestors_expanded && expansion.is_expanded(&task.id);
            walk(
                &task.sub_tasks,
                level + 1,
                Some(task),
                children_visible,
                expansion,
                out,
            );
        }
    }
}

/// Ids of every strict descendant of `id`, walking parent links over the
/// full (unfiltered) flattened view. Collapsed subtrees still count; cycle
/// checks must never depend on what happens to be on screen.
pub fn descendant_ids(flat: &[FlatTask<'_>], id: &str) -> Vec<String> {
    let mut out = Vec::new();
    collect_descendants(flat, id, &mut out);
    out
}

fn collect_descendants(flat: &[FlatTask<'_>], id: &str, out: &mut Vec<String>) {
    for child in flat.iter().filter(|t| t.parent_id == Some(id)) {
        out.push(child.id().to_string());
        collect_descendants(flat, child.id(), out);
    }
}
