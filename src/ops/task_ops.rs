//! Local, optimistic edits to the task forest.
//!
//! These mirror what the persistence service will do on its side, so the UI
//! can show the result immediately and let the next hierarchy fetch converge.
//! None of them touch the network.

use chrono::Utc;

use crate::model::task::Task;

/// Flat filter over the forest, matching the list widget's search box.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskFilter<'a> {
    pub widget_id: Option<&'a str>,
    pub category: Option<&'a str>,
    pub completed: Option<bool>,
    pub search: Option<&'a str>,
}

/// Find a task anywhere in the forest.
pub fn find_task<'a>(tasks: &'a [Task], id: &str) -> Option<&'a Task> {
    for task in tasks {
        if task.id == id {
            return Some(task);
        }
        if let Some(found) = find_task(&task.sub_tasks, id) {
            return Some(found);
        }
    }
    None
}

/// Find a task anywhere in the forest, mutably.
pub fn find_task_mut<'a>(tasks: &'a mut [Task], id: &str) -> Option<&'a mut Task> {
    for task in tasks.iter_mut() {
        if task.id == id {
            return Some(task);
        }
        if let Some(found) = find_task_mut(&mut task.sub_tasks, id) {
            return Some(found);
        }
    }
    None
}

/// Remove a task (with its whole subtree) from wherever it hangs.
pub fn extract_task(tasks: &mut Vec<Task>, id: &str) -> Option<Task> {
    if let Some(idx) = tasks.iter().position(|t| t.id == id) {
        return Some(tasks.remove(idx));
    }
    for task in tasks.iter_mut() {
        if let Some(found) = extract_task(&mut task.sub_tasks, id) {
            return Some(found);
        }
    }
    None
}

/// Re-sort every sibling group by `display_order`, recursively.
pub fn sort_by_display_order(tasks: &mut [Task]) {
    tasks.sort_by_key(|t| t.display_order);
    for task in tasks.iter_mut() {
        sort_by_display_order(&mut task.sub_tasks);
    }
}

/// Reparent and reposition a task locally. The node is pulled out with its
/// subtree, its order and parent link updated, and reinserted. A parent that
/// cannot be found after extraction (deleted concurrently, or sitting inside
/// the moved subtree) degrades to a root placement with the parent link
/// cleared, so the forest invariant holds.
///
/// Returns false if the task does not exist.
pub fn apply_reorder(
    roots: &mut Vec<Task>,
    task_id: &str,
    new_display_order: i32,
    new_parent_id: Option<&str>,
) -> bool {
    let Some(mut node) = extract_task(roots, task_id) else {
        return false;
    };
    node.display_order = new_display_order;
    node.updated_at = Utc::now();

    let resolved_parent = new_parent_id.filter(|pid| find_task(roots, pid).is_some());
    node.parent_task_id = resolved_parent.map(str::to_string);

    match resolved_parent {
        Some(pid) => {
            // Checked present just above.
            if let Some(parent) = find_task_mut(roots, pid) {
                parent.sub_tasks.push(node);
            }
        }
        None => roots.push(node),
    }
    sort_by_display_order(roots);
    true
}

/// Flip a task's completion flag. Returns false if the task does not exist.
pub fn toggle_completed(roots: &mut [Task], id: &str) -> bool {
    match find_task_mut(roots, id) {
        Some(task) => {
            task.completed = !task.completed;
            task.updated_at = Utc::now();
            true
        }
        None => false,
    }
}

/// Remove a task; its descendants go with it (the store cascades the same
/// way). Returns the removed subtree.
pub fn remove_task(roots: &mut Vec<Task>, id: &str) -> Option<Task> {
    extract_task(roots, id)
}

/// Insert a new task, or replace the fields of an existing one in place.
/// Replacement keeps the children already hanging under the task; a wire
/// update for one node must not orphan its subtree.
pub fn upsert_task(roots: &mut Vec<Task>, task: Task) {
    if let Some(existing) = find_task_mut(roots, &task.id) {
        let children = std::mem::take(&mut existing.sub_tasks);
        *existing = task;
        existing.sub_tasks = children;
        return;
    }
    match task
        .parent_task_id
        .as_deref()
        .and_then(|pid| find_task_mut(roots, pid))
    {
        Some(parent) => {
            parent.sub_tasks.push(task);
            sort_by_display_order(&mut parent.sub_tasks);
        }
        None => {
            roots.push(task);
            roots.sort_by_key(|t| t.display_order);
        }
    }
}

/// All tasks in pre-order, ignoring visibility.
pub fn all_tasks(roots: &[Task]) -> Vec<&Task> {
    let mut out = Vec::new();
    fn walk<'a>(tasks: &'a [Task], out: &mut Vec<&'a Task>) {
        for task in tasks {
            out.push(task);
            walk(&task.sub_tasks, out);
        }
    }
    walk(roots, &mut out);
    out
}

/// Filter the flattened forest, most recently updated first.
pub fn filter_tasks<'a>(roots: &'a [Task], filter: &TaskFilter<'_>) -> Vec<&'a Task> {
    let mut items: Vec<&Task> = all_tasks(roots)
        .into_iter()
        .filter(|t| {
            if let Some(widget_id) = filter.widget_id
                && t.widget_id.as_deref() != Some(widget_id)
            {
                return false;
            }
            if let Some(category) = filter.category
                && t.category != category
            {
                return false;
            }
            if let Some(completed) = filter.completed
                && t.completed != completed
            {
                return false;
            }
            if let Some(search) = filter.search {
                let needle = search.to_lowercase();
                let hit = t.text.to_lowercase().contains(&needle)
                    || t.category.to_lowercase().contains(&needle)
                    || t.description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle));
                if !hit {
                    return false;
                }
            }
            true
        })
        .collect();
    items.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    items
}

/// The next free `display_order` slot at the root level.
pub fn next_root_display_order(roots: &[Task]) -> i32 {
    roots
        .iter()
        .map(|t| t.display_order)
        .max()
        .map_or(0, |max| max + 1)
}
