use indexmap::IndexMap;

use super::task::Task;

/// A task annotated with the derived fields the list view renders from:
/// nesting level, flattened parent link, and visibility under the current
/// expansion state. Ephemeral; recomputed from the forest on every render.
#[derive(Debug, Clone, Copy)]
pub struct FlatTask<'a> {
    pub task: &'a Task,
    /// Recursion depth from the implicit root; root tasks are level 0.
    pub level: usize,
    /// Parent id as seen by the flattener (agrees with `parent_task_id`).
    pub parent_id: Option<&'a str>,
    /// True iff every ancestor on the path is expanded.
    pub is_visible: bool,
}

impl FlatTask<'_> {
    pub fn id(&self) -> &str {
        &self.task.id
    }

    pub fn display_order(&self) -> i32 {
        self.task.display_order
    }
}

/// Per-list expand/collapse state. Absent ids default to expanded, so a
/// freshly fetched hierarchy renders fully open. Never persisted remotely.
#[derive(Debug, Clone, Default)]
pub struct ExpansionState {
    expanded: IndexMap<String, bool>,
}

impl ExpansionState {
    pub fn new() -> ExpansionState {
        ExpansionState::default()
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.get(id).copied().unwrap_or(true)
    }

    pub fn toggle(&mut self, id: &str) {
        let next = !self.is_expanded(id);
        self.expanded.insert(id.to_string(), next);
    }

    pub fn set(&mut self, id: &str, expanded: bool) {
        self.expanded.insert(id.to_string(), expanded);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_ids_default_to_expanded() {
        let state = ExpansionState::new();
        assert!(state.is_expanded("anything"));
    }

    #[test]
    fn test_toggle_flips_from_default() {
        let mut state = ExpansionState::new();
        state.toggle("7");
        assert!(!state.is_expanded("7"));
        state.toggle("7");
        assert!(state.is_expanded("7"));
    }
}
