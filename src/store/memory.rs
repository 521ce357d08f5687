//! In-memory backend. Reference behavior for the store traits, the test
//! double for the engine, and a working store for offline use.

use indexmap::IndexMap;

use crate::model::layout::GridRect;
use crate::model::task::Task;
use crate::ops::task_ops;
use crate::store::{CreateTaskInput, LayoutStore, ReorderTaskInput, StoreError, TaskStore};

#[derive(Debug, Default)]
pub struct InMemoryStore {
    tasks: Vec<Task>,
    layouts: IndexMap<String, GridRect>,
    next_id: u64,
    fail_remote: bool,
    reorder_calls: usize,
    layout_calls: usize,
}

impl InMemoryStore {
    pub fn new() -> InMemoryStore {
        InMemoryStore::default()
    }

    pub fn seeded(tasks: Vec<Task>) -> InMemoryStore {
        InMemoryStore {
            tasks,
            ..InMemoryStore::default()
        }
    }

    /// Make every mutation fail with [`StoreError::Remote`]. For exercising
    /// failure paths.
    pub fn fail_remote(&mut self, fail: bool) {
        self.fail_remote = fail;
    }

    pub fn reorder_calls(&self) -> usize {
        self.reorder_calls
    }

    pub fn layout_calls(&self) -> usize {
        self.layout_calls
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn layouts(&self) -> &IndexMap<String, GridRect> {
        &self.layouts
    }

    fn check_remote(&self) -> Result<(), StoreError> {
        if self.fail_remote {
            Err(StoreError::Remote("simulated store failure".to_string()))
        } else {
            Ok(())
        }
    }

    fn next_id(&mut self) -> String {
        self.next_id += 1;
        self.next_id.to_string()
    }

    fn sibling_group_mut(&mut self, parent: Option<&str>) -> Option<&mut Vec<Task>> {
        match parent {
            None => Some(&mut self.tasks),
            Some(pid) => task_ops::find_task_mut(&mut self.tasks, pid).map(|p| &mut p.sub_tasks),
        }
    }

    /// Shift sibling display orders around a move, the way a database
    /// backend keeps orders dense. Same-parent moves shift the range
    /// between the old and new slots; cross-parent moves close the gap in
    /// the old group and open one in the new.
    fn adjust_display_orders(
        &mut self,
        old_parent: Option<&str>,
        new_parent: Option<&str>,
        old_order: i32,
        new_order: i32,
        moved_id: &str,
    ) {
        if old_parent == new_parent {
            let Some(group) = self.sibling_group_mut(old_parent) else {
                return;
            };
            for sibling in group.iter_mut().filter(|t| t.id != moved_id) {
                if old_order < new_order
                    && sibling.display_order > old_order
                    && sibling.display_order <= new_order
                {
                    sibling.display_order -= 1;
                } else if old_order > new_order
                    && sibling.display_order >= new_order
                    && sibling.display_order < old_order
                {
                    sibling.display_order += 1;
                }
            }
        } else {
            if let Some(group) = self.sibling_group_mut(old_parent) {
                for sibling in group.iter_mut().filter(|t| t.display_order > old_order) {
                    sibling.display_order -= 1;
                }
            }
            if let Some(group) = self.sibling_group_mut(new_parent) {
                for sibling in group
                    .iter_mut()
                    .filter(|t| t.id != moved_id && t.display_order >= new_order)
                {
                    sibling.display_order += 1;
                }
            }
        }
    }
}

impl TaskStore for InMemoryStore {
    fn create_task(&mut self, input: CreateTaskInput) -> Result<Task, StoreError> {
        self.check_remote()?;
        if let Some(pid) = &input.parent_task_id
            && task_ops::find_task(&self.tasks, pid).is_none()
        {
            return Err(StoreError::NotFound(pid.clone()));
        }

        let mut task = Task::new(self.next_id(), input.text);
        if let Some(category) = input.category {
            task.category = category;
        }
        task.widget_id = input.widget_id;
        task.parent_task_id = input.parent_task_id.clone();
        task.description = input.description;
        task.due_date = input.due_date;
        task.priority = input.priority.unwrap_or(0);
        task.display_order = match &input.parent_task_id {
            Some(pid) => task_ops::find_task(&self.tasks, pid)
                .map(|p| p.sub_tasks.iter().map(|c| c.display_order + 1).max())
                .unwrap_or(None)
                .unwrap_or(0),
            None => task_ops::next_root_display_order(&self.tasks),
        };

        task_ops::upsert_task(&mut self.tasks, task.clone());
        Ok(task)
    }

    fn toggle_task_completion(&mut self, task_id: &str) -> Result<Task, StoreError> {
        self.check_remote()?;
        if !task_ops::toggle_completed(&mut self.tasks, task_id) {
            return Err(StoreError::NotFound(task_id.to_string()));
        }
        task_ops::find_task(&self.tasks, task_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(task_id.to_string()))
    }

    fn delete_task(&mut self, task_id: &str) -> Result<(), StoreError> {
        self.check_remote()?;
        match task_ops::remove_task(&mut self.tasks, task_id) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound(task_id.to_string())),
        }
    }

    fn reorder_task(&mut self, input: ReorderTaskInput) -> Result<Task, StoreError> {
        self.check_remote()?;
        self.reorder_calls += 1;
        let (old_parent, old_order) = match task_ops::find_task(&self.tasks, &input.task_id) {
            Some(task) => {
                // Same validation the real backend applies before touching
                // any orders.
                if let Some(pid) = input.new_parent_task_id.as_deref() {
                    if task_ops::find_task(&self.tasks, pid).is_none() {
                        return Err(StoreError::NotFound(pid.to_string()));
                    }
                    if pid == input.task_id || task_ops::find_task(&task.sub_tasks, pid).is_some() {
                        return Err(StoreError::Remote(
                            "cannot move a task under its own descendant".to_string(),
                        ));
                    }
                }
                (task.parent_task_id.clone(), task.display_order)
            }
            None => return Err(StoreError::NotFound(input.task_id.clone())),
        };
        self.adjust_display_orders(
            old_parent.as_deref(),
            input.new_parent_task_id.as_deref(),
            old_order,
            input.new_display_order,
            &input.task_id,
        );
        if !task_ops::apply_reorder(
            &mut self.tasks,
            &input.task_id,
            input.new_display_order,
            input.new_parent_task_id.as_deref(),
        ) {
            return Err(StoreError::NotFound(input.task_id.clone()));
        }
        task_ops::find_task(&self.tasks, &input.task_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(input.task_id.clone()))
    }

    fn fetch_task_hierarchy(&mut self, widget_id: Option<&str>) -> Result<Vec<Task>, StoreError> {
        self.check_remote()?;
        let roots = match widget_id {
            Some(wid) => self
                .tasks
                .iter()
                .filter(|t| t.widget_id.as_deref() == Some(wid))
                .cloned()
                .collect(),
            None => self.tasks.clone(),
        };
        Ok(roots)
    }
}

impl LayoutStore for InMemoryStore {
    fn update_layout(&mut self, widget_id: &str, rect: GridRect) -> Result<(), StoreError> {
        self.check_remote()?;
        self.layout_calls += 1;
        self.layouts.insert(widget_id.to_string(), rect);
        Ok(())
    }
}
