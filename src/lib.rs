//! gridboard - Hierarchical task reordering and drag-layout reconciliation
//!
//! The engine behind a widget dashboard's task lists and grid: it flattens
//! task forests for rendering, interprets drag-and-drop gestures into at
//! most one reorder mutation, and debounces grid layout changes down to the
//! entries that actually moved. It owns no UI and no transport; a shell
//! feeds it gesture events and clock readings and hands it store
//! implementations to persist through.
//!
//! # Module Organization
//!
//! - `model`: tasks, flattened rows, expansion state, grid rects
//! - `ops`: flattening, drop resolution, the drag interpreter, local tree edits
//! - `layout`: grid placement mapping and the debounced save scheduler
//! - `store`: persistence traits and the in-memory backend

pub mod layout;
pub mod model;
pub mod ops;
pub mod store;

pub use layout::{GridItem, LayoutScheduler, PlacementDefaults};
pub use model::{ExpansionState, FlatTask, GridRect, LayoutEntry, Task};
pub use ops::{DragList, DropTarget, DropZone, Notice, Rejection, ReorderIntent};
pub use store::{
    CreateTaskInput, InMemoryStore, LayoutStore, ReorderTaskInput, StoreError, TaskStore,
};
