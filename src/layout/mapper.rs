//! Maps widget collections to grid layouts and decides when a grid change
//! is worth persisting.

use indexmap::IndexMap;

use crate::model::layout::{GridRect, LayoutEntry};

/// Anything placeable on the grid: an id plus an optional stored rect.
pub trait GridItem {
    fn grid_id(&self) -> &str;
    fn grid_rect(&self) -> Option<GridRect>;
}

/// Fallback placement for items with no saved or stored rect. Items flow
/// left to right, top to bottom across `columns`.
#[derive(Debug, Clone, Copy)]
pub struct PlacementDefaults {
    pub columns: i32,
    pub width: i32,
    pub height: i32,
}

impl PlacementDefaults {
    /// Tall narrow cards, three per row.
    pub fn notes() -> PlacementDefaults {
        PlacementDefaults {
            columns: 3,
            width: 1,
            height: 4,
        }
    }
}

/// Build the layout for `items`: a saved override wins, then the item's own
/// rect, then a deterministic slot from the item's position in the list.
pub fn to_layout<I: GridItem>(
    items: &[I],
    saved: &IndexMap<String, GridRect>,
    defaults: PlacementDefaults,
) -> Vec<LayoutEntry> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let id = item.grid_id();
            let rect = saved
                .get(id)
                .copied()
                .or_else(|| item.grid_rect())
                .unwrap_or(GridRect {
                    x: i as i32 % defaults.columns,
                    y: i as i32 / defaults.columns,
                    width: defaults.width,
                    height: defaults.height,
                });
            LayoutEntry::from_rect(id, rect)
        })
        .collect()
}

/// True when any incoming entry's position differs from what we last knew.
/// Only x and y count; width and height changes ride along but never
/// trigger a save on their own. An entry with no known counterpart counts
/// as moved.
pub fn has_position_change(incoming: &[LayoutEntry], known: &[LayoutEntry]) -> bool {
    incoming.iter().any(|entry| {
        match known.iter().find(|k| k.id == entry.id) {
            Some(k) => k.x != entry.x || k.y != entry.y,
            None => true,
        }
    })
}

/// The entries whose rect differs from `known` in any dimension. This is
/// the persistence set once a save is warranted.
pub fn changed_entries(incoming: &[LayoutEntry], known: &[LayoutEntry]) -> Vec<LayoutEntry> {
    incoming
        .iter()
        .filter(|entry| {
            known
                .iter()
                .find(|k| k.id == entry.id)
                .is_none_or(|k| !k.same_rect(entry))
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    struct Card {
        id: String,
        rect: Option<GridRect>,
    }

    impl GridItem for Card {
        fn grid_id(&self) -> &str {
            &self.id
        }
        fn grid_rect(&self) -> Option<GridRect> {
            self.rect
        }
    }

    fn card(id: &str, rect: Option<GridRect>) -> Card {
        Card {
            id: id.to_string(),
            rect,
        }
    }

    fn rect(x: i32, y: i32, width: i32, height: i32) -> GridRect {
        GridRect {
            x,
            y,
            width,
            height,
        }
    }

    #[test]
    fn test_default_placement_flows_across_columns() {
        let items: Vec<Card> = (0..5).map(|i| card(&format!("n{i}"), None)).collect();
        let layout = to_layout(&items, &IndexMap::new(), PlacementDefaults::notes());

        let positions: Vec<(i32, i32)> = layout.iter().map(|e| (e.x, e.y)).collect();
        assert_eq!(positions, vec![(0, 0), (1, 0), (2, 0), (0, 1), (1, 1)]);
        assert!(layout.iter().all(|e| e.width == 1 && e.height == 4));
    }

    #[test]
    fn test_saved_override_beats_item_rect() {
        let items = vec![card("a", Some(rect(2, 2, 1, 4)))];
        let mut saved = IndexMap::new();
        saved.insert("a".to_string(), rect(0, 5, 2, 3));

        let layout = to_layout(&items, &saved, PlacementDefaults::notes());
        assert_eq!(layout[0].rect(), rect(0, 5, 2, 3));
    }

    #[test]
    fn test_item_rect_beats_default() {
        let items = vec![card("a", Some(rect(2, 2, 1, 4)))];
        let layout = to_layout(&items, &IndexMap::new(), PlacementDefaults::notes());
        assert_eq!(layout[0].rect(), rect(2, 2, 1, 4));
    }

    #[test]
    fn test_position_change_ignores_resize() {
        let known = vec![LayoutEntry::from_rect("a", rect(0, 0, 1, 4))];
        let resized = vec![LayoutEntry::from_rect("a", rect(0, 0, 2, 6))];
        let moved = vec![LayoutEntry::from_rect("a", rect(1, 0, 1, 4))];

        assert!(!has_position_change(&resized, &known));
        assert!(has_position_change(&moved, &known));
    }

    #[test]
    fn test_unknown_entry_counts_as_moved() {
        let known = vec![LayoutEntry::from_rect("a", rect(0, 0, 1, 4))];
        let incoming = vec![
            LayoutEntry::from_rect("a", rect(0, 0, 1, 4)),
            LayoutEntry::from_rect("b", rect(1, 0, 1, 4)),
        ];
        assert!(has_position_change(&incoming, &known));
    }

    #[test]
    fn test_changed_entries_includes_resizes() {
        let known = vec![
            LayoutEntry::from_rect("a", rect(0, 0, 1, 4)),
            LayoutEntry::from_rect("b", rect(1, 0, 1, 4)),
        ];
        let incoming = vec![
            LayoutEntry::from_rect("a", rect(0, 0, 2, 4)),
            LayoutEntry::from_rect("b", rect(1, 0, 1, 4)),
        ];
        let changed = changed_entries(&incoming, &known);
        assert_eq!(changed.len(), 1);
        assert_eq!(changed[0].id, "a");
    }
}
