use eframe::egui::{self, collapsing_header::CollapsingState, Id, Ui};

use crate::controller::{Selection, UiEvent};
use crate::hierarchy::RegionNode;
use crate::search::TreeFilter;

/// Checkbox tree over the regions. Checkbox state is read from the
/// selection each frame, so a rejected toggle shows up unchecked again.
pub fn region_tree(
    ui: &mut Ui,
    root: &RegionNode,
    selection: &Selection,
    filter: &TreeFilter,
    events: &mut Vec<UiEvent>,
) {
    ui.label(format!(
        "{} of {} selected",
        selection.len(),
        selection.limit()
    ));
    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            let parent = ui.make_persistent_id("region_tree");
            node(ui, parent, root, true, selection, filter, events);
        });
}

fn checkbox(ui: &mut Ui, id: &str, name: &str, selection: &Selection, events: &mut Vec<UiEvent>) {
    let mut checked = selection.contains(id);
    if ui.checkbox(&mut checked, name).changed() {
        events.push(UiEvent::Checkbox {
            id: id.to_owned(),
            checked,
        });
    }
}

/// Collapsing state key for a branch. Chained from the parent's key so two
/// branches sharing an id in different places open independently.
fn header_id(parent: Id, region_id: &str) -> Id {
    parent.with(region_id)
}

fn node(
    ui: &mut Ui,
    parent: Id,
    region: &RegionNode,
    default_open: bool,
    selection: &Selection,
    filter: &TreeFilter,
    events: &mut Vec<UiEvent>,
) {
    if !filter.is_visible(&region.id) {
        return;
    }
    if region.is_leaf() {
        checkbox(ui, &region.id, &region.name, selection, events);
        return;
    }

    let id = header_id(parent, &region.id);
    let mut state = CollapsingState::load_with_default_open(ui.ctx(), id, default_open);
    if filter.is_active() {
        state.set_open(true);
    }
    state
        .show_header(ui, |ui| {
            checkbox(ui, &region.id, &region.name, selection, events);
        })
        .body(|ui| {
            for child in &region.children {
                node(ui, id, child, false, selection, filter, events);
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_ids_follow_the_tree_path() {
        let root = header_id(Id::new("region_tree"), "World");
        let europe_other = header_id(header_id(root, "Europe"), "Other");
        let nested_other = header_id(header_id(root, "Other"), "Other");
        assert_ne!(europe_other, nested_other);
        assert_eq!(europe_other, header_id(header_id(root, "Europe"), "Other"));
    }
}
