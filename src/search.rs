//! Text filter over the region tree.

use std::collections::HashSet;

use crate::hierarchy::RegionNode;

/// Ids of tree entries to show for a search term.
///
/// An entry is shown when its own name matches, when a descendant matches
/// (so the match keeps its context), or when an ancestor matches (so the
/// whole matched subtree stays browsable). An empty term shows everything.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TreeFilter {
    visible: Option<HashSet<String>>,
}

impl TreeFilter {
    pub fn new(root: &RegionNode, term: &str) -> Self {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return Self::default();
        }
        let mut visible = HashSet::new();
        mark(root, &needle, false, &mut visible);
        log::debug!("search {term:?}: {} visible entries", visible.len());
        Self {
            visible: Some(visible),
        }
    }

    pub fn is_active(&self) -> bool {
        self.visible.is_some()
    }

    pub fn is_visible(&self, id: &str) -> bool {
        self.visible
            .as_ref()
            .map_or(true, |visible| visible.contains(id))
    }
}

/// Returns whether `node` ends up visible.
fn mark(node: &RegionNode, needle: &str, ancestor_matched: bool, out: &mut HashSet<String>) -> bool {
    let own_match = node.name.to_lowercase().contains(needle);
    let mut any_child = false;
    for child in &node.children {
        any_child |= mark(child, needle, ancestor_matched || own_match, out);
    }
    let shown = own_match || ancestor_matched || any_child;
    if shown {
        out.insert(node.id.clone());
    }
    shown
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::sample_tree;

    #[test]
    fn empty_term_shows_everything() {
        let filter = TreeFilter::new(&sample_tree(), "  ");
        assert!(!filter.is_active());
        assert!(filter.is_visible("NOR"));
        assert!(filter.is_visible("anything"));
    }

    #[test]
    fn match_shows_its_ancestors_and_hides_unrelated_siblings() {
        let filter = TreeFilter::new(&sample_tree(), "Ind");
        for id in ["IND", "Southern Asia", "Asia", "World"] {
            assert!(filter.is_visible(id), "{id} should be visible");
        }
        for id in ["IRI", "CHN", "Eastern Asia", "Europe", "NOR"] {
            assert!(!filter.is_visible(id), "{id} should be hidden");
        }
    }

    #[test]
    fn match_shows_all_descendants() {
        let filter = TreeFilter::new(&sample_tree(), "europe");
        for id in ["Europe", "Northern Europe", "NOR", "ENG", "World"] {
            assert!(filter.is_visible(id), "{id} should be visible");
        }
        assert!(!filter.is_visible("Asia"));
    }

    #[test]
    fn no_match_hides_the_tree() {
        let filter = TreeFilter::new(&sample_tree(), "zzz");
        assert!(filter.is_active());
        assert!(!filter.is_visible("World"));
    }
}
