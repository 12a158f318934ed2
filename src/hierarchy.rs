//! The World → region → subregion → federation tree and its id index.

use std::collections::HashMap;

use serde::Deserialize;

/// One node of the region tree. Leaves are federations.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct RegionNode {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub children: Vec<RegionNode>,
}

impl RegionNode {
    pub fn leaf(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn branch(
        id: impl Into<String>,
        name: impl Into<String>,
        children: Vec<RegionNode>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            children,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Axis bounds computed over the whole history.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyStats {
    pub min_rating: f64,
    pub max_rating: f64,
    pub max_density: f64,
}

/// The structure artifact: the root node plus optional stats.
#[derive(Clone, Debug, Deserialize)]
pub struct Structure {
    #[serde(flatten)]
    pub root: RegionNode,
    #[serde(default)]
    pub stats: Option<HierarchyStats>,
}

#[derive(Debug)]
struct IndexedNode {
    id: String,
    name: String,
    children: Vec<usize>,
}

/// Flat lookup over the region tree, built once.
///
/// Nodes are stored in pre-order; when two nodes share an id the later one
/// owns the id (e.g. a subregion named like its region).
#[derive(Debug, Default)]
pub struct RegionIndex {
    nodes: Vec<IndexedNode>,
    by_id: HashMap<String, usize>,
}

impl RegionIndex {
    pub fn build(root: &RegionNode) -> Self {
        let mut index = Self::default();
        index.insert(root);
        log::debug!(
            "region index built: {} nodes, {} distinct ids",
            index.nodes.len(),
            index.by_id.len()
        );
        index
    }

    fn insert(&mut self, node: &RegionNode) -> usize {
        let slot = self.nodes.len();
        self.nodes.push(IndexedNode {
            id: node.id.clone(),
            name: node.name.clone(),
            children: Vec::with_capacity(node.children.len()),
        });
        if let Some(previous) = self.by_id.insert(node.id.clone(), slot) {
            log::debug!(
                "region id {:?} repeated, node {slot} replaces node {previous}",
                node.id
            );
        }
        for child in &node.children {
            let child_slot = self.insert(child);
            self.nodes[slot].children.push(child_slot);
        }
        slot
    }

    /// Leaf ids under `id`, in child order. Unknown ids resolve to nothing.
    pub fn resolve(&self, id: &str) -> Vec<String> {
        let Some(&slot) = self.by_id.get(id) else {
            return Vec::new();
        };
        let mut leaves = Vec::new();
        self.collect_leaves(slot, &mut leaves);
        leaves
    }

    fn collect_leaves(&self, slot: usize, out: &mut Vec<String>) {
        let node = &self.nodes[slot];
        if node.children.is_empty() {
            out.push(node.id.clone());
            return;
        }
        for &child in &node.children {
            self.collect_leaves(child, out);
        }
    }

    pub fn name(&self, id: &str) -> Option<&str> {
        self.by_id
            .get(id)
            .map(|&slot| self.nodes[slot].name.as_str())
    }

    /// Distinct ids, the root included.
    pub fn region_count(&self) -> usize {
        self.by_id.len()
    }
}

#[cfg(test)]
pub(crate) fn sample_tree() -> RegionNode {
    RegionNode::branch(
        "World",
        "World",
        vec![
            RegionNode::branch(
                "Asia",
                "Asia",
                vec![
                    RegionNode::branch(
                        "Southern Asia",
                        "Southern Asia",
                        vec![
                            RegionNode::leaf("IND", "India"),
                            RegionNode::leaf("IRI", "Iran"),
                        ],
                    ),
                    RegionNode::branch(
                        "Eastern Asia",
                        "Eastern Asia",
                        vec![RegionNode::leaf("CHN", "China")],
                    ),
                ],
            ),
            RegionNode::branch(
                "Europe",
                "Europe",
                vec![RegionNode::branch(
                    "Northern Europe",
                    "Northern Europe",
                    vec![
                        RegionNode::leaf("NOR", "Norway"),
                        RegionNode::leaf("ENG", "England"),
                    ],
                )],
            ),
        ],
    )
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn resolves_branch_to_leaves_in_child_order() {
        let index = RegionIndex::build(&sample_tree());
        assert_eq!(index.resolve("Asia"), vec!["IND", "IRI", "CHN"]);
        assert_eq!(index.resolve("Northern Europe"), vec!["NOR", "ENG"]);
    }

    #[test]
    fn leaf_resolves_to_itself() {
        let index = RegionIndex::build(&sample_tree());
        assert_eq!(index.resolve("CHN"), vec!["CHN"]);
    }

    #[test]
    fn unknown_id_resolves_to_nothing() {
        let index = RegionIndex::build(&sample_tree());
        assert!(index.resolve("Atlantis").is_empty());
        assert_eq!(index.name("Atlantis"), None);
    }

    #[test]
    fn root_union_covers_every_federation_once() {
        let index = RegionIndex::build(&sample_tree());
        let leaves = index.resolve("World");
        let distinct: HashSet<_> = leaves.iter().cloned().collect();
        assert_eq!(leaves.len(), distinct.len());
        let expected: HashSet<String> = ["IND", "IRI", "CHN", "NOR", "ENG"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(distinct, expected);
    }

    #[test]
    fn repeated_id_is_owned_by_later_node() {
        let tree = RegionNode::branch(
            "World",
            "World",
            vec![RegionNode::branch(
                "Other",
                "Other",
                vec![RegionNode::branch(
                    "Other",
                    "Other subregion",
                    vec![RegionNode::leaf("FID", "FIDE")],
                )],
            )],
        );
        let index = RegionIndex::build(&tree);
        assert_eq!(index.name("Other"), Some("Other subregion"));
        assert_eq!(index.region_count(), 3);
        assert_eq!(index.resolve("Other"), vec!["FID"]);
        assert_eq!(index.resolve("World"), vec!["FID"]);
    }

    #[test]
    fn parses_structure_with_stats() {
        let json = r#"{
            "name": "World", "id": "World",
            "children": [
                {"name": "Europe", "id": "Europe", "children": [
                    {"name": "Northern Europe", "id": "Northern Europe",
                     "children": [{"name": "Norway", "id": "NOR"}]}
                ]}
            ],
            "stats": {"maxDensity": 0.004, "minRating": 900.0, "maxRating": 2950.0}
        }"#;
        let structure: Structure = serde_json::from_str(json).unwrap();
        assert_eq!(structure.root.children[0].children[0].children[0].id, "NOR");
        let stats = structure.stats.unwrap();
        assert_eq!(stats.min_rating, 900.0);
        assert_eq!(stats.max_density, 0.004);
    }
}
