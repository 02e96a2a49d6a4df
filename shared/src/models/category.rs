//! Product category tree

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::types::CategoryId;
use crate::validation::contains_ignore_case;

/// A product category node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub parent_id: Option<CategoryId>,
}

/// Parent/child lookup over product categories.
///
/// Children of a node are kept ordered by (name, id); "first child" always
/// refers to that order.
#[derive(Debug, Clone, Default)]
pub struct CategoryTree {
    nodes: HashMap<CategoryId, Category>,
    children: HashMap<CategoryId, Vec<CategoryId>>,
}

impl CategoryTree {
    pub fn new(categories: impl IntoIterator<Item = Category>) -> Self {
        let nodes: HashMap<CategoryId, Category> =
            categories.into_iter().map(|c| (c.id, c)).collect();

        let mut children: HashMap<CategoryId, Vec<CategoryId>> = HashMap::new();
        for category in nodes.values() {
            if let Some(parent_id) = category.parent_id {
                if nodes.contains_key(&parent_id) {
                    children.entry(parent_id).or_default().push(category.id);
                }
            }
        }
        for ids in children.values_mut() {
            ids.sort_by(|a, b| {
                let (ca, cb) = (&nodes[a], &nodes[b]);
                ca.name.cmp(&cb.name).then(ca.id.cmp(&cb.id))
            });
        }

        Self { nodes, children }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.nodes.values()
    }

    /// Descend from `id` along the first child until a leaf is reached
    pub fn resolve_leaf(&self, id: CategoryId) -> Option<&Category> {
        let mut current = self.nodes.get(&id)?;
        // Bounded by the node count so a malformed cyclic tree terminates
        for _ in 0..self.nodes.len() {
            match self.children.get(&current.id).and_then(|c| c.first()) {
                Some(child_id) => current = &self.nodes[child_id],
                None => break,
            }
        }
        Some(current)
    }

    /// Leaf categories reachable from every category whose name contains `term`.
    ///
    /// Only terminal nodes are ever returned: a matching inner node
    /// contributes the leaf at the end of its first-child path.
    pub fn leaf_ids_matching(&self, term: &str) -> Vec<CategoryId> {
        let mut seen = HashSet::new();
        let mut leaves: Vec<CategoryId> = self
            .nodes
            .values()
            .filter(|c| contains_ignore_case(&c.name, term))
            .filter_map(|c| self.resolve_leaf(c.id))
            .map(|leaf| leaf.id)
            .filter(|id| seen.insert(*id))
            .collect();
        leaves.sort();
        leaves
    }

    /// Full path name, e.g. "Stone / Marble / Carrara"
    pub fn complete_name(&self, id: CategoryId) -> String {
        let mut names = Vec::new();
        let mut cursor = self.nodes.get(&id);
        while let Some(category) = cursor {
            names.push(category.name.as_str());
            if names.len() > self.nodes.len() {
                break;
            }
            cursor = category.parent_id.and_then(|p| self.nodes.get(&p));
        }
        names.reverse();
        names.join(" / ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn category(name: &str, parent: Option<CategoryId>) -> Category {
        Category {
            id: Uuid::new_v4(),
            name: name.to_string(),
            parent_id: parent,
        }
    }

    #[test]
    fn test_resolve_leaf_follows_first_child() {
        let a = category("Stone", None);
        let b = category("Marble", Some(a.id));
        let c = category("Carrara", Some(b.id));
        let d = category("Statuario", Some(b.id));
        let tree = CategoryTree::new(vec![a.clone(), b.clone(), c.clone(), d.clone()]);

        assert_eq!(tree.resolve_leaf(a.id).map(|x| x.id), Some(c.id));
        assert_eq!(tree.resolve_leaf(d.id).map(|x| x.id), Some(d.id));
        assert_eq!(tree.resolve_leaf(c.id).map(|x| x.id), Some(c.id));
    }

    #[test]
    fn test_leaf_ids_matching_only_returns_leaves() {
        let a = category("A", None);
        let b = category("B", Some(a.id));
        let c = category("C", Some(b.id));
        let tree = CategoryTree::new(vec![a.clone(), b.clone(), c.clone()]);

        assert_eq!(tree.leaf_ids_matching("a"), vec![c.id]);
        assert_eq!(tree.leaf_ids_matching("C"), vec![c.id]);
        assert!(tree.leaf_ids_matching("zzz").is_empty());
    }

    #[test]
    fn test_complete_name() {
        let a = category("Stone", None);
        let b = category("Marble", Some(a.id));
        let tree = CategoryTree::new(vec![a, b.clone()]);
        assert_eq!(tree.complete_name(b.id), "Stone / Marble");
        assert_eq!(tree.complete_name(Uuid::new_v4()), "");
    }

    #[test]
    fn test_cycle_terminates() {
        let mut a = category("A", None);
        let b = category("B", Some(a.id));
        a.parent_id = Some(b.id);
        let tree = CategoryTree::new(vec![a.clone(), b]);
        assert!(tree.resolve_leaf(a.id).is_some());
        assert!(!tree.complete_name(a.id).is_empty());
    }
}
