//! Scene tree
//!
//! Nodes live in an arena and refer to each other by [`NodeId`] handles.
//! A handle carries a generation, so a handle to a removed node never
//! resolves to whatever later reuses its slot.
//!
//! Invariants: exactly one root once the tree is populated, the root has no
//! parent, and the parent/child links form no cycles (enforced by
//! [`SceneTree::reparent`]).

use std::fmt;

use serde::{Deserialize, Serialize};

use super::SceneError;
use crate::game::Entity;

/// Generational handle to a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// One tree node. Owns its entity; children are owned through the arena.
#[derive(Debug)]
pub struct Node {
    entity: Entity,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

/// Name-only hierarchy snapshot (published to the editor)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeInfo {
    pub name: String,
    pub children: Vec<NodeInfo>,
}

#[derive(Debug, Default)]
pub struct SceneTree {
    slots: Vec<Option<Node>>,
    generations: Vec<u32>,
    free: Vec<usize>,
    root: Option<NodeId>,
}

impl SceneTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tree with `entity` as its root
    pub fn with_root(entity: Entity) -> (Self, NodeId) {
        let mut tree = Self::new();
        let root = tree.insert(Node {
            entity,
            parent: None,
            children: Vec::new(),
        });
        tree.root = Some(root);
        (tree, root)
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    fn insert(&mut self, node: Node) -> NodeId {
        if let Some(index) = self.free.pop() {
            self.slots[index] = Some(node);
            return NodeId {
                index: index as u32,
                generation: self.generations[index],
            };
        }
        let index = self.slots.len();
        self.slots.push(Some(node));
        self.generations.push(0);
        NodeId {
            index: index as u32,
            generation: 0,
        }
    }

    fn take(&mut self, id: NodeId) -> Option<Node> {
        if !self.contains(id) {
            return None;
        }
        let index = id.index as usize;
        self.generations[index] = self.generations[index].wrapping_add(1);
        self.free.push(index);
        self.slots[index].take()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        let index = id.index as usize;
        index < self.slots.len()
            && self.generations[index] == id.generation
            && self.slots[index].is_some()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if !self.contains(id) {
            return None;
        }
        self.slots[id.index as usize].as_ref()
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if !self.contains(id) {
            return None;
        }
        self.slots[id.index as usize].as_mut()
    }

    pub fn entity(&self, id: NodeId) -> Option<&Entity> {
        self.get(id).map(Node::entity)
    }

    pub fn entity_mut(&mut self, id: NodeId) -> Option<&mut Entity> {
        self.get_mut(id).map(Node::entity_mut)
    }

    fn describe(&self, id: NodeId) -> String {
        match self.entity(id) {
            Some(e) => format!("'{}'", e.name()),
            None => id.to_string(),
        }
    }

    /// Attach `entity` under `parent`, or make it the root when `parent` is `None`
    pub fn add_child(&mut self, parent: Option<NodeId>, entity: Entity) -> Result<NodeId, SceneError> {
        match parent {
            None => {
                if self.root.is_some() {
                    return Err(SceneError::RootExists);
                }
                let id = self.insert(Node {
                    entity,
                    parent: None,
                    children: Vec::new(),
                });
                self.root = Some(id);
                Ok(id)
            }
            Some(parent) => {
                if !self.contains(parent) {
                    return Err(SceneError::UnknownNode(parent.to_string()));
                }
                let id = self.insert(Node {
                    entity,
                    parent: Some(parent),
                    children: Vec::new(),
                });
                if let Some(p) = self.get_mut(parent) {
                    p.children.push(id);
                }
                Ok(id)
            }
        }
    }

    /// Handles in pre-order from `start`: node before children, siblings in
    /// insertion order
    pub fn pre_order_from(&self, start: NodeId) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.len());
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            let Some(node) = self.get(id) else {
                continue;
            };
            order.push(id);
            stack.extend(node.children.iter().rev().copied());
        }
        order
    }

    /// Every node reachable from the root, in pre-order
    pub fn pre_order(&self) -> Vec<NodeId> {
        match self.root {
            Some(root) => self.pre_order_from(root),
            None => Vec::new(),
        }
    }

    pub fn traverse(&self, mut visitor: impl FnMut(NodeId, &Node)) {
        for id in self.pre_order() {
            if let Some(node) = self.get(id) {
                visitor(id, node);
            }
        }
    }

    pub fn traverse_mut(&mut self, mut visitor: impl FnMut(NodeId, &mut Entity)) {
        for id in self.pre_order() {
            if let Some(entity) = self.entity_mut(id) {
                visitor(id, entity);
            }
        }
    }

    /// First node in pre-order whose entity is called `name`
    pub fn find_node(&self, name: &str) -> Option<NodeId> {
        self.pre_order()
            .into_iter()
            .find(|&id| self.entity(id).is_some_and(|e| e.name() == name))
    }

    /// True when `ancestor` is `node` or lies on its parent chain
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(id) = cursor {
            if id == ancestor {
                return true;
            }
            cursor = self.get(id).and_then(Node::parent);
        }
        false
    }

    /// Move `id` (with its subtree) to the end of `new_parent`'s children
    pub fn reparent(&mut self, id: NodeId, new_parent: NodeId) -> Result<(), SceneError> {
        if !self.contains(id) {
            return Err(SceneError::UnknownNode(id.to_string()));
        }
        if !self.contains(new_parent) {
            return Err(SceneError::UnknownNode(new_parent.to_string()));
        }
        if Some(id) == self.root {
            return Err(SceneError::RootImmutable);
        }
        if self.is_ancestor(id, new_parent) {
            return Err(SceneError::WouldCycle {
                node: self.describe(id),
                parent: self.describe(new_parent),
            });
        }

        let old_parent = self.get(id).and_then(Node::parent);
        if let Some(old) = old_parent.and_then(|p| self.get_mut(p)) {
            old.children.retain(|&c| c != id);
        }
        if let Some(node) = self.get_mut(id) {
            node.parent = Some(new_parent);
        }
        if let Some(parent) = self.get_mut(new_parent) {
            parent.children.push(id);
        }
        Ok(())
    }

    /// Remove a node. With `reparent_children` its children take its place
    /// under its parent, in order; otherwise the whole subtree goes.
    /// Returns the number of entities dropped.
    pub fn remove_node(&mut self, id: NodeId, reparent_children: bool) -> Result<usize, SceneError> {
        if !self.contains(id) {
            return Err(SceneError::UnknownNode(id.to_string()));
        }
        if Some(id) == self.root {
            return Err(SceneError::RootImmutable);
        }
        let Some(parent) = self.get(id).and_then(Node::parent) else {
            return Err(SceneError::UnknownNode(id.to_string()));
        };

        let position = self
            .get(parent)
            .and_then(|p| p.children.iter().position(|&c| c == id))
            .unwrap_or(0);

        if reparent_children {
            let Some(node) = self.take(id) else {
                return Ok(0);
            };
            for &child in &node.children {
                if let Some(c) = self.get_mut(child) {
                    c.parent = Some(parent);
                }
            }
            if let Some(p) = self.get_mut(parent) {
                p.children.remove(position);
                for (offset, &child) in node.children.iter().enumerate() {
                    p.children.insert(position + offset, child);
                }
            }
            drop(node);
            Ok(1)
        } else {
            let doomed = self.pre_order_from(id);
            if let Some(p) = self.get_mut(parent) {
                p.children.remove(position);
            }
            let removed = doomed.iter().filter_map(|&d| self.take(d)).count();
            Ok(removed)
        }
    }

    /// Nested name snapshot from the root
    pub fn hierarchy(&self) -> Vec<NodeInfo> {
        fn build(tree: &SceneTree, id: NodeId) -> Option<NodeInfo> {
            let node = tree.get(id)?;
            Some(NodeInfo {
                name: node.entity.name().to_string(),
                children: node.children.iter().filter_map(|&c| build(tree, c)).collect(),
            })
        }
        self.root.and_then(|r| build(self, r)).into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::EntityIds;

    fn tree_with(names: &[(&str, Option<&str>)]) -> (SceneTree, EntityIds) {
        let mut ids = EntityIds::new();
        let mut tree = SceneTree::new();
        for (name, parent) in names {
            let parent = parent.map(|p| tree.find_node(p).unwrap());
            tree.add_child(parent, Entity::new(&mut ids, *name, 0, 0)).unwrap();
        }
        (tree, ids)
    }

    fn names(tree: &SceneTree) -> Vec<String> {
        let mut out = Vec::new();
        tree.traverse(|_, node| out.push(node.entity().name().to_string()));
        out
    }

    #[test]
    fn test_pre_order_parent_first_siblings_in_order() {
        let (tree, _) = tree_with(&[
            ("Root", None),
            ("a", Some("Root")),
            ("b", Some("Root")),
            ("a1", Some("a")),
            ("a2", Some("a")),
            ("b1", Some("b")),
        ]);
        assert_eq!(names(&tree), vec!["Root", "a", "a1", "a2", "b", "b1"]);
    }

    #[test]
    fn test_second_root_rejected() {
        let (mut tree, mut ids) = tree_with(&[("Root", None)]);
        let err = tree.add_child(None, Entity::new(&mut ids, "Other", 0, 0)).unwrap_err();
        assert_eq!(err, SceneError::RootExists);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_find_node_returns_first_in_pre_order() {
        let (tree, _) = tree_with(&[
            ("Root", None),
            ("a", Some("Root")),
            ("dup", Some("a")),
            ("dup", Some("Root")),
        ]);
        let found = tree.find_node("dup").unwrap();
        assert_eq!(tree.get(found).unwrap().parent(), tree.find_node("a"));
        assert!(tree.find_node("missing").is_none());
    }

    #[test]
    fn test_reparent_refuses_cycles() {
        let (mut tree, _) = tree_with(&[
            ("Root", None),
            ("a", Some("Root")),
            ("b", Some("a")),
            ("c", Some("b")),
        ]);
        let a = tree.find_node("a").unwrap();
        let c = tree.find_node("c").unwrap();
        assert!(matches!(tree.reparent(a, c), Err(SceneError::WouldCycle { .. })));
        assert!(matches!(tree.reparent(a, a), Err(SceneError::WouldCycle { .. })));

        let root = tree.root().unwrap();
        tree.reparent(c, root).unwrap();
        assert_eq!(names(&tree), vec!["Root", "a", "b", "c"]);
        assert_eq!(tree.get(c).unwrap().parent(), Some(root));
    }

    #[test]
    fn test_remove_with_reparent_keeps_position() {
        let (mut tree, _) = tree_with(&[
            ("Root", None),
            ("a", Some("Root")),
            ("b", Some("Root")),
            ("c", Some("Root")),
            ("b1", Some("b")),
            ("b2", Some("b")),
        ]);
        let b = tree.find_node("b").unwrap();
        assert_eq!(tree.remove_node(b, true).unwrap(), 1);
        assert_eq!(names(&tree), vec!["Root", "a", "b1", "b2", "c"]);
        let b1 = tree.find_node("b1").unwrap();
        assert_eq!(tree.get(b1).unwrap().parent(), tree.root());
    }

    #[test]
    fn test_remove_subtree() {
        let (mut tree, _) = tree_with(&[
            ("Root", None),
            ("a", Some("Root")),
            ("a1", Some("a")),
            ("a11", Some("a1")),
            ("b", Some("Root")),
        ]);
        let a = tree.find_node("a").unwrap();
        assert_eq!(tree.remove_node(a, false).unwrap(), 3);
        assert_eq!(names(&tree), vec!["Root", "b"]);
        assert_eq!(tree.len(), 2);
        assert!(!tree.contains(a));
    }

    #[test]
    fn test_root_cannot_be_removed() {
        let (mut tree, _) = tree_with(&[("Root", None)]);
        let root = tree.root().unwrap();
        assert_eq!(tree.remove_node(root, true), Err(SceneError::RootImmutable));
    }

    #[test]
    fn test_stale_handle_does_not_resolve_after_slot_reuse() {
        let (mut tree, mut ids) = tree_with(&[("Root", None), ("a", Some("Root"))]);
        let a = tree.find_node("a").unwrap();
        tree.remove_node(a, false).unwrap();
        let root = tree.root();
        let b = tree.add_child(root, Entity::new(&mut ids, "b", 0, 0)).unwrap();
        assert_eq!(a.index, b.index);
        assert_ne!(a.generation, b.generation);
        assert!(tree.get(a).is_none());
        assert_eq!(tree.entity(b).unwrap().name(), "b");
    }

    #[test]
    fn test_hierarchy_snapshot() {
        let (tree, _) = tree_with(&[("Root", None), ("a", Some("Root")), ("a1", Some("a"))]);
        let json = serde_json::to_value(tree.hierarchy()).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{"name": "Root", "children": [
                {"name": "a", "children": [{"name": "a1", "children": []}]}
            ]}])
        );
    }
}
