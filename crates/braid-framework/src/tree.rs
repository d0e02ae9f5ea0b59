//! Path-addressed command tree.
//!
//! The tree records, for every command, subcommand group, and subcommand, the
//! owning handler instance and the DTO instance used to resolve its options.
//! It is write-mostly: the builder populates it during registration and
//! dispatch consumers read it afterwards for fast lookup.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::dto::DtoRef;
use crate::handler::CommandHandler;

/// Fields merged into a tree node by [`CommandTree::append_node`].
#[derive(Clone, Default)]
pub struct NodeValue {
    /// Owning handler instance.
    pub instance: Option<Arc<dyn CommandHandler>>,
    /// DTO instance whose schema produced the node's options.
    pub dto: Option<DtoRef>,
}

impl NodeValue {
    /// A value carrying only an instance.
    pub fn instance(instance: Arc<dyn CommandHandler>) -> Self {
        Self {
            instance: Some(instance),
            ..Default::default()
        }
    }

    /// A value carrying only a DTO.
    pub fn dto(dto: DtoRef) -> Self {
        Self {
            dto: Some(dto),
            ..Default::default()
        }
    }

    /// An empty value; appending it still creates the node.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// One node of the command tree.
#[derive(Default)]
pub struct TreeNode {
    /// Owning handler instance, once recorded.
    pub instance: Option<Arc<dyn CommandHandler>>,
    /// DTO instance, once recorded.
    pub dto: Option<DtoRef>,
    children: HashMap<String, TreeNode>,
}

impl TreeNode {
    /// Child node by segment name.
    pub fn child(&self, segment: &str) -> Option<&TreeNode> {
        self.children.get(segment)
    }

    /// Number of direct children.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    fn merge(&mut self, value: NodeValue) {
        if let Some(instance) = value.instance {
            self.instance = Some(instance);
        }
        if let Some(dto) = value.dto {
            self.dto = Some(dto);
        }
    }
}

impl fmt::Debug for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeNode")
            .field("has_instance", &self.instance.is_some())
            .field("has_dto", &self.dto.is_some())
            .field("children", &self.children.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Mutable, path-addressed registry of command tree nodes.
#[derive(Default)]
pub struct CommandTree {
    roots: HashMap<String, TreeNode>,
}

impl CommandTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges `value` into the node at `path`, creating intermediate nodes
    /// as needed.
    ///
    /// `None` segments mark absent levels (a subcommand without a group) and
    /// are skipped, never treated as literal keys. Paths are unique:
    /// appending to an existing path merges into that node's fields instead
    /// of duplicating it. An all-`None` path is a no-op.
    pub fn append_node(&mut self, path: &[Option<&str>], value: NodeValue) {
        let mut segments = path.iter().filter_map(|s| *s);
        let Some(first) = segments.next() else {
            return;
        };

        let mut node = self.roots.entry(first.to_string()).or_default();
        for segment in segments {
            node = node.children.entry(segment.to_string()).or_default();
        }
        node.merge(value);
    }

    /// Node at `path`, if present.
    pub fn node(&self, path: &[&str]) -> Option<&TreeNode> {
        let (first, rest) = path.split_first()?;
        let mut node = self.roots.get(*first)?;
        for segment in rest {
            node = node.child(segment)?;
        }
        Some(node)
    }

    /// Number of top-level commands recorded.
    pub fn root_count(&self) -> usize {
        self.roots.len()
    }
}

impl fmt::Debug for CommandTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandTree")
            .field("roots", &self.roots.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::DtoRef;

    struct Gateway;
    impl CommandHandler for Gateway {}

    #[test]
    fn re_appending_a_path_merges_without_duplicating() {
        let mut tree = CommandTree::new();
        tree.append_node(&[Some("cmd")], NodeValue::empty());
        tree.append_node(&[Some("cmd"), Some("grp")], NodeValue::empty());
        tree.append_node(&[Some("cmd"), Some("grp"), Some("sub")], NodeValue::empty());

        let instance: Arc<dyn CommandHandler> = Arc::new(Gateway);
        tree.append_node(&[Some("cmd")], NodeValue::instance(Arc::clone(&instance)));
        tree.append_node(&[Some("cmd")], NodeValue::dto(DtoRef::new(42u32)));

        assert_eq!(tree.root_count(), 1);
        let root = tree.node(&["cmd"]).unwrap();
        assert!(root.instance.is_some());
        assert!(root.dto.is_some());
        assert_eq!(root.child_count(), 1);
        assert!(tree.node(&["cmd", "grp", "sub"]).is_some());
    }

    #[test]
    fn absent_segments_are_skipped_not_keyed() {
        let mut tree = CommandTree::new();
        tree.append_node(&[Some("cmd"), None, Some("sub")], NodeValue::empty());

        assert!(tree.node(&["cmd", "sub"]).is_some());
        assert!(tree.node(&["cmd", "None"]).is_none());
    }

    #[test]
    fn merging_keeps_previously_recorded_fields() {
        let mut tree = CommandTree::new();
        let instance: Arc<dyn CommandHandler> = Arc::new(Gateway);
        tree.append_node(&[Some("cmd")], NodeValue::instance(instance));
        tree.append_node(&[Some("cmd")], NodeValue::dto(DtoRef::new(1u8)));

        let node = tree.node(&["cmd"]).unwrap();
        assert!(node.instance.is_some(), "instance survives a dto-only merge");
    }

    #[test]
    fn empty_path_is_a_no_op() {
        let mut tree = CommandTree::new();
        tree.append_node(&[None, None], NodeValue::empty());
        assert_eq!(tree.root_count(), 0);
    }
}
