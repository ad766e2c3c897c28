use nalgebra as na;
use serde::{Deserialize, Serialize};

use crate::error::TreeError;
use crate::point::TreeNode;
use crate::Path;

/// Append-only storage for the nodes grown by the planner.
///
/// Index 0 is always the root. Every other node is connected to a node with a strictly lower
/// index, which makes the parent relation acyclic and lets any walk towards the root finish in at
/// most `size()` steps. Deserialization goes through the same check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TreeNode>", into = "Vec<TreeNode>")]
pub struct Tree {
    nodes: Vec<TreeNode>,
}

impl Tree {
    pub fn new(root: na::Point2<f32>) -> Tree {
        Tree { nodes: vec![TreeNode::new_root(root)] }
    }

    /// Throws away every node and starts over from `root`.
    pub(crate) fn reset(&mut self, root: na::Point2<f32>) {
        self.nodes.clear();
        self.nodes.push(TreeNode::new_root(root));
    }

    pub(crate) fn push(&mut self, p: na::Point2<f32>, parent: usize) -> usize {
        debug_assert!(parent < self.nodes.len(), "parent {} is not in the tree", parent);
        self.nodes.push(TreeNode::new_connected(p, parent));
        self.nodes.len() - 1
    }

    #[inline(always)]
    pub fn root(&self) -> &TreeNode {
        &self.nodes[0]
    }

    #[inline(always)]
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    pub fn get(&self, idx: usize) -> Option<&TreeNode> {
        self.nodes.get(idx)
    }

    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TreeNode> {
        self.nodes.iter()
    }

    /// Every edge as a `(parent, child)` pair of points, in insertion order of the child.
    pub fn edges(&self) -> impl Iterator<Item = (na::Point2<f32>, na::Point2<f32>)> + '_ {
        self.nodes
            .iter()
            .filter_map(move |node| node.connected().map(|parent| (self.nodes[parent].point(), node.point())))
    }

    /// Number of edges between the node at `idx` and the root.
    pub fn depth(&self, idx: usize) -> usize {
        self.ancestors(idx).count().saturating_sub(1)
    }

    /// Walks the parent links from `idx` back to the root, starting with `idx` itself.
    pub fn ancestors(&self, idx: usize) -> impl Iterator<Item = &TreeNode> + '_ {
        std::iter::successors(self.nodes.get(idx), move |node| {
            node.connected().and_then(|parent| self.nodes.get(parent))
        })
    }

    /// Builds the path from the root to the node at `idx`.
    ///
    /// Returns `None` if `idx` is not in the tree.
    pub fn path_to(&self, idx: usize) -> Option<Path> {
        if idx >= self.nodes.len() {
            return None;
        }

        let mut waypoints: Vec<_> = self.ancestors(idx).map(TreeNode::point).collect();
        waypoints.reverse();

        Some(Path::new(waypoints))
    }
}

impl<'a> IntoIterator for &'a Tree {
    type Item = &'a TreeNode;
    type IntoIter = std::slice::Iter<'a, TreeNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl TryFrom<Vec<TreeNode>> for Tree {
    type Error = TreeError;

    fn try_from(nodes: Vec<TreeNode>) -> Result<Tree, TreeError> {
        let root = nodes.first().ok_or(TreeError::Empty)?;

        if let Some(parent) = root.connected() {
            return Err(TreeError::RootHasParent(parent));
        }

        for (index, node) in nodes.iter().enumerate().skip(1) {
            match node.connected() {
                None => return Err(TreeError::Detached(index)),
                Some(parent) if parent >= index => return Err(TreeError::ForwardParent { index, parent }),
                Some(_) => {}
            }
        }

        Ok(Tree { nodes })
    }
}

impl From<Tree> for Vec<TreeNode> {
    fn from(tree: Tree) -> Vec<TreeNode> {
        tree.nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point2(x: f32, y: f32) -> na::Point2<f32> {
        na::Point2::new(x, y)
    }

    fn branching_tree() -> Tree {
        //      0
        //     / \
        //    1   2
        //    |
        //    3
        let mut tree = Tree::new(point2(0.0, 0.0));
        tree.push(point2(1.0, 0.0), 0);
        tree.push(point2(0.0, 1.0), 0);
        tree.push(point2(2.0, 0.0), 1);
        tree
    }

    #[test]
    fn new_tree_has_only_the_root() {
        let tree = Tree::new(point2(3.0, 4.0));
        assert_eq!(tree.size(), 1);
        assert!(tree.root().is_root());
        assert_eq!(tree.root().point(), point2(3.0, 4.0));
        assert_eq!(tree.edges().count(), 0);
    }

    #[test]
    fn path_to_walks_back_to_the_root() {
        let tree = branching_tree();
        let path = tree.path_to(3).unwrap();

        assert_eq!(
            path.waypoints,
            vec![point2(0.0, 0.0), point2(1.0, 0.0), point2(2.0, 0.0)]
        );
        assert_eq!(tree.depth(3), 2);
        assert_eq!(tree.depth(0), 0);
        assert!(tree.path_to(4).is_none());
    }

    #[test]
    fn path_to_root_is_a_single_point() {
        let tree = branching_tree();
        assert_eq!(tree.path_to(0).unwrap().waypoints, vec![point2(0.0, 0.0)]);
    }

    #[test]
    fn edges_pair_parents_with_children() {
        let tree = branching_tree();
        let edges: Vec<_> = tree.edges().collect();

        assert_eq!(
            edges,
            vec![
                (point2(0.0, 0.0), point2(1.0, 0.0)),
                (point2(0.0, 0.0), point2(0.0, 1.0)),
                (point2(1.0, 0.0), point2(2.0, 0.0)),
            ]
        );
    }

    #[test]
    fn reset_discards_previous_nodes() {
        let mut tree = branching_tree();
        tree.reset(point2(5.0, 5.0));
        assert_eq!(tree.size(), 1);
        assert_eq!(tree.root().point(), point2(5.0, 5.0));
    }

    #[test]
    fn try_from_accepts_valid_trees() {
        let tree = branching_tree();
        let nodes: Vec<TreeNode> = tree.clone().into();
        assert_eq!(Tree::try_from(nodes), Ok(tree));
    }

    #[test]
    fn try_from_rejects_broken_trees() {
        let root = TreeNode::new_root(point2(0.0, 0.0));
        let p = point2(1.0, 1.0);

        assert_eq!(Tree::try_from(vec![]), Err(TreeError::Empty));
        assert_eq!(
            Tree::try_from(vec![TreeNode::new_connected(p, 0)]),
            Err(TreeError::RootHasParent(0))
        );
        assert_eq!(
            Tree::try_from(vec![root, TreeNode::new_root(p)]),
            Err(TreeError::Detached(1))
        );
        assert_eq!(
            Tree::try_from(vec![root, TreeNode::new_connected(p, 2), TreeNode::new_connected(p, 0)]),
            Err(TreeError::ForwardParent { index: 1, parent: 2 })
        );
        // A self loop is the smallest cycle.
        assert_eq!(
            Tree::try_from(vec![root, TreeNode::new_connected(p, 1)]),
            Err(TreeError::ForwardParent { index: 1, parent: 1 })
        );
    }
}
