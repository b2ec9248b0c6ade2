// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! # Dynamic AABB Tree
//!
//! An incrementally balanced binary tree of AABBs. Leaves carry user data;
//! insertion picks the sibling that minimizes the growth in surface area, then
//! rotates ancestors to keep heights balanced.

use crate::math::Aabb;

const NULL_NODE: i32 = -1;

#[derive(Debug, Clone)]
struct TreeNode<T> {
    aabb: Aabb,
    data: Option<T>,
    parent: i32,
    children: [i32; 2],
    /// 0 for leaves.
    height: i32,
}

impl<T> TreeNode<T> {
    #[inline]
    fn is_leaf(&self) -> bool {
        self.children[0] == NULL_NODE
    }
}

/// A bounding volume hierarchy over leaves of type `T`.
#[derive(Debug, Clone)]
pub struct DynamicTree<T> {
    root: i32,
    nodes: Vec<TreeNode<T>>,
    leaf_count: usize,
}

impl<T> Default for DynamicTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> DynamicTree<T> {
    pub fn new() -> Self {
        Self {
            root: NULL_NODE,
            nodes: Vec::new(),
            leaf_count: 0,
        }
    }

    /// Number of leaves.
    pub fn len(&self) -> usize {
        self.leaf_count
    }

    pub fn is_empty(&self) -> bool {
        self.leaf_count == 0
    }

    /// Bounds of everything in the tree.
    pub fn bounds(&self) -> Option<Aabb> {
        (self.root != NULL_NODE).then(|| self.node(self.root).aabb)
    }

    /// Height of the root, 0 for a single leaf.
    pub fn height(&self) -> i32 {
        if self.root == NULL_NODE {
            0
        } else {
            self.node(self.root).height
        }
    }

    /// Inserts a leaf and returns its node index.
    pub fn insert(&mut self, aabb: Aabb, data: T) -> i32 {
        let leaf = self.push_node(aabb, Some(data));
        self.insert_leaf(leaf);
        self.leaf_count += 1;
        leaf
    }

    /// Calls `callback` for every leaf whose box overlaps `aabb`.
    /// Returning `false` from the callback stops the query.
    pub fn query<F>(&self, aabb: &Aabb, mut callback: F)
    where
        F: FnMut(&T) -> bool,
    {
        if self.root == NULL_NODE {
            return;
        }
        let mut stack = Vec::with_capacity(64);
        stack.push(self.root);
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            if !node.aabb.intersects_aabb(aabb) {
                continue;
            }
            if let Some(data) = &node.data {
                if !callback(data) {
                    return;
                }
            } else {
                stack.extend(node.children);
            }
        }
    }

    #[inline]
    fn node(&self, id: i32) -> &TreeNode<T> {
        &self.nodes[id as usize]
    }

    #[inline]
    fn node_mut(&mut self, id: i32) -> &mut TreeNode<T> {
        &mut self.nodes[id as usize]
    }

    fn push_node(&mut self, aabb: Aabb, data: Option<T>) -> i32 {
        let id = self.nodes.len() as i32;
        self.nodes.push(TreeNode {
            aabb,
            data,
            parent: NULL_NODE,
            children: [NULL_NODE, NULL_NODE],
            height: 0,
        });
        id
    }

    /// Cost of descending into `child` with a leaf of box `leaf_aabb`.
    fn descend_cost(&self, child: i32, leaf_aabb: &Aabb, inheritance_cost: f32) -> f32 {
        let node = self.node(child);
        let grown = node.aabb.merge(leaf_aabb).surface_area();
        if node.is_leaf() {
            grown + inheritance_cost
        } else {
            grown - node.aabb.surface_area() + inheritance_cost
        }
    }

    fn insert_leaf(&mut self, leaf: i32) {
        if self.root == NULL_NODE {
            self.root = leaf;
            return;
        }

        let leaf_aabb = self.node(leaf).aabb;
        let mut sibling = self.root;
        while !self.node(sibling).is_leaf() {
            let node = self.node(sibling);
            let [c0, c1] = node.children;
            let area = node.aabb.surface_area();
            let combined_area = node.aabb.merge(&leaf_aabb).surface_area();

            let cost = 2.0 * combined_area;
            let inheritance_cost = 2.0 * (combined_area - area);
            let cost0 = self.descend_cost(c0, &leaf_aabb, inheritance_cost);
            let cost1 = self.descend_cost(c1, &leaf_aabb, inheritance_cost);

            if cost < cost0 && cost < cost1 {
                break;
            }
            sibling = if cost0 < cost1 { c0 } else { c1 };
        }

        let old_parent = self.node(sibling).parent;
        let merged = leaf_aabb.merge(&self.node(sibling).aabb);
        let new_parent = self.push_node(merged, None);
        {
            let height = self.node(sibling).height + 1;
            let p = self.node_mut(new_parent);
            p.parent = old_parent;
            p.children = [sibling, leaf];
            p.height = height;
        }
        self.node_mut(sibling).parent = new_parent;
        self.node_mut(leaf).parent = new_parent;
        if old_parent == NULL_NODE {
            self.root = new_parent;
        } else {
            self.replace_child(old_parent, sibling, new_parent);
        }

        let mut index = self.node(leaf).parent;
        while index != NULL_NODE {
            index = self.balance(index);
            self.refit(index);
            index = self.node(index).parent;
        }
    }

    fn replace_child(&mut self, parent: i32, old: i32, new: i32) {
        let p = self.node_mut(parent);
        if p.children[0] == old {
            p.children[0] = new;
        } else {
            p.children[1] = new;
        }
    }

    /// Recomputes box and height of an internal node from its children.
    fn refit(&mut self, index: i32) {
        let [c0, c1] = self.node(index).children;
        let aabb = self.node(c0).aabb.merge(&self.node(c1).aabb);
        let height = 1 + self.node(c0).height.max(self.node(c1).height);
        let n = self.node_mut(index);
        n.aabb = aabb;
        n.height = height;
    }

    /// Rotates the taller grandchild up when `a`'s subtrees differ in height by
    /// more than one. Returns the index now at `a`'s position.
    fn balance(&mut self, a: i32) -> i32 {
        let node_a = self.node(a);
        if node_a.is_leaf() || node_a.height < 2 {
            return a;
        }
        let [b, c] = node_a.children;
        let skew = self.node(c).height - self.node(b).height;
        if skew > 1 {
            self.rotate_up(a, c, 1)
        } else if skew < -1 {
            self.rotate_up(a, b, 0)
        } else {
            a
        }
    }

    /// Moves `child` (at slot `slot` of `a`) into `a`'s place; `a` keeps the
    /// shorter of `child`'s children.
    fn rotate_up(&mut self, a: i32, child: i32, slot: usize) -> i32 {
        let [f, g] = self.node(child).children;
        let grand_parent = self.node(a).parent;

        self.node_mut(child).children[0] = a;
        self.node_mut(child).parent = grand_parent;
        self.node_mut(a).parent = child;
        if grand_parent == NULL_NODE {
            self.root = child;
        } else {
            self.replace_child(grand_parent, a, child);
        }

        let (keep, give) = if self.node(f).height > self.node(g).height {
            (f, g)
        } else {
            (g, f)
        };
        self.node_mut(child).children[1] = keep;
        self.node_mut(a).children[slot] = give;
        self.node_mut(give).parent = a;

        self.refit(a);
        self.refit(child);
        child
    }
}
