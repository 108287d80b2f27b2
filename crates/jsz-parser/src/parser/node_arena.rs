//! NodeArena creation methods.

use super::base::NodeIndex;
use super::node::{Node, NodeArena, NodeData};

impl NodeArena {
    /// Maximum pre-allocation to avoid capacity overflow in huge files.
    const MAX_NODE_PREALLOC: usize = 5_000_000;

    pub fn new() -> NodeArena {
        NodeArena::default()
    }

    /// Create an arena sized for roughly `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> NodeArena {
        NodeArena {
            nodes: Vec::with_capacity(capacity.min(Self::MAX_NODE_PREALLOC)),
        }
    }

    /// Append a node and return its index.
    pub fn add(&mut self, pos: u32, end: u32, data: NodeData) -> NodeIndex {
        let index = NodeIndex(self.nodes.len() as u32);
        self.nodes.push(Node::new(pos, end, data));
        index
    }

    /// Append a synthesized node that takes the position of `like`.
    pub fn add_like(&mut self, like: NodeIndex, data: NodeData) -> NodeIndex {
        let (pos, end) = self.get(like).map_or((0, 0), |n| (n.pos, n.end));
        self.add(pos, end, data)
    }

    /// Replace the data of `index` in place, returning the old data.
    pub fn replace(&mut self, index: NodeIndex, data: NodeData) -> Option<NodeData> {
        self.get_mut(index)
            .map(|node| std::mem::replace(&mut node.data, data))
    }

    /// Replace `index` with an empty statement.
    pub fn make_empty(&mut self, index: NodeIndex) {
        self.replace(index, NodeData::Empty);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }
}
