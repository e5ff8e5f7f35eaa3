use std::collections::VecDeque;
use std::iter::Iterator;

use super::Node;

/// Level-order (BFT) iterator of nodes in a random tree
///
/// Children are visited in `[<=, >]` order, which is also the order in which drawing assigns
/// node ids.
pub struct NodeIter<'a> {
    queue: VecDeque<&'a Node>,
}

impl<'a> NodeIter<'a> {
    pub fn new(root: Option<&'a Node>) -> Self {
        NodeIter {
            queue: root.into_iter().collect(),
        }
    }
}

impl<'a> Iterator for NodeIter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        self.queue.pop_front().map(|node| {
            self.queue.extend(node.children());

            node
        })
    }
}
