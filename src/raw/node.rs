use alloc::boxed::Box;

use super::link::Link;

/// A single tree node.
///
/// `count` caches the size of the subtree rooted here (1 for a leaf) and is
/// kept exact through every rotation, split, and join. `priority` is drawn
/// once at creation and never changes while the node is in a tree.
pub(crate) struct Node<T> {
    pub(crate) key: T,
    pub(crate) priority: u64,
    pub(crate) count: usize,
    pub(crate) left: Link<T>,
    pub(crate) right: Link<T>,
}

impl<T> Node<T> {
    /// Creates a detached single-node subtree.
    pub(crate) fn new(key: T, priority: u64) -> Box<Self> {
        Box::new(Self {
            key,
            priority,
            count: 1,
            left: Link::empty(),
            right: Link::empty(),
        })
    }

    /// Resets the node to a detached single-node subtree, dropping nothing.
    /// Both child links must already have been taken by the caller.
    pub(crate) fn detach(&mut self) -> (Link<T>, Link<T>) {
        self.count = 1;
        (self.left.take(), self.right.take())
    }

    /// Consumes the node and returns its key.
    pub(crate) fn into_key(self: Box<Self>) -> T {
        self.key
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn new_node_is_a_leaf() {
        let node = Node::new("k", 3);
        assert_eq!(node.count, 1);
        assert!(node.left.is_empty());
        assert!(node.right.is_empty());
        assert_eq!(node.into_key(), "k");
    }

    #[test]
    fn detach_strips_children_and_count() {
        let mut node = Node::new(10u32, 1);
        node.left = Link::from(Node::new(5, 2));
        node.right = Link::from(Node::new(15, 2));
        node.count = 3;

        let (left, right) = node.detach();
        assert_eq!(node.count, 1);
        assert!(node.left.is_empty());
        assert!(node.right.is_empty());
        assert_eq!(left.count(), 1);
        assert_eq!(right.count(), 1);
    }
}
