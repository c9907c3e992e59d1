//! The balanced-tree engine behind [`TreapSet`](crate::TreapSet).
//!
//! Everything here is a recursive (or, for read-only descents, iterative)
//! primitive over [`Link`]. The recursion carries ownership: a subtree is
//! taken out of its link, restructured, and handed back, so split and join
//! move nodes between trees without ever reallocating them. Each primitive
//! preserves the three structural invariants - search order, min-heap on
//! priority, and exact subtree counts.

use alloc::boxed::Box;

use super::link::Link;
use super::node::Node;

/// Rotates the subtree right: the left child becomes the subtree root.
///
/// Counts are recomputed locally; the inorder sequence is unchanged.
pub(crate) fn rotate_right<T>(link: &mut Link<T>) {
    let mut p = link.take().into_node().expect("`rotate_right()` - empty subtree!");
    let mut q = p.left.take().into_node().expect("`rotate_right()` - no left child!");
    p.left = q.right.take();
    p.count -= 1 + q.left.count();
    q.count += 1 + p.right.count();
    q.right = Link::from(p);
    *link = Link::from(q);
}

/// Rotates the subtree left: the right child becomes the subtree root.
pub(crate) fn rotate_left<T>(link: &mut Link<T>) {
    let mut p = link.take().into_node().expect("`rotate_left()` - empty subtree!");
    let mut q = p.right.take().into_node().expect("`rotate_left()` - no right child!");
    p.right = q.left.take();
    p.count -= 1 + q.right.count();
    q.count += 1 + p.left.count();
    q.left = Link::from(p);
    *link = Link::from(q);
}

/// Inserts `node` unless an equal key is already present.
///
/// On success every ancestor's count has been incremented and heap order
/// restored by rotations on the unwind. On a duplicate the rejected node is
/// handed back through `Err` and the tree is untouched: the `?` below
/// short-circuits before any ancestor bumps its count.
pub(crate) fn insert_unique<T, L>(link: &mut Link<T>, node: Box<Node<T>>, less: &L) -> Result<(), Box<Node<T>>>
where
    L: Fn(&T, &T) -> bool,
{
    if link.is_empty() {
        *link = Link::from(node);
        return Ok(());
    }

    let cur = link.as_node_mut();
    if less(&node.key, &cur.key) {
        insert_unique(&mut cur.left, node, less)?;
        cur.count += 1;
        if cur.left.priority() < cur.priority {
            rotate_right(link);
        }
        Ok(())
    } else if less(&cur.key, &node.key) {
        insert_unique(&mut cur.right, node, less)?;
        cur.count += 1;
        if cur.right.priority() < cur.priority {
            rotate_left(link);
        }
        Ok(())
    } else {
        Err(node)
    }
}

/// Inserts `node`, keeping duplicates. Equal keys descend right, matching
/// the relaxed search-order invariant for duplicate trees. Never fails.
pub(crate) fn insert_dup<T, L>(link: &mut Link<T>, node: Box<Node<T>>, less: &L)
where
    L: Fn(&T, &T) -> bool,
{
    if link.is_empty() {
        *link = Link::from(node);
        return;
    }

    let cur = link.as_node_mut();
    if less(&node.key, &cur.key) {
        insert_dup(&mut cur.left, node, less);
        cur.count += 1;
        if cur.left.priority() < cur.priority {
            rotate_right(link);
        }
    } else {
        insert_dup(&mut cur.right, node, less);
        cur.count += 1;
        if cur.right.priority() < cur.priority {
            rotate_left(link);
        }
    }
}

/// Inserts `node` unless an equal key is present, reporting whether it was
/// inserted together with the inorder rank of the stored key.
///
/// The rank is accumulated on the way down (each right turn contributes the
/// bypassed left subtree plus the bypassed node). Ranks depend only on key
/// order, so the rotations performed on the unwind cannot disturb the
/// answer, and the caller can re-derive a reference with [`choose`].
pub(crate) fn search_or_insert<T, L>(link: &mut Link<T>, node: Box<Node<T>>, acc: usize, less: &L) -> (bool, usize)
where
    L: Fn(&T, &T) -> bool,
{
    if link.is_empty() {
        *link = Link::from(node);
        return (true, acc);
    }

    let cur = link.as_node_mut();
    if less(&node.key, &cur.key) {
        let (inserted, rank) = search_or_insert(&mut cur.left, node, acc, less);
        if inserted {
            cur.count += 1;
            if cur.left.priority() < cur.priority {
                rotate_right(link);
            }
        }
        (inserted, rank)
    } else if less(&cur.key, &node.key) {
        let skipped = cur.left.count() + 1;
        let (inserted, rank) = search_or_insert(&mut cur.right, node, acc + skipped, less);
        if inserted {
            cur.count += 1;
            if cur.right.priority() < cur.priority {
                rotate_left(link);
            }
        }
        (inserted, rank)
    } else {
        // Equal key already stored; `node` is dropped here.
        (false, acc + cur.left.count())
    }
}

/// Iterative search. Returns the node holding a key equal to `key`.
pub(crate) fn find<'a, T, L>(link: &'a Link<T>, key: &T, less: &L) -> Option<&'a Node<T>>
where
    L: Fn(&T, &T) -> bool,
{
    let mut cur = link;
    while let Some(node) = cur.node() {
        if less(key, &node.key) {
            cur = &node.left;
        } else if less(&node.key, key) {
            cur = &node.right;
        } else {
            return Some(node);
        }
    }
    None
}

/// Removes the node matching `key`, if present.
///
/// The match is replaced by the exclusive join of its children; every
/// ancestor decrements its count on the unwind. The removed node comes back
/// detached (empty links, count 1).
pub(crate) fn remove<T, L>(link: &mut Link<T>, key: &T, less: &L) -> Option<Box<Node<T>>>
where
    L: Fn(&T, &T) -> bool,
{
    if link.is_empty() {
        return None;
    }

    let (go_left, go_right) = {
        let cur = link.as_node();
        (less(key, &cur.key), less(&cur.key, key))
    };

    if go_left {
        let cur = link.as_node_mut();
        let removed = remove(&mut cur.left, key, less)?;
        cur.count -= 1;
        Some(removed)
    } else if go_right {
        let cur = link.as_node_mut();
        let removed = remove(&mut cur.right, key, less)?;
        cur.count -= 1;
        Some(removed)
    } else {
        let mut node = link.take().into_node().expect("`remove()` - empty link!");
        let (left, right) = node.detach();
        *link = join_exclusive(left, right);
        Some(node)
    }
}

/// Removes the node at inorder position `pos`.
///
/// The caller must have checked `pos < link.count()`.
pub(crate) fn remove_at<T>(link: &mut Link<T>, pos: usize) -> Box<Node<T>> {
    let left_count = link.as_node().left.count();
    if pos == left_count {
        let mut node = link.take().into_node().expect("`remove_at()` - empty link!");
        let (left, right) = node.detach();
        *link = join_exclusive(left, right);
        node
    } else if pos < left_count {
        let cur = link.as_node_mut();
        let node = remove_at(&mut cur.left, pos);
        cur.count -= 1;
        node
    } else {
        let cur = link.as_node_mut();
        let node = remove_at(&mut cur.right, pos - left_count - 1);
        cur.count -= 1;
        node
    }
}

/// Joins two trees under the precondition that every key in `low` is
/// strictly less than every key in `high`.
///
/// The smaller-priority root wins, absorbs the other tree's count, and the
/// join recurses down the seam between the two. Priorities are untouched, so
/// both invariants survive without rotations.
pub(crate) fn join_exclusive<T>(low: Link<T>, high: Link<T>) -> Link<T> {
    let Some(mut low_root) = low.into_node() else {
        return high;
    };
    let Some(mut high_root) = high.into_node() else {
        return Link::from(low_root);
    };

    if low_root.priority < high_root.priority {
        low_root.count += high_root.count;
        let seam = low_root.right.take();
        low_root.right = join_exclusive(seam, Link::from(high_root));
        Link::from(low_root)
    } else {
        high_root.count += low_root.count;
        let seam = high_root.left.take();
        high_root.left = join_exclusive(Link::from(low_root), seam);
        Link::from(high_root)
    }
}

/// Splits the tree into `(keys < key, keys >= key)`.
///
/// Each node is routed whole to one side; counts shed the size of whatever
/// moved to the other side. Priorities are preserved, so both halves are
/// already valid heaps.
pub(crate) fn split_by_key<T, L>(link: Link<T>, key: &T, less: &L) -> (Link<T>, Link<T>)
where
    L: Fn(&T, &T) -> bool,
{
    let Some(mut node) = link.into_node() else {
        return (Link::empty(), Link::empty());
    };

    if less(&node.key, key) {
        let (low, high) = split_by_key(node.right.take(), key, less);
        node.count -= high.count();
        node.right = low;
        (Link::from(node), high)
    } else {
        // key <= node.key: this node and its right subtree go high.
        let (low, high) = split_by_key(node.left.take(), key, less);
        node.count -= low.count();
        node.left = high;
        (low, Link::from(node))
    }
}

/// Splits the tree by inorder position: `(positions 0..=pos, the rest)`.
///
/// The caller must have checked `pos < link.count()`.
pub(crate) fn split_at<T>(link: Link<T>, pos: usize) -> (Link<T>, Link<T>) {
    let mut node = link.into_node().expect("`split_at()` - position out of range!");
    let left_count = node.left.count();

    if pos == left_count {
        let high = node.right.take();
        node.count -= high.count();
        (Link::from(node), high)
    } else if pos < left_count {
        let (low, rest) = split_at(node.left.take(), pos);
        node.count -= low.count();
        node.left = rest;
        (low, Link::from(node))
    } else {
        let (rest, high) = split_at(node.right.take(), pos - left_count - 1);
        node.count -= high.count();
        node.right = rest;
        (Link::from(node), high)
    }
}

/// Iterative descent to the node at inorder position `pos`, guided by the
/// subtree counts. The caller must have checked `pos < link.count()`.
pub(crate) fn choose<T>(link: &Link<T>, mut pos: usize) -> &Node<T> {
    let mut cur = link.as_node();
    loop {
        let left_count = cur.left.count();
        if pos == left_count {
            return cur;
        }
        if pos < left_count {
            cur = cur.left.as_node();
        } else {
            pos -= left_count + 1;
            cur = cur.right.as_node();
        }
    }
}

/// Inorder rank of `key`, if present.
pub(crate) fn rank<T, L>(link: &Link<T>, key: &T, less: &L) -> Option<usize>
where
    L: Fn(&T, &T) -> bool,
{
    let cur = link.node()?;
    if less(key, &cur.key) {
        rank(&cur.left, key, less)
    } else if less(&cur.key, key) {
        rank(&cur.right, key, less).map(|r| r + cur.left.count() + 1)
    } else {
        Some(cur.left.count())
    }
}

/// Descends to the smallest key.
pub(crate) fn min_node<T>(link: &Link<T>) -> Option<&Node<T>> {
    let mut cur = link.node()?;
    while let Some(next) = cur.left.node() {
        cur = next;
    }
    Some(cur)
}

/// Descends to the greatest key.
pub(crate) fn max_node<T>(link: &Link<T>) -> Option<&Node<T>> {
    let mut cur = link.node()?;
    while let Some(next) = cur.right.node() {
        cur = next;
    }
    Some(cur)
}

/// Structural copy: the clone has the same keys, priorities, counts, and
/// topology as the original, not merely the same multiset.
pub(crate) fn clone_tree<T: Clone>(link: &Link<T>) -> Link<T> {
    match link.node() {
        None => Link::empty(),
        Some(node) => Link::from(Box::new(Node {
            key: node.key.clone(),
            priority: node.priority,
            count: node.count,
            left: clone_tree(&node.left),
            right: clone_tree(&node.right),
        })),
    }
}

/// Lock-step comparison of two trees: equal shape and pairwise equal keys.
pub(crate) fn topological_eq<T, L>(a: &Link<T>, b: &Link<T>, less: &L) -> bool
where
    L: Fn(&T, &T) -> bool,
{
    match (a.node(), b.node()) {
        (None, None) => true,
        (Some(x), Some(y)) => {
            !less(&x.key, &y.key)
                && !less(&y.key, &x.key)
                && topological_eq(&x.left, &y.left, less)
                && topological_eq(&x.right, &y.right, less)
        }
        _ => false,
    }
}

/// Consumes the tree in preorder, handing each node to `f` detached
/// (empty links, count 1).
pub(crate) fn drain_preorder<T, F>(link: Link<T>, f: &mut F)
where
    F: FnMut(Box<Node<T>>),
{
    if let Some(mut node) = link.into_node() {
        let (left, right) = node.detach();
        f(node);
        drain_preorder(left, f);
        drain_preorder(right, f);
    }
}

/// Inorder visit that stops early when `f` returns false. Returns whether
/// the traversal ran to completion.
pub(crate) fn for_each_while<'a, T, F>(link: &'a Link<T>, f: &mut F) -> bool
where
    F: FnMut(&'a T) -> bool,
{
    match link.node() {
        None => true,
        Some(node) => for_each_while(&node.left, f) && f(&node.key) && for_each_while(&node.right, f),
    }
}

// ─── Invariant checkers (test support) ───────────────────────────────────────

/// Inorder keys are non-decreasing. Duplicate trees are allowed equal runs;
/// unique trees never produce them in the first place.
pub(crate) fn check_order<T, L>(link: &Link<T>, less: &L) -> bool
where
    L: Fn(&T, &T) -> bool,
{
    let mut prev: Option<&T> = None;
    for_each_while(link, &mut |key| {
        let ordered = prev.map_or(true, |p| !less(key, p));
        prev = Some(key);
        ordered
    })
}

/// Every node's priority is at most both children's priorities. The empty
/// link reports the maximum priority, so leaves hold trivially.
pub(crate) fn check_heap<T>(link: &Link<T>) -> bool {
    match link.node() {
        None => true,
        Some(node) => {
            node.priority <= node.left.priority()
                && node.priority <= node.right.priority()
                && check_heap(&node.left)
                && check_heap(&node.right)
        }
    }
}

/// Every node's count equals one plus its children's counts.
pub(crate) fn check_counts<T>(link: &Link<T>) -> bool {
    match link.node() {
        None => true,
        Some(node) => {
            node.count == 1 + node.left.count() + node.right.count()
                && check_counts(&node.left)
                && check_counts(&node.right)
        }
    }
}

/// All three structural invariants at once.
pub(crate) fn check_all<T, L>(link: &Link<T>, less: &L) -> bool
where
    L: Fn(&T, &T) -> bool,
{
    check_order(link, less) && check_heap(link) && check_counts(link)
}
