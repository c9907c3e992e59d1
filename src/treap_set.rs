//! An ordered set implemented as a size-augmented treap.

use core::cmp::Ordering::{self, Equal, Greater, Less};
use core::fmt;
use core::iter::FusedIterator;

use alloc::boxed::Box;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use smallvec::SmallVec;

use crate::raw::{self, Link, Node};

mod order_statistic;

/// An ordered set based on a treap with subtree-size augmentation.
///
/// Keys are ordered by a strict-less comparator supplied at construction, so
/// equality is derived: two keys are equal when neither is less than the
/// other. This makes it natural to keep structured records sorted by one
/// projected attribute. For keys that are simply [`Ord`], use
/// [`new_ord`](TreapSet::new_ord).
///
/// Balance comes from a min-heap over random 64-bit priorities drawn from a
/// per-set seeded RNG, which bounds the expected depth at O(log n). Because
/// every node caches its subtree size, the set answers positional queries
/// ([`choose`](TreapSet::choose), [`rank`](TreapSet::rank)) and performs
/// positional surgery ([`split_by_position`](TreapSet::split_by_position),
/// [`extract_range`](TreapSet::extract_range)) in O(log n) as well.
///
/// It is a logic error for the comparator to be anything other than a strict
/// weak order, or for a key to be mutated in a way that changes its ordering
/// while it is in the set. The behavior resulting from such a logic error is
/// not specified (it may panic or return arbitrary answers) but is
/// memory-safe.
///
/// # Examples
///
/// ```
/// use treapset::TreapSet;
///
/// // Rank quotes by price: the comparator projects one field.
/// let mut book = TreapSet::new(7, |a: &(u32, &str), b: &(u32, &str)| a.0 < b.0);
///
/// book.insert((101, "bid A"));
/// book.insert((99, "bid B"));
/// book.insert((104, "bid C"));
///
/// // Keys equal under the projection are rejected by `insert`.
/// assert!(!book.insert((104, "bid D")));
///
/// assert_eq!(book.min(), Some(&(99, "bid B")));
/// assert_eq!(book.choose(1), &(101, "bid A"));
/// assert_eq!(book.rank(&(104, "")), Some(2));
/// ```
pub struct TreapSet<T, L = fn(&T, &T) -> bool> {
    root: Link<T>,
    seed: u64,
    rng: SmallRng,
    less: L,
}

impl<T, L> TreapSet<T, L> {
    /// Makes a new, empty `TreapSet` with the given RNG seed and strict-less
    /// comparator.
    ///
    /// Two sets built with the same seed and the same operation sequence
    /// have identical shapes, which makes failures reproducible.
    ///
    /// # Examples
    ///
    /// ```
    /// use treapset::TreapSet;
    ///
    /// let mut set = TreapSet::new(42, |a: &i32, b: &i32| a < b);
    /// set.insert(1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    pub fn new(seed: u64, less: L) -> Self {
        Self {
            root: Link::empty(),
            seed,
            rng: SmallRng::seed_from_u64(seed),
            less,
        }
    }

    /// Makes a new, empty `TreapSet` seeded from the wall clock.
    ///
    /// # Examples
    ///
    /// ```
    /// use treapset::TreapSet;
    ///
    /// let mut set = TreapSet::new_auto(|a: &i32, b: &i32| a < b);
    /// set.insert(1);
    /// assert!(set.contains(&1));
    /// ```
    #[cfg(feature = "std")]
    pub fn new_auto(less: L) -> Self {
        #[allow(clippy::cast_possible_truncation)]
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_nanos() as u64);
        Self::new(seed, less)
    }

    /// Makes a new `TreapSet` holding `items`, duplicates included.
    ///
    /// # Examples
    ///
    /// ```
    /// use treapset::TreapSet;
    ///
    /// let set = TreapSet::with_items(3, |a: &i32, b: &i32| a < b, [2, 1, 2]);
    /// assert_eq!(set.len(), 3);
    /// ```
    pub fn with_items<I>(seed: u64, less: L, items: I) -> Self
    where
        L: Fn(&T, &T) -> bool,
        I: IntoIterator<Item = T>,
    {
        let mut set = Self::new(seed, less);
        for item in items {
            set.insert_dup(item);
        }
        set
    }

    /// Makes a new `TreapSet` holding `items`, seeded from the wall clock.
    #[cfg(feature = "std")]
    pub fn with_items_auto<I>(less: L, items: I) -> Self
    where
        L: Fn(&T, &T) -> bool,
        I: IntoIterator<Item = T>,
    {
        let mut set = Self::new_auto(less);
        for item in items {
            set.insert_dup(item);
        }
        set
    }

    /// Returns the number of keys in the set.
    ///
    /// # Complexity
    ///
    /// O(1) - the root node caches the size of the whole tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.root.count()
    }

    /// Returns true if the set contains no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Removes every key from the set.
    pub fn clear(&mut self) {
        self.root = Link::empty();
    }

    /// Exchanges the entire contents (keys, comparator, and RNG state) of
    /// two sets.
    ///
    /// # Complexity
    ///
    /// O(1)
    pub fn swap(&mut self, other: &mut Self) {
        core::mem::swap(self, other);
    }

    /// Returns the smallest key, or `None` if the set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use treapset::TreapSet;
    ///
    /// let set = TreapSet::with_items(1, |a: &i32, b: &i32| a < b, [3, 1, 2]);
    /// assert_eq!(set.min(), Some(&1));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) expected
    #[must_use]
    pub fn min(&self) -> Option<&T> {
        raw::min_node(&self.root).map(|node| &node.key)
    }

    /// Returns the greatest key, or `None` if the set is empty.
    ///
    /// # Complexity
    ///
    /// O(log n) expected
    #[must_use]
    pub fn max(&self) -> Option<&T> {
        raw::max_node(&self.root).map(|node| &node.key)
    }

    /// Adds `item` to the set unless an equal key is already present.
    ///
    /// Returns whether the item was inserted; on `false` the set keeps its
    /// stored key and `item` is dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use treapset::TreapSet;
    ///
    /// let mut set = TreapSet::new_ord(5);
    /// assert!(set.insert(10));
    /// assert!(!set.insert(10));
    /// assert_eq!(set.len(), 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) expected
    pub fn insert(&mut self, item: T) -> bool
    where
        L: Fn(&T, &T) -> bool,
    {
        let node = Node::new(item, self.rng.gen());
        raw::insert_unique(&mut self.root, node, &self.less).is_ok()
    }

    /// Adds `item` to the set, keeping it even when an equal key is already
    /// present. Equal keys are stored in insertion order.
    ///
    /// # Examples
    ///
    /// ```
    /// use treapset::TreapSet;
    ///
    /// let mut set = TreapSet::new_ord(5);
    /// set.insert_dup(10);
    /// set.insert_dup(10);
    /// assert_eq!(set.len(), 2);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) expected
    pub fn insert_dup(&mut self, item: T)
    where
        L: Fn(&T, &T) -> bool,
    {
        let node = Node::new(item, self.rng.gen());
        raw::insert_dup(&mut self.root, node, &self.less);
    }

    /// Returns the stored key equal to `key`, or `None` if absent.
    ///
    /// The returned reference is to the key the set stores, which can differ
    /// from `key` in fields the comparator does not project.
    ///
    /// # Complexity
    ///
    /// O(log n) expected
    #[must_use]
    pub fn search(&self, key: &T) -> Option<&T>
    where
        L: Fn(&T, &T) -> bool,
    {
        raw::find(&self.root, key, &self.less).map(|node| &node.key)
    }

    /// Returns true if the set contains a key equal to `key`.
    ///
    /// # Complexity
    ///
    /// O(log n) expected
    #[must_use]
    pub fn contains(&self, key: &T) -> bool
    where
        L: Fn(&T, &T) -> bool,
    {
        self.search(key).is_some()
    }

    /// Inserts `item` if no equal key is present, and returns whether the
    /// insertion happened together with the stored key.
    ///
    /// # Examples
    ///
    /// ```
    /// use treapset::TreapSet;
    ///
    /// let mut users = TreapSet::new(9, |a: &(u32, &str), b: &(u32, &str)| a.0 < b.0);
    ///
    /// let (inserted, stored) = users.search_or_insert((7, "first"));
    /// assert!(inserted);
    /// assert_eq!(stored.1, "first");
    ///
    /// // The equal key is returned; the new item is discarded.
    /// let (inserted, stored) = users.search_or_insert((7, "second"));
    /// assert!(!inserted);
    /// assert_eq!(stored.1, "first");
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) expected
    pub fn search_or_insert(&mut self, item: T) -> (bool, &T)
    where
        L: Fn(&T, &T) -> bool,
    {
        let node = Node::new(item, self.rng.gen());
        let (inserted, rank) = raw::search_or_insert(&mut self.root, node, 0, &self.less);
        (inserted, &raw::choose(&self.root, rank).key)
    }

    /// Removes the key equal to `key` and returns it, or `None` if absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use treapset::TreapSet;
    ///
    /// let mut set = TreapSet::with_items(2, |a: &i32, b: &i32| a < b, [1, 2, 3]);
    /// assert_eq!(set.remove(&2), Some(2));
    /// assert_eq!(set.remove(&2), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) expected
    pub fn remove(&mut self, key: &T) -> Option<T>
    where
        L: Fn(&T, &T) -> bool,
    {
        raw::remove(&mut self.root, key, &self.less).map(Node::into_key)
    }

    /// Splits the set into `(keys < key, keys >= key)`, leaving it empty.
    ///
    /// Both halves inherit this set's seed and comparator; the moved nodes
    /// keep their priorities, so no rebalancing happens.
    ///
    /// # Examples
    ///
    /// ```
    /// use treapset::TreapSet;
    ///
    /// let mut set = TreapSet::with_items(4, |a: &i32, b: &i32| a < b, 0..6);
    /// let (low, high) = set.split_by_key(&3);
    ///
    /// assert!(set.is_empty());
    /// assert_eq!(low.iter().copied().collect::<Vec<_>>(), [0, 1, 2]);
    /// assert_eq!(high.iter().copied().collect::<Vec<_>>(), [3, 4, 5]);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) expected
    pub fn split_by_key(&mut self, key: &T) -> (Self, Self)
    where
        L: Fn(&T, &T) -> bool + Clone,
    {
        let (low, high) = raw::split_by_key(self.root.take(), key, &self.less);
        let mut low_set = self.spawn();
        let mut high_set = self.spawn();
        low_set.root = low;
        high_set.root = high;
        (low_set, high_set)
    }

    /// Appends every key of `other` to this set, leaving `other` empty.
    ///
    /// # Panics
    ///
    /// Panics unless every key of this set is strictly less than every key
    /// of `other`.
    ///
    /// # Examples
    ///
    /// ```
    /// use treapset::TreapSet;
    ///
    /// let mut low = TreapSet::<i32>::with_items(1, |a, b| a < b, 0..3);
    /// let mut high = TreapSet::<i32>::with_items(2, |a, b| a < b, 3..6);
    ///
    /// low.join_exclusive(&mut high);
    /// assert!(high.is_empty());
    /// assert_eq!(low.iter().copied().collect::<Vec<_>>(), [0, 1, 2, 3, 4, 5]);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) expected
    pub fn join_exclusive(&mut self, other: &mut Self)
    where
        L: Fn(&T, &T) -> bool,
    {
        if let (Some(low_max), Some(high_min)) = (self.max(), other.min()) {
            assert!(
                (self.less)(low_max, high_min),
                "`TreapSet::join_exclusive()` - sets are not range-disjoint!"
            );
        }
        let low = self.root.take();
        let high = other.root.take();
        self.root = raw::join_exclusive(low, high);
    }

    /// Merges every key of `other` into this set, keeping duplicates and
    /// leaving `other` empty. The keys may interleave arbitrarily.
    ///
    /// Nodes move from `other` one by one; their priorities are kept.
    ///
    /// # Complexity
    ///
    /// O(m log(n + m)) expected, where m is `other.len()`
    pub fn join_dup(&mut self, other: &mut Self)
    where
        L: Fn(&T, &T) -> bool,
    {
        let root = other.root.take();
        let less = &self.less;
        raw::drain_preorder(root, &mut |node| raw::insert_dup(&mut self.root, node, less));
    }

    /// Inserts a copy of every key of `other` that this set does not already
    /// contain. `other` is left untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use treapset::TreapSet;
    ///
    /// let mut a = TreapSet::<i32>::with_items(1, |a, b| a < b, [1, 3]);
    /// let b = TreapSet::<i32>::with_items(2, |a, b| a < b, [2, 3]);
    ///
    /// a.union(&b);
    /// assert_eq!(a.iter().copied().collect::<Vec<_>>(), [1, 2, 3]);
    /// assert_eq!(b.len(), 2);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(m log(n + m)) expected, where m is `other.len()`
    pub fn union(&mut self, other: &Self)
    where
        T: Clone,
        L: Fn(&T, &T) -> bool,
    {
        for key in other.iter() {
            let node = Node::new(key.clone(), self.rng.gen());
            if let Err(duplicate) = raw::insert_unique(&mut self.root, node, &self.less) {
                drop(duplicate);
            }
        }
    }

    /// Partitions this set and `other` into `(both, only_self, only_other)`,
    /// leaving both inputs empty.
    ///
    /// Nodes are moved, never copied: keys present in both sets end up in
    /// `both` (this set's copy is kept, `other`'s is dropped), and the rest
    /// land in the respective difference set. Duplicates collapse.
    ///
    /// # Examples
    ///
    /// ```
    /// use treapset::TreapSet;
    ///
    /// let mut a = TreapSet::<i32>::with_items(1, |a, b| a < b, [1, 2, 3]);
    /// let mut b = TreapSet::<i32>::with_items(2, |a, b| a < b, [2, 3, 4]);
    ///
    /// let (both, only_a, only_b) = a.intersection(&mut b);
    /// assert!(a.is_empty() && b.is_empty());
    /// assert_eq!(both.iter().copied().collect::<Vec<_>>(), [2, 3]);
    /// assert_eq!(only_a.iter().copied().collect::<Vec<_>>(), [1]);
    /// assert_eq!(only_b.iter().copied().collect::<Vec<_>>(), [4]);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n log(n + m)) expected
    pub fn intersection(&mut self, other: &mut Self) -> (Self, Self, Self)
    where
        L: Fn(&T, &T) -> bool + Clone,
    {
        let mut both = self.spawn();
        let mut only_self = self.spawn();
        let mut only_other = Self::new(other.seed, other.less.clone());

        let root = self.root.take();
        let less = &self.less;
        raw::drain_preorder(root, &mut |node| {
            let target = if raw::remove(&mut other.root, &node.key, less).is_some() {
                &mut both
            } else {
                &mut only_self
            };
            if let Err(duplicate) = raw::insert_unique(&mut target.root, node, less) {
                drop(duplicate);
            }
        });

        only_other.root = other.root.take();
        (both, only_self, only_other)
    }

    /// Returns true if both sets have the same shape and pairwise equal keys.
    ///
    /// This is stronger than multiset equality: two sets holding the same
    /// keys in different tree shapes compare unequal. Use
    /// [`lexicographic_cmp`](TreapSet::lexicographic_cmp) for order-only
    /// comparison.
    pub fn topological_eq(&self, other: &Self) -> bool
    where
        L: Fn(&T, &T) -> bool,
    {
        raw::topological_eq(&self.root, &other.root, &self.less)
    }

    /// Compares two sets lexicographically by their sorted key sequences.
    ///
    /// The first unequal pair decides; if one sequence is a prefix of the
    /// other, the shorter set is less.
    ///
    /// # Examples
    ///
    /// ```
    /// use core::cmp::Ordering;
    /// use treapset::TreapSet;
    ///
    /// let a = TreapSet::<i32>::with_items(1, |a, b| a < b, [1, 2, 3]);
    /// let b = TreapSet::<i32>::with_items(2, |a, b| a < b, [1, 2]);
    ///
    /// assert_eq!(a.lexicographic_cmp(&b), Ordering::Greater);
    /// assert_eq!(b.lexicographic_cmp(&a), Ordering::Less);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(min(n, m))
    pub fn lexicographic_cmp(&self, other: &Self) -> Ordering
    where
        L: Fn(&T, &T) -> bool,
    {
        let mut lhs = self.iter();
        let mut rhs = other.iter();
        loop {
            match (lhs.next(), rhs.next()) {
                (None, None) => return Equal,
                (None, Some(_)) => return Less,
                (Some(_), None) => return Greater,
                (Some(a), Some(b)) => {
                    if (self.less)(a, b) {
                        return Less;
                    }
                    if (self.less)(b, a) {
                        return Greater;
                    }
                }
            }
        }
    }

    /// Visits the keys in ascending order until `f` returns false. Returns
    /// whether the traversal ran to completion.
    ///
    /// # Examples
    ///
    /// ```
    /// use treapset::TreapSet;
    ///
    /// let set = TreapSet::with_items(3, |a: &i32, b: &i32| a < b, [5, 1, 9]);
    ///
    /// let mut below_nine = Vec::new();
    /// let completed = set.traverse(|&key| {
    ///     if key >= 9 {
    ///         return false;
    ///     }
    ///     below_nine.push(key);
    ///     true
    /// });
    ///
    /// assert!(!completed);
    /// assert_eq!(below_nine, [1, 5]);
    /// ```
    pub fn traverse<F>(&self, mut f: F) -> bool
    where
        F: FnMut(&T) -> bool,
    {
        raw::for_each_while(&self.root, &mut f)
    }

    /// Gets an iterator that visits the keys in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use treapset::TreapSet;
    ///
    /// let set = TreapSet::with_items(8, |a: &i32, b: &i32| a < b, [3, 1, 2]);
    ///
    /// let ascending: Vec<_> = set.iter().copied().collect();
    /// assert_eq!(ascending, [1, 2, 3]);
    ///
    /// let descending: Vec<_> = set.iter().rev().copied().collect();
    /// assert_eq!(descending, [3, 2, 1]);
    /// ```
    #[must_use]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.root)
    }

    /// Gets a cursor positioned on the smallest key.
    ///
    /// Unlike [`iter`](TreapSet::iter), a cursor can change direction and be
    /// reset to either end; each step costs O(log n).
    ///
    /// # Examples
    ///
    /// ```
    /// use treapset::TreapSet;
    ///
    /// let set = TreapSet::with_items(6, |a: &i32, b: &i32| a < b, [20, 10, 30]);
    ///
    /// let mut cursor = set.cursor();
    /// assert_eq!(cursor.current(), &10);
    ///
    /// cursor.move_next();
    /// cursor.move_next();
    /// assert_eq!(cursor.current(), &30);
    ///
    /// cursor.move_prev();
    /// assert_eq!(cursor.current(), &20);
    ///
    /// cursor.reset_last();
    /// assert_eq!(cursor.current(), &30);
    /// ```
    #[must_use]
    pub fn cursor(&self) -> Cursor<'_, T, L> {
        Cursor {
            set: self,
            pos: Some(0),
        }
    }

    /// Empty set with the same seed and comparator, for split-style outputs.
    fn spawn(&self) -> Self
    where
        L: Clone,
    {
        Self::new(self.seed, self.less.clone())
    }
}

impl<T: Ord> TreapSet<T> {
    /// Makes a new, empty `TreapSet` ordered by [`Ord`].
    ///
    /// # Examples
    ///
    /// ```
    /// use treapset::TreapSet;
    ///
    /// let mut set = TreapSet::new_ord(42);
    /// set.insert("pear");
    /// set.insert("apple");
    /// assert_eq!(set.min(), Some(&"apple"));
    /// ```
    #[must_use]
    pub fn new_ord(seed: u64) -> Self {
        Self::new(seed, |a: &T, b: &T| a < b)
    }
}

/// The clone is a structural copy: same keys, same priorities, same counts,
/// same topology, and the same seed, so both sets evolve identically from
/// here if driven identically. Mutating one never affects the other.
impl<T: Clone, L: Clone> Clone for TreapSet<T, L> {
    fn clone(&self) -> Self {
        Self {
            root: raw::clone_tree(&self.root),
            seed: self.seed,
            rng: SmallRng::seed_from_u64(self.seed),
            less: self.less.clone(),
        }
    }
}

impl<T: fmt::Debug, L> fmt::Debug for TreapSet<T, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

// ─── Iterators ───────────────────────────────────────────────────────────────

/// An iterator over the keys of a [`TreapSet`] in ascending order.
///
/// Created by [`TreapSet::iter`]. Reversing it with [`Iterator::rev`] yields
/// the keys in descending order.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T: 'a> {
    // Ancestor stacks for the two traversal directions. `remaining` stops
    // the ends from walking past each other.
    front: SmallVec<[&'a Node<T>; 16]>,
    back: SmallVec<[&'a Node<T>; 16]>,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    fn new(root: &'a Link<T>) -> Self {
        let mut iter = Self {
            front: SmallVec::new(),
            back: SmallVec::new(),
            remaining: root.count(),
        };
        iter.descend_left(root);
        iter.descend_right(root);
        iter
    }

    fn descend_left(&mut self, mut link: &'a Link<T>) {
        while let Some(node) = link.node() {
            self.front.push(node);
            link = &node.left;
        }
    }

    fn descend_right(&mut self, mut link: &'a Link<T>) {
        while let Some(node) = link.node() {
            self.back.push(node);
            link = &node.right;
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.front.pop()?;
        self.remaining -= 1;
        self.descend_left(&node.right);
        Some(&node.key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.back.pop()?;
        self.remaining -= 1;
        self.descend_right(&node.left);
        Some(&node.key)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            front: self.front.clone(),
            back: self.back.clone(),
            remaining: self.remaining,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, T, L> IntoIterator for &'a TreapSet<T, L> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

/// An owning iterator over the keys of a [`TreapSet`] in ascending order.
///
/// Created by the [`IntoIterator`] implementation on `TreapSet`.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct IntoIter<T> {
    stack: SmallVec<[Box<Node<T>>; 16]>,
    remaining: usize,
}

impl<T> IntoIter<T> {
    fn descend_left(&mut self, mut link: Link<T>) {
        while let Some(mut node) = link.into_node() {
            link = node.left.take();
            self.stack.push(node);
        }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let mut node = self.stack.pop()?;
        self.remaining -= 1;
        let right = node.right.take();
        self.descend_left(right);
        Some(node.into_key())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T> FusedIterator for IntoIter<T> {}

impl<T, L> IntoIterator for TreapSet<T, L> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    /// Gets an owning iterator that visits the keys in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use treapset::TreapSet;
    ///
    /// let set = TreapSet::with_items(9, |a: &i32, b: &i32| a < b, [2, 3, 1]);
    /// let keys: Vec<i32> = set.into_iter().collect();
    /// assert_eq!(keys, [1, 2, 3]);
    /// ```
    fn into_iter(self) -> IntoIter<T> {
        let TreapSet { root, .. } = self;
        let mut iter = IntoIter {
            stack: SmallVec::new(),
            remaining: root.count(),
        };
        iter.descend_left(root);
        iter
    }
}

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// A bidirectional cursor over the keys of a [`TreapSet`] in sorted order.
///
/// The cursor addresses keys by rank and re-derives the node on demand, so
/// every step costs O(log n) and direction changes are free. Besides the
/// positions holding keys, the cursor can rest one step before the first key
/// or one step past the last; [`current`](Cursor::current) panics there.
///
/// Created by [`TreapSet::cursor`].
pub struct Cursor<'a, T, L = fn(&T, &T) -> bool> {
    set: &'a TreapSet<T, L>,
    /// `None` is "before the first key"; `Some(len)` is "past the last".
    pos: Option<usize>,
}

impl<'a, T, L> Cursor<'a, T, L> {
    /// Returns true if the cursor rests on a key.
    #[must_use]
    pub fn has_current(&self) -> bool {
        matches!(self.pos, Some(pos) if pos < self.set.len())
    }

    /// Returns the key the cursor rests on.
    ///
    /// # Panics
    ///
    /// Panics if the cursor has moved off either end.
    #[must_use]
    pub fn current(&self) -> &'a T {
        assert!(self.has_current(), "`Cursor::current()` - cursor is off the end!");
        let pos = self.pos.expect("checked by has_current");
        &raw::choose(&self.set.root, pos).key
    }

    /// Moves one step toward the greatest key, stopping one past the end.
    pub fn move_next(&mut self) {
        let len = self.set.len();
        self.pos = Some(self.pos.map_or(0, |pos| (pos + 1).min(len)));
    }

    /// Moves one step toward the smallest key, stopping one before the
    /// beginning.
    pub fn move_prev(&mut self) {
        self.pos = match self.pos {
            None | Some(0) => None,
            Some(pos) => Some(pos - 1),
        };
    }

    /// Repositions the cursor on the smallest key.
    pub fn reset_first(&mut self) {
        self.pos = Some(0);
    }

    /// Repositions the cursor on the greatest key.
    pub fn reset_last(&mut self) {
        self.pos = self.set.len().checked_sub(1);
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn less(a: &i64, b: &i64) -> bool {
        a < b
    }

    fn keys(set: &TreapSet<i64>) -> Vec<i64> {
        set.iter().copied().collect()
    }

    #[test]
    fn mutations_keep_the_invariants() {
        let mut set = TreapSet::new(1, less as fn(&i64, &i64) -> bool);
        for key in [5i64, 3, 9, 1, 7, 3, 12, -4] {
            set.insert(key);
            assert!(raw::check_all(&set.root, &set.less));
        }
        for key in [3i64, 5, 100] {
            set.remove(&key);
            assert!(raw::check_all(&set.root, &set.less));
        }
        set.insert_dup(7);
        set.insert_dup(7);
        assert!(raw::check_all(&set.root, &set.less));
        assert_eq!(keys(&set), [-4, 1, 7, 7, 7, 9, 12]);
    }

    #[test]
    fn search_or_insert_returns_the_stored_key() {
        let mut set = TreapSet::new(3, |a: &(i64, i64), b: &(i64, i64)| a.0 < b.0);
        let (inserted, stored) = set.search_or_insert((1, 10));
        assert!(inserted);
        assert_eq!(stored, &(1, 10));

        let (inserted, stored) = set.search_or_insert((1, 20));
        assert!(!inserted);
        assert_eq!(stored, &(1, 10));

        for key in [(5, 0), (3, 0), (4, 0), (0, 0)] {
            let (inserted, _) = set.search_or_insert(key);
            assert!(inserted);
        }
        assert_eq!(set.len(), 5);
    }

    #[test]
    fn join_dup_keeps_duplicates_union_drops_them() {
        let mut a = TreapSet::with_items(1, less as fn(&i64, &i64) -> bool, [1, 3, 5]);
        let mut b = TreapSet::with_items(2, less as fn(&i64, &i64) -> bool, [3, 4, 5]);

        let mut joined = a.clone();
        joined.join_dup(&mut b.clone());
        assert!(raw::check_all(&joined.root, &joined.less));
        assert_eq!(keys(&joined), [1, 3, 3, 4, 5, 5]);

        a.union(&b);
        assert!(raw::check_all(&a.root, &a.less));
        assert_eq!(keys(&a), [1, 3, 4, 5]);
        assert_eq!(keys(&b), [3, 4, 5]);
        assert_eq!(b.len(), 3);
    }

    #[test]
    #[should_panic(expected = "`TreapSet::join_exclusive()` - sets are not range-disjoint!")]
    fn join_exclusive_rejects_overlap() {
        let mut a = TreapSet::with_items(1, less as fn(&i64, &i64) -> bool, [1, 5]);
        let mut b = TreapSet::with_items(2, less as fn(&i64, &i64) -> bool, [5, 9]);
        a.join_exclusive(&mut b);
    }

    #[test]
    fn clone_is_structural_and_independent() {
        let mut set = TreapSet::with_items(7, less as fn(&i64, &i64) -> bool, 0..64);
        let copy = set.clone();
        assert!(set.topological_eq(&copy));

        set.remove(&31);
        assert!(!set.topological_eq(&copy));
        assert!(copy.contains(&31));
    }

    #[test]
    fn cursor_walks_both_directions() {
        let set = TreapSet::with_items(5, less as fn(&i64, &i64) -> bool, 0..10);

        let mut cursor = set.cursor();
        let mut forward = Vec::new();
        while cursor.has_current() {
            forward.push(*cursor.current());
            cursor.move_next();
        }
        assert_eq!(forward, (0..10).collect::<Vec<_>>());

        // Past the end; one step back lands on the maximum.
        assert!(!cursor.has_current());
        cursor.move_prev();
        assert_eq!(cursor.current(), &9);

        cursor.reset_last();
        let mut backward = Vec::new();
        while cursor.has_current() {
            backward.push(*cursor.current());
            cursor.move_prev();
        }
        assert_eq!(backward, (0..10).rev().collect::<Vec<_>>());

        // Before the beginning; one step forward lands on the minimum.
        cursor.move_next();
        assert_eq!(cursor.current(), &0);
    }

    #[test]
    fn empty_cursor_has_no_current() {
        let set: TreapSet<i64> = TreapSet::new_ord(1);
        let mut cursor = set.cursor();
        assert!(!cursor.has_current());
        cursor.reset_last();
        assert!(!cursor.has_current());
    }

    #[test]
    fn iterators_are_double_ended_and_sized() {
        let set = TreapSet::with_items(11, less as fn(&i64, &i64) -> bool, 0..100);

        let mut iter = set.iter();
        assert_eq!(iter.len(), 100);
        assert_eq!(iter.next(), Some(&0));
        assert_eq!(iter.next_back(), Some(&99));
        assert_eq!(iter.len(), 98);
        drop(iter);

        // The two ends never cross.
        let mut iter = set.iter();
        for expected in 0..50 {
            assert_eq!(iter.next(), Some(&expected));
            assert_eq!(iter.next_back(), Some(&(99 - expected)));
        }
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
        drop(iter);

        let owned: Vec<i64> = set.into_iter().collect();
        assert_eq!(owned, (0..100).collect::<Vec<_>>());
    }
}
