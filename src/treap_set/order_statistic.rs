use core::ops::Index;

use super::TreapSet;
use crate::raw::{self, Link};
use crate::Rank;

impl<T, L> TreapSet<T, L> {
    /// Returns the key at position `pos` in sorted order (zero-based).
    ///
    /// # Panics
    ///
    /// Panics if `pos >= self.len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use treapset::TreapSet;
    ///
    /// let set = TreapSet::with_items(1, |a: &i32, b: &i32| a < b, [30, 10, 20]);
    /// assert_eq!(set.choose(0), &10);
    /// assert_eq!(set.choose(2), &30);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) expected
    #[must_use]
    pub fn choose(&self, pos: usize) -> &T {
        let len = self.len();
        assert!(pos < len, "`TreapSet::choose()` - position {pos} out of range for {len} keys!");
        &raw::choose(&self.root, pos).key
    }

    /// Returns the zero-based sorted position of `key`, or `None` if the key
    /// is not present.
    ///
    /// For every in-range position, `rank` inverts [`choose`](Self::choose):
    /// `set.rank(set.choose(pos)) == Some(pos)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use treapset::TreapSet;
    ///
    /// let set = TreapSet::with_items(1, |a: &i32, b: &i32| a < b, [30, 10, 20]);
    /// assert_eq!(set.rank(&20), Some(1));
    /// assert_eq!(set.rank(&15), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) expected
    #[must_use]
    pub fn rank(&self, key: &T) -> Option<usize>
    where
        L: Fn(&T, &T) -> bool,
    {
        raw::rank(&self.root, key, &self.less)
    }

    /// Removes and returns the key at position `pos` in sorted order.
    ///
    /// # Panics
    ///
    /// Panics if `pos >= self.len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use treapset::TreapSet;
    ///
    /// let mut set = TreapSet::with_items(2, |a: &i32, b: &i32| a < b, [30, 10, 20]);
    /// assert_eq!(set.remove_by_pos(1), 20);
    /// assert_eq!(set.len(), 2);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) expected
    pub fn remove_by_pos(&mut self, pos: usize) -> T {
        let len = self.len();
        assert!(pos < len, "`TreapSet::remove_by_pos()` - position {pos} out of range for {len} keys!");
        raw::remove_at(&mut self.root, pos).into_key()
    }

    /// Splits the set by sorted position into `(positions 0..=pos, the
    /// rest)`, leaving it empty.
    ///
    /// Both halves inherit this set's seed and comparator; the moved nodes
    /// keep their priorities, so no rebalancing happens.
    ///
    /// # Panics
    ///
    /// Panics if `pos >= self.len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use treapset::TreapSet;
    ///
    /// let mut set = TreapSet::with_items(3, |a: &i32, b: &i32| a < b, 0..10);
    /// let (low, high) = set.split_by_position(6);
    ///
    /// assert!(set.is_empty());
    /// assert_eq!(low.len(), 7);
    /// assert_eq!(high.iter().copied().collect::<Vec<_>>(), [7, 8, 9]);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) expected
    pub fn split_by_position(&mut self, pos: usize) -> (Self, Self)
    where
        L: Clone,
    {
        let len = self.len();
        assert!(pos < len, "`TreapSet::split_by_position()` - position {pos} out of range for {len} keys!");
        let (low, high) = raw::split_at(self.root.take(), pos);
        let mut low_set = self.spawn();
        let mut high_set = self.spawn();
        low_set.root = low;
        high_set.root = high;
        (low_set, high_set)
    }

    /// Removes and returns the keys at positions `begin..=end` in sorted
    /// order, keeping everything else in place.
    ///
    /// The extracted run is carved out with two position splits and the
    /// outer pieces are joined back, so the cost does not depend on the size
    /// of the extracted range.
    ///
    /// # Panics
    ///
    /// Panics if `begin > end` or `end >= self.len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use treapset::TreapSet;
    ///
    /// let mut set = TreapSet::with_items(4, |a: &i32, b: &i32| a < b, 0..10);
    /// let middle = set.extract_range(3, 6);
    ///
    /// assert_eq!(middle.iter().copied().collect::<Vec<_>>(), [3, 4, 5, 6]);
    /// assert_eq!(set.iter().copied().collect::<Vec<_>>(), [0, 1, 2, 7, 8, 9]);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) expected
    pub fn extract_range(&mut self, begin: usize, end: usize) -> Self
    where
        L: Clone,
    {
        let len = self.len();
        assert!(
            begin <= end && end < len,
            "`TreapSet::extract_range()` - invalid range [{begin}, {end}] for {len} keys!"
        );

        let (low_and_middle, high) = raw::split_at(self.root.take(), end);
        let (low, middle) = if begin == 0 {
            (Link::empty(), low_and_middle)
        } else {
            raw::split_at(low_and_middle, begin - 1)
        };

        // The outer pieces are range-disjoint by construction.
        self.root = raw::join_exclusive(low, high);

        let mut extracted = self.spawn();
        extracted.root = middle;
        extracted
    }
}

/// Indexes into the set by rank.
///
/// # Panics
///
/// Panics if `rank` is out of bounds.
///
/// # Examples
///
/// ```
/// use treapset::{Rank, TreapSet};
///
/// let set = TreapSet::with_items(5, |a: &i32, b: &i32| a < b, [30, 10, 20]);
/// assert_eq!(set[Rank(1)], 20);
/// ```
impl<T, L> Index<Rank> for TreapSet<T, L> {
    type Output = T;

    fn index(&self, rank: Rank) -> &Self::Output {
        self.choose(rank.0)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::raw::check_all;
    use alloc::vec::Vec;

    fn less(a: &i64, b: &i64) -> bool {
        a < b
    }

    fn ascending(n: i64) -> TreapSet<i64> {
        TreapSet::with_items(9, less as fn(&i64, &i64) -> bool, 0..n)
    }

    #[test]
    fn choose_and_rank_invert_each_other() {
        let set = ascending(200);
        for pos in 0..set.len() {
            let key = set.choose(pos);
            assert_eq!(set.rank(key), Some(pos));
            assert_eq!(set[Rank(pos)], *key);
        }
    }

    #[test]
    #[should_panic(expected = "`TreapSet::choose()` - position 3 out of range for 3 keys!")]
    fn choose_out_of_range() {
        let set = ascending(3);
        let _ = set.choose(3);
    }

    #[test]
    fn remove_by_pos_matches_choose() {
        let mut set = ascending(50);
        assert_eq!(set.remove_by_pos(0), 0);
        assert_eq!(set.remove_by_pos(48), 49);
        assert_eq!(set.remove_by_pos(20), 21);
        assert!(check_all(&set.root, &set.less));
        assert_eq!(set.len(), 47);
    }

    #[test]
    fn split_by_position_keeps_both_halves_valid() {
        let mut set = ascending(100);
        let (low, high) = set.split_by_position(49);

        assert!(set.is_empty());
        assert_eq!(low.len(), 50);
        assert_eq!(high.len(), 50);
        assert_eq!((low.min(), low.max()), (Some(&0), Some(&49)));
        assert_eq!((high.min(), high.max()), (Some(&50), Some(&99)));
        assert!(check_all(&low.root, &low.less));
        assert!(check_all(&high.root, &high.less));
    }

    #[test]
    fn split_at_the_last_position_leaves_the_high_half_empty() {
        let mut set = ascending(10);
        let (low, high) = set.split_by_position(9);
        assert_eq!(low.len(), 10);
        assert!(high.is_empty());
    }

    #[test]
    fn extract_range_covers_the_ends() {
        let mut set = ascending(100);
        let whole = set.extract_range(0, 99);
        assert!(set.is_empty());
        assert_eq!(whole.len(), 100);

        let mut set = ascending(100);
        let prefix = set.extract_range(0, 9);
        assert_eq!(prefix.iter().copied().collect::<Vec<_>>(), (0..10).collect::<Vec<_>>());
        assert_eq!(set.len(), 90);
        assert_eq!(set.min(), Some(&10));

        let suffix = set.extract_range(80, 89);
        assert_eq!(suffix.iter().copied().collect::<Vec<_>>(), (90..100).collect::<Vec<_>>());
        assert!(check_all(&set.root, &set.less));
    }
}
